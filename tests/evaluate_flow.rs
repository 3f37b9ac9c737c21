//! End-to-end orchestration tests.
//!
//! These drive the full pipeline against a temporary grading layout using
//! `sh` as the grading interpreter, so no Python toolchain is required.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tempfile::TempDir;

use labmark::pipeline::{EvalConfig, Orchestrator};
use labmark::runner::{ExecutorConfig, FailureReason};

fn test_config(base: &Path) -> EvalConfig {
    EvalConfig::new(base).with_executor(
        ExecutorConfig::new()
            .with_interpreter("sh")
            .with_path_var("LABMARK_TEST_PATH")
            .with_task_extension("sh")
            .with_timeout(Duration::from_secs(10)),
    )
}

fn write_task(base: &Path, lab: u32, task: &str, body: &str) {
    let lab_dir = base.join("code").join(format!("lab{lab}"));
    fs::create_dir_all(&lab_dir).unwrap();
    fs::write(lab_dir.join(task), body).unwrap();
}

fn create_submission(base: &Path, username: &str, lab: u32) {
    fs::create_dir_all(base.join("submit").join(username).join(format!("lab{lab}"))).unwrap();
}

fn requests(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

#[tokio::test]
async fn test_full_pass_creates_leaderboard_from_scratch() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "exit 0\n");
    write_task(base.path(), 1, "task2.sh", "exit 0\n");
    create_submission(base.path(), "alice", 1);

    let orchestrator = Orchestrator::new(test_config(base.path()));
    let report = orchestrator
        .run(&requests(&["alice/lab1"]))
        .await
        .unwrap();

    assert!(report.success());
    assert_eq!(report.outcomes.len(), 1);
    assert!(report.outcomes[0].passed);
    assert_eq!(report.outcomes[0].tasks.len(), 2);

    let document = fs::read_to_string(base.path().join("README.md")).unwrap();
    let header = document.lines().next().unwrap();
    assert!(header.contains("用户排名"));
    assert!(header.contains("用户名"));
    assert!(header.contains("lab1"));
    assert!(header.contains("完成任务总数"));

    let alice_row = document.lines().find(|l| l.contains("alice")).unwrap();
    assert!(alice_row.contains("| 1 |"), "rank should be 1: {alice_row}");
    assert!(alice_row.contains("√"), "lab1 should show √: {alice_row}");
}

#[tokio::test]
async fn test_partial_pass_records_percentage() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "exit 0\n");
    write_task(base.path(), 1, "task2.sh", "exit 0\n");
    write_task(base.path(), 1, "task3.sh", "exit 1\n");
    create_submission(base.path(), "alice", 1);

    let orchestrator = Orchestrator::new(test_config(base.path()));
    let report = orchestrator
        .run(&requests(&["alice/lab1"]))
        .await
        .unwrap();

    assert!(!report.success());
    assert!(!report.outcomes[0].passed);
    assert_eq!(report.outcomes[0].tasks.len(), 3);

    let document = fs::read_to_string(base.path().join("README.md")).unwrap();
    let alice_row = document.lines().find(|l| l.contains("alice")).unwrap();
    assert!(alice_row.contains("66.7%"), "expected 66.7% in: {alice_row}");
}

#[tokio::test]
async fn test_bad_requests_do_not_abort_the_batch() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "exit 0\n");
    create_submission(base.path(), "bob", 1);

    let orchestrator = Orchestrator::new(test_config(base.path()));
    let report = orchestrator
        .run(&requests(&["not a path", "ghost/lab1", "bob/lab1"]))
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 3);

    let malformed = &report.outcomes[0];
    assert!(!malformed.passed);
    assert_eq!(malformed.lab_num, 0);
    assert!(malformed.error.as_deref().unwrap().contains("invalid request path"));

    let missing = &report.outcomes[1];
    assert!(!missing.passed);
    assert!(missing
        .error
        .as_deref()
        .unwrap()
        .contains("submission directory not found"));

    let good = &report.outcomes[2];
    assert!(good.passed);

    // The leaderboard persisted and only bob made it in.
    let document = fs::read_to_string(base.path().join("README.md")).unwrap();
    assert!(document.contains("bob"));
    assert!(!document.contains("ghost"));
}

#[tokio::test]
async fn test_timeout_does_not_stop_remaining_tasks() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "sleep 5\n");
    write_task(base.path(), 1, "task2.sh", "exit 0\n");
    create_submission(base.path(), "alice", 1);

    let config = EvalConfig::new(base.path()).with_executor(
        ExecutorConfig::new()
            .with_interpreter("sh")
            .with_path_var("LABMARK_TEST_PATH")
            .with_task_extension("sh")
            .with_timeout(Duration::from_millis(300)),
    );
    let report = Orchestrator::new(config)
        .run(&requests(&["alice/lab1"]))
        .await
        .unwrap();

    let outcome = &report.outcomes[0];
    assert!(!outcome.passed);
    assert_eq!(outcome.tasks.len(), 2);

    let tasks: Vec<_> = outcome.tasks.iter().collect();
    assert_eq!(tasks[0].failure_reason, Some(FailureReason::Timeout));
    assert_eq!(tasks[0].exit_code, -1);
    assert!(tasks[1].is_pass());
}

#[tokio::test]
async fn test_preamble_survives_updates() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "exit 0\n");
    create_submission(base.path(), "alice", 1);

    fs::write(
        base.path().join("README.md"),
        "# 实验排行榜\n\n一些说明文字。\n\n| 用户排名 | 用户名 | lab1 | 完成任务总数 |\n| --- | --- | --- | --- |\n",
    )
    .unwrap();

    let report = Orchestrator::new(test_config(base.path()))
        .run(&requests(&["alice/lab1"]))
        .await
        .unwrap();
    assert!(report.success());

    let document = fs::read_to_string(base.path().join("README.md")).unwrap();
    assert!(document.starts_with("# 实验排行榜\n\n一些说明文字。\n"));
    assert!(document.contains("alice"));
}

#[tokio::test]
async fn test_document_without_table_aborts_the_run() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "exit 0\n");
    create_submission(base.path(), "alice", 1);
    fs::write(base.path().join("README.md"), "just prose, no table\n").unwrap();

    let result = Orchestrator::new(test_config(base.path()))
        .run(&requests(&["alice/lab1"]))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_report_json_shape() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "echo graded\n");
    create_submission(base.path(), "alice", 1);

    let report = Orchestrator::new(test_config(base.path()))
        .run(&requests(&["alice/lab1"]))
        .await
        .unwrap();

    let json = serde_json::to_value(&report.outcomes).unwrap();
    let entry = &json[0];
    assert_eq!(entry["lab_num"], 1);
    assert_eq!(entry["username"], "alice");
    assert_eq!(entry["passed"], true);
    assert!(entry["tasks"].is_object());
    assert_eq!(entry["tasks"]["task1"]["exit_code"], 0);
    assert_eq!(entry["tasks"]["task1"]["stdout"], "graded\n");
    assert!(entry.get("error").is_none());
    assert!(entry.get("table_update_error").is_none());
}

#[tokio::test]
async fn test_two_users_ranked_across_runs() {
    let base = TempDir::new().unwrap();
    write_task(base.path(), 1, "task1.sh", "exit 0\n");
    write_task(base.path(), 2, "task1.sh", "exit 0\n");
    create_submission(base.path(), "alice", 1);
    create_submission(base.path(), "alice", 2);
    create_submission(base.path(), "bob", 1);

    let orchestrator = Orchestrator::new(test_config(base.path()));
    let report = orchestrator
        .run(&requests(&["alice/lab1", "alice/lab2", "bob/lab1"]))
        .await
        .unwrap();
    assert!(report.success());

    let document = fs::read_to_string(base.path().join("README.md")).unwrap();
    let alice_row = document.lines().find(|l| l.contains("alice")).unwrap();
    let bob_row = document.lines().find(|l| l.contains("bob")).unwrap();
    assert!(alice_row.starts_with("| 1 |"));
    assert!(bob_row.starts_with("| 2 |"));
    // alice completed two labs, bob one.
    assert!(alice_row.trim_end().ends_with("| 2 |"));
    assert!(bob_row.trim_end().ends_with("| 1 |"));
}
