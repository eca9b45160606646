//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_BANK: &str = "../../question-banks/sample.toml";
const SAMPLE_RESPONSES: &str = "../../question-banks/sample-responses.json";

fn quizgrade() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizgrade").unwrap();
    cmd.env_remove("QUIZGRADE_OUTPUT_DIR").env_remove("RUST_LOG");
    cmd
}

#[test]
fn validate_sample_bank() {
    quizgrade()
        .arg("validate")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .assert()
        .success()
        .stdout(predicate::str::contains("9 questions"))
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn validate_directory() {
    quizgrade()
        .arg("validate")
        .arg("--bank")
        .arg("../../question-banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Question Bank"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = "q1"
type = "essay"

[[questions]]
id = "q1"
type = "mcq"
definition = { question_text = "No options", options = [] }
"#,
    )
    .unwrap();

    quizgrade()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q1] WARNING: unsupported question type: essay"))
        .stdout(predicate::str::contains("duplicate question ID: q1"))
        .stdout(predicate::str::contains("3 warning(s) found"));

    quizgrade()
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn validate_nonexistent_file() {
    quizgrade()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn grade_writes_reports() {
    let dir = TempDir::new().unwrap();

    quizgrade()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--responses")
        .arg(SAMPLE_RESPONSES)
        .arg("--output")
        .arg(dir.path())
        .arg("--format")
        .arg("all")
        .assert()
        .success()
        .stdout(predicate::str::contains("capital"))
        .stdout(predicate::str::contains("manual"))
        .stdout(predicate::str::contains("Total: 11.50 / 23.00 (50.0%)"));

    let files: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(files.iter().any(|f| f.starts_with("sample-") && f.ends_with(".json")));
    assert!(files.iter().any(|f| f.ends_with(".md")));
}

#[test]
fn grade_to_stdout_is_json() {
    let output = quizgrade()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--responses")
        .arg(SAMPLE_RESPONSES)
        .arg("--stdout")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["bank_id"], "sample");
    assert_eq!(report["marks_awarded"], 11.5);
    assert_eq!(report["pending_manual"], 1);
    assert_eq!(report["items"].as_array().unwrap().len(), 9);
}

#[test]
fn grade_records_missing_responses() {
    let dir = TempDir::new().unwrap();
    let responses = dir.path().join("partial.json");
    std::fs::write(&responses, r#"{"capital": 1}"#).unwrap();

    quizgrade()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--responses")
        .arg(&responses)
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_response"))
        .stdout(predicate::str::contains("invalid_response"));
}

#[test]
fn grade_fails_on_invalid_when_configured() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("quizgrade.toml");
    std::fs::write(&config, "fail_on_invalid = true\n").unwrap();
    let responses = dir.path().join("partial.json");
    std::fs::write(&responses, r#"{"capital": {"selected_options": ["b"]}}"#).unwrap();

    quizgrade()
        .arg("--config")
        .arg(&config)
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--responses")
        .arg(&responses)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be graded"));
}

#[test]
fn grade_rejects_non_object_responses() {
    let dir = TempDir::new().unwrap();
    let responses = dir.path().join("list.json");
    std::fs::write(&responses, "[1, 2, 3]").unwrap();

    quizgrade()
        .arg("grade")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--responses")
        .arg(&responses)
        .assert()
        .failure()
        .stderr(predicate::str::contains("keyed by question id"));
}

#[test]
fn render_learner_view_hides_answers() {
    quizgrade()
        .arg("render")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--question")
        .arg("capital")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paris"))
        .stdout(predicate::str::contains("is_correct").not());
}

#[test]
fn render_reviewer_view() {
    quizgrade()
        .arg("render")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--question")
        .arg("revolution")
        .arg("--view")
        .arg("reviewer")
        .assert()
        .success()
        .stdout(predicate::str::contains("sample_answer"))
        .stdout(predicate::str::contains("answer_schema"));
}

#[test]
fn render_unknown_question() {
    quizgrade()
        .arg("render")
        .arg("--bank")
        .arg(SAMPLE_BANK)
        .arg("--question")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 'nope' not found"));
}

#[test]
fn types_lists_every_kind() {
    quizgrade()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("image_grid_mcq"))
        .stdout(predicate::str::contains("Reading Comprehension"))
        .stdout(predicate::str::contains("ai_assisted"));
}

#[test]
fn types_by_category() {
    quizgrade()
        .arg("types")
        .arg("--category")
        .arg("open")
        .assert()
        .success()
        .stdout(predicate::str::contains("short_answer"))
        .stdout(predicate::str::contains("mcq").not());
}

#[test]
fn types_template() {
    quizgrade()
        .arg("types")
        .arg("--template")
        .arg("ordering")
        .assert()
        .success()
        .stdout(predicate::str::contains("correct_order"));

    quizgrade()
        .arg("types")
        .arg("--template")
        .arg("essay")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported question type: essay"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizgrade()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizgrade.toml"))
        .stdout(predicate::str::contains("Created question-banks/example.toml"));

    assert!(dir.path().join("quizgrade.toml").exists());
    assert!(dir.path().join("question-banks/example.toml").exists());

    quizgrade()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("question-banks/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All question banks valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizgrade().current_dir(dir.path()).arg("init").assert().success();

    quizgrade()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizgrade()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Polymorphic question grading engine"));
}

#[test]
fn version_output() {
    quizgrade()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizgrade"));
}
