//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUIZ: &str = r#"[quiz]
id = "cli"
name = "CLI Quiz"

[[questions]]
id = "add"
type = "single"
question_text = "2 + 2 = ?"
correct_answer = 4

[[questions]]
id = "divide"
type = "dual"
question_text = "Divide 9 by 2. What is the Quotient and Remainder?"
correct_answer = { quotient = 4, remainder = 1 }

[[questions]]
id = "factors"
type = "text"
question_text = "List all prime factors of 12 (comma separated)"
correct_answer = "2,2,3"
"#;

fn quizrun(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizrun").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("QUIZRUN_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp dir holding `quiz.toml`.
fn quiz_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("quiz.toml"), QUIZ).unwrap();
    dir
}

fn reports_with_extension(dir: &Path, ext: &str) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == ext))
            .count(),
        Err(_) => 0,
    }
}

#[test]
fn run_grades_piped_answers() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin("4\n4, 1\n3, 2, 2\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 3"))
        .stdout(predicate::str::contains("Score: 3 / 3 (100.0%)"))
        .stdout(predicate::str::contains("Correct"));

    assert_eq!(reports_with_extension(&dir.path().join("out"), "json"), 1);
}

#[test]
fn end_of_input_submits() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin("5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0 / 3 (0.0%)"))
        .stdout(predicate::str::contains("No Answer"))
        .stdout(predicate::str::contains("Q: 4, R: 1"));
}

#[test]
fn navigation_and_review_marks() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin(":goto 3\n2,2,3\n:prev\n:prev\n4\n:mark\n:status\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("That was the last question"))
        .stdout(predicate::str::contains("(marked for review)"))
        .stdout(predicate::str::contains(
            "Answered: 2 | Unattempted: 1 | To review: 1 | Total: 3",
        ))
        .stdout(predicate::str::contains("1* >2? 3*"))
        .stdout(predicate::str::contains("Score: 2 / 3"));
}

#[test]
fn partial_dual_answer_counts_as_answered() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin(":next\n4,\n:prev\n:next\n:status\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Answered: 1 | Unattempted: 2"))
        .stdout(predicate::str::contains("Q: 4, R: "))
        .stdout(predicate::str::contains("Score: 0 / 3"));
}

#[test]
fn clear_and_bad_goto() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin("4\n:prev\n:clear\n:goto 9\n:bogus\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No question 9; choose 1 to 3."))
        .stdout(predicate::str::contains("Unknown command ':bogus'"))
        .stdout(predicate::str::contains("Score: 0 / 3"));
}

#[test]
fn quit_writes_no_report() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin("4\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz abandoned"))
        .stdout(predicate::str::contains("Score:").not());

    assert!(!dir.path().join("out").exists());
}

#[test]
fn timer_display_can_be_hidden() {
    let dir = quiz_dir();

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out"])
        .write_stdin(":submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 3  00:"));

    quizrun(dir.path())
        .args(["run", "--questions", "quiz.toml", "--output", "out", "--no-timer"])
        .write_stdin(":submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 3  00:").not());
}

#[test]
fn run_uses_config_defaults() {
    let dir = quiz_dir();
    std::fs::write(
        dir.path().join("quizrun.toml"),
        "question_set = \"quiz.toml\"\noutput_dir = \"reports\"\nformats = [\"html\", \"markdown\"]\n",
    )
    .unwrap();

    quizrun(dir.path())
        .arg("run")
        .write_stdin("4\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1 / 3"));

    let reports = dir.path().join("reports");
    assert_eq!(reports_with_extension(&reports, "html"), 1);
    assert_eq!(reports_with_extension(&reports, "md"), 1);
    assert_eq!(reports_with_extension(&reports, "json"), 0);
}

#[test]
fn run_without_question_set_fails() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path())
        .arg("run")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no question set given"));
}

#[test]
fn run_rejects_empty_quiz() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("empty.toml"),
        "[quiz]\nid = \"empty\"\nname = \"Empty\"\n",
    )
    .unwrap();

    quizrun(dir.path())
        .args(["run", "--questions", "empty.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_repository_sets() {
    let dir = TempDir::new().unwrap();
    let sets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../question-sets");

    quizrun(dir.path())
        .arg("validate")
        .arg("--questions")
        .arg(sets.join("arithmetic.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("All question sets valid"));

    quizrun(dir.path())
        .arg("validate")
        .arg("--questions")
        .arg(&sets)
        .assert()
        .success()
        .stdout(predicate::str::contains("Four-Digit Arithmetic"))
        .stdout(predicate::str::contains("Number Sense"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("dupes.toml"),
        r#"[quiz]
id = "dupes"
name = "Dupes"

[[questions]]
id = "q"
type = "single"
question_text = "1 + 1 = ?"
correct_answer = 2

[[questions]]
id = "q"
type = "text"
question_text = "Capital of France?"
correct_answer = "Paris"
"#,
    )
    .unwrap();

    quizrun(dir.path())
        .args(["validate", "--questions", "dupes.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate question ID: q"))
        .stdout(predicate::str::contains("graded by exact match"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path())
        .args(["validate", "--questions", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn generate_writes_valid_set() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path())
        .args(["generate", "--output", "sets/maths.toml", "--seed", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 10 questions (seed 42)"));

    quizrun(dir.path())
        .args(["validate", "--questions", "sets/maths.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 questions"))
        .stdout(predicate::str::contains("All question sets valid"));
}

#[test]
fn generate_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();

    for name in ["a.toml", "b.toml"] {
        quizrun(dir.path())
            .args(["generate", "--output", name, "--seed", "7"])
            .assert()
            .success();
    }

    let a = std::fs::read_to_string(dir.path().join("a.toml")).unwrap();
    let b = std::fs::read_to_string(dir.path().join("b.toml")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizrun.toml"))
        .stdout(predicate::str::contains("Created question-sets/example.toml"));

    assert!(dir.path().join("quizrun.toml").exists());
    assert!(dir.path().join("question-sets/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path()).arg("init").assert().success();

    quizrun(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_then_run_example() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path()).arg("init").assert().success();

    quizrun(dir.path())
        .arg("run")
        .write_stdin("7996\n176, 2\n7,3,2,2\n3 / 8\n3.5\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 5 / 5 (100.0%)"));

    let reports = dir.path().join("quizrun-results");
    assert_eq!(reports_with_extension(&reports, "json"), 1);
    assert_eq!(reports_with_extension(&reports, "html"), 1);
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timed terminal quiz runner"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();

    quizrun(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizrun"));
}
