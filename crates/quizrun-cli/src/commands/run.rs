//! The `quizrun run` command.
//!
//! Reads answers and `:commands` from stdin, one per line, while a ticker
//! task credits a second to the current question every tick interval.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};

use quizrun_core::answer::{format_answer, AnswerInput};
use quizrun_core::config::load_config_from;
use quizrun_core::model::QuestionKind;
use quizrun_core::parser;
use quizrun_core::report::QuizReport;
use quizrun_core::session::{NavClass, QuizSession, QuizSummary};
use quizrun_report::html::write_html_report;

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Answer(String),
    /// Blank line: move on without editing.
    Advance,
    Next,
    Prev,
    /// 0-based target.
    Goto(usize),
    Mark,
    Clear,
    Status,
    Help,
    Submit,
    Quit,
    Unknown(String),
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Submitted,
    Quit,
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return if trimmed.is_empty() {
            Command::Advance
        } else {
            Command::Answer(line.to_string())
        };
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("next" | "n"), None, _) => Command::Next,
        (Some("prev" | "p"), None, _) => Command::Prev,
        (Some("goto" | "g"), Some(n), None) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Goto(n - 1),
            _ => Command::Unknown(trimmed.to_string()),
        },
        (Some("mark" | "m"), None, _) => Command::Mark,
        (Some("clear" | "c"), None, _) => Command::Clear,
        (Some("status" | "s"), None, _) => Command::Status,
        (Some("help" | "h"), None, _) => Command::Help,
        (Some("submit"), None, _) => Command::Submit,
        (Some("quit" | "q"), None, _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub async fn execute(
    questions: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
    no_timer: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let path = questions
        .or_else(|| config.question_set.clone())
        .context("no question set given: pass --questions or set question_set in quizrun.toml")?;
    let set = parser::parse_question_set(&path)?;

    for w in parser::validate_question_set(&set) {
        let id = w.question_id.as_deref().unwrap_or("-");
        eprintln!("WARNING [{id}]: {}", w.message);
    }

    let session = QuizSession::from_set(&set)
        .with_context(|| format!("cannot start quiz '{}'", set.name))?;
    let session = Arc::new(Mutex::new(session));
    let show_timer = config.show_timer && !no_timer;

    let ticker = tokio::spawn(run_ticker(
        Arc::clone(&session),
        Duration::from_millis(config.tick_interval_ms),
    ));

    println!(
        "{} ({} questions). Type :help for commands.",
        set.name,
        set.questions.len()
    );
    print_question(&*session.lock().await, show_timer);

    let outcome = input_loop(&session, show_timer, config.auto_advance).await;
    ticker.abort();

    if outcome? == Outcome::Quit {
        println!("Quiz abandoned; no report written.");
        return Ok(());
    }

    let summary = session.lock().await.submit().clone();
    print_results(&summary);

    let report = QuizReport::new(&set, &summary);
    let formats = resolve_formats(format.as_deref(), &config.formats);
    let output_dir = output.unwrap_or(config.output_dir);
    write_reports(&report, &output_dir, &formats)?;

    Ok(())
}

/// Credit one second to the running question timer every `period` until
/// the session is submitted.
async fn run_ticker(session: Arc<Mutex<QuizSession>>, period: Duration) {
    let mut interval = interval_at(Instant::now() + period, period);
    loop {
        interval.tick().await;
        let mut session = session.lock().await;
        if session.is_submitted() {
            break;
        }
        session.tick();
    }
}

async fn input_loop(
    session: &Mutex<QuizSession>,
    show_timer: bool,
    auto_advance: bool,
) -> Result<Outcome> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read from stdin")?
    {
        let mut s = session.lock().await;
        match parse_command(&line) {
            Command::Submit => return Ok(Outcome::Submitted),
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help => print_help(),
            Command::Status => print_status(&s),
            Command::Unknown(cmd) => println!("Unknown command '{cmd}'. Type :help for commands."),
            Command::Answer(text) => {
                let kind = s.current_question().kind;
                s.edit_input(AnswerInput::from_line(kind, &text));
                if auto_advance {
                    advance(&mut s);
                }
                print_question(&s, show_timer);
            }
            Command::Advance => {
                advance(&mut s);
                print_question(&s, show_timer);
            }
            Command::Next => {
                if !s.next() {
                    println!("Already at the last question.");
                }
                print_question(&s, show_timer);
            }
            Command::Prev => {
                if !s.prev() {
                    println!("Already at the first question.");
                }
                print_question(&s, show_timer);
            }
            Command::Goto(idx) => {
                if !s.go_to(idx) {
                    println!("No question {}; choose 1 to {}.", idx + 1, s.len());
                }
                print_question(&s, show_timer);
            }
            Command::Mark => {
                s.toggle_review();
                print_question(&s, show_timer);
            }
            Command::Clear => {
                let kind = s.current_question().kind;
                s.edit_input(AnswerInput::blank_for(kind));
                print_question(&s, show_timer);
            }
        }
        drop(s);
        prompt()?;
    }

    // End of input submits.
    Ok(Outcome::Submitted)
}

fn advance(session: &mut QuizSession) {
    if !session.next() {
        println!("That was the last question. Type :submit to finish or :goto N to review.");
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn print_question(session: &QuizSession, show_timer: bool) {
    let idx = session.current_index();
    let question = session.current_question();

    let mut header = format!("\nQuestion {} of {}", idx + 1, session.len());
    if let Some(category) = &question.category {
        header.push_str(&format!(" [{category}]"));
    }
    if session.is_marked(idx) {
        header.push_str(" (marked for review)");
    }
    if show_timer {
        header.push_str(&format!("  {}", format_clock(session.elapsed(idx))));
    }

    println!("{header}");
    println!("{}", question.question_text);
    if question.kind == QuestionKind::Dual {
        println!("(answer as: quotient, remainder)");
    }
    if session.is_answered(idx) {
        println!("Your answer: {}", format_answer(session.answer(idx)));
    }
}

fn print_status(session: &QuizSession) {
    let counts = session.status();
    println!(
        "Answered: {} | Unattempted: {} | To review: {} | Total: {}",
        counts.answered, counts.unattempted, counts.to_review, counts.total
    );

    let nav: Vec<String> = session
        .nav_states()
        .iter()
        .map(|n| {
            let mark = match n.class() {
                NavClass::Marked => "?",
                NavClass::Answered => "*",
                NavClass::Unanswered => "",
            };
            let current = if n.current { ">" } else { "" };
            format!("{current}{}{mark}", n.index + 1)
        })
        .collect();
    println!("{}", nav.join(" "));
    println!("(* answered, ? marked for review, > current)");
}

fn print_help() {
    println!("Type an answer and press Enter to save it and move on.");
    println!("Division questions take 'quotient, remainder'.");
    println!("  :next, :prev    move one question");
    println!("  :goto N         jump to question N");
    println!("  :mark           toggle the review mark");
    println!("  :clear          clear the current answer");
    println!("  :status         show progress");
    println!("  :submit         finish and grade (also on end of input)");
    println!("  :quit           leave without submitting");
}

fn print_results(summary: &QuizSummary) {
    println!(
        "\nScore: {} / {} ({:.1}%)",
        summary.score,
        summary.total_questions,
        summary.percentage()
    );
    println!("Total time: {}", format_clock(summary.total_time_secs));

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Your Answer",
        "Result",
        "Correct Answer",
        "Time",
    ]);

    for r in &summary.results {
        let (verdict, color) = if r.is_correct {
            ("Correct", Color::Green)
        } else {
            ("Incorrect", Color::Red)
        };
        table.add_row(vec![
            Cell::new(r.number),
            Cell::new(&r.question_text),
            Cell::new(&r.user_answer),
            Cell::new(verdict).fg(color),
            Cell::new(r.correct_answer.as_deref().unwrap_or("")),
            Cell::new(format_clock(r.elapsed_secs)),
        ]);
    }

    println!("{table}");
}

fn resolve_formats(arg: Option<&str>, configured: &[String]) -> Vec<String> {
    let formats: Vec<String> = match arg {
        Some(list) => list.split(',').map(|f| f.trim().to_lowercase()).collect(),
        None => configured.iter().map(|f| f.trim().to_lowercase()).collect(),
    };
    if formats.iter().any(|f| f == "all") {
        return vec!["json".into(), "html".into(), "markdown".into()];
    }
    formats.into_iter().filter(|f| !f.is_empty()).collect()
}

fn write_reports(report: &QuizReport, output: &Path, formats: &[String]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let mut written = Vec::new();

    for fmt in formats {
        match fmt.as_str() {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
                written.push(path);
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
                written.push(path);
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Markdown report: {}", path.display());
                written.push(path);
            }
            other => eprintln!("Unknown format: {other}"),
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrun_core::model::{CorrectAnswer, Question, QuestionSet};

    fn questions() -> Vec<Question> {
        vec![
            Question::new("a", QuestionKind::Single, "2 + 2 = ?", CorrectAnswer::scalar(4)),
            Question::new(
                "b",
                QuestionKind::Dual,
                "Divide 9 by 2. What is the Quotient and Remainder?",
                CorrectAnswer::pair(4, 1),
            ),
        ]
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command(":next"), Command::Next);
        assert_eq!(parse_command("  :p "), Command::Prev);
        assert_eq!(parse_command(":goto 3"), Command::Goto(2));
        assert_eq!(parse_command(":mark"), Command::Mark);
        assert_eq!(parse_command(":submit"), Command::Submit);
        assert_eq!(parse_command(":quit"), Command::Quit);
        assert_eq!(parse_command(""), Command::Advance);
        assert_eq!(parse_command("   "), Command::Advance);
        assert_eq!(parse_command("4, 1"), Command::Answer("4, 1".into()));
        assert_eq!(parse_command("-3.5"), Command::Answer("-3.5".into()));
    }

    #[test]
    fn rejects_bad_goto() {
        assert!(matches!(parse_command(":goto 0"), Command::Unknown(_)));
        assert!(matches!(parse_command(":goto x"), Command::Unknown(_)));
        assert!(matches!(parse_command(":goto"), Command::Unknown(_)));
        assert!(matches!(parse_command(":goto 1 2"), Command::Unknown(_)));
        assert!(matches!(parse_command(":dance"), Command::Unknown(_)));
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn format_selection() {
        let configured = vec!["json".to_string()];
        assert_eq!(resolve_formats(None, &configured), vec!["json"]);
        assert_eq!(
            resolve_formats(Some("HTML, json,"), &configured),
            vec!["html", "json"]
        );
        assert_eq!(
            resolve_formats(Some("all"), &configured),
            vec!["json", "html", "markdown"]
        );
    }

    #[test]
    fn writes_requested_reports() {
        let set = QuestionSet {
            id: "t".into(),
            name: "T".into(),
            description: String::new(),
            questions: questions(),
        };
        let mut session = QuizSession::from_set(&set).unwrap();
        session.edit_input(AnswerInput::text("4"));
        let summary = session.submit().clone();
        let report = QuizReport::new(&set, &summary);

        let dir = tempfile::tempdir().unwrap();
        let formats = resolve_formats(Some("all,bogus"), &[]);
        let written = write_reports(&report, dir.path(), &formats).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));

        let md = std::fs::read_to_string(&written[2]).unwrap();
        assert!(md.contains("**Score:** 1 / 2"));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_credits_the_current_question() {
        let session = Arc::new(Mutex::new(QuizSession::new(questions()).unwrap()));
        let handle = tokio::spawn(run_ticker(Arc::clone(&session), Duration::from_secs(1)));

        tokio::time::sleep(Duration::from_millis(3500)).await;
        {
            let mut s = session.lock().await;
            assert_eq!(s.elapsed(0), 3);
            s.next();
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        {
            let mut s = session.lock().await;
            assert_eq!(s.elapsed(0), 3);
            assert_eq!(s.elapsed(1), 2);
            s.submit();
        }

        handle.await.unwrap();
        assert_eq!(session.lock().await.total_time(), 5);
    }
}
