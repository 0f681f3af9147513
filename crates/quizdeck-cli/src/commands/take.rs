//! The `quizdeck take` command: one timed attempt in the terminal.
//!
//! The answer loop reads stdin while the session runtime counts down in the
//! background; whichever finishes the session first wins, and the loop
//! checks the phase after every read so a timeout mid-prompt lands cleanly
//! on the result view.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use quizdeck_core::aggregate::{aggregate_course, aggregate_general};
use quizdeck_core::grader::{AnswerValue, GradingResult, Verdict};
use quizdeck_core::model::{Question, QuestionKind, QuizDocument, TableData};
use quizdeck_core::runtime::{shared, SessionRunner, SharedSession};
use quizdeck_core::session::{Phase, QuizSession};
use quizdeck_core::traits::{QuizStore, SessionObserver};
use quizdeck_store::{load_config_from, FsStore};

pub async fn execute(
    config: Option<&Path>,
    target: &str,
    seed: Option<u64>,
    untimed: bool,
    report: Option<&Path>,
) -> Result<()> {
    let config = load_config_from(config)?;
    let store = FsStore::new(&config.data_dir);
    let document = resolve_target(&store, target).await?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let session = shared(QuizSession::start(document, &mut rng)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        run_attempt(&session, untimed, &mut lines).await?;
        print_result(&session);

        print!("\nRetake with a fresh shuffle? [y/N] ");
        std::io::stdout().flush()?;
        let reply = lines.next_line().await?.unwrap_or_default();
        if reply.trim().eq_ignore_ascii_case("y") {
            session.lock().unwrap().retake(&mut rng);
        } else {
            break;
        }
    }

    if let Some(path) = report {
        let session = session.lock().unwrap();
        if let Some(result) = session.result() {
            result.save_json(path)?;
            println!("Result written to {}", path.display());
        }
    }
    Ok(())
}

/// Resolve the quiz to run: a stored file name, `course:<CODE>`, or
/// `general`, matching the routing convention of the stored corpus.
async fn resolve_target(store: &FsStore, target: &str) -> Result<QuizDocument> {
    tracing::debug!(target, "resolving quiz target");
    if target.eq_ignore_ascii_case("general") {
        let documents = store.load_all().await?;
        return Ok(aggregate_general(&documents)?);
    }
    if let Some(course) = target.strip_prefix("course:") {
        let documents = store.load_all().await?;
        return Ok(aggregate_course(&documents, course)?);
    }
    store.load(target).await
}

/// Prints a warning as the countdown runs out, and a notice when it
/// submits the attempt.
struct CountdownNotices;

impl SessionObserver for CountdownNotices {
    fn on_tick(&self, remaining_seconds: u32) {
        if remaining_seconds == 60 {
            println!("\nOne minute remaining.");
        }
    }

    fn on_finish(&self, _: &GradingResult) {
        println!("\nTime is up, answers submitted. Press Enter to see the result.");
    }
}

#[derive(PartialEq)]
enum PromptKind {
    Options,
    Text,
    Table,
}

async fn run_attempt(
    session: &SharedSession,
    untimed: bool,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    print_header(session);
    let runner =
        (!untimed).then(|| SessionRunner::spawn(Arc::clone(session), Arc::new(CountdownNotices)));

    loop {
        let (question_id, kind) = {
            let session = session.lock().unwrap();
            if session.phase() == Phase::Finished {
                break;
            }
            let Some(question) = session.current_question() else {
                break;
            };
            print!("{}", render_prompt(&session, question));
            (question.id.clone(), prompt_kind(question))
        };
        std::io::stdout().flush()?;

        match kind {
            PromptKind::Table => {
                let mut rows: Vec<Vec<String>> = Vec::new();
                loop {
                    let Some(line) = lines.next_line().await? else {
                        break;
                    };
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        break;
                    }
                    rows.push(line.split('|').map(|cell| cell.trim().to_string()).collect());
                }

                let mut session = session.lock().unwrap();
                if session.phase() == Phase::Finished {
                    break;
                }
                if !rows.is_empty() {
                    session.record_answer(
                        &question_id,
                        AnswerValue::Table(TableData {
                            headers: Vec::new(),
                            rows,
                        }),
                    )?;
                }
                session.advance();
            }
            PromptKind::Options | PromptKind::Text => {
                let Some(line) = lines.next_line().await? else {
                    break;
                };
                let input = line.trim();

                let mut session = session.lock().unwrap();
                if session.phase() == Phase::Finished {
                    break;
                }
                match input {
                    "" => session.advance(),
                    "/submit" => session.finish(),
                    "/back" => {
                        let index = session.current_index();
                        session.go_to(index.saturating_sub(1));
                    }
                    answer if kind == PromptKind::Options => match answer.parse::<usize>() {
                        Ok(n) if n >= 1 => {
                            session.record_answer(&question_id, AnswerValue::Option(n - 1))?;
                            session.advance();
                        }
                        _ => println!("Enter an option number, blank to skip, or /submit."),
                    },
                    answer => {
                        session.record_answer(&question_id, AnswerValue::Text(answer.to_string()))?;
                        session.advance();
                    }
                }
            }
        }
    }

    if let Some(runner) = runner {
        runner.teardown();
    }
    // Covers the input-closed path; a no-op when already finished.
    session.lock().unwrap().finish();
    Ok(())
}

fn prompt_kind(question: &Question) -> PromptKind {
    match &question.kind {
        QuestionKind::Mcq { .. } => PromptKind::Options,
        _ if question.is_table_answer() => PromptKind::Table,
        _ => PromptKind::Text,
    }
}

fn print_header(session: &SharedSession) {
    let session = session.lock().unwrap();
    let document = session.document();
    println!(
        "\n{} / {} | {} questions | {} on the clock",
        document.course_code,
        document.topic,
        session.question_count(),
        format_time(session.remaining_seconds()),
    );
    if let Some(table) = &document.reference_table {
        if table.headers.iter().any(|h| !h.trim().is_empty()) {
            println!("{}", format_table(table));
        }
    }
}

fn render_prompt(session: &QuizSession, question: &Question) -> String {
    let mut out = format!(
        "\n[{}/{}] {} left\n",
        session.current_index() + 1,
        session.question_count(),
        format_time(session.remaining_seconds()),
    );
    if let Some(table) = &question.reference_table {
        out.push_str(&format_table(table));
        out.push('\n');
    }
    out.push_str(&question.text);
    out.push('\n');

    match &question.kind {
        QuestionKind::Mcq { options, .. } => {
            for (index, option) in options.iter().enumerate() {
                out.push_str(&format!("  {}) {option}\n", index + 1));
            }
            out.push_str("Answer (number, blank to skip, /back, /submit): ");
        }
        _ if question.is_table_answer() => {
            if let QuestionKind::Theory {
                answer_table: Some(template),
                ..
            }
            | QuestionKind::FillBlanks {
                answer_table: Some(template),
                ..
            } = &question.kind
            {
                if !template.headers.is_empty() {
                    out.push_str(&format!("Columns: {}\n", template.headers.join(" | ")));
                }
            }
            out.push_str("Enter rows as `cell | cell`; a blank line finishes the table:\n");
        }
        _ => out.push_str("Answer (text, blank to skip, /back, /submit): "),
    }
    out
}

fn print_result(session: &SharedSession) {
    let session = session.lock().unwrap();
    let Some(result) = session.result() else {
        return;
    };

    println!(
        "\nQuiz complete: {} / {} ({:.0}%)",
        result.total_score,
        result.max_score,
        result.percentage()
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Question", "Verdict", "Points", "Expected"]);
    for (position, id) in session.ordered_ids().iter().enumerate() {
        let Some(question) = session.question(id) else {
            continue;
        };
        let Some(score) = result.per_question.get(id) else {
            continue;
        };
        table.add_row(vec![
            (position + 1).to_string(),
            truncate(&question.text, 48),
            verdict_label(score.verdict).to_string(),
            format!("{}/{}", score.earned, score.max),
            expected_answer(question),
        ]);
    }
    println!("{table}");
}

fn expected_answer(question: &Question) -> String {
    match &question.kind {
        QuestionKind::Mcq {
            options,
            correct_option,
        } => options.get(*correct_option).cloned().unwrap_or_default(),
        QuestionKind::Theory { answer, .. } | QuestionKind::FillBlanks { answer, .. } => {
            if question.is_table_answer() {
                "(completed table)".to_string()
            } else {
                truncate(answer, 48)
            }
        }
    }
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Correct => "correct",
        Verdict::Partial => "partial",
        Verdict::Incorrect => "incorrect",
        Verdict::Unanswered => "unanswered",
    }
}

fn format_table(data: &TableData) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    if data.headers.iter().any(|h| !h.trim().is_empty()) {
        table.set_header(data.headers.clone());
    }
    for row in &data.rows {
        table.add_row(row.clone());
    }
    table.to_string()
}

fn format_time(total_seconds: u32) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}
