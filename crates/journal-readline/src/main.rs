mod bootstrap;
mod commands;
mod helper;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use colored::Colorize;
use journal_application::{JournalUseCase, RejectReason, SendOutcome};
use journal_core::date::{format_date_key, shift_month};
use journal_infrastructure::JournalPaths;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use crate::bootstrap::bootstrap;
use crate::commands::{Command, help_text};
use crate::helper::CliHelper;
use crate::render::{CalendarView, render_calendar, render_entry, render_message};

/// Overrides the journal directory (config, secrets, local store, logs).
const HOME_ENV_VAR: &str = "JOURNAL_HOME";

/// Sends logs to a daily rolling file so they don't interleave with the REPL.
fn init_tracing(logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, "mindful-journal.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    Ok(guard)
}

fn print_outcome(outcome: SendOutcome) {
    match outcome {
        SendOutcome::Replied(message) => {
            println!("{}", render_message(&message));
            println!();
        }
        SendOutcome::Rejected(RejectReason::Busy) => {
            println!("{}", "Still working on your last message.".yellow());
        }
        SendOutcome::Rejected(RejectReason::Empty) => {}
    }
}

async fn show_shifted_month(
    usecase: &JournalUseCase,
    view: &mut CalendarView,
    offset: i32,
    today: NaiveDate,
) {
    // Focus may have moved while the prompt was waiting.
    view.follow(usecase.selected_date().await);
    match shift_month(view.month, offset) {
        Ok(month) => {
            view.month = month;
            let state = usecase.snapshot().await;
            println!("{}", render_calendar(&state, month, today));
        }
        Err(e) => println!("{}", e.to_string().yellow()),
    }
}

/// The main entry point of the journal REPL.
///
/// Conversational turns run in background tasks and report back over a
/// channel, so calendar and entry commands stay responsive while the
/// assistant is thinking.
#[tokio::main]
async fn main() -> Result<()> {
    // ===== Backend Initialization =====
    let base_dir = std::env::var_os(HOME_ENV_VAR).map(PathBuf::from);
    let paths = JournalPaths::new(base_dir.as_deref());
    let _log_guard = init_tracing(&paths.logs_dir()?)?;

    let today = Local::now().date_naive();
    let usecase = bootstrap(&paths, today).await?;

    let (response_tx, mut response_rx) = mpsc::channel::<SendOutcome>(32);
    let response_handler = tokio::spawn(async move {
        while let Some(outcome) = response_rx.recv().await {
            print_outcome(outcome);
        }
    });

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Mindful Journal ===".bright_magenta().bold());
    println!(
        "{}",
        "Talk to your journal, or type /help for commands.".bright_black()
    );
    println!();

    let state = usecase.snapshot().await;
    if let Some(last) = state.chat.last() {
        println!("{}", render_message(last));
        println!();
    }

    let mut view = CalendarView::new(state.selected_date);

    // ===== Main REPL Loop =====
    loop {
        let selected_date = usecase.selected_date().await;
        view.follow(selected_date);
        let prompt = format!("{} >> ", format_date_key(selected_date));
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = match Command::parse(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message.yellow());
                        continue;
                    }
                };

                match command {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Help => println!("{}", help_text().bright_black()),
                    Command::Today => {
                        usecase.select_date(today).await;
                        view = CalendarView::new(today);
                        let entry = usecase.entry_for_selected().await;
                        println!("{}", render_entry(today, entry.as_ref()));
                    }
                    Command::Date(date) => {
                        usecase.select_date(date).await;
                        view = CalendarView::new(date);
                        let entry = usecase.entry_for_selected().await;
                        println!("{}", render_entry(date, entry.as_ref()));
                    }
                    Command::PrevMonth => {
                        show_shifted_month(&usecase, &mut view, -1, today).await;
                    }
                    Command::NextMonth => {
                        show_shifted_month(&usecase, &mut view, 1, today).await;
                    }
                    Command::Calendar => {
                        let state = usecase.snapshot().await;
                        view = CalendarView::new(state.selected_date);
                        println!("{}", render_calendar(&state, view.month, today));
                    }
                    Command::Show => {
                        let date = usecase.selected_date().await;
                        let entry = usecase.entry_for_selected().await;
                        println!("{}", render_entry(date, entry.as_ref()));
                    }
                    Command::Write(text) => {
                        let entry = usecase.save_manual_entry(&text).await;
                        println!("{}", format!("Saved entry for {}.", entry.date).green());
                    }
                    Command::History => {
                        for message in usecase.snapshot().await.chat {
                            println!("{}", render_message(&message));
                        }
                    }
                    Command::Message(text) => {
                        if usecase.is_processing() {
                            print_outcome(SendOutcome::Rejected(RejectReason::Busy));
                            continue;
                        }

                        let tx = response_tx.clone();
                        let usecase = usecase.clone();
                        tokio::spawn(async move {
                            let outcome = usecase.send_message(&text).await;
                            let _ = tx.send(outcome).await;
                        });
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    // Let an in-flight turn finish before exiting.
    drop(response_tx);
    let _ = response_handler.await;

    Ok(())
}
