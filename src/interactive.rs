//! Interactive terminal session.
//!
//! Plain input lines are appended to the staged text. Lines starting with
//! ':' are commands mapped onto session actions.

use crate::analysis;
use crate::cli::OutputFormat;
use crate::client::{Classifier, HistoryStore};
use crate::progress;
use crate::report;
use crate::session::Session;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Type text to add it to the input. Commands:
  :analyze        classify every non-blank line
  :save           ask the service to save its history
  :clear          reset the input, results and messages
  :load <path>    replace the input with a file's content
  :history        show the history recorded by the service
  :show           print the current input and report
  :help           show this help
  :quit           leave the session";

/// A parsed line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Append(String),
    Analyze,
    Save,
    Clear,
    Load(PathBuf),
    History,
    Show,
    Help,
    Quit,
}

/// Parse one line of interactive input.
pub fn parse_command(input: &str) -> Result<Command, String> {
    let Some(command) = input.trim_end().strip_prefix(':') else {
        return Ok(Command::Append(input.to_string()));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "analyze" | "a" => Ok(Command::Analyze),
        "save" | "s" => Ok(Command::Save),
        "clear" | "c" => Ok(Command::Clear),
        "load" | "l" if !rest.is_empty() => Ok(Command::Load(PathBuf::from(rest))),
        "load" | "l" => Err("Usage: :load <path>".to_string()),
        "history" | "h" => Ok(Command::History),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command ':{}' (type :help)", other)),
    }
}

/// Append a line to the staged text.
fn appended(staged: &str, line: &str) -> String {
    if staged.is_empty() {
        line.to_string()
    } else {
        format!("{}\n{}", staged, line)
    }
}

/// Read one line of input, decoding invalid UTF-8 lossily.
///
/// Returns `None` at end of input. The line ending is stripped.
async fn read_input<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(&buf[..]);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Run the interactive loop on stdin until `:quit` or end of input.
pub async fn run<C, P>(session: &mut Session<C, P>, format: OutputFormat, quiet: bool) -> Result<()>
where
    C: Classifier,
    P: HistoryStore,
{
    let mut stdin = BufReader::new(tokio::io::stdin());
    run_with_input(session, &mut stdin, format, quiet).await
}

async fn run_with_input<C, P, R>(
    session: &mut Session<C, P>,
    reader: &mut R,
    format: OutputFormat,
    quiet: bool,
) -> Result<()>
where
    C: Classifier,
    P: HistoryStore,
    R: AsyncBufRead + Unpin,
{
    if !quiet {
        println!("{}", HELP);
    }

    let mut buf = Vec::new();
    prompt();

    while let Some(input) = read_input(reader, &mut buf).await? {
        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message);
                prompt();
                continue;
            }
        };
        debug!("Interactive command: {:?}", command);

        match command {
            Command::Append(line) => {
                let text = appended(&session.state().staged_text, &line);
                session.set_text(text);
            }
            Command::Analyze => {
                let bar = progress::track_analysis(session.subscribe(), quiet);
                if session.analyze().await.is_ok() {
                    let _ = bar.await;
                } else {
                    bar.abort();
                }
                debug!("Session is now {}", session.presentation());
                print!("{}", report::render_view(&session.view()));
            }
            Command::Save => {
                // Outcome lands in the view either way.
                let _ = session.save().await;
                print!("{}", report::render_view(&session.view()));
            }
            Command::Clear => {
                session.clear();
                println!("Cleared.");
            }
            Command::Load(path) => match session.load_file(&path).await {
                Ok(()) => println!(
                    "Loaded {} ({} lines)",
                    path.display(),
                    session.state().staged_text.lines().count()
                ),
                Err(e) => eprintln!("{}", e),
            },
            Command::History => match session.history().await {
                Ok(entries) => print!("{}", report::generate_history_text(&entries)),
                Err(e) => eprintln!("{}", e),
            },
            Command::Show => show(session, format)?,
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }

        prompt();
    }

    Ok(())
}

fn show<C, P>(session: &Session<C, P>, format: OutputFormat) -> Result<()>
where
    C: Classifier,
    P: HistoryStore,
{
    let staged = &session.state().staged_text;
    if staged.is_empty() {
        println!("(no input)");
    } else {
        println!("Input:\n{}\n", staged);
    }

    match session.report() {
        Some(current) => {
            print!("{}", report::render_report(current, format)?);
            if format == OutputFormat::Text {
                println!("\n{}", analysis::generate_summary_text(&current.summary));
            }
        }
        None => print!("{}", report::render_view(&session.view())),
    }
    Ok(())
}
