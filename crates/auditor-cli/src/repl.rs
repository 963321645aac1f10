//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The REPL keeps one pipeline, and therefore one result store, alive for
//! the whole session.

use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::{kind_title, Formatter};
use auditor_domain::traits::{DocumentExtractor, LlmProvider};
use auditor_ingest::{FileType, IngestError};
use auditor_llm::LlmError;
use auditor_pipeline::{OperationRequest, Pipeline, ResultNotice};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};

/// Run the interactive REPL.
pub async fn run_repl<L, D>(pipeline: &mut Pipeline<L, D>, config: &Config, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    D: DocumentExtractor<Error = IngestError>,
{
    println!("{}", formatter.info("Auditor REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = match pipeline.store().active() {
            Some((kind, _)) => format!("auditor [{}]> ", kind),
            None => "auditor> ".to_string(),
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, pipeline, config, formatter).await {
                            eprintln!("{}", formatter.failure(&e));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    Status,
    Clear,
    Show,
    Export(Option<PathBuf>),
    Run(OperationRequest),
    Ask { documents: Vec<PathBuf>, question: String },
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    let args = &parts[1..];
    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "status" => Ok(ReplCommand::Status),
        "clear" => Ok(ReplCommand::Clear),
        "show" => Ok(ReplCommand::Show),
        "export" => Ok(ReplCommand::Export(args.first().map(PathBuf::from))),
        "audit" => {
            let (sp, lists) = split_sp(args, "Usage: audit <sp.docx> <list.xlsx|csv> [more lists]")?;
            Ok(ReplCommand::Run(OperationRequest::audit(sp, lists)))
        }
        "extract" => {
            if args.len() != 1 {
                return Err(CliError::InvalidInput("Usage: extract <sp.docx>".to_string()));
            }
            Ok(ReplCommand::Run(OperationRequest::extraction(args[0])))
        }
        "check" => {
            let (sp, drawings) = split_sp(args, "Usage: check <sp.docx> <drawing.pdf> [more drawings]")?;
            Ok(ReplCommand::Run(OperationRequest::drawing_check(sp, drawings)))
        }
        "ask" => parse_ask_command(args),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

/// First argument is the SP, the rest are supporting files (at least one).
fn split_sp(args: &[&str], usage: &str) -> Result<(PathBuf, Vec<PathBuf>)> {
    match args {
        [sp, rest @ ..] if !rest.is_empty() => Ok((PathBuf::from(sp), rest.iter().map(PathBuf::from).collect())),
        _ => Err(CliError::InvalidInput(usage.to_string())),
    }
}

/// Leading arguments with a known document extension are the context; the
/// remainder is the question.
fn parse_ask_command(args: &[&str]) -> Result<ReplCommand> {
    let split = args
        .iter()
        .position(|arg| FileType::from_path(Path::new(arg)) == FileType::Unknown)
        .unwrap_or(args.len());
    let (files, words) = args.split_at(split);

    if files.is_empty() || words.is_empty() {
        return Err(CliError::InvalidInput("Usage: ask <file> [more files] <question>".to_string()));
    }

    Ok(ReplCommand::Ask {
        documents: files.iter().map(PathBuf::from).collect(),
        question: words.join(" "),
    })
}

/// Execute a REPL command.
async fn execute_repl_command<L, D>(
    cmd: ReplCommand,
    pipeline: &mut Pipeline<L, D>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()>
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    D: DocumentExtractor<Error = IngestError>,
{
    match cmd {
        ReplCommand::Run(request) => {
            commands::execute_run(request, false, pipeline, formatter, &config.settings.export_dir).await?;
        }
        ReplCommand::Ask { documents, question } => {
            commands::execute_ask(crate::cli::AskArgs { documents, question }, pipeline, formatter).await?;
        }
        ReplCommand::Show => {
            commands::execute_show(pipeline.store(), formatter)?;
        }
        ReplCommand::Export(dir) => {
            let dir = dir.unwrap_or_else(|| config.settings.export_dir.clone());
            commands::execute_export(pipeline.store(), &dir, formatter)?;
        }
        ReplCommand::Clear => {
            pipeline.reset();
            println!("{}", formatter.success("Results cleared"));
        }
        ReplCommand::Status => {
            println!("{}", status_line(pipeline));
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }
    Ok(())
}

fn status_line<L, D>(pipeline: &Pipeline<L, D>) -> String
where
    L: LlmProvider<Error = LlmError> + Send + Sync + 'static,
    D: DocumentExtractor<Error = IngestError>,
{
    let active = match pipeline.store().active() {
        Some((kind, result)) => {
            let records = match ResultNotice::of(result) {
                ResultNotice::Records(n) => format!("{} record(s)", n),
                ResultNotice::NoFindings => "no findings".to_string(),
                ResultNotice::NoStructuredData => "report only".to_string(),
            };
            format!("{} ({}, run {})", kind_title(kind), records, result.run_id)
        }
        None => "none".to_string(),
    };
    format!(
        "model: {}\nstate: {}\nmax input: {} chars\ntimeout: {}s\nactive result: {}",
        pipeline.model_name(),
        pipeline.state(),
        pipeline.config().max_input_chars,
        pipeline.config().llm_timeout_secs,
        active
    )
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  audit <sp.docx> <list> [list...]    - Audit the SP against engineering lists (.csv/.xlsx)");
    println!("  extract <sp.docx>                   - Extract a consolidated bill of materials");
    println!("  check <sp.docx> <pdf> [pdf...]      - Cross-check the SP against drawings");
    println!("  ask <file> [file...] <question>     - Ask a question about documents");
    println!("  show                                - Show the active result");
    println!("  export [dir]                        - Export the active result (.md and .csv)");
    println!("  clear                               - Clear all results");
    println!("  status                              - Show model, state and active result");
    println!("  help, ?                             - Show this help");
    println!("  exit, quit, q                       - Exit REPL");
    println!();
    println!("  Paths must not contain spaces. Starting an operation replaces the previous result.");
    println!();
}
