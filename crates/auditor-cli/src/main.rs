//! Auditor CLI - Audit engineering specifications with an LLM.

use auditor_cli::cli::{Cli, Command};
use auditor_cli::commands;
use auditor_cli::config::Config;
use auditor_cli::error::Result;
use auditor_cli::output::Formatter;
use auditor_cli::repl;
use auditor_cli::session::open_session;
use auditor_pipeline::OperationRequest;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color_enabled = !cli.no_color;
    if let Err(e) = run(cli).await {
        let formatter = Formatter::new(auditor_cli::config::OutputFormat::Table, color_enabled);
        eprintln!("{}", formatter.failure(&e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    if let Some(preset) = &cli.preset {
        config.apply_preset(preset)?;
    }
    if let Some(model) = &cli.model {
        config.pipeline.model = model.clone();
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command.unwrap_or(Command::Repl) {
        Command::Config(args) => commands::execute_config(args, &config, &config_path, &formatter),
        command => execute(command, &config, &config_path, &formatter, cli.api_key).await,
    }
}

async fn execute(
    command: Command,
    config: &Config,
    config_path: &Path,
    formatter: &Formatter,
    api_key: Option<String>,
) -> Result<()> {
    let mut session = open_session(&config.pipeline, api_key)?;
    let export_dir = &config.settings.export_dir;

    match command {
        Command::Repl => repl::run_repl(&mut session, config, formatter).await,
        Command::Audit(args) => {
            let request = OperationRequest::audit(args.sp, args.lists);
            commands::execute_run(request, args.export, &mut session, formatter, export_dir).await
        }
        Command::Extract(args) => {
            let request = OperationRequest::extraction(args.sp);
            commands::execute_run(request, args.export, &mut session, formatter, export_dir).await
        }
        Command::Check(args) => {
            let request = OperationRequest::drawing_check(args.sp, args.drawings);
            commands::execute_run(request, args.export, &mut session, formatter, export_dir).await
        }
        Command::Ask(args) => commands::execute_ask(args, &mut session, formatter).await,
        Command::Config(args) => commands::execute_config(args, config, config_path, formatter),
    }
}
