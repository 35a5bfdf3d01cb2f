//! tutorbuddy - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tutorbuddy::{
    cli::{Args, Commands, Config},
    conversation::ConversationSession,
    dispatch::ChatClient,
    doctor::Doctor,
    progress::ProgressStore,
    repl::{DisplayManager, ReplConfig, ReplSession},
    tutor::{Mode, Tutor},
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.verbosity().log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let config = Config::load(args.config.as_deref())?
        .with_overrides(args.model.as_deref(), args.progress_file.as_deref());
    config.validate()?;
    Ok(config)
}

/// Build the tutor; fails once, up front, when the API key is missing
fn build_tutor(config: &Config) -> Result<Tutor> {
    let credential = config.credential()?;
    let client = ChatClient::from_config(config, credential)?;
    tracing::debug!(endpoint = %client.endpoint(), model = %config.api.model, "chat client ready");
    Ok(Tutor::new(
        Arc::new(client),
        ProgressStore::new(config.progress_path()),
    ))
}

/// Run interactive REPL mode
async fn run_repl(args: &Args, config: &Config, mode: Mode) -> Result<()> {
    let tutor = build_tutor(config)?;

    let repl_config = ReplConfig {
        mode,
        history_file: Some(config.history_path()),
        show_progress: args.verbosity().show_progress(),
    };
    let mut repl_session = ReplSession::new(
        repl_config,
        ConversationSession::from_config(config),
        tutor.store().clone(),
    )?;

    repl_session.show_welcome(VERSION, &config.api.model);

    loop {
        match repl_session.read_input() {
            Ok(Some(input)) => {
                match repl_session.dispatch_line(&tutor, &input).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => repl_session.display().show_error(&e.to_string()),
                }
            }
            Ok(None) => {
                // EOF (Ctrl-D)
                break;
            }
            Err(e) => {
                if e.to_string().contains("Interrupted") {
                    println!("\nUse /exit to quit gracefully");
                    continue;
                } else {
                    return Err(e);
                }
            }
        }
    }

    tracing::info!(
        answered = repl_session.session().total_answered(),
        "session finished"
    );
    repl_session.save()?;

    Ok(())
}

/// One-shot vocabulary or grammar request
async fn run_once(args: &Args, config: &Config, mode: Mode, input: &str) -> Result<()> {
    let tutor = build_tutor(config)?;
    let mut display = if args.verbosity().show_progress() {
        DisplayManager::new()
    } else {
        DisplayManager::new().without_spinner()
    };

    if !input.trim().is_empty() {
        display.start_waiting("Asking your tutor...");
    }

    let result = match mode {
        Mode::Grammar => tutor.grammar(input).await,
        _ => tutor.vocabulary(input).await,
    };

    match result {
        Ok(lesson) => {
            display.show_response(&lesson.response);
            if let Some(e) = &lesson.save_error {
                display.show_tutor_error(e);
            }
            Ok(())
        }
        Err(e) if e.is_warning() => {
            display.show_tutor_error(&e);
            Ok(())
        }
        Err(e) => {
            display.finish_current();
            Err(e.into())
        }
    }
}

fn show_progress(config: &Config, module: Option<&str>) -> Result<()> {
    let store = ProgressStore::new(config.progress_path());
    let log = store.load()?;
    let records: Vec<_> = match module {
        Some(name) => log.record(name).into_iter().collect(),
        None => log.records(),
    };

    println!(
        "{} {}",
        "Progress file:".bold(),
        store.path().display().to_string().dimmed()
    );
    DisplayManager::new().show_records(&records);
    Ok(())
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("\n{}", "tutorbuddy Configuration".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    let source = match (&args.config, Config::default_path()) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) if path.exists() => path.display().to_string(),
        _ => "built-in defaults".to_string(),
    };
    println!("Source:    {}", source);
    println!("Verbosity: {}\n", args.verbosity().as_str());
    println!("{}", config.to_toml()?);

    Ok(())
}

fn run_doctor(config: &Config) -> Result<()> {
    let doctor = Doctor::new(config);
    let checks = doctor.run_diagnostics();
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = load_config(&args)?;

    match args.command() {
        Commands::Start { mode } => run_repl(&args, &config, mode).await?,
        Commands::Vocab { word } => run_once(&args, &config, Mode::Vocabulary, &word).await?,
        Commands::Grammar { sentence } => {
            run_once(&args, &config, Mode::Grammar, &sentence.join(" ")).await?
        }
        Commands::Progress { module } => show_progress(&config, module.as_deref())?,
        Commands::Config => show_config(&args, &config)?,
        Commands::Doctor => run_doctor(&config)?,
    }

    Ok(())
}
