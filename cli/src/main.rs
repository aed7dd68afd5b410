//! CLI entrypoint for focus-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use panel_application::{
    NoTranscriptStore, RunPanelInput, RunPanelUseCase, SummarizePanelUseCase, TranscriptStore,
};
use panel_domain::{SessionOutcome, TerminalStatus};
use panel_infrastructure::{
    ConfigLoader, FileConfig, JsonPersonaLoader, JsonlTranscriptStore, OpenAiGatewayConfig,
    OpenAiLlmGateway,
};
use panel_presentation::{
    Cli, ConsoleProgress, ConsoleTranscriptListener, OutcomeFormatter, OutputFormat,
    SimpleProgress,
};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting focus-panel");

    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut file_config, &cli);

    let personas = match &file_config.session.personas {
        Some(path) => {
            JsonPersonaLoader::load_participants(path, file_config.session.default_max_turns)?
        }
        None => Vec::new(),
    };
    let session = file_config.to_session_config(personas)?;
    session.validate().context("Invalid panel setup")?;

    // === Dependency Injection ===
    let gateway = Arc::new(OpenAiLlmGateway::new(
        OpenAiGatewayConfig::from_file_config(&file_config.gateway)?,
    ));
    let params = file_config.gateway.execution_params();
    let store = open_transcript_store(&file_config);

    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping the panel");
                token.cancel();
            }
        });
    }

    let text_output = cli.output == OutputFormat::Text;
    let mut use_case = RunPanelUseCase::new(Arc::clone(&gateway))
        .with_transcript_store(store)
        .with_params(params.clone())
        .with_cancellation(token.clone());
    if text_output {
        use_case = use_case.with_listener(Arc::new(ConsoleTranscriptListener::stdout()));
        if !cli.quiet {
            print_header(&session.topic, &session.participant_names(), gateway.model());
        }
    }

    let input = RunPanelInput::new(session);
    let outcome = if cli.quiet {
        use_case.execute(input).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ConsoleProgress::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute_with_progress(input, &SimpleProgress).await?
    };

    let summary = if file_config.summary.enabled && !token.is_cancelled() {
        summarize(gateway, params, token.clone(), &outcome).await
    } else {
        None
    };

    match cli.output {
        OutputFormat::Text => {
            println!("{}", OutcomeFormatter::format(&outcome));
            if let Some(summary) = &summary {
                println!("{}", OutcomeFormatter::format_summary(summary));
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                OutcomeFormatter::format_json(&outcome, summary.as_deref())
            );
        }
    }

    Ok(match outcome.status {
        TerminalStatus::Error => ExitCode::FAILURE,
        TerminalStatus::Cancelled => ExitCode::from(130),
        _ => ExitCode::SUCCESS,
    })
}

/// Install the stderr subscriber and, with `--log-dir`, a rolling file layer.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "focus-panel.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// CLI flags win over every configuration source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(topic) = &cli.topic {
        config.session.topic = Some(topic.clone());
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.session.max_rounds = max_rounds;
    }
    if let Some(max_turns) = cli.max_turns {
        config.session.default_max_turns = max_turns;
    }
    if let Some(personas) = &cli.personas {
        config.session.personas = Some(personas.clone());
    }
    if let Some(path) = &cli.transcript {
        config.transcript.path = path.clone();
        config.transcript.enabled = true;
    }
    if cli.no_transcript {
        config.transcript.enabled = false;
    }
    if let Some(timeout) = cli.timeout {
        config.gateway.timeout_seconds = timeout;
    }
    if cli.no_summary {
        config.summary.enabled = false;
    }
}

/// Open the JSONL store, running without persistence if the file is unusable
fn open_transcript_store(config: &FileConfig) -> Arc<dyn TranscriptStore> {
    if !config.transcript.enabled {
        return Arc::new(NoTranscriptStore);
    }
    match JsonlTranscriptStore::open(&config.transcript.path) {
        Ok(store) => {
            info!("Writing transcript to {}", store.path().display());
            Arc::new(store)
        }
        Err(e) => {
            warn!(
                "Transcript disabled, cannot open {}: {}",
                config.transcript.path.display(),
                e
            );
            Arc::new(NoTranscriptStore)
        }
    }
}

async fn summarize(
    gateway: Arc<OpenAiLlmGateway>,
    params: panel_application::ExecutionParams,
    token: CancellationToken,
    outcome: &SessionOutcome,
) -> Option<String> {
    if outcome.participant_turns() == 0 {
        return None;
    }
    let summarizer = SummarizePanelUseCase::new(gateway)
        .with_params(params)
        .with_cancellation(token);
    match summarizer.execute(&outcome.transcript).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!("Summary skipped: {}", e);
            None
        }
    }
}

fn print_header(topic: &str, participants: &[&str], model: &str) {
    println!();
    println!("+============================================================+");
    println!("|              focus-panel - Virtual Focus Group             |");
    println!("+============================================================+");
    println!();
    println!("Topic: {}", topic);
    println!("Participants: {}", participants.join(", "));
    println!("Model: {}", model);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_flags_override_file_config() {
        let cli = Cli::parse_from([
            "focus-panel",
            "New topic",
            "--max-rounds",
            "5",
            "--max-turns",
            "2",
            "--transcript",
            "out.jsonl",
            "--timeout",
            "30",
            "--no-summary",
        ]);
        let mut config = FileConfig::default();
        config.transcript.enabled = false;

        apply_overrides(&mut config, &cli);

        assert_eq!(config.session.topic.as_deref(), Some("New topic"));
        assert_eq!(config.session.max_rounds, 5);
        assert_eq!(config.session.default_max_turns, 2);
        assert_eq!(config.transcript.path, PathBuf::from("out.jsonl"));
        assert!(config.transcript.enabled);
        assert_eq!(config.gateway.timeout_seconds, 30);
        assert!(!config.summary.enabled);
    }

    #[test]
    fn test_no_flags_keep_file_config() {
        let cli = Cli::parse_from(["focus-panel"]);
        let mut config = FileConfig::default();
        config.session.max_rounds = 9;

        apply_overrides(&mut config, &cli);

        assert_eq!(config.session.max_rounds, 9);
        assert!(config.session.topic.is_none());
        assert!(config.summary.enabled);
    }
}
