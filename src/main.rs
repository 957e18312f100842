use anyhow::Context;
use rocket_log_relay::config::load_settings;
use rocket_log_relay::layer::RelayLayer;
use rocket_log_relay::logging::{init_tracing, log_error};
use rocket_log_relay::{Dispatcher, Level, LogEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config = load_settings().context("failed to load relay configuration")?;
    let dispatcher = Arc::new(Dispatcher::new(config));

    init_tracing(Some(RelayLayer::new(dispatcher.clone())));
    tracing::info!(
        server = %dispatcher.config().server_url,
        channel = %dispatcher.config().channel,
        disabled = dispatcher.config().disabled,
        "Starting Rocket.Chat log relay"
    );

    if let Err(e) = dispatcher.start().await {
        log_error("start_dispatcher", &e);
        return Err(e).context("failed to start dispatcher");
    }

    tokio::select! {
        result = relay_stdin(&dispatcher) => {
            result?;
            tracing::info!("Input closed");
        }
        signal_name = setup_shutdown_handler() => {
            tracing::info!(signal = %signal_name, "Received shutdown signal");
        }
    }

    // flush whatever the worker still holds before the runtime goes away
    if let Err(e) = dispatcher.close().await {
        log_error("close_dispatcher", &e);
    }

    let stats = dispatcher.stats();
    tracing::info!(
        submitted = stats.submitted,
        flushes = stats.flushes,
        delivered = stats.delivered,
        failed_deliveries = stats.failed_deliveries,
        "Relay stopped"
    );
    Ok(())
}

/// Submit every stdin line as a log event
async fn relay_stdin(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no: u64 = 0;

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let (level, message) = parse_line(&line);
        let event = LogEvent::new(level, message)
            .with_field("source", "stdin")
            .with_field("line", line_no);
        dispatcher.submit(event).await?;
    }

    Ok(())
}

/// `"error: disk full"` becomes `(Error, "disk full")`; lines without a
/// recognised level prefix are Info.
fn parse_line(line: &str) -> (Level, &str) {
    if let Some((prefix, rest)) = line.split_once(':') {
        if let Ok(level) = prefix.parse::<Level>() {
            return (level, rest.trim_start());
        }
    }
    (Level::Info, line)
}

/// Wait for SIGINT, SIGTERM or SIGQUIT (Ctrl+C only on non-Unix)
async fn setup_shutdown_handler() -> String {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
        let mut sigquit = signal(SignalKind::quit()).expect("Failed to setup SIGQUIT handler");

        tokio::select! {
            _ = sigint.recv() => "SIGINT (Ctrl+C)".to_string(),
            _ = sigterm.recv() => "SIGTERM".to_string(),
            _ = sigquit.recv() => "SIGQUIT".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        "Ctrl+C".to_string()
    }
}
