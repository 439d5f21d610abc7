use crate::{
    Config, Console, Result,
    driver::{Driver, Outcome},
    process::ServerProcess,
    transport::LineTransport,
};
use std::{future::Future, process::ExitStatus};
use tokio::io::{AsyncRead, AsyncWrite};

/// Result of one run against a server
#[derive(Debug)]
pub struct Report {
    pub outcome: Outcome,
    /// Every line written to the server, in order
    pub sent: Vec<String>,
    /// `None` if the server could not be reaped
    pub exit_status: Option<ExitStatus>,
}

/// Runs the elicitation flow, stopping early on Ctrl-C.
pub async fn run(config: &Config, console: &mut Console) -> Result<Report> {
    run_until(config, console, ctrl_c()).await
}

/// Runs the elicitation flow, treating completion of `interrupt` as an operator interrupt.
///
/// The server is terminated and awaited on every path once it has been spawned.
pub async fn run_until<F>(config: &Config, console: &mut Console, interrupt: F) -> Result<Report>
where
    F: Future<Output = ()>,
{
    console.banner("🚀 Starting MCP server...");
    let mut server = ServerProcess::spawn(config)?;

    let (outcome, sent) = match server.take_pipes() {
        Ok((stdout, stdin)) => {
            let transport = LineTransport::new(stdout, stdin).with_read_timeout(config.read_timeout);
            drive(config, console, transport, interrupt).await
        }
        Err(err) => {
            console.failure(&format!("❌ Error: {err}"));
            (Outcome::Failed(err.to_string()), Vec::new())
        }
    };
    tracing::info!(?outcome, sent = sent.len(), "flow finished");

    console.banner("\n🛑 Terminating process...");
    let exit_status = match server.terminate().await {
        Ok(status) => Some(status),
        Err(err) => {
            tracing::warn!(error = %err, "failed to reap server");
            None
        }
    };

    Ok(Report {
        outcome,
        sent,
        exit_status,
    })
}

/// Runs the script over `transport`, racing it against `interrupt`.
///
/// Errors and interrupts are reported on the console and folded into the outcome.
pub async fn drive<R, W, F>(
    config: &Config,
    console: &mut Console,
    transport: LineTransport<R, W>,
    interrupt: F,
) -> (Outcome, Vec<String>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut driver = Driver::new(config, console, transport);
    let result = tokio::select! {
        result = driver.run() => Some(result),
        _ = interrupt => None,
    };
    let sent = driver.sent().to_vec();
    drop(driver);

    let outcome = match result {
        Some(Ok(outcome)) => outcome,
        Some(Err(err)) => {
            tracing::error!(error = %err, "flow aborted");
            console.failure(&format!("❌ Error: {err}"));
            Outcome::Failed(err.to_string())
        }
        None => {
            console.line("\n⏹️  Interrupted by user");
            Outcome::Interrupted
        }
    };
    (outcome, sent)
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
