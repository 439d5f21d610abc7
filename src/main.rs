use clap::Parser;
use elicitation_driver::{Config, Console, DEFAULT_SERVER_PATH, types::ElicitAction};
use std::{io::IsTerminal, path::PathBuf, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exercise an MCP server's elicitation flow over stdio
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// MCP server executable
    #[arg(long, default_value = DEFAULT_SERVER_PATH)]
    server: PathBuf,

    /// Chat id supplied when the server asks for it
    #[arg(long)]
    chat_id: Option<String>,

    /// Text of the message sent without a chat id
    #[arg(long)]
    text: Option<String>,

    /// Tool to call
    #[arg(long)]
    tool: Option<String>,

    /// Answer given to the elicitation request
    #[arg(long, value_enum, default_value_t = ElicitAction::Accept)]
    action: ElicitAction,

    /// Pause before reading the elicitation request
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    /// Give up on a read after this long (blocks forever when unset)
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Arguments passed to the server
    #[arg(last = true)]
    server_args: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new()
            .with_server(self.server)
            .with_server_args(self.server_args)
            .with_elicitation_action(self.action)
            .with_elicitation_delay(Duration::from_millis(self.delay_ms));
        if let Some(chat_id) = self.chat_id {
            config = config.with_chat_id(chat_id);
        }
        if let Some(text) = self.text {
            config = config.with_message_text(text);
        }
        if let Some(tool) = self.tool {
            config = config.with_tool_name(tool);
        }
        if let Some(ms) = self.read_timeout_ms {
            config = config.with_read_timeout(Duration::from_millis(ms));
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // stdout carries the operator trace, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stdout().is_terminal();
    let config = cli.into_config();
    tracing::debug!(?config, "starting");

    let mut console = Console::stdout(color);
    let report = elicitation_driver::run(&config, &mut console).await?;
    tracing::info!(success = report.outcome.is_success(), status = ?report.exit_status, "done");

    Ok(())
}
