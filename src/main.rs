mod cli;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Command, TmuxArgs};
use pastebind::session::{self, CliError, SessionConfig};
use pastebind::tmux::{TmuxCommand, TmuxHost};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            tmux,
            max_inline_terminals,
            poll_interval_ms,
        } => {
            let config = SessionConfig {
                tmux_bin: tmux.tmux_bin,
                socket_name: tmux.socket_name,
                max_inline_terminals,
                poll_interval: Duration::from_millis(poll_interval_ms.max(1)),
            };
            if let Err(e) = session::run_tmux_session(config).await {
                tracing::error!(error = %e, "session failed");
                eprintln!("pastebind run: {e}");
                std::process::exit(1);
            }
        }
        Command::Panes { tmux } => {
            if let Err(e) = list_panes(tmux).await {
                tracing::error!(error = %e, "listing panes failed");
                eprintln!("pastebind panes: {e}");
                std::process::exit(1);
            }
        }
    }
}

async fn list_panes(args: TmuxArgs) -> Result<(), CliError> {
    let runner = TmuxCommand::new(args.tmux_bin).with_socket_name(args.socket_name);
    let host = TmuxHost::new(Arc::new(runner));
    for pane in host.panes().await? {
        println!("{}", pane.summary());
    }
    Ok(())
}
