use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pastebind", about = "Bind a paste destination and send text to it")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an interactive session against a tmux server
    Run {
        #[command(flatten)]
        tmux: TmuxArgs,

        /// Terminals listed inline before the "More terminals..." entry
        #[arg(long, allow_negative_numbers = true)]
        max_inline_terminals: Option<f64>,

        /// How often to check for closed panes, in milliseconds
        #[arg(long, default_value_t = 500)]
        poll_interval_ms: u64,
    },

    /// List the panes a session would offer
    Panes {
        #[command(flatten)]
        tmux: TmuxArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TmuxArgs {
    /// tmux binary
    #[arg(long, default_value = "tmux")]
    pub tmux_bin: String,

    /// tmux server socket name (passed as -L)
    #[arg(long)]
    pub socket_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["pastebind", "run"]).unwrap();
        let Command::Run {
            tmux,
            max_inline_terminals,
            poll_interval_ms,
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(tmux.tmux_bin, "tmux");
        assert!(tmux.socket_name.is_none());
        assert!(max_inline_terminals.is_none());
        assert_eq!(poll_interval_ms, 500);
    }

    #[test]
    fn run_accepts_odd_thresholds() {
        // Parsed as-is; the picker config applies the fallback.
        for raw in ["2.7", "-3", "NaN"] {
            let cli =
                Cli::try_parse_from(["pastebind", "run", "--max-inline-terminals", raw]).unwrap();
            let Command::Run {
                max_inline_terminals,
                ..
            } = cli.command
            else {
                panic!("expected run");
            };
            assert!(max_inline_terminals.is_some(), "{raw}");
        }
    }

    #[test]
    fn panes_with_socket() {
        let cli = Cli::try_parse_from(["pastebind", "panes", "--socket-name", "work"]).unwrap();
        let Command::Panes { tmux } = cli.command else {
            panic!("expected panes");
        };
        assert_eq!(tmux.socket_name.as_deref(), Some("work"));
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["pastebind", "serve"]).is_err());
    }
}
