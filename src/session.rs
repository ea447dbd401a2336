//! Interactive console session over a tmux server.
//!
//! Lines starting with `:` are commands, everything else is pasted as
//! content into the bound destination. `::text` pastes `:text`.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

use crate::availability::WorkspaceAvailability;
use crate::binding::service::{BindingHandle, spawn_binding_service};
use crate::binding::BindingManager;
use crate::console::ConsoleUi;
use crate::destination::{DestinationKind, PasteKind, PasteOutcome, UnknownKind};
use crate::host::UiProvider;
use crate::messages;
use crate::picker::config::PickerConfig;
use crate::picker::{DestinationPicker, PickOptions, PickResult};
use crate::tmux::{TmuxCommand, TmuxError, TmuxHost, TmuxRunner, spawn_pane_watcher};

const HELP: &str = "\
:pick           choose a destination
:bind <kind>    bind claude-code, cursor-ai, github-copilot-chat, terminal or text-editor
:unbind         drop the current binding
:status         show the bound destination
:link <text>    paste text as a link
:quit           leave
anything else is pasted as content";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Tmux(#[from] TmuxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Pick,
    Bind(DestinationKind),
    Unbind,
    Status,
    Link(String),
    Paste(String),
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command :{0} (try :help)")]
    UnknownCommand(String),
    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Kind(#[from] UnknownKind),
}

pub fn parse_line(line: &str) -> Result<SessionCommand, ParseError> {
    if line.trim().is_empty() {
        return Ok(SessionCommand::Nothing);
    }
    if let Some(escaped) = line.strip_prefix("::") {
        return Ok(SessionCommand::Paste(format!(":{escaped}")));
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(SessionCommand::Paste(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command.trim(), ""),
    };
    match name {
        "pick" => Ok(SessionCommand::Pick),
        "bind" if arg.is_empty() => Err(ParseError::MissingArgument("bind")),
        "bind" => Ok(SessionCommand::Bind(arg.parse()?)),
        "unbind" => Ok(SessionCommand::Unbind),
        "status" => Ok(SessionCommand::Status),
        "link" if arg.is_empty() => Err(ParseError::MissingArgument("link")),
        "link" => Ok(SessionCommand::Link(arg.to_string())),
        "help" => Ok(SessionCommand::Help),
        "quit" | "q" => Ok(SessionCommand::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Settings for [`run_tmux_session`], straight from the command line.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub tmux_bin: String,
    pub socket_name: Option<String>,
    pub max_inline_terminals: Option<f64>,
    pub poll_interval: Duration,
}

/// Wire the binding subsystem to tmux and the console, then run the
/// command loop until `:quit` or end of input.
pub async fn run_tmux_session(config: SessionConfig) -> Result<(), CliError> {
    let runner: Arc<dyn TmuxRunner> =
        Arc::new(TmuxCommand::new(config.tmux_bin).with_socket_name(config.socket_name));
    let host = Arc::new(TmuxHost::new(runner.clone()));
    // Fail early when no server is reachable.
    let panes = host.panes().await?;
    tracing::info!(panes = panes.len(), "connected to tmux");

    let ui = Arc::new(ConsoleUi::stdio());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let watcher = spawn_pane_watcher(runner, config.poll_interval, events_tx);

    let manager = BindingManager::new(host.clone(), host.clone(), ui.clone());
    let (binding, service) = spawn_binding_service(manager, events_rx);

    let availability = Arc::new(WorkspaceAvailability::new(
        host.clone(),
        host,
        PickerConfig::from_setting(config.max_inline_terminals),
    ));
    let picker = DestinationPicker::new(availability, ui.clone());

    let result = Session::new(ui, binding.clone(), picker).run().await;

    binding.dispose().await;
    watcher.abort();
    if let Err(e) = service.await {
        tracing::warn!(error = %e, "binding service ended abnormally");
    }
    result
}

pub struct Session<R> {
    ui: Arc<ConsoleUi<R>>,
    binding: BindingHandle,
    picker: DestinationPicker,
}

impl<R: AsyncBufRead + Unpin + Send> Session<R> {
    pub fn new(ui: Arc<ConsoleUi<R>>, binding: BindingHandle, picker: DestinationPicker) -> Self {
        Self {
            ui,
            binding,
            picker,
        }
    }

    pub async fn run(&self) -> Result<(), CliError> {
        self.ui.show_information_message("Type :help for commands.");
        while let Some(line) = self.ui.read_line("> ").await? {
            let command = match parse_line(&line) {
                Ok(command) => command,
                Err(e) => {
                    self.ui.show_error_message(&e.to_string());
                    continue;
                }
            };
            tracing::debug!(?command, "session command");
            if !self.execute(command).await {
                break;
            }
        }
        Ok(())
    }

    /// Returns false when the session should end.
    async fn execute(&self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Pick => match self.picker.pick(&PickOptions::default()).await {
                PickResult::Selected(request) => {
                    self.binding.bind_request(request).await;
                }
                PickResult::Cancelled | PickResult::NoResource => {}
            },
            SessionCommand::Bind(kind) => {
                self.binding.bind(kind).await;
            }
            SessionCommand::Unbind => self.binding.unbind().await,
            SessionCommand::Status => match self.binding.bound_destination().await {
                Some(destination) => self
                    .ui
                    .show_information_message(&messages::bound(destination.display_name())),
                None => self.ui.show_information_message(messages::NOTHING_BOUND),
            },
            SessionCommand::Link(text) => self.paste(text, PasteKind::Link).await,
            SessionCommand::Paste(text) => self.paste(text, PasteKind::Content).await,
            SessionCommand::Help => self.ui.show_information_message(HELP),
            SessionCommand::Quit => return false,
            SessionCommand::Nothing => {}
        }
        true
    }

    async fn paste(&self, text: String, paste_kind: PasteKind) {
        let Some(destination) = self.binding.bound_destination().await else {
            self.ui.show_error_message(messages::NOTHING_BOUND);
            return;
        };
        let sent = match paste_kind {
            PasteKind::Link => self.binding.send_link(text).await,
            PasteKind::Content => self.binding.send_to_destination(text).await,
        };
        if !sent {
            self.ui
                .show_error_message(&messages::paste_failed(destination.display_name()));
        } else if let Some(hint) = destination.user_instruction(PasteOutcome::Success) {
            self.ui.show_information_message(&hint);
        }
    }
}
