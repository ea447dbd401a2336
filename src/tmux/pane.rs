//! tmux panes as host terminals.

use std::sync::Arc;

use async_trait::async_trait;

use crate::destination::{HostTerminal, TerminalId};

use super::TmuxError;
use super::runner::TmuxRunner;

/// `list-panes` format, one tab-separated pane per line.
pub const PANE_FORMAT: &str = "#{pane_id}\t#{pane_pid}\t#{session_name}\t#{window_index}\t#{pane_index}\t#{pane_current_command}\t#{pane_active}\t#{window_active}\t#{session_attached}";

const PANE_FIELDS: usize = 9;

/// One row of `list-panes -a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneInfo {
    pub id: TerminalId,
    pub pid: Option<u32>,
    pub session: String,
    pub window: u32,
    pub pane: u32,
    pub command: String,
    /// Active pane of the active window of an attached session.
    pub focused: bool,
}

impl PaneInfo {
    /// `session:window.pane (command)`.
    pub fn name(&self) -> String {
        format!(
            "{}:{}.{} ({})",
            self.session, self.window, self.pane, self.command
        )
    }

    /// One line for `pastebind panes`: id, pid, name, active marker.
    pub fn summary(&self) -> String {
        let pid = self.pid.map_or_else(|| "-".to_string(), |p| p.to_string());
        let marker = if self.focused { "  *" } else { "" };
        format!("{}\t{pid}\t{}{marker}", self.id, self.name())
    }
}

pub fn parse_panes(output: &str) -> Result<Vec<PaneInfo>, TmuxError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_pane_line)
        .collect()
}

fn parse_pane_line(line: &str) -> Result<PaneInfo, TmuxError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != PANE_FIELDS {
        return Err(TmuxError::Parse(format!(
            "expected {PANE_FIELDS} fields, got {}: {line:?}",
            fields.len()
        )));
    }

    let number = |value: &str, what: &str| {
        value
            .parse::<u32>()
            .map_err(|_| TmuxError::Parse(format!("bad {what} {value:?} in {line:?}")))
    };

    let flag = |value: &str| value != "0" && !value.is_empty();

    Ok(PaneInfo {
        id: TerminalId::new(fields[0]),
        pid: fields[1].parse().ok(),
        session: fields[2].to_string(),
        window: number(fields[3], "window index")?,
        pane: number(fields[4], "pane index")?,
        command: fields[5].to_string(),
        focused: flag(fields[6]) && flag(fields[7]) && flag(fields[8]),
    })
}

/// A pane handed out as a [`HostTerminal`].
#[derive(Clone)]
pub struct TmuxPane {
    id: TerminalId,
    name: String,
    runner: Arc<dyn TmuxRunner>,
}

impl std::fmt::Debug for TmuxPane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmuxPane")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl TmuxPane {
    pub fn new(info: &PaneInfo, runner: Arc<dyn TmuxRunner>) -> Self {
        Self {
            id: info.id.clone(),
            name: info.name(),
            runner,
        }
    }
}

#[async_trait]
impl HostTerminal for TmuxPane {
    fn id(&self) -> &TerminalId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn process_id(&self) -> Option<u32> {
        match self
            .runner
            .run(&["display-message", "-p", "-t", self.id.as_str(), "#{pane_pid}"])
            .await
        {
            Ok(out) => out.trim().parse().ok(),
            Err(e) => {
                tracing::debug!(pane = %self.id, error = %e, "pane pid lookup failed");
                None
            }
        }
    }
}
