//! Paste capabilities for a tmux pane.

use std::sync::Arc;

use async_trait::async_trait;

use crate::destination::TerminalId;
use crate::destination::capability::{AvailabilityProbe, FocusManager, TextInserter};

use super::runner::TmuxRunner;

const PASTE_BUFFER: &str = "pastebind";

/// Loads the text into a named buffer and pastes it into the pane.
///
/// `paste-buffer -p` uses bracketed paste when the application asked
/// for it, so multi-line text is not executed line by line by shells.
pub struct PaneInserter {
    pane: TerminalId,
    runner: Arc<dyn TmuxRunner>,
}

impl PaneInserter {
    pub fn new(pane: TerminalId, runner: Arc<dyn TmuxRunner>) -> Self {
        Self { pane, runner }
    }
}

#[async_trait]
impl TextInserter for PaneInserter {
    async fn insert(&self, text: &str) -> bool {
        if let Err(e) = self
            .runner
            .run(&["set-buffer", "-b", PASTE_BUFFER, "--", text])
            .await
        {
            tracing::warn!(pane = %self.pane, error = %e, "set-buffer failed");
            return false;
        }
        match self
            .runner
            .run(&[
                "paste-buffer",
                "-d",
                "-p",
                "-b",
                PASTE_BUFFER,
                "-t",
                self.pane.as_str(),
            ])
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(pane = %self.pane, error = %e, "paste-buffer failed");
                false
            }
        }
    }
}

/// Selects the pane's window, then the pane.
pub struct PaneFocus {
    pane: TerminalId,
    runner: Arc<dyn TmuxRunner>,
}

impl PaneFocus {
    pub fn new(pane: TerminalId, runner: Arc<dyn TmuxRunner>) -> Self {
        Self { pane, runner }
    }
}

#[async_trait]
impl FocusManager for PaneFocus {
    async fn focus(&self) -> bool {
        let target = self.pane.as_str();
        for command in ["select-window", "select-pane"] {
            if let Err(e) = self.runner.run(&[command, "-t", target]).await {
                tracing::debug!(pane = %self.pane, command, error = %e, "focus failed");
                return false;
            }
        }
        true
    }
}

/// A pane is available while tmux can still resolve its id.
pub struct PaneProbe {
    pane: TerminalId,
    runner: Arc<dyn TmuxRunner>,
}

impl PaneProbe {
    pub fn new(pane: TerminalId, runner: Arc<dyn TmuxRunner>) -> Self {
        Self { pane, runner }
    }
}

#[async_trait]
impl AvailabilityProbe for PaneProbe {
    async fn is_available(&self) -> bool {
        match self
            .runner
            .run(&["display-message", "-p", "-t", self.pane.as_str(), "#{pane_id}"])
            .await
        {
            Ok(out) => out.trim() == self.pane.as_str(),
            Err(_) => false,
        }
    }
}
