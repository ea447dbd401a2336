//! tmux as the host: panes are terminals, and the pane watcher reports
//! closes.
//!
//! tmux has no text editors and no assistant panels. Those resources
//! still get destinations, built on [`Unsupported`], so they are never
//! offered by the picker and any bind attempt is refused as not
//! available.

pub mod capability;
pub mod pane;
pub mod runner;
pub mod watcher;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::destination::capability::{NonBlank, Unsupported};
use crate::destination::equality::{EditorComparator, TerminalComparator};
use crate::destination::{
    AssistantKind, Destination, DestinationKind, EditorRef, PasteOutcome, Resource, TerminalRef,
};
use crate::host::{DestinationRegistry, Workspace};
use crate::messages;

pub use capability::{PaneFocus, PaneInserter, PaneProbe};
pub use pane::{PANE_FORMAT, PaneInfo, TmuxPane, parse_panes};
pub use runner::{TmuxCommand, TmuxRunner};
pub use watcher::spawn_pane_watcher;

#[derive(Debug, thiserror::Error)]
pub enum TmuxError {
    #[error("failed to run tmux: {0}")]
    Io(#[from] std::io::Error),
    #[error("tmux {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },
    #[error("unexpected tmux output: {0}")]
    Parse(String),
}

/// [`Workspace`] and [`DestinationRegistry`] over one tmux server.
#[derive(Clone)]
pub struct TmuxHost {
    runner: Arc<dyn TmuxRunner>,
}

impl TmuxHost {
    pub fn new(runner: Arc<dyn TmuxRunner>) -> Self {
        Self { runner }
    }

    /// All panes of all sessions.
    pub async fn panes(&self) -> Result<Vec<PaneInfo>, TmuxError> {
        let out = self
            .runner
            .run(&["list-panes", "-a", "-F", PANE_FORMAT])
            .await?;
        parse_panes(&out)
    }

    fn terminal(&self, info: &PaneInfo) -> TerminalRef {
        TerminalRef::new(TmuxPane::new(info, self.runner.clone()))
    }

    fn terminal_destination(&self, resource: Resource, terminal: &TerminalRef) -> Destination {
        let pane = terminal.id().clone();
        Destination::builder(
            resource,
            messages::terminal_display_name(terminal.name()),
            PaneInserter::new(pane.clone(), self.runner.clone()),
        )
        .eligibility(NonBlank)
        .focus(PaneFocus::new(pane.clone(), self.runner.clone()))
        .availability(PaneProbe::new(pane.clone(), self.runner.clone()))
        .comparator(TerminalComparator)
        .detail("terminal", terminal.name())
        .detail("pane", pane.as_str())
        .build()
    }
}

#[async_trait]
impl Workspace for TmuxHost {
    async fn active_terminal(&self) -> Option<TerminalRef> {
        match self.panes().await {
            Ok(panes) => panes
                .iter()
                .find(|p| p.focused)
                .map(|p| self.terminal(p)),
            Err(e) => {
                tracing::warn!(error = %e, "listing panes failed");
                None
            }
        }
    }

    async fn terminals(&self) -> Vec<TerminalRef> {
        match self.panes().await {
            Ok(panes) => panes.iter().map(|p| self.terminal(p)).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "listing panes failed");
                Vec::new()
            }
        }
    }

    async fn active_editor(&self) -> Option<EditorRef> {
        None
    }

    async fn tab_group_count(&self) -> usize {
        0
    }
}

impl DestinationRegistry for TmuxHost {
    fn create(&self, resource: Resource) -> Destination {
        match &resource {
            Resource::Terminal(terminal) => {
                let terminal = terminal.clone();
                self.terminal_destination(resource, &terminal)
            }
            Resource::Editor(editor) => {
                let name = messages::editor_display_name(&editor.document);
                let path = editor.document.path().to_string();
                Destination::builder(resource, name, Unsupported)
                    .availability(Unsupported)
                    .comparator(EditorComparator)
                    .detail("editor", path)
                    .build()
            }
            Resource::Singleton(assistant) => assistant_destination(resource.clone(), *assistant),
        }
    }

    fn display_names(&self) -> BTreeMap<DestinationKind, String> {
        let mut names: BTreeMap<DestinationKind, String> = AssistantKind::ALL
            .into_iter()
            .map(|a| (DestinationKind::Assistant(a), a.display_name().to_string()))
            .collect();
        names.insert(DestinationKind::Terminal, "Terminal".to_string());
        names.insert(DestinationKind::TextEditor, "Text Editor".to_string());
        names
    }
}

fn assistant_destination(resource: Resource, assistant: AssistantKind) -> Destination {
    let name = assistant.display_name();
    Destination::builder(resource, name, Unsupported)
        .availability(Unsupported)
        .instruction(move |outcome| match outcome {
            PasteOutcome::Success => Some(messages::paste_hint(name)),
            PasteOutcome::Failed | PasteOutcome::NotAvailable | PasteOutcome::NotEligible => None,
        })
        .detail("assistant", assistant.as_str())
        .build()
}
