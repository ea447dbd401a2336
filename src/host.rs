//! Host boundary: what the binding subsystem needs from its environment.
//!
//! The host owns the terminals, editors and assistant panels, draws the
//! quick-pick UI and shows notifications. Everything here is a trait so
//! the subsystem runs against tmux and a console in the binary, and
//! against in-memory fakes in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::destination::{Destination, DestinationKind, EditorRef, Resource, TerminalRef};

/// One row of a quick pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPickItem {
    pub label: String,
    pub description: Option<String>,
}

impl QuickPickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPickOptions {
    pub placeholder: String,
}

impl QuickPickOptions {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }
}

/// Choice and notification primitives.
#[async_trait]
pub trait UiProvider: Send + Sync {
    /// Show `items` and wait for a choice. Returns the chosen index, or
    /// `None` when the user dismissed the pick.
    async fn show_quick_pick(
        &self,
        items: &[QuickPickItem],
        options: &QuickPickOptions,
    ) -> Option<usize>;

    fn show_information_message(&self, text: &str);

    fn show_error_message(&self, text: &str);
}

/// Live view of the host's terminals and editors.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// The terminal that currently has focus, if any.
    async fn active_terminal(&self) -> Option<TerminalRef>;

    /// Terminals eligible for binding, in host order.
    async fn terminals(&self) -> Vec<TerminalRef>;

    /// The editor that currently has focus, if any.
    async fn active_editor(&self) -> Option<EditorRef>;

    /// Number of editor groups in the current layout.
    async fn tab_group_count(&self) -> usize;
}

/// Builds destinations. Every call yields a fresh instance.
pub trait DestinationRegistry: Send + Sync {
    fn create(&self, resource: Resource) -> Destination;

    fn display_names(&self) -> BTreeMap<DestinationKind, String>;

    fn display_name(&self, kind: DestinationKind) -> String {
        self.display_names()
            .remove(&kind)
            .unwrap_or_else(|| kind.to_string())
    }
}
