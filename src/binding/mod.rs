//! Binding manager: the single "currently bound destination" slot.
//!
//! States are `Unbound` and `Bound(destination)`. Transitions:
//!
//! - `bind` to the kind already bound: no-op, returns `false`.
//! - `bind` to another kind while bound: the candidate is built and its
//!   preconditions checked first, then the user must confirm the
//!   replacement. Declining leaves the old binding untouched.
//! - `unbind`: clears the slot; a second call only reports that nothing
//!   is bound.
//! - Host close events clear the slot only when they name the exact
//!   terminal or document being tracked.
//!
//! Expected failures are reported to the user and returned as `false`;
//! nothing here returns an error. The manager is driven from a single
//! control loop, see [`service`].

pub mod precondition;
pub mod service;
pub mod slot;

use std::sync::Arc;

use crate::destination::{
    AssistantKind, Destination, DestinationKind, DocumentUri, PasteKind, PasteOutcome, Resource,
    TerminalId, TerminalRef,
};
use crate::host::{DestinationRegistry, QuickPickItem, QuickPickOptions, UiProvider, Workspace};
use crate::messages;

use slot::BindingSlot;

/// What to bind. Produced by the picker, or resolved from a bare kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindRequest {
    Terminal(TerminalRef),
    TextEditor,
    Assistant(AssistantKind),
}

impl BindRequest {
    pub fn kind(&self) -> DestinationKind {
        match self {
            BindRequest::Terminal(_) => DestinationKind::Terminal,
            BindRequest::TextEditor => DestinationKind::TextEditor,
            BindRequest::Assistant(assistant) => DestinationKind::Assistant(*assistant),
        }
    }
}

/// Why a bind was refused. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindRefusal {
    #[error("No active terminal. Open a terminal and try again.")]
    NoActiveTerminal,
    #[error("No active text editor. Open a file and try again.")]
    NoActiveEditor,
    #[error("Binding a text editor requires a split layout with at least two editor groups.")]
    NoSplitLayout,
    #[error("Cannot bind a read-only document (scheme \"{scheme}\").")]
    ReadOnlyScheme { scheme: String },
    #[error("Cannot bind a binary file ({file}).")]
    BinaryFile { file: String },
    #[error("{name} is not available.")]
    NotAvailable { name: String },
}

/// Host-side close notifications that may end a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    TerminalClosed(TerminalId),
    DocumentClosed(DocumentUri),
}

/// Owns the binding slot and every transition on it.
pub struct BindingManager {
    slot: BindingSlot,
    registry: Arc<dyn DestinationRegistry>,
    workspace: Arc<dyn Workspace>,
    ui: Arc<dyn UiProvider>,
}

impl BindingManager {
    pub fn new(
        registry: Arc<dyn DestinationRegistry>,
        workspace: Arc<dyn Workspace>,
        ui: Arc<dyn UiProvider>,
    ) -> Self {
        Self {
            slot: BindingSlot::new(),
            registry,
            workspace,
            ui,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_bound()
    }

    pub fn bound_destination(&self) -> Option<&Destination> {
        self.slot.destination()
    }

    /// Bind by kind. Terminals bind to the host's active terminal.
    pub async fn bind(&mut self, kind: DestinationKind) -> bool {
        if self.reject_same_kind(kind) {
            return false;
        }

        let request = match kind {
            DestinationKind::Terminal => match self.workspace.active_terminal().await {
                Some(terminal) => BindRequest::Terminal(terminal),
                None => return self.refuse(BindRefusal::NoActiveTerminal),
            },
            DestinationKind::TextEditor => BindRequest::TextEditor,
            DestinationKind::Assistant(assistant) => BindRequest::Assistant(assistant),
        };

        self.bind_checked(request).await
    }

    /// Bind a specific target, typically one chosen in the picker.
    pub async fn bind_request(&mut self, request: BindRequest) -> bool {
        if self.reject_same_kind(request.kind()) {
            return false;
        }
        self.bind_checked(request).await
    }

    async fn bind_checked(&mut self, request: BindRequest) -> bool {
        let kind = request.kind();

        let resource = match request {
            BindRequest::Terminal(terminal) => Resource::Terminal(terminal),
            BindRequest::TextEditor => {
                let active = self.workspace.active_editor().await;
                let groups = self.workspace.tab_group_count().await;
                match precondition::check_editor(active, groups) {
                    Ok(editor) => Resource::Editor(editor),
                    Err(refusal) => return self.refuse(refusal),
                }
            }
            BindRequest::Assistant(assistant) => Resource::Singleton(assistant),
        };

        let candidate = self.registry.create(resource);

        if matches!(kind, DestinationKind::Assistant(_)) && !candidate.is_available().await {
            return self.refuse(BindRefusal::NotAvailable {
                name: candidate.display_name().to_string(),
            });
        }

        let current = self.slot.destination().map(|d| d.display_name().to_string());
        let replaced = match current {
            Some(current_name) => {
                if !self.confirm_replace(&current_name, candidate.display_name()).await {
                    tracing::debug!(
                        current = %current_name,
                        declined = %kind,
                        "replace declined, binding kept"
                    );
                    return false;
                }
                self.slot.take().map(|old| old.display_name().to_string())
            }
            None => None,
        };

        let name = candidate.display_name().to_string();
        self.slot.fill(candidate);

        match replaced {
            Some(old) => {
                tracing::info!(old = %old, new = %name, kind = %kind, "rebound");
                self.ui.show_information_message(&messages::replaced(&old, &name));
            }
            None => {
                tracing::info!(destination = %name, kind = %kind, "bound");
                self.ui.show_information_message(&messages::bound(&name));
            }
        }
        true
    }

    pub fn unbind(&mut self) {
        match self.slot.take() {
            Some(old) => {
                tracing::info!(destination = %old.display_name(), "unbound");
                self.ui
                    .show_information_message(&messages::unbound(old.display_name()));
            }
            None => {
                self.ui.show_information_message(messages::NOTHING_BOUND);
            }
        }
    }

    /// React to a host close event. Only the exact tracked resource
    /// ends the binding.
    pub fn handle_event(&mut self, event: HostEvent) {
        let notice = match &event {
            HostEvent::TerminalClosed(id) if self.slot.tracks_terminal(id) => {
                messages::TERMINAL_CLOSED
            }
            HostEvent::DocumentClosed(uri) if self.slot.tracks_document(uri) => {
                messages::EDITOR_CLOSED
            }
            HostEvent::TerminalClosed(_) | HostEvent::DocumentClosed(_) => {
                tracing::trace!(?event, "close event for unbound resource");
                return;
            }
        };

        tracing::info!(?event, "bound resource closed, unbinding");
        self.unbind();
        self.ui.show_information_message(notice);
    }

    /// Paste content into the bound destination. `false` when unbound
    /// or when the paste did not succeed.
    pub async fn send_to_destination(&self, text: &str) -> bool {
        self.send(text, PasteKind::Content).await
    }

    pub async fn send_link(&self, link: &str) -> bool {
        self.send(link, PasteKind::Link).await
    }

    pub(crate) async fn send(&self, text: &str, paste_kind: PasteKind) -> bool {
        let Some(destination) = self.slot.destination() else {
            tracing::debug!(paste_kind = ?paste_kind, "send with nothing bound");
            return false;
        };

        let outcome = destination.paste(text, paste_kind).await;
        if outcome != PasteOutcome::Success {
            tracing::warn!(
                destination = %destination.display_name(),
                kind = %destination.kind(),
                outcome = ?outcome,
                details = ?destination.logging_details(),
                "send to destination failed"
            );
        }
        outcome == PasteOutcome::Success
    }

    /// Drop the binding without user-facing notices.
    pub fn dispose(&mut self) {
        if let Some(old) = self.slot.take() {
            tracing::debug!(destination = %old.display_name(), "disposed with binding");
        }
    }

    fn reject_same_kind(&self, kind: DestinationKind) -> bool {
        match self.slot.destination() {
            Some(current) if current.kind() == kind => {
                self.ui
                    .show_information_message(&messages::already_bound(current.display_name()));
                true
            }
            _ => false,
        }
    }

    fn refuse(&self, refusal: BindRefusal) -> bool {
        tracing::debug!(reason = %refusal, "bind refused");
        self.ui.show_error_message(&refusal.to_string());
        false
    }

    async fn confirm_replace(&self, current: &str, new: &str) -> bool {
        let items = [
            QuickPickItem::new(messages::replace_confirm(new)),
            QuickPickItem::new(messages::replace_keep(current)),
        ];
        let options = QuickPickOptions::new(messages::replace_prompt(current, new));
        self.ui.show_quick_pick(&items, &options).await == Some(0)
    }
}
