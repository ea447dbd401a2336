//! Destination availability: what the picker may offer right now.
//!
//! [`WorkspaceAvailability`] snapshots the host on every call: assistants
//! whose destination reports itself available, eligible terminals, and
//! the active editor when it passes every editor bind precondition.

use std::sync::Arc;

use async_trait::async_trait;

use crate::binding::{BindRequest, precondition};
use crate::destination::{AssistantKind, DestinationKind, Resource};
use crate::host::{DestinationRegistry, Workspace};
use crate::messages;
use crate::picker::config::PickerConfig;
use crate::picker::items::{BindableItem, GroupedItems, group_terminals, terminal_items};

/// Supplies picker input.
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Every currently bindable destination, grouped by kind, with the
    /// terminal list truncated behind an overflow item when too long.
    async fn grouped_destination_items(&self) -> GroupedItems;

    /// Eligible terminals, at most `limit` of them.
    async fn terminal_items(&self, limit: Option<usize>) -> Vec<BindableItem>;
}

pub struct WorkspaceAvailability {
    workspace: Arc<dyn Workspace>,
    registry: Arc<dyn DestinationRegistry>,
    config: PickerConfig,
}

impl WorkspaceAvailability {
    pub fn new(
        workspace: Arc<dyn Workspace>,
        registry: Arc<dyn DestinationRegistry>,
        config: PickerConfig,
    ) -> Self {
        Self {
            workspace,
            registry,
            config,
        }
    }

    async fn assistant_item(&self, assistant: AssistantKind) -> Option<BindableItem> {
        let destination = self.registry.create(Resource::Singleton(assistant));
        if !destination.is_available().await {
            return None;
        }
        Some(BindableItem {
            label: destination.display_name().to_string(),
            display_name: destination.display_name().to_string(),
            request: BindRequest::Assistant(assistant),
            is_active: false,
        })
    }

    async fn editor_item(&self) -> Option<BindableItem> {
        let active = self.workspace.active_editor().await;
        let groups = self.workspace.tab_group_count().await;
        let editor = precondition::check_editor(active, groups).ok()?;
        let name = messages::editor_display_name(&editor.document);
        Some(BindableItem {
            label: name.clone(),
            display_name: name,
            request: BindRequest::TextEditor,
            is_active: false,
        })
    }
}

#[async_trait]
impl AvailabilityService for WorkspaceAvailability {
    async fn grouped_destination_items(&self) -> GroupedItems {
        let mut grouped = GroupedItems::new();

        for assistant in AssistantKind::ALL {
            if let Some(item) = self.assistant_item(assistant).await {
                grouped.insert(DestinationKind::Assistant(assistant), vec![item]);
            }
        }

        let terminals = self.workspace.terminals().await;
        let active = self.workspace.active_terminal().await;
        let (inline, more) = group_terminals(
            &terminals,
            active.as_ref(),
            self.config.max_inline_terminals(),
        );
        grouped.insert(DestinationKind::Terminal, inline);
        grouped.set_overflow(more);

        if let Some(item) = self.editor_item().await {
            grouped.insert(DestinationKind::TextEditor, vec![item]);
        }

        tracing::debug!(
            terminals = terminals.len(),
            overflow = grouped.overflow().map(|o| o.remaining_count),
            "destination availability snapshot"
        );
        grouped
    }

    async fn terminal_items(&self, limit: Option<usize>) -> Vec<BindableItem> {
        let terminals = self.workspace.terminals().await;
        let active = self.workspace.active_terminal().await;
        terminal_items(&terminals, active.as_ref(), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallLog, FakeRegistry, FakeWorkspace, fake_terminals};

    fn availability(
        workspace: Arc<FakeWorkspace>,
        registry: Arc<FakeRegistry>,
        threshold: f64,
    ) -> WorkspaceAvailability {
        WorkspaceAvailability::new(
            workspace,
            registry,
            PickerConfig::from_setting(Some(threshold)),
        )
    }

    #[tokio::test]
    async fn empty_workspace_has_no_items() {
        let service = availability(
            Arc::new(FakeWorkspace::default()),
            Arc::new(FakeRegistry::new(CallLog::default())),
            5.0,
        );
        assert!(service.grouped_destination_items().await.is_empty());
    }

    #[tokio::test]
    async fn six_terminals_threshold_five() {
        let workspace = Arc::new(FakeWorkspace::default());
        let terminals = fake_terminals(6);
        workspace.set_terminals(terminals.clone());
        workspace.set_active_terminal(Some(terminals[5].clone()));
        let service = availability(
            workspace,
            Arc::new(FakeRegistry::new(CallLog::default())),
            5.0,
        );

        let grouped = service.grouped_destination_items().await;
        assert_eq!(grouped.get(DestinationKind::Terminal).len(), 5);
        assert_eq!(grouped.overflow().map(|o| o.remaining_count), Some(1));

        let all = service.terminal_items(None).await;
        assert_eq!(all.len(), 6);
        assert!(all[5].is_active);
    }

    #[tokio::test]
    async fn only_available_assistants_listed() {
        let registry = Arc::new(FakeRegistry::new(CallLog::default()));
        registry.set_available(AssistantKind::GithubCopilotChat);
        let service = availability(Arc::new(FakeWorkspace::default()), registry, 5.0);

        let grouped = service.grouped_destination_items().await;
        assert!(
            grouped
                .get(DestinationKind::Assistant(AssistantKind::ClaudeCode))
                .is_empty()
        );
        let copilot = grouped.get(DestinationKind::Assistant(AssistantKind::GithubCopilotChat));
        assert_eq!(copilot.len(), 1);
        assert_eq!(
            copilot[0].request,
            BindRequest::Assistant(AssistantKind::GithubCopilotChat)
        );
    }

    #[tokio::test]
    async fn editor_listed_only_when_bindable() {
        let workspace = Arc::new(FakeWorkspace::default());
        workspace.set_active_editor(Some("file:///src/lib.rs"));
        workspace.set_tab_groups(1);
        let service = availability(
            workspace.clone(),
            Arc::new(FakeRegistry::new(CallLog::default())),
            5.0,
        );
        assert!(service.grouped_destination_items().await.is_empty());

        workspace.set_tab_groups(2);
        let grouped = service.grouped_destination_items().await;
        let editor = grouped.get(DestinationKind::TextEditor);
        assert_eq!(editor.len(), 1);
        assert_eq!(editor[0].label, "Text Editor (lib.rs)");
    }

    #[tokio::test]
    async fn invalid_threshold_uses_default() {
        let workspace = Arc::new(FakeWorkspace::default());
        workspace.set_terminals(fake_terminals(8));
        let service = availability(
            workspace,
            Arc::new(FakeRegistry::new(CallLog::default())),
            0.0,
        );

        let grouped = service.grouped_destination_items().await;
        assert_eq!(grouped.get(DestinationKind::Terminal).len(), 5);
        assert_eq!(grouped.overflow().map(|o| o.remaining_count), Some(3));
    }
}
