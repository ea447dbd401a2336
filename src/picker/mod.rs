//! Destination picker: two-level interactive selection.
//!
//! The primary pick lists every available destination in a fixed kind
//! order. When there are more terminals than the configured threshold,
//! the extras hide behind an overflow item that opens a secondary pick
//! with the full terminal list. Dismissing the secondary pick returns to
//! the primary one; only dismissing the primary pick cancels.
//!
//! ```text
//! ShowingPrimary   --bindable-->  Selected
//! ShowingPrimary   --dismiss--->  Cancelled
//! ShowingPrimary   --overflow-->  ShowingSecondary
//! ShowingSecondary --bindable-->  Selected
//! ShowingSecondary --dismiss--->  ReturnToPrimary --> ShowingPrimary
//! ```

pub mod config;
pub mod items;

use std::sync::Arc;

use crate::availability::AvailabilityService;
use crate::binding::BindRequest;
use crate::host::{QuickPickItem, QuickPickOptions, UiProvider};
use crate::messages;

use items::{AsQuickPickItem, PickerItem};

/// How a pick ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Selected(BindRequest),
    Cancelled,
    NoResource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOptions {
    pub placeholder: String,
    pub terminal_placeholder: String,
    pub no_resource_message: String,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            placeholder: messages::PICK_DESTINATION.to_string(),
            terminal_placeholder: messages::PICK_TERMINAL.to_string(),
            no_resource_message: messages::NO_DESTINATIONS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerState {
    ShowingPrimary,
    ShowingSecondary,
    ReturnToPrimary,
}

pub struct DestinationPicker {
    availability: Arc<dyn AvailabilityService>,
    ui: Arc<dyn UiProvider>,
}

impl DestinationPicker {
    pub fn new(availability: Arc<dyn AvailabilityService>, ui: Arc<dyn UiProvider>) -> Self {
        Self { availability, ui }
    }

    pub async fn pick(&self, options: &PickOptions) -> PickResult {
        let grouped = self.availability.grouped_destination_items().await;
        if grouped.is_empty() {
            tracing::debug!("no destinations to pick from");
            self.ui.show_information_message(&options.no_resource_message);
            return PickResult::NoResource;
        }

        let primary = grouped.flatten();
        let mut state = PickerState::ShowingPrimary;

        loop {
            state = match state {
                PickerState::ShowingPrimary => {
                    match self.choose(&primary, &options.placeholder).await {
                        None => {
                            tracing::debug!("picker dismissed");
                            return PickResult::Cancelled;
                        }
                        Some(PickerItem::Bindable(item)) => {
                            return PickResult::Selected(item.request.clone());
                        }
                        Some(PickerItem::Overflow(more)) => {
                            tracing::debug!(remaining = more.remaining_count, "opening overflow");
                            PickerState::ShowingSecondary
                        }
                    }
                }
                PickerState::ShowingSecondary => {
                    let terminals = self.availability.terminal_items(None).await;
                    match self.choose(&terminals, &options.terminal_placeholder).await {
                        Some(item) => return PickResult::Selected(item.request.clone()),
                        None => PickerState::ReturnToPrimary,
                    }
                }
                PickerState::ReturnToPrimary => {
                    tracing::debug!("overflow dismissed, back to primary");
                    PickerState::ShowingPrimary
                }
            };
        }
    }

    async fn choose<'a, T: AsQuickPickItem>(
        &self,
        items: &'a [T],
        placeholder: &str,
    ) -> Option<&'a T> {
        let rows: Vec<QuickPickItem> = items.iter().map(AsQuickPickItem::to_quick_pick).collect();
        let index = self
            .ui
            .show_quick_pick(&rows, &QuickPickOptions::new(placeholder))
            .await?;
        let chosen = items.get(index);
        if chosen.is_none() {
            tracing::warn!(index, len = items.len(), "quick pick returned out-of-range index");
        }
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::WorkspaceAvailability;
    use crate::destination::AssistantKind;
    use crate::picker::config::PickerConfig;
    use crate::testing::{CallLog, FakeRegistry, FakeWorkspace, ScriptedUi, fake_terminals};

    struct Fixture {
        picker: DestinationPicker,
        workspace: Arc<FakeWorkspace>,
        registry: Arc<FakeRegistry>,
        ui: Arc<ScriptedUi>,
    }

    fn fixture(threshold: f64) -> Fixture {
        let workspace = Arc::new(FakeWorkspace::default());
        let registry = Arc::new(FakeRegistry::new(CallLog::default()));
        let ui = Arc::new(ScriptedUi::default());
        let availability = Arc::new(WorkspaceAvailability::new(
            workspace.clone(),
            registry.clone(),
            PickerConfig::from_setting(Some(threshold)),
        ));
        Fixture {
            picker: DestinationPicker::new(availability, ui.clone()),
            workspace,
            registry,
            ui,
        }
    }

    #[tokio::test]
    async fn no_destinations_never_shows_picker() {
        let f = fixture(5.0);
        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::NoResource
        );
        assert_eq!(f.ui.pick_count(), 0);
        assert_eq!(f.ui.infos(), vec![messages::NO_DESTINATIONS]);
    }

    #[tokio::test]
    async fn dismiss_primary_cancels() {
        let f = fixture(5.0);
        f.workspace.set_terminals(fake_terminals(2));
        f.ui.push_pick(None);
        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::Cancelled
        );
        assert_eq!(f.ui.pick_count(), 1);
    }

    #[tokio::test]
    async fn select_primary_item() {
        let f = fixture(5.0);
        f.registry.set_available(AssistantKind::ClaudeCode);
        let terminals = fake_terminals(2);
        f.workspace.set_terminals(terminals.clone());

        f.ui.push_pick(Some(2));
        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::Selected(BindRequest::Terminal(terminals[1].clone()))
        );

        f.ui.push_pick(Some(0));
        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::Selected(BindRequest::Assistant(AssistantKind::ClaudeCode))
        );
    }

    #[tokio::test]
    async fn overflow_opens_full_terminal_list() {
        let f = fixture(5.0);
        let terminals = fake_terminals(6);
        f.workspace.set_terminals(terminals.clone());

        f.ui.push_pick(Some(5));
        f.ui.push_pick(Some(5));
        let result = f.picker.pick(&PickOptions::default()).await;
        assert_eq!(
            result,
            PickResult::Selected(BindRequest::Terminal(terminals[5].clone()))
        );

        let shown = f.ui.shown();
        assert_eq!(shown.len(), 2);

        let primary = &shown[0];
        assert_eq!(primary.len(), 6);
        assert_eq!(primary[5].label, messages::MORE_TERMINALS);
        assert_eq!(primary[5].description.as_deref(), Some("1 more"));
        assert!(
            primary[..5]
                .iter()
                .all(|row| row.label != messages::MORE_TERMINALS)
        );

        let secondary = &shown[1];
        assert_eq!(secondary.len(), 6);
        assert!(
            secondary
                .iter()
                .all(|row| row.label != messages::MORE_TERMINALS)
        );
        assert_eq!(
            f.ui.placeholders(),
            vec![messages::PICK_DESTINATION, messages::PICK_TERMINAL]
        );
    }

    #[tokio::test]
    async fn dismissing_overflow_returns_to_primary() {
        let f = fixture(1.0);
        let terminals = fake_terminals(3);
        f.workspace.set_terminals(terminals.clone());

        f.ui.push_pick(Some(1)); // overflow
        f.ui.push_pick(None); // back out of secondary
        f.ui.push_pick(Some(1)); // overflow again
        f.ui.push_pick(None); // back again
        f.ui.push_pick(Some(0)); // inline terminal

        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::Selected(BindRequest::Terminal(terminals[0].clone()))
        );
        assert_eq!(f.ui.pick_count(), 5);
    }

    #[tokio::test]
    async fn dismissing_primary_after_overflow_cancels() {
        let f = fixture(1.0);
        f.workspace.set_terminals(fake_terminals(2));

        f.ui.push_pick(Some(1));
        f.ui.push_pick(None);
        f.ui.push_pick(None);

        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::Cancelled
        );
    }

    #[tokio::test]
    async fn active_terminal_described() {
        let f = fixture(5.0);
        let terminals = fake_terminals(3);
        f.workspace.set_terminals(terminals.clone());
        f.workspace.set_active_terminal(Some(terminals[2].clone()));
        f.ui.push_pick(None);

        f.picker.pick(&PickOptions::default()).await;
        let rows = &f.ui.shown()[0];
        assert_eq!(rows[2].description.as_deref(), Some(messages::ACTIVE));
        assert_eq!(rows[0].description, None);
    }

    #[tokio::test]
    async fn out_of_range_choice_cancels() {
        let f = fixture(5.0);
        f.workspace.set_terminals(fake_terminals(1));
        f.ui.push_pick(Some(9));
        assert_eq!(
            f.picker.pick(&PickOptions::default()).await,
            PickResult::Cancelled
        );
    }

    #[tokio::test]
    async fn custom_no_resource_message() {
        let f = fixture(5.0);
        let options = PickOptions {
            no_resource_message: "Open a terminal first".into(),
            ..PickOptions::default()
        };
        assert_eq!(f.picker.pick(&options).await, PickResult::NoResource);
        assert_eq!(f.ui.infos(), vec!["Open a terminal first"]);
    }

    #[tokio::test]
    async fn primary_order_assistants_terminals_editor() {
        let f = fixture(5.0);
        f.registry.set_available(AssistantKind::CursorAi);
        f.registry.set_available(AssistantKind::ClaudeCode);
        f.workspace.set_terminals(fake_terminals(1));
        f.workspace.set_active_editor(Some("file:///a.rs"));
        f.workspace.set_tab_groups(2);
        f.ui.push_pick(None);

        f.picker.pick(&PickOptions::default()).await;
        let labels: Vec<String> = f.ui.shown()[0].iter().map(|r| r.label.clone()).collect();
        assert_eq!(
            labels,
            vec!["Claude Code", "Cursor AI", "term-0", "Text Editor (a.rs)"]
        );
    }
}
