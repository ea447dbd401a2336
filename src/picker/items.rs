//! Picker items and their grouping by destination kind.

use std::collections::BTreeMap;

use crate::binding::BindRequest;
use crate::destination::{DestinationKind, TerminalRef};
use crate::host::QuickPickItem;
use crate::messages;

/// An item that binds a destination when chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindableItem {
    pub label: String,
    pub display_name: String,
    pub request: BindRequest,
    pub is_active: bool,
}

impl BindableItem {
    pub fn terminal(terminal: &TerminalRef, is_active: bool) -> Self {
        Self {
            label: terminal.name().to_string(),
            display_name: messages::terminal_display_name(terminal.name()),
            request: BindRequest::Terminal(terminal.clone()),
            is_active,
        }
    }
}

/// Stands in for the terminals that did not fit inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowItem {
    pub label: String,
    pub remaining_count: usize,
}

impl OverflowItem {
    pub fn new(remaining_count: usize) -> Self {
        Self {
            label: messages::MORE_TERMINALS.to_string(),
            remaining_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerItem {
    Bindable(BindableItem),
    Overflow(OverflowItem),
}

/// Anything that can be rendered as a quick-pick row.
pub trait AsQuickPickItem {
    fn to_quick_pick(&self) -> QuickPickItem;
}

impl AsQuickPickItem for BindableItem {
    fn to_quick_pick(&self) -> QuickPickItem {
        let item = QuickPickItem::new(&self.label);
        if self.is_active {
            item.with_description(messages::ACTIVE)
        } else {
            item
        }
    }
}

impl AsQuickPickItem for OverflowItem {
    fn to_quick_pick(&self) -> QuickPickItem {
        QuickPickItem::new(&self.label).with_description(messages::remaining(self.remaining_count))
    }
}

impl AsQuickPickItem for PickerItem {
    fn to_quick_pick(&self) -> QuickPickItem {
        match self {
            PickerItem::Bindable(item) => item.to_quick_pick(),
            PickerItem::Overflow(item) => item.to_quick_pick(),
        }
    }
}

/// Available destinations by kind, plus the optional overflow item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedItems {
    groups: BTreeMap<DestinationKind, Vec<BindableItem>>,
    more: Option<OverflowItem>,
}

impl GroupedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items under `kind`. Empty lists are not stored.
    pub fn insert(&mut self, kind: DestinationKind, items: Vec<BindableItem>) {
        if !items.is_empty() {
            self.groups.entry(kind).or_default().extend(items);
        }
    }

    pub fn set_overflow(&mut self, item: Option<OverflowItem>) {
        self.more = item;
    }

    pub fn get(&self, kind: DestinationKind) -> &[BindableItem] {
        self.groups.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn overflow(&self) -> Option<&OverflowItem> {
        self.more.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.more.is_none()
    }

    /// Flatten in picker order. The overflow item follows the inline
    /// terminals.
    pub fn flatten(&self) -> Vec<PickerItem> {
        let mut items = Vec::new();
        for kind in DestinationKind::PICKER_ORDER {
            items.extend(self.get(kind).iter().cloned().map(PickerItem::Bindable));
            if kind == DestinationKind::Terminal
                && let Some(more) = &self.more
            {
                items.push(PickerItem::Overflow(more.clone()));
            }
        }
        items
    }
}

/// Terminal items with the active one marked, capped at `limit`.
pub fn terminal_items(
    terminals: &[TerminalRef],
    active: Option<&TerminalRef>,
    limit: Option<usize>,
) -> Vec<BindableItem> {
    terminals
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|t| BindableItem::terminal(t, active == Some(t)))
        .collect()
}

/// Split terminals into the inline items and an overflow item for the
/// rest. The overflow item exists only when there are more terminals
/// than `threshold`.
pub fn group_terminals(
    terminals: &[TerminalRef],
    active: Option<&TerminalRef>,
    threshold: usize,
) -> (Vec<BindableItem>, Option<OverflowItem>) {
    let inline = terminal_items(terminals, active, Some(threshold));
    let more = (terminals.len() > threshold).then(|| OverflowItem::new(terminals.len() - threshold));
    (inline, more)
}
