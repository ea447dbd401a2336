//! Per-resource identity comparators.
//!
//! Used by [`Destination::equals`](super::Destination::equals) when a
//! destination was built with one. Singleton assistant destinations carry
//! none and fall back to instance identity.

use async_trait::async_trait;

use super::{Destination, Resource};

/// Decides whether `other` points at the same resource as `this`.
#[async_trait]
pub trait DestinationComparator: Send + Sync {
    async fn same_resource(&self, this: &Resource, other: &Destination) -> bool;
}

/// Terminals are the same when their shell process ids match.
///
/// Both ids are resolved concurrently. A terminal whose id cannot be
/// resolved is equal to nothing, including another unresolved terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalComparator;

#[async_trait]
impl DestinationComparator for TerminalComparator {
    async fn same_resource(&self, this: &Resource, other: &Destination) -> bool {
        let (Resource::Terminal(mine), Resource::Terminal(theirs)) = (this, other.resource())
        else {
            return false;
        };

        let (mine_pid, theirs_pid) = futures::join!(mine.process_id(), theirs.process_id());
        match (mine_pid, theirs_pid) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Editors are the same when they show the same document URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorComparator;

#[async_trait]
impl DestinationComparator for EditorComparator {
    async fn same_resource(&self, this: &Resource, other: &Destination) -> bool {
        match (this, other.resource()) {
            (Resource::Editor(mine), Resource::Editor(theirs)) => mine.document == theirs.document,
            _ => false,
        }
    }
}
