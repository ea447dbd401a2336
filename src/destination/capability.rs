//! Capability strategies: the swappable parts of a destination.
//!
//! Each trait is a single async operation. Concrete strategies capture
//! their own target (a pane id, a document) at construction, so the
//! [`Destination`](super::Destination) that owns them never needs to know
//! what kind of host it talks to.

use async_trait::async_trait;

/// Writes text into the destination. The returned flag is the paste result.
#[async_trait]
pub trait TextInserter: Send + Sync {
    async fn insert(&self, text: &str) -> bool;
}

/// Decides whether a piece of text may be pasted at all.
#[async_trait]
pub trait EligibilityChecker: Send + Sync {
    async fn is_eligible(&self, text: &str) -> bool;
}

/// Brings the destination into view before insertion. Best-effort.
#[async_trait]
pub trait FocusManager: Send + Sync {
    async fn focus(&self) -> bool;
}

/// Whether the destination can currently receive text.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn is_available(&self) -> bool;
}

/// Accepts every text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEligible;

#[async_trait]
impl EligibilityChecker for AlwaysEligible {
    async fn is_eligible(&self, _text: &str) -> bool {
        true
    }
}

/// Rejects empty and whitespace-only text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonBlank;

#[async_trait]
impl EligibilityChecker for NonBlank {
    async fn is_eligible(&self, text: &str) -> bool {
        !text.trim().is_empty()
    }
}

/// For destinations that are always in view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFocus;

#[async_trait]
impl FocusManager for NoFocus {
    async fn focus(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

#[async_trait]
impl AvailabilityProbe for AlwaysAvailable {
    async fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in for resources the host does not have. Never available, and
/// refuses inserts should one get through anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl AvailabilityProbe for Unsupported {
    async fn is_available(&self) -> bool {
        false
    }
}

#[async_trait]
impl TextInserter for Unsupported {
    async fn insert(&self, _text: &str) -> bool {
        false
    }
}
