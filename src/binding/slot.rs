//! The single binding slot.
//!
//! Holds at most one destination. When that destination wraps a native
//! host resource, the slot also remembers the resource's identity so
//! close events can be matched structurally, without going through the
//! destination's own comparator.

use crate::destination::{Destination, DocumentUri, Resource, TerminalId};

/// Identity of the native resource behind a bound destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeRef {
    Terminal(TerminalId),
    Document(DocumentUri),
}

impl NativeRef {
    /// Singleton destinations have nothing to track.
    pub fn of(resource: &Resource) -> Option<Self> {
        match resource {
            Resource::Terminal(terminal) => Some(NativeRef::Terminal(terminal.id().clone())),
            Resource::Editor(editor) => Some(NativeRef::Document(editor.document.clone())),
            Resource::Singleton(_) => None,
        }
    }
}

#[derive(Debug)]
struct Bound {
    destination: Destination,
    native: Option<NativeRef>,
}

/// Empty, or exactly one destination plus its tracked native resource.
#[derive(Debug, Default)]
pub struct BindingSlot {
    bound: Option<Bound>,
}

impl BindingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.bound.as_ref().map(|b| &b.destination)
    }

    pub fn native(&self) -> Option<&NativeRef> {
        self.bound.as_ref().and_then(|b| b.native.as_ref())
    }

    /// Store `destination`, returning whatever was bound before.
    pub fn fill(&mut self, destination: Destination) -> Option<Destination> {
        let native = NativeRef::of(destination.resource());
        self.bound
            .replace(Bound {
                destination,
                native,
            })
            .map(|b| b.destination)
    }

    pub fn take(&mut self) -> Option<Destination> {
        self.bound.take().map(|b| b.destination)
    }

    pub fn tracks_terminal(&self, id: &TerminalId) -> bool {
        matches!(self.native(), Some(NativeRef::Terminal(bound)) if bound == id)
    }

    pub fn tracks_document(&self, uri: &DocumentUri) -> bool {
        matches!(self.native(), Some(NativeRef::Document(bound)) if bound == uri)
    }
}
