//! Paste destinations: one value type composed from capability strategies.
//!
//! A [`Destination`] wraps a host resource (a terminal, a text editor, or
//! a singleton assistant panel) together with the strategies that know
//! how to check, focus and insert into it. Every paste funnels through
//! [`Destination::paste`], which runs the steps in a fixed order:
//!
//! 1. availability (short-circuits everything else)
//! 2. eligibility of the unpadded text
//! 3. smart padding, applied once
//! 4. focus, best-effort
//! 5. insertion, whose result is the paste result
//!
//! Destinations are built fresh for every bind and never mutated after
//! construction.

pub mod capability;
pub mod equality;
pub mod padding;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use capability::{
    AlwaysAvailable, AlwaysEligible, AvailabilityProbe, EligibilityChecker, FocusManager,
    NoFocus, TextInserter,
};
use equality::DestinationComparator;

/// Chat-style assistant panels. Exactly one of each exists per host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssistantKind {
    ClaudeCode,
    CursorAi,
    GithubCopilotChat,
}

impl AssistantKind {
    /// Assistants in picker priority order.
    pub const ALL: [AssistantKind; 3] = [
        AssistantKind::ClaudeCode,
        AssistantKind::CursorAi,
        AssistantKind::GithubCopilotChat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssistantKind::ClaudeCode => "claude-code",
            AssistantKind::CursorAi => "cursor-ai",
            AssistantKind::GithubCopilotChat => "github-copilot-chat",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AssistantKind::ClaudeCode => "Claude Code",
            AssistantKind::CursorAi => "Cursor AI",
            AssistantKind::GithubCopilotChat => "GitHub Copilot Chat",
        }
    }
}

/// Closed set of destination kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DestinationKind {
    Assistant(AssistantKind),
    Terminal,
    TextEditor,
}

impl DestinationKind {
    /// Presentation order used by the picker: assistants by priority,
    /// then terminals, then the text editor.
    pub const PICKER_ORDER: [DestinationKind; 5] = [
        DestinationKind::Assistant(AssistantKind::ClaudeCode),
        DestinationKind::Assistant(AssistantKind::CursorAi),
        DestinationKind::Assistant(AssistantKind::GithubCopilotChat),
        DestinationKind::Terminal,
        DestinationKind::TextEditor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DestinationKind::Assistant(a) => a.as_str(),
            DestinationKind::Terminal => "terminal",
            DestinationKind::TextEditor => "text-editor",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a kind name does not match any [`DestinationKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown destination kind: {0:?} (expected one of: claude-code, cursor-ai, github-copilot-chat, terminal, text-editor)")]
pub struct UnknownKind(pub String);

impl FromStr for DestinationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PICKER_ORDER
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Host-assigned terminal identifier (a tmux pane id such as `%3`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(String);

impl TerminalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A terminal owned by the host.
#[async_trait]
pub trait HostTerminal: Send + Sync + fmt::Debug {
    fn id(&self) -> &TerminalId;

    fn name(&self) -> &str;

    /// Resolve the terminal's shell process id. `None` when the
    /// terminal is gone or the host cannot tell.
    async fn process_id(&self) -> Option<u32>;
}

/// Shared handle to a host terminal.
///
/// Two handles are `==` when they name the same terminal id. This is
/// the structural identity used to match close events, not the
/// process-id comparison in [`equality::TerminalComparator`].
#[derive(Debug, Clone)]
pub struct TerminalRef(Arc<dyn HostTerminal>);

impl TerminalRef {
    pub fn new(terminal: impl HostTerminal + 'static) -> Self {
        Self(Arc::new(terminal))
    }

    pub fn id(&self) -> &TerminalId {
        self.0.id()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub async fn process_id(&self) -> Option<u32> {
        self.0.process_id().await
    }
}

impl PartialEq for TerminalRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TerminalRef {}

/// Document URI, e.g. `file:///home/me/src/main.rs` or `untitled:Untitled-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentUri(String);

impl DocumentUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scheme before the first `:`; empty when there is none.
    pub fn scheme(&self) -> &str {
        self.0.split_once(':').map(|(scheme, _)| scheme).unwrap_or("")
    }

    /// Path component with the scheme and any authority stripped.
    pub fn path(&self) -> &str {
        let rest = self.0.split_once(':').map(|(_, rest)| rest).unwrap_or(&self.0);
        match rest.strip_prefix("//") {
            Some(with_authority) => with_authority
                .find('/')
                .map(|i| &with_authority[i..])
                .unwrap_or(""),
            None => rest,
        }
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }
}

impl fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A visible text editor, identified by its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRef {
    pub document: DocumentUri,
}

impl EditorRef {
    pub fn new(document: DocumentUri) -> Self {
        Self { document }
    }
}

/// The host resource a destination writes into.
#[derive(Debug, Clone)]
pub enum Resource {
    Terminal(TerminalRef),
    Editor(EditorRef),
    Singleton(AssistantKind),
}

impl Resource {
    pub fn kind(&self) -> DestinationKind {
        match self {
            Resource::Terminal(_) => DestinationKind::Terminal,
            Resource::Editor(_) => DestinationKind::TextEditor,
            Resource::Singleton(assistant) => DestinationKind::Assistant(*assistant),
        }
    }
}

/// Result of one run of the paste protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    Success,
    Failed,
    NotAvailable,
    NotEligible,
}

/// What is being pasted. Only affects logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteKind {
    Link,
    Content,
}

/// Produces a follow-up hint for the user after a paste, if any.
pub type InstructionFn = Arc<dyn Fn(PasteOutcome) -> Option<String> + Send + Sync>;

/// A bindable paste destination.
///
/// Cloning yields the same logical destination: clones compare equal
/// under the identity fallback of [`Destination::equals`].
#[derive(Clone)]
pub struct Destination {
    resource: Resource,
    display_name: String,
    inserter: Arc<dyn TextInserter>,
    eligibility: Arc<dyn EligibilityChecker>,
    focus: Arc<dyn FocusManager>,
    availability: Arc<dyn AvailabilityProbe>,
    comparator: Option<Arc<dyn DestinationComparator>>,
    instruction: Option<InstructionFn>,
    logging_details: BTreeMap<&'static str, String>,
    identity: Arc<()>,
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("kind", &self.kind())
            .field("display_name", &self.display_name)
            .field("resource", &self.resource)
            .field("logging_details", &self.logging_details)
            .finish_non_exhaustive()
    }
}

impl Destination {
    /// Start building a destination around `resource`. Insertion is the
    /// only mandatory capability; the rest default to permissive
    /// strategies.
    pub fn builder(
        resource: Resource,
        display_name: impl Into<String>,
        inserter: impl TextInserter + 'static,
    ) -> DestinationBuilder {
        DestinationBuilder {
            resource,
            display_name: display_name.into(),
            inserter: Arc::new(inserter),
            eligibility: Arc::new(AlwaysEligible),
            focus: Arc::new(NoFocus),
            availability: Arc::new(AlwaysAvailable),
            comparator: None,
            instruction: None,
            logging_details: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> DestinationKind {
        self.resource.kind()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn logging_details(&self) -> &BTreeMap<&'static str, String> {
        &self.logging_details
    }

    pub async fn is_available(&self) -> bool {
        self.availability.is_available().await
    }

    pub async fn is_eligible_for(&self, text: &str) -> bool {
        self.eligibility.is_eligible(text).await
    }

    pub async fn paste_link(&self, link: &str) -> bool {
        self.paste(link, PasteKind::Link).await == PasteOutcome::Success
    }

    pub async fn paste_content(&self, text: &str) -> bool {
        self.paste(text, PasteKind::Content).await == PasteOutcome::Success
    }

    /// Run the ordered paste protocol and report how it ended.
    pub async fn paste(&self, text: &str, paste_kind: PasteKind) -> PasteOutcome {
        if !self.availability.is_available().await {
            tracing::debug!(
                kind = %self.kind(),
                paste_kind = ?paste_kind,
                "destination not available, paste skipped"
            );
            return PasteOutcome::NotAvailable;
        }

        if !self.eligibility.is_eligible(text).await {
            tracing::debug!(
                kind = %self.kind(),
                paste_kind = ?paste_kind,
                "text not eligible, paste skipped"
            );
            return PasteOutcome::NotEligible;
        }

        let padded = padding::apply_smart_padding(text);

        if !self.focus.focus().await {
            tracing::debug!(kind = %self.kind(), "focus failed, inserting anyway");
        }

        if self.inserter.insert(&padded).await {
            tracing::debug!(
                kind = %self.kind(),
                paste_kind = ?paste_kind,
                bytes = padded.len(),
                "pasted"
            );
            PasteOutcome::Success
        } else {
            tracing::warn!(
                kind = %self.kind(),
                paste_kind = ?paste_kind,
                details = ?self.logging_details,
                "insert failed"
            );
            PasteOutcome::Failed
        }
    }

    /// Bring the destination into view. No-op when it is unavailable.
    pub async fn focus(&self) -> bool {
        if !self.availability.is_available().await {
            return false;
        }
        self.focus.focus().await
    }

    /// Whether `other` refers to the same underlying resource.
    pub async fn equals(&self, other: Option<&Destination>) -> bool {
        let Some(other) = other else {
            return false;
        };
        match &self.comparator {
            Some(comparator) => comparator.same_resource(&self.resource, other).await,
            None => Arc::ptr_eq(&self.identity, &other.identity),
        }
    }

    /// Hint to show the user after a paste. `None` for destinations that
    /// complete the paste on their own.
    pub fn user_instruction(&self, outcome: PasteOutcome) -> Option<String> {
        self.instruction.as_ref().and_then(|f| f(outcome))
    }
}

/// Assembles a [`Destination`]. See [`Destination::builder`].
pub struct DestinationBuilder {
    resource: Resource,
    display_name: String,
    inserter: Arc<dyn TextInserter>,
    eligibility: Arc<dyn EligibilityChecker>,
    focus: Arc<dyn FocusManager>,
    availability: Arc<dyn AvailabilityProbe>,
    comparator: Option<Arc<dyn DestinationComparator>>,
    instruction: Option<InstructionFn>,
    logging_details: BTreeMap<&'static str, String>,
}

impl DestinationBuilder {
    #[must_use]
    pub fn eligibility(mut self, checker: impl EligibilityChecker + 'static) -> Self {
        self.eligibility = Arc::new(checker);
        self
    }

    #[must_use]
    pub fn focus(mut self, focus: impl FocusManager + 'static) -> Self {
        self.focus = Arc::new(focus);
        self
    }

    #[must_use]
    pub fn availability(mut self, probe: impl AvailabilityProbe + 'static) -> Self {
        self.availability = Arc::new(probe);
        self
    }

    #[must_use]
    pub fn comparator(mut self, comparator: impl DestinationComparator + 'static) -> Self {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    #[must_use]
    pub fn instruction(
        mut self,
        f: impl Fn(PasteOutcome) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.instruction = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn detail(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.logging_details.insert(key, value.into());
        self
    }

    pub fn build(self) -> Destination {
        Destination {
            resource: self.resource,
            display_name: self.display_name,
            inserter: self.inserter,
            eligibility: self.eligibility,
            focus: self.focus,
            availability: self.availability,
            comparator: self.comparator,
            instruction: self.instruction,
            logging_details: self.logging_details,
            identity: Arc::new(()),
        }
    }
}
