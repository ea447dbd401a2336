//! Test doubles shared across module tests.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::destination::capability::{
    AvailabilityProbe, EligibilityChecker, FocusManager, TextInserter,
};
use crate::destination::equality::{EditorComparator, TerminalComparator};
use crate::destination::{
    AssistantKind, Destination, DestinationKind, DocumentUri, EditorRef, HostTerminal, Resource,
    TerminalId, TerminalRef,
};
use crate::host::{DestinationRegistry, QuickPickItem, QuickPickOptions, UiProvider, Workspace};
use crate::messages;
use crate::tmux::{TmuxError, TmuxRunner};

/// Ordered record of capability calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.0.lock().unwrap().last().cloned()
    }

    /// Entries starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

/// Implements every capability, logging each call.
#[derive(Debug, Clone)]
pub struct RecordingStrategy {
    log: CallLog,
    available: bool,
    eligible: bool,
    focuses: bool,
    inserts: bool,
}

impl RecordingStrategy {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            available: true,
            eligible: true,
            focuses: true,
            inserts: true,
        }
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn eligible(mut self, eligible: bool) -> Self {
        self.eligible = eligible;
        self
    }

    pub fn focuses(mut self, focuses: bool) -> Self {
        self.focuses = focuses;
        self
    }

    pub fn inserts(mut self, inserts: bool) -> Self {
        self.inserts = inserts;
        self
    }
}

#[async_trait]
impl TextInserter for RecordingStrategy {
    async fn insert(&self, text: &str) -> bool {
        self.log.push(format!("insert:{text}"));
        self.inserts
    }
}

#[async_trait]
impl EligibilityChecker for RecordingStrategy {
    async fn is_eligible(&self, text: &str) -> bool {
        self.log.push(format!("eligible:{text}"));
        self.eligible
    }
}

#[async_trait]
impl FocusManager for RecordingStrategy {
    async fn focus(&self) -> bool {
        self.log.push("focus");
        self.focuses
    }
}

#[async_trait]
impl AvailabilityProbe for RecordingStrategy {
    async fn is_available(&self) -> bool {
        self.log.push("available");
        self.available
    }
}

#[derive(Debug)]
struct FakeTerminal {
    id: TerminalId,
    name: String,
    pid: Option<u32>,
    delay: Duration,
}

#[async_trait]
impl HostTerminal for FakeTerminal {
    fn id(&self) -> &TerminalId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn process_id(&self) -> Option<u32> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.pid
    }
}

pub fn fake_terminal(id: &str, name: &str, pid: Option<u32>) -> TerminalRef {
    slow_terminal_named(id, name, pid, Duration::ZERO)
}

/// A terminal whose pid lookup takes `delay`.
pub fn slow_terminal(id: &str, pid: Option<u32>, delay: Duration) -> TerminalRef {
    slow_terminal_named(id, id, pid, delay)
}

fn slow_terminal_named(id: &str, name: &str, pid: Option<u32>, delay: Duration) -> TerminalRef {
    TerminalRef::new(FakeTerminal {
        id: TerminalId::new(id),
        name: name.to_string(),
        pid,
        delay,
    })
}

/// `count` terminals named `term-0`, `term-1`, ...
pub fn fake_terminals(count: usize) -> Vec<TerminalRef> {
    (0..count)
        .map(|i| fake_terminal(&format!("%{i}"), &format!("term-{i}"), Some(1000 + i as u32)))
        .collect()
}

/// Answers quick picks from a script and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedUi {
    picks: Mutex<VecDeque<Option<usize>>>,
    shown: Mutex<Vec<(Vec<QuickPickItem>, String)>>,
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl ScriptedUi {
    /// Queue the answer to the next quick pick. An empty script dismisses.
    pub fn push_pick(&self, choice: Option<usize>) {
        self.picks.lock().unwrap().push_back(choice);
    }

    pub fn pick_count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }

    pub fn shown(&self) -> Vec<Vec<QuickPickItem>> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(items, _)| items.clone())
            .collect()
    }

    pub fn placeholders(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(_, placeholder)| placeholder.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl UiProvider for ScriptedUi {
    async fn show_quick_pick(
        &self,
        items: &[QuickPickItem],
        options: &QuickPickOptions,
    ) -> Option<usize> {
        self.shown
            .lock()
            .unwrap()
            .push((items.to_vec(), options.placeholder.clone()));
        self.picks.lock().unwrap().pop_front().flatten()
    }

    fn show_information_message(&self, text: &str) {
        self.infos.lock().unwrap().push(text.to_string());
    }

    fn show_error_message(&self, text: &str) {
        self.errors.lock().unwrap().push(text.to_string());
    }
}

#[derive(Debug, Default)]
pub struct FakeWorkspace {
    active_terminal: Mutex<Option<TerminalRef>>,
    terminals: Mutex<Vec<TerminalRef>>,
    active_editor: Mutex<Option<EditorRef>>,
    tab_groups: Mutex<usize>,
}

impl FakeWorkspace {
    pub fn set_active_terminal(&self, terminal: Option<TerminalRef>) {
        *self.active_terminal.lock().unwrap() = terminal;
    }

    pub fn set_terminals(&self, terminals: Vec<TerminalRef>) {
        *self.terminals.lock().unwrap() = terminals;
    }

    pub fn set_active_editor(&self, uri: Option<&str>) {
        *self.active_editor.lock().unwrap() = uri.map(|u| EditorRef::new(DocumentUri::new(u)));
    }

    pub fn set_tab_groups(&self, count: usize) {
        *self.tab_groups.lock().unwrap() = count;
    }
}

#[async_trait]
impl Workspace for FakeWorkspace {
    async fn active_terminal(&self) -> Option<TerminalRef> {
        self.active_terminal.lock().unwrap().clone()
    }

    async fn terminals(&self) -> Vec<TerminalRef> {
        self.terminals.lock().unwrap().clone()
    }

    async fn active_editor(&self) -> Option<EditorRef> {
        self.active_editor.lock().unwrap().clone()
    }

    async fn tab_group_count(&self) -> usize {
        *self.tab_groups.lock().unwrap()
    }
}

/// Builds destinations backed by [`RecordingStrategy`] on a shared log.
#[derive(Debug)]
pub struct FakeRegistry {
    log: CallLog,
    available: Mutex<HashSet<AssistantKind>>,
    inserts: Mutex<bool>,
    created: Mutex<usize>,
}

impl FakeRegistry {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            available: Mutex::new(HashSet::new()),
            inserts: Mutex::new(true),
            created: Mutex::new(0),
        }
    }

    pub fn set_available(&self, assistant: AssistantKind) {
        self.available.lock().unwrap().insert(assistant);
    }

    /// Applies to destinations created after the call.
    pub fn set_inserts(&self, inserts: bool) {
        *self.inserts.lock().unwrap() = inserts;
    }

    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }
}

impl DestinationRegistry for FakeRegistry {
    fn create(&self, resource: Resource) -> Destination {
        *self.created.lock().unwrap() += 1;

        let available = match &resource {
            Resource::Singleton(assistant) => self.available.lock().unwrap().contains(assistant),
            Resource::Terminal(_) | Resource::Editor(_) => true,
        };
        let strategy = RecordingStrategy::new(self.log.clone())
            .available(available)
            .inserts(*self.inserts.lock().unwrap());

        let builder = match &resource {
            Resource::Terminal(terminal) => {
                let name = messages::terminal_display_name(terminal.name());
                Destination::builder(resource.clone(), name, strategy.clone())
                    .comparator(TerminalComparator)
            }
            Resource::Editor(editor) => {
                let name = messages::editor_display_name(&editor.document);
                Destination::builder(resource.clone(), name, strategy.clone())
                    .comparator(EditorComparator)
            }
            Resource::Singleton(assistant) => {
                Destination::builder(resource.clone(), assistant.display_name(), strategy.clone())
            }
        };

        builder
            .eligibility(strategy.clone())
            .focus(strategy.clone())
            .availability(strategy)
            .build()
    }

    fn display_names(&self) -> BTreeMap<DestinationKind, String> {
        let mut names: BTreeMap<DestinationKind, String> = AssistantKind::ALL
            .into_iter()
            .map(|a| (DestinationKind::Assistant(a), a.display_name().to_string()))
            .collect();
        names.insert(DestinationKind::Terminal, "Terminal".into());
        names.insert(DestinationKind::TextEditor, "Text Editor".into());
        names
    }
}

/// Answers tmux commands from per-command scripts.
///
/// Each command (its args joined by spaces) has a queue of replies. The
/// last reply repeats once the queue is down to one.
#[derive(Debug, Default)]
pub struct ScriptedTmux {
    replies: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTmux {
    pub fn reply(&self, command: &str, output: &str) {
        self.script(command, Ok(output.to_string()));
    }

    pub fn fail(&self, command: &str, stderr: &str) {
        self.script(command, Err(stderr.to_string()));
    }

    fn script(&self, command: &str, reply: Result<String, String>) {
        self.replies
            .lock()
            .unwrap()
            .entry(command.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TmuxRunner for ScriptedTmux {
    async fn run(&self, args: &[&str]) -> Result<String, TmuxError> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());

        let mut replies = self.replies.lock().unwrap();
        let reply = match replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Ok(out)) => Ok(out),
            Some(Err(stderr)) => Err(TmuxError::CommandFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr,
            }),
            None => Err(TmuxError::CommandFailed {
                command: key,
                stderr: "unscripted command".to_string(),
            }),
        }
    }
}
