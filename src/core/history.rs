//! Timestamped record of everything the console did.
//!
//! [`HistoryLog`] is a cheap cloneable handle; all clones share one log.
//! Observers are invoked synchronously, after the internal lock is released,
//! so an observer may read the log it is observing.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use bevy::log::{error, info, warn};

/// Log target used when entries are mirrored to the application log.
pub const HISTORY_LOG_TARGET: &str = "console_history";

/// Classification of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Echo of a submitted line.
    Submit,
    /// Value produced by a command.
    Result,
    /// Unknown command or rejected input.
    Warning,
    /// A recognized command failed.
    Error,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::Submit => "submit",
            EntryKind::Result => "result",
            EntryKind::Warning => "warning",
            EntryKind::Error => "error",
        })
    }
}

/// One line of the history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub text: String,
    pub kind: EntryKind,
    pub timestamp: SystemTime,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            timestamp: SystemTime::now(),
        }
    }
}

/// Handle returned by the `on_*` methods, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type SubmissionObserver = Arc<dyn Fn(&str) + Send + Sync>;
type EntryObserver = Arc<dyn Fn(&HistoryEntry) + Send + Sync>;
type ClearObserver = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct HistoryState {
    commands: Vec<String>,
    results: Vec<String>,
    entries: Vec<HistoryEntry>,
    on_submission: Vec<(ObserverId, SubmissionObserver)>,
    on_entry: Vec<(ObserverId, EntryObserver)>,
    on_clear: Vec<(ObserverId, ClearObserver)>,
    next_observer: u64,
    mirror_to_log: bool,
}

impl HistoryState {
    fn next_id(&mut self) -> ObserverId {
        self.next_observer += 1;
        ObserverId(self.next_observer)
    }
}

/// Append-only session history.
///
/// # Examples
///
/// ```
/// use bevy_command_console::core::{EntryKind, HistoryLog};
///
/// let history = HistoryLog::default();
/// history.record_submission("time");
/// history.push(EntryKind::Result, "time = 12:00:00");
///
/// assert_eq!(history.last_command().as_deref(), Some("time"));
/// assert_eq!(history.latest_result().as_deref(), Some("time = 12:00:00"));
/// assert_eq!(history.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct HistoryLog {
    state: Arc<Mutex<HistoryState>>,
}

impl HistoryLog {
    /// Create an empty log, optionally mirroring entries to the application log.
    pub fn new(mirror_to_log: bool) -> Self {
        let log = Self::default();
        log.lock().mirror_to_log = mirror_to_log;
        log
    }

    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        // A panicking observer must not take the log down with it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a submitted line and its `Submit` entry.
    ///
    /// Submission observers run before the entry observers.
    pub fn record_submission(&self, line: &str) {
        let observers: Vec<_> = {
            let mut state = self.lock();
            state.commands.push(line.to_string());
            state.on_submission.iter().map(|(_, f)| f.clone()).collect()
        };
        for observer in observers {
            observer(line);
        }
        self.push(EntryKind::Submit, line);
    }

    /// Append an entry.
    pub fn push(&self, kind: EntryKind, text: impl Into<String>) {
        let entry = HistoryEntry::new(kind, text);

        let (observers, mirror) = {
            let mut state = self.lock();
            if kind == EntryKind::Result {
                state.results.push(entry.text.clone());
            }
            state.entries.push(entry.clone());
            let observers: Vec<_> = state.on_entry.iter().map(|(_, f)| f.clone()).collect();
            (observers, state.mirror_to_log)
        };

        if mirror {
            match kind {
                EntryKind::Submit => info!(target: HISTORY_LOG_TARGET, "> {}", entry.text),
                EntryKind::Result => info!(target: HISTORY_LOG_TARGET, "{}", entry.text),
                EntryKind::Warning => warn!(target: HISTORY_LOG_TARGET, "{}", entry.text),
                EntryKind::Error => error!(target: HISTORY_LOG_TARGET, "{}", entry.text),
            }
        }

        for observer in observers {
            observer(&entry);
        }
    }

    /// Empty commands, results and entries.
    pub fn clear(&self) {
        let observers: Vec<_> = {
            let mut state = self.lock();
            state.commands.clear();
            state.results.clear();
            state.entries.clear();
            state.on_clear.iter().map(|(_, f)| f.clone()).collect()
        };
        for observer in observers {
            observer();
        }
    }

    /// Snapshot of all submitted lines.
    pub fn commands(&self) -> Vec<String> {
        self.lock().commands.clone()
    }

    /// Snapshot of all result texts.
    pub fn results(&self) -> Vec<String> {
        self.lock().results.clone()
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// The most recently submitted line.
    pub fn last_command(&self) -> Option<String> {
        self.lock().commands.last().cloned()
    }

    /// The most recent result text.
    pub fn latest_result(&self) -> Option<String> {
        self.lock().results.last().cloned()
    }

    /// Observe every submitted line.
    pub fn on_submission(&self, f: impl Fn(&str) + Send + Sync + 'static) -> ObserverId {
        let mut state = self.lock();
        let id = state.next_id();
        state.on_submission.push((id, Arc::new(f)));
        id
    }

    /// Observe every new entry.
    pub fn on_entry(&self, f: impl Fn(&HistoryEntry) + Send + Sync + 'static) -> ObserverId {
        let mut state = self.lock();
        let id = state.next_id();
        state.on_entry.push((id, Arc::new(f)));
        id
    }

    /// Observe [`clear`](Self::clear).
    pub fn on_clear(&self, f: impl Fn() + Send + Sync + 'static) -> ObserverId {
        let mut state = self.lock();
        let id = state.next_id();
        state.on_clear.push((id, Arc::new(f)));
        id
    }

    /// Remove an observer. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut state = self.lock();
        let before =
            state.on_submission.len() + state.on_entry.len() + state.on_clear.len();
        state.on_submission.retain(|(i, _)| *i != id);
        state.on_entry.retain(|(i, _)| *i != id);
        state.on_clear.retain(|(i, _)| *i != id);
        before != state.on_submission.len() + state.on_entry.len() + state.on_clear.len()
    }
}

impl fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("HistoryLog")
            .field("commands", &state.commands.len())
            .field("results", &state.results.len())
            .field("entries", &state.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let history = HistoryLog::default();
        history.record_submission("log hi");
        history.push(EntryKind::Result, "log(hi) = hi");
        history.push(EntryKind::Warning, "careful");

        assert_eq!(history.commands(), vec!["log hi"]);
        assert_eq!(history.results(), vec!["log(hi) = hi"]);
        let kinds: Vec<_> = history.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Submit, EntryKind::Result, EntryKind::Warning]);
        assert_eq!(history.entries()[0].text, "log hi");
    }

    #[test]
    fn test_clear_empties_everything() {
        let history = HistoryLog::default();
        history.record_submission("time");
        history.push(EntryKind::Result, "time = 00:00:00");

        history.clear();
        assert!(history.commands().is_empty());
        assert!(history.results().is_empty());
        assert!(history.is_empty());
        assert_eq!(history.last_command(), None);
        assert_eq!(history.latest_result(), None);
    }

    #[test]
    fn test_submission_notified_before_entry() {
        let history = HistoryLog::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        let sink = order.clone();
        history.on_entry(move |entry| sink.lock().unwrap().push(format!("entry:{}", entry.text)));
        let sink = order.clone();
        history.on_submission(move |line| sink.lock().unwrap().push(format!("submit:{}", line)));

        history.record_submission("quit");
        assert_eq!(*order.lock().unwrap(), vec!["submit:quit", "entry:quit"]);
    }

    #[test]
    fn test_observer_can_read_log() {
        let history = HistoryLog::default();
        let seen = Arc::new(Mutex::new(0));

        let (log, sink) = (history.clone(), seen.clone());
        history.on_entry(move |_| *sink.lock().unwrap() = log.len());

        history.push(EntryKind::Error, "boom");
        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let history = HistoryLog::default();
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        let id = history.on_entry(move |_| *sink.lock().unwrap() += 1);

        history.push(EntryKind::Result, "one");
        assert!(history.unsubscribe(id));
        assert!(!history.unsubscribe(id));
        history.push(EntryKind::Result, "two");
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_clear_observer() {
        let history = HistoryLog::new(false);
        let cleared = Arc::new(Mutex::new(false));
        let sink = cleared.clone();
        history.on_clear(move || *sink.lock().unwrap() = true);

        history.clear();
        assert!(*cleared.lock().unwrap());
    }
}
