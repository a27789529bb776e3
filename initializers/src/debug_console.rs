//! In-process debug console.
//!
//! [`DebugConsole`] is an ambient facility: a bounded buffer of recent
//! `tracing` events that anything holding the ambient state can inspect. The
//! host composes [`DebugConsole::layer`] into its subscriber up front; the layer
//! records nothing until the console is attached by the initializer.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use plinth_config::DebugConsoleConfig;
use plinth_core::{Ambient, InitializerError, InitializerName};
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

pub const NAME: InitializerName = InitializerName::new("debug_console");

pub const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("debug console capacity must be greater than zero")]
    ZeroCapacity,
    #[error("debug console is already attached")]
    AlreadyAttached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5} {}: {}", self.level, self.target, self.message)
    }
}

#[derive(Debug)]
struct Buffer {
    capacity: usize,
    entries: VecDeque<ConsoleEntry>,
    dropped: u64,
}

#[derive(Debug, Default)]
enum ConsoleState {
    #[default]
    Detached,
    Attached(Buffer),
}

/// Cloneable handle to the console buffer.
#[derive(Debug, Clone, Default)]
pub struct DebugConsole {
    state: Arc<Mutex<ConsoleState>>,
}

impl DebugConsole {
    /// A detached console. Its layer is inert until [`attach`](Self::attach).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, capacity: usize) -> Result<(), ConsoleError> {
        if capacity == 0 {
            return Err(ConsoleError::ZeroCapacity);
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, ConsoleState::Attached(_)) {
            return Err(ConsoleError::AlreadyAttached);
        }
        *state = ConsoleState::Attached(Buffer {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            dropped: 0,
        });
        Ok(())
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, ConsoleState::Attached(_))
    }

    /// Append an entry, evicting the oldest when full. Ignored while detached.
    pub fn record(&self, entry: ConsoleEntry) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let ConsoleState::Attached(buffer) = &mut *state {
            if buffer.entries.len() == buffer.capacity {
                buffer.entries.pop_front();
                buffer.dropped += 1;
            }
            buffer.entries.push_back(entry);
        }
    }

    /// Retained entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<ConsoleEntry> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            ConsoleState::Attached(buffer) => buffer.entries.iter().cloned().collect(),
            ConsoleState::Detached => Vec::new(),
        }
    }

    /// Entries evicted because the buffer was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            ConsoleState::Attached(buffer) => buffer.dropped,
            ConsoleState::Detached => 0,
        }
    }

    /// Empty the buffer and reset the eviction count.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let ConsoleState::Attached(buffer) = &mut *state {
            buffer.entries.clear();
            buffer.dropped = 0;
        }
    }

    #[must_use]
    pub fn layer(&self) -> ConsoleLayer {
        ConsoleLayer {
            console: self.clone(),
        }
    }
}

/// `tracing` layer feeding events into a [`DebugConsole`].
#[derive(Debug, Clone)]
pub struct ConsoleLayer {
    console: DebugConsole,
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.console.is_attached() {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.console.record(ConsoleEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={value:?}", field.name());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSettings {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ConsoleSettings {
    #[must_use]
    pub fn from_config(config: Option<&DebugConsoleConfig>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: config.and_then(|c| c.enabled).unwrap_or(defaults.enabled),
            capacity: config.and_then(|c| c.capacity).unwrap_or(defaults.capacity),
        }
    }
}

/// Attach the console to `ambient`, reusing a console the host already provided.
pub fn attach(ambient: &mut Ambient, settings: ConsoleSettings) -> Result<(), InitializerError> {
    if !settings.enabled {
        tracing::debug!("debug console disabled");
        return Ok(());
    }

    ambient
        .get_or_provide_with(DebugConsole::new)
        .attach(settings.capacity)
        .map_err(|e| InitializerError::with_source("could not attach debug console", e))?;

    tracing::info!(capacity = settings.capacity, "debug console attached");
    Ok(())
}
