//! Per-tick decision trace.
//!
//! Every interesting decision is logged through `tracing` and, when the operator verbosity
//! enables its [`TraceGroup`], also recorded as a [`TraceEvent`]. Events go to an in-memory
//! [`TraceLog`] and/or a caller-supplied [`TraceSink`].

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Diagnostic group an event belongs to. Operator verbosity levels enable groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceGroup {
    Selection,
    Engagement,
    Grid,
    Bank,
}

impl TraceGroup {
    /// Whether operator verbosity `level` records this group.
    ///
    /// 1 selection, 2 engagement, 3 both, 4 grid dump, 5 bank, 6 selection only,
    /// 7 engagement only. Anything else records nothing.
    pub fn enabled_at(self, level: u8) -> bool {
        matches!(
            (self, level),
            (TraceGroup::Selection, 1 | 3 | 6)
                | (TraceGroup::Engagement, 2 | 3 | 7)
                | (TraceGroup::Grid, 4)
                | (TraceGroup::Bank, 5)
        )
    }
}

/// Plain data so it can be recorded during a replay and rendered later by tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub tick: u64,
    pub group: TraceGroup,
    pub tag: Cow<'static, str>,
    pub a: u64,
    pub b: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, group: TraceGroup, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            group,
            tag: tag.into(),
            a: 0,
            b: 0,
        }
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: u64) -> Self {
        self.b = b;
        self
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} a={} b={}", self.tick, self.tag, self.a, self.b)
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }
}

/// Verbosity-gated fan-out to the optional log and sink.
#[derive(Default)]
pub struct Tracer {
    log: Option<TraceLog>,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("log", &self.log)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Tracer {
    /// Start collecting events in memory.
    pub fn record(&mut self) {
        self.log.get_or_insert_with(TraceLog::default);
    }

    pub fn set_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    pub fn log(&self) -> Option<&TraceLog> {
        self.log.as_ref()
    }

    pub fn take_log(&mut self) -> Option<TraceLog> {
        self.log.take()
    }

    pub fn emit(&mut self, verbosity: u8, event: TraceEvent) {
        if !event.group.enabled_at(verbosity) {
            return;
        }
        tracing::trace!(%event, "trace");
        match (&mut self.log, &mut self.sink) {
            (Some(log), Some(sink)) => {
                log.push(event.clone());
                sink.emit(event);
            }
            (Some(log), None) => log.push(event),
            (None, Some(sink)) => sink.emit(event),
            (None, None) => {}
        }
    }
}
