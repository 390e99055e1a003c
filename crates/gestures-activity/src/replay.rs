//! Activity Replay
//!
//! Drives a live pipeline with a recorded log and checks that it behaves
//! the way it did when the log was captured.
//!
//! # Determinism
//!
//! Replay is single-threaded and strictly in log order:
//! - hardware frames and timer firings are fed to the pipeline
//! - timer requests are compared against the live pipeline's last request
//! - gestures are matched against what the live pipeline produced, oldest first
//! - property writes are re-applied at the same logical point; a write the
//!   live registry refuses is a [`RestoreWarning`], not a mismatch
//!
//! Divergence never aborts the run. Every mismatch is collected in the
//! [`ReplayReport`] so one failure does not hide later ones.
//!
//! # Example
//!
//! ```no_run
//! use gestures_activity::{ActivityReplay, ReplayConfig};
//! # use gestures_interpreter::Pipeline;
//! # fn run(pipeline: &mut Pipeline, text: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let replay = ActivityReplay::new(ReplayConfig::default());
//! let log = replay.parse(text)?;
//! let report = replay.replay(&log, pipeline, None);
//! assert!(report.passed(), "{report:?}");
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::Path;
use std::rc::Rc;

use gestures_events::{Gesture, PropertyChangeRecord, Stime, TimerEvent};
use gestures_interpreter::{Pipeline, PipelineError};
use gestures_props::{MetricsProperties, PropRegistry, PropertyError};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::codec;
use crate::error::{ActivityResult, ParseError};
use crate::log::{ActivityLog, LogEntry};

/// Properties never restored from a log, whatever the restrict set says.
pub const RESTORE_DENY_LIST: [&str; 3] = [
    "Compute Surface Area from Pressure",
    "Touchpad Device Output Bias on X-Axis",
    "Touchpad Device Output Bias on Y-Axis",
];

/// Replay configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Absolute tolerance for float comparison of gestures and timeouts
    pub fp_tolerance: f64,
    /// When non-empty, only these properties are restored from the log
    pub honor_props: BTreeSet<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            fp_tolerance: 1e-6,
            honor_props: BTreeSet::new(),
        }
    }
}

impl ReplayConfig {
    /// Parse a configuration from JSON; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed text or unknown fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Restrict restoration to `names`.
    #[must_use]
    pub fn with_honor_props<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.honor_props = names.into_iter().map(Into::into).collect();
        self
    }
}

/// A property that could not be restored. Replay continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestoreWarning {
    /// The log names a property the live registry does not have
    #[error("Log property {0} is not registered")]
    NotRegistered(String),

    /// A live property has no value in the log
    #[error("Log has no value for property {0}")]
    MissingFromLog(String),

    /// The logged value does not fit the live property
    #[error("Unable to restore property {name}: {error}")]
    Rejected {
        /// Property name
        name: String,
        /// Registry rejection
        error: PropertyError,
    },
}

/// One divergence between the log and the live pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayMismatch {
    /// The pipeline's last timer request differs from the logged one
    #[error("Entry {index}: expected timeout request {expected}, pipeline requested {actual:?}")]
    TimeoutMismatch {
        /// Entry index
        index: usize,
        /// Logged request
        expected: Stime,
        /// Live request
        actual: Option<Stime>,
    },

    /// The pipeline produced a gesture the log does not have at this point
    #[error("Unmatched actual gesture {actual} (entry {index:?})")]
    UnmatchedGesture {
        /// Entry being matched, or `None` for leftovers at end of log
        index: Option<usize>,
        /// Produced gesture
        actual: Gesture,
    },

    /// A logged gesture was not produced
    #[error("Entry {index}: missing logged gesture {expected}")]
    MissingGesture {
        /// Entry index
        index: usize,
        /// Logged gesture
        expected: Gesture,
    },

    /// The pipeline refused input
    #[error("Entry {index}: {error}")]
    Pipeline {
        /// Entry index
        index: usize,
        /// Pipeline failure
        error: PipelineError,
    },
}

/// Outcome of one replay run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    /// Entries processed
    pub entries_replayed: usize,
    /// Logged gestures matched by a produced gesture
    pub gestures_matched: usize,
    /// Divergences, in the order they were found
    pub mismatches: Vec<ReplayMismatch>,
    /// Non-fatal restoration problems
    pub warnings: Vec<RestoreWarning>,
}

impl ReplayReport {
    /// Whether the live pipeline reproduced the log.
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn mismatch(&mut self, mismatch: ReplayMismatch) {
        warn!(%mismatch, "replay mismatch");
        self.mismatches.push(mismatch);
    }
}

/// Replay engine
#[derive(Debug, Clone, Default)]
pub struct ActivityReplay {
    config: ReplayConfig,
}

impl ActivityReplay {
    /// Create an engine.
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Engine configuration.
    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Decode a log.
    ///
    /// # Errors
    ///
    /// Returns the first decode failure.
    pub fn parse(&self, text: &str) -> Result<ActivityLog, ParseError> {
        codec::decode(text)
    }

    /// Read and decode a log file.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Io`](crate::ActivityError::Io) if the file cannot be read and
    /// [`ActivityError::Parse`](crate::ActivityError::Parse) if it does not decode.
    pub fn load(&self, path: impl AsRef<Path>) -> ActivityResult<ActivityLog> {
        let text = fs::read_to_string(path.as_ref())?;
        let log = self.parse(&text)?;
        debug!(path = %path.as_ref().display(), entries = log.len(), "activity log loaded");
        Ok(log)
    }

    /// Apply the log's property snapshot to `registry`.
    ///
    /// Deny-listed properties are always skipped. When the configuration
    /// names honored properties, every other property is skipped too.
    /// Restoration writes are silent: they reach neither observers nor the
    /// log of a logging stage.
    pub fn restore_properties(
        &self,
        log: &ActivityLog,
        registry: &PropRegistry,
    ) -> Vec<RestoreWarning> {
        let honored = |name: &str| {
            !RESTORE_DENY_LIST.contains(&name)
                && (self.config.honor_props.is_empty() || self.config.honor_props.contains(name))
        };

        let mut warnings = Vec::new();
        for name in registry.names().iter().filter(|n| honored(n.as_str())) {
            let Some(value) = log.properties().get(name) else {
                warnings.push(RestoreWarning::MissingFromLog(name.clone()));
                continue;
            };
            if let Err(error) = registry.restore_json(name, value) {
                warnings.push(RestoreWarning::Rejected {
                    name: name.clone(),
                    error,
                });
            }
        }
        for name in log.properties().keys().filter(|n| honored(n.as_str())) {
            if !registry.contains(name) {
                warnings.push(RestoreWarning::NotRegistered(name.clone()));
            }
        }
        for warning in &warnings {
            warn!(%warning, "property restore");
        }
        warnings
    }

    /// Replay `log` through `pipeline`.
    ///
    /// With a registry, metrics properties are registered on it, the log's
    /// property snapshot is restored, and logged property writes are
    /// re-applied. The pipeline is (re)initialized with the log's descriptor
    /// and a queue that collects its output.
    pub fn replay(
        &self,
        log: &ActivityLog,
        pipeline: &mut Pipeline,
        registry: Option<&PropRegistry>,
    ) -> ReplayReport {
        let mut report = ReplayReport::default();

        let metrics_props = registry.and_then(|reg| match MetricsProperties::new(reg) {
            Ok(props) => Some(props),
            Err(error) => {
                warn!(%error, "metrics properties unavailable");
                None
            }
        });
        if let Some(reg) = registry {
            report.warnings = self.restore_properties(log, reg);
        }

        let produced: Rc<RefCell<VecDeque<Gesture>>> = Rc::default();
        let sink = Rc::clone(&produced);
        pipeline.initialize(
            *log.descriptor(),
            None,
            metrics_props.as_ref(),
            Box::new(move |g: &Gesture| sink.borrow_mut().push_back(*g)),
        );

        let mut last_request: Option<Stime> = None;
        for (index, entry) in log.entries().iter().enumerate() {
            match entry {
                LogEntry::HardwareFrame(frame) => {
                    let mut frame = frame.clone();
                    if let Err(error) = pipeline.sync_interpret(&mut frame, &mut last_request) {
                        report.mismatch(ReplayMismatch::Pipeline { index, error });
                    }
                }
                LogEntry::Timer(TimerEvent::Firing { now }) => {
                    if let Err(error) = pipeline.handle_timer(*now, &mut last_request) {
                        report.mismatch(ReplayMismatch::Pipeline { index, error });
                    }
                }
                LogEntry::Timer(TimerEvent::Request { when }) => {
                    let matches = last_request
                        .is_some_and(|actual| (actual - when).abs() <= self.config.fp_tolerance);
                    if !matches {
                        report.mismatch(ReplayMismatch::TimeoutMismatch {
                            index,
                            expected: *when,
                            actual: last_request,
                        });
                    }
                }
                LogEntry::Gesture(expected) => {
                    self.match_gesture(index, expected, &produced, &mut report);
                }
                LogEntry::PropChange(record) => {
                    if let Some(warning) = Self::replay_prop_change(registry, record) {
                        warn!(index, %warning, "logged property write not replayed");
                        report.warnings.push(warning);
                    }
                }
            }
            report.entries_replayed += 1;
        }

        let leftovers: Vec<Gesture> = produced.borrow_mut().drain(..).collect();
        for actual in leftovers {
            report.mismatch(ReplayMismatch::UnmatchedGesture {
                index: None,
                actual,
            });
        }
        debug!(
            entries = report.entries_replayed,
            matched = report.gestures_matched,
            mismatches = report.mismatches.len(),
            "replay finished"
        );
        report
    }

    /// Pop produced gestures until one matches `expected`. Every gesture
    /// popped without matching is a mismatch.
    /// Re-apply a logged write. A write the live registry cannot take is a
    /// warning, like a failed restore.
    fn replay_prop_change(
        registry: Option<&PropRegistry>,
        record: &PropertyChangeRecord,
    ) -> Option<RestoreWarning> {
        let Some(registry) = registry else {
            return Some(RestoreWarning::NotRegistered(record.name.clone()));
        };
        match registry.set(&record.name, record.value) {
            Ok(()) => None,
            Err(PropertyError::Unknown(name)) => Some(RestoreWarning::NotRegistered(name)),
            Err(error) => Some(RestoreWarning::Rejected {
                name: record.name.clone(),
                error,
            }),
        }
    }

    fn match_gesture(
        &self,
        index: usize,
        expected: &Gesture,
        produced: &RefCell<VecDeque<Gesture>>,
        report: &mut ReplayReport,
    ) {
        loop {
            let next = produced.borrow_mut().pop_front();
            let Some(actual) = next else {
                report.mismatch(ReplayMismatch::MissingGesture {
                    index,
                    expected: *expected,
                });
                return;
            };
            if actual.approx_eq(expected, self.config.fp_tolerance) {
                debug!(index, gesture = %actual, "gesture matched");
                report.gestures_matched += 1;
                return;
            }
            report.mismatch(ReplayMismatch::UnmatchedGesture {
                index: Some(index),
                actual,
            });
        }
    }
}
