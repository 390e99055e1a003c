//! Activity-logging stage
//!
//! Records everything that crosses its position in the chain into a shared
//! [`ActivityLog`]:
//!
//! - each frame, before it is delegated inward
//! - each timer firing, before it is delegated inward
//! - the chain's pending timer request, after delegation returns
//! - each gesture on the way out
//! - every property write made through the registry
//!
//! Writing `Logging Notify` dumps the encoded log to the configured path;
//! writing `Logging Reset` clears it. Both reactions are idempotent.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gestures_activity::{ActivityError, ActivityLog};
use gestures_events::{Gesture, HardwareFrame, Stime};
use gestures_interpreter::{Filter, GestureConsumer, InitContext};
use gestures_props::{BoolProperty, IntProperty, PropRegistry, WeakPropRegistry};
use serde::Deserialize;
use tracing::{error, info};

use crate::error::FilterResult;

/// Registry names of the logging properties.
pub mod names {
    /// Any write dumps the log to disk
    pub const LOGGING_NOTIFY: &str = "Logging Notify";
    /// Any write clears the log
    pub const LOGGING_RESET: &str = "Logging Reset";
    /// Whether the device is built in; stored for embedders, unused here
    pub const INTEGRATED_TOUCHPAD: &str = "Integrated Touchpad";
}

/// File name used when no dump path is configured.
pub const DEFAULT_DUMP_FILE: &str = "touchpad_activity_log.txt";

/// Logging stage configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Where `Logging Notify` writes the encoded log
    pub dump_path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dump_path: std::env::temp_dir().join(DEFAULT_DUMP_FILE),
        }
    }
}

impl LoggingConfig {
    /// Configuration dumping to `path`.
    pub fn with_dump_path(path: impl Into<PathBuf>) -> Self {
        Self {
            dump_path: path.into(),
        }
    }
}

/// Logging stage.
pub struct LoggingFilter {
    log: Rc<RefCell<ActivityLog>>,
    registry: WeakPropRegistry,
    config: LoggingConfig,
    logging_notify: IntProperty,
    logging_reset: IntProperty,
    integrated_touchpad: BoolProperty,
}

impl LoggingFilter {
    /// Create the stage, register its properties and start recording
    /// property writes made through `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a property name is already registered with
    /// another type.
    pub fn new(registry: &PropRegistry, config: LoggingConfig) -> FilterResult<Self> {
        let logging_notify = registry.register_int(names::LOGGING_NOTIFY, 0)?;
        let logging_reset = registry.register_int(names::LOGGING_RESET, 0)?;
        let integrated_touchpad = registry.register_bool(names::INTEGRATED_TOUCHPAD, false)?;

        let log = Rc::new(RefCell::new(ActivityLog::default()));

        let weak = Rc::downgrade(&log);
        registry.add_write_listener(move |record| {
            if let Some(log) = weak.upgrade() {
                log.borrow_mut().log_property_change(record);
            }
        });

        let weak = Rc::downgrade(&log);
        let weak_registry = registry.downgrade();
        let path = config.dump_path.clone();
        registry.observe(names::LOGGING_NOTIFY, move |_| {
            let Some(log) = weak.upgrade() else { return };
            if let Err(error) = dump(&log, &weak_registry, &path) {
                error!(path = %path.display(), %error, "activity log dump failed");
            }
        })?;

        let weak = Rc::downgrade(&log);
        registry.observe(names::LOGGING_RESET, move |_| {
            if let Some(log) = weak.upgrade() {
                log.borrow_mut().clear();
                info!("activity log reset");
            }
        })?;

        Ok(Self {
            log,
            registry: registry.downgrade(),
            config,
            logging_notify,
            logging_reset,
            integrated_touchpad,
        })
    }

    /// Shared handle to the log.
    pub fn log(&self) -> Rc<RefCell<ActivityLog>> {
        Rc::clone(&self.log)
    }

    /// Configuration.
    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }

    /// Encode the log with a fresh snapshot of every registry property.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON writer fails.
    pub fn encode_activity_log(&self) -> FilterResult<String> {
        Ok(encode(&self.log, &self.registry)?)
    }

    /// Write the encoded log to the configured dump path.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn dump(&self) -> FilterResult<()> {
        self.dump_to(&self.config.dump_path)
    }

    /// Write the encoded log to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn dump_to(&self, path: &Path) -> FilterResult<()> {
        Ok(dump(&self.log, &self.registry, path)?)
    }

    /// Drop every recorded entry, keeping the descriptor.
    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Value of `Logging Notify`.
    pub fn notify_count(&self) -> i32 {
        self.logging_notify.get()
    }

    /// Value of `Logging Reset`.
    pub fn reset_count(&self) -> i32 {
        self.logging_reset.get()
    }

    /// Value of `Integrated Touchpad`.
    pub fn integrated_touchpad(&self) -> bool {
        self.integrated_touchpad.get()
    }
}

fn encode(log: &RefCell<ActivityLog>, registry: &WeakPropRegistry) -> Result<String, ActivityError> {
    let mut log = log.borrow_mut();
    if let Some(registry) = registry.upgrade() {
        log.set_properties(registry.snapshot());
    }
    log.encode()
}

fn dump(
    log: &RefCell<ActivityLog>,
    registry: &WeakPropRegistry,
    path: &Path,
) -> Result<(), ActivityError> {
    let text = encode(log, registry)?;
    fs::write(path, text)?;
    info!(path = %path.display(), "activity log dumped");
    Ok(())
}

impl Filter for LoggingFilter {
    fn name(&self) -> &str {
        "logging"
    }

    fn initialize(&mut self, ctx: &InitContext<'_>) {
        self.log.borrow_mut().set_descriptor(*ctx.descriptor);
    }

    fn will_interpret(&mut self, frame: &mut HardwareFrame) {
        self.log.borrow_mut().log_hardware_frame(frame);
    }

    fn did_interpret(&mut self, _frame: &HardwareFrame, timeout: &mut Option<Stime>) {
        if let Some(when) = *timeout {
            self.log.borrow_mut().log_timer_request(when);
        }
    }

    fn will_handle_timer(&mut self, now: Stime) {
        self.log.borrow_mut().log_timer_firing(now);
    }

    fn did_handle_timer(&mut self, _now: Stime, timeout: &mut Option<Stime>) {
        if let Some(when) = *timeout {
            self.log.borrow_mut().log_timer_request(when);
        }
    }

    fn consume_gesture(&mut self, gesture: &Gesture, out: &mut dyn GestureConsumer) {
        self.log.borrow_mut().log_gesture(gesture);
        out.consume_gesture(gesture);
    }
}

impl std::fmt::Debug for LoggingFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingFilter")
            .field("entries", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
