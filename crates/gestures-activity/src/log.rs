//! In-memory activity log

use gestures_events::{
    Gesture, HardwareDescriptor, HardwareFrame, PropertyChangeRecord, Stime, TimerEvent,
};
use gestures_props::PropertySnapshot;
use tracing::warn;

use crate::codec;
use crate::error::ActivityResult;

/// One recorded event.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// A frame fed into the pipeline
    HardwareFrame(HardwareFrame),
    /// A timer request or firing
    Timer(TimerEvent),
    /// A gesture the pipeline produced
    Gesture(Gesture),
    /// A property write
    PropChange(PropertyChangeRecord),
}

impl LogEntry {
    /// Discriminator used on the wire.
    pub fn type_name(&self) -> &'static str {
        use crate::format::entry;
        match self {
            LogEntry::HardwareFrame(_) => entry::HARDWARE_STATE,
            LogEntry::Timer(TimerEvent::Firing { .. }) => entry::TIMER_CALLBACK,
            LogEntry::Timer(TimerEvent::Request { .. }) => entry::CALLBACK_REQUEST,
            LogEntry::Gesture(_) => entry::GESTURE,
            LogEntry::PropChange(_) => entry::PROP_CHANGE,
        }
    }
}

/// Ordered record of everything that crossed one pipeline.
///
/// Appends never fail. The descriptor and property snapshot describe the
/// device and configuration the entries were captured under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityLog {
    descriptor: HardwareDescriptor,
    entries: Vec<LogEntry>,
    properties: PropertySnapshot,
}

impl ActivityLog {
    /// Empty log for a device.
    pub fn new(descriptor: HardwareDescriptor) -> Self {
        Self {
            descriptor,
            ..Self::default()
        }
    }

    /// Append a hardware frame.
    ///
    /// Contacts past [`HardwareFrame::MAX_FINGERS`] are dropped so the log
    /// always decodes again.
    pub fn log_hardware_frame(&mut self, frame: &HardwareFrame) {
        self.push(LogEntry::HardwareFrame(frame.clone()));
    }

    /// Append a timer request for `when`.
    pub fn log_timer_request(&mut self, when: Stime) {
        self.entries
            .push(LogEntry::Timer(TimerEvent::Request { when }));
    }

    /// Append a timer firing at `now`.
    pub fn log_timer_firing(&mut self, now: Stime) {
        self.entries.push(LogEntry::Timer(TimerEvent::Firing { now }));
    }

    /// Append a produced gesture.
    pub fn log_gesture(&mut self, gesture: &Gesture) {
        self.entries.push(LogEntry::Gesture(*gesture));
    }

    /// Append a property write.
    pub fn log_property_change(&mut self, record: &PropertyChangeRecord) {
        self.entries.push(LogEntry::PropChange(record.clone()));
    }

    /// Append any entry. Frames are held to the finger ceiling.
    pub fn push(&mut self, mut entry: LogEntry) {
        if let LogEntry::HardwareFrame(frame) = &mut entry {
            let dropped = frame.truncate_to_finger_limit();
            if dropped > 0 {
                warn!(
                    timestamp = frame.timestamp,
                    dropped,
                    max = HardwareFrame::MAX_FINGERS,
                    "hardware frame over the finger ceiling, extra contacts not logged"
                );
            }
        }
        self.entries.push(entry);
    }

    /// Replace the device descriptor.
    pub fn set_descriptor(&mut self, descriptor: HardwareDescriptor) {
        self.descriptor = descriptor;
    }

    /// Device descriptor.
    pub fn descriptor(&self) -> &HardwareDescriptor {
        &self.descriptor
    }

    /// Replace the property snapshot.
    pub fn set_properties(&mut self, properties: PropertySnapshot) {
        self.properties = properties;
    }

    /// Property snapshot.
    pub fn properties(&self) -> &PropertySnapshot {
        &self.properties
    }

    /// Drop every entry, keeping the descriptor and property snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    pub fn entry_at(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Encode as log-format JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Serialization`](crate::ActivityError::Serialization)
    /// if the JSON writer fails.
    pub fn encode(&self) -> ActivityResult<String> {
        codec::encode(self)
    }
}
