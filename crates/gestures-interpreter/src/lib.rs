//! Filter Chain Contract for the Gesture Pipeline
//!
//! A pipeline is a chain of stages. The innermost stage (the base
//! interpreter) turns hardware frames into gestures; every other stage is a
//! [`FilterInterpreter`] that exclusively owns the stage it wraps and sees
//! traffic in both directions:
//!
//! ```text
//!            frames / timers (inward)
//! driver ──► outer filter ──► inner filter ──► base interpreter
//!   ▲             │                │                  │
//!   └── consumer ◄┴─── gestures ◄──┴──── (outward) ◄──┘
//! ```
//!
//! # Reentrancy
//!
//! While a wrapped stage runs `sync_interpret` or `handle_timer`, it may emit
//! any number of gestures. Each one is handed synchronously to the wrapping
//! filter's [`Filter::consume_gesture`] before the inner call returns. The
//! outward path is an explicit `&mut dyn GestureConsumer` argument threaded
//! through every call, so no stage holds a back-reference to its owner.
//!
//! # Timeouts
//!
//! `timeout` arguments carry the absolute time at which the chain wants a
//! [`Interpreter::handle_timer`] call, or `None`. A stage may move the
//! request earlier with [`merge_timeout`] but must not drop an inner stage's
//! request. Each frame cancels any pending request.
//!
//! # Example
//!
//! ```
//! use gestures_events::{Gesture, HardwareDescriptor, HardwareFrame, Stime};
//! use gestures_interpreter::prelude::*;
//!
//! #[derive(Debug)]
//! struct Clicker;
//!
//! impl Interpreter for Clicker {
//!     fn sync_interpret(
//!         &mut self,
//!         frame: &mut HardwareFrame,
//!         _timeout: &mut Option<Stime>,
//!         out: &mut dyn GestureConsumer,
//!     ) {
//!         if frame.buttons_down != 0 {
//!             out.consume_gesture(&Gesture::new_buttons_change(
//!                 frame.timestamp,
//!                 frame.timestamp,
//!                 frame.buttons_down,
//!                 0,
//!             ));
//!         }
//!     }
//! }
//!
//! let mut pipeline = ChainBuilder::new(Clicker).build();
//! let seen = std::rc::Rc::new(std::cell::Cell::new(0));
//! let counter = std::rc::Rc::clone(&seen);
//! pipeline.initialize(
//!     HardwareDescriptor::default(),
//!     None,
//!     None,
//!     Box::new(move |_: &Gesture| counter.set(counter.get() + 1)),
//! );
//!
//! let mut timeout = None;
//! pipeline.sync_interpret(&mut HardwareFrame::new(0.0).with_buttons(1), &mut timeout)?;
//! assert_eq!(seen.get(), 1);
//! # Ok::<(), PipelineError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod chain;
pub mod error;
pub mod filter;
pub mod interpreter;
pub mod metrics;
pub mod prelude;

pub use chain::{ChainBuilder, Pipeline};
pub use error::{PipelineError, PipelineResult};
pub use filter::{Filter, FilterInterpreter};
pub use interpreter::{GestureConsumer, InitContext, Interpreter, merge_timeout};
pub use metrics::MetricsCollector;
