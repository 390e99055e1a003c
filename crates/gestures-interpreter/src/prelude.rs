//! Prelude for building and driving filter chains.

pub use crate::chain::{ChainBuilder, Pipeline};
pub use crate::error::{PipelineError, PipelineResult};
pub use crate::filter::{Filter, FilterInterpreter};
pub use crate::interpreter::{GestureConsumer, InitContext, Interpreter, merge_timeout};
pub use crate::metrics::MetricsCollector;
