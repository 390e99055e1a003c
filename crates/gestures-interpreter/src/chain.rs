//! Chain assembly and the driver-facing pipeline

use std::fmt;

use gestures_events::{Gesture, HardwareDescriptor, HardwareFrame, Stime};
use gestures_props::MetricsProperties;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::filter::{Filter, FilterInterpreter};
use crate::interpreter::{GestureConsumer, InitContext, Interpreter};
use crate::metrics::MetricsCollector;

/// Builds a chain from the base interpreter outward.
///
/// ```
/// use gestures_events::{Gesture, HardwareFrame, Stime};
/// use gestures_interpreter::prelude::*;
///
/// #[derive(Debug)]
/// struct Silent;
/// impl Interpreter for Silent {
///     fn sync_interpret(
///         &mut self,
///         _frame: &mut HardwareFrame,
///         _timeout: &mut Option<Stime>,
///         _out: &mut dyn GestureConsumer,
///     ) {
///     }
/// }
///
/// #[derive(Debug)]
/// struct Dropper;
/// impl Filter for Dropper {
///     fn name(&self) -> &str {
///         "dropper"
///     }
///     fn consume_gesture(&mut self, _gesture: &Gesture, _out: &mut dyn GestureConsumer) {}
/// }
///
/// let pipeline = ChainBuilder::new(Silent).wrap(Dropper).build();
/// assert_eq!(pipeline.stage_names(), ["interpreter", "dropper"]);
/// ```
pub struct ChainBuilder {
    root: Box<dyn Interpreter>,
    names: Vec<String>,
}

impl ChainBuilder {
    /// Start a chain at its base interpreter.
    pub fn new(base: impl Interpreter + 'static) -> Self {
        Self::from_boxed(Box::new(base))
    }

    /// Start a chain at an already boxed stage.
    pub fn from_boxed(base: Box<dyn Interpreter>) -> Self {
        let names = vec![base.name().to_string()];
        Self { root: base, names }
    }

    /// Wrap the current chain with `filter`, which becomes the outermost stage.
    #[must_use]
    pub fn wrap<F: Filter + 'static>(self, filter: F) -> Self {
        let mut names = self.names;
        names.push(filter.name().to_string());
        debug!(stage = filter.name(), depth = names.len(), "stage added");
        Self {
            root: Box::new(FilterInterpreter::new(filter, self.root)),
            names,
        }
    }

    /// Finish the chain.
    pub fn build(self) -> Pipeline {
        Pipeline {
            root: self.root,
            names: self.names,
            sink: None,
            descriptor: None,
        }
    }
}

impl fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainBuilder")
            .field("stages", &self.names)
            .finish()
    }
}

/// Terminal consumer: metrics first, then the embedder's consumer.
struct Sink {
    consumer: Box<dyn GestureConsumer>,
    metrics: Option<Box<dyn MetricsCollector>>,
}

impl GestureConsumer for Sink {
    fn consume_gesture(&mut self, gesture: &Gesture) {
        if let Some(metrics) = self.metrics.as_mut() {
            metrics.record(gesture);
        }
        self.consumer.consume_gesture(gesture);
    }
}

/// A complete chain, as seen by the driver.
///
/// Call [`initialize`](Self::initialize) once before feeding frames; it may
/// be called again to reset the output wiring, as replay does.
pub struct Pipeline {
    root: Box<dyn Interpreter>,
    names: Vec<String>,
    sink: Option<Sink>,
    descriptor: Option<HardwareDescriptor>,
}

impl Pipeline {
    /// Initialize every stage, innermost first, and install the output
    /// consumer and optional metrics collector.
    pub fn initialize(
        &mut self,
        descriptor: HardwareDescriptor,
        metrics: Option<Box<dyn MetricsCollector>>,
        metrics_props: Option<&MetricsProperties>,
        consumer: Box<dyn GestureConsumer>,
    ) {
        self.root.initialize(&InitContext {
            descriptor: &descriptor,
            metrics_props,
        });
        self.descriptor = Some(descriptor);
        self.sink = Some(Sink { consumer, metrics });
        debug!(stages = self.names.len(), "pipeline initialized");
    }

    /// Whether [`initialize`](Self::initialize) has run.
    pub fn is_initialized(&self) -> bool {
        self.sink.is_some()
    }

    /// Descriptor supplied at initialization.
    pub fn descriptor(&self) -> Option<&HardwareDescriptor> {
        self.descriptor.as_ref()
    }

    /// Stage names from the base interpreter outward.
    pub fn stage_names(&self) -> &[String] {
        &self.names
    }

    /// Feed one frame through the chain.
    ///
    /// `timeout` is cleared first: a new frame cancels any pending request.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotInitialized`] before initialization.
    pub fn sync_interpret(
        &mut self,
        frame: &mut HardwareFrame,
        timeout: &mut Option<Stime>,
    ) -> PipelineResult {
        let sink = self
            .sink
            .as_mut()
            .ok_or(PipelineError::NotInitialized("sync_interpret"))?;
        *timeout = None;
        self.root.sync_interpret(frame, timeout, sink);
        Ok(())
    }

    /// Deliver a timer firing at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotInitialized`] before initialization.
    pub fn handle_timer(&mut self, now: Stime, timeout: &mut Option<Stime>) -> PipelineResult {
        let sink = self
            .sink
            .as_mut()
            .ok_or(PipelineError::NotInitialized("handle_timer"))?;
        *timeout = None;
        self.root.handle_timer(now, timeout, sink);
        Ok(())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.names)
            .field("initialized", &self.is_initialized())
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Echo;

    impl Interpreter for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn sync_interpret(
            &mut self,
            frame: &mut HardwareFrame,
            _timeout: &mut Option<Stime>,
            out: &mut dyn GestureConsumer,
        ) {
            out.consume_gesture(&Gesture::new_move(frame.timestamp, frame.timestamp, 1.0, 1.0));
        }
    }

    struct Counter(Rc<RefCell<usize>>);

    impl MetricsCollector for Counter {
        fn record(&mut self, _gesture: &Gesture) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_uninitialized_pipeline_rejects_input() {
        let mut pipeline = ChainBuilder::new(Echo).build();
        let mut timeout = None;
        assert_eq!(
            pipeline.sync_interpret(&mut HardwareFrame::new(0.0), &mut timeout),
            Err(PipelineError::NotInitialized("sync_interpret"))
        );
        assert_eq!(
            pipeline.handle_timer(0.0, &mut timeout),
            Err(PipelineError::NotInitialized("handle_timer"))
        );
    }

    #[test]
    fn test_metrics_sees_every_gesture() {
        let count = Rc::new(RefCell::new(0));
        let delivered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&delivered);

        let mut pipeline = ChainBuilder::new(Echo).build();
        pipeline.initialize(
            HardwareDescriptor::default(),
            Some(Box::new(Counter(Rc::clone(&count)))),
            None,
            Box::new(move |g: &Gesture| sink.borrow_mut().push(*g)),
        );
        let mut timeout = Some(9.0);
        for t in [0.0, 0.01, 0.02] {
            pipeline
                .sync_interpret(&mut HardwareFrame::new(t), &mut timeout)
                .unwrap();
        }
        assert_eq!(*count.borrow(), 3);
        assert_eq!(delivered.borrow().len(), 3);
        assert_eq!(timeout, None);
    }

    #[test]
    fn test_reinitialize_replaces_consumer() {
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));
        let (a, b) = (Rc::clone(&first), Rc::clone(&second));
        let mut pipeline = ChainBuilder::new(Echo).build();
        let mut timeout = None;

        pipeline.initialize(
            HardwareDescriptor::default(),
            None,
            None,
            Box::new(move |_: &Gesture| *a.borrow_mut() += 1),
        );
        pipeline
            .sync_interpret(&mut HardwareFrame::new(0.0), &mut timeout)
            .unwrap();
        pipeline.initialize(
            HardwareDescriptor::default(),
            None,
            None,
            Box::new(move |_: &Gesture| *b.borrow_mut() += 1),
        );
        pipeline
            .sync_interpret(&mut HardwareFrame::new(0.0), &mut timeout)
            .unwrap();
        assert_eq!((*first.borrow(), *second.borrow()), (1, 1));
    }
}
