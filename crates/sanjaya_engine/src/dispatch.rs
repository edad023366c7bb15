use sanjaya_core::Event;
use sanjaya_logging::sanjaya_debug;

/// What the handler reports after processing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminal,
}

/// Receives decoded events one at a time, in arrival order.
pub trait EventHandler {
    fn handle(&mut self, event: Event) -> Flow;
}

impl<T: EventHandler + ?Sized> EventHandler for &mut T {
    fn handle(&mut self, event: Event) -> Flow {
        (**self).handle(event)
    }
}

/// Result of offering one event to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Handler ran and the workflow continues.
    Delivered,
    /// Handler ran and reported a terminal condition.
    Terminated,
    /// Arrived after the terminal event; the handler was not called.
    Ignored,
}

/// Calls a single handler once per event until it reports a terminal flow.
/// Everything after that is drained without reaching the handler.
#[derive(Debug)]
pub struct EventDispatcher<H> {
    handler: H,
    terminated: bool,
    delivered: usize,
    ignored: usize,
}

impl<H: EventHandler> EventDispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            terminated: false,
            delivered: 0,
            ignored: 0,
        }
    }

    pub fn dispatch(&mut self, event: Event) -> Dispatch {
        if self.terminated {
            self.ignored += 1;
            sanjaya_debug!("Ignoring {} event after terminal state", event.kind());
            return Dispatch::Ignored;
        }
        self.delivered += 1;
        match self.handler.handle(event) {
            Flow::Continue => Dispatch::Delivered,
            Flow::Terminal => {
                self.terminated = true;
                Dispatch::Terminated
            }
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}
