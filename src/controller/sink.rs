use super::Event;
use std::sync::mpsc;

/// Cloneable handle for appending lines to the operator log from any thread.
///
/// Lines are not written to the model directly: they are queued on the
/// controller channel and appended by the controller loop, in arrival order.
#[derive(Clone)]
pub struct LogSink {
    tx: mpsc::Sender<Event>,
}

impl LogSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        LogSink { tx }
    }

    pub fn log(self: &Self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{}", message);
        if self.tx.send(Event::Log(message)).is_err() {
            log::warn!("Log line dropped, controller is gone");
        }
    }
}
