//! Observer hooks for progress reporting and viewers.

use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender, TrySendError, bounded};
use log::trace;

use ng_core::Tick;

use crate::{Frame, RunSummary};

/// Callbacks invoked by [`Generator`][crate::Generator] at tick boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_tick_start(&mut self, tick: Tick) {
///         if tick.0 % self.every == 0 {
///             println!("{tick}");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per tick with the committed positions.
    fn on_frame(&mut self, _frame: &Arc<Frame>) {}

    /// Called once after the final statistics were emitted.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards frames to a viewer thread over a bounded channel.
///
/// A full channel drops the frame; a closed one (viewer gone) drops every
/// later frame.  Neither affects the run.
pub struct ChannelViewer {
    tx:      Sender<Arc<Frame>>,
    dropped: u64,
}

impl ChannelViewer {
    /// A viewer endpoint and the receiver to hand to the viewer thread.
    pub fn new(capacity: usize) -> (Self, Receiver<Arc<Frame>>) {
        let (tx, rx) = bounded(capacity.max(1));
        (Self { tx, dropped: 0 }, rx)
    }

    /// Frames that could not be delivered.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SimObserver for ChannelViewer {
    fn on_frame(&mut self, frame: &Arc<Frame>) {
        match self.tx.try_send(Arc::clone(frame)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                trace!("viewer busy, dropped frame {}", frame.tick);
            }
            Err(TrySendError::Disconnected(_)) => self.dropped += 1,
        }
    }
}
