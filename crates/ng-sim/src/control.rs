//! Tick-boundary pause and abort.
//!
//! The generator owns a [`RunControl`]; any number of [`AbortHandle`]s may
//! be cloned out and used from other threads.  The inter-tick pause is a
//! `recv_timeout` on the abort channel, so an abort request ends the pause
//! at once.  Nothing ever interrupts a tick in progress.

use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};

/// Requests that a run stop at the next tick boundary.
#[derive(Clone)]
pub struct AbortHandle {
    tx: Sender<()>,
}

impl AbortHandle {
    /// Idempotent; a request made after the run ended is ignored.
    pub fn abort(&self) {
        let _ = self.tx.try_send(());
    }
}

/// The generator's side of the abort channel.
pub struct RunControl {
    rx:      Receiver<()>,
    handle:  AbortHandle,
    aborted: bool,
}

impl RunControl {
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self { rx, handle: AbortHandle { tx }, aborted: false }
    }

    pub fn handle(&self) -> AbortHandle {
        self.handle.clone()
    }

    /// Wait up to `period`, returning early on abort.
    ///
    /// Returns `true` once an abort has been requested.
    pub fn pause(&mut self, period: Duration) -> bool {
        if self.aborted {
            return true;
        }
        self.aborted = if period.is_zero() {
            match self.rx.try_recv() {
                Ok(()) => true,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
            }
        } else {
            match self.rx.recv_timeout(period) {
                Ok(()) => true,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
            }
        };
        self.aborted
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}
