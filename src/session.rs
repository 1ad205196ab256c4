//! Background sessions.
//!
//! A [`Session`] runs a multi-run search on a worker thread and streams
//! progress and log events to the caller over an unbounded channel. The
//! worker never waits for the display side: sending on an unbounded
//! channel does not block, and a dropped receiver only turns later
//! notifications into no-ops.

use crossbeam::channel::{self, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{AnnealError, AnnealResult, NotifyError};
use crate::multi::{MultiRunConfig, MultiRunResult, MultiRunner};
use crate::objective::Objective;
use crate::sa::{discard, Notifier};

/// An event emitted by a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Session-wide step counter.
    Progress {
        /// Steps attempted so far across all runs.
        current: usize,
        /// Steps planned for the whole session.
        total: usize,
    },
    /// A status line.
    Log(String),
    /// The worker is done; call [`Session::join`] for the result.
    Finished,
}

/// A [`Notifier`] that forwards everything into a channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: Sender<SessionEvent>,
}

impl ChannelNotifier {
    pub fn new(tx: Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: SessionEvent) -> Result<(), NotifyError> {
        self.tx
            .send(event)
            .map_err(|_| NotifyError::new("session event receiver disconnected"))
    }
}

impl Notifier for ChannelNotifier {
    fn progress(&mut self, current: usize, total: usize) -> Result<(), NotifyError> {
        self.send(SessionEvent::Progress { current, total })
    }

    fn log(&mut self, message: &str) -> Result<(), NotifyError> {
        self.send(SessionEvent::Log(message.to_string()))
    }
}

/// A multi-run search executing on its own thread.
pub struct Session {
    events: Receiver<SessionEvent>,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<AnnealResult<MultiRunResult>>,
}

impl Session {
    /// Validates `config` and starts the worker.
    ///
    /// # Errors
    ///
    /// [`AnnealError::Config`] without spawning anything if `config` is
    /// invalid, [`AnnealError::Spawn`] if the thread cannot be created.
    pub fn spawn<O>(objective: O, config: MultiRunConfig) -> AnnealResult<Self>
    where
        O: Objective + 'static,
    {
        config.validate()?;

        let (tx, events) = channel::unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("anneal-worker".into())
            .spawn(move || {
                let mut notifier = ChannelNotifier::new(tx);
                discard(notifier.log(&format!(
                    "starting {} simulated annealing runs (seed {})",
                    config.runs, config.seed
                )));
                let result =
                    MultiRunner::run_with_cancel(&objective, &config, &mut notifier, Some(flag));
                if let Ok(ref r) = result {
                    if r.cancelled {
                        discard(notifier.log("session interrupted by user"));
                    }
                }
                discard(notifier.send(SessionEvent::Finished));
                result
            })?;

        Ok(Self {
            events,
            cancel,
            handle,
        })
    }

    /// Receiver for progress and log events.
    pub fn events(&self) -> &Receiver<SessionEvent> {
        &self.events
    }

    /// Asks the worker to stop before its next run.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Shared cancellation flag, for wiring into signal handlers.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker and returns the session result.
    pub fn join(self) -> AnnealResult<MultiRunResult> {
        self.handle.join().map_err(|_| AnnealError::WorkerPanicked)?
    }
}
