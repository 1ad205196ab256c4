//! Best-effort progress and log notification.
//!
//! A [`Notifier`] receives progress counts and status lines from a running
//! search. Delivery is best-effort: an `Err` from a sink is dropped by the
//! caller and the search carries on.

use crate::error::NotifyError;

/// Receiver of progress and log notifications.
///
/// Both methods default to doing nothing, so an implementation only needs
/// to override what it cares about.
pub trait Notifier {
    /// `current` of `total` steps have been attempted.
    fn progress(&mut self, _current: usize, _total: usize) -> Result<(), NotifyError> {
        Ok(())
    }

    /// A human-readable status line.
    fn log(&mut self, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn progress(&mut self, current: usize, total: usize) -> Result<(), NotifyError> {
        (**self).progress(current, total)
    }

    fn log(&mut self, message: &str) -> Result<(), NotifyError> {
        (**self).log(message)
    }
}

/// A notifier that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {}

/// A notifier built from two closures.
///
/// ```
/// use u_anneal::sa::{FnNotifier, Notifier};
///
/// let mut seen = Vec::new();
/// let mut notifier = FnNotifier::new(
///     |current, total| {
///         seen.push((current, total));
///         Ok(())
///     },
///     |_msg: &str| Ok(()),
/// );
/// notifier.progress(1, 10).unwrap();
/// drop(notifier);
/// assert_eq!(seen, vec![(1, 10)]);
/// ```
pub struct FnNotifier<P, L> {
    on_progress: P,
    on_log: L,
}

impl<P, L> FnNotifier<P, L>
where
    P: FnMut(usize, usize) -> Result<(), NotifyError>,
    L: FnMut(&str) -> Result<(), NotifyError>,
{
    pub fn new(on_progress: P, on_log: L) -> Self {
        Self {
            on_progress,
            on_log,
        }
    }
}

impl<P, L> Notifier for FnNotifier<P, L>
where
    P: FnMut(usize, usize) -> Result<(), NotifyError>,
    L: FnMut(&str) -> Result<(), NotifyError>,
{
    fn progress(&mut self, current: usize, total: usize) -> Result<(), NotifyError> {
        (self.on_progress)(current, total)
    }

    fn log(&mut self, message: &str) -> Result<(), NotifyError> {
        (self.on_log)(message)
    }
}

/// Drops a failed notification.
///
/// The failure goes to `tracing` at trace level only; it is never routed
/// back into a log sink.
pub(crate) fn discard(result: Result<(), NotifyError>) {
    if let Err(err) = result {
        tracing::trace!(error = %err, "notification dropped");
    }
}
