//! Event streaming from widget surfaces into coordinator processors.
//!
//! A [`Relay`] is the write half of an unbounded channel. UI code emits
//! events (clicks, menu choices, route changes) through relays; the matching
//! receiver stream is consumed by exactly one sequential processor.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
#[cfg(debug_assertions)]
use std::sync::{Arc, OnceLock};

/// Type-safe event sink feeding a coordinator's processor.
///
/// Relays follow the `{source}_{event}_relay` naming pattern, for example
/// `page_changed_relay` or `chip_closed_relay`. Each relay is expected to be
/// emitted from a single place in the code, usually the convenience method of
/// its owning coordinator; debug builds enforce this.
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

/// Failures surfaced by [`Relay::try_send`].
#[derive(Debug, Clone)]
pub enum RelayError {
    /// The receiver stream has been dropped.
    ChannelClosed,
    /// The relay was emitted from more than one source location
    /// (debug builds only).
    #[cfg(debug_assertions)]
    MultipleEmitters {
        previous: &'static std::panic::Location<'static>,
        current: &'static std::panic::Location<'static>,
    },
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a relay together with its receiver stream. Prefer the
    /// free-standing [`relay`] function, which mirrors the channel pattern.
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (
            Relay {
                sender,
                #[cfg(debug_assertions)]
                emit_location: Arc::new(OnceLock::new()),
            },
            receiver,
        )
    }

    #[cfg(debug_assertions)]
    #[track_caller]
    fn check_single_source(&self) -> Result<(), RelayError> {
        let caller = std::panic::Location::caller();
        let first = *self.emit_location.get_or_init(|| caller);
        if first == caller {
            Ok(())
        } else {
            Err(RelayError::MultipleEmitters {
                previous: first,
                current: caller,
            })
        }
    }

    /// Send an event. Events without a live receiver are silently discarded;
    /// use [`Relay::try_send`] to observe that case.
    ///
    /// Debug builds panic when a relay is emitted from a second source
    /// location.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        if let Err(error) = self.check_single_source() {
            panic!("{error:?}");
        }

        let _ = self.sender.unbounded_send(value);
    }

    /// Send an event with explicit error reporting.
    #[track_caller]
    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        #[cfg(debug_assertions)]
        self.check_single_source()?;

        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }
}

impl<T> Default for Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A disconnected relay whose events are silently discarded. Useful as a
    /// placeholder before the real wiring exists.
    fn default() -> Self {
        let (relay, _receiver) = Self::new();
        relay
    }
}

/// Create a relay and its receiver stream, channel-style.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn events_reach_the_receiver_in_order() {
        let (chip_closed_relay, mut chip_closed_stream) = relay::<String>();

        for id in ["chip-1", "chip-2"] {
            chip_closed_relay.send(id.to_string());
        }

        assert_eq!(chip_closed_stream.next().await.as_deref(), Some("chip-1"));
        assert_eq!(chip_closed_stream.next().await.as_deref(), Some("chip-2"));
    }

    #[tokio::test]
    async fn try_send_reports_a_dropped_receiver() {
        let (page_changed_relay, page_changed_stream) = relay::<usize>();
        // One call site, so only the channel state varies between attempts.
        let send = |value| page_changed_relay.try_send(value);

        assert!(send(1).is_ok());
        drop(page_changed_stream);
        assert!(matches!(send(2), Err(RelayError::ChannelClosed)));
    }

    #[tokio::test]
    async fn disconnected_relays_discard_events() {
        let relay = Relay::<usize>::default();
        relay.send(7);
    }
}
