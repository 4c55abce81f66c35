//! Expand/collapse state shared by navigation groups and chip overflow.

use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select};
use futures_signals::signal::Signal;

/// Sequentially processed boolean expansion state.
///
/// Toggling is an event, not a read-modify-write at the call site, so queued
/// toggles compose: two of them always land back on the starting value.
#[derive(Clone, Debug)]
pub struct Expandable {
    state: Actor<bool>,
    pub toggled_relay: Relay<()>,
    pub expansion_changed_relay: Relay<bool>,
}

impl Expandable {
    pub fn new(initial: bool) -> Self {
        let (toggled_relay, mut toggled_stream) = relay::<()>();
        let (expansion_changed_relay, mut expansion_changed_stream) = relay::<bool>();

        let state = Actor::new(initial, async move |state| {
            loop {
                select! {
                    toggled = toggled_stream.next() => {
                        match toggled {
                            Some(()) => {
                                let expanded = *state.lock_ref();
                                state.set(!expanded);
                            }
                            None => break,
                        }
                    }
                    expanded = expansion_changed_stream.next() => {
                        match expanded {
                            Some(expanded) => state.set_neq(expanded),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            state,
            toggled_relay,
            expansion_changed_relay,
        }
    }

    pub fn toggle(&self) {
        self.toggled_relay.send(());
    }

    pub fn set_expanded(&self, expanded: bool) {
        self.expansion_changed_relay.send(expanded);
    }

    pub fn expand(&self) {
        self.set_expanded(true);
    }

    pub fn collapse(&self) {
        self.set_expanded(false);
    }

    pub fn signal(&self) -> impl Signal<Item = bool> + use<> {
        self.state.signal()
    }
}

impl Default for Expandable {
    fn default() -> Self {
        Self::new(false)
    }
}
