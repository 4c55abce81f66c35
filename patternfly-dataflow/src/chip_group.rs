//! Chip-group membership and overflow coordination.

use crate::dataflow::{ActorVec, Relay, relay};
use crate::expansion::Expandable;
use crate::item_store::IdProvider;
use futures::{StreamExt, select};
use futures_signals::map_ref;
use futures_signals::signal::{Signal, SignalExt};
use std::sync::Arc;

/// How many chips a collapsed group shows before overflowing.
pub const DEFAULT_CHIP_LIMIT: usize = 3;

/// Reactive chip collection with an overflow limit.
///
/// A collapsed group shows the first `limit` chips and an "N more" overflow
/// count; expanding shows everything. Chips close by identity.
#[derive(Clone)]
pub struct ChipGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    chips: ActorVec<T>,
    limit: usize,
    pub expanded: Expandable,
    pub chip_added_relay: Relay<T>,
    pub chip_closed_relay: Relay<String>,
    pub chips_replaced_relay: Relay<Vec<T>>,
}

impl<T> ChipGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(id_provider: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self::with_limit(id_provider, DEFAULT_CHIP_LIMIT)
    }

    /// A group showing at most `limit` chips while collapsed. A zero limit
    /// is raised to one so the overflow chip always has an anchor.
    pub fn with_limit(
        id_provider: impl Fn(&T) -> String + Send + Sync + 'static,
        limit: usize,
    ) -> Self {
        let id_provider: IdProvider<T> = Arc::new(id_provider);
        let (chip_added_relay, mut chip_added_stream) = relay::<T>();
        let (chip_closed_relay, mut chip_closed_stream) = relay::<String>();
        let (chips_replaced_relay, mut chips_replaced_stream) = relay::<Vec<T>>();

        let chips = ActorVec::new(Vec::new(), async move |chips| {
            loop {
                select! {
                    chip = chip_added_stream.next() => {
                        match chip {
                            Some(chip) => chips.push_cloned(chip),
                            None => break,
                        }
                    }
                    id = chip_closed_stream.next() => {
                        match id {
                            Some(id) => {
                                chips.retain(|chip| (id_provider)(chip) != id);
                            }
                            None => break,
                        }
                    }
                    replacement = chips_replaced_stream.next() => {
                        match replacement {
                            Some(replacement) => chips.replace_cloned(replacement),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            chips,
            limit: limit.max(1),
            expanded: Expandable::new(false),
            chip_added_relay,
            chip_closed_relay,
            chips_replaced_relay,
        }
    }

    pub fn add_chip(&self, chip: T) {
        self.chip_added_relay.send(chip);
    }

    /// Close the chip with the given identity; unknown identities are a
    /// no-op.
    pub fn close_chip(&self, id: impl Into<String>) {
        self.chip_closed_relay.send(id.into());
    }

    pub fn set_chips(&self, chips: Vec<T>) {
        self.chips_replaced_relay.send(chips);
    }

    pub fn toggle(&self) {
        self.expanded.toggle();
    }

    /// Every chip, regardless of the overflow state.
    pub fn chips_signal(&self) -> impl Signal<Item = Vec<T>> + use<T> {
        self.chips.signal()
    }

    pub fn len_signal(&self) -> impl Signal<Item = usize> + use<T> {
        self.chips.len_signal()
    }

    /// Chips currently shown: everything when expanded or under the limit,
    /// otherwise the first `limit`.
    pub fn visible_chips_signal(&self) -> impl Signal<Item = Vec<T>> + use<T>
    where
        T: PartialEq,
    {
        let limit = self.limit;
        let chips = self.chips.signal();
        let expanded = self.expanded.signal();
        map_ref! {
            let chips = chips,
            let expanded = expanded => {
                if *expanded || chips.len() <= limit {
                    chips.clone()
                } else {
                    chips[..limit].to_vec()
                }
            }
        }
        .dedupe_cloned()
    }

    /// Hidden-chip count behind the "N more" chip; `None` while nothing is
    /// hidden.
    pub fn overflow_signal(&self) -> impl Signal<Item = Option<usize>> + use<T> {
        let limit = self.limit;
        let chips = self.chips.signal();
        let expanded = self.expanded.signal();
        map_ref! {
            let chips = chips,
            let expanded = expanded => {
                if !*expanded && chips.len() > limit {
                    Some(chips.len() - limit)
                } else {
                    None
                }
            }
        }
        .dedupe()
    }
}
