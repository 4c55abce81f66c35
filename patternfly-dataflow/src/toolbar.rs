//! Bulk-select and sort-options coordination for toolbar widgets.
//!
//! Both couplers sit between a widget surface and an [`ItemStore`]: they
//! translate widget events into store commands and derive the small bits of
//! display state the widgets need (toggle label, tri-state, menu selection).

use crate::dataflow::{Actor, Relay, Task, TaskHandle, relay};
use crate::item_store::{Comparator, ItemStore, SortInfo};
use crate::types::TriState;
use futures::{StreamExt, select};
use futures_signals::signal::{Signal, SignalExt};
use indexmap::IndexMap;
use std::sync::Arc;

/// Entries of the bulk-select dropdown menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreSelection {
    None,
    Visible,
    All,
}

impl PreSelection {
    /// Menu label.
    pub fn text(self) -> &'static str {
        match self {
            PreSelection::None => "Select none",
            PreSelection::Visible => "Select visible",
            PreSelection::All => "Select all",
        }
    }
}

/// Couples a split dropdown with a tri-state checkbox to an [`ItemStore`].
///
/// Checking the box selects everything, unchecking clears the selection, and
/// the menu entries apply their pre-selection. All paths route through the
/// store's command methods.
#[derive(Clone)]
pub struct BulkSelect<T>
where
    T: Clone + Send + Sync + 'static,
{
    store: ItemStore<T>,
    pub preselection_clicked_relay: Relay<PreSelection>,
    pub checkbox_changed_relay: Relay<bool>,
    _task_handle: Arc<TaskHandle>,
}

impl<T> BulkSelect<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(store: &ItemStore<T>) -> Self {
        let (preselection_clicked_relay, mut preselection_clicked_stream) =
            relay::<PreSelection>();
        let (checkbox_changed_relay, mut checkbox_changed_stream) = relay::<bool>();

        let command_store = store.clone();
        let task_handle = Arc::new(Task::start_droppable(async move {
            loop {
                select! {
                    preselection = preselection_clicked_stream.next() => {
                        match preselection {
                            Some(PreSelection::None) => command_store.select_none(),
                            Some(PreSelection::Visible) => command_store.select_visible(),
                            Some(PreSelection::All) => command_store.select_all(),
                            None => break,
                        }
                    }
                    checked = checkbox_changed_stream.next() => {
                        match checked {
                            Some(true) => command_store.select_all(),
                            Some(false) => command_store.select_none(),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        }));

        Self {
            store: store.clone(),
            preselection_clicked_relay,
            checkbox_changed_relay,
            _task_handle: task_handle,
        }
    }

    pub fn preselect(&self, preselection: PreSelection) {
        self.preselection_clicked_relay.send(preselection);
    }

    pub fn set_checked(&self, checked: bool) {
        self.checkbox_changed_relay.send(checked);
    }

    /// Toggle text next to the checkbox: "N selected", empty at zero.
    pub fn label_signal(&self) -> impl Signal<Item = String> + use<T> {
        self.store
            .selected_count_signal()
            .map(|count| {
                if count == 0 {
                    String::new()
                } else {
                    format!("{count} selected")
                }
            })
            .dedupe_cloned()
    }

    pub fn tri_state_signal(&self) -> impl Signal<Item = TriState> + use<T> {
        self.store.tri_state_signal()
    }
}

/// Current choice in the sort-options menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSelection {
    pub property: Option<String>,
    pub ascending: bool,
}

impl SortSelection {
    /// Menu label of the direction entry.
    pub fn order_text(&self) -> &'static str {
        if self.ascending { "Ascending" } else { "Descending" }
    }
}

impl Default for SortSelection {
    fn default() -> Self {
        Self {
            property: None,
            ascending: true,
        }
    }
}

/// Couples a sort-options menu to an [`ItemStore`].
///
/// Properties are offered by name. Choosing one, or flipping the direction
/// once a property is chosen, pushes the derived comparator to the store.
/// Direction changes without a chosen property stay local, and names with no
/// registered comparator are ignored.
#[derive(Clone)]
pub struct SortOptions<T>
where
    T: Clone + Send + Sync + 'static,
{
    options: Arc<IndexMap<String, Comparator<T>>>,
    selection: Actor<SortSelection>,
    pub property_selected_relay: Relay<String>,
    pub order_selected_relay: Relay<bool>,
}

impl<T> SortOptions<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(store: &ItemStore<T>, options: IndexMap<String, Comparator<T>>) -> Self {
        let options = Arc::new(options);
        let (property_selected_relay, mut property_selected_stream) = relay::<String>();
        let (order_selected_relay, mut order_selected_stream) = relay::<bool>();

        let store = store.clone();
        let menu_options = options.clone();
        let selection = Actor::new(SortSelection::default(), async move |state| {
            loop {
                let mut updated: Option<SortSelection> = None;
                select! {
                    property = property_selected_stream.next() => {
                        match property {
                            Some(property) if menu_options.contains_key(&property) => {
                                let mut selection = state.lock_ref().clone();
                                selection.property = Some(property);
                                updated = Some(selection);
                            }
                            // Names without a comparator cannot reorder anything.
                            Some(_) => {}
                            None => break,
                        }
                    }
                    ascending = order_selected_stream.next() => {
                        match ascending {
                            Some(ascending) => {
                                let mut selection = state.lock_ref().clone();
                                selection.ascending = ascending;
                                updated = Some(selection);
                            }
                            None => break,
                        }
                    }
                    complete => break,
                }

                if let Some(selection) = updated {
                    if let Some(comparator) = selection
                        .property
                        .as_ref()
                        .and_then(|name| menu_options.get(name))
                    {
                        store.sort_with(SortInfo::from_comparator(
                            comparator.clone(),
                            selection.ascending,
                        ));
                    }
                    state.set_neq(selection);
                }
            }
        });

        Self {
            options,
            selection,
            property_selected_relay,
            order_selected_relay,
        }
    }

    pub fn select_property(&self, name: impl Into<String>) {
        self.property_selected_relay.send(name.into());
    }

    pub fn select_order(&self, ascending: bool) {
        self.order_selected_relay.send(ascending);
    }

    /// Property names, in menu order.
    pub fn property_names(&self) -> Vec<String> {
        self.options.keys().cloned().collect()
    }

    pub fn selection_signal(&self) -> impl Signal<Item = SortSelection> + use<T> {
        self.selection.signal()
    }
}
