//! Item collection coordinator behind toolbar-driven lists.
//!
//! [`ItemStore`] owns one list's collection together with its selection,
//! paging, and sorting state. Commands arrive through relays and are applied
//! one at a time by a sequential processor; every applied command produces
//! the next [`Items`] snapshot, from which the paged view, the selected
//! count, and the tri-state aggregate derive.

use crate::dataflow::{Actor, Relay, relay};
use crate::types::TriState;
use futures::{StreamExt, select};
use futures_signals::signal::{Signal, SignalExt};
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Extracts the unique identity of a domain item. Identities drive selection
/// membership and must be injective over the collection; see
/// [`ItemStore::set_items`] for the duplicate contract.
pub type IdProvider<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Total order over domain items, shared between sort options and the store.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Paging state of a coordinated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    pub page_size: usize,
    /// Zero-based page index, always within `0..=max_page`.
    pub page: usize,
    pub total: usize,
}

impl PageInfo {
    pub const DEFAULT_PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

    fn new(page_size: usize) -> Self {
        Self {
            page_size,
            page: 0,
            total: 0,
        }
    }

    /// Highest valid page index. An empty collection still has page 0.
    pub fn max_page(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.total - 1) / self.page_size
        }
    }

    /// Index range of the current page within the sorted collection.
    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }
}

/// Comparator plus direction; the absence of a `SortInfo` means insertion
/// order.
#[derive(Clone)]
pub struct SortInfo<T> {
    comparator: Comparator<T>,
    ascending: bool,
}

impl<T> SortInfo<T> {
    pub fn new(
        comparator: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
        ascending: bool,
    ) -> Self {
        Self::from_comparator(Arc::new(comparator), ascending)
    }

    pub(crate) fn from_comparator(comparator: Comparator<T>, ascending: bool) -> Self {
        Self {
            comparator,
            ascending,
        }
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = (self.comparator)(a, b);
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

impl<T> fmt::Debug for SortInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortInfo")
            .field("ascending", &self.ascending)
            .finish_non_exhaustive()
    }
}

/// Atomic snapshot of a coordinated list: collection, selection, paging, and
/// sorting. Commands transform one snapshot into the next; nothing downstream
/// ever observes a partially applied command.
#[derive(Clone)]
pub struct Items<T>
where
    T: Clone + Send + Sync + 'static,
{
    all: Vec<T>,
    id_provider: IdProvider<T>,
    selected: IndexSet<String>,
    page_info: PageInfo,
    sort_info: Option<SortInfo<T>>,
}

impl<T> Items<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn new(id_provider: IdProvider<T>, page_size: usize) -> Self {
        Self {
            all: Vec::new(),
            id_provider,
            selected: IndexSet::new(),
            page_info: PageInfo::new(page_size),
            sort_info: None,
        }
    }

    /// Full collection in insertion order, unsorted and unpaged.
    pub fn all(&self) -> &[T] {
        &self.all
    }

    /// Identities currently selected, in selection order.
    pub fn selected(&self) -> &IndexSet<String> {
        &self.selected
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn page_info(&self) -> PageInfo {
        self.page_info
    }

    pub fn tri_state(&self) -> TriState {
        TriState::of(self.selected.len(), self.all.len())
    }

    pub fn is_selected(&self, item: &T) -> bool {
        self.selected.contains(&(self.id_provider)(item))
    }

    /// Sorted, page-bounded slice currently intended for display.
    pub fn page_view(&self) -> Vec<T> {
        let mut sorted = self.all.clone();
        if let Some(sort_info) = &self.sort_info {
            sorted.sort_by(|a, b| sort_info.compare(a, b));
        }
        sorted[self.page_info.range()].to_vec()
    }

    fn replace(&mut self, items: Vec<T>) {
        // Identity uniqueness is the caller's contract; on violation the
        // later occurrence wins, at the first occurrence's position.
        let mut unique: IndexMap<String, T> = IndexMap::with_capacity(items.len());
        for item in items {
            unique.insert((self.id_provider)(&item), item);
        }
        self.selected.retain(|id| unique.contains_key(id));
        self.all = unique.into_values().collect();
        self.page_info.total = self.all.len();
        if self.page_info.page > self.page_info.max_page() {
            self.page_info.page = 0;
        }
    }

    fn select_all(&mut self) {
        self.selected = self
            .all
            .iter()
            .map(|item| (self.id_provider)(item))
            .collect();
    }

    fn select_none(&mut self) {
        self.selected.clear();
    }

    // Additive: identities from earlier pages stay selected.
    fn select_visible(&mut self) {
        for item in self.page_view() {
            self.selected.insert((self.id_provider)(&item));
        }
    }

    fn select(&mut self, id: String, selected: bool) {
        if !self.all.iter().any(|item| (self.id_provider)(item) == id) {
            return;
        }
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.shift_remove(&id);
        }
    }

    fn toggle(&mut self, id: String) {
        let selected = !self.selected.contains(&id);
        self.select(id, selected);
    }

    fn sort_with(&mut self, sort_info: SortInfo<T>) {
        // The page index is deliberately retained across re-sorts.
        self.sort_info = Some(sort_info);
    }

    fn set_page(&mut self, page: usize) {
        self.page_info.page = page.min(self.page_info.max_page());
    }

    fn set_page_size(&mut self, allowed: &[usize], requested: usize) {
        if let Some(snapped) = allowed
            .iter()
            .copied()
            .min_by_key(|size| size.abs_diff(requested))
        {
            self.page_info.page_size = snapped;
        }
        self.page_info.page = self.page_info.page.min(self.page_info.max_page());
    }
}

impl<T> fmt::Debug for Items<T>
where
    T: fmt::Debug + Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Items")
            .field("all", &self.all)
            .field("selected", &self.selected)
            .field("page_info", &self.page_info)
            .field("sort_info", &self.sort_info)
            .finish()
    }
}

/// Coordinator owning one list's collection, selection, paging, and sorting.
///
/// Created once per list-bearing composition and dropped with it; dropping
/// the last clone aborts the processor. Command methods are the single
/// emit site of their relay, so wiring code and widget couplers route through
/// them rather than sending directly.
#[derive(Clone, Debug)]
pub struct ItemStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Actor<Items<T>>,
    page_sizes: Arc<Vec<usize>>,
    pub items_replaced_relay: Relay<Vec<T>>,
    pub all_selected_relay: Relay<()>,
    pub selection_cleared_relay: Relay<()>,
    pub visible_selected_relay: Relay<()>,
    pub item_selection_changed_relay: Relay<(String, bool)>,
    pub item_toggled_relay: Relay<String>,
    pub sort_changed_relay: Relay<SortInfo<T>>,
    pub page_changed_relay: Relay<usize>,
    pub page_size_changed_relay: Relay<usize>,
}

impl<T> ItemStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Store with the default allowed page sizes.
    pub fn new(id_provider: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self::with_page_sizes(id_provider, PageInfo::DEFAULT_PAGE_SIZES.to_vec())
    }

    /// Store with a caller-configured allowed page-size set. Zero entries are
    /// discarded and an empty set falls back to the defaults; the first entry
    /// is the initial page size.
    pub fn with_page_sizes(
        id_provider: impl Fn(&T) -> String + Send + Sync + 'static,
        page_sizes: Vec<usize>,
    ) -> Self {
        let id_provider: IdProvider<T> = Arc::new(id_provider);
        let mut page_sizes: Vec<usize> = page_sizes.into_iter().filter(|size| *size > 0).collect();
        if page_sizes.is_empty() {
            page_sizes = PageInfo::DEFAULT_PAGE_SIZES.to_vec();
        }
        let page_sizes = Arc::new(page_sizes);

        let (items_replaced_relay, mut items_replaced_stream) = relay::<Vec<T>>();
        let (all_selected_relay, mut all_selected_stream) = relay::<()>();
        let (selection_cleared_relay, mut selection_cleared_stream) = relay::<()>();
        let (visible_selected_relay, mut visible_selected_stream) = relay::<()>();
        let (item_selection_changed_relay, mut item_selection_changed_stream) =
            relay::<(String, bool)>();
        let (item_toggled_relay, mut item_toggled_stream) = relay::<String>();
        let (sort_changed_relay, mut sort_changed_stream) = relay::<SortInfo<T>>();
        let (page_changed_relay, mut page_changed_stream) = relay::<usize>();
        let (page_size_changed_relay, mut page_size_changed_stream) = relay::<usize>();

        let allowed_page_sizes = page_sizes.clone();
        let initial = Items::new(id_provider, page_sizes[0]);
        let state = Actor::new(initial, async move |state| {
            loop {
                select! {
                    items = items_replaced_stream.next() => {
                        match items {
                            Some(items) => state.lock_mut().replace(items),
                            None => break,
                        }
                    }
                    selected = all_selected_stream.next() => {
                        match selected {
                            Some(()) => state.lock_mut().select_all(),
                            None => break,
                        }
                    }
                    cleared = selection_cleared_stream.next() => {
                        match cleared {
                            Some(()) => state.lock_mut().select_none(),
                            None => break,
                        }
                    }
                    visible = visible_selected_stream.next() => {
                        match visible {
                            Some(()) => state.lock_mut().select_visible(),
                            None => break,
                        }
                    }
                    change = item_selection_changed_stream.next() => {
                        match change {
                            Some((id, selected)) => state.lock_mut().select(id, selected),
                            None => break,
                        }
                    }
                    id = item_toggled_stream.next() => {
                        match id {
                            Some(id) => state.lock_mut().toggle(id),
                            None => break,
                        }
                    }
                    sort_info = sort_changed_stream.next() => {
                        match sort_info {
                            Some(sort_info) => state.lock_mut().sort_with(sort_info),
                            None => break,
                        }
                    }
                    page = page_changed_stream.next() => {
                        match page {
                            Some(page) => state.lock_mut().set_page(page),
                            None => break,
                        }
                    }
                    page_size = page_size_changed_stream.next() => {
                        match page_size {
                            Some(size) => state.lock_mut().set_page_size(&allowed_page_sizes, size),
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            state,
            page_sizes,
            items_replaced_relay,
            all_selected_relay,
            selection_cleared_relay,
            visible_selected_relay,
            item_selection_changed_relay,
            item_toggled_relay,
            sort_changed_relay,
            page_changed_relay,
            page_size_changed_relay,
        }
    }

    /// Replace the collection. Selection survives for identities still
    /// present; the page index resets to 0 when it falls out of range.
    pub fn set_items(&self, items: Vec<T>) {
        self.items_replaced_relay.send(items);
    }

    pub fn select_all(&self) {
        self.all_selected_relay.send(());
    }

    pub fn select_none(&self) {
        self.selection_cleared_relay.send(());
    }

    /// Add the current page view's identities to the selection.
    pub fn select_visible(&self) {
        self.visible_selected_relay.send(());
    }

    /// Select or deselect one identity; unknown identities are ignored.
    pub fn select(&self, id: impl Into<String>, selected: bool) {
        self.item_selection_changed_relay.send((id.into(), selected));
    }

    pub fn toggle_selection(&self, id: impl Into<String>) {
        self.item_toggled_relay.send(id.into());
    }

    /// Set the sort order. The page index stays where it is.
    pub fn sort_with(&self, sort_info: SortInfo<T>) {
        self.sort_changed_relay.send(sort_info);
    }

    /// Jump to a page; out-of-range indices clamp to the last page.
    pub fn set_page(&self, page: usize) {
        self.page_changed_relay.send(page);
    }

    /// Change the page size; values outside the allowed set snap to the
    /// nearest allowed one.
    pub fn set_page_size(&self, page_size: usize) {
        self.page_size_changed_relay.send(page_size);
    }

    /// The allowed page sizes, for rendering the page-size menu.
    pub fn page_sizes(&self) -> &[usize] {
        &self.page_sizes
    }

    /// Full snapshot stream.
    pub fn signal(&self) -> impl Signal<Item = Items<T>> + use<T> {
        self.state.signal()
    }

    pub fn selected_count_signal(&self) -> impl Signal<Item = usize> + use<T> {
        self.state.signal_ref(|items| items.selected_count()).dedupe()
    }

    pub fn tri_state_signal(&self) -> impl Signal<Item = TriState> + use<T> {
        self.state.signal_ref(|items| items.tri_state()).dedupe()
    }

    pub fn page_info_signal(&self) -> impl Signal<Item = PageInfo> + use<T> {
        self.state.signal_ref(|items| items.page_info()).dedupe()
    }

    pub fn page_view_signal(&self) -> impl Signal<Item = Vec<T>> + use<T>
    where
        T: PartialEq,
    {
        self.state.signal_ref(|items| items.page_view()).dedupe_cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn store() -> ItemStore<&'static str> {
        ItemStore::new(|item: &&str| (*item).to_string())
    }

    fn paged_store(page_sizes: &[usize]) -> ItemStore<&'static str> {
        ItemStore::with_page_sizes(|item: &&str| (*item).to_string(), page_sizes.to_vec())
    }

    async fn settle() {
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    async fn snapshot<T>(store: &ItemStore<T>) -> Items<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        store.signal().to_stream().next().await.unwrap()
    }

    #[tokio::test]
    async fn select_all_and_none_track_collection_size() {
        let store = store();
        settle().await;

        store.set_items(vec!["a", "b", "c"]);
        settle().await;
        store.select_all();
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(items.selected_count(), 3);
        assert_eq!(items.tri_state(), TriState::On);

        store.select_none();
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(items.selected_count(), 0);
        assert_eq!(items.tri_state(), TriState::Off);
    }

    #[tokio::test]
    async fn set_page_clamps_into_valid_range() {
        let store = paged_store(&[2]);
        settle().await;

        store.set_items(vec!["a", "b", "c", "d", "e"]);
        settle().await;

        store.set_page(7);
        settle().await;
        assert_eq!(snapshot(&store).await.page_info().page, 2);

        store.set_page(1);
        settle().await;
        assert_eq!(snapshot(&store).await.page_info().page, 1);
    }

    #[tokio::test]
    async fn select_visible_is_additive_across_pages() {
        let store = paged_store(&[2]);
        settle().await;

        store.set_items(vec!["a", "b", "c", "d", "e"]);
        settle().await;
        assert_eq!(snapshot(&store).await.page_view(), vec!["a", "b"]);

        store.select_visible();
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(
            items.selected().iter().collect::<Vec<_>>(),
            ["a", "b"]
        );
        assert_eq!(items.tri_state(), TriState::Indeterminate);

        store.set_page(1);
        settle().await;
        assert_eq!(snapshot(&store).await.page_view(), vec!["c", "d"]);

        store.select_visible();
        settle().await;
        assert_eq!(
            snapshot(&store).await.selected().iter().collect::<Vec<_>>(),
            ["a", "b", "c", "d"]
        );
    }

    #[tokio::test]
    async fn replacing_with_the_same_items_preserves_selection() {
        let store = store();
        settle().await;

        store.set_items(vec!["a", "b", "c"]);
        settle().await;
        store.select("b", true);
        settle().await;

        store.set_items(vec!["a", "b", "c"]);
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(items.selected().iter().collect::<Vec<_>>(), ["b"]);
        assert!(items.is_selected(&"b"));
    }

    #[tokio::test]
    async fn replacing_prunes_vanished_identities_and_resets_the_page() {
        let store = paged_store(&[2]);
        settle().await;

        store.set_items(vec!["a", "b", "c", "d", "e"]);
        settle().await;
        store.select_all();
        settle().await;
        store.set_page(2);
        settle().await;

        store.set_items(vec!["b", "e"]);
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(items.selected().iter().collect::<Vec<_>>(), ["b", "e"]);
        assert_eq!(items.page_info().page, 0);
        assert_eq!(items.page_info().total, 2);
    }

    #[tokio::test]
    async fn duplicate_identities_resolve_to_the_last_occurrence() {
        let store = ItemStore::new(|item: &(u32, &str)| item.0.to_string());
        settle().await;

        store.set_items(vec![(1, "first"), (2, "other"), (1, "replacement")]);
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(items.all().to_vec(), vec![(1, "replacement"), (2, "other")]);
        assert_eq!(items.page_info().total, 2);
    }

    #[tokio::test]
    async fn page_size_snaps_to_the_nearest_allowed_value() {
        let store = store();
        settle().await;

        store.set_page_size(25);
        settle().await;
        assert_eq!(snapshot(&store).await.page_info().page_size, 20);

        store.set_page_size(3);
        settle().await;
        assert_eq!(snapshot(&store).await.page_info().page_size, 10);
    }

    #[tokio::test]
    async fn growing_the_page_size_pulls_the_page_back_into_range() {
        let store = paged_store(&[2, 10]);
        settle().await;

        store.set_items(vec!["a", "b", "c", "d", "e"]);
        settle().await;
        store.set_page(2);
        settle().await;

        store.set_page_size(10);
        settle().await;
        let page_info = snapshot(&store).await.page_info();
        assert_eq!(page_info.page_size, 10);
        assert_eq!(page_info.page, 0);
    }

    #[tokio::test]
    async fn sorting_orders_the_page_view_and_retains_the_page() {
        let store = paged_store(&[2]);
        settle().await;

        store.set_items(vec!["e", "c", "a", "d", "b"]);
        settle().await;
        // Insertion order until a sort is requested.
        assert_eq!(snapshot(&store).await.page_view(), vec!["e", "c"]);

        store.set_page(1);
        settle().await;
        store.sort_with(SortInfo::new(|a: &&str, b: &&str| a.cmp(b), true));
        settle().await;
        let items = snapshot(&store).await;
        assert_eq!(items.page_info().page, 1);
        assert_eq!(items.page_view(), vec!["c", "d"]);

        store.sort_with(SortInfo::new(|a: &&str, b: &&str| a.cmp(b), false));
        settle().await;
        assert_eq!(snapshot(&store).await.page_view(), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn unknown_identities_are_ignored_by_item_selection() {
        let store = store();
        settle().await;

        store.set_items(vec!["a", "b"]);
        settle().await;
        store.select("ghost", true);
        settle().await;
        assert_eq!(snapshot(&store).await.selected_count(), 0);

        store.toggle_selection("a");
        settle().await;
        assert_eq!(
            snapshot(&store).await.selected().iter().collect::<Vec<_>>(),
            ["a"]
        );
    }
}
