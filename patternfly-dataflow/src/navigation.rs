//! Routing seam and navigation-group coordination.
//!
//! Routing itself lives in the host: it drains navigation requests and
//! publishes route changes. Everything here derives from the published
//! route, synchronously in the same reaction, so there is no settling window
//! between a route change and the `current` flags that depend on it.

use crate::dataflow::{Actor, Relay, relay};
use crate::expansion::Expandable;
use futures::channel::mpsc::UnboundedReceiver;
use futures::{StreamExt, select};
use futures_signals::signal::{Signal, SignalExt};
use std::sync::Arc;

/// Decides whether a route matches a navigation item.
pub type RoutePredicate<R> = Arc<dyn Fn(&R, &R) -> bool + Send + Sync>;

/// Routing seam: the current route as a reactive value plus a
/// navigation-request sink.
#[derive(Clone, Debug)]
pub struct Router<R>
where
    R: Clone + Send + Sync + 'static,
{
    current: Actor<Option<R>>,
    pub route_changed_relay: Relay<R>,
    pub navigation_requested_relay: Relay<R>,
}

impl<R> Router<R>
where
    R: Clone + Send + Sync + PartialEq + 'static,
{
    /// Returns the router and the stream of navigation requests the host
    /// routing layer is expected to drain.
    pub fn new() -> (Self, UnboundedReceiver<R>) {
        let (route_changed_relay, mut route_changed_stream) = relay::<R>();
        let (navigation_requested_relay, navigation_requests) = relay::<R>();

        let current = Actor::new(None, async move |state| {
            while let Some(route) = route_changed_stream.next().await {
                state.set_neq(Some(route));
            }
        });

        (
            Self {
                current,
                route_changed_relay,
                navigation_requested_relay,
            },
            navigation_requests,
        )
    }
}

impl<R> Router<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Host side: publish the route that became current.
    pub fn set_route(&self, route: R) {
        self.route_changed_relay.send(route);
    }

    /// Component side: ask the host to navigate.
    pub fn goto(&self, route: R) {
        self.navigation_requested_relay.send(route);
    }

    /// Current route, distinct until changed; `None` before the first
    /// publish.
    pub fn route_signal(&self) -> impl Signal<Item = Option<R>> + use<R> {
        self.current.signal()
    }
}

/// Decides item currency for a router, with a configurable predicate.
#[derive(Clone)]
pub struct Navigation<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub router: Router<R>,
    selected: RoutePredicate<R>,
}

impl<R> Navigation<R>
where
    R: Clone + Send + Sync + PartialEq + 'static,
{
    /// Route equality decides currency.
    pub fn new(router: Router<R>) -> Self {
        Self::with_selected(router, |route, item| route == item)
    }
}

impl<R> Navigation<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Caller-supplied currency predicate, called as `(route, item)`.
    pub fn with_selected(
        router: Router<R>,
        selected: impl Fn(&R, &R) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            router,
            selected: Arc::new(selected),
        }
    }

    /// Whether `item` is the current route target.
    pub fn item_current_signal(&self, item: R) -> impl Signal<Item = bool> + use<R> {
        let selected = self.selected.clone();
        self.router
            .route_signal()
            .map(move |route| route.as_ref().is_some_and(|route| selected(route, &item)))
            .dedupe()
    }

    /// A collapsible group of items. Groups are independent: expanding one
    /// never collapses its siblings.
    pub fn expandable_group(&self) -> ExpandableGroup<R> {
        ExpandableGroup::new(self)
    }
}

/// State of one expandable navigation group.
///
/// `expanded` is driven by the user. `current` derives from the registered
/// descendant items and the route, recomputed in the same reaction that
/// delivers either kind of change.
#[derive(Clone, Debug)]
pub struct ExpandableGroup<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub expanded: Expandable,
    current: Actor<bool>,
    pub item_registered_relay: Relay<R>,
}

impl<R> ExpandableGroup<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub fn new(navigation: &Navigation<R>) -> Self {
        let (item_registered_relay, mut item_registered_stream) = relay::<R>();
        let selected = navigation.selected.clone();
        let mut route_stream = navigation.router.route_signal().to_stream().fuse();

        let current = Actor::new(false, async move |state| {
            let mut items: Vec<R> = Vec::new();
            let mut route: Option<R> = None;
            loop {
                select! {
                    new_route = route_stream.next() => {
                        match new_route {
                            Some(new_route) => route = new_route,
                            None => break,
                        }
                    }
                    item = item_registered_stream.next() => {
                        match item {
                            Some(item) => items.push(item),
                            None => break,
                        }
                    }
                    complete => break,
                }

                let contains_current = route
                    .as_ref()
                    .is_some_and(|route| items.iter().any(|item| selected(route, item)));
                state.set_neq(contains_current);
            }
        });

        Self {
            expanded: Expandable::new(false),
            current,
            item_registered_relay,
        }
    }

    /// Register a descendant item; currency derives from the registry.
    pub fn register_item(&self, item: R) {
        self.item_registered_relay.send(item);
    }

    pub fn toggle(&self) {
        self.expanded.toggle();
    }

    pub fn expanded_signal(&self) -> impl Signal<Item = bool> + use<R> {
        self.expanded.signal()
    }

    pub fn current_signal(&self) -> impl Signal<Item = bool> + use<R> {
        self.current.signal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn settle() {
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    async fn value<S: Signal<Item = bool>>(signal: S) -> bool {
        Box::pin(signal.to_stream()).next().await.unwrap()
    }

    #[tokio::test]
    async fn item_currency_follows_the_route() {
        let (router, _requests) = Router::new();
        let navigation = Navigation::new(router.clone());
        settle().await;

        router.set_route("files");
        settle().await;
        assert!(value(navigation.item_current_signal("files")).await);
        assert!(!value(navigation.item_current_signal("settings")).await);

        router.set_route("settings");
        settle().await;
        assert!(!value(navigation.item_current_signal("files")).await);
    }

    #[tokio::test]
    async fn group_currency_recomputes_on_route_changes() {
        let (router, _requests) = Router::new();
        let navigation = Navigation::new(router.clone());
        let group = navigation.expandable_group();
        settle().await;

        group.register_item("reports");
        group.register_item("archive");
        settle().await;
        assert!(!value(group.current_signal()).await);

        router.set_route("archive");
        settle().await;
        assert!(value(group.current_signal()).await);

        router.set_route("elsewhere");
        settle().await;
        assert!(!value(group.current_signal()).await);
    }

    #[tokio::test]
    async fn a_custom_predicate_can_match_route_prefixes() {
        let (router, _requests) = Router::new();
        let navigation = Navigation::with_selected(router.clone(), |route: &String, item: &String| {
            route.starts_with(item.as_str())
        });
        let group = navigation.expandable_group();
        settle().await;

        group.register_item("reports".to_string());
        settle().await;

        router.set_route("reports/2024".to_string());
        settle().await;
        assert!(value(group.current_signal()).await);
    }

    #[tokio::test]
    async fn toggling_a_group_twice_restores_its_expansion() {
        let (router, _requests) = Router::<&'static str>::new();
        let navigation = Navigation::new(router);
        let group = navigation.expandable_group();
        settle().await;

        group.toggle();
        settle().await;
        assert!(value(group.expanded_signal()).await);

        group.toggle();
        settle().await;
        assert!(!value(group.expanded_signal()).await);
    }

    #[tokio::test]
    async fn groups_expand_independently() {
        let (router, _requests) = Router::<&'static str>::new();
        let navigation = Navigation::new(router);
        let first = navigation.expandable_group();
        let second = navigation.expandable_group();
        settle().await;

        first.toggle();
        settle().await;
        assert!(value(first.expanded_signal()).await);
        assert!(!value(second.expanded_signal()).await);
    }

    #[tokio::test]
    async fn navigation_requests_reach_the_host() {
        let (router, mut requests) = Router::new();
        settle().await;

        router.goto("files");
        assert_eq!(requests.next().await, Some("files"));
    }
}
