//! Single-value reactive state container.
//!
//! An [`Actor`] owns one piece of coordinator state and the sequential
//! processor task that mutates it. Commands arrive as relay streams, are
//! applied one at a time, and every applied command is visible downstream as
//! a single signal emission. There is no public getter; consumers bind to
//! signals.

use crate::dataflow::{Task, TaskHandle};
use futures_signals::signal::{Mutable, Signal};
use std::future::Future;
use std::sync::Arc;

/// Sequentially updated state with reactive read access.
#[derive(Clone, Debug)]
pub struct Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: Mutable<T>,
    _task_handle: Arc<TaskHandle>,
}

impl<T> Actor<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an actor from its initial state and a processor.
    ///
    /// The processor receives the state handle and typically loops over
    /// `select!`ed command streams, mutating through `lock_mut`, `set`, or
    /// `set_neq`. It is aborted when the last actor clone is dropped.
    ///
    /// ```
    /// use futures::StreamExt;
    /// use patternfly_dataflow::dataflow::{Actor, relay};
    ///
    /// # async fn demo() {
    /// let (page_changed_relay, mut page_changed_stream) = relay::<usize>();
    ///
    /// let page = Actor::new(0usize, async move |state| {
    ///     while let Some(page) = page_changed_stream.next().await {
    ///         state.set_neq(page);
    ///     }
    /// });
    ///
    /// page_changed_relay.send(2);
    /// # }
    /// ```
    pub fn new<F, Fut>(initial_state: T, processor: F) -> Self
    where
        F: FnOnce(Mutable<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let state = Mutable::new(initial_state);
        let task_handle = Arc::new(Task::start_droppable(processor(state.clone())));

        Self {
            state,
            _task_handle: task_handle,
        }
    }

    /// Reactive view of the state. Emits the current value immediately and
    /// every applied command afterwards.
    pub fn signal(&self) -> impl Signal<Item = T> + use<T> {
        self.state.signal_cloned()
    }

    /// Reactive view of a projection of the state, without cloning the whole
    /// value on every emission.
    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        F: Fn(&T) -> U + Send + Sync + 'static,
        U: PartialEq + Send + Sync + 'static,
    {
        self.state.signal_ref(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataflow::relay;
    use futures::{StreamExt, select};
    use futures_signals::signal::SignalExt;

    #[tokio::test]
    async fn commands_are_applied_in_arrival_order() {
        let (count_changed_relay, mut count_changed_stream) = relay::<i32>();

        let count = Actor::new(0, async move |state| {
            while let Some(delta) = count_changed_stream.next().await {
                let next = *state.lock_ref() + delta;
                state.set(next);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        for delta in [5, -2, 4] {
            count_changed_relay.send(delta);
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert_eq!(count.signal().to_stream().next().await, Some(7));
    }

    #[tokio::test]
    async fn a_processor_can_select_over_several_streams() {
        let (expanded_relay, mut expanded_stream) = relay::<()>();
        let (collapsed_relay, mut collapsed_stream) = relay::<()>();

        let open_groups = Actor::new(0usize, async move |state| {
            loop {
                select! {
                    expanded = expanded_stream.next() => {
                        match expanded {
                            Some(()) => {
                                let next = *state.lock_ref() + 1;
                                state.set(next);
                            }
                            None => break,
                        }
                    }
                    collapsed = collapsed_stream.next() => {
                        match collapsed {
                            Some(()) => {
                                let next = state.lock_ref().saturating_sub(1);
                                state.set(next);
                            }
                            None => break,
                        }
                    }
                    complete => break,
                }
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        // Each relay keeps a single emit site.
        for _ in 0..2 {
            expanded_relay.send(());
            tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        }
        collapsed_relay.send(());
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        assert_eq!(open_groups.signal().to_stream().next().await, Some(1));
    }

    #[tokio::test]
    async fn signal_ref_projects_without_cloning_state() {
        let (label_changed_relay, mut label_changed_stream) = relay::<String>();

        let label = Actor::new(String::from("badge"), async move |state| {
            while let Some(value) = label_changed_stream.next().await {
                state.set(value);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        label_changed_relay.send("overflow".to_string());
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        let length = label.signal_ref(|value| value.len());
        assert_eq!(length.to_stream().next().await, Some(8));
    }
}
