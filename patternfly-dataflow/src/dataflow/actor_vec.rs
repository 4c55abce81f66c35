//! Reactive collection container.
//!
//! [`ActorVec`] is the collection sibling of [`Actor`](crate::dataflow::Actor):
//! a `MutableVec` owned by a sequential processor. Collection edits surface
//! as `VecDiff`s for efficient list rendering, or as whole-vector signals for
//! derivations and tests.

use crate::dataflow::{Task, TaskHandle};
use futures::stream::Stream;
use futures_signals::signal::{Signal, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVec, SignalVecExt};
use std::future::Future;
use std::sync::Arc;

/// Sequentially updated collection with reactive read access.
#[derive(Clone, Debug)]
pub struct ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    vec: MutableVec<T>,
    _task_handle: Arc<TaskHandle>,
}

impl<T> ActorVec<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a collection actor from its initial items and a processor.
    /// The processor receives an [`ActorVecHandle`] and is the only place
    /// the collection is edited.
    pub fn new<F, Fut>(initial_items: Vec<T>, processor: F) -> Self
    where
        F: FnOnce(ActorVecHandle<T>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let vec = MutableVec::new_with_values(initial_items);
        let handle = ActorVecHandle { vec: vec.clone() };
        let task_handle = Arc::new(Task::start_droppable(processor(handle)));

        Self {
            vec,
            _task_handle: task_handle,
        }
    }

    /// Whole-collection signal. Prefer [`ActorVec::signal_vec`] for list
    /// rendering; this form suits derivations over the full contents.
    pub fn signal(&self) -> impl Signal<Item = Vec<T>> + use<T> {
        self.vec.signal_vec_cloned().to_signal_cloned()
    }

    /// `VecDiff` signal emitting only the changes.
    pub fn signal_vec(&self) -> impl SignalVec<Item = T> + use<T> {
        self.vec.signal_vec_cloned()
    }

    /// Distinct-until-changed projection over the collection contents.
    pub fn signal_ref<U, F>(&self, f: F) -> impl Signal<Item = U> + use<T, U, F>
    where
        F: Fn(&[T]) -> U + Send + Sync + 'static,
        U: PartialEq + Clone + Send + Sync + 'static,
    {
        self.vec
            .signal_vec_cloned()
            .to_signal_cloned()
            .map(move |items| f(&items))
            .dedupe_cloned()
    }

    /// Reactive collection length.
    pub fn len_signal(&self) -> impl Signal<Item = usize> + use<T> {
        self.signal_ref(|items| items.len())
    }

    /// Whole-collection stream, mainly for tests and async consumers.
    pub fn to_stream(&self) -> impl Stream<Item = Vec<T>> + use<T> {
        self.signal().to_stream()
    }
}

/// Edit handle passed to an [`ActorVec`] processor.
pub struct ActorVecHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    vec: MutableVec<T>,
}

impl<T> ActorVecHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Append an item.
    pub fn push_cloned(&self, item: T) {
        self.vec.lock_mut().push_cloned(item);
    }

    /// Remove the item at `index`; out-of-range indices are a no-op.
    pub fn remove(&self, index: usize) -> Option<T> {
        let mut items = self.vec.lock_mut();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// Keep only the items matching the predicate; returns how many were
    /// dropped.
    pub fn retain<F>(&self, mut f: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut items = self.vec.lock_mut();
        let before = items.len();
        items.retain(|item| f(item));
        before - items.len()
    }

    /// Replace the whole collection in one emission.
    pub fn replace_cloned(&self, items: Vec<T>) {
        self.vec.lock_mut().replace_cloned(items);
    }

    /// Drop every item.
    pub fn clear(&self) {
        self.vec.lock_mut().clear();
    }

    /// Current length, for processor-local decisions.
    pub fn len(&self) -> usize {
        self.vec.lock_ref().len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.vec.lock_ref().is_empty()
    }
}
