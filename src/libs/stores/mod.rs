//! In-memory state stores for a UI layer.
//!
//! Each store wraps its state in an [`Observable`]. Subscribers are called
//! once with the current state when they subscribe, then after every change.
//! The exercise and course stores cache query results from the data layer and
//! schedule the debounced auto-backup after each successful mutation. A failed
//! operation records its message in the store's `error` field, notifies
//! subscribers, and hands the error back to the caller.

pub mod course_store;
pub mod exercise_store;
pub mod filter_store;
pub mod search_store;

pub use course_store::{CourseState, CourseStore};
pub use exercise_store::{ExerciseState, ExerciseStore};
pub use filter_store::{FilterState, FilterStore};
pub use search_store::{SearchState, SearchStore};

pub type SubscriptionId = usize;

type Subscriber<S> = Box<dyn Fn(&S)>;

/// State plus the callbacks interested in it.
pub struct Observable<S> {
    state: S,
    subscribers: Vec<(SubscriptionId, Subscriber<S>)>,
    next_id: SubscriptionId,
}

impl<S: Default> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Observable<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &S {
        &self.state
    }

    /// Registers `callback` and immediately calls it with the current state.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&S) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        callback(&self.state);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn set(&mut self, state: S) {
        self.state = state;
        self.notify();
    }

    pub fn update<F>(&mut self, change: F)
    where
        F: FnOnce(&mut S),
    {
        change(&mut self.state);
        self.notify();
    }

    fn notify(&self) {
        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state);
        }
    }
}
