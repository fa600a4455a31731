use super::{Observable, SubscriptionId};
use crate::libs::exercise::{Category, Difficulty, DurationRange, ExerciseFilter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub selected_difficulty: Option<Difficulty>,
    pub selected_category: Option<Category>,
    pub selected_tags: Vec<String>,
    pub duration_range: DurationRange,
    pub show_favorites_only: bool,
    /// Kept in sync with the fields above on every change.
    pub is_active: bool,
}

impl FilterState {
    fn has_duration_bound(&self) -> bool {
        self.duration_range.min.is_some() || self.duration_range.max.is_some()
    }

    fn compute_active(&self) -> bool {
        self.selected_difficulty.is_some()
            || self.selected_category.is_some()
            || !self.selected_tags.is_empty()
            || self.has_duration_bound()
            || self.show_favorites_only
    }
}

/// Filter criteria picked in the UI.
#[derive(Default)]
pub struct FilterStore {
    state: Observable<FilterState>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FilterState {
        self.state.get()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&FilterState) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.change(|s| s.selected_difficulty = difficulty);
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.change(|s| s.selected_category = category);
    }

    /// Adds the tag, or removes it when already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        self.change(|s| {
            if s.selected_tags.iter().any(|t| t == tag) {
                s.selected_tags.retain(|t| t != tag);
            } else {
                s.selected_tags.push(tag.to_string());
            }
        });
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.change(|s| s.selected_tags = tags);
    }

    pub fn set_duration_range(&mut self, min: Option<u32>, max: Option<u32>) {
        self.change(|s| s.duration_range = DurationRange { min, max });
    }

    pub fn toggle_favorites_only(&mut self) {
        self.change(|s| s.show_favorites_only = !s.show_favorites_only);
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.change(|s| s.show_favorites_only = favorites_only);
    }

    pub fn clear(&mut self) {
        self.state.set(FilterState::default());
    }

    pub fn reset(&mut self) {
        self.clear();
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active
    }

    /// The selection as a data-layer filter. Bounds are passed through as given,
    /// including zero.
    pub fn active_filters(&self) -> ExerciseFilter {
        let state = self.state();
        ExerciseFilter {
            difficulty: state.selected_difficulty,
            category: state.selected_category,
            tags: state.selected_tags.clone(),
            duration: state.has_duration_bound().then_some(state.duration_range),
            is_favorite: state.show_favorites_only.then_some(true),
        }
    }

    /// Number of criteria in use; the duration range counts once.
    pub fn active_filter_count(&self) -> usize {
        let state = self.state();
        [
            state.selected_difficulty.is_some(),
            state.selected_category.is_some(),
            !state.selected_tags.is_empty(),
            state.has_duration_bound(),
            state.show_favorites_only,
        ]
        .iter()
        .filter(|&&on| on)
        .count()
    }

    fn change<F>(&mut self, change: F)
    where
        F: FnOnce(&mut FilterState),
    {
        self.state.update(|s| {
            change(s);
            s.is_active = s.compute_active();
        });
    }
}
