use super::{Observable, SubscriptionId};

pub const RECENT_SEARCHES_LIMIT: usize = 10;
pub const SUGGESTIONS_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub is_active: bool,
    pub suggestions: Vec<String>,
    /// Most recent first.
    pub recent_searches: Vec<String>,
}

#[derive(Default)]
pub struct SearchStore {
    state: Observable<SearchState>,
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        self.state.get()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&SearchState) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn set_query(&mut self, query: &str) {
        self.state.update(|s| {
            s.query = query.to_string();
            s.is_active = !query.is_empty();
        });
    }

    pub fn set_active(&mut self, active: bool) {
        self.state.update(|s| s.is_active = active);
    }

    /// Moves `query` to the front of the recent list. Blank queries are ignored.
    pub fn add_recent_search(&mut self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        self.state.update(|s| {
            s.recent_searches.retain(|q| q != query);
            s.recent_searches.insert(0, query.to_string());
            s.recent_searches.truncate(RECENT_SEARCHES_LIMIT);
        });
    }

    pub fn clear_recent_searches(&mut self) {
        self.state.update(|s| s.recent_searches.clear());
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.state.update(|s| s.suggestions = suggestions);
    }

    /// Clears the query and suggestions, keeping recent searches.
    pub fn clear(&mut self) {
        self.state.update(|s| {
            s.query.clear();
            s.is_active = false;
            s.suggestions.clear();
        });
    }

    pub fn reset(&mut self) {
        self.state.set(SearchState::default());
    }

    pub fn is_searching(&self) -> bool {
        !self.state().query.is_empty()
    }

    /// Suggestions containing the query, case-insensitively.
    pub fn filtered_suggestions(&self) -> Vec<&str> {
        let state = self.state();
        if state.query.is_empty() {
            return Vec::new();
        }
        let needle = state.query.to_lowercase();
        state
            .suggestions
            .iter()
            .filter(|s| s.to_lowercase().contains(&needle))
            .take(SUGGESTIONS_LIMIT)
            .map(String::as_str)
            .collect()
    }
}
