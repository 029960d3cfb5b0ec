pub mod debounce;
pub mod query;

use std::time::{Duration, Instant};
use tracing::debug;

use crate::filters::{Category, FilterOption};
use debounce::{DebounceHandle, Debouncer, SEARCH_DEBOUNCE};

/// Sort direction for the statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Oldest first. Never written to the address.
    #[default]
    Oldest,
    /// Newest first, token `new`.
    Newest,
}

impl OrderBy {
    pub const NEWEST_TOKEN: &'static str = "new";

    /// Any token other than `new` sorts oldest first.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            Self::NEWEST_TOKEN => OrderBy::Newest,
            _ => OrderBy::Oldest,
        }
    }

    pub fn token(&self) -> Option<&'static str> {
        match self {
            OrderBy::Oldest => None,
            OrderBy::Newest => Some(Self::NEWEST_TOKEN),
        }
    }
}

/// Everything the user has chosen on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    themes: Vec<FilterOption>,
    sectors: Vec<FilterOption>,
    speakers: Vec<FilterOption>,
    search_phrase: String,
    debounced_search_phrase: String,
    person_search_phrase: String,
    order_by: OrderBy,
    search_debounce: Debouncer<String>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl SelectionState {
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            themes: Vec::new(),
            sectors: Vec::new(),
            speakers: Vec::new(),
            search_phrase: String::new(),
            debounced_search_phrase: String::new(),
            person_search_phrase: String::new(),
            order_by: OrderBy::default(),
            search_debounce: Debouncer::new(debounce_window),
        }
    }

    fn slot(&mut self, category: Category) -> &mut Vec<FilterOption> {
        match category {
            Category::Theme => &mut self.themes,
            Category::Sector => &mut self.sectors,
            Category::Speaker => &mut self.speakers,
        }
    }

    /// Selected options in the order they were picked.
    pub fn selected(&self, category: Category) -> &[FilterOption] {
        match category {
            Category::Theme => &self.themes,
            Category::Sector => &self.sectors,
            Category::Speaker => &self.speakers,
        }
    }

    pub fn selected_slugs(&self, category: Category) -> Vec<&str> {
        self.selected(category).iter().map(|o| o.slug.as_str()).collect()
    }

    pub fn is_selected(&self, category: Category, slug: &str) -> bool {
        self.selected(category).iter().any(|o| o.slug == slug)
    }

    /// Deselect the option if its slug is selected, otherwise append it.
    pub fn toggle(&mut self, category: Category, option: FilterOption) {
        let slot = self.slot(category);
        if let Some(pos) = slot.iter().position(|o| o.slug == option.slug) {
            slot.remove(pos);
            debug!("Deselected {} {}", category.as_str(), option.slug);
        } else {
            debug!("Selected {} {}", category.as_str(), option.slug);
            slot.push(option);
        }
    }

    pub fn clear(&mut self, category: Category) {
        self.slot(category).clear();
    }

    /// Replace a whole category, e.g. when restoring from the address.
    /// Repeated slugs keep their first occurrence.
    pub fn replace(&mut self, category: Category, options: Vec<FilterOption>) {
        let slot = self.slot(category);
        slot.clear();
        for option in options {
            if !slot.iter().any(|o| o.slug == option.slug) {
                slot.push(option);
            }
        }
    }

    pub fn search_phrase(&self) -> &str {
        &self.search_phrase
    }

    /// The settled phrase statements are matched against.
    pub fn debounced_search_phrase(&self) -> &str {
        &self.debounced_search_phrase
    }

    /// Update the typed phrase and restart the debounce window at `now`.
    /// A pending phrase whose window already elapsed is committed first.
    pub fn set_search_phrase_at(&mut self, text: &str, now: Instant) -> DebounceHandle {
        self.tick(now);
        self.search_phrase = text.to_string();
        self.search_debounce.schedule(text.to_string(), now)
    }

    pub fn set_search_phrase(&mut self, text: &str) -> DebounceHandle {
        self.set_search_phrase_at(text, Instant::now())
    }

    /// Drop a pending search commit. Returns false if `handle` was superseded
    /// or already fired.
    pub fn cancel_search(&mut self, handle: DebounceHandle) -> bool {
        self.search_debounce.cancel(handle)
    }

    pub fn search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search_debounce.deadline()
    }

    /// Commit the pending phrase if its window has elapsed. Returns true when
    /// the debounced phrase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.search_debounce.poll(now) {
            Some(phrase) => self.commit_search_phrase(&phrase),
            None => false,
        }
    }

    /// Commit the pending phrase without waiting.
    pub fn flush_search(&mut self) -> bool {
        match self.search_debounce.flush() {
            Some(phrase) => self.commit_search_phrase(&phrase),
            None => false,
        }
    }

    fn commit_search_phrase(&mut self, phrase: &str) -> bool {
        let trimmed = phrase.trim();
        if trimmed == self.debounced_search_phrase {
            return false;
        }
        debug!("Search phrase settled: {trimmed:?}");
        self.debounced_search_phrase = trimmed.to_string();
        true
    }

    /// Set both phrases at once, skipping the debounce window. Used when the
    /// phrase comes from the address on load.
    pub fn restore_search_phrase(&mut self, text: &str) {
        self.search_debounce.flush();
        self.search_phrase = text.to_string();
        self.debounced_search_phrase = text.to_string();
    }

    pub fn person_search_phrase(&self) -> &str {
        &self.person_search_phrase
    }

    /// Narrow the displayed speaker options. Does not affect statements.
    pub fn set_person_search_phrase(&mut self, text: &str) {
        self.person_search_phrase = text.to_string();
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by
    }

    pub fn set_order_by(&mut self, order_by: OrderBy) {
        self.order_by = order_by;
    }

    /// True when no filter, search or non-default order is active.
    pub fn is_default(&self) -> bool {
        Category::ALL.iter().all(|c| self.selected(*c).is_empty())
            && self.debounced_search_phrase.trim().is_empty()
            && self.order_by == OrderBy::Oldest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(slug: &str) -> FilterOption {
        FilterOption::new(slug, slug.to_uppercase())
    }

    #[test]
    fn test_toggle_appends_and_removes() {
        let mut selection = SelectionState::default();
        selection.toggle(Category::Theme, option("starvation"));
        selection.toggle(Category::Theme, option("displacement"));
        assert_eq!(selection.selected_slugs(Category::Theme), ["starvation", "displacement"]);

        selection.toggle(Category::Theme, option("starvation"));
        assert_eq!(selection.selected_slugs(Category::Theme), ["displacement"]);
        assert!(selection.selected(Category::Sector).is_empty());
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = SelectionState::default();
        selection.toggle(Category::Sector, option("media"));
        let before = selection.clone();

        selection.toggle(Category::Sector, option("other"));
        selection.toggle(Category::Sector, option("other"));
        assert_eq!(selection, before);

        selection.toggle(Category::Speaker, option("alice"));
        selection.toggle(Category::Speaker, option("alice"));
        assert_eq!(selection, before);
    }

    #[test]
    fn test_toggle_identity_is_slug() {
        let mut selection = SelectionState::default();
        selection.toggle(Category::Speaker, FilterOption::new("alice", "Alice (2)"));
        selection.toggle(Category::Speaker, FilterOption::new("alice", "Alice (3)"));
        assert!(selection.selected(Category::Speaker).is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut selection = SelectionState::default();
        selection.toggle(Category::Theme, option("starvation"));
        selection.clear(Category::Theme);
        selection.clear(Category::Theme);
        assert!(selection.selected(Category::Theme).is_empty());
        assert!(selection.is_default());
    }

    #[test]
    fn test_replace_dedups() {
        let mut selection = SelectionState::default();
        selection.replace(Category::Sector, vec![option("media"), option("other"), option("media")]);
        assert_eq!(selection.selected_slugs(Category::Sector), ["media", "other"]);
    }

    #[test]
    fn test_search_debounce_commits_last_value_once() {
        let t0 = Instant::now();
        let mut selection = SelectionState::default();
        let mut commits = 0;

        for (i, text) in ["c", "cease", "ceasefire "].iter().enumerate() {
            let now = t0 + Duration::from_millis(100 * i as u64);
            commits += selection.tick(now) as usize;
            selection.set_search_phrase_at(text, now);
            assert_eq!(selection.search_phrase(), *text);
        }
        assert_eq!(selection.debounced_search_phrase(), "");

        commits += selection.tick(t0 + Duration::from_millis(450)) as usize;
        commits += selection.tick(t0 + Duration::from_millis(1000)) as usize;
        assert_eq!(commits, 1);
        assert_eq!(selection.debounced_search_phrase(), "ceasefire");
    }

    #[test]
    fn test_settled_phrase_survives_late_keystroke() {
        let t0 = Instant::now();
        let mut selection = SelectionState::default();
        selection.set_search_phrase_at("aid", t0);
        selection.set_search_phrase_at("aidx", t0 + Duration::from_millis(300));
        assert_eq!(selection.debounced_search_phrase(), "aid");
        assert!(selection.search_pending());

        assert!(selection.tick(t0 + Duration::from_millis(600)));
        assert_eq!(selection.debounced_search_phrase(), "aidx");
    }

    #[test]
    fn test_cancel_search() {
        let t0 = Instant::now();
        let mut selection = SelectionState::default();
        let handle = selection.set_search_phrase_at("aid", t0);
        assert!(selection.cancel_search(handle));
        assert!(!selection.tick(t0 + Duration::from_secs(1)));
        assert_eq!(selection.debounced_search_phrase(), "");
        assert_eq!(selection.search_phrase(), "aid");
    }

    #[test]
    fn test_restore_search_phrase_skips_window() {
        let mut selection = SelectionState::default();
        selection.set_search_phrase_at("stale", Instant::now());
        selection.restore_search_phrase("ceasefire");
        assert_eq!(selection.search_phrase(), "ceasefire");
        assert_eq!(selection.debounced_search_phrase(), "ceasefire");
        assert!(!selection.search_pending());
    }

    #[test]
    fn test_order_by_tokens() {
        assert_eq!(OrderBy::from_token("new"), OrderBy::Newest);
        assert_eq!(OrderBy::from_token("old"), OrderBy::Oldest);
        assert_eq!(OrderBy::from_token("NEW"), OrderBy::Oldest);
        assert_eq!(OrderBy::from_token(""), OrderBy::Oldest);
        assert_eq!(OrderBy::Newest.token(), Some("new"));
        assert_eq!(OrderBy::Oldest.token(), None);
    }
}
