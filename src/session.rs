use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::filters::{self, Category, FilterCatalog, FilterOption};
use crate::i18n::I18n;
use crate::selection::debounce::SEARCH_DEBOUNCE;
use crate::selection::{query, OrderBy, SelectionState};
use crate::statement::feed::{load_statements, StatementFeed};
use crate::statement::Statement;
use crate::url_sync::{AddressBar, SyncPhase, UrlParams, UrlSynchronizer};

/// One page session: the loaded statements, what the user picked, and the
/// address bar mirroring it.
///
/// All mutation goes through here so the address is written after every
/// settled change. Derived lists (speakers, visible statements) are
/// recomputed on each call from the current inputs.
pub struct Session<B: AddressBar> {
    i18n: I18n,
    catalog: FilterCatalog,
    statements: Vec<Statement>,
    loading: bool,
    selection: SelectionState,
    url_sync: UrlSynchronizer,
    address_bar: B,
}

impl<B: AddressBar> Session<B> {
    /// Start a session and restore the selection from the bar's address.
    pub fn new(i18n: I18n, address_bar: B) -> Self {
        Self::with_debounce(i18n, address_bar, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(i18n: I18n, address_bar: B, debounce_window: Duration) -> Self {
        let catalog = FilterCatalog::new(&i18n);
        let mut session = Self {
            i18n,
            catalog,
            statements: Vec::new(),
            loading: true,
            selection: SelectionState::new(debounce_window),
            url_sync: UrlSynchronizer::new(),
            address_bar,
        };
        let address = session.address_bar.current();
        session
            .url_sync
            .restore(&address, &mut session.selection, &session.catalog);
        session.offer_speakers();
        session.sync_address();
        session
    }

    /// Fetch statements from `feed`. Failures leave an empty list.
    pub fn load(&mut self, feed: &dyn StatementFeed) {
        self.loading = true;
        let statements = load_statements(feed, &self.i18n);
        self.finish_loading(statements);
    }

    /// Replace the statement list and mark loading as done.
    pub fn finish_loading(&mut self, statements: Vec<Statement>) {
        info!("Session has {} statements", statements.len());
        self.statements = statements;
        self.loading = false;
        self.offer_speakers();
        self.sync_address();
    }

    fn offer_speakers(&mut self) {
        if self.url_sync.phase() != SyncPhase::AwaitingCatalogs {
            return;
        }
        let speakers = self.persons();
        self.url_sync.on_speakers_changed(&speakers, &mut self.selection);
    }

    fn sync_address(&mut self) {
        self.url_sync.write(&self.selection, &mut self.address_bar);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn sync_phase(&self) -> SyncPhase {
        self.url_sync.phase()
    }

    pub fn address_bar(&self) -> &B {
        &self.address_bar
    }

    pub fn themes(&self) -> &[FilterOption] {
        self.catalog.themes()
    }

    pub fn sectors(&self) -> &[FilterOption] {
        self.catalog.sectors()
    }

    /// Speaker options for the current statements.
    pub fn persons(&self) -> Vec<FilterOption> {
        filters::persons(&self.statements)
    }

    /// Speaker options narrowed by the speaker search box.
    pub fn visible_persons(&self) -> Vec<FilterOption> {
        let persons = self.persons();
        filters::visible_persons(&persons, self.selection.person_search_phrase())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Options available in `category` right now.
    pub fn options(&self, category: Category) -> Vec<FilterOption> {
        match category {
            Category::Theme => self.themes().to_vec(),
            Category::Sector => self.sectors().to_vec(),
            Category::Speaker => self.persons(),
        }
    }

    /// Statements passing the current selection, in display order.
    pub fn visible(&self) -> Vec<&Statement> {
        query::compile(&self.statements, &self.selection)
    }

    pub fn toggle(&mut self, category: Category, option: FilterOption) {
        self.selection.toggle(category, option);
        self.sync_address();
    }

    /// Toggle by slug. Returns false if the category has no such option.
    pub fn toggle_slug(&mut self, category: Category, slug: &str) -> bool {
        let Some(option) = self.options(category).into_iter().find(|o| o.slug == slug) else {
            debug!("No {} option {slug:?}", category.as_str());
            return false;
        };
        self.toggle(category, option);
        true
    }

    pub fn clear(&mut self, category: Category) {
        self.selection.clear(category);
        self.sync_address();
    }

    /// Type into the search box at `now`. Statements and the address follow
    /// once the debounce window passes (see [`Session::tick`]).
    pub fn set_search_phrase_at(&mut self, text: &str, now: Instant) {
        self.tick(now);
        self.selection.set_search_phrase_at(text, now);
    }

    pub fn set_search_phrase(&mut self, text: &str) {
        self.set_search_phrase_at(text, Instant::now());
    }

    /// Let time pass. Returns true when a pending search phrase settled.
    pub fn tick(&mut self, now: Instant) -> bool {
        let settled = self.selection.tick(now);
        if settled {
            self.sync_address();
        }
        settled
    }

    /// Settle any pending search phrase immediately.
    pub fn flush_search(&mut self) -> bool {
        let settled = self.selection.flush_search();
        if settled {
            self.sync_address();
        }
        settled
    }

    pub fn set_person_search_phrase(&mut self, text: &str) {
        self.selection.set_person_search_phrase(text);
    }

    pub fn set_order_by(&mut self, order_by: OrderBy) {
        self.selection.set_order_by(order_by);
        self.sync_address();
    }

    /// Query parameters currently reflected in the address.
    pub fn url_params(&self) -> UrlParams {
        self.url_sync.params_for(&self.selection)
    }

    pub fn query_string(&self) -> String {
        self.url_params().to_query_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{normalize, RawStatement};
    use crate::url_sync::MemoryAddressBar;

    fn statement(id: u64, person: &str, date: &str, details: &str) -> Statement {
        normalize(
            RawStatement {
                id,
                date: date.to_string(),
                person: person.to_string(),
                sector: "media".to_string(),
                details: details.to_string(),
                themes: vec!["starvation".to_string()],
                ..RawStatement::default()
            },
            &I18n::default(),
        )
    }

    fn session(address: &str) -> Session<MemoryAddressBar> {
        Session::new(I18n::default(), MemoryAddressBar::parse(address).unwrap())
    }

    #[test]
    fn test_new_session_is_loading_and_empty() {
        let session = session("/");
        assert!(session.is_loading());
        assert!(session.visible().is_empty());
        assert!(session.persons().is_empty());
        assert_eq!(session.address_bar().history().len(), 1);
    }

    #[test]
    fn test_toggle_writes_address() {
        let mut session = session("/");
        assert!(session.toggle_slug(Category::Theme, "starvation"));
        assert!(!session.toggle_slug(Category::Theme, "nope"));
        assert_eq!(session.address_bar().current().query(), Some("t=starvation"));

        session.toggle_slug(Category::Theme, "starvation");
        assert_eq!(session.address_bar().current().query(), None);
        assert_eq!(session.address_bar().history().len(), 3);
    }

    #[test]
    fn test_search_writes_only_settled_phrase() {
        let t0 = Instant::now();
        let mut session = session("/");
        session.set_search_phrase_at("cea", t0);
        session.set_search_phrase_at("ceasefire", t0 + Duration::from_millis(100));
        assert!(!session.tick(t0 + Duration::from_millis(300)));
        assert_eq!(session.address_bar().history().len(), 1);

        assert!(session.tick(t0 + Duration::from_millis(350)));
        assert_eq!(session.address_bar().current().query(), Some("q=ceasefire"));
        assert_eq!(session.address_bar().history().len(), 2);
    }

    #[test]
    fn test_late_keystroke_writes_settled_phrase_first() {
        let t0 = Instant::now();
        let mut session = session("/");
        session.set_search_phrase_at("aid", t0);
        session.set_search_phrase_at("aidx", t0 + Duration::from_millis(300));
        assert_eq!(session.address_bar().current().query(), Some("q=aid"));

        session.tick(t0 + Duration::from_millis(600));
        let history: Vec<String> = session
            .address_bar()
            .history()
            .iter()
            .map(|u| u.query().unwrap_or("").to_string())
            .collect();
        assert_eq!(history, ["", "q=aid", "q=aidx"]);
    }

    #[test]
    fn test_speaker_param_waits_for_statements() {
        let mut session = session("?p=bob");
        assert_eq!(session.sync_phase(), SyncPhase::AwaitingCatalogs);

        session.finish_loading(vec![
            statement(0, "Alice", "01/02/2024", "a"),
            statement(1, "Bob", "05/01/2024", "b"),
        ]);
        assert_eq!(session.sync_phase(), SyncPhase::Synchronized);
        assert_eq!(session.selection().selected_slugs(Category::Speaker), ["bob"]);
        let ids: Vec<u64> = session.visible().iter().map(|s| s.id).collect();
        assert_eq!(ids, [1]);

        // Reloading does not re-apply the original address.
        session.clear(Category::Speaker);
        session.finish_loading(vec![statement(0, "Bob", "01/02/2024", "a")]);
        assert!(session.selection().selected(Category::Speaker).is_empty());
    }

    #[test]
    fn test_speaker_param_kept_when_load_is_empty() {
        let mut session = session("?p=bob");
        session.finish_loading(Vec::new());
        assert!(!session.is_loading());
        assert_eq!(session.sync_phase(), SyncPhase::AwaitingCatalogs);
        assert_eq!(session.query_string(), "p=bob");
    }

    #[test]
    fn test_visible_persons_uses_person_search() {
        let mut session = session("/");
        session.finish_loading(vec![
            statement(0, "Alice", "01/02/2024", "a"),
            statement(1, "Bob", "05/01/2024", "b"),
            statement(2, "Bob", "06/01/2024", "c"),
        ]);
        session.set_person_search_phrase("ali");
        let slugs: Vec<String> = session.visible_persons().into_iter().map(|o| o.slug).collect();
        assert_eq!(slugs, ["alice"]);
        assert_eq!(session.persons()[0].title, "Bob (2)");
    }
}
