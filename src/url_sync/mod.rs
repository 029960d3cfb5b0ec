pub mod params;

use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::filters::{resolve, Category, FilterCatalog, FilterOption};
use crate::selection::{OrderBy, SelectionState};
pub use params::{split_slugs, UrlParams, SEPARATOR};

/// Base used to resolve relative addresses such as `?t=starvation`.
pub const DEFAULT_BASE: &str = "http://localhost/";

/// The navigable address of the page.
pub trait AddressBar {
    fn current(&self) -> Url;

    /// Add a history entry without reloading.
    fn push(&mut self, url: Url);
}

/// Address bar backed by an in-memory history stack.
#[derive(Debug, Clone)]
pub struct MemoryAddressBar {
    current: Url,
    back: Vec<Url>,
}

impl MemoryAddressBar {
    pub fn new(url: Url) -> Self {
        Self {
            current: url,
            back: Vec::new(),
        }
    }

    /// Accepts absolute URLs or anything relative to [`DEFAULT_BASE`].
    pub fn parse(address: &str) -> Result<Self> {
        let url = Url::parse(DEFAULT_BASE)?.join(address.trim())?;
        Ok(Self::new(url))
    }

    /// Every address the page has shown, oldest first.
    pub fn history(&self) -> Vec<&Url> {
        self.back.iter().chain(std::iter::once(&self.current)).collect()
    }
}

impl AddressBar for MemoryAddressBar {
    fn current(&self) -> Url {
        self.current.clone()
    }

    fn push(&mut self, url: Url) {
        let previous = std::mem::replace(&mut self.current, url);
        self.back.push(previous);
    }
}

/// Where the synchronizer is in its startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// The address has not been read yet.
    Uninitialized,
    /// A speaker filter from the address is waiting for the speaker catalog.
    AwaitingCatalogs,
    /// Startup reading is over; the address is only written from now on.
    Synchronized,
}

/// Keeps the selection and the address in step: reads the address once at
/// startup, then writes every settled change back as a history entry.
#[derive(Debug, Clone)]
pub struct UrlSynchronizer {
    phase: SyncPhase,
    pending_speakers: Option<String>,
    last_written: Option<UrlParams>,
}

impl Default for UrlSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlSynchronizer {
    pub fn new() -> Self {
        Self {
            phase: SyncPhase::Uninitialized,
            pending_speakers: None,
            last_written: None,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Raw `p` value still waiting for the speaker catalog.
    pub fn pending_speakers(&self) -> Option<&str> {
        self.pending_speakers.as_deref()
    }

    /// Apply the startup address to `selection`. Only the first call has any
    /// effect.
    pub fn restore(&mut self, address: &Url, selection: &mut SelectionState, catalog: &FilterCatalog) {
        if self.phase != SyncPhase::Uninitialized {
            warn!("Address already restored; ignoring {address}");
            return;
        }

        let params = UrlParams::parse(address.query().unwrap_or(""));
        if let Some(token) = &params.o {
            selection.set_order_by(OrderBy::from_token(token));
        }
        if let Some(phrase) = &params.q {
            selection.restore_search_phrase(phrase);
        }
        if let Some(value) = &params.s {
            selection.replace(Category::Sector, resolve(catalog.sectors(), &split_slugs(value)));
        }
        if let Some(value) = &params.t {
            selection.replace(Category::Theme, resolve(catalog.themes(), &split_slugs(value)));
        }

        self.pending_speakers = params.p.clone();
        self.phase = if self.pending_speakers.is_some() {
            SyncPhase::AwaitingCatalogs
        } else {
            SyncPhase::Synchronized
        };
        self.last_written = Some(params);
        info!("Restored selection from address ({:?})", self.phase);
    }

    /// Offer the current speaker catalog. The pending speaker filter is
    /// applied the first time the catalog is non-empty and never again.
    /// Returns true when the selection was changed.
    pub fn on_speakers_changed(&mut self, speakers: &[FilterOption], selection: &mut SelectionState) -> bool {
        if self.phase != SyncPhase::AwaitingCatalogs || speakers.is_empty() {
            return false;
        }
        self.phase = SyncPhase::Synchronized;
        let Some(value) = self.pending_speakers.take() else {
            return false;
        };
        let resolved = resolve(speakers, &split_slugs(&value));
        debug!("Applying {} of the speakers requested by the address", resolved.len());
        selection.replace(Category::Speaker, resolved);
        true
    }

    /// Parameters to show for `selection`. While the speaker catalog is
    /// still loading, the requested speakers are carried through unchanged.
    pub fn params_for(&self, selection: &SelectionState) -> UrlParams {
        let mut params = UrlParams::from_selection(selection);
        if self.phase == SyncPhase::AwaitingCatalogs && params.p.is_none() {
            params.p = self.pending_speakers.clone();
        }
        params
    }

    /// Write the settled selection to the address. Pushes at most one entry,
    /// and none when the parameters are unchanged. Returns true on push.
    pub fn write(&mut self, selection: &SelectionState, bar: &mut dyn AddressBar) -> bool {
        let params = self.params_for(selection);
        if self.last_written.as_ref() == Some(&params) {
            return false;
        }

        let mut url = bar.current();
        let query = params.to_query_string();
        url.set_query(if query.is_empty() { None } else { Some(&query) });
        debug!("Pushing address {url}");
        bar.push(url);
        self.last_written = Some(params);
        true
    }
}
