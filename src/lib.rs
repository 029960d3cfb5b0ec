pub mod config;
pub mod error;
pub mod filters;
pub mod i18n;
pub mod output;
pub mod selection;
pub mod session;
pub mod statement;
pub mod url_sync;

pub use error::{Error, Result};
pub use filters::{Category, FilterCatalog, FilterOption};
pub use i18n::I18n;
pub use selection::{OrderBy, SelectionState};
pub use session::Session;
pub use statement::{RawStatement, Statement};
pub use url_sync::{AddressBar, MemoryAddressBar, SyncPhase, UrlParams, UrlSynchronizer};
