pub mod clock;
pub mod config;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use config::StoreConfig;
pub use store::{DocumentVersionStore, SavedDocument, StoreError, VersionChange};
