//! A reactive, dependent-filter engine for crop records.
//!
//! Crops carry a name and a district. Two independent sets of checkbox
//! filters (one per dimension) are derived from the data, and toggling them
//! re-derives the visible crops and the district options still reachable
//! through the enabled names.

pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod observable;
pub mod provider;
pub mod sample;
pub mod session;
pub mod store;
pub mod types;

pub use config::{Config, ConfigBuilder, DataSource, OutputFormat};
pub use error::{Error, Result};
pub use filter::{FilterDimension, FilterResult};
pub use observable::{Derived, State, Subscription, Trigger};
pub use provider::{DataProvider, FileProvider, StaticProvider};
pub use session::{FilterSession, FilterSummary, FilterView, LoadState};
pub use store::FilterStore;
pub use types::{Crop, FilterOption, FilterState, SubCategory};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder, DataSource, OutputFormat};
    pub use crate::error::{Error, Result};
    pub use crate::filter::FilterDimension;
    pub use crate::provider::DataProvider;
    pub use crate::session::{FilterSession, FilterView, LoadState};
    pub use crate::types::{Crop, FilterOption};
    pub use futures::StreamExt;
}
