#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/formosa-metrics/formosa/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod metrics;
pub mod record;
pub mod reshape;
pub mod source;

pub use error::{DataError, Result};
pub use record::{Coverage, RawRecord, StockEntry, coverage};
pub use reshape::{WideTable, reshape};
pub use source::{CsvDirectory, InMemorySource, RecordSource, stock_directory};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
