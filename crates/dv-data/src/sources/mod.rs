//! Data source implementations

use async_trait::async_trait;

use crate::parse::LoadedTable;
use crate::DataError;

pub mod csv_source;
pub mod text_source;

pub use csv_source::CsvSource;
pub use text_source::TextSource;

/// Something that can produce a table for the dashboard.
///
/// Loading runs off the UI thread; the caller hands the result back to the UI
/// thread, which swaps it in as the current dataset.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Read and parse the whole table
    async fn load(&self) -> Result<LoadedTable, DataError>;

    /// Name shown in the title bar and in log lines
    fn source_name(&self) -> &str;
}
