use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use async_trait::async_trait;

use super::DataSource;
use crate::parse::{parse_reader, CsvOptions, LoadedTable};
use crate::DataError;

/// Delimited text file on disk
pub struct CsvSource {
    /// Path to the file
    path: PathBuf,
    /// File name, used as the source name
    name: String,
    options: CsvOptions,
}

impl CsvSource {
    /// Create a source for `path`; the delimiter follows the file extension
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.csv")
            .to_string();
        let options = CsvOptions::for_path(&path);
        Self { path, name, options }
    }

    pub fn with_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file on the current thread
    pub fn load_blocking(&self) -> Result<LoadedTable, DataError> {
        let file = File::open(&self.path)?;
        parse_reader(&self.name, BufReader::new(file), self.options)
    }
}

#[async_trait]
impl DataSource for CsvSource {
    async fn load(&self) -> Result<LoadedTable, DataError> {
        let path = self.path.clone();
        let name = self.name.clone();
        let options = self.options;
        tracing::info!("Loading {}", path.display());

        let table = tokio::task::spawn_blocking(move || {
            let file = File::open(&path)?;
            parse_reader(&name, BufReader::new(file), options)
        })
        .await??;

        if !table.warnings.is_empty() {
            tracing::warn!("{}: {} parse warnings", self.name, table.warnings.len());
        }
        Ok(table)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::RecordId;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let file = write_temp(".csv", "Year,A,B\n2000,1,10\n2001,5,2\n");
        let source = CsvSource::new(file.path());
        let table = source.load().await.unwrap();

        assert_eq!(table.dataset.len(), 2);
        assert_eq!(table.dataset.number(RecordId(1), "B"), Some(2.0));
        assert!(table.source_name.ends_with(".csv"));
        assert_eq!(table.source_name, source.source_name());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = CsvSource::new("/definitely/not/here.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn test_tsv_extension_uses_tabs() {
        let file = write_temp(".tsv", "A\tB\n3\t4\n");
        let table = CsvSource::new(file.path()).load_blocking().unwrap();
        assert_eq!(table.dataset.number(RecordId(0), "A"), Some(3.0));
    }
}
