use async_trait::async_trait;

use super::DataSource;
use crate::parse::{parse_str, CsvOptions, LoadedTable};
use crate::DataError;

/// Table held in memory, e.g. a bundled sample
pub struct TextSource {
    name: String,
    text: String,
    options: CsvOptions,
}

impl TextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            options: CsvOptions::default(),
        }
    }

    pub fn load_blocking(&self) -> Result<LoadedTable, DataError> {
        parse_str(&self.name, &self.text, self.options)
    }
}

#[async_trait]
impl DataSource for TextSource {
    async fn load(&self) -> Result<LoadedTable, DataError> {
        self.load_blocking()
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
