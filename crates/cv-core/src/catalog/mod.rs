//! Format catalog.
//!
//! The catalog is the ordered set of logical formats the engine captures and
//! restores. Its iteration order is also the extraction priority:
//!
//! Files, Png, Html, Rtf, Bitmap, Text
//!
//! Each format's behaviour lives in its [`FormatRule`]; the catalog only
//! decides which rules are active. It is read-only once built.

mod error;
mod rule;

pub use error::{CatalogError, ExtractError, PayloadError};
pub use rule::{Extraction, FormatRule, HistoryEncoding, HistoryLayout, Loading};

use crate::clipboard::LogicalFormat;

/// Fixed iteration and extraction priority.
pub const CATALOG_ORDER: [LogicalFormat; 6] = [
    LogicalFormat::Files,
    LogicalFormat::Png,
    LogicalFormat::Html,
    LogicalFormat::Rtf,
    LogicalFormat::Bitmap,
    LogicalFormat::Text,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCatalog {
    enabled: Vec<LogicalFormat>,
}

impl FormatCatalog {
    /// Catalog with every supported format.
    pub fn standard() -> Self {
        Self {
            enabled: CATALOG_ORDER.to_vec(),
        }
    }

    /// Catalog restricted to `formats`. Order always follows [`CATALOG_ORDER`];
    /// duplicates are ignored.
    pub fn with_formats(formats: impl IntoIterator<Item = LogicalFormat>) -> Self {
        let wanted: Vec<LogicalFormat> = formats.into_iter().collect();
        Self {
            enabled: CATALOG_ORDER
                .into_iter()
                .filter(|format| wanted.contains(format))
                .collect(),
        }
    }

    pub fn rule(&self, format: LogicalFormat) -> Result<&'static FormatRule, CatalogError> {
        if self.contains(format) {
            Ok(FormatRule::of(format))
        } else {
            Err(CatalogError::UnknownFormat(format))
        }
    }

    /// Active rules in priority order.
    pub fn rules(&self) -> impl Iterator<Item = &'static FormatRule> + '_ {
        self.enabled.iter().map(|format| FormatRule::of(*format))
    }

    pub fn formats(&self) -> &[LogicalFormat] {
        &self.enabled
    }

    pub fn contains(&self, format: LogicalFormat) -> bool {
        self.enabled.contains(&format)
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_iterates_in_priority_order() {
        let order: Vec<_> = FormatCatalog::standard()
            .rules()
            .map(FormatRule::format)
            .collect();
        assert_eq!(order, CATALOG_ORDER.to_vec());
    }

    #[test]
    fn restricted_catalog_keeps_priority_order() {
        let catalog = FormatCatalog::with_formats([
            LogicalFormat::Text,
            LogicalFormat::Png,
            LogicalFormat::Text,
        ]);
        assert_eq!(catalog.formats(), &[LogicalFormat::Png, LogicalFormat::Text]);
    }

    #[test]
    fn rule_lookup_fails_for_formats_outside_the_catalog() {
        let catalog = FormatCatalog::with_formats([LogicalFormat::Text]);
        assert!(catalog.rule(LogicalFormat::Text).is_ok());
        assert_eq!(
            catalog.rule(LogicalFormat::Html).unwrap_err(),
            CatalogError::UnknownFormat(LogicalFormat::Html)
        );
    }
}
