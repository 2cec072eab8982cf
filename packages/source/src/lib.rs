#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! USF COVID-19 bulletin scraping and line classification.
//!
//! [`bulletin::fetch_case_table`] fetches the case-update page described by a
//! [`source_def::SourceDefinition`], pairs date headings with their bulletin
//! lists, and runs every line through [`classify::classify`] to build a
//! normalized [`usf_covid_case_models::CaseTable`].

pub mod bulletin;
pub mod classify;
pub mod quantity;
pub mod retry;
pub mod source_def;

#[cfg(test)]
mod test_http;

/// Errors that fail a whole ingest.
///
/// Per-line problems never surface here; see
/// [`classify::UnclassifiedLine`] and [`bulletin::IngestReport`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The page could not be retrieved (bad status, retries exhausted).
    #[error("Source unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The page no longer has the expected heading/list structure.
    #[error("Page structure changed: {message}")]
    SchemaDrift {
        /// Description of what was missing.
        message: String,
    },

    /// A configured CSS selector failed to parse.
    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector {
        /// The selector text.
        selector: String,
        /// Parser error.
        message: String,
    },

    /// A configured heading correction failed to compile.
    #[error("Invalid heading correction '{from}': {message}")]
    InvalidCorrection {
        /// The correction's match text.
        from: String,
        /// Regex compile error.
        message: String,
    },

    /// The source definition TOML is invalid.
    #[error("Invalid source definition: {0}")]
    Config(#[from] toml::de::Error),
}

impl SourceError {
    /// Returns `true` if the remote page was unreachable or unrecognizable,
    /// as opposed to a local configuration mistake.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Unavailable { .. } | Self::SchemaDrift { .. }
        )
    }
}
