//! Config-driven bulletin page definition.
//!
//! [`SourceDefinition`] captures everything specific to the bulletin page:
//! where it lives, how its markup is laid out, how patient to be with the
//! server, and which known-bad headings to fix up before date parsing. The
//! default definition is embedded from `sources/usf.toml` at compile time.

use serde::Deserialize;

use crate::SourceError;

/// Embedded TOML for the USF case-update page.
const USF_TOML: &str = include_str!("../sources/usf.toml");

/// Environment variable that overrides the configured page URL.
pub const SOURCE_URL_ENV: &str = "USF_COVID_SOURCE_URL";

/// A complete bulletin page definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"usf_cases"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Page URL.
    pub url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Total request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Retries for transient HTTP failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// CSS selectors describing the page layout.
    pub selectors: PageSelectors,
    /// Literal replacements applied to date headings before parsing.
    #[serde(default)]
    pub heading_corrections: Vec<HeadingCorrection>,
}

/// CSS selectors for the bulletin page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSelectors {
    /// Element wrapping all headings and lists.
    pub container: String,
    /// Date heading elements inside the container.
    pub heading: String,
    /// List blocks inside the container, one per heading.
    pub list: String,
    /// Bulletin line elements inside a list block.
    pub item: String,
}

/// A known misspelling in a date heading and its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadingCorrection {
    /// Text as published (matched case-insensitively).
    pub from: String,
    /// Corrected text.
    pub to: String,
}

const fn default_max_retries() -> u32 {
    3
}

/// Parses a source definition from TOML text.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    Ok(toml::from_str(toml_str)?)
}

/// Returns the embedded USF definition, with the URL overridden by
/// [`SOURCE_URL_ENV`] when set.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the embedded TOML fails to parse.
pub fn usf_source() -> Result<SourceDefinition, SourceError> {
    let mut def = parse_source_toml(USF_TOML)?;
    if let Ok(url) = std::env::var(SOURCE_URL_ENV)
        && !url.trim().is_empty()
    {
        log::info!("{}: using URL override from {SOURCE_URL_ENV}: {url}", def.id);
        def.url = url;
    }
    Ok(def)
}
