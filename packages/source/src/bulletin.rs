//! Daily case-bulletin scraper for the USF case-update page.
//!
//! The page publishes one section per day inside a single article body:
//!
//! ```html
//! <div class="article-body">
//!   <h3>September 14</h3>
//!   <ul>
//!     <li>Fifteen Tampa students who live off campus</li>
//!     <li>One St. Pete employee</li>
//!   </ul>
//!   <h3>September 11</h3>
//!   <ul>...</ul>
//! </div>
//! ```
//!
//! The scraper:
//! 1. Fetches the page
//! 2. Pairs each date heading with the list block at the same position
//! 3. Classifies every list item into a [`CaseRecord`]
//! 4. Reverses to chronological order and sums duplicate
//!    (date, location, occupation) rows
//!
//! Lines that match no classification rule and headings that don't parse as
//! dates are skipped and reported in the [`IngestReport`]; only a missing
//! page or a missing page structure fails the whole ingest.

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{Datelike as _, Local, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use usf_covid_case_models::{CaseRecord, CaseTable};

use crate::SourceError;
use crate::classify::{UnclassifiedLine, classify};
use crate::source_def::{HeadingCorrection, SourceDefinition};

/// Result of one ingest cycle.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Normalized case table: chronological, one row per
    /// (date, location, occupation).
    pub table: CaseTable,
    /// Bulletin lines no classification rule matched.
    pub unclassified: Vec<UnclassifiedLine>,
    /// Date headings that could not be parsed; their lines were skipped.
    pub skipped_headings: Vec<String>,
}

/// Collapses runs of whitespace (including `&nbsp;`) into single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:mon|tues|wednes|thurs|fri|satur|sun)day\b,?\s*").expect("valid regex")
});

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}$").expect("valid regex"));

/// Heading corrections compiled into case-insensitive patterns.
#[derive(Debug, Clone, Default)]
pub struct HeadingCorrector {
    patterns: Vec<(Regex, String)>,
}

impl HeadingCorrector {
    /// Compiles `corrections` once for reuse across every heading of a page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidCorrection`] if a pattern fails to
    /// compile.
    pub fn new(corrections: &[HeadingCorrection]) -> Result<Self, SourceError> {
        let patterns = corrections
            .iter()
            .map(|c| {
                Regex::new(&format!("(?i){}", regex::escape(&c.from)))
                    .map(|re| (re, c.to.clone()))
                    .map_err(|e| SourceError::InvalidCorrection {
                        from: c.from.clone(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { patterns })
    }

    /// Applies every correction in order.
    #[must_use]
    pub fn apply(&self, heading: &str) -> String {
        self.patterns
            .iter()
            .fold(heading.to_string(), |acc, (re, to)| {
                re.replace_all(&acc, regex::NoExpand(to)).into_owned()
            })
    }
}

/// Parses a date heading such as `"September 14"`, `"Monday, Oct. 5"` or
/// `"September 14, 2020"` into a date.
///
/// Corrections are applied first. Headings without a year get `year`.
#[must_use]
pub fn parse_heading_date(heading: &str, corrector: &HeadingCorrector, year: i32) -> Option<NaiveDate> {
    let corrected = corrector.apply(&collapse_whitespace(heading));
    let without_weekday = WEEKDAY_RE.replace(&corrected, "");
    let cleaned = collapse_whitespace(&without_weekday.replace(['.', ','], " "));

    if cleaned.is_empty() {
        return None;
    }

    let dated = if YEAR_RE.is_match(&cleaned) {
        cleaned
    } else {
        format!("{cleaned} {year}")
    };

    ["%B %d %Y", "%b %d %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&dated, fmt).ok())
}

fn parse_selector(selector: &str) -> Result<Selector, SourceError> {
    Selector::parse(selector).map_err(|e| SourceError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Parses the bulletin page HTML into a normalized [`CaseTable`].
///
/// `year` is appended to headings that don't carry one.
///
/// # Errors
///
/// Returns [`SourceError::SchemaDrift`] if the container, the headings, or
/// the list blocks are missing, [`SourceError::InvalidSelector`] if a
/// configured selector doesn't parse, and
/// [`SourceError::InvalidCorrection`] if a heading correction doesn't
/// compile.
pub fn parse_bulletin_page(
    html: &str,
    def: &SourceDefinition,
    year: i32,
) -> Result<IngestReport, SourceError> {
    let container_sel = parse_selector(&def.selectors.container)?;
    let heading_sel = parse_selector(&def.selectors.heading)?;
    let list_sel = parse_selector(&def.selectors.list)?;
    let item_sel = parse_selector(&def.selectors.item)?;
    let corrector = HeadingCorrector::new(&def.heading_corrections)?;

    let document = Html::parse_document(html);

    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| SourceError::SchemaDrift {
            message: format!(
                "no element matching '{}' found in page",
                def.selectors.container
            ),
        })?;

    let headings: Vec<String> = container
        .select(&heading_sel)
        .map(|el| element_text(&el))
        .collect();

    let lists: Vec<Vec<String>> = container
        .select(&list_sel)
        .map(|list| {
            list.select(&item_sel)
                .map(|item| element_text(&item))
                .filter(|text| !text.is_empty())
                .collect()
        })
        .collect();

    if headings.is_empty() {
        return Err(SourceError::SchemaDrift {
            message: format!("no '{}' date headings found", def.selectors.heading),
        });
    }
    if lists.is_empty() {
        return Err(SourceError::SchemaDrift {
            message: format!("no '{}' case lists found", def.selectors.list),
        });
    }
    if headings.len() != lists.len() {
        log::warn!(
            "{}: found {} date headings but {} case lists, pairing the first {}",
            def.id,
            headings.len(),
            lists.len(),
            headings.len().min(lists.len()),
        );
    }

    let mut records: Vec<CaseRecord> = Vec::new();
    let mut report = IngestReport::default();

    for (heading, lines) in headings.iter().zip(&lists) {
        let Some(date) = parse_heading_date(heading, &corrector, year) else {
            log::warn!(
                "{}: unparseable date heading '{heading}', skipping {} lines",
                def.id,
                lines.len()
            );
            report.skipped_headings.push(heading.clone());
            continue;
        };

        for line in lines {
            match classify(line) {
                Ok(c) => records.push(CaseRecord::new(date, c.location, c.occupation, c.cases)),
                Err(e) => {
                    log::warn!("{}: {e} ({date})", def.id);
                    report.unclassified.push(e);
                }
            }
        }
    }

    // The page lists newest first.
    records.reverse();
    report.table = CaseTable::new(records).grouped();

    Ok(report)
}

/// Fetches the bulletin page and parses it into a normalized [`CaseTable`].
///
/// # Errors
///
/// Returns [`SourceError`] if the page cannot be fetched within the
/// configured timeouts and retries, or its structure has changed.
pub async fn fetch_case_table(def: &SourceDefinition) -> Result<IngestReport, SourceError> {
    let client = reqwest::Client::builder()
        .user_agent(&def.user_agent)
        .timeout(Duration::from_secs(def.timeout_secs))
        .connect_timeout(Duration::from_secs(def.connect_timeout_secs))
        .build()?;

    log::info!("{}: fetching bulletin page at {}", def.id, def.url);

    let html = crate::retry::send_text(def.max_retries, || client.get(&def.url)).await?;

    let report = parse_bulletin_page(&html, def, Local::now().year())?;

    log::info!(
        "{}: parsed {} case rows ({} unclassified lines, {} skipped headings)",
        def.id,
        report.table.len(),
        report.unclassified.len(),
        report.skipped_headings.len(),
    );

    Ok(report)
}
