#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case record types shared across the USF COVID-19 dashboard.
//!
//! A [`CaseRecord`] is one (date, location, occupation, count) tuple parsed
//! from a bulletin. Records are collected into a [`CaseTable`], which is the
//! single source of truth every aggregate is derived from.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A USF campus or unit that reports cases separately.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Location {
    /// The main Tampa campus.
    Tampa,
    /// The St. Petersburg campus.
    #[serde(rename = "St. Pete")]
    #[strum(serialize = "St. Pete")]
    StPete,
    /// USF Health (medical school, hospital residents and staff).
    Health,
    /// The Sarasota-Manatee campus.
    #[serde(rename = "Sarasota Manatee")]
    #[strum(serialize = "Sarasota Manatee")]
    SarasotaManatee,
}

impl Location {
    /// Every location, in dashboard order.
    pub const ALL: &[Self] = &[Self::Tampa, Self::StPete, Self::Health, Self::SarasotaManatee];

    /// The three locations the dashboard shows cards and graphs for.
    pub const DASHBOARD: &[Self] = &[Self::Tampa, Self::StPete, Self::Health];

    /// URL-safe identifier (e.g. `"st-pete"`).
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Tampa => "tampa",
            Self::StPete => "st-pete",
            Self::Health => "health",
            Self::SarasotaManatee => "sarasota-manatee",
        }
    }

    /// Looks a location up by its [`slug`](Self::slug).
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.slug() == slug)
    }

    /// Short campus label used in comparison sentences.
    #[must_use]
    pub const fn campus_label(self) -> &'static str {
        match self {
            Self::Tampa => "Tampa",
            Self::StPete => "St Pete",
            Self::Health => "Health",
            Self::SarasotaManatee => "Sarasota-Manatee",
        }
    }
}

/// Who a reported case belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Occupation {
    /// Enrolled student.
    Student,
    /// Faculty, staff, or medical resident.
    Employee,
}

impl Occupation {
    /// Both occupations, students first.
    pub const ALL: &[Self] = &[Self::Student, Self::Employee];
}

/// One day's case count for a single location and occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Bulletin date.
    pub date: NaiveDate,
    /// Campus or unit.
    pub location: Location,
    /// Student or employee.
    pub occupation: Occupation,
    /// Number of reported cases.
    pub cases: u64,
}

impl CaseRecord {
    /// Field names in column order, matching the serialized form.
    pub const FIELDS: &[&str] = &["date", "location", "occupation", "cases"];

    #[must_use]
    pub const fn new(date: NaiveDate, location: Location, occupation: Occupation, cases: u64) -> Self {
        Self {
            date,
            location,
            occupation,
            cases,
        }
    }

    const fn key(&self) -> (NaiveDate, Location, Occupation) {
        (self.date, self.location, self.occupation)
    }
}

/// An ordered collection of [`CaseRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
}

impl CaseTable {
    #[must_use]
    pub const fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseRecord> {
        self.records.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a table with rows matching `predicate`, in their original order.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&CaseRecord) -> bool) -> Self {
        Self::new(self.records.iter().filter(|r| predicate(r)).copied().collect())
    }

    /// Collapses rows sharing a (date, location, occupation) key by summing
    /// their cases.
    ///
    /// Groups keep the position of the first row that introduced the key;
    /// the output is not re-sorted. Grouping an already-grouped table
    /// returns an equal table.
    #[must_use]
    pub fn grouped(&self) -> Self {
        let mut index: HashMap<(NaiveDate, Location, Occupation), usize> = HashMap::new();
        let mut out: Vec<CaseRecord> = Vec::with_capacity(self.records.len());

        for record in &self.records {
            if let Some(&i) = index.get(&record.key()) {
                out[i].cases += record.cases;
            } else {
                index.insert(record.key(), out.len());
                out.push(*record);
            }
        }

        Self::new(out)
    }
}

impl From<Vec<CaseRecord>> for CaseTable {
    fn from(records: Vec<CaseRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<CaseRecord> for CaseTable {
    fn from_iter<T: IntoIterator<Item = CaseRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CaseTable {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 9, d).unwrap()
    }

    #[test]
    fn location_labels_match_bulletin_names() {
        assert_eq!(Location::StPete.to_string(), "St. Pete");
        assert_eq!(Location::SarasotaManatee.to_string(), "Sarasota Manatee");
        assert_eq!("St. Pete".parse::<Location>().unwrap(), Location::StPete);
        assert_eq!(
            serde_json::to_string(&Location::StPete).unwrap(),
            "\"St. Pete\""
        );
    }

    #[test]
    fn slugs_roundtrip() {
        for loc in Location::ALL {
            assert_eq!(Location::from_slug(loc.slug()), Some(*loc));
        }
        assert_eq!(Location::from_slug("orlando"), None);
    }

    #[test]
    fn grouped_sums_duplicates_in_first_seen_order() {
        let table = CaseTable::new(vec![
            CaseRecord::new(day(2), Location::Tampa, Occupation::Student, 2),
            CaseRecord::new(day(1), Location::Tampa, Occupation::Student, 1),
            CaseRecord::new(day(2), Location::Tampa, Occupation::Student, 3),
            CaseRecord::new(day(2), Location::Health, Occupation::Employee, 1),
        ]);

        let grouped = table.grouped();

        assert_eq!(
            grouped.records(),
            &[
                CaseRecord::new(day(2), Location::Tampa, Occupation::Student, 5),
                CaseRecord::new(day(1), Location::Tampa, Occupation::Student, 1),
                CaseRecord::new(day(2), Location::Health, Occupation::Employee, 1),
            ]
        );
    }

    #[test]
    fn grouping_is_idempotent() {
        let table = CaseTable::new(vec![
            CaseRecord::new(day(1), Location::StPete, Occupation::Employee, 1),
            CaseRecord::new(day(1), Location::StPete, Occupation::Employee, 4),
            CaseRecord::new(day(3), Location::Tampa, Occupation::Student, 2),
        ]);

        let once = table.grouped();
        assert_eq!(once.grouped(), once);
    }

    #[test]
    fn serializes_as_row_objects() {
        let table = CaseTable::new(vec![CaseRecord::new(
            day(14),
            Location::Tampa,
            Occupation::Student,
            15,
        )]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "date": "2020-09-14",
                "location": "Tampa",
                "occupation": "Student",
                "cases": 15
            }])
        );
    }
}
