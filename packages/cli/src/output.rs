//! Writers for the `fetch` subcommand.

use std::io::Write;

use clap::ValueEnum;
use usf_covid_case_models::CaseTable;

/// Serialization format for a fetched case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array of records.
    Json,
    /// CSV with a `date,location,occupation,cases` header.
    Csv,
}

/// Writes `table` to `writer` in `format`.
///
/// # Errors
///
/// Returns an error if serialization or the underlying write fails.
pub fn write_table(
    table: &CaseTable,
    format: OutputFormat,
    mut writer: impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, table)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for record in table {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use usf_covid_case_models::{CaseRecord, Location, Occupation};

    use super::*;

    fn table() -> CaseTable {
        CaseTable::new(vec![
            CaseRecord::new(
                NaiveDate::from_ymd_opt(2020, 9, 14).unwrap(),
                Location::StPete,
                Occupation::Student,
                2,
            ),
            CaseRecord::new(
                NaiveDate::from_ymd_opt(2020, 9, 15).unwrap(),
                Location::Health,
                Occupation::Employee,
                1,
            ),
        ])
    }

    #[test]
    fn writes_csv_with_header() {
        let mut out = Vec::new();
        write_table(&table(), OutputFormat::Csv, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,location,occupation,cases\n\
             2020-09-14,St. Pete,Student,2\n\
             2020-09-15,Health,Employee,1\n"
        );
    }

    #[test]
    fn writes_json_array() {
        let mut out = Vec::new();
        write_table(&table(), OutputFormat::Json, &mut out).unwrap();
        let parsed: CaseTable = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, table());
    }
}
