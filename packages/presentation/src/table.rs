//! Flattens a case table into data-table columns and rows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use usf_covid_case_models::{CaseRecord, CaseTable};

use crate::PresentationError;

/// One data-table column. `name` is the header, `id` the row key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub id: String,
}

/// Column definitions plus one JSON object per record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<Map<String, Value>>,
}

fn record_row(record: &CaseRecord) -> Result<Map<String, Value>, PresentationError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(PresentationError::Serialization {
            message: format!("expected an object, got {other}"),
        }),
        Err(e) => Err(PresentationError::Serialization {
            message: e.to_string(),
        }),
    }
}

/// Builds the data table for `table`, in table order.
///
/// # Errors
///
/// Returns [`PresentationError::Serialization`] if a record doesn't
/// serialize to a JSON object.
pub fn to_table_rows(table: &CaseTable) -> Result<DataTable, PresentationError> {
    Ok(DataTable {
        columns: CaseRecord::FIELDS
            .iter()
            .map(|field| ColumnDef {
                name: (*field).to_string(),
                id: (*field).to_string(),
            })
            .collect(),
        rows: table.iter().map(record_row).collect::<Result<_, _>>()?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;
    use usf_covid_case_models::{Location, Occupation};

    use super::*;

    #[test]
    fn columns_follow_record_fields() {
        let data = to_table_rows(&CaseTable::default()).unwrap();
        let ids: Vec<&str> = data.columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["date", "location", "occupation", "cases"]);
        assert!(data.columns.iter().all(|c| c.name == c.id));
        assert!(data.rows.is_empty());
    }

    #[test]
    fn one_row_per_record() {
        let table = CaseTable::new(vec![
            CaseRecord::new(
                NaiveDate::from_ymd_opt(2020, 9, 14).unwrap(),
                Location::StPete,
                Occupation::Employee,
                2,
            ),
            CaseRecord::new(
                NaiveDate::from_ymd_opt(2020, 9, 15).unwrap(),
                Location::Tampa,
                Occupation::Student,
                1,
            ),
        ]);
        let data = to_table_rows(&table).unwrap();
        assert_eq!(data.rows.len(), 2);
        for row in &data.rows {
            let keys: Vec<&str> = row.keys().map(String::as_str).collect();
            assert_eq!(keys.len(), CaseRecord::FIELDS.len());
            assert!(CaseRecord::FIELDS.iter().all(|f| keys.contains(f)));
        }
        assert_eq!(
            Value::Object(data.rows[0].clone()),
            json!({
                "date": "2020-09-14",
                "location": "St. Pete",
                "occupation": "Employee",
                "cases": 2,
            })
        );
    }
}
