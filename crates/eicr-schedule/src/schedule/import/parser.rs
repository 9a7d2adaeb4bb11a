use std::io::Read;

use super::mapping::{column_role, normalize_header, ColumnRole};
use crate::schedule::domain::FieldId;

/// One schedule row with cells resolved to their column roles.
#[derive(Debug, Default)]
pub(crate) struct ScheduleRow {
    pub(crate) designation: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) device_type: Option<String>,
    pub(crate) rcd_rating: Option<String>,
    pub(crate) bs_standard: Option<String>,
    pub(crate) max_zs: Option<String>,
    pub(crate) tested_on: Option<String>,
    pub(crate) readings: Vec<(FieldId, String)>,
}

#[derive(Debug)]
pub(crate) struct ParsedSchedule {
    pub(crate) has_designation_column: bool,
    pub(crate) rows: Vec<ScheduleRow>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<ParsedSchedule, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let roles: Vec<Option<ColumnRole>> = csv_reader
        .headers()?
        .iter()
        .map(|header| column_role(&normalize_header(header)))
        .collect();

    let has_designation_column = roles
        .iter()
        .any(|role| matches!(role, Some(ColumnRole::Designation)));

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut row = ScheduleRow::default();

        for (index, cell) in record.iter().enumerate() {
            let Some(Some(role)) = roles.get(index) else {
                continue;
            };

            let value = cell.trim();
            if value.is_empty() {
                continue;
            }

            match *role {
                ColumnRole::Designation => row.designation = Some(value.to_string()),
                ColumnRole::Description => row.description = Some(value.to_string()),
                ColumnRole::DeviceType => row.device_type = Some(value.to_string()),
                ColumnRole::RcdRating => row.rcd_rating = Some(value.to_string()),
                ColumnRole::BsStandard => row.bs_standard = Some(value.to_string()),
                ColumnRole::MaxZs => row.max_zs = Some(value.to_string()),
                ColumnRole::TestedOn => row.tested_on = Some(value.to_string()),
                ColumnRole::Reading(field) => row.readings.push((field, value.to_string())),
            }
        }

        rows.push(row);
    }

    Ok(ParsedSchedule {
        has_designation_column,
        rows,
    })
}
