use csv::{ReaderBuilder, StringRecord};
use shared::models::{LedgerMonth, MonthlyLedgerEntry, OperatingExpenditure};
use shared::utils::indian_format;
use std::fs::File;
use std::io::{BufReader, Read};

use crate::error::EngineError;
use crate::ledger::record_actuals;

pub struct LedgerCsvParser;

impl LedgerCsvParser {
    // CSV Header: Month;Revenue;Occupancy;Rent;Staff;FoodStaff;Utilities;Maintenance;Other;Payout
    // Example Row: 2024-03;3,80,000;74%;1,30,000;30,000;6,000;14,080;10,000;5,000;90,000
    pub fn load_entries_from_csv(file_path: &str) -> Result<Vec<MonthlyLedgerEntry>, EngineError> {
        let file = File::open(file_path)?;
        let entries = Self::parse_entries(BufReader::new(file))?;
        tracing::info!(path = %file_path, count = entries.len(), "Loaded ledger entries from CSV");
        Ok(entries)
    }

    pub fn parse_entries<R: Read>(reader: R) -> Result<Vec<MonthlyLedgerEntry>, EngineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut entries = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let record = result?;
            let line = idx + 2;

            let month_str = Self::required_field(&record, &headers, "Month", line)?;
            let month = LedgerMonth::parse(month_str)
                .map_err(|e| EngineError::CsvDataFormatError(format!("Error parsing 'Month' at line {}: {}", line, e)))?;

            let revenue = Self::amount(&record, &headers, "Revenue", line)?;
            let occupancy_str = Self::required_field(&record, &headers, "Occupancy", line)?;
            let occupancy = indian_format::parse_fraction(occupancy_str)
                .map_err(|e| EngineError::CsvDataFormatError(format!("Error parsing 'Occupancy' at line {}: {}", line, e)))?;

            let opex_actual = OperatingExpenditure {
                rent: Self::amount(&record, &headers, "Rent", line)?,
                staff: Self::amount(&record, &headers, "Staff", line)?,
                food_staff: Self::amount(&record, &headers, "FoodStaff", line)?,
                utilities: Self::amount(&record, &headers, "Utilities", line)?,
                maintenance: Self::amount(&record, &headers, "Maintenance", line)?,
                other_operating_costs: Self::optional_amount(&record, &headers, "Other", line)?.unwrap_or(0.0),
            };
            let payout = Self::optional_amount(&record, &headers, "Payout", line)?.unwrap_or(0.0);

            let entry = record_actuals(month, revenue, occupancy, opex_actual, payout).map_err(|e| match e {
                EngineError::InvalidInput { field, reason } => {
                    EngineError::CsvDataFormatError(format!("Invalid '{}' at line {}: {}", field, line, reason))
                }
                other => other,
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn amount(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64, EngineError> {
        let raw = Self::required_field(record, headers, name, line)?;
        indian_format::parse_amount(raw)
            .map_err(|e| EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e)))
    }

    fn optional_amount(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<Option<f64>, EngineError> {
        match Self::get_field(record, headers, name) {
            Some(raw) if !raw.is_empty() => indian_format::parse_amount(raw)
                .map(Some)
                .map_err(|e| EngineError::CsvDataFormatError(format!("Error parsing '{}' at line {}: {}", name, line, e))),
            _ => Ok(None),
        }
    }

    fn required_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str, EngineError> {
        Self::get_field(record, headers, name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' field in CSV record at line {}", name, line)))
    }

    // Columns are looked up by header name, so their order in the file does not matter.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Month;Revenue;Occupancy;Rent;Staff;FoodStaff;Utilities;Maintenance;Other;Payout";

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_entries_from_csv_valid_data() {
        let csv_content = format!(
            "{}\n2024-03;3,80,000;74%;1,30,000;30,000;6,000;14,080;10,000;5,000;90,000\n2024-04;4,10,500.50;0.81;130000;30000;6000;14080;10000;;",
            HEADER
        );
        let tmp_file = create_test_csv(&csv_content);
        let entries = LedgerCsvParser::load_entries_from_csv(tmp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].month.to_string(), "2024-03");
        assert_eq!(entries[0].revenue, 380_000.0);
        assert_eq!(entries[0].occupancy_rate_actual, 0.74);
        assert_eq!(entries[0].total_operating_expenses_actual, 195_080.0);
        assert_eq!(entries[0].net_profit_actual, 184_920.0);
        assert_eq!(entries[0].total_payout_to_investors, 90_000.0);

        assert_eq!(entries[1].revenue, 410_500.5);
        assert_eq!(entries[1].opex_actual.other_operating_costs, 0.0);
        assert_eq!(entries[1].total_payout_to_investors, 0.0);
        assert_eq!(entries[1].total_operating_expenses_actual, 190_080.0);
    }

    #[test]
    fn test_columns_matched_by_name() {
        let csv_content = "\
Revenue;Month;Rent;Staff;FoodStaff;Utilities;Maintenance;Occupancy
1,00,000;2024-01;50000;10000;0;0;0;50%";
        let entries = LedgerCsvParser::parse_entries(csv_content.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].month.to_string(), "2024-01");
        assert_eq!(entries[0].net_profit_actual, 40_000.0);
        assert_eq!(entries[0].occupancy_rate_actual, 0.5);
    }

    #[test]
    fn test_load_entries_from_csv_header_only() {
        let tmp_file = create_test_csv(HEADER);
        let entries = LedgerCsvParser::load_entries_from_csv(tmp_file.path().to_str().unwrap()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let csv_content = "\
Month;Revenue;Occupancy;Rent;Staff;FoodStaff;Utilities
2024-03;380000;0.74;130000;30000;6000;14080";
        let err = LedgerCsvParser::parse_entries(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("Missing 'Maintenance' field"));
    }

    #[test]
    fn test_invalid_amount() {
        let csv_content = format!("{}\n2024-03;lots;0.74;130000;30000;6000;14080;10000;5000;0", HEADER);
        let err = LedgerCsvParser::parse_entries(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Revenue' at line 2"));
    }

    #[test]
    fn test_invalid_month() {
        let csv_content = format!("{}\n03/2024;380000;0.74;130000;30000;6000;14080;10000;5000;0", HEADER);
        let err = LedgerCsvParser::parse_entries(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'Month' at line 2"));
    }

    #[test]
    fn test_out_of_range_occupancy() {
        let csv_content = format!("{}\n2024-03;380000;120%;130000;30000;6000;14080;10000;5000;0", HEADER);
        let err = LedgerCsvParser::parse_entries(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::CsvDataFormatError(_)));
        assert!(err.to_string().contains("occupancyRateActual"));
    }

    #[test]
    fn test_ragged_row_is_a_csv_system_error() {
        let csv_content = format!("{}\n2024-03;380000;0.74", HEADER);
        let err = LedgerCsvParser::parse_entries(csv_content.as_bytes()).unwrap_err();
        assert!(matches!(err, EngineError::CsvSystemError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LedgerCsvParser::load_entries_from_csv("no_such_ledger.csv").unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
    }
}
