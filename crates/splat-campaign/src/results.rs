//! The on-disk results table: one CSV per design instance, append-only.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use splat_core::{ErrorInfo, ResultRow, ResultTable, SplatError};

/// Column order of the results file.
pub const RESULTS_COLUMNS: [&str; 9] = [
    "design",
    "file",
    "script",
    "iteration",
    "cpu time",
    "gates",
    "area",
    "delay",
    "Pareto",
];

fn wrap_csv(code: &str, err: csv::Error) -> SplatError {
    SplatError::Registry(ErrorInfo::new(code, "results CSV failure").with_hint(err.to_string()))
}

/// Appends a table to the results file at `path`.
///
/// The header is written only when the file is first created; existing
/// contents are never truncated.
pub fn append_results(path: &Path, table: &ResultTable) -> Result<(), SplatError> {
    let file_exists = path.exists();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| {
            SplatError::Registry(
                ErrorInfo::new("splat_campaign.results_open", "failed to open results CSV")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    if !file_exists {
        writer
            .write_record(RESULTS_COLUMNS)
            .map_err(|err| wrap_csv("splat_campaign.results_header", err))?;
    }
    for row in table.rows() {
        writer
            .write_record([
                row.design_id.as_str(),
                row.artifact_name.as_str(),
                row.script_name.as_str(),
                &row.iteration.to_string(),
                &row.cpu_time.to_string(),
                &row.gates.to_string(),
                &row.area.to_string(),
                &row.delay.to_string(),
                if row.is_pareto { "1" } else { "0" },
            ])
            .map_err(|err| wrap_csv("splat_campaign.results_row", err))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_csv("splat_campaign.results_flush", err.into()))?;
    Ok(())
}

/// Reads a results file back into a table.
pub fn read_results(path: &Path) -> Result<ResultTable, SplatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| wrap_csv("splat_campaign.results_read", err))?;
    let mut table = ResultTable::new();
    for record in reader.records() {
        let record = record.map_err(|err| wrap_csv("splat_campaign.results_record", err))?;
        table.push(row_from_record(&record, path)?)?;
    }
    Ok(table)
}

fn row_from_record(record: &StringRecord, path: &Path) -> Result<ResultRow, SplatError> {
    Ok(ResultRow {
        design_id: text_field(record, 0, path)?.to_string(),
        artifact_name: text_field(record, 1, path)?.to_string(),
        script_name: text_field(record, 2, path)?.to_string(),
        iteration: parse_field(record, 3, path)?,
        cpu_time: parse_field(record, 4, path)?,
        gates: parse_field(record, 5, path)?,
        area: parse_field(record, 6, path)?,
        delay: parse_field(record, 7, path)?,
        is_pareto: text_field(record, 8, path)? == "1",
    })
}

fn text_field<'a>(
    record: &'a StringRecord,
    idx: usize,
    path: &Path,
) -> Result<&'a str, SplatError> {
    record.get(idx).ok_or_else(|| {
        SplatError::Registry(
            ErrorInfo::new("splat_campaign.results_column", "results row is missing a column")
                .with_context("column", RESULTS_COLUMNS[idx].to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

fn parse_field<T: FromStr>(
    record: &StringRecord,
    idx: usize,
    path: &Path,
) -> Result<T, SplatError> {
    let raw = text_field(record, idx, path)?;
    raw.parse().map_err(|_| {
        SplatError::Registry(
            ErrorInfo::new("splat_campaign.results_value", "results field unparsable")
                .with_context("column", RESULTS_COLUMNS[idx].to_string())
                .with_context("value", raw.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}
