//! Export the first rows of every listed table, one CSV file per table.
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::client::{Connection, Driver, Environment, Statement};
use crate::config::SampleConfig;
use crate::error::ExportError;
use crate::export::TABLE_HEADER;
use crate::output::CsvFile;

/// What happened to one table.
#[derive(Debug)]
pub enum SampleOutcome {
    Written { path: PathBuf, rows: usize },
    /// Table has no rows; no file was written.
    Empty,
}

#[derive(Debug)]
pub struct TableSample {
    pub table: String,
    pub outcome: Result<SampleOutcome, ExportError>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampleSummary {
    pub written: usize,
    pub empty: usize,
    pub failed: usize,
}

/// Quotes a SQL Server identifier: `[name]` with `]` doubled.
pub fn quote_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

pub fn sample_query(table: &str, rows: usize) -> String {
    format!("SELECT TOP {} * FROM {};", rows, quote_identifier(table))
}

/// File name for samples of given table; path separators are replaced.
pub fn sample_file_name(table: &str) -> String {
    let name = table.replace(|c: char| c == '/' || c == '\\', "_");
    format!("tabela_{}.csv", name)
}

/// Reads table names from the first column of a CSV file.
///
/// Blank entries are skipped, as is a leading `Tabela` header.
pub fn read_table_list(path: &Path) -> Result<Vec<String>, ExportError> {
    let table_list_error = |source: csv::Error| ExportError::TableList {
        path: path.to_owned(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(table_list_error)?;

    let mut tables = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(table_list_error)?;
        let table = record.get(0).map(str::trim).unwrap_or("");
        if table.is_empty() || (i == 0 && table == TABLE_HEADER) {
            continue;
        }
        tables.push(table.to_owned());
    }
    Ok(tables)
}

/// Writes up to `config.rows` rows of each table listed in `config.tables` to `config.output_dir`.
///
/// Failure on one table is passed to `on_table` and the next table is processed. Reading the
/// table list, creating the output directory and connecting are fatal.
pub fn export_samples<D, F>(driver: &D, config: &SampleConfig, mut on_table: F) -> Result<SampleSummary, ExportError>
where
    D: Driver,
    F: FnMut(&TableSample),
{
    let tables = read_table_list(&config.tables)?;
    info!("Sampling {} tables listed in {}", tables.len(), config.tables.display());

    fs::create_dir_all(&config.output_dir).map_err(|source| ExportError::FileOpen {
        path: config.output_dir.clone(),
        source,
    })?;

    let connection_string = config.connection.connection_string();
    let environment = driver.environment()?;
    let mut connection = environment.connect(&connection_string)?;
    debug!("Connected with: {}", connection_string);

    let mut summary = SampleSummary::default();
    for table in tables {
        let outcome = sample_table(&mut connection, &table, config);
        match &outcome {
            Ok(SampleOutcome::Written { .. }) => summary.written += 1,
            Ok(SampleOutcome::Empty) => summary.empty += 1,
            Err(err) => {
                warn!("Sampling table {:?} failed: {}", table, err);
                summary.failed += 1;
            }
        }
        on_table(&TableSample { table, outcome });
    }

    info!("Sampled tables: {:?}", summary);
    Ok(summary)
}

fn sample_table<C: Connection>(connection: &mut C, table: &str, config: &SampleConfig) -> Result<SampleOutcome, ExportError> {
    let mut statement = connection.statement()?;
    let records = statement.query_records(&sample_query(table, config.rows))?;
    let columns = records.columns;
    let rows = records.rows.collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Ok(SampleOutcome::Empty);
    }

    let path = config.output_dir.join(sample_file_name(table));
    let mut file = CsvFile::create(&path, &columns)?;
    for row in &rows {
        file.write(row)?;
    }
    let rows = file.finish()?;

    Ok(SampleOutcome::Written { path, rows })
}
