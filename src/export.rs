use log::{debug, info};
use std::path::PathBuf;

use crate::client::{Connection, Driver, Environment, Statement};
use crate::config::{ConnectionConfig, ExportConfig};
use crate::error::ExportError;
use crate::output::CsvFile;

/// Lists base tables of the connected database in name order.
pub const TABLES_QUERY: &str =
    "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME;";

/// CSV header line.
pub const TABLE_HEADER: &str = "Tabela";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub tables: usize,
}

/// Connects, lists base tables and writes them to `config.output` as single column CSV.
///
/// The output file is only created once the query has executed. If fetching or writing rows
/// fails afterwards the partially written file is removed.
pub fn export_tables<D: Driver>(driver: &D, config: &ExportConfig) -> Result<ExportReport, ExportError> {
    let connection_string = config.connection.connection_string();
    info!("Exporting tables of {:?} on {:?} to {}", config.connection.database, config.connection.host, config.output.display());

    let environment = driver.environment()?;
    let mut connection = environment.connect(&connection_string)?;
    debug!("Connected with: {}", connection_string);

    let mut statement = connection.statement()?;
    let rows = statement.execute(TABLES_QUERY)?;

    let mut file = CsvFile::create(&config.output, &[TABLE_HEADER])?;
    for name in rows {
        file.write(&[name?])?;
    }
    let tables = file.finish()?;

    info!("Exported {} tables to {}", tables, config.output.display());
    Ok(ExportReport {
        path: config.output.clone(),
        tables,
    })
}

/// Opens and closes a connection without running anything.
pub fn ping<D: Driver>(driver: &D, config: &ConnectionConfig) -> Result<(), ExportError> {
    let connection_string = config.connection_string();
    let environment = driver.environment()?;
    let _connection = environment.connect(&connection_string)?;
    info!("Connected with: {}", connection_string);
    Ok(())
}
