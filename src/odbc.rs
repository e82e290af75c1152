//! Client seam implemented with `odbc-iter`.
use log::{debug, warn};
use odbc_iter::{AsNullable, DefaultConfiguration, Handle, Odbc, ValueRow};

use crate::client::{Connection, Driver, Environment, Records, Rows, Statement};
use crate::config::ConnectionString;
use crate::error::ExportError;

/// System ODBC driver manager.
///
/// odbc-iter keeps one ODBC environment for the whole process, so there is nothing to release
/// when `OdbcEnvironment` goes away.
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbcDriver;

impl Driver for OdbcDriver {
    type Environment = OdbcEnvironment;

    fn environment(&self) -> Result<OdbcEnvironment, ExportError> {
        // Listing drivers forces ODBC v3 environment initialization
        let drivers = Odbc::list_drivers().map_err(|err| ExportError::Environment(err.to_string()))?;
        let drivers = drivers.into_iter().map(|driver| driver.description).collect::<Vec<_>>();
        debug!("ODBC environment ready; installed drivers: {:?}", drivers);

        Ok(OdbcEnvironment { drivers })
    }
}

#[derive(Debug)]
pub struct OdbcEnvironment {
    drivers: Vec<String>,
}

impl Environment for OdbcEnvironment {
    type Connection<'e> = OdbcConnection;

    fn connect(&self, connection_string: &ConnectionString) -> Result<OdbcConnection, ExportError> {
        if !self.drivers.iter().any(|driver| driver == connection_string.driver()) {
            warn!("Driver {:?} is not among installed ODBC drivers; see odbc-drivers", connection_string.driver());
        }

        debug!("Connecting with: {}", connection_string);
        let connection = Odbc::connect(connection_string.as_str()).map_err(|err| ExportError::Connection(err.to_string()))?;

        Ok(OdbcConnection { connection })
    }
}

pub struct OdbcConnection {
    connection: odbc_iter::Connection,
}

impl Drop for OdbcConnection {
    fn drop(&mut self) {
        debug!("Disconnecting");
    }
}

impl Connection for OdbcConnection {
    type Statement<'c> = OdbcStatement<'c>;

    fn statement(&mut self) -> Result<OdbcStatement<'_>, ExportError> {
        Ok(OdbcStatement {
            handle: self.connection.handle(),
        })
    }
}

pub struct OdbcStatement<'c> {
    handle: Handle<'c, DefaultConfiguration>,
}

impl Drop for OdbcStatement<'_> {
    fn drop(&mut self) {
        debug!("Releasing statement");
    }
}

impl Statement for OdbcStatement<'_> {
    fn execute(&mut self, sql: &str) -> Result<Rows<'_>, ExportError> {
        debug!("Executing: {}", sql);
        let rows = self
            .handle
            .query::<String>(sql)
            .map_err(|err| ExportError::QueryExecution(err.to_string()))?;

        Ok(Box::new(rows.map(|row| row.map_err(|err| ExportError::Fetch(err.to_string())))))
    }

    fn query_records(&mut self, sql: &str) -> Result<Records<'_>, ExportError> {
        debug!("Executing: {}", sql);
        let rows = self
            .handle
            .query::<ValueRow>(sql)
            .map_err(|err| ExportError::QueryExecution(err.to_string()))?;
        let columns = rows.schema().iter().map(|column| column.name.clone()).collect();

        Ok(Records {
            columns,
            rows: Box::new(rows.map(|row| {
                row.map(|values| values.into_iter().map(|value| value.as_nullable().to_string()).collect::<Vec<String>>())
                    .map_err(|err| ExportError::Fetch(err.to_string()))
            })),
        })
    }
}
