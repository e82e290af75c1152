//! Database client seam.
//!
//! Each level of the client API is a guard that releases its resource on
//! drop. Children borrow their parent so a connection cannot outlive its
//! environment, a statement its connection, and result rows their statement.
use crate::config::ConnectionString;
use crate::error::ExportError;

/// Result rows of an executed query; first column of each row as text.
pub type Rows<'s> = Box<dyn Iterator<Item = Result<String, ExportError>> + 's>;

/// Result of a query with any number of columns.
///
/// Values are rendered as text; SQL NULL becomes `NULL`.
pub struct Records<'s> {
    pub columns: Vec<String>,
    pub rows: Box<dyn Iterator<Item = Result<Vec<String>, ExportError>> + 's>,
}

/// Entry point of a client library.
pub trait Driver {
    type Environment: Environment;

    /// Initializes the client library environment.
    fn environment(&self) -> Result<Self::Environment, ExportError>;
}

pub trait Environment {
    type Connection<'e>: Connection
    where
        Self: 'e;

    /// Allocates a connection handle and opens it with given connection string.
    ///
    /// Fails with `ConnectionAllocation` if no handle could be obtained and with `Connection` if
    /// the driver refused to connect.
    fn connect(&self, connection_string: &ConnectionString) -> Result<Self::Connection<'_>, ExportError>;
}

pub trait Connection {
    type Statement<'c>: Statement
    where
        Self: 'c;

    fn statement(&mut self) -> Result<Self::Statement<'_>, ExportError>;
}

pub trait Statement {
    /// Executes query text returning a cursor over its rows.
    fn execute(&mut self, sql: &str) -> Result<Rows<'_>, ExportError>;

    /// Executes query text returning column names and a cursor over all columns of its rows.
    fn query_records(&mut self, sql: &str) -> Result<Records<'_>, ExportError>;
}
