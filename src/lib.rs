//! Export the list of base tables of a database to a CSV file over ODBC.
//!
//! The export runs as a linear pipeline: ODBC environment, connection,
//! statement, result rows. Each stage is a guard borrowing the previous one
//! so everything acquired is released exactly once, in reverse order, no
//! matter which stage fails.
//!
//! The exported list can then drive a sample export taking the first rows of
//! every listed table.
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod odbc;
mod output;
pub mod samples;

pub use client::{Connection, Driver, Environment, Records, Rows, Statement};
pub use config::{ConnectionConfig, ConnectionOpt, ConnectionString, ExportConfig, ExportOpt, SampleConfig, SampleOpt};
pub use error::ExportError;
pub use export::{export_tables, ping, ExportReport, TABLES_QUERY, TABLE_HEADER};
pub use odbc::OdbcDriver;
pub use samples::{export_samples, SampleOutcome, SampleSummary, TableSample};
