//! In-memory database client recording handle lifetimes.
#![allow(dead_code)]
use odbc_tables::{Connection, ConnectionString, Driver, Environment, ExportError, Records, Rows, Statement, TABLES_QUERY};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Environment,
    Connection,
    Statement,
    Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Acquired(Resource),
    Executed(String),
    Released(Resource),
}

/// Point at which the mock client fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Environment,
    ConnectionAllocation,
    Connect,
    Statement,
    Execute,
    /// Fetching the row with given index.
    Fetch(usize),
}

struct TableData {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

struct Database {
    password: String,
    tables: Vec<String>,
    data: HashMap<String, TableData>,
    failure: Option<Failure>,
    events: RefCell<Vec<Event>>,
}

impl Database {
    fn record(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn fails_at(&self, failure: Failure) -> bool {
        self.failure == Some(failure)
    }

    fn fail_fetch_at(&self) -> Option<usize> {
        match self.failure {
            Some(Failure::Fetch(index)) => Some(index),
            _ => None,
        }
    }
}

pub struct MockDriver {
    database: Rc<Database>,
}

impl MockDriver {
    pub fn new(password: &str, tables: &[&str]) -> MockDriver {
        MockDriver::build(password, tables, None)
    }

    pub fn with_failure(password: &str, tables: &[&str], failure: Failure) -> MockDriver {
        MockDriver::build(password, tables, Some(failure))
    }

    fn build(password: &str, tables: &[&str], failure: Option<Failure>) -> MockDriver {
        MockDriver {
            database: Rc::new(Database {
                password: password.to_owned(),
                tables: tables.iter().map(|table| table.to_string()).collect(),
                data: HashMap::new(),
                failure,
                events: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Adds table content served to `SELECT TOP n * FROM [table]` queries.
    pub fn with_rows(mut self, table: &str, columns: &[&str], rows: &[&[&str]]) -> MockDriver {
        let database = Rc::get_mut(&mut self.database).expect("driver already in use");
        database.tables.push(table.to_owned());
        database.data.insert(
            table.to_owned(),
            TableData {
                columns: columns.iter().map(|column| column.to_string()).collect(),
                rows: rows.iter().map(|row| row.iter().map(|value| value.to_string()).collect()).collect(),
            },
        );
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.database.events.borrow().clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Executed(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|recorded| *recorded == event).count()
    }

    /// Asserts every acquired resource was released exactly once, before anything acquired
    /// earlier was released.
    pub fn assert_released_in_reverse(&self) {
        let events = self.events();
        let mut live = Vec::new();
        for event in &events {
            match event {
                Event::Acquired(resource) => live.push(*resource),
                Event::Released(resource) => assert_eq!(live.pop(), Some(*resource), "events: {:?}", events),
                Event::Executed(_) => (),
            }
        }
        assert!(live.is_empty(), "not released: {:?}; events: {:?}", live, events);
    }
}

impl Driver for MockDriver {
    type Environment = MockEnvironment;

    fn environment(&self) -> Result<MockEnvironment, ExportError> {
        if self.database.fails_at(Failure::Environment) {
            return Err(ExportError::Environment("driver manager not available".to_owned()));
        }
        self.database.record(Event::Acquired(Resource::Environment));
        Ok(MockEnvironment {
            database: self.database.clone(),
        })
    }
}

pub struct MockEnvironment {
    database: Rc<Database>,
}

impl Drop for MockEnvironment {
    fn drop(&mut self) {
        self.database.record(Event::Released(Resource::Environment));
    }
}

impl Environment for MockEnvironment {
    type Connection<'e> = MockConnection<'e>;

    fn connect(&self, connection_string: &ConnectionString) -> Result<MockConnection<'_>, ExportError> {
        if self.database.fails_at(Failure::ConnectionAllocation) {
            return Err(ExportError::ConnectionAllocation("out of handles".to_owned()));
        }
        self.database.record(Event::Acquired(Resource::Connection));
        let connection = MockConnection { database: &self.database };

        let password = format!("PWD={};", self.database.password);
        if self.database.fails_at(Failure::Connect) || !connection_string.as_str().contains(&password) {
            return Err(ExportError::Connection("Login failed".to_owned()));
        }
        Ok(connection)
    }
}

pub struct MockConnection<'e> {
    database: &'e Database,
}

impl Drop for MockConnection<'_> {
    fn drop(&mut self) {
        self.database.record(Event::Released(Resource::Connection));
    }
}

impl<'e> Connection for MockConnection<'e> {
    type Statement<'c> = MockStatement<'c> where Self: 'c;

    fn statement(&mut self) -> Result<MockStatement<'_>, ExportError> {
        if self.database.fails_at(Failure::Statement) {
            return Err(ExportError::StatementAllocation("out of handles".to_owned()));
        }
        self.database.record(Event::Acquired(Resource::Statement));
        Ok(MockStatement { database: self.database })
    }
}

pub struct MockStatement<'c> {
    database: &'c Database,
}

impl Drop for MockStatement<'_> {
    fn drop(&mut self) {
        self.database.record(Event::Released(Resource::Statement));
    }
}

impl MockStatement<'_> {
    fn run(&self, sql: &str) -> Result<(), ExportError> {
        self.database.record(Event::Executed(sql.to_owned()));
        if self.database.fails_at(Failure::Execute) {
            return Err(ExportError::QueryExecution("deadlock victim".to_owned()));
        }
        Ok(())
    }

    fn cursor<T>(&self, rows: Vec<T>) -> MockCursor<'_, T> {
        self.database.record(Event::Acquired(Resource::Cursor));
        MockCursor {
            database: self.database,
            rows: rows.into_iter().enumerate(),
            fail_at: self.database.fail_fetch_at(),
        }
    }
}

/// Parses `SELECT TOP n * FROM [name];` returning unquoted table name.
fn sampled_table(sql: &str) -> Option<String> {
    let rest = sql.strip_prefix("SELECT TOP ")?;
    let (count, rest) = rest.split_once(" * FROM ")?;
    count.parse::<usize>().ok()?;
    let quoted = rest.strip_suffix(';')?.strip_prefix('[')?.strip_suffix(']')?;
    Some(quoted.replace("]]", "]"))
}

impl Statement for MockStatement<'_> {
    fn execute(&mut self, sql: &str) -> Result<Rows<'_>, ExportError> {
        self.run(sql)?;
        if sql != TABLES_QUERY {
            return Err(ExportError::QueryExecution(format!("unexpected query: {}", sql)));
        }

        let mut tables = self.database.tables.clone();
        tables.sort();
        Ok(Box::new(self.cursor(tables)))
    }

    fn query_records(&mut self, sql: &str) -> Result<Records<'_>, ExportError> {
        self.run(sql)?;
        let table = sampled_table(sql).ok_or_else(|| ExportError::QueryExecution(format!("unexpected query: {}", sql)))?;
        let limit = sql["SELECT TOP ".len()..].split(' ').next().and_then(|count| count.parse::<usize>().ok()).unwrap_or(0);
        let data = self
            .database
            .data
            .get(&table)
            .ok_or_else(|| ExportError::QueryExecution(format!("Invalid object name '{}'", table)))?;

        Ok(Records {
            columns: data.columns.clone(),
            rows: Box::new(self.cursor(data.rows.iter().take(limit).cloned().collect())),
        })
    }
}

/// Open result set; fails fetching row `fail_at` when set.
pub struct MockCursor<'s, T> {
    database: &'s Database,
    rows: std::iter::Enumerate<std::vec::IntoIter<T>>,
    fail_at: Option<usize>,
}

impl<T> Iterator for MockCursor<'_, T> {
    type Item = Result<T, ExportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, row) = self.rows.next()?;
        if Some(index) == self.fail_at {
            Some(Err(ExportError::Fetch("communication link failure".to_owned())))
        } else {
            Some(Ok(row))
        }
    }
}

impl<T> Drop for MockCursor<'_, T> {
    fn drop(&mut self) {
        self.database.record(Event::Released(Resource::Cursor));
    }
}
