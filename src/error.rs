use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every way an export run can fail.
///
/// All of them end the run; nothing is retried. The display text is the
/// one-line message shown to the user.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Erro ao alocar ambiente: {0}")]
    Environment(String),
    #[error("Erro ao alocar conexão: {0}")]
    ConnectionAllocation(String),
    #[error("Erro ao conectar ao banco: {0}")]
    Connection(String),
    #[error("Erro ao alocar handle de comando: {0}")]
    StatementAllocation(String),
    #[error("Erro ao executar consulta: {0}")]
    QueryExecution(String),
    #[error("Erro ao ler resultado da consulta: {0}")]
    Fetch(String),
    #[error("Erro ao criar arquivo '{}': {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Erro ao gravar arquivo '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Erro ao ler lista de tabelas '{}': {source}", .path.display())]
    TableList {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExportError {
    /// Process exit status for this kind of failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::Environment(_) => 2,
            ExportError::ConnectionAllocation(_) => 3,
            ExportError::Connection(_) => 4,
            ExportError::StatementAllocation(_) => 5,
            ExportError::QueryExecution(_) => 6,
            ExportError::Fetch(_) => 7,
            ExportError::FileOpen { .. } => 8,
            ExportError::Write { .. } => 9,
            ExportError::TableList { .. } => 10,
        }
    }
}
