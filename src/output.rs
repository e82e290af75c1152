use log::{debug, warn};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// CSV file being written; removed on drop unless finished.
pub(crate) struct CsvFile {
    path: PathBuf,
    csv: Option<csv::Writer<File>>,
    rows: usize,
}

impl CsvFile {
    /// Creates (or truncates) the file and writes the header record.
    pub(crate) fn create<I, T>(path: &Path, header: I) -> Result<CsvFile, ExportError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let file = File::create(path).map_err(|source| ExportError::FileOpen {
            path: path.to_owned(),
            source,
        })?;

        let csv = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(file);

        let mut file = CsvFile {
            path: path.to_owned(),
            csv: Some(csv),
            rows: 0,
        };
        file.write_record(header)?;
        Ok(file)
    }

    pub(crate) fn write<I, T>(&mut self, record: I) -> Result<(), ExportError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.write_record(record)?;
        self.rows += 1;
        Ok(())
    }

    fn write_record<I, T>(&mut self, record: I) -> Result<(), ExportError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let path = &self.path;
        match self.csv.as_mut() {
            Some(csv) => csv.write_record(record).map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            }),
            None => Ok(()),
        }
    }

    /// Flushes and closes the file returning number of records written after the header.
    ///
    /// If flushing fails the file is removed like any other unfinished file.
    pub(crate) fn finish(mut self) -> Result<usize, ExportError> {
        let path = &self.path;
        if let Some(csv) = self.csv.as_mut() {
            csv.flush().map_err(|err| ExportError::Write {
                path: path.clone(),
                source: err.into(),
            })?;
        }

        // Fully flushed, keep the file.
        self.csv = None;
        Ok(self.rows)
    }
}

impl Drop for CsvFile {
    fn drop(&mut self) {
        if let Some(csv) = self.csv.take() {
            drop(csv);
            debug!("Removing incomplete output file {}", self.path.display());
            match fs::remove_file(&self.path) {
                Ok(()) => (),
                Err(err) if err.kind() == io::ErrorKind::NotFound => (),
                Err(err) => warn!("Failed to remove incomplete output file {}: {}", self.path.display(), err),
            }
        }
    }
}
