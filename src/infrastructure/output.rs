//! Streaming output of advisor records
//!
//! Each call to [`AdvisorCsvWriter::append`] is self-contained: open for
//! append, write header and records, finish the compression stream,
//! flush, close. Progress written by earlier calls therefore survives a
//! crash in a later one. An xz file built this way is a sequence of
//! complete xz streams, which `xz -d` and multi-stream decoders read as
//! one file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use xz2::write::XzEncoder;

use crate::domain::{AdvisorRecord, FIELD_NAMES};

const XZ_PRESET: u32 = 6;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to open output file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode CSV record: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputCompression {
    #[default]
    Xz,
    None,
}

impl OutputCompression {
    pub const fn from_flag(compress: bool) -> Self {
        if compress { Self::Xz } else { Self::None }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Xz => "xz",
            Self::None => "csv",
        }
    }
}

/// `<date>-congresspeople-advisors.<ext>`
pub fn output_file_name(date: NaiveDate, compression: OutputCompression) -> String {
    format!(
        "{}-congresspeople-advisors.{}",
        date.format("%Y-%m-%d"),
        compression.extension()
    )
}

/// Path of today's output file (local date) inside `data_dir`.
pub fn dated_output_path(data_dir: &Path, compression: OutputCompression) -> PathBuf {
    data_dir.join(output_file_name(Local::now().date_naive(), compression))
}

/// Appends batches of advisor records to a CSV file with every field quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisorCsvWriter {
    compression: OutputCompression,
}

impl AdvisorCsvWriter {
    pub const fn new(compression: OutputCompression) -> Self {
        Self { compression }
    }

    pub const fn compression(&self) -> OutputCompression {
        self.compression
    }

    /// Append header and `records` to `destination`, creating it if absent.
    ///
    /// All bytes are flushed to the file before this returns. No
    /// deduplication is done: appending a batch twice writes it twice.
    pub fn append(&self, records: &[AdvisorRecord], destination: &Path) -> Result<(), OutputError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .map_err(|source| OutputError::Open {
                path: destination.to_path_buf(),
                source,
            })?;

        let write_error = |source| OutputError::Write {
            path: destination.to_path_buf(),
            source,
        };

        let file = match self.compression {
            OutputCompression::Xz => {
                let encoder = XzEncoder::new(file, XZ_PRESET);
                let encoder = Self::write_csv(encoder, records)?;
                encoder.finish().map_err(write_error)?
            }
            OutputCompression::None => Self::write_csv(file, records)?,
        };
        file.sync_all().map_err(write_error)?;

        debug!("Appended {} records to {:?}", records.len(), destination);
        Ok(())
    }

    fn write_csv<W: Write>(sink: W, records: &[AdvisorRecord]) -> Result<W, OutputError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .has_headers(false)
            .from_writer(sink);

        writer.write_record(FIELD_NAMES)?;
        for record in records {
            writer.write_record(record.values())?;
        }

        writer
            .into_inner()
            .map_err(|e| OutputError::Csv(csv::Error::from(e.into_error())))
    }
}
