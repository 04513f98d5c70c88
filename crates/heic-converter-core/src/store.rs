//! Ordered results of the current batch.
//!
//! The store owns every converted buffer from the moment the pipeline appends
//! it. Exporting lends the bytes to the host and keeps ownership, so a record
//! can be exported any number of times; [`ResultStore::clear`] is the only
//! place buffers are released.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::HostExporter;
use crate::settings::TargetFormat;
use crate::source::derive_output_name;

/// Errors raised by store operations invoked by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A failed record was treated as if it had an output.
    #[error("Cannot export {0}: conversion failed")]
    InvalidOperation(String),

    #[error("No result at index {0}")]
    NotFound(usize),
}

/// A converted buffer, exclusively owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputHandle(Box<[u8]>);

impl OutputHandle {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome for one input file. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRecord {
    Success {
        original_name: String,
        output: OutputHandle,
        size_bytes: usize,
        format: TargetFormat,
    },
    Failure {
        original_name: String,
        reason: String,
    },
}

impl ResultRecord {
    /// Build a success record; `size_bytes` always matches the buffer.
    pub fn success(original_name: impl Into<String>, output: Vec<u8>, format: TargetFormat) -> Self {
        let output = OutputHandle::new(output);
        Self::Success {
            original_name: original_name.into(),
            size_bytes: output.len(),
            output,
            format,
        }
    }

    pub fn failure(original_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failure {
            original_name: original_name.into(),
            reason: reason.into(),
        }
    }

    pub fn original_name(&self) -> &str {
        match self {
            Self::Success { original_name, .. } | Self::Failure { original_name, .. } => {
                original_name
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converted bytes, if the conversion succeeded.
    pub fn output(&self) -> Option<&OutputHandle> {
        match self {
            Self::Success { output, .. } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    /// Failure reason, if the conversion failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// Filename offered when exporting a successful record.
    pub fn output_name(&self) -> Option<String> {
        match self {
            Self::Success {
                original_name,
                format,
                ..
            } => Some(derive_output_name(original_name, *format)),
            Self::Failure { .. } => None,
        }
    }

    /// Output size in megabytes with two decimals, e.g. `"1.37 MB"`.
    pub fn size_label(&self) -> Option<String> {
        match self {
            Self::Success { size_bytes, .. } => {
                Some(format!("{:.2} MB", *size_bytes as f64 / 1024.0 / 1024.0))
            }
            Self::Failure { .. } => None,
        }
    }
}

/// Batch progress as observed by the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Completion percentage (0-100); zero for an empty batch.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

/// Holds the records of the current batch in input order.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<ResultRecord>,
    progress: BatchProgress,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in input order.
    pub fn all(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ResultRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn progress(&self) -> BatchProgress {
        self.progress
    }

    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    /// Export every successful record in order, skipping failures.
    ///
    /// Returns how many records were handed to the exporter.
    pub fn export_all(&self, exporter: &mut dyn HostExporter) -> usize {
        let mut exported = 0;
        for record in &self.records {
            if let (Some(output), Some(name)) = (record.output(), record.output_name()) {
                exporter.export(output.bytes(), &name);
                exported += 1;
            }
        }
        debug!("Exported {} of {} records", exported, self.records.len());
        exported
    }

    /// Export a single record.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` for an out-of-range index,
    /// `StoreError::InvalidOperation` for a failed record.
    pub fn export_one(
        &self,
        index: usize,
        exporter: &mut dyn HostExporter,
    ) -> Result<(), StoreError> {
        let record = self.records.get(index).ok_or(StoreError::NotFound(index))?;

        match (record.output(), record.output_name()) {
            (Some(output), Some(name)) => {
                exporter.export(output.bytes(), &name);
                Ok(())
            }
            _ => {
                warn!("Refusing to export failed record {}", record.original_name());
                Err(StoreError::InvalidOperation(
                    record.original_name().to_string(),
                ))
            }
        }
    }

    /// Release every held buffer, empty the store and reset progress.
    ///
    /// Returns the number of buffers released. Safe on an empty store.
    pub fn clear(&mut self) -> usize {
        let released = self.success_count();
        self.records.clear();
        self.records.shrink_to_fit();
        self.progress = BatchProgress::default();
        if released > 0 {
            debug!("Released {} converted buffers", released);
        }
        released
    }

    /// Start a new batch of `total` items. Previous results are released.
    pub(crate) fn begin(&mut self, total: usize) {
        self.clear();
        self.records.reserve(total);
        self.progress = BatchProgress::new(total);
    }

    /// Append the next record and advance progress by one.
    pub(crate) fn append(&mut self, record: ResultRecord) -> BatchProgress {
        debug_assert!(self.progress.completed < self.progress.total);
        self.records.push(record);
        self.progress.completed = self.records.len();
        self.progress
    }
}
