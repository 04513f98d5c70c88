//! The batch conversion pipeline.
//!
//! A batch walks its input strictly in order, one item at a time:
//!
//! 1. Check the filename carries the source extension
//! 2. Transcode through the [`CodecAdapter`]
//! 3. Downscale with the [`Resizer`] when a maximum width is set
//! 4. Append a [`ResultRecord`] to the [`ResultStore`] and report progress
//!
//! Any failure in steps 1-3 becomes a `Failure` record for that item only;
//! the next item is processed regardless. Only setup problems (invalid
//! settings, a codec that will not become ready) fail the batch as a whole,
//! and they do so before any item is touched.
//!
//! [`BatchPipeline::run`] returns a lazy [`BatchRun`] iterator. It mutably
//! borrows both the pipeline and the store, so a second run cannot start
//! while one is still being driven.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::codec::{AdapterInitError, CodecAdapter, CodecError};
use crate::resizer::{ResizeError, Resizer};
use crate::settings::{ConversionSettings, SettingsError};
use crate::source::{SourceFile, SOURCE_FORMAT_NAME};
use crate::store::{BatchProgress, ResultRecord, ResultStore};

/// Why a single item failed. Rendered into the item's failure reason.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("{name} is not a {format} file - skipping")]
    InvalidInputFormat { name: String, format: &'static str },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Resize(#[from] ResizeError),
}

/// Batch-level failure: no item was processed.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    AdapterInit(#[from] AdapterInitError),

    #[error(transparent)]
    InvalidSettings(#[from] SettingsError),
}

/// Cooperative cancellation, observed only between items.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened to one item, without the converted bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ItemStatus {
    #[serde(rename_all = "camelCase")]
    Converted { size_bytes: usize },
    Failed { reason: String },
}

impl From<&ResultRecord> for ItemStatus {
    fn from(record: &ResultRecord) -> Self {
        match record {
            ResultRecord::Success { size_bytes, .. } => ItemStatus::Converted {
                size_bytes: *size_bytes,
            },
            ResultRecord::Failure { reason, .. } => ItemStatus::Failed {
                reason: reason.clone(),
            },
        }
    }
}

/// Emitted once per processed item, after its record is in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEvent {
    /// Position of the item in the input (and in the store).
    pub index: usize,
    pub original_name: String,
    #[serde(flatten)]
    pub status: ItemStatus,
    pub progress: BatchProgress,
}

/// Totals for a finished (or cancelled) batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Drives a [`CodecAdapter`] and [`Resizer`] over a list of files.
#[derive(Debug)]
pub struct BatchPipeline<C> {
    codec: C,
}

impl<C: CodecAdapter> BatchPipeline<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Start a batch over `files`.
    ///
    /// The store is cleared first (releasing the previous batch's buffers),
    /// then settings are validated and the codec readied. If either fails the
    /// store is left empty with progress `{0, 0}`. On success progress is
    /// `{0, files.len()}` and the returned iterator processes one item per
    /// `next()` call.
    pub fn run<'a>(
        &'a mut self,
        files: &'a [SourceFile],
        settings: &ConversionSettings,
        store: &'a mut ResultStore,
    ) -> Result<BatchRun<'a, C>, BatchError> {
        store.clear();
        settings.validate()?;
        self.codec.ready().inspect_err(|e| {
            warn!("Codec adapter failed to initialize: {}", e);
        })?;

        info!(
            "Converting {} file(s) to {:?} (quality {}%, max width {})",
            files.len(),
            settings.format,
            settings.quality.as_percent(),
            settings.max_width
        );
        store.begin(files.len());

        Ok(BatchRun {
            codec: &self.codec,
            resizer: Resizer::new(settings.filter),
            settings: *settings,
            files,
            store,
            next: 0,
            cancellation: None,
        })
    }

    /// Run a whole batch, invoking `on_event` after every item.
    pub fn convert_all(
        &mut self,
        files: &[SourceFile],
        settings: &ConversionSettings,
        store: &mut ResultStore,
        on_event: impl FnMut(&BatchEvent),
    ) -> Result<BatchSummary, BatchError> {
        Ok(self.run(files, settings, store)?.finish(on_event))
    }
}

/// A batch in flight. Each `next()` fully processes one item.
pub struct BatchRun<'a, C> {
    codec: &'a C,
    resizer: Resizer,
    settings: ConversionSettings,
    files: &'a [SourceFile],
    store: &'a mut ResultStore,
    next: usize,
    cancellation: Option<CancellationToken>,
}

impl<'a, C: CodecAdapter> BatchRun<'a, C> {
    /// Stop before the next item once `token` is cancelled. Items not yet
    /// started are left out entirely: no record, no progress.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn progress(&self) -> BatchProgress {
        self.store.progress()
    }

    /// Drive the remaining items, calling `on_event` after each one.
    pub fn finish(mut self, mut on_event: impl FnMut(&BatchEvent)) -> BatchSummary {
        for event in self.by_ref() {
            on_event(&event);
        }

        let progress = self.store.progress();
        let succeeded = self.store.success_count();
        BatchSummary {
            total: progress.total,
            succeeded,
            failed: progress.completed - succeeded,
            cancelled: progress.completed < progress.total,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn convert(&self, file: &SourceFile) -> Result<Vec<u8>, ItemError> {
        if !file.has_source_extension() {
            return Err(ItemError::InvalidInputFormat {
                name: file.name.clone(),
                format: SOURCE_FORMAT_NAME,
            });
        }

        let settings = &self.settings;
        let mut output = self
            .codec
            .decode_and_encode(&file.bytes, settings.quality, settings.format)?;

        if let Some(max_width) = settings.max_width.limit() {
            output = self.resizer.constrain(output, max_width, settings.quality)?;
        }

        Ok(output)
    }
}

impl<C: CodecAdapter> Iterator for BatchRun<'_, C> {
    type Item = BatchEvent;

    fn next(&mut self) -> Option<BatchEvent> {
        if self.next >= self.files.len() {
            return None;
        }
        if self.is_cancelled() {
            info!(
                "Batch cancelled after {} of {} file(s)",
                self.next,
                self.files.len()
            );
            self.next = self.files.len();
            return None;
        }

        let index = self.next;
        self.next += 1;
        let file = &self.files[index];

        let record = match self.convert(file) {
            Ok(output) => {
                debug!("Converted {} ({} bytes)", file.name, output.len());
                ResultRecord::success(file.name.clone(), output, self.settings.format)
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", file.name, e);
                ResultRecord::failure(file.name.clone(), e.to_string())
            }
        };

        let status = ItemStatus::from(&record);
        let progress = self.store.append(record);

        if progress.is_complete() {
            info!(
                "Batch finished: {} of {} file(s) converted",
                self.store.success_count(),
                progress.total
            );
        }

        Some(BatchEvent {
            index,
            original_name: file.name.clone(),
            status,
            progress,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.files.len() - self.next;
        if self.cancellation.is_some() {
            (0, Some(remaining))
        } else {
            (remaining, Some(remaining))
        }
    }
}

impl<C: CodecAdapter> FusedIterator for BatchRun<'_, C> {}
