//! HEIC Converter Core - batch conversion library
//!
//! This crate provides the conversion pipeline behind the HEIC batch
//! converter: it takes a list of HEIC files, transcodes each one through an
//! injected codec, optionally downscales the result, and keeps the outputs
//! until the user exports or clears them.
//!
//! # Module Structure
//!
//! - `settings` - Per-batch quality, maximum width and output format
//! - `source` - Source files and output filename rules
//! - `codec` - The codec adapter boundary and a built-in raster codec
//! - `decode` / `encode` - Raster I/O for converted buffers
//! - `resizer` - Width-constrained downscaling
//! - `pipeline` - The sequential, fault-isolated batch loop
//! - `store` - Ordered results, export and release
//! - `export` - The host save/download capability
//!
//! # Example
//!
//! ```ignore
//! use heic_converter_core::{BatchPipeline, ConversionSettings, RasterCodec, ResultStore};
//!
//! let mut pipeline = BatchPipeline::new(RasterCodec);
//! let mut store = ResultStore::new();
//! let summary = pipeline.convert_all(&files, &ConversionSettings::default(), &mut store, |event| {
//!     println!("{}/{}", event.progress.completed, event.progress.total);
//! })?;
//! ```

pub mod codec;
pub mod decode;
pub mod encode;
pub mod export;
pub mod pipeline;
pub mod resizer;
pub mod settings;
pub mod source;
pub mod store;

pub use codec::{AdapterInitError, CodecAdapter, CodecError, RasterCodec};
pub use export::{DirectoryExporter, HostExporter};
pub use pipeline::{
    BatchError, BatchEvent, BatchPipeline, BatchRun, BatchSummary, CancellationToken, ItemError,
    ItemStatus,
};
pub use resizer::{ResizeError, Resizer};
pub use settings::{ConversionSettings, MaxWidth, Quality, SettingsError, TargetFormat};
pub use source::{derive_output_name, has_source_extension, SourceFile};
pub use store::{BatchProgress, OutputHandle, ResultRecord, ResultStore, StoreError};
