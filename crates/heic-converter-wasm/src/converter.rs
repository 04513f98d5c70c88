//! The batch converter exposed to the web UI.

use std::cell::RefCell;

use heic_converter_core::{
    BatchEvent, BatchPipeline, CancellationToken, CodecAdapter, RasterCodec, ResultStore,
    SourceFile,
};
use js_sys::Function;
use log::{error, warn};
use wasm_bindgen::prelude::*;

use crate::codec::{js_error_message, JsCodec};
use crate::export::JsExporter;
use crate::types::{record_views, settings_from_js, to_js};

const BUSY: &str = "A conversion batch is already running";

/// Queues files, converts them as one batch and holds the results until
/// they are exported or cleared.
///
/// # Example (TypeScript)
/// ```typescript
/// const converter = new BatchConverter(libheifConvert);
/// for (const file of input.files) {
///   converter.queue(file.name, new Uint8Array(await file.arrayBuffer()));
/// }
///
/// const summary = converter.convert(
///   { quality: 0.8, maxWidth: '1920', format: 'jpeg' },
///   (event) => bar.style.width = `${event.progress.completed / event.progress.total * 100}%`,
/// );
///
/// renderList(converter.records());
/// converter.export_all((bytes, name) => download(bytes, name));
/// converter.clear();
/// ```
#[wasm_bindgen]
pub struct BatchConverter {
    pipeline: RefCell<BatchPipeline<Box<dyn CodecAdapter>>>,
    store: RefCell<ResultStore>,
    queue: RefCell<Vec<SourceFile>>,
    cancellation: RefCell<CancellationToken>,
}

impl BatchConverter {
    fn with_codec(codec: Box<dyn CodecAdapter>) -> Self {
        BatchConverter {
            pipeline: RefCell::new(BatchPipeline::new(codec)),
            store: RefCell::new(ResultStore::new()),
            queue: RefCell::new(Vec::new()),
            cancellation: RefCell::new(CancellationToken::new()),
        }
    }
}

#[wasm_bindgen]
impl BatchConverter {
    /// Create a converter around a JS codec function
    /// `(bytes: Uint8Array, quality: number, mimeType: string) => Uint8Array`.
    ///
    /// A missing or non-callable codec is reported when `convert` runs, as
    /// "Failed to load converter".
    #[wasm_bindgen(constructor)]
    pub fn new(codec: JsValue) -> BatchConverter {
        Self::with_codec(Box::new(JsCodec::new(codec)))
    }

    /// Create a converter that uses the built-in JPEG/PNG codec.
    ///
    /// Handy for exercising the UI without a HEIC decoder loaded.
    pub fn raster() -> BatchConverter {
        Self::with_codec(Box::new(RasterCodec))
    }

    /// Add a file to the next batch.
    pub fn queue(&self, name: String, bytes: Vec<u8>) -> Result<(), JsValue> {
        let mut queue = self
            .queue
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str(BUSY))?;
        queue.push(SourceFile::new(name, bytes));
        Ok(())
    }

    /// Number of files waiting for the next batch.
    pub fn queued(&self) -> usize {
        self.queue.try_borrow().map(|queue| queue.len()).unwrap_or(0)
    }

    /// Convert every queued file, in order.
    ///
    /// `settings` is `{ quality?, maxWidth?, format?, filter? }`; omitted
    /// fields take their defaults. `onProgress` receives one event per file.
    /// Previous results are released first.
    ///
    /// # Returns
    /// `{ total, succeeded, failed, cancelled }`
    ///
    /// # Errors
    /// Invalid settings, a codec that failed to load, or a call made while a
    /// batch is already running (e.g. from inside `onProgress`). In the
    /// first two cases the queue is kept for a retry.
    pub fn convert(
        &self,
        settings: JsValue,
        on_progress: Option<Function>,
    ) -> Result<JsValue, JsValue> {
        let (Ok(mut pipeline), Ok(mut store)) =
            (self.pipeline.try_borrow_mut(), self.store.try_borrow_mut())
        else {
            return Err(JsValue::from_str(BUSY));
        };

        let settings = settings_from_js(settings)?;
        let files = self
            .queue
            .try_borrow_mut()
            .map(|mut queue| std::mem::take(&mut *queue))
            .map_err(|_| JsValue::from_str(BUSY))?;

        let token = CancellationToken::new();
        self.cancellation.replace(token.clone());

        let outcome = pipeline.run(&files, &settings, &mut store).map(|run| {
            run.with_cancellation(token)
                .finish(|event| notify(on_progress.as_ref(), event))
        });

        match outcome {
            Ok(summary) => to_js(&summary),
            Err(e) => {
                error!("Batch failed: {}", e);
                self.queue.replace(files);
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }

    /// Stop the running batch before its next file.
    ///
    /// Only meaningful from inside an `onProgress` callback; files not yet
    /// started get no record.
    pub fn cancel(&self) {
        if let Ok(token) = self.cancellation.try_borrow() {
            token.cancel();
        }
    }

    /// All results in input order (see `RecordView`).
    pub fn records(&self) -> Result<JsValue, JsValue> {
        let store = self.store.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        to_js(&record_views(&store))
    }

    /// `{ completed, total }` for the current batch.
    pub fn progress(&self) -> Result<JsValue, JsValue> {
        let store = self.store.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        to_js(&store.progress())
    }

    /// Converted bytes of a successful record (copied into JS memory).
    pub fn output(&self, index: usize) -> Result<Vec<u8>, JsValue> {
        let store = self.store.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        let record = store
            .get(index)
            .ok_or_else(|| JsValue::from_str(&format!("No result at index {}", index)))?;
        record
            .output()
            .map(|output| output.bytes().to_vec())
            .ok_or_else(|| {
                JsValue::from_str(&format!(
                    "Cannot export {}: conversion failed",
                    record.original_name()
                ))
            })
    }

    /// Hand every successful result to `save(bytes, fileName)`, skipping
    /// failures. Returns how many were exported.
    pub fn export_all(&self, save: &Function) -> Result<usize, JsValue> {
        let store = self.store.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        Ok(store.export_all(&mut JsExporter::new(save)))
    }

    /// Hand one result to `save(bytes, fileName)`.
    ///
    /// # Errors
    /// Unknown index, or a record whose conversion failed.
    pub fn export_one(&self, index: usize, save: &Function) -> Result<(), JsValue> {
        let store = self.store.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        store
            .export_one(index, &mut JsExporter::new(save))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Release every converted buffer and reset progress.
    ///
    /// Returns the number of buffers released.
    pub fn clear(&self) -> Result<usize, JsValue> {
        let mut store = self
            .store
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str(BUSY))?;
        Ok(store.clear())
    }
}

fn notify(on_progress: Option<&Function>, event: &BatchEvent) {
    let Some(callback) = on_progress else {
        return;
    };

    let result = to_js(event).and_then(|value| callback.call1(&JsValue::NULL, &value));
    if let Err(e) = result {
        warn!("Progress callback failed: {}", js_error_message(&e));
    }
}
