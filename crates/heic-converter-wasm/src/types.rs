//! JavaScript-facing views of core types.
//!
//! These are plain serde structs handed across the boundary with
//! `serde_wasm_bindgen`, so the UI receives ordinary objects rather than
//! wrapped handles. Converted bytes are never part of a view; they are
//! fetched on demand with `BatchConverter.output(index)`.

use heic_converter_core::{ConversionSettings, ResultRecord, ResultStore};
use serde::Serialize;
use wasm_bindgen::JsValue;

/// One row of the results list.
///
/// ```typescript
/// interface RecordView {
///   index: number;
///   originalName: string;
///   status: 'success' | 'error';
///   outputName?: string;
///   sizeBytes?: number;
///   sizeLabel?: string;   // "1.37 MB"
///   error?: string;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordView {
    pub index: usize,
    pub original_name: String,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RecordStatus {
    Success,
    Error,
}

impl RecordView {
    pub(crate) fn new(index: usize, record: &ResultRecord) -> Self {
        let status = if record.is_success() {
            RecordStatus::Success
        } else {
            RecordStatus::Error
        };

        RecordView {
            index,
            original_name: record.original_name().to_string(),
            status,
            output_name: record.output_name(),
            size_bytes: record.output().map(|output| output.len()),
            size_label: record.size_label(),
            error: record.reason().map(str::to_string),
        }
    }
}

/// Views for every record in the store, in input order.
pub(crate) fn record_views(store: &ResultStore) -> Vec<RecordView> {
    store
        .all()
        .iter()
        .enumerate()
        .map(|(index, record)| RecordView::new(index, record))
        .collect()
}

/// Read settings sent by the UI. `undefined` / `null` mean "all defaults".
pub(crate) fn settings_from_js(value: JsValue) -> Result<ConversionSettings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(ConversionSettings::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))
}

/// Serialize a view for JavaScript.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
