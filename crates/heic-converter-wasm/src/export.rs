//! Host export capability backed by a JavaScript function.
//!
//! The function receives `(bytes: Uint8Array, fileName: string)` and is
//! expected to trigger a download (object URL + anchor click) or write to a
//! file handle. Whatever it throws is logged and otherwise ignored.

use heic_converter_core::HostExporter;
use js_sys::{Function, Uint8Array};
use log::warn;
use wasm_bindgen::JsValue;

use crate::codec::js_error_message;

pub(crate) struct JsExporter<'a> {
    save: &'a Function,
}

impl<'a> JsExporter<'a> {
    pub(crate) fn new(save: &'a Function) -> Self {
        Self { save }
    }
}

impl HostExporter for JsExporter<'_> {
    fn export(&mut self, bytes: &[u8], suggested_name: &str) {
        let result = self.save.call2(
            &JsValue::NULL,
            &Uint8Array::from(bytes),
            &JsValue::from_str(suggested_name),
        );
        if let Err(e) = result {
            warn!("Export of {} failed: {}", suggested_name, js_error_message(&e));
        }
    }
}
