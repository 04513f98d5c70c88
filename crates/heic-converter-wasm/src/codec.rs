//! Codec adapter backed by a JavaScript function.
//!
//! The HEIC decoder lives on the JS side (e.g. a synchronous wrapper around
//! libheif compiled to WASM). It is handed to the converter as a function
//!
//! ```typescript
//! (bytes: Uint8Array, quality: number, mimeType: string) => Uint8Array
//! ```
//!
//! that throws on failure. The thrown error's message becomes the item's
//! failure reason.

use heic_converter_core::{AdapterInitError, CodecAdapter, CodecError, Quality, TargetFormat};
use js_sys::{Function, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};

/// Reported when no usable converter function was supplied.
pub(crate) const LOAD_FAILURE: &str = "Failed to load converter";

pub(crate) struct JsCodec {
    convert: Option<Function>,
}

impl JsCodec {
    /// Wrap `value`; anything that is not callable fails at `ready()`.
    pub(crate) fn new(value: JsValue) -> Self {
        Self {
            convert: value.dyn_into::<Function>().ok(),
        }
    }

    #[cfg(test)]
    fn missing() -> Self {
        Self { convert: None }
    }
}

impl CodecAdapter for JsCodec {
    fn ready(&mut self) -> Result<(), AdapterInitError> {
        match self.convert {
            Some(_) => Ok(()),
            None => Err(AdapterInitError::new(LOAD_FAILURE)),
        }
    }

    fn decode_and_encode(
        &self,
        source: &[u8],
        quality: Quality,
        target: TargetFormat,
    ) -> Result<Vec<u8>, CodecError> {
        let convert = self
            .convert
            .as_ref()
            .ok_or_else(|| CodecError::new(LOAD_FAILURE))?;

        let output = convert
            .call3(
                &JsValue::NULL,
                &Uint8Array::from(source),
                &JsValue::from_f64(f64::from(quality.value())),
                &JsValue::from_str(target.mime_type()),
            )
            .map_err(|e| CodecError::new(js_error_message(&e)))?;

        output
            .dyn_into::<Uint8Array>()
            .map(|bytes| bytes.to_vec())
            .map_err(|_| CodecError::new("Converter did not return a Uint8Array"))
    }
}

/// Best-effort message for a thrown JS value.
pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string()
        .unwrap_or_else(|| "Unknown converter error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_converter_fails_ready() {
        let mut codec = JsCodec::missing();
        assert_eq!(codec.ready(), Err(AdapterInitError::new(LOAD_FAILURE)));
    }

    #[test]
    fn test_missing_converter_fails_items() {
        let codec = JsCodec::missing();
        let err = codec
            .decode_and_encode(&[1, 2, 3], Quality::DEFAULT, TargetFormat::Jpeg)
            .unwrap_err();
        assert_eq!(err.to_string(), LOAD_FAILURE);
    }
}
