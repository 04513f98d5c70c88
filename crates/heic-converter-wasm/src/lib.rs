//! HEIC Converter WASM - WebAssembly bindings for the HEIC batch converter
//!
//! This crate exposes `heic-converter-core` to the browser. The HEIC decoder
//! itself stays on the JavaScript side and is passed in as a function; this
//! crate sequences the batch, resizes, keeps the results and hands them back
//! for download.
//!
//! # Module Structure
//!
//! - `converter` - `BatchConverter`, the stateful batch API
//! - `codec` - Adapts a JS codec function to the core codec boundary
//! - `export` - Adapts a JS save function to the core export boundary
//! - `types` - Plain-object views of records and settings
//! - `logger` - Routes `log` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { BatchConverter, set_log_level } from '@heic-converter/wasm';
//!
//! await init();
//! set_log_level('debug');
//!
//! const converter = new BatchConverter(convertHeic);
//! converter.queue(file.name, new Uint8Array(await file.arrayBuffer()));
//! const summary = converter.convert({ quality: 0.8, maxWidth: 'original' });
//! console.log(`${summary.succeeded}/${summary.total} converted`);
//! ```

use heic_converter_core::MaxWidth;
use log::LevelFilter;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod codec;
mod converter;
mod export;
mod logger;
mod types;

pub use converter::BatchConverter;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(LevelFilter::Info);
}

/// Change console log verbosity: "off", "error", "warn", "info", "debug"
/// or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = logger::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    logger::install(filter);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Serialize)]
struct WidthPreset {
    value: u32,
    label: &'static str,
}

/// Maximum-width choices for the settings panel, widest first.
///
/// Returns `Array<{ value: number, label: string }>`; "original" is implied.
#[wasm_bindgen]
pub fn max_width_presets() -> Result<JsValue, JsValue> {
    types::to_js(&width_presets())
}

fn width_presets() -> Vec<WidthPreset> {
    MaxWidth::PRESETS
        .iter()
        .map(|&(value, label)| WidthPreset { value, label })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_width_presets_order() {
        let presets = width_presets();
        assert_eq!(presets.len(), 4);
        assert_eq!(presets[0].value, 3840);
        assert_eq!(presets[3].label, "Web Optimized");
        assert!(presets.windows(2).all(|w| w[0].value > w[1].value));
    }
}
