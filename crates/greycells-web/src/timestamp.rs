#![forbid(unsafe_code)]

use greycells_core::contacts::TimestampFormatter;
use js_sys::Date;
use wasm_bindgen::JsValue;

/// Renders `submitted_at` with the visitor's locale via `Date.toLocaleString`.
///
/// Strings the JS `Date` parser rejects are shown verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleTimestampFormatter;

impl TimestampFormatter for LocaleTimestampFormatter {
    fn format_timestamp(&self, raw: &str) -> String {
        let date = Date::new(&JsValue::from_str(raw));
        if date.get_time().is_nan() {
            return raw.to_string();
        }
        date.to_locale_string("default", &JsValue::UNDEFINED).into()
    }
}
