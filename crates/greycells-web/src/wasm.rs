#![forbid(unsafe_code)]

use std::rc::Rc;

use greycells_core::api::ContactId;
use greycells_core::config::SiteConfig;
use greycells_core::error::SiteError;
use greycells_core::site::Msg;
use wasm_bindgen::prelude::*;

use crate::logging;
use crate::runtime::SiteRuntime;

fn js_error(err: &SiteError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Parse the optional `init` options object. `undefined`/`null` mean defaults.
fn parse_options(options: Option<JsValue>) -> Result<SiteConfig, JsValue> {
    let Some(options) = options.filter(|o| !o.is_undefined() && !o.is_null()) else {
        return Ok(SiteConfig::default());
    };
    let json: String = js_sys::JSON::stringify(&options)?.into();
    SiteConfig::from_json(&json).map_err(|err| js_error(&SiteError::Config(err)))
}

/// JS handle for the site controller.
///
/// ```js
/// const site = new GreyCellsSite();
/// site.init({ carousel: { auto_advance_ms: 8000 } });
/// ```
#[wasm_bindgen]
pub struct GreyCellsSite {
    runtime: Option<Rc<SiteRuntime>>,
}

#[wasm_bindgen]
impl GreyCellsSite {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Wire the controller to the current document.
    ///
    /// `options` is a partial config object merged over the defaults. Fails
    /// when a required element is missing or the options are invalid.
    /// Calling `init` again replaces the previous wiring.
    pub fn init(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        let config = parse_options(options)?;
        logging::install(config.log_level);
        if let Some(previous) = self.runtime.take() {
            previous.destroy();
        }
        let runtime = SiteRuntime::start(config).map_err(|err| {
            tracing::error!(error = %err, "site controller failed to start");
            js_error(&err)
        })?;
        self.runtime = Some(runtime);
        Ok(())
    }

    /// Ask for confirmation, then delete contact `id`.
    #[wasm_bindgen(js_name = deleteContact)]
    pub fn delete_contact(&self, id: f64) -> Result<(), JsValue> {
        if !id.is_finite() || id.fract() != 0.0 {
            return Err(js_sys::Error::new("contact id must be an integer").into());
        }
        self.dispatch(Msg::DeleteRequested(ContactId(id as i64)))
    }

    /// Re-fetch the contacts list.
    #[wasm_bindgen(js_name = refreshContacts)]
    pub fn refresh_contacts(&self) -> Result<(), JsValue> {
        self.dispatch(Msg::RefreshContacts)
    }

    /// Explicit teardown for JS callers. Removes every listener, observer
    /// and pending timer.
    pub fn destroy(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.destroy();
        }
    }
}

impl GreyCellsSite {
    fn dispatch(&self, msg: Msg) -> Result<(), JsValue> {
        let runtime = self.runtime.as_ref().ok_or_else(|| {
            JsValue::from(js_sys::Error::new("site controller is not initialized"))
        })?;
        runtime.dispatch(msg);
        Ok(())
    }
}
