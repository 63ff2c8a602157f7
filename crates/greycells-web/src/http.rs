#![forbid(unsafe_code)]

//! `fetch` transport for [`ApiRequest`].

use greycells_core::api::{ApiRequest, ApiResponse, HttpOutcome};
use greycells_core::config::ApiEndpoints;
use greycells_core::error::SiteError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn transport(context: &str, err: &JsValue) -> SiteError {
    SiteError::Transport(format!("{context}: {err:?}"))
}

fn build(request: &ApiRequest, endpoints: &ApiEndpoints) -> Result<Request, SiteError> {
    let init = RequestInit::new();
    init.set_method(request.method().as_str());
    if let Some(body) = request.json_body()? {
        let headers = Headers::new().map_err(|err| transport("headers", &err))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|err| transport("headers", &err))?;
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));
    }
    Request::new_with_str_and_init(&request.url(endpoints), &init)
        .map_err(|err| transport("request", &err))
}

/// Send `request` and read the full response body.
///
/// Any status counts as a response; only failures to reach the server or
/// read the body are errors.
pub(crate) async fn send(request: &ApiRequest, endpoints: &ApiEndpoints) -> HttpOutcome {
    let window = web_sys::window().ok_or(SiteError::MissingElement("window"))?;
    let req = build(request, endpoints)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&req))
        .await
        .map_err(|err| transport("fetch", &err))?
        .dyn_into()
        .map_err(|err| transport("response", &err))?;
    let text = response.text().map_err(|err| transport("body", &err))?;
    let body = JsFuture::from(text)
        .await
        .map_err(|err| transport("body", &err))?
        .as_string()
        .unwrap_or_default();
    Ok(ApiResponse::new(response.status(), body))
}
