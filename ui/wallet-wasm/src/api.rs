//! Plain `fetch` helpers for static assets such as the contract artifact.

use crate::dom;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Fetch a URL and return the body as a plain string.
pub async fn fetch_text(url: &str) -> Result<String, String> {
    let opts = RequestInit::new();
    opts.set_method("GET");

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| format!("{:?}", e))?;

    let window = dom::window().map_err(|e| format!("{:?}", e))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch error: {:?}", e))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "not a Response".to_string())?;

    let text = JsFuture::from(resp.text().map_err(|e| format!("{:?}", e))?)
        .await
        .map_err(|e| format!("text error: {:?}", e))?;

    let text_str = text.as_string().unwrap_or_default();

    if !resp.ok() {
        return Err(format!("{} {}: {}", resp.status(), resp.status_text(), text_str));
    }

    Ok(text_str)
}
