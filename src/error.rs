use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GreetingError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("dom call failed: {0}")]
    Dom(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<JsValue> for GreetingError {
    fn from(v: JsValue) -> Self {
        GreetingError::Dom(v.as_string().unwrap_or_else(|| format!("{v:?}")))
    }
}

impl From<GreetingError> for JsValue {
    fn from(e: GreetingError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
