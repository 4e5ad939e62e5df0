//! Request and response values

use super::ClientError;
use reqwest::Method;
use serde::Serialize;

/// How the response body should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// JSON, falling back to a JSON string when the body is not JSON
    #[default]
    Json,
    /// Raw bytes, for file downloads
    Bytes,
    /// Plain text
    Text,
}

/// A single call against the backend
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub response_type: ResponseType,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            response_type: ResponseType::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set the response type hint
    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }
}

/// Body of a successful response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    Text(String),
}

impl ResponseBody {
    /// Build a body from raw bytes according to the hint
    pub(crate) fn from_bytes(bytes: Vec<u8>, response_type: ResponseType) -> Self {
        match response_type {
            ResponseType::Bytes => ResponseBody::Bytes(bytes),
            ResponseType::Text => ResponseBody::Text(String::from_utf8_lossy(&bytes).into_owned()),
            ResponseType::Json => {
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    ResponseBody::Json(serde_json::Value::Null)
                } else {
                    match serde_json::from_slice(&bytes) {
                        Ok(value) => ResponseBody::Json(value),
                        Err(_) => ResponseBody::Json(serde_json::Value::String(
                            String::from_utf8_lossy(&bytes).into_owned(),
                        )),
                    }
                }
            }
        }
    }

    /// View the body as JSON
    pub fn into_json(self) -> serde_json::Value {
        match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => serde_json::Value::String(text),
            ResponseBody::Bytes(bytes) => {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }

    /// View the body as raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            ResponseBody::Bytes(bytes) => bytes,
            ResponseBody::Text(text) => text.into_bytes(),
            ResponseBody::Json(value) => value.to_string().into_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = ApiRequest::post("/url/shrink")
            .json(&serde_json::json!({"name": "docs", "url": "https://example.com"}))
            .unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/url/shrink");
        assert_eq!(request.body.unwrap()["name"], "docs");
        assert_eq!(request.response_type, ResponseType::Json);

        let request = ApiRequest::get("/get-file/42").response_type(ResponseType::Bytes);
        assert_eq!(request.response_type, ResponseType::Bytes);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_json_body_parsing() {
        let body = ResponseBody::from_bytes(br#"{"ok":true}"#.to_vec(), ResponseType::Json);
        assert_eq!(body, ResponseBody::Json(serde_json::json!({"ok": true})));

        let body = ResponseBody::from_bytes(b"deleted".to_vec(), ResponseType::Json);
        assert_eq!(body, ResponseBody::Json(serde_json::json!("deleted")));

        let body = ResponseBody::from_bytes(Vec::new(), ResponseType::Json);
        assert_eq!(body, ResponseBody::Json(serde_json::Value::Null));
    }

    #[test]
    fn test_bytes_are_untouched() {
        let raw = vec![0u8, 159, 146, 150];
        let body = ResponseBody::from_bytes(raw.clone(), ResponseType::Bytes);
        assert_eq!(body.into_bytes(), raw);
    }
}
