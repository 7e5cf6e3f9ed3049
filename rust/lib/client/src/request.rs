use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Whether a request carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    None,
    Bearer,
}

/// How a successful response body is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    /// Raw text, returned as a JSON string.
    Text,
}

/// Request payload.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    /// Sent without a caller-set Content-Type: the transport writes the
    /// boundary header itself.
    Multipart(MultipartBody),
}

/// One file attached to a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

/// Text fields and files of a multipart form.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(mime) = file.mime {
                part = part
                    .mime_str(&mime)
                    .map_err(|e| ApiError::InvalidRequest(format!("mime type {}: {}", mime, e)))?;
            }
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

/// A single REST call: built per action, never persisted.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the server root, e.g. `/api/locations/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
    pub auth: Auth,
    pub format: ResponseFormat,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            auth: Auth::Bearer,
            format: ResponseFormat::Json,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Send without the bearer token (login, registration, refresh).
    pub fn anonymous(mut self) -> Self {
        self.auth = Auth::None;
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("request body: {}", e)))?;
        self.body = Body::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = Body::Multipart(body);
        self
    }

    pub fn text_response(mut self) -> Self {
        self.format = ResponseFormat::Text;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_bearer_by_default() {
        let req = ApiRequest::get("/api/locations/");
        assert_eq!(req.auth, Auth::Bearer);
        assert_eq!(req.format, ResponseFormat::Json);
        assert!(matches!(req.body, Body::Empty));
        assert_eq!(ApiRequest::post("/api/auth/login/").anonymous().auth, Auth::None);
    }

    #[test]
    fn invalid_mime_is_rejected_before_sending() {
        let body = MultipartBody::new().file(FilePart {
            field: "images".into(),
            file_name: "a.png".into(),
            bytes: vec![1, 2, 3],
            mime: Some("not a mime".into()),
        });
        assert!(matches!(body.into_form(), Err(ApiError::InvalidRequest(_))));
    }
}
