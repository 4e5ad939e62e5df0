//! Backend Access
//!
//! - **http**: [`ApiClient`], the authenticated request wrapper
//! - **request**: request/response values
//! - **upload**: streamed uploads with progress
//! - **error**: Error types

mod error;
mod http;
mod request;
mod upload;

pub use error::ClientError;
pub use http::{ApiClient, ClientConfig};
pub use request::{ApiRequest, ResponseBody, ResponseType};
pub use upload::{data_url, UploadRequest, UploadTask, UploadedFile, UPLOAD_PATH};

pub use reqwest::Method;
