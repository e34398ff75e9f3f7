//! HTTP surface: an axum router over the upload store and the analysis
//! pipeline, with multipart form extraction and JSON error bodies.

pub mod form;
pub mod response;
pub mod router;

pub use form::{UploadForm, UploadedImage};
pub use router::{AppState, create_router};
