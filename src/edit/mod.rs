//! Image editing module.

mod client;
mod editor;
mod encoder;
pub mod response;
mod types;

pub use client::{EditClient, EditClientBuilder, API_KEY_ENV_VARS, DEFAULT_BASE_URL, MODEL_ID};
pub use editor::{EditFailure, EditResult, ImageEditor, FAILURE_PREFIX};
pub use encoder::{encode_bytes, encode_file};
pub use types::{Accessory, EditRequest, EncodedImage, ImageFormat};
