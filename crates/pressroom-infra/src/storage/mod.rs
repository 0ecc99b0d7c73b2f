//! Media storage implementations.

mod local;

pub use local::{ALLOWED_IMAGE_TYPES, LocalMediaStorage, UploadConfig};
