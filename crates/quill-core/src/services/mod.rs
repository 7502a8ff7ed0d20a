//! Application services - the rules applied on top of the ports.

mod auth;
mod posts;
mod uploads;

#[cfg(test)]
pub(crate) mod fakes;

pub use auth::{AuthService, LoginOutcome};
pub use posts::{PostService, SLUG_TAKEN};
pub use uploads::{
    ALLOWED_EXTENSIONS, ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES, ServedFile, StoredUpload,
    UploadService, content_type_for,
};
