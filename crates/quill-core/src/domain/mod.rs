//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{Page, PageInfo, PageRequest, PostFilter};
pub use post::{
    Author, AuthorPatch, EXCERPT_MAX_CHARS, Localized, LocalizedPatch, NewPost, PLACEHOLDER_IMAGE,
    Post, PostUpdate, TITLE_MAX_CHARS, normalize_slug,
};
pub use user::{PASSWORD_MIN_CHARS, USERNAME_CHARS, User};
