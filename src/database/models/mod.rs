pub mod document;
pub mod user;

pub use document::{Document, DocumentEntity};
pub use user::{NewUser, Role, User, UserEntity};
