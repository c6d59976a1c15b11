mod crypto;
mod db;
mod extractor;

pub use crypto::{hash_password, verify_password};
pub use db::{create_session, delete_session, IssuedSession};
pub use extractor::{bearer_token, AuthError, AuthUser};
