pub mod access;

pub use access::{AuthRejection, BEARER_PREFIX, authenticate, protect};
