//! Token issuing.

mod issuer;

pub use issuer::{issue, Claims};
