//! gRPC protocol buffer definitions.
//!
//! This crate contains the generated gRPC definitions for the SSO `Auth`
//! service: SignUp, SignIn and IsAdmin.

/// SSO service definitions.
pub mod sso {
    tonic::include_proto!("sso");
}

// Re-export commonly used items
pub use sso::auth_client::AuthClient;
pub use sso::auth_server::{Auth, AuthServer};
