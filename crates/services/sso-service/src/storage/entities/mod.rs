//! SeaORM entities for the credential store.

pub mod app;
pub mod user;
