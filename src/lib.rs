//! Bookstore back-office API
//!
//! Books and customers, each validated server-side before it is persisted,
//! exposed over HTTP as JSON.

pub mod bootstrap;
pub mod error;
pub mod modules;

pub use bootstrap::{build_app, build_registry, migrate, run};
pub use error::{FieldError, RepositoryError, ServiceError};
