//! Data-access layer for the movie browser: schema entities, a repository
//! facade, request-scoped sessions and the one-shot CSV population routine.

pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod password;
pub mod populate;
pub mod repository;
pub mod services;
pub mod session;

pub use error::{AppError, AppResult};
pub use repository::Repository;
pub use session::RequestSession;
