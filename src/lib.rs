//! Resume Triage Service
//!
//! An HTTP service that accepts uploaded resume documents (PDF/image),
//! extracts their text, and either summarizes each document or selects the
//! best match for a job-requirement query, persisting an audit record per
//! request.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
