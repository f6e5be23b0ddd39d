//! Backend core for the freelance marketplace: profiles, job postings,
//! applications with a guarded lifecycle, and a secondary items marketplace.
//!
//! Persistence, identity, object storage, and email delivery are external
//! collaborators abstracted behind traits so the service layer can be
//! exercised against in-memory implementations.

pub mod config;
pub mod error;
pub mod infra;
pub mod marketplace;
pub mod telemetry;
