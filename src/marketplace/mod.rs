//! Marketplace domain: profiles, job postings, applications, items, and the
//! access and lifecycle rules gating their mutation.
//!
//! Each store follows the same layout: `domain.rs` for records and
//! validation config, `repository.rs` for the persistence trait, `service.rs`
//! for the operations, and `router.rs` for the HTTP surface.

pub mod applications;
pub mod auth;
pub mod items;
pub mod jobs;
pub mod lifecycle;
pub mod profiles;
pub mod storage;
pub mod store;
