//! # Quill Core
//!
//! The domain layer of the Quill blog backend: entities, ports and the
//! services that enforce post, credential and upload rules.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
