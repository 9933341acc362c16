//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep the embedding API layer decoupled from storage details.

pub mod crm_service;
