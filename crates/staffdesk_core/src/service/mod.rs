//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate session acquisition and repository calls into the
//!   operations presentation code consumes.
//! - Keep front ends decoupled from storage details.

pub mod company_service;
