//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate guard, policy and credential store calls into login,
//!   registration and employee administration use-cases.
//! - Keep transport layers decoupled from storage details.

pub mod auth_service;
pub mod employee_service;

/// Form that can be shown again after a failed submission.
pub trait Redisplayable {
    /// Copy with passwords and other secrets blanked.
    fn without_secrets(&self) -> Self;
}
