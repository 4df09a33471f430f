//! Authorization building blocks.
//!
//! # Responsibility
//! - Permission matrix and action keywords.
//! - Password policy and hashing.
//! - The guard composing role, matrix and session into decisions.

pub mod guard;
pub mod hashing;
pub mod password_policy;
pub mod permission;
