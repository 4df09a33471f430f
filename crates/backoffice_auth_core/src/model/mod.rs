//! Domain model for back-office identities and roles.
//!
//! # Responsibility
//! - Define the employee identity shape shared by store and services.
//! - Define the closed role enumeration and its normalizer.
//!
//! # Invariants
//! - Raw role strings are interpreted only by `role::normalize`.

pub mod entity;
pub mod identity;
pub mod role;
