//! Persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the credential store contract the services depend on.
//! - Keep SQL details out of service/guard code.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Duplicate`) in
//!   addition to DB transport errors.

pub mod identity_repo;
