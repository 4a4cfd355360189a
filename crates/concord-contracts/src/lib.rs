//! # concord-contracts
//!
//! Shared types and contracts for the CONCORD governance & trust core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod agent;
pub mod chain;
pub mod decision;
pub mod error;
pub mod human;
pub mod request;
pub mod signal;
