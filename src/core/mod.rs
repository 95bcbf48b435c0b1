//! Core domain logic for patchtest
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Patch, PatchSeries, Verdict)
//! - `services/` - Branch inference, shared patterns and the rule engine
//! - `suites/` - Suite discovery and the built-in rule suites
//! - `ports/` - Trait definitions for the target repository
//! - `error` - Error enums for every failure domain

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
pub mod suites;
