//! Shared test utilities for orderdash integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Not every harness uses every helper.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod builders;
pub mod fake_source;
pub mod fixtures;

pub use builders::*;
pub use fake_source::*;
pub use fixtures::*;
