//! Row structs for the fixed job-submission schema.
//!
//! Each struct is decoded once per row with `FromRow`; column names are
//! fixed at compile time.

pub mod institution;
pub mod parameter;
pub mod security;
