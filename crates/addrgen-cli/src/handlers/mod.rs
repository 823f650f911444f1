//! Command handlers.
//!
//! Each handler turns parsed arguments into settings, calls into the
//! runtime or web adapter and reports the result.

pub mod countries;
pub mod web;
