//! Application layer
//!
//! Use cases turn raw commands into validated domain calls and shape the
//! results into view models for the HTTP adapter.

pub mod auth;
pub mod company;
mod fields;
pub mod invoice;
pub mod views;
