// Main library entry point for Calltrail.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;
