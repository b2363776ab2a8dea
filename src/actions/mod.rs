//! Action handlers — render canonical records as package-manager text.
//!
//! Each handler is a pure function of its records and options:
//! 1. `winget` renders one command line per record
//! 2. `manifest` renders the JSON manifest for the import action

pub mod manifest;
pub mod winget;
