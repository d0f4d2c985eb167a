//! Core types and the in-memory lead store for closewise.
//!
//! This crate is free of terminal and I/O dependencies. The presentation
//! layer (`closewise-cli`) renders the store's state and forwards edits back
//! through [`store::LeadStore`] or its reducer entry point
//! [`store::LeadStore::dispatch`].

pub mod clock;
pub mod error;
pub mod lead;
pub mod reminder;
pub mod store;

pub use error::{Error, Result};
