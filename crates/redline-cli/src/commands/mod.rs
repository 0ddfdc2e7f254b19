//! Command implementations for the Redline CLI

pub mod apply;
pub mod diff;
pub mod extract;
