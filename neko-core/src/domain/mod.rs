//! Core domain types
//!
//! The structures in this module are shared between the server (which owns
//! and mutates them) and the client side (which only reads them back from the
//! API).

pub mod audio;
pub mod history;
pub mod job;
