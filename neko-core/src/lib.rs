//! Neko Core
//!
//! Core types shared by the Neko download server, client and CLI.
//!
//! This crate contains:
//! - Domain types: Jobs, their lifecycle states and history snapshots
//! - DTOs: Request and response bodies of the HTTP API

pub mod domain;
pub mod dto;
