//! voxnote - voice notes core
//!
//! Speech goes in through a streaming transcription session, accumulated
//! transcript text comes out as per-user notes in a document store.
//! Ports-and-adapters layout: `ports` holds the collaborator contracts,
//! `adapters` the concrete implementations, `controllers` the two state
//! machines that make up the application.

pub mod adapters;
pub mod controllers;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;
