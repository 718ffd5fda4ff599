//! Shared domain types for Peerboost.
//!
//! This crate contains the core domain types used across the Peerboost
//! engine: users, posts, session states, the persisted document, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod document;
pub mod error;
pub mod post;
pub mod session;
pub mod user;
