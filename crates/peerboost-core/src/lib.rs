//! Business logic and port definitions for Peerboost.
//!
//! This crate holds the post registry, the per-user session state machine,
//! and the "ports" (store and subscription-oracle traits) that the
//! infrastructure layer implements. It depends only on `peerboost-types` --
//! never on `peerboost-infra` or any IO crate.

pub mod engine;
pub mod registry;
pub mod store;
pub mod subscription;
pub mod validate;
