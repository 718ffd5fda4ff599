//! Infrastructure layer for Peerboost.
//!
//! Contains implementations of the ports defined in `peerboost-core`:
//! the JSON document store with atomic replace and corruption snapshotting,
//! plus configuration loading and data-directory resolution.

pub mod config;
pub mod json_store;
