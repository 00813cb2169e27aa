#![deny(warnings)]

//! Core domain models and invariants for InvenSync.
//!
//! This crate defines the serializable entities tracked by the warehouse
//! simulation, the stock threshold classifier, the validated configuration
//! model and the fixed seed collections loaded at startup.

mod classify;
mod config;
mod model;
pub mod seed;

pub use classify::{classify, Thresholds};
pub use config::*;
pub use model::*;
