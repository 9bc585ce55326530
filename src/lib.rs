//! Global network information model.
//!
//! Parses the network document published by the cloud controller into a
//! [`NetworkModel`], validates it, answers relational queries over it,
//! detects what changed between two snapshots and compiles security rules
//! into packet-filter match expressions.
//!
//! - [`builder`] - Document to model
//! - [`query`] - Relations, lookups and self identification
//! - [`validate`] - Fail-fast validator
//! - [`diff`] - Snapshot differ
//! - [`rules`] - Rule compiler
//! - [`slot`] - Last-known-good model slot
//! - [`output`] - Trace dump, terminal summary and JSON snapshots

pub mod builder;
pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod models;
pub mod output;
pub mod query;
pub mod rules;
pub mod slot;
pub mod validate;

pub use builder::{populate, populate_with_hostnames, PopulateMode};
pub use config::Config;
pub use document::{DocumentQuery, ParseContext, XmlDocument};
pub use error::{GniError, Result};
pub use models::NetworkModel;
pub use slot::ModelSlot;
pub use validate::validate;
