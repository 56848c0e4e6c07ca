//! Tabit - BEAM-inspired concurrent tuple storage for Rust.
//!
//! Tabit provides process-local tables of fixed-arity records keyed by one
//! tuple position, with ordered and unordered variants, duplicate-key and
//! duplicate-record variants, pattern matching with resumable cursors, and
//! ownership hand-off between concurrent actors.
//!
//! # Quick Start
//!
//! ```no_run
//! use tabit::actor::Actor;
//! use tabit::record;
//! use tabit::tables::Set;
//! use tabit::tables::SetOptions;
//!
//! #[tokio::main]
//! async fn main() {
//!   Actor::run(async {
//!     let set: Set = Set::create_or_raise(SetOptions::default());
//!
//!     set.insert_or_raise(record!["ada", 36]);
//!
//!     assert!(set.member_or_raise("ada"));
//!   })
//!   .await;
//! }
//! ```
//!
//! # Core Modules
//!
//! - [`tables`]: Table handles and typed facades (`Set`, `Bag`, `KeyValueSet`)
//! - [`select`]: Match patterns, guarded match specs, and continuations
//! - [`actor`]: Actor identity, liveness, and ownership transfer inboxes
//! - [`lang`]: Core value types (atoms, terms, records)
//! - [`core`]: Table layouts, options, and metadata
//! - [`error`]: Error taxonomy and the exception system

mod ops;

pub mod actor;
pub mod consts;
pub mod core;
pub mod error;
pub mod lang;
pub mod select;
pub mod tables;
