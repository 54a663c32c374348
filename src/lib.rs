//! bookcat: an in-memory catalog of books keyed by name.
//!
//! The core is [`domain::OrderedCatalog`], an unbalanced binary search tree
//! supporting insert (rejecting duplicate names), exact-name lookup and
//! minimum lookup. Everything else loads records into it and presents them.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{BookRecord, OrderedCatalog, PublicationDate};
