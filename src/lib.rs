//! Stock Control persistence library
//!
//! Maps the `Product` aggregate onto its relational tables: an owned stock
//! row, a lazily resolved category and a supplier set kept in a join table.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod mapping;
pub mod migrator;
pub mod models;
pub mod repositories;

pub use errors::ServiceError;
pub use models::{
    CategoryRecord, CategoryRef, Keyed, LazyRef, ProductRecord, StockRecord, SupplierRecord,
};
pub use repositories::{CategoryRepository, ProductRepository, SupplierRepository};
