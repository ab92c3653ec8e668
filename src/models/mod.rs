//! In-memory records handed to and from the repositories.

pub mod price;
pub mod product_record;
pub mod reference;

pub use product_record::{
    CategoryRecord, CategoryRef, ProductRecord, StockRecord, SupplierRecord,
};
pub use reference::{Keyed, LazyRef};
