//! SeaORM entities for the product schema.
//!
//! Table and column names follow the existing `tb_*` schema; Rust field names
//! are English and mapped through `column_name`.

pub mod category;
pub mod product;
pub mod product_supplier;
pub mod stock;
pub mod supplier;

pub use category::{Entity as Category, Model as CategoryModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use product_supplier::{Entity as ProductSupplier, Model as ProductSupplierModel};
pub use stock::{Entity as Stock, Model as StockModel};
pub use supplier::{Entity as Supplier, Model as SupplierModel};
