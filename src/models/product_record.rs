use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reference::{Keyed, LazyRef};
use crate::entities::{category, stock, supplier};

/// Stock record owned by a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// `None` until the repository has written the row
    pub id: Option<i64>,
    pub quantity: i32,
}

impl StockRecord {
    pub fn new(quantity: i32) -> Self {
        Self { id: None, quantity }
    }
}

impl From<stock::Model> for StockRecord {
    fn from(model: stock::Model) -> Self {
        Self {
            id: Some(model.id),
            quantity: model.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

impl From<category::Model> for CategoryRecord {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl Keyed for CategoryRecord {
    fn key(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub id: i64,
    pub name: String,
}

impl From<supplier::Model> for SupplierRecord {
    fn from(model: supplier::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Required category of a product, resolved on request.
pub type CategoryRef = LazyRef<CategoryRecord>;

/// A product as seen by callers of the repositories.
///
/// Setters replace the field unconditionally; nothing here checks price
/// sign, name contents or whether the category exists. Those constraints
/// belong to the storage layer and are enforced when the record is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    id: Option<i64>,
    name: String,
    price: Decimal,
    stock: Option<StockRecord>,
    category: CategoryRef,
    suppliers: BTreeSet<SupplierRecord>,
}

impl ProductRecord {
    /// Creates an unsaved record; the id is assigned on first save.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        stock: Option<StockRecord>,
        category: CategoryRef,
        suppliers: BTreeSet<SupplierRecord>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            stock,
            category,
            suppliers,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.price = price;
    }

    pub fn stock(&self) -> Option<&StockRecord> {
        self.stock.as_ref()
    }

    pub fn stock_mut(&mut self) -> Option<&mut StockRecord> {
        self.stock.as_mut()
    }

    /// Replacing or clearing the stock removes the previous stock row on the
    /// next save.
    pub fn set_stock(&mut self, stock: Option<StockRecord>) {
        self.stock = stock;
    }

    pub fn category(&self) -> &CategoryRef {
        &self.category
    }

    pub fn category_mut(&mut self) -> &mut CategoryRef {
        &mut self.category
    }

    pub fn set_category(&mut self, category: CategoryRef) {
        self.category = category;
    }

    pub fn suppliers(&self) -> &BTreeSet<SupplierRecord> {
        &self.suppliers
    }

    pub fn set_suppliers(&mut self, suppliers: BTreeSet<SupplierRecord>) {
        self.suppliers = suppliers;
    }

    pub(crate) fn supplier_ids(&self) -> BTreeSet<i64> {
        self.suppliers.iter().map(|s| s.id).collect()
    }
}
