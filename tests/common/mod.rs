#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use stock_control_api::{
    db::{self, DbConfig},
    CategoryRecord, CategoryRef, CategoryRepository, ProductRecord, ProductRepository,
    StockRecord, SupplierRecord, SupplierRepository,
};

/// Repositories over a fresh in-memory SQLite database with the schema applied.
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub suppliers: SupplierRepository,
}

impl TestDb {
    pub async fn new() -> Self {
        // one connection: every sqlite::memory: connection is its own database
        let pool = db::establish_connection_with_config(&DbConfig::single_connection(
            "sqlite::memory:",
        ))
        .await
        .expect("failed to open in-memory database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db = Arc::new(pool);
        Self {
            products: ProductRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            suppliers: SupplierRepository::new(db.clone()),
            db,
        }
    }

    pub async fn category(&self, name: &str) -> CategoryRecord {
        self.categories
            .create(name)
            .await
            .expect("failed to create category")
    }

    pub async fn supplier(&self, name: &str) -> SupplierRecord {
        self.suppliers
            .create(name)
            .await
            .expect("failed to create supplier")
    }

    /// Saves a product with the given stock and suppliers and returns it.
    pub async fn product(
        &self,
        name: &str,
        price: Decimal,
        quantity: Option<i32>,
        category: &CategoryRecord,
        suppliers: &[SupplierRecord],
    ) -> ProductRecord {
        let mut record = ProductRecord::new(
            name,
            price,
            quantity.map(StockRecord::new),
            CategoryRef::unloaded(category.id),
            suppliers.iter().cloned().collect::<BTreeSet<_>>(),
        );
        self.products
            .save(&mut record)
            .await
            .expect("failed to save product");
        record
    }
}
