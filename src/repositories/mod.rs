use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::db::DatabaseAccess;

pub mod category_repository;
pub mod product_repository;
pub mod supplier_repository;

pub use category_repository::CategoryRepository;
pub use product_repository::ProductRepository;
pub use supplier_repository::SupplierRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    access: DatabaseAccess,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            access: DatabaseAccess::new(db),
        }
    }

    /// Timed, logged access to the pool
    pub fn access(&self) -> &DatabaseAccess {
        &self.access
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.access.get_pool()
    }
}
