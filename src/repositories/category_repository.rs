use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::entities::category::{ActiveModel as CategoryActiveModel, Column, Entity as Category};
use crate::entities::product;
use crate::errors::ServiceError;
use crate::models::CategoryRecord;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for categories referenced by products
#[derive(Debug)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a category
    #[instrument(skip(self, name))]
    pub async fn create(&self, name: impl Into<String>) -> Result<CategoryRecord, ServiceError> {
        let model = CategoryActiveModel {
            name: Set(name.into()),
            ..Default::default()
        }
        .insert(self.get_db())
        .await
        .map_err(ServiceError::from_write)?;

        info!(category_id = model.id, "Category created");
        Ok(model.into())
    }

    /// Find a category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, ServiceError> {
        let model = Category::find_by_id(id).one(self.get_db()).await?;
        Ok(model.map(CategoryRecord::from))
    }

    /// All categories ordered by name
    pub async fn find_all(&self) -> Result<Vec<CategoryRecord>, ServiceError> {
        let models = Category::find()
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?;
        Ok(models.into_iter().map(CategoryRecord::from).collect())
    }

    #[instrument(skip(self, name))]
    pub async fn rename(
        &self,
        id: i64,
        name: impl Into<String>,
    ) -> Result<CategoryRecord, ServiceError> {
        let existing = Category::find_by_id(id)
            .one(self.get_db())
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;

        let mut active: CategoryActiveModel = existing.into();
        active.name = Set(name.into());
        let updated = active
            .update(self.get_db())
            .await
            .map_err(ServiceError::from_write)?;
        Ok(updated.into())
    }

    /// Delete a category. Fails with `Conflict` while any product still
    /// points at it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let db = self.get_db();
        let existing = Category::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;

        let referencing = product::Entity::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(db)
            .await?;
        if referencing > 0 {
            return Err(ServiceError::Conflict(format!(
                "category {} is referenced by {} product(s)",
                id, referencing
            )));
        }

        existing
            .delete(db)
            .await
            .map_err(ServiceError::from_write)?;

        info!(category_id = id, "Category deleted");
        Ok(())
    }
}

impl Repository for CategoryRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
