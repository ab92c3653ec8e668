use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::JoinType;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::entities::product_supplier;
use crate::entities::supplier::{ActiveModel as SupplierActiveModel, Column, Entity as Supplier};
use crate::errors::ServiceError;
use crate::models::SupplierRecord;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for suppliers. Suppliers exist independently of products; a
/// product only ever writes the join rows that point at them.
#[derive(Debug)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    #[instrument(skip(self, name))]
    pub async fn create(&self, name: impl Into<String>) -> Result<SupplierRecord, ServiceError> {
        let model = SupplierActiveModel {
            name: Set(name.into()),
            ..Default::default()
        }
        .insert(self.get_db())
        .await
        .map_err(ServiceError::from_write)?;

        info!(supplier_id = model.id, "Supplier created");
        Ok(model.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<SupplierRecord>, ServiceError> {
        let model = Supplier::find_by_id(id).one(self.get_db()).await?;
        Ok(model.map(SupplierRecord::from))
    }

    pub async fn find_all(&self) -> Result<Vec<SupplierRecord>, ServiceError> {
        let models = Supplier::find()
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?;
        Ok(models.into_iter().map(SupplierRecord::from).collect())
    }

    /// Suppliers associated with a product, ordered by id
    pub async fn find_by_product(
        &self,
        product_id: i64,
    ) -> Result<Vec<SupplierRecord>, ServiceError> {
        let models = Supplier::find()
            .join(
                JoinType::InnerJoin,
                crate::entities::supplier::Relation::ProductSuppliers.def(),
            )
            .filter(product_supplier::Column::ProductId.eq(product_id))
            .order_by_asc(Column::Id)
            .all(self.get_db())
            .await?;
        Ok(models.into_iter().map(SupplierRecord::from).collect())
    }

    #[instrument(skip(self, name))]
    pub async fn rename(
        &self,
        id: i64,
        name: impl Into<String>,
    ) -> Result<SupplierRecord, ServiceError> {
        let existing = Supplier::find_by_id(id)
            .one(self.get_db())
            .await?
            .ok_or_else(|| ServiceError::not_found("Supplier", id))?;

        let mut active: SupplierActiveModel = existing.into();
        active.name = Set(name.into());
        let updated = active
            .update(self.get_db())
            .await
            .map_err(ServiceError::from_write)?;
        Ok(updated.into())
    }

    /// Delete a supplier along with its association rows. Products that
    /// referenced it are left in place.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.get_db().begin().await?;

        let existing = match Supplier::find_by_id(id).one(&txn).await? {
            Some(model) => model,
            None => {
                txn.rollback().await?;
                return Err(ServiceError::not_found("Supplier", id));
            }
        };

        let unlinked = product_supplier::Entity::delete_many()
            .filter(product_supplier::Column::SupplierId.eq(id))
            .exec(&txn)
            .await?;
        debug!(rows = unlinked.rows_affected, "Removed supplier associations");

        existing.delete(&txn).await?;
        txn.commit().await?;

        info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }
}

impl Repository for SupplierRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
