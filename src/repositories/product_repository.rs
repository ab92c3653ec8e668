use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::entities::{category, product, product_supplier, stock, supplier};
use crate::errors::ServiceError;
use crate::mapping::{self, product_mapping, EntityMapping, RelationMapping};
use crate::models::{
    price, CategoryRecord, CategoryRef, ProductRecord, StockRecord, SupplierRecord,
};
use crate::repositories::Repository;

use super::BaseRepository;

/// Persists [`ProductRecord`]s together with their stock row and supplier
/// associations.
///
/// Cascade, orphan-removal and fetch behaviour come from
/// [`product_mapping`]; every save and delete runs in one transaction.
#[derive(Debug)]
pub struct ProductRepository {
    base: BaseRepository,
    mapping: EntityMapping,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
            mapping: product_mapping(),
        }
    }

    pub fn mapping(&self) -> &EntityMapping {
        &self.mapping
    }

    fn relation(&self, name: &str) -> Result<&RelationMapping, ServiceError> {
        self.mapping.relation(name).ok_or_else(|| {
            ServiceError::InternalError(format!("relation '{}' missing from product mapping", name))
        })
    }

    /// Inserts or updates the record.
    ///
    /// On success a new record receives its id, a newly written stock row
    /// its id, and the price is replaced by the stored two-place value. On
    /// failure the record is left untouched.
    #[instrument(skip(self, record), fields(product_id = ?record.id()))]
    pub async fn save(&self, record: &mut ProductRecord) -> Result<(), ServiceError> {
        let txn = self.get_db().begin().await?;
        let mut staged = record.clone();

        match self.save_in(&txn, &mut staged).await {
            Ok(()) => {
                txn.commit().await?;
                info!(product_id = ?staged.id(), "Product saved");
                *record = staged;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Product save rolled back");
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    async fn save_in(
        &self,
        txn: &DatabaseTransaction,
        record: &mut ProductRecord,
    ) -> Result<(), ServiceError> {
        let category_id = record.category().id();
        if category::Entity::find_by_id(category_id)
            .one(txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::not_found("Category", category_id));
        }

        let price_cents = price::to_cents(record.price()).ok_or_else(|| {
            ServiceError::InvalidInput(format!("price {} is out of range", record.price()))
        })?;

        let product_id = match record.id() {
            None => {
                let inserted = product::ActiveModel {
                    name: Set(record.name().to_owned()),
                    price_cents: Set(price_cents),
                    category_id: Set(category_id),
                    ..Default::default()
                }
                .insert(txn)
                .await
                .map_err(ServiceError::from_write)?;
                debug!(product_id = inserted.id, "Inserted product row");
                record.set_id(Some(inserted.id));
                inserted.id
            }
            Some(id) => {
                let existing = product::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Product", id))?;
                let mut active: product::ActiveModel = existing.into();
                active.name = Set(record.name().to_owned());
                active.price_cents = Set(price_cents);
                active.category_id = Set(category_id);
                active.update(txn).await.map_err(ServiceError::from_write)?;
                id
            }
        };

        record.set_price(price::from_cents(price_cents));

        self.sync_stock(txn, product_id, record).await?;
        self.sync_suppliers(txn, product_id, record).await?;
        Ok(())
    }

    /// Brings the stock table in line with the record: the previous row is
    /// removed when the record dropped or replaced it, and the record's
    /// stock is written when present.
    async fn sync_stock(
        &self,
        txn: &DatabaseTransaction,
        product_id: i64,
        record: &mut ProductRecord,
    ) -> Result<(), ServiceError> {
        let relation = self.relation(mapping::STOCK)?;
        let orphan_removal = relation.orphan_removal;
        let cascade = relation.cascade;

        let existing = stock::Entity::find()
            .filter(stock::Column::ProductId.eq(product_id))
            .one(txn)
            .await?;

        match (existing, record.stock_mut()) {
            (None, None) => {}
            (Some(old), None) => {
                if orphan_removal {
                    debug!(stock_id = old.id, "Removing orphaned stock row");
                    old.delete(txn).await?;
                }
            }
            (Some(old), Some(current)) if current.id == Some(old.id) => {
                if cascade.merge && old.quantity != current.quantity {
                    let mut active: stock::ActiveModel = old.into();
                    active.quantity = Set(current.quantity);
                    active.update(txn).await.map_err(ServiceError::from_write)?;
                }
            }
            (old, Some(current)) => {
                if let Some(old) = old {
                    if !orphan_removal {
                        return Err(ServiceError::Conflict(format!(
                            "product {} already owns stock row {}",
                            product_id, old.id
                        )));
                    }
                    debug!(stock_id = old.id, "Removing replaced stock row");
                    old.delete(txn).await?;
                }
                if cascade.persist {
                    let inserted = stock::ActiveModel {
                        product_id: Set(product_id),
                        quantity: Set(current.quantity),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::from_write)?;
                    current.id = Some(inserted.id);
                }
            }
        }

        Ok(())
    }

    /// Rewrites the join rows so they match the record's supplier set.
    /// Supplier rows themselves are never written.
    async fn sync_suppliers(
        &self,
        txn: &DatabaseTransaction,
        product_id: i64,
        record: &ProductRecord,
    ) -> Result<(), ServiceError> {
        let wanted = record.supplier_ids();
        let current: BTreeSet<i64> = product_supplier::Entity::find()
            .filter(product_supplier::Column::ProductId.eq(product_id))
            .all(txn)
            .await?
            .into_iter()
            .map(|row| row.supplier_id)
            .collect();

        let removed: Vec<i64> = current.difference(&wanted).copied().collect();
        if !removed.is_empty() {
            product_supplier::Entity::delete_many()
                .filter(product_supplier::Column::ProductId.eq(product_id))
                .filter(product_supplier::Column::SupplierId.is_in(removed))
                .exec(txn)
                .await?;
        }

        let added: Vec<i64> = wanted.difference(&current).copied().collect();
        if added.is_empty() {
            return Ok(());
        }

        let known: BTreeSet<i64> = supplier::Entity::find()
            .filter(supplier::Column::Id.is_in(added.clone()))
            .all(txn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if let Some(missing) = added.iter().find(|id| !known.contains(id)) {
            return Err(ServiceError::not_found("Supplier", *missing));
        }

        product_supplier::Entity::insert_many(added.into_iter().map(|supplier_id| {
            product_supplier::ActiveModel {
                product_id: Set(product_id),
                supplier_id: Set(supplier_id),
            }
        }))
        .exec_without_returning(txn)
        .await
        .map_err(ServiceError::from_write)?;

        Ok(())
    }

    /// Loads a product with its stock and suppliers. The category comes back
    /// as an unresolved reference when the mapping marks it lazy.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ProductRecord>, ServiceError> {
        self.base
            .access()
            .execute("product.find_by_id", |db| async move {
                match product::Entity::find_by_id(id).one(db).await? {
                    Some(model) => self.load_record(db, model).await.map(Some),
                    None => Ok(None),
                }
            })
            .await
    }

    /// Resolves the record's category on request and caches it on the
    /// reference. A reference that is already loaded is returned as is.
    #[instrument(skip(self, record), fields(product_id = ?record.id()))]
    pub async fn resolve_category<'r>(
        &self,
        record: &'r mut ProductRecord,
    ) -> Result<&'r CategoryRecord, ServiceError> {
        if !record.category().is_loaded() {
            let category_id = record.category().id();
            let model = category::Entity::find_by_id(category_id)
                .one(self.get_db())
                .await?
                .ok_or_else(|| ServiceError::not_found("Category", category_id))?;
            debug!(category_id, "Resolved lazy category reference");
            record.category_mut().fill(CategoryRecord::from(model));
        }

        record.category().get().ok_or_else(|| {
            ServiceError::InternalError("category reference left unresolved".to_string())
        })
    }

    /// Lists products ordered by id. Pages are 1-based.
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<ProductRecord>, u64), ServiceError> {
        if page == 0 || page_size == 0 {
            return Err(ServiceError::InvalidInput(
                "page and page_size must be at least 1".to_string(),
            ));
        }

        let db = self.get_db();
        let paginator = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .paginate(db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page - 1).await?;

        let mut records = Vec::with_capacity(models.len());
        for model in models {
            records.push(self.load_record(db, model).await?);
        }

        Ok((records, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<ProductRecord>, ServiceError> {
        let db = self.get_db();
        let models = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(db)
            .await?;

        let mut records = Vec::with_capacity(models.len());
        for model in models {
            records.push(self.load_record(db, model).await?);
        }
        Ok(records)
    }

    /// Deletes the product, its owned stock row and its supplier
    /// associations. Category and suppliers are left in place.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.get_db().begin().await?;

        let model = match product::Entity::find_by_id(id).one(&txn).await? {
            Some(model) => model,
            None => {
                txn.rollback().await?;
                return Err(ServiceError::not_found("Product", id));
            }
        };

        if self.relation(mapping::STOCK)?.is_owned() {
            let removed = stock::Entity::delete_many()
                .filter(stock::Column::ProductId.eq(id))
                .exec(&txn)
                .await?;
            debug!(rows = removed.rows_affected, "Cascaded stock delete");
        }

        product_supplier::Entity::delete_many()
            .filter(product_supplier::Column::ProductId.eq(id))
            .exec(&txn)
            .await?;

        model.delete(&txn).await?;
        txn.commit().await?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Number of stock rows stored for a product.
    pub async fn stock_count(&self, product_id: i64) -> Result<u64, ServiceError> {
        let count = stock::Entity::find()
            .filter(stock::Column::ProductId.eq(product_id))
            .count(self.get_db())
            .await?;
        Ok(count)
    }

    async fn load_record<C>(
        &self,
        db: &C,
        model: product::Model,
    ) -> Result<ProductRecord, ServiceError>
    where
        C: ConnectionTrait,
    {
        let stock = model
            .find_related(stock::Entity)
            .one(db)
            .await?
            .map(StockRecord::from);

        let suppliers: BTreeSet<SupplierRecord> = model
            .find_related(supplier::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(SupplierRecord::from)
            .collect();

        let category = if self.relation(mapping::CATEGORY)?.is_lazy() {
            CategoryRef::unloaded(model.category_id)
        } else {
            let loaded = model
                .find_related(category::Entity)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Category", model.category_id))?;
            CategoryRef::loaded(CategoryRecord::from(loaded))
        };

        let mut record = ProductRecord::new(
            model.name,
            price::from_cents(model.price_cents),
            stock,
            category,
            suppliers,
        );
        record.set_id(Some(model.id));
        Ok(record)
    }
}

impl Repository for ProductRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
