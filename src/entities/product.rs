use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product row (`tb_produtos`)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_produtos")]
pub struct Model {
    /// Primary key, generated by the database on insert
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_name = "nome")]
    pub name: String,

    /// Price in cents; see `models::price`
    #[sea_orm(column_name = "preco_centavos")]
    pub price_cents: i64,

    /// Required owning category
    #[sea_orm(column_name = "categoria_id")]
    pub category_id: i64,
}

/// Product entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Inverse side of the one-to-one; the stock row holds `produto_id`
    #[sea_orm(has_one = "super::stock::Entity")]
    Stock,

    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,

    #[sea_orm(has_many = "super::product_supplier::Entity")]
    ProductSuppliers,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::product_supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductSuppliers.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_supplier::Relation::Supplier.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_supplier::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
