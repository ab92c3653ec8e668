use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supplier row (`tb_fornecedores`), shared between products
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_fornecedores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_name = "nome")]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_supplier::Entity")]
    ProductSuppliers,
}

impl Related<super::product_supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductSuppliers.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_supplier::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_supplier::Relation::Supplier.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
