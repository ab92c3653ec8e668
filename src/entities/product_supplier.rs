use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Join table between products and suppliers (`tb_produto_fornecedor`).
///
/// Rows only record the association; deleting either side removes the
/// matching rows here and nothing else.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tb_produto_fornecedor")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "produto_id")]
    pub product_id: i64,

    #[sea_orm(primary_key, auto_increment = false, column_name = "fornecedor_id")]
    pub supplier_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "Cascade"
    )]
    Product,

    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id",
        on_delete = "Cascade"
    )]
    Supplier,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
