//! Relationship metadata for the product schema.
//!
//! Cascade, orphan-removal and fetch behaviour are described here as plain
//! data and read by the repositories at save/delete/load time, instead of
//! being implied by the entity definitions. Table and column names are taken
//! from the SeaORM entities so the two cannot drift apart.

use sea_orm::{EntityName, IdenStatic, Iterable};
use serde::Serialize;

use crate::entities::{category, product, product_supplier, stock, supplier};

/// Relation name of the owned stock record.
pub const STOCK: &str = "stock";
/// Relation name of the required category reference.
pub const CATEGORY: &str = "category";
/// Relation name of the supplier set.
pub const SUPPLIERS: &str = "suppliers";

/// When the related side is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Loaded together with the owning row.
    Eager,
    /// Only the key is loaded; the value is resolved on request.
    Lazy,
}

/// Which writes on the owner propagate to the related row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cascade {
    pub persist: bool,
    pub merge: bool,
    pub remove: bool,
}

impl Cascade {
    pub const ALL: Cascade = Cascade {
        persist: true,
        merge: true,
        remove: true,
    };

    pub const NONE: Cascade = Cascade {
        persist: false,
        merge: false,
        remove: false,
    };

    /// True when saving the owner also writes the related row.
    pub fn propagates_writes(&self) -> bool {
        self.persist || self.merge
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationKind {
    /// The foreign key lives on the target table (`mapped_by` column).
    OneToOne { mapped_by: String },
    /// The foreign key lives on the owner table.
    ManyToOne { join_column: String, nullable: bool },
    /// Association rows in a separate join table.
    ManyToMany {
        join_table: String,
        join_column: String,
        inverse_join_column: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationMapping {
    pub name: &'static str,
    pub target_table: String,
    pub kind: RelationKind,
    pub fetch: FetchStrategy,
    pub cascade: Cascade,
    /// Delete the related row once the owner stops referencing it.
    pub orphan_removal: bool,
}

impl RelationMapping {
    pub fn is_lazy(&self) -> bool {
        self.fetch == FetchStrategy::Lazy
    }

    /// True when the owner's lifecycle governs the related row.
    pub fn is_owned(&self) -> bool {
        self.cascade.remove || self.orphan_removal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMapping {
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
    pub relations: Vec<RelationMapping>,
}

impl EntityMapping {
    pub fn relation(&self, name: &str) -> Option<&RelationMapping> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Relations whose rows must be removed together with the owner.
    pub fn owned_relations(&self) -> impl Iterator<Item = &RelationMapping> {
        self.relations.iter().filter(|r| r.is_owned())
    }
}

/// Mapping of `tb_produtos` and its three relationships.
pub fn product_mapping() -> EntityMapping {
    EntityMapping {
        table: product::Entity.table_name().to_string(),
        primary_key: product::Column::Id.as_str().to_string(),
        columns: product::Column::iter()
            .map(|column| column.as_str().to_string())
            .collect(),
        relations: vec![
            RelationMapping {
                name: STOCK,
                target_table: stock::Entity.table_name().to_string(),
                kind: RelationKind::OneToOne {
                    mapped_by: stock::Column::ProductId.as_str().to_string(),
                },
                fetch: FetchStrategy::Eager,
                cascade: Cascade::ALL,
                orphan_removal: true,
            },
            RelationMapping {
                name: CATEGORY,
                target_table: category::Entity.table_name().to_string(),
                kind: RelationKind::ManyToOne {
                    join_column: product::Column::CategoryId.as_str().to_string(),
                    nullable: false,
                },
                fetch: FetchStrategy::Lazy,
                cascade: Cascade::NONE,
                orphan_removal: false,
            },
            RelationMapping {
                name: SUPPLIERS,
                target_table: supplier::Entity.table_name().to_string(),
                kind: RelationKind::ManyToMany {
                    join_table: product_supplier::Entity.table_name().to_string(),
                    join_column: product_supplier::Column::ProductId.as_str().to_string(),
                    inverse_join_column: product_supplier::Column::SupplierId
                        .as_str()
                        .to_string(),
                },
                fetch: FetchStrategy::Eager,
                cascade: Cascade::NONE,
                orphan_removal: false,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_table_and_columns_follow_schema() {
        let mapping = product_mapping();
        assert_eq!(mapping.table, "tb_produtos");
        assert_eq!(mapping.primary_key, "id");
        assert_eq!(
            mapping.columns,
            vec!["id", "nome", "preco_centavos", "categoria_id"]
        );
    }

    #[test]
    fn stock_is_owned_one_to_one() {
        let mapping = product_mapping();
        let stock = mapping.relation(STOCK).unwrap();
        assert_eq!(stock.target_table, "tb_estoque");
        assert_eq!(
            stock.kind,
            RelationKind::OneToOne {
                mapped_by: "produto_id".into()
            }
        );
        assert_eq!(stock.cascade, Cascade::ALL);
        assert!(stock.orphan_removal);
        assert!(stock.is_owned());
        assert!(!stock.is_lazy());
    }

    #[test]
    fn category_is_required_and_lazy() {
        let mapping = product_mapping();
        let category = mapping.relation(CATEGORY).unwrap();
        assert_eq!(
            category.kind,
            RelationKind::ManyToOne {
                join_column: "categoria_id".into(),
                nullable: false
            }
        );
        assert!(category.is_lazy());
        assert!(!category.is_owned());
        assert!(!category.cascade.propagates_writes());
    }

    #[test]
    fn suppliers_use_join_table_without_cascade() {
        let mapping = product_mapping();
        let suppliers = mapping.relation(SUPPLIERS).unwrap();
        assert_eq!(
            suppliers.kind,
            RelationKind::ManyToMany {
                join_table: "tb_produto_fornecedor".into(),
                join_column: "produto_id".into(),
                inverse_join_column: "fornecedor_id".into(),
            }
        );
        assert!(!suppliers.is_owned());
    }

    #[test]
    fn only_stock_is_owned() {
        let mapping = product_mapping();
        let owned: Vec<_> = mapping.owned_relations().map(|r| r.name).collect();
        assert_eq!(owned, vec![STOCK]);
        assert!(mapping.relation("warehouse").is_none());
    }
}
