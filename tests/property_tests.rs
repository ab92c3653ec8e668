//! Property-based tests for the product record and its references.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rust_decimal::Decimal;
use stock_control_api::{CategoryRecord, CategoryRef, ProductRecord, StockRecord, SupplierRecord};

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn supplier_strategy() -> impl Strategy<Value = SupplierRecord> {
    (1i64..50, "[A-Z][a-z]{2,10}").prop_map(|(id, name)| SupplierRecord { id, name })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn price_serializes_with_two_decimal_places(price in price_strategy()) {
        let record = ProductRecord::new(
            "Widget",
            price,
            None,
            CategoryRef::unloaded(1),
            BTreeSet::new(),
        );
        let json = serde_json::to_value(&record).unwrap();
        let text = json["price"].as_str().unwrap().to_string();
        prop_assert_eq!(text.split('.').nth(1).map(str::len), Some(2));
        prop_assert_eq!(text.parse::<Decimal>().unwrap(), price);
    }

    #[test]
    fn supplier_set_never_holds_duplicates(suppliers in prop::collection::vec(supplier_strategy(), 0..20)) {
        let mut record = ProductRecord::new(
            "Widget",
            Decimal::ONE,
            None,
            CategoryRef::unloaded(1),
            BTreeSet::new(),
        );
        record.set_suppliers(suppliers.iter().cloned().collect());

        let distinct: BTreeSet<_> = suppliers.iter().cloned().collect();
        prop_assert_eq!(record.suppliers().len(), distinct.len());
        for supplier in &suppliers {
            prop_assert!(record.suppliers().contains(supplier));
        }
    }

    #[test]
    fn stock_replacement_is_unconditional(first in 0i32..10_000, second in -10_000i32..10_000) {
        let mut record = ProductRecord::new(
            "Widget",
            Decimal::ONE,
            Some(StockRecord::new(first)),
            CategoryRef::unloaded(1),
            BTreeSet::new(),
        );
        record.set_stock(Some(StockRecord::new(second)));
        prop_assert_eq!(record.stock().map(|s| s.quantity), Some(second));
        prop_assert!(record.stock().unwrap().id.is_none());
    }

    #[test]
    fn cloned_category_reference_is_independent(id in 1i64..1_000, name in "[a-z]{1,12}", edit in "[A-Z]{1,12}") {
        let original = CategoryRef::loaded(CategoryRecord { id, name: name.clone() });
        let mut copy = original.clone();
        copy.get_mut().unwrap().name = edit;

        prop_assert_eq!(original.get().map(|c| c.name.as_str()), Some(name.as_str()));
        prop_assert_eq!(copy.id(), original.id());
    }
}
