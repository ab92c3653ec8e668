//! Prices are stored as whole cents in a BIGINT column, which is exact on
//! every backend.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept in storage.
pub const PRICE_SCALE: u32 = 2;

/// Price in cents, rounded half away from zero to two places. `None` when
/// the value does not fit the column.
pub fn to_cents(price: Decimal) -> Option<i64> {
    let mut rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    i64::try_from(rounded.mantissa()).ok()
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn keeps_two_places() {
        assert_eq!(to_cents(dec!(19.90)), Some(1990));
        assert_eq!(to_cents(dec!(19.9)), Some(1990));
        assert_eq!(to_cents(dec!(0.10)), Some(10));
        assert_eq!(to_cents(dec!(-5)), Some(-500));
        assert_eq!(from_cents(1990).to_string(), "19.90");
        assert_eq!(from_cents(10).to_string(), "0.10");
    }

    #[test]
    fn rounds_extra_places_half_away_from_zero() {
        assert_eq!(to_cents(dec!(1.005)), Some(101));
        assert_eq!(to_cents(dec!(1.004)), Some(100));
        assert_eq!(to_cents(dec!(-1.005)), Some(-101));
    }

    #[test]
    fn rejects_values_beyond_bigint() {
        assert_eq!(to_cents(Decimal::MAX), None);
        assert_eq!(to_cents(dec!(92233720368547758.07)), Some(i64::MAX));
        assert_eq!(to_cents(dec!(92233720368547758.08)), None);
    }
}
