//! Season-wide bulk repricing. Both operations touch every pricing row of a
//! season inside one transaction, so a failure leaves the season untouched.

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde_derive::{Deserialize, Serialize};
use crate::helper_model::RentalError;
use crate::methods::pricing::round_money;
use crate::model::{SeasonalPricing, SeasonalPricingPrices};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RepricingSummary {
    pub season_id: i32,
    pub rows_total: usize,
    pub rows_changed: usize,
}

/// Largest raise accepted in one adjustment, in percent.
pub const MAX_ADJUST_PERCENT: Decimal = Decimal::ONE_THOUSAND;

/// Multiplier for a `percent` adjustment. Percentages below -100 or above
/// `MAX_ADJUST_PERCENT` are refused.
pub fn adjustment_factor(percent: Decimal) -> Result<Decimal, RentalError> {
    if percent < -Decimal::ONE_HUNDRED || percent > MAX_ADJUST_PERCENT {
        return Err(RentalError::InputDataError);
    }
    Ok(Decimal::ONE + percent / Decimal::ONE_HUNDRED)
}

fn adjust_price(price: Decimal, factor: Decimal) -> Result<Decimal, RentalError> {
    let adjusted = price.checked_mul(factor).ok_or(RentalError::InputDataError)?;
    Ok(round_money(adjusted).max(Decimal::ZERO))
}

/// New prices for one row after a `percent` adjustment. Empty base fields are
/// seeded with the current prices so a later reset goes back to them.
pub fn adjusted_prices(row: &SeasonalPricing, percent: Decimal) -> Result<SeasonalPricingPrices, RentalError> {
    let factor = adjustment_factor(percent)?;
    Ok(SeasonalPricingPrices {
        price_3_6: adjust_price(row.price_3_6, factor)?,
        price_7_14: adjust_price(row.price_7_14, factor)?,
        price_15_plus: adjust_price(row.price_15_plus, factor)?,
        base_price_3_6: row.base_price_3_6.or(Some(row.price_3_6)),
        base_price_7_14: row.base_price_7_14.or(Some(row.price_7_14)),
        base_price_15_plus: row.base_price_15_plus.or(Some(row.price_15_plus)),
    })
}

/// Prices restored from the base fields. Tiers without a base keep their value.
pub fn reset_prices(row: &SeasonalPricing) -> SeasonalPricingPrices {
    SeasonalPricingPrices {
        price_3_6: row.base_price_3_6.unwrap_or(row.price_3_6),
        price_7_14: row.base_price_7_14.unwrap_or(row.price_7_14),
        price_15_plus: row.base_price_15_plus.unwrap_or(row.price_15_plus),
        base_price_3_6: row.base_price_3_6,
        base_price_7_14: row.base_price_7_14,
        base_price_15_plus: row.base_price_15_plus,
    }
}

fn current_prices(row: &SeasonalPricing) -> SeasonalPricingPrices {
    SeasonalPricingPrices {
        price_3_6: row.price_3_6,
        price_7_14: row.price_7_14,
        price_15_plus: row.price_15_plus,
        base_price_3_6: row.base_price_3_6,
        base_price_7_14: row.base_price_7_14,
        base_price_15_plus: row.base_price_15_plus,
    }
}

fn apply_to_season<F>(conn: &mut PgConnection, target_season: i32, compute: F) -> Result<RepricingSummary, RentalError>
where
    F: Fn(&SeasonalPricing) -> Result<SeasonalPricingPrices, RentalError>,
{
    use crate::schema::seasonal_pricings::dsl::*;
    conn.transaction::<_, RentalError, _>(|conn| {
        let rows = seasonal_pricings
            .filter(season_id.eq(target_season))
            .for_update()
            .load::<SeasonalPricing>(conn)?;
        let mut rows_changed = 0;
        for row in rows.iter() {
            let new_prices = compute(row)?;
            if new_prices == current_prices(row) {
                continue;
            }
            diesel::update(seasonal_pricings.find(row.id))
                .set(&new_prices)
                .execute(conn)?;
            rows_changed += 1;
        }
        Ok(RepricingSummary {
            season_id: target_season,
            rows_total: rows.len(),
            rows_changed,
        })
    })
}

pub fn adjust_season(conn: &mut PgConnection, target_season: i32, percent: Decimal) -> Result<RepricingSummary, RentalError> {
    adjustment_factor(percent)?;
    apply_to_season(conn, target_season, |row| adjusted_prices(row, percent))
}

pub fn reset_season(conn: &mut PgConnection, target_season: i32) -> Result<RepricingSummary, RentalError> {
    apply_to_season(conn, target_season, |row| Ok(reset_prices(row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn row() -> SeasonalPricing {
        SeasonalPricing {
            id: 1,
            category_id: 2,
            group_code: String::from("C"),
            season_id: 5,
            price_3_6: dec("49.99"),
            price_7_14: dec("44.45"),
            price_15_plus: dec("39.10"),
            base_price_3_6: None,
            base_price_7_14: None,
            base_price_15_plus: None,
        }
    }

    fn apply(row: &SeasonalPricing, prices: SeasonalPricingPrices) -> SeasonalPricing {
        SeasonalPricing {
            price_3_6: prices.price_3_6,
            price_7_14: prices.price_7_14,
            price_15_plus: prices.price_15_plus,
            base_price_3_6: prices.base_price_3_6,
            base_price_7_14: prices.base_price_7_14,
            base_price_15_plus: prices.base_price_15_plus,
            ..row.clone()
        }
    }

    #[test]
    fn ten_percent_increase_rounds_to_cents() {
        let prices = adjusted_prices(&row(), dec("10")).unwrap();
        assert_eq!(prices.price_3_6, dec("54.99"));
        assert_eq!(prices.price_7_14, dec("48.90"));
        assert_eq!(prices.price_15_plus, dec("43.01"));
    }

    #[test]
    fn adjust_then_reset_restores_original_prices() {
        let original = row();
        let adjusted = apply(&original, adjusted_prices(&original, dec("10")).unwrap());
        let restored = apply(&adjusted, reset_prices(&adjusted));
        assert_eq!(restored.price_3_6, original.price_3_6);
        assert_eq!(restored.price_7_14, original.price_7_14);
        assert_eq!(restored.price_15_plus, original.price_15_plus);
    }

    #[test]
    fn repeated_adjustments_keep_the_first_base() {
        let original = row();
        let once = apply(&original, adjusted_prices(&original, dec("10")).unwrap());
        let twice = apply(&once, adjusted_prices(&once, dec("-5")).unwrap());
        assert_eq!(twice.base_price_3_6, Some(dec("49.99")));
        let restored = apply(&twice, reset_prices(&twice));
        assert_eq!(restored.price_3_6, dec("49.99"));
    }

    #[test]
    fn prices_never_go_negative() {
        let prices = adjusted_prices(&row(), dec("-100")).unwrap();
        assert_eq!(prices.price_3_6, Decimal::ZERO);
        assert_eq!(prices.price_15_plus, Decimal::ZERO);
    }

    #[test]
    fn decrease_beyond_full_price_is_rejected() {
        assert_eq!(
            adjusted_prices(&row(), dec("-150")).unwrap_err(),
            RentalError::InputDataError
        );
    }

    #[test]
    fn percent_outside_bounds_is_rejected_before_any_row() {
        assert_eq!(adjustment_factor(dec("-150")), Err(RentalError::InputDataError));
        assert_eq!(adjustment_factor(dec("1000.01")), Err(RentalError::InputDataError));
        assert_eq!(adjustment_factor(dec("1000")), Ok(dec("11")));
        assert_eq!(adjustment_factor(dec("-100")), Ok(Decimal::ZERO));
    }

    #[test]
    fn huge_percent_does_not_overflow() {
        let mut expensive = row();
        expensive.price_3_6 = Decimal::MAX;
        assert_eq!(
            adjusted_prices(&expensive, dec("1000")).unwrap_err(),
            RentalError::InputDataError
        );
    }

    #[test]
    fn reset_without_base_leaves_row_unchanged() {
        let original = row();
        assert_eq!(reset_prices(&original), current_prices(&original));
    }
}
