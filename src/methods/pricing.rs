//! Seasonal price resolution.
//!
//! A rental is priced from the season containing its pickup date, the
//! `seasonal_pricings` row for the vehicle's category and group in that season,
//! and one of three day-count tiers. Rental options and an optional promotion
//! are applied on top.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_derive::{Deserialize, Serialize};
use crate::helper_model::RentalError;
use crate::model;

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    /// 3–6 days. Shorter rentals are also billed at this rate.
    ThreeToSix,
    /// 7–14 days.
    SevenToFourteen,
    /// 15 days and more.
    FifteenPlus,
}

impl PriceTier {
    pub fn for_days(days: i64) -> PriceTier {
        match days {
            i64::MIN..=6 => PriceTier::ThreeToSix,
            7..=14 => PriceTier::SevenToFourteen,
            _ => PriceTier::FifteenPlus,
        }
    }

    pub fn daily_rate(&self, pricing: &model::SeasonalPricing) -> Decimal {
        match self {
            PriceTier::ThreeToSix => pricing.price_3_6,
            PriceTier::SevenToFourteen => pricing.price_7_14,
            PriceTier::FifteenPlus => pricing.price_15_plus,
        }
    }
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Billable days between pickup and drop-off. Any started day counts as a full
/// day and every rental is at least one day long.
pub fn rental_days(pickup: DateTime<Utc>, drop_off: DateTime<Utc>) -> Result<i64, RentalError> {
    if drop_off <= pickup {
        return Err(RentalError::InputDataError);
    }
    let minutes = (drop_off - pickup).num_minutes();
    let days = (minutes + MINUTES_PER_DAY - 1) / MINUTES_PER_DAY;
    Ok(days.max(1))
}

/// The season whose inclusive date interval contains `date`. When intervals
/// overlap the most recently starting one wins.
pub fn find_season(seasons: &[model::Season], date: NaiveDate) -> Result<&model::Season, RentalError> {
    seasons
        .iter()
        .filter(|season| season.contains(date))
        .max_by_key(|season| (season.start_date, season.id))
        .ok_or(RentalError::NoSeason)
}

pub fn find_pricing<'a>(
    pricings: &'a [model::SeasonalPricing],
    category_id: i32,
    group_code: &str,
    season_id: i32,
) -> Result<&'a model::SeasonalPricing, RentalError> {
    pricings
        .iter()
        .find(|p| p.category_id == category_id && p.group_code == group_code && p.season_id == season_id)
        .ok_or(RentalError::NoPricing)
}

/// Price of one rental option for `days`, capped at `max_price` when set.
pub fn option_price(pricing: &model::RentalOptionPricing, days: i64) -> Decimal {
    let uncapped = pricing.price_per_day * Decimal::from(days);
    let capped = match pricing.max_price {
        Some(cap) if cap < uncapped => cap,
        _ => uncapped,
    };
    round_money(capped)
}

pub fn promotion_applies(promo: &model::Promotion, today: NaiveDate) -> bool {
    if !promo.is_enabled {
        return false;
    }
    let started = promo.valid_from.is_none_or(|from| from <= today);
    let not_expired = promo.valid_until.is_none_or(|until| today <= until);
    started && not_expired
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OptionLine {
    pub rental_option_id: i32,
    pub price: Decimal,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Quote {
    pub season_id: i32,
    pub season_name: String,
    pub tier: PriceTier,
    pub days: i64,
    pub daily_rate: Decimal,
    pub base_total: Decimal,
    pub options: Vec<OptionLine>,
    pub options_total: Decimal,
    pub promo_code: Option<String>,
    pub discount_percent: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    /// The rental ends outside the pickup season; it is still billed at the
    /// pickup season's rate.
    pub spans_multiple_seasons: bool,
}

pub struct QuoteInput<'a> {
    pub pickup: DateTime<Utc>,
    pub drop_off: DateTime<Utc>,
    pub vehicle: &'a model::Vehicle,
    pub seasons: &'a [model::Season],
    pub pricings: &'a [model::SeasonalPricing],
    pub option_pricings: &'a [model::RentalOptionPricing],
    pub promotion: Option<&'a model::Promotion>,
    pub today: NaiveDate,
}

pub fn build_quote(input: QuoteInput<'_>) -> Result<Quote, RentalError> {
    let days = rental_days(input.pickup, input.drop_off)?;
    let pickup_date = input.pickup.date_naive();
    let season = find_season(input.seasons, pickup_date)?;
    let pricing = find_pricing(
        input.pricings,
        input.vehicle.category_id,
        &input.vehicle.group_code,
        season.id,
    )?;
    let tier = PriceTier::for_days(days);
    let daily_rate = tier.daily_rate(pricing);
    let base_total = round_money(daily_rate * Decimal::from(days));

    let options: Vec<OptionLine> = input
        .option_pricings
        .iter()
        .map(|p| OptionLine {
            rental_option_id: p.rental_option_id,
            price: option_price(p, days),
        })
        .collect();
    let options_total: Decimal = options.iter().map(|line| line.price).sum();

    let (promo_code, discount_percent) = match input.promotion {
        Some(promo) => {
            if !promotion_applies(promo, input.today) {
                return Err(RentalError::PromoCodeNotAllowed(promo.code.clone()));
            }
            let pct = promo.discount_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
            (Some(promo.code.clone()), pct)
        }
        None => (None, Decimal::ZERO),
    };
    let subtotal = base_total + options_total;
    let discount = round_money(subtotal * discount_percent / Decimal::ONE_HUNDRED);
    let total = round_money(subtotal - discount).max(Decimal::ZERO);

    Ok(Quote {
        season_id: season.id,
        season_name: season.name.clone(),
        tier,
        days,
        daily_rate,
        base_total,
        options,
        options_total,
        promo_code,
        discount_percent,
        discount,
        total,
        spans_multiple_seasons: !season.contains(input.drop_off.date_naive()),
    })
}

/// Loads everything a quote needs for `vehicle_id` and prices it.
pub fn quote_for_vehicle(
    conn: &mut PgConnection,
    vehicle_id: i32,
    pickup: DateTime<Utc>,
    drop_off: DateTime<Utc>,
    option_ids: &[i32],
    promo: Option<&str>,
) -> Result<(model::Vehicle, Quote), RentalError> {
    use crate::schema::promotions::dsl as promo_q;
    use crate::schema::rental_option_pricings::dsl as rop_q;
    use crate::schema::rental_options::dsl as ro_q;
    use crate::schema::seasonal_pricings::dsl as sp_q;
    use crate::schema::seasons::dsl as season_q;
    use crate::schema::vehicles::dsl as v_q;

    let vehicle = v_q::vehicles
        .find(vehicle_id)
        .get_result::<model::Vehicle>(conn)?;
    let pickup_date = pickup.date_naive();
    let seasons = season_q::seasons
        .filter(season_q::start_date.le(pickup_date))
        .filter(season_q::end_date.ge(pickup_date))
        .load::<model::Season>(conn)?;
    let pricings = sp_q::seasonal_pricings
        .filter(sp_q::category_id.eq(vehicle.category_id))
        .filter(sp_q::group_code.eq(&vehicle.group_code))
        .load::<model::SeasonalPricing>(conn)?;

    let mut unique_option_ids = option_ids.to_vec();
    unique_option_ids.sort_unstable();
    unique_option_ids.dedup();
    let option_pricings = rop_q::rental_option_pricings
        .inner_join(ro_q::rental_options)
        .filter(ro_q::is_enabled)
        .filter(rop_q::rental_option_id.eq_any(&unique_option_ids))
        .filter(rop_q::group_code.eq(&vehicle.group_code))
        .select(crate::schema::rental_option_pricings::all_columns)
        .load::<model::RentalOptionPricing>(conn)?;
    if option_pricings.len() != unique_option_ids.len() {
        // an option is disabled or not offered for this vehicle group
        return Err(RentalError::InputDataError);
    }

    let promotion = match promo.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => Some(
            promo_q::promotions
                .filter(promo_q::code.eq(code.to_uppercase()))
                .first::<model::Promotion>(conn)
                .optional()?
                .ok_or_else(|| RentalError::PromoCodeNotAllowed(code.to_string()))?,
        ),
        None => None,
    };

    let quote = build_quote(QuoteInput {
        pickup,
        drop_off,
        vehicle: &vehicle,
        seasons: &seasons,
        pricings: &pricings,
        option_pricings: &option_pricings,
        promotion: promotion.as_ref(),
        today: Utc::now().date_naive(),
    })?;
    Ok((vehicle, quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn summer_2025() -> model::Season {
        model::Season {
            id: 7,
            name: String::from("Summer 2025"),
            season_type: String::from("Summer"),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
        }
    }

    fn winter_2025() -> model::Season {
        model::Season {
            id: 8,
            name: String::from("Winter 2025"),
            season_type: String::from("Winter"),
            start_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        }
    }

    fn economy_pricing(season_id: i32) -> model::SeasonalPricing {
        model::SeasonalPricing {
            id: 1,
            category_id: 3,
            group_code: String::from("B"),
            season_id,
            price_3_6: dec("50.00"),
            price_7_14: dec("45.00"),
            price_15_plus: dec("40.00"),
            base_price_3_6: None,
            base_price_7_14: None,
            base_price_15_plus: None,
        }
    }

    fn economy_car() -> model::Vehicle {
        model::Vehicle {
            id: 11,
            name: String::from("Skoda Fabia"),
            make: String::from("Skoda"),
            model: String::from("Fabia"),
            year: String::from("2023"),
            group_code: String::from("B"),
            seats: 5,
            transmission: String::from("manual"),
            image_path: None,
            available: true,
            category_id: 3,
        }
    }

    fn promo(pct: &str) -> model::Promotion {
        model::Promotion {
            id: 1,
            code: String::from("SUMMER10"),
            name: String::from("Summer deal"),
            discount_percent: dec(pct),
            valid_from: Some(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
            valid_until: Some(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()),
            is_visible: true,
            is_enabled: true,
        }
    }

    #[test]
    fn tiers_follow_day_brackets() {
        assert_eq!(PriceTier::for_days(1), PriceTier::ThreeToSix);
        assert_eq!(PriceTier::for_days(3), PriceTier::ThreeToSix);
        assert_eq!(PriceTier::for_days(6), PriceTier::ThreeToSix);
        assert_eq!(PriceTier::for_days(7), PriceTier::SevenToFourteen);
        assert_eq!(PriceTier::for_days(14), PriceTier::SevenToFourteen);
        assert_eq!(PriceTier::for_days(15), PriceTier::FifteenPlus);
        assert_eq!(PriceTier::for_days(60), PriceTier::FifteenPlus);
    }

    #[test]
    fn started_days_are_billed_in_full() {
        assert_eq!(rental_days(at(2025, 6, 1, 10), at(2025, 6, 11, 10)).unwrap(), 10);
        assert_eq!(rental_days(at(2025, 6, 1, 10), at(2025, 6, 11, 11)).unwrap(), 11);
        assert_eq!(rental_days(at(2025, 6, 1, 10), at(2025, 6, 1, 12)).unwrap(), 1);
    }

    #[test]
    fn drop_off_before_pickup_is_rejected() {
        assert_eq!(
            rental_days(at(2025, 6, 2, 10), at(2025, 6, 1, 10)).unwrap_err(),
            RentalError::InputDataError
        );
        assert!(rental_days(at(2025, 6, 2, 10), at(2025, 6, 2, 10)).is_err());
    }

    #[test]
    fn season_lookup_is_inclusive() {
        let seasons = vec![summer_2025(), winter_2025()];
        let first_day = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let last_day = NaiveDate::from_ymd_opt(2025, 10, 31).unwrap();
        assert_eq!(find_season(&seasons, first_day).unwrap().id, 7);
        assert_eq!(find_season(&seasons, last_day).unwrap().id, 7);
        assert_eq!(
            find_season(&seasons, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()).unwrap().id,
            8
        );
    }

    #[test]
    fn overlapping_seasons_prefer_latest_start() {
        let mut peak = summer_2025();
        peak.id = 9;
        peak.name = String::from("Peak August");
        peak.start_date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        peak.end_date = NaiveDate::from_ymd_opt(2025, 8, 31).unwrap();
        let seasons = vec![summer_2025(), peak];
        let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        assert_eq!(find_season(&seasons, date).unwrap().id, 9);
    }

    #[test]
    fn ten_day_summer_booking_uses_seven_to_fourteen_tier() {
        let seasons = vec![summer_2025(), winter_2025()];
        let pricings = vec![economy_pricing(7)];
        let vehicle = economy_car();
        let quote = build_quote(QuoteInput {
            pickup: at(2025, 6, 1, 10),
            drop_off: at(2025, 6, 11, 10),
            vehicle: &vehicle,
            seasons: &seasons,
            pricings: &pricings,
            option_pricings: &[],
            promotion: None,
            today: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
        })
        .unwrap();
        assert_eq!(quote.tier, PriceTier::SevenToFourteen);
        assert_eq!(quote.daily_rate, dec("45.00"));
        assert_eq!(quote.days, 10);
        assert_eq!(quote.total, dec("450.00"));
        assert!(!quote.spans_multiple_seasons);
    }

    #[test]
    fn missing_season_is_an_explicit_error() {
        let vehicle = economy_car();
        let err = build_quote(QuoteInput {
            pickup: at(2025, 1, 10, 10),
            drop_off: at(2025, 1, 14, 10),
            vehicle: &vehicle,
            seasons: &[summer_2025()],
            pricings: &[economy_pricing(7)],
            option_pricings: &[],
            promotion: None,
            today: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        })
        .unwrap_err();
        assert_eq!(err, RentalError::NoSeason);
    }

    #[test]
    fn missing_pricing_row_is_an_explicit_error() {
        let mut vehicle = economy_car();
        vehicle.group_code = String::from("F");
        let err = build_quote(QuoteInput {
            pickup: at(2025, 6, 1, 10),
            drop_off: at(2025, 6, 5, 10),
            vehicle: &vehicle,
            seasons: &[summer_2025()],
            pricings: &[economy_pricing(7)],
            option_pricings: &[],
            promotion: None,
            today: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        })
        .unwrap_err();
        assert_eq!(err, RentalError::NoPricing);
    }

    #[test]
    fn multi_season_rental_keeps_pickup_rate() {
        let seasons = vec![summer_2025(), winter_2025()];
        let pricings = vec![economy_pricing(7)];
        let vehicle = economy_car();
        let quote = build_quote(QuoteInput {
            pickup: at(2025, 10, 25, 9),
            drop_off: at(2025, 11, 5, 9),
            vehicle: &vehicle,
            seasons: &seasons,
            pricings: &pricings,
            option_pricings: &[],
            promotion: None,
            today: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        })
        .unwrap();
        assert_eq!(quote.season_id, 7);
        assert!(quote.spans_multiple_seasons);
        assert_eq!(quote.total, dec("495.00"));
    }

    #[test]
    fn options_are_capped_and_promotion_discounts_everything() {
        let vehicle = economy_car();
        let gps = model::RentalOptionPricing {
            id: 1,
            rental_option_id: 21,
            group_code: String::from("B"),
            price_per_day: dec("5.00"),
            max_price: Some(dec("30.00")),
        };
        let child_seat = model::RentalOptionPricing {
            id: 2,
            rental_option_id: 22,
            group_code: String::from("B"),
            price_per_day: dec("3.50"),
            max_price: None,
        };
        let summer_promo = promo("10");
        let quote = build_quote(QuoteInput {
            pickup: at(2025, 6, 1, 10),
            drop_off: at(2025, 6, 11, 10),
            vehicle: &vehicle,
            seasons: &[summer_2025()],
            pricings: &[economy_pricing(7)],
            option_pricings: &[gps, child_seat],
            promotion: Some(&summer_promo),
            today: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
        })
        .unwrap();
        assert_eq!(quote.options[0].price, dec("30.00"));
        assert_eq!(quote.options[1].price, dec("35.00"));
        assert_eq!(quote.options_total, dec("65.00"));
        // (450 + 65) * 10% = 51.50
        assert_eq!(quote.discount, dec("51.50"));
        assert_eq!(quote.total, dec("463.50"));
    }

    #[test]
    fn expired_promotion_is_refused() {
        let vehicle = economy_car();
        let summer_promo = promo("10");
        let err = build_quote(QuoteInput {
            pickup: at(2025, 6, 1, 10),
            drop_off: at(2025, 6, 4, 10),
            vehicle: &vehicle,
            seasons: &[summer_2025()],
            pricings: &[economy_pricing(7)],
            option_pricings: &[],
            promotion: Some(&summer_promo),
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        })
        .unwrap_err();
        assert_eq!(err, RentalError::PromoCodeNotAllowed(String::from("SUMMER10")));
    }

    #[test]
    fn promotion_window_bounds_are_optional() {
        let mut open_ended = promo("5");
        open_ended.valid_from = None;
        open_ended.valid_until = None;
        assert!(promotion_applies(&open_ended, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
        open_ended.is_enabled = false;
        assert!(!promotion_applies(&open_ended, NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }
}
