use crate::data::model::{BuyFlag, Property, Recommendation, Season};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::baseline::ZipMedians;
use crate::pipeline::season::{purchase_season, SeasonProfile};

/// Resale markup for properties at or below the zip median.
pub const MARKUP_UNDERVALUED: f64 = 1.3;
/// Resale markup for properties above the zip median.
pub const MARKUP_OVERVALUED: f64 = 1.1;
/// Resale markup when neither of the above applies.
pub const MARKUP_FALLBACK: f64 = 1.2;

/// Price relative to the local market; below 1.0 means under-valued.
pub fn price_index(price: f64, zip_median: f64) -> f64 {
    price / zip_median
}

/// Three-tier resale price.
///
/// Only the first tier checks the (zip, season) median, which must be
/// truthy (non-zero; NaN counts as truthy). Anything above the zip median
/// takes the second tier whatever its seasonal median, so the fallback is
/// only reached by an at-or-below-median price with a zero seasonal
/// median. See DESIGN.md before changing it.
pub fn proposed_price(price: f64, zip_median: f64, zip_season_median: f64) -> f64 {
    let season_median_set = zip_season_median != 0.0;
    if price <= zip_median && season_median_set {
        price * MARKUP_UNDERVALUED
    } else if price > zip_median {
        price * MARKUP_OVERVALUED
    } else {
        price * MARKUP_FALLBACK
    }
}

/// Derive the recommendation rows.
///
/// One row per (property, dominant season of its zip): a zip with tied
/// dominant seasons repeats each of its properties once per season.
pub fn recommend(
    properties: &[Property],
    zip_medians: &ZipMedians,
    seasons: &SeasonProfile,
) -> PipelineResult<Vec<Recommendation>> {
    let mut rows = Vec::with_capacity(properties.len());

    for p in properties {
        let zip_median = zip_medians.denominator(p.zipcode)?;
        let season = purchase_season(p);
        let zip_season_median =
            seasons
                .median(p.zipcode, season)
                .ok_or(PipelineError::MissingSeasonBaseline {
                    zipcode: p.zipcode,
                    season,
                })?;

        // every property counts towards its own zip, so this is never empty
        let sell_seasons = seasons.dominant(p.zipcode);

        let index = price_index(p.price, zip_median);
        let proposed = proposed_price(p.price, zip_median, zip_season_median);
        for &sell_when in sell_seasons {
            rows.push(build_row(p, index, proposed, sell_when));
        }
    }

    Ok(rows)
}

fn build_row(p: &Property, price_index: f64, proposed_price: f64, sell_when: Season) -> Recommendation {
    Recommendation {
        buy: BuyFlag::from_price_index(price_index),
        id: p.id,
        price: p.price,
        proposed_price,
        sell_when,
        price_index,
        bedrooms: p.bedrooms,
        bathrooms: p.bathrooms,
        sqft_living: p.sqft_living,
        sqft_lot: p.sqft_lot,
        floors: p.floors,
        waterfront: p.waterfront,
        condition: p.condition,
        sqft_above: p.sqft_above,
        sqft_basement: p.sqft_basement,
        yr_built: p.yr_built,
        yr_renovated: p.yr_renovated,
        date: p.date,
        zipcode: p.zipcode,
        lat: p.lat,
        long: p.long,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::property;
    use approx::assert_relative_eq;

    #[test]
    fn test_proposed_price_tiers() {
        assert_relative_eq!(proposed_price(150.0, 200.0, 180.0), 195.0);
        assert_relative_eq!(proposed_price(200.0, 200.0, 180.0), 260.0);
        assert_relative_eq!(proposed_price(250.0, 200.0, 180.0), 275.0);
        // zero seasonal median drops to the fallback tier
        assert_relative_eq!(proposed_price(150.0, 200.0, 0.0), 180.0);
    }

    #[test]
    fn test_above_median_ignores_zero_season_median() {
        assert_relative_eq!(proposed_price(900.0, 600.0, 0.0), 990.0);
    }

    #[test]
    fn test_zero_winter_median_keeps_overvalued_markup() {
        let mut props = vec![
            property(1, 98178, "2014-12-01", 0.0),
            property(2, 98178, "2015-01-10", 0.0),
            property(3, 98178, "2015-02-10", 900.0),
        ];
        for (id, price) in [(4, 500.0), (5, 600.0), (6, 700.0), (7, 800.0)] {
            props.push(property(id, 98178, "2014-07-01", price));
        }
        let medians = ZipMedians::compute(&props);
        let profile = SeasonProfile::compute(&props);
        assert_eq!(medians.get(98178), Some(600.0));
        assert_eq!(profile.median(98178, Season::Winter), Some(0.0));

        let rows = recommend(&props, &medians, &profile).unwrap();
        let row = rows.iter().find(|r| r.id == 3).unwrap();
        assert_relative_eq!(row.proposed_price, 990.0);
    }

    #[test]
    fn test_nan_season_median_is_truthy() {
        assert_relative_eq!(proposed_price(150.0, 200.0, f64::NAN), 195.0);
    }

    #[test]
    fn test_price_index() {
        assert_relative_eq!(price_index(100.0, 150.0), 0.6666666666666666);
        assert_relative_eq!(price_index(300.0, 150.0), 2.0);
    }

    #[test]
    fn test_tied_seasons_duplicate_rows() {
        let props = vec![
            property(1, 98002, "2014-12-01", 100.0),
            property(2, 98002, "2014-04-01", 300.0),
        ];
        let medians = ZipMedians::compute(&props);
        let profile = SeasonProfile::compute(&props);
        let rows = recommend(&props, &medians, &profile).unwrap();

        let pairs: Vec<(i64, Season)> = rows.iter().map(|r| (r.id, r.sell_when)).collect();
        assert_eq!(
            pairs,
            vec![
                (1, Season::Spring),
                (1, Season::Winter),
                (2, Season::Spring),
                (2, Season::Winter),
            ]
        );
        assert_eq!(rows[0].buy, BuyFlag::Buy);
        assert_eq!(rows[2].buy, BuyFlag::DontBuy);
    }

    #[test]
    fn test_zero_median_surfaces_error() {
        let props = vec![property(1, 98010, "2014-07-01", 0.0)];
        let medians = ZipMedians::compute(&props);
        let profile = SeasonProfile::compute(&props);
        assert_eq!(
            recommend(&props, &medians, &profile),
            Err(PipelineError::UndefinedZipMedian { zipcode: 98010 })
        );
    }
}
