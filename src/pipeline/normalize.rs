use std::collections::HashSet;

use chrono::NaiveDate;

use crate::data::model::{Property, RawRecord, Waterfront};
use crate::error::{PipelineError, PipelineResult};

/// Accepted listing date layouts: ISO dates, then the raw King County
/// `20141013T000000` export form.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%dT%H%M%S"];

/// Deduplicate by id (first occurrence wins, input order kept) and fix
/// the column types.
pub fn normalize(raw: &[RawRecord]) -> PipelineResult<Vec<Property>> {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut properties = Vec::with_capacity(raw.len());

    for rec in raw {
        if !seen.insert(rec.id) {
            continue;
        }
        properties.push(normalize_record(rec)?);
    }

    log::debug!(
        "normalized {} raw rows into {} properties ({} duplicates dropped)",
        raw.len(),
        properties.len(),
        raw.len() - properties.len()
    );
    Ok(properties)
}

fn normalize_record(rec: &RawRecord) -> PipelineResult<Property> {
    check_finite(rec)?;
    Ok(Property {
        id: rec.id,
        date: parse_date(rec.id, &rec.date)?,
        price: rec.price,
        bedrooms: rec.bedrooms,
        bathrooms: round_count(rec.bathrooms),
        sqft_living: rec.sqft_living,
        sqft_lot: rec.sqft_lot,
        floors: round_count(rec.floors),
        waterfront: Waterfront::from_indicator(rec.waterfront),
        condition: rec.condition,
        sqft_above: rec.sqft_above,
        sqft_basement: rec.sqft_basement,
        yr_built: rec.yr_built,
        yr_renovated: rec.yr_renovated,
        zipcode: rec.zipcode,
        lat: rec.lat,
        long: rec.long,
    })
}

/// Text sources parse `NaN`/`inf` into float columns; such rows fail the
/// run like any other malformed value.
fn check_finite(rec: &RawRecord) -> PipelineResult<()> {
    let fields = [
        ("price", rec.price),
        ("bathrooms", rec.bathrooms),
        ("sqft_living", rec.sqft_living),
        ("sqft_lot", rec.sqft_lot),
        ("floors", rec.floors),
        ("waterfront", rec.waterfront),
        ("sqft_above", rec.sqft_above),
        ("sqft_basement", rec.sqft_basement),
        ("lat", rec.lat),
        ("long", rec.long),
    ];
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(column, _)) => Err(PipelineError::NonFiniteValue { id: rec.id, column }),
        None => Ok(()),
    }
}

/// Parse a listing date. `%Y%m%dT%H%M%S` values keep only the date part.
pub fn parse_date(id: i64, value: &str) -> PipelineResult<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| PipelineError::MalformedDate {
            id,
            value: value.to_string(),
        })
}

/// Round half to even: 1.5 → 2, 2.5 → 2.
pub fn round_count(value: f64) -> i64 {
    value.round_ties_even() as i64
}
