use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawRecord – one row as it comes out of the source file
// ---------------------------------------------------------------------------

/// A listing row before normalization.
///
/// Field names match the King County export columns. Counts that the
/// source stores as floats (`bathrooms`, `floors`) and the 0/1 waterfront
/// indicator are kept as-is; the date is kept as text so the normalizer
/// decides how to parse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    pub date: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub floors: f64,
    pub waterfront: f64,
    pub condition: u8,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Waterfront indicator recoded to a readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waterfront {
    No,
    Yes,
}

impl Waterfront {
    /// 0 → "no", anything else → "yes".
    pub fn from_indicator(value: f64) -> Self {
        if value == 0.0 {
            Waterfront::No
        } else {
            Waterfront::Yes
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Waterfront::No => "no",
            Waterfront::Yes => "yes",
        }
    }
}

impl fmt::Display for Waterfront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar season. Variants are declared in label order so that sorted
/// collections list seasons the way a sorted group-by on the label does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Autumn,
    Spring,
    Summer,
    Winter,
}

impl Season {
    /// Fixed month → season mapping (1 = January).
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Autumn => "autumn",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Purchase recommendation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuyFlag {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "don't buy")]
    DontBuy,
}

impl BuyFlag {
    /// Strictly below the zip median is a buy; an index of exactly 1.0 is not.
    pub fn from_price_index(price_index: f64) -> Self {
        if price_index < 1.0 {
            BuyFlag::Buy
        } else {
            BuyFlag::DontBuy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuyFlag::Buy => "buy",
            BuyFlag::DontBuy => "don't buy",
        }
    }
}

impl fmt::Display for BuyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Property – one normalized row
// ---------------------------------------------------------------------------

/// A deduplicated, type-corrected listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: i64,
    pub date: NaiveDate,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: i64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub floors: i64,
    pub waterfront: Waterfront,
    pub condition: u8,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
}

// ---------------------------------------------------------------------------
// Recommendation – one exported row
// ---------------------------------------------------------------------------

/// One row of the recommendation table.
///
/// Field order is the export column order: serializing through `csv`
/// writes exactly this projection, header included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub buy: BuyFlag,
    pub id: i64,
    pub price: f64,
    pub proposed_price: f64,
    pub sell_when: Season,
    pub price_index: f64,
    pub bedrooms: u32,
    pub bathrooms: i64,
    pub sqft_living: f64,
    pub sqft_lot: f64,
    pub floors: i64,
    pub waterfront: Waterfront,
    pub condition: u8,
    pub sqft_above: f64,
    pub sqft_basement: f64,
    pub yr_built: i32,
    pub yr_renovated: i32,
    pub date: NaiveDate,
    pub zipcode: u32,
    pub lat: f64,
    pub long: f64,
}

/// Export column names, in order.
pub const EXPORT_COLUMNS: [&str; 21] = [
    "buy",
    "id",
    "price",
    "proposed_price",
    "sell_when",
    "price_index",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "sqft_lot",
    "floors",
    "waterfront",
    "condition",
    "sqft_above",
    "sqft_basement",
    "yr_built",
    "yr_renovated",
    "date",
    "zipcode",
    "lat",
    "long",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(11), Season::Autumn);
    }

    #[test]
    fn test_buy_flag_boundary() {
        assert_eq!(BuyFlag::from_price_index(1.0), BuyFlag::DontBuy);
        assert_eq!(BuyFlag::from_price_index(0.999999), BuyFlag::Buy);
        assert_eq!(BuyFlag::from_price_index(2.0), BuyFlag::DontBuy);
    }

    #[test]
    fn test_waterfront_recoding() {
        assert_eq!(Waterfront::from_indicator(0.0), Waterfront::No);
        assert_eq!(Waterfront::from_indicator(1.0), Waterfront::Yes);
        assert_eq!(Waterfront::from_indicator(3.0).label(), "yes");
    }

    #[test]
    fn test_labels_sort_like_strings() {
        let mut seasons = vec![Season::Winter, Season::Summer, Season::Spring, Season::Autumn];
        seasons.sort();
        let labels: Vec<&str> = seasons.iter().map(|s| s.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);

        assert!(Waterfront::Yes > Waterfront::No);
    }
}
