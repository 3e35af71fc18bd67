use std::collections::BTreeMap;

use chrono::Datelike;

use crate::data::model::{Property, Season};
use crate::pipeline::baseline::median;

/// Season in which a property was listed for purchase.
pub fn purchase_season(property: &Property) -> Season {
    Season::from_month(property.date.month())
}

/// Per-zip seasonal aggregates: the dominant season(s) and the median
/// price of every (zip, season) group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonProfile {
    dominant: BTreeMap<u32, Vec<Season>>,
    medians: BTreeMap<(u32, Season), f64>,
}

impl SeasonProfile {
    pub fn compute(properties: &[Property]) -> Self {
        let mut counts: BTreeMap<(u32, Season), usize> = BTreeMap::new();
        let mut prices: BTreeMap<(u32, Season), Vec<f64>> = BTreeMap::new();

        for p in properties {
            let key = (p.zipcode, purchase_season(p));
            *counts.entry(key).or_default() += 1;
            prices.entry(key).or_default().push(p.price);
        }

        let dominant = dominant_seasons(&counts);
        let medians: BTreeMap<(u32, Season), f64> = prices
            .into_iter()
            .filter_map(|(key, group)| median(group).map(|m| (key, m)))
            .collect();

        let ties = dominant.values().filter(|s| s.len() > 1).count();
        if ties > 0 {
            log::warn!(
                "{ties} zip codes have tied dominant seasons; their properties get one row per season"
            );
        }
        log::debug!(
            "season profile: {} (zip, season) groups across {} zip codes",
            medians.len(),
            dominant.len()
        );

        SeasonProfile {
            dominant,
            medians,
        }
    }

    /// Most frequent listing season(s) of a zip code, in label order.
    /// Every season sharing the maximum count is kept.
    pub fn dominant(&self, zipcode: u32) -> &[Season] {
        self.dominant
            .get(&zipcode)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Median price of the properties listed in `season` within `zipcode`.
    pub fn median(&self, zipcode: u32, season: Season) -> Option<f64> {
        self.medians.get(&(zipcode, season)).copied()
    }
}

fn dominant_seasons(counts: &BTreeMap<(u32, Season), usize>) -> BTreeMap<u32, Vec<Season>> {
    let mut max_per_zip: BTreeMap<u32, usize> = BTreeMap::new();
    for (&(zip, _), &n) in counts {
        let max = max_per_zip.entry(zip).or_default();
        *max = (*max).max(n);
    }

    let mut dominant: BTreeMap<u32, Vec<Season>> = BTreeMap::new();
    // BTreeMap iteration yields seasons in label order within each zip.
    for (&(zip, season), &n) in counts {
        if max_per_zip.get(&zip) == Some(&n) {
            dominant.entry(zip).or_default().push(season);
        }
    }
    dominant
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::property;

    #[test]
    fn test_purchase_season() {
        assert_eq!(purchase_season(&property(1, 98001, "2014-07-15", 1.0)), Season::Summer);
        assert_eq!(purchase_season(&property(1, 98001, "2014-12-01", 1.0)), Season::Winter);
    }

    #[test]
    fn test_dominant_season_single() {
        let props = vec![
            property(1, 98001, "2014-07-01", 100.0),
            property(2, 98001, "2014-08-01", 200.0),
            property(3, 98001, "2014-12-01", 300.0),
        ];
        let profile = SeasonProfile::compute(&props);
        assert_eq!(profile.dominant(98001), &[Season::Summer]);
        assert_eq!(profile.median(98001, Season::Summer), Some(150.0));
        assert_eq!(profile.median(98001, Season::Spring), None);
    }

    #[test]
    fn test_dominant_season_ties_keep_all() {
        let props = vec![
            property(1, 98002, "2014-12-01", 100.0),
            property(2, 98002, "2014-04-01", 200.0),
            property(3, 98002, "2014-10-01", 300.0),
            property(4, 98002, "2015-01-20", 400.0),
            property(5, 98002, "2014-05-03", 500.0),
        ];
        let profile = SeasonProfile::compute(&props);
        assert_eq!(profile.dominant(98002), &[Season::Spring, Season::Winter]);
        assert!(profile.dominant(11111).is_empty());
    }

    #[test]
    fn test_zip_season_median_uses_own_season() {
        let props = vec![
            property(1, 98003, "2014-07-01", 100.0),
            property(2, 98003, "2014-07-09", 300.0),
            property(3, 98003, "2014-11-01", 900.0),
        ];
        let profile = SeasonProfile::compute(&props);
        assert_eq!(profile.median(98003, Season::Summer), Some(200.0));
        assert_eq!(profile.median(98003, Season::Autumn), Some(900.0));
        assert_eq!(profile.median(98003, Season::Winter), None);
    }
}
