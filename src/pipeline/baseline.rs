use std::collections::BTreeMap;

use crate::data::model::Property;
use crate::error::{PipelineError, PipelineResult};

/// Median of a price group; midpoint of the two middle values for even
/// sizes. `None` for an empty group.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Median listing price per zip code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZipMedians {
    medians: BTreeMap<u32, f64>,
}

impl ZipMedians {
    pub fn compute(properties: &[Property]) -> Self {
        let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for p in properties {
            groups.entry(p.zipcode).or_default().push(p.price);
        }

        let medians: BTreeMap<u32, f64> = groups
            .into_iter()
            .filter_map(|(zip, prices)| median(prices).map(|m| (zip, m)))
            .collect();

        log::debug!("computed median price for {} zip codes", medians.len());
        ZipMedians { medians }
    }

    pub fn get(&self, zipcode: u32) -> Option<f64> {
        self.medians.get(&zipcode).copied()
    }

    /// The median used as a price-index denominator. Missing, NaN and zero
    /// medians are errors rather than a propagated NaN/inf.
    pub fn denominator(&self, zipcode: u32) -> PipelineResult<f64> {
        match self.get(zipcode) {
            Some(m) if m.is_finite() && m != 0.0 => Ok(m),
            _ => Err(PipelineError::UndefinedZipMedian { zipcode }),
        }
    }

    /// Zip codes ordered by median price, most expensive first.
    pub fn ranked(&self) -> Vec<(u32, f64)> {
        let mut ranked: Vec<(u32, f64)> = self.medians.iter().map(|(z, m)| (*z, *m)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn len(&self) -> usize {
        self.medians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medians.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::property;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(vec![300.0, 100.0, 200.0]), Some(200.0));
        assert_eq!(median(vec![200.0, 100.0]), Some(150.0));
        assert_eq!(median(vec![]), None);
    }

    #[test]
    fn test_zip_medians_grouped() {
        let props = vec![
            property(1, 98001, "2014-07-01", 100.0),
            property(2, 98001, "2014-07-02", 150.0),
            property(3, 98001, "2014-07-03", 300.0),
            property(4, 98002, "2014-07-04", 400.0),
            property(5, 98002, "2014-07-05", 500.0),
        ];
        let medians = ZipMedians::compute(&props);
        assert_eq!(medians.len(), 2);
        assert_eq!(medians.get(98001), Some(150.0));
        assert_eq!(medians.get(98002), Some(450.0));
        assert_eq!(medians.ranked()[0], (98002, 450.0));
    }

    #[test]
    fn test_zero_median_is_an_error() {
        let props = vec![property(1, 98003, "2014-07-01", 0.0)];
        let medians = ZipMedians::compute(&props);
        assert_eq!(
            medians.denominator(98003),
            Err(PipelineError::UndefinedZipMedian { zipcode: 98003 })
        );
        assert_eq!(
            medians.denominator(99999),
            Err(PipelineError::UndefinedZipMedian { zipcode: 99999 })
        );
    }
}
