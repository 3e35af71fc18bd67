use std::collections::BTreeSet;

use super::model::{BuyFlag, Recommendation};

// ---------------------------------------------------------------------------
// Filter predicate: purchasable flag + zip-code selection
// ---------------------------------------------------------------------------

/// Display filters over the recommendation table.
/// An empty `zipcodes` set means "no zip filter" (show every zip code).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Show only rows flagged "buy".
    pub purchasable_only: bool,
    /// Selected zip codes.
    pub zipcodes: BTreeSet<u32>,
}

impl FilterState {
    fn accepts(&self, row: &Recommendation) -> bool {
        if self.purchasable_only && row.buy != BuyFlag::Buy {
            return false;
        }
        self.zipcodes.is_empty() || self.zipcodes.contains(&row.zipcode)
    }
}

/// Sorted set of zip codes present in the table, for the selector widget.
pub fn unique_zipcodes(rows: &[Recommendation]) -> BTreeSet<u32> {
    rows.iter().map(|r| r.zipcode).collect()
}

/// Return indices of rows that pass the filters, in display order.
///
/// With `purchasable_only` the rows are ordered waterfront first, then by
/// ascending price index (stable). Otherwise table order is kept.
pub fn filtered_indices(rows: &[Recommendation], filters: &FilterState) -> Vec<usize> {
    let mut indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| filters.accepts(row))
        .map(|(i, _)| i)
        .collect();

    if filters.purchasable_only {
        indices.sort_by(|&a, &b| {
            let (ra, rb) = (&rows[a], &rows[b]);
            rb.waterfront
                .cmp(&ra.waterfront)
                .then(ra.price_index.total_cmp(&rb.price_index))
        });
    }
    indices
}

/// `sum(proposed_price) - sum(price)` over the selected rows, rounded to
/// three decimals.
pub fn potential_profit(rows: &[Recommendation], indices: &[usize]) -> f64 {
    let proposed: f64 = indices.iter().map(|&i| rows[i].proposed_price).sum();
    let paid: f64 = indices.iter().map(|&i| rows[i].price).sum();
    ((proposed - paid) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Waterfront;
    use crate::pipeline::fixtures::raw;
    use crate::pipeline::run;

    fn table() -> Vec<Recommendation> {
        let specs = [
            (1, 98001, 100.0, 0.0),
            (2, 98001, 150.0, 0.0),
            (3, 98001, 300.0, 1.0),
            (4, 98002, 400.0, 0.0),
            (5, 98002, 200.0, 1.0),
            (6, 98002, 600.0, 0.0),
            (7, 98001, 120.0, 1.0),
        ];
        let rows: Vec<_> = specs
            .iter()
            .map(|&(id, zip, price, wf)| {
                let mut r = raw(id, "2014-07-01", price);
                r.zipcode = zip;
                r.waterfront = wf;
                r
            })
            .collect();
        run(&rows).unwrap().recommendations
    }

    #[test]
    fn test_no_filter_keeps_order() {
        let rows = table();
        let idx = filtered_indices(&rows, &FilterState::default());
        assert_eq!(idx, (0..rows.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_purchasable_sorted_waterfront_first() {
        let rows = table();
        let filters = FilterState {
            purchasable_only: true,
            ..Default::default()
        };
        let idx = filtered_indices(&rows, &filters);
        let ids: Vec<i64> = idx.iter().map(|&i| rows[i].id).collect();
        // medians: 98001 → 135, 98002 → 400
        assert_eq!(ids, vec![5, 7, 1]);
        assert_eq!(rows[idx[0]].waterfront, Waterfront::Yes);
        assert!(idx.iter().all(|&i| rows[i].buy == BuyFlag::Buy));
    }

    #[test]
    fn test_zip_filter_without_purchasable() {
        let rows = table();
        let filters = FilterState {
            purchasable_only: false,
            zipcodes: [98002].into_iter().collect(),
        };
        let ids: Vec<i64> = filtered_indices(&rows, &filters)
            .iter()
            .map(|&i| rows[i].id)
            .collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn test_purchasable_and_zip() {
        let rows = table();
        let filters = FilterState {
            purchasable_only: true,
            zipcodes: [98001].into_iter().collect(),
        };
        let ids: Vec<i64> = filtered_indices(&rows, &filters)
            .iter()
            .map(|&i| rows[i].id)
            .collect();
        assert_eq!(ids, vec![7, 1]);
    }

    #[test]
    fn test_potential_profit() {
        let rows = table();
        let filters = FilterState {
            purchasable_only: true,
            ..Default::default()
        };
        let idx = filtered_indices(&rows, &filters);
        // every buy row gets the 1.3 markup: 0.3 * (200 + 120 + 100)
        assert_eq!(potential_profit(&rows, &idx), 126.0);
        assert_eq!(unique_zipcodes(&rows).len(), 2);
    }
}
