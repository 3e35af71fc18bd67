//! Exploratory statistics over the recommendation table.
//!
//! Each hypothesis groups the rows by a derived category label and reduces
//! one numeric field per group. Groups come back in label order.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use statrs::statistics::Statistics;

use crate::data::model::{Recommendation, Waterfront};

/// One group of a hypothesis and its reduced value.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStat {
    pub label: String,
    pub value: f64,
}

/// Mean price of one calendar month and its change from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyVariation {
    /// First day of the month.
    pub month: NaiveDate,
    pub mean_price: f64,
    pub variation_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Findings {
    Groups(Vec<CategoryStat>),
    Monthly(Vec<MonthlyVariation>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub code: &'static str,
    pub statement: &'static str,
    /// Name of the reduced value, used as the chart axis label.
    pub metric: &'static str,
    pub chart: ChartKind,
    pub findings: Findings,
}

impl Hypothesis {
    pub fn groups(&self) -> &[CategoryStat] {
        match &self.findings {
            Findings::Groups(g) => g,
            Findings::Monthly(_) => &[],
        }
    }

    pub fn group(&self, label: &str) -> Option<f64> {
        self.groups().iter().find(|g| g.label == label).map(|g| g.value)
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.code, self.statement)?;
        match &self.findings {
            Findings::Groups(groups) => {
                for g in groups {
                    writeln!(f, "    {:<16} {}={}", g.label, self.metric, g.value)?;
                }
            }
            Findings::Monthly(months) => {
                for m in months {
                    writeln!(
                        f,
                        "    {}  mean_price={:.2}  variation_pct={:.2}",
                        m.month.format("%m-%Y"),
                        m.mean_price,
                        m.variation_pct
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Compute H1-H10 in order.
pub fn compute(rows: &[Recommendation]) -> Vec<Hypothesis> {
    vec![
        waterfront_premium(rows),
        built_before_1980(rows),
        basement_lot_area(rows),
        yearly_price(rows),
        bathroom_monthly_growth(rows),
        single_bedroom_discount(rows),
        yearly_supply(rows),
        bedroom_price_spread(rows),
        renovation_condition(rows),
        recent_renovation_condition(rows),
    ]
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

fn group_values<K, V>(rows: &[Recommendation], key: K, value: V) -> BTreeMap<String, Vec<f64>>
where
    K: Fn(&Recommendation) -> Option<String>,
    V: Fn(&Recommendation) -> f64,
{
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(label) = key(row) {
            groups.entry(label).or_default().push(value(row));
        }
    }
    groups
}

fn reduce<F>(groups: BTreeMap<String, Vec<f64>>, f: F) -> Vec<CategoryStat>
where
    F: Fn(&[f64]) -> f64,
{
    groups
        .into_iter()
        .map(|(label, values)| CategoryStat {
            value: f(&values),
            label,
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

fn rounded_mean(values: &[f64]) -> f64 {
    round2(mean(values))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn label(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn groups(stats: Vec<CategoryStat>) -> Findings {
    Findings::Groups(stats)
}

// ---------------------------------------------------------------------------
// Hypotheses
// ---------------------------------------------------------------------------

fn waterfront_premium(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(rows, |r| label(r.waterfront.label()), |r| r.price);
    Hypothesis {
        code: "H1",
        statement: "Properties with a waterfront are 20% more expensive, on average, than those without",
        metric: "mean_price",
        chart: ChartKind::Bar,
        findings: groups(reduce(g, rounded_mean)),
    }
}

fn built_before_1980(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(
        rows,
        |r| label(if r.yr_built < 1980 { "before_1980" } else { "after_1980" }),
        |r| r.price,
    );
    Hypothesis {
        code: "H2",
        statement: "Properties built before 1980 are 55% cheaper on average",
        metric: "mean_price",
        chart: ChartKind::Bar,
        findings: groups(reduce(g, rounded_mean)),
    }
}

fn basement_lot_area(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(
        rows,
        |r| {
            label(if r.sqft_basement == 0.0 {
                "no_basement"
            } else if r.sqft_basement >= 1.0 {
                "basement"
            } else {
                "NA"
            })
        },
        |r| r.sqft_lot,
    );
    Hypothesis {
        code: "H3",
        statement: "Properties without a basement have 40% more lot area than those with one",
        metric: "mean_sqft_lot_area",
        chart: ChartKind::Bar,
        findings: groups(reduce(g, rounded_mean)),
    }
}

fn yearly_price(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(rows, |r| Some(r.date.year().to_string()), |r| r.price);
    Hypothesis {
        code: "H4",
        statement: "Year over year property price growth is 10%",
        metric: "mean_price",
        chart: ChartKind::Bar,
        findings: groups(reduce(g, rounded_mean)),
    }
}

fn bathroom_monthly_growth(rows: &[Recommendation]) -> Hypothesis {
    let mut by_month: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for r in rows.iter().filter(|r| r.bathrooms >= 3) {
        if let Some(month) = r.date.with_day(1) {
            by_month.entry(month).or_default().push(r.price);
        }
    }
    Hypothesis {
        code: "H5",
        statement: "Properties with 3 or more bathrooms have a 15% month over month price growth",
        metric: "variation_pct",
        chart: ChartKind::Line,
        findings: Findings::Monthly(monthly_variation(by_month)),
    }
}

/// `(p[i] - p[i-1]) / p[i] * 100` over consecutive months, 0 for the first.
pub fn monthly_variation(by_month: BTreeMap<NaiveDate, Vec<f64>>) -> Vec<MonthlyVariation> {
    let mut out: Vec<MonthlyVariation> = Vec::with_capacity(by_month.len());
    for (month, prices) in by_month {
        let mean_price = mean(&prices);
        let variation_pct = match out.last() {
            Some(prev) => (mean_price - prev.mean_price) / mean_price * 100.0,
            None => 0.0,
        };
        out.push(MonthlyVariation {
            month,
            mean_price,
            variation_pct,
        });
    }
    out
}

fn single_bedroom_discount(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(
        rows,
        |r| match r.bedrooms {
            1 => label("one_bedroom"),
            n if n > 1 => label("two_or_more"),
            _ => None,
        },
        |r| r.price,
    );
    Hypothesis {
        code: "H6",
        statement: "Properties with 1 bedroom are 30% cheaper on average than properties with 2 or more",
        metric: "mean_price",
        chart: ChartKind::Bar,
        findings: groups(reduce(g, rounded_mean)),
    }
}

fn yearly_supply(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(rows, |r| Some(r.date.year().to_string()), |_| 1.0);
    Hypothesis {
        code: "H7",
        statement: "Total properties available for purchase grew 15% year over year",
        metric: "properties",
        chart: ChartKind::Pie,
        findings: groups(reduce(g, |v| v.len() as f64)),
    }
}

fn bedroom_price_spread(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(
        rows,
        |r| match r.bedrooms {
            0 => None,
            1 | 2 => label("one_or_two"),
            _ => label("more_than_two"),
        },
        |r| r.price,
    );
    Hypothesis {
        code: "H8",
        statement: "The price standard deviation of properties with more than 2 bedrooms is 40% lower than the others",
        metric: "price_std_dev",
        chart: ChartKind::Bar,
        findings: groups(reduce(g, |v| round2(v.iter().std_dev()))),
    }
}

fn renovation_condition(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(
        rows,
        |r| label(if r.yr_renovated > 0 { "renovated" } else { "no_renovated" }),
        |r| if matches!(r.condition, 4 | 5) { 1.0 } else { 0.0 },
    );
    Hypothesis {
        code: "H9",
        statement: "Renovated properties are 50% more often in good condition than non-renovated ones",
        metric: "good_condition_share",
        chart: ChartKind::Table,
        findings: groups(reduce(g, mean)),
    }
}

fn recent_renovation_condition(rows: &[Recommendation]) -> Hypothesis {
    let g = group_values(
        rows,
        |r| label(if r.yr_renovated >= 1980 { "renovated" } else { "no_renovated" }),
        |r| if matches!(r.condition, 3..=5) { 1.0 } else { 0.0 },
    );
    Hypothesis {
        code: "H10",
        statement: "Properties renovated from 1980 onwards are 50% more often in good condition than all others",
        metric: "good_condition_share",
        chart: ChartKind::Table,
        findings: groups(reduce(g, mean)),
    }
}

/// Count of waterfront rows; the dashboard header uses it next to H1.
pub fn waterfront_count(rows: &[Recommendation]) -> usize {
    rows.iter().filter(|r| r.waterfront == Waterfront::Yes).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::raw;
    use crate::pipeline::run;
    use approx::assert_relative_eq;

    fn rows() -> Vec<Recommendation> {
        let mut a = raw(1, "2014-05-10", 100.0);
        a.waterfront = 1.0;
        a.yr_built = 1950;
        a.bedrooms = 1;
        a.bathrooms = 3.0;
        a.condition = 5;
        a.yr_renovated = 1990;

        let mut b = raw(2, "2014-06-10", 300.0);
        b.yr_built = 1990;
        b.bedrooms = 2;
        b.bathrooms = 3.0;
        b.sqft_basement = 400.0;
        b.sqft_lot = 1000.0;

        let mut c = raw(3, "2015-01-10", 500.0);
        c.yr_built = 2001;
        c.bedrooms = 4;
        c.condition = 2;

        let mut d = raw(4, "2015-02-10", 700.0);
        d.bedrooms = 0;
        d.bathrooms = 3.0;
        d.condition = 4;

        run(&[a, b, c, d]).unwrap().recommendations
    }

    fn by_code<'a>(hs: &'a [Hypothesis], code: &str) -> &'a Hypothesis {
        hs.iter().find(|h| h.code == code).unwrap()
    }

    #[test]
    fn test_ten_hypotheses_in_order() {
        let hs = compute(&rows());
        let codes: Vec<&str> = hs.iter().map(|h| h.code).collect();
        assert_eq!(
            codes,
            vec!["H1", "H2", "H3", "H4", "H5", "H6", "H7", "H8", "H9", "H10"]
        );
    }

    #[test]
    fn test_group_means() {
        let hs = compute(&rows());
        let h1 = by_code(&hs, "H1");
        assert_eq!(h1.group("yes"), Some(100.0));
        assert_eq!(h1.group("no"), Some(500.0));
        // labels sorted
        assert_eq!(h1.groups()[0].label, "no");

        let h2 = by_code(&hs, "H2");
        assert_eq!(h2.group("before_1980"), Some(400.0));
        assert_eq!(h2.group("after_1980"), Some(400.0));

        let h3 = by_code(&hs, "H3");
        assert_eq!(h3.group("basement"), Some(1000.0));
        assert_eq!(h3.group("no_basement"), Some(5650.0));

        let h4 = by_code(&hs, "H4");
        assert_eq!(h4.group("2014"), Some(200.0));
        assert_eq!(h4.group("2015"), Some(600.0));
    }

    #[test]
    fn test_bedroom_groups_drop_zero() {
        let hs = compute(&rows());
        let h6 = by_code(&hs, "H6");
        assert_eq!(h6.groups().len(), 2);
        assert_eq!(h6.group("one_bedroom"), Some(100.0));
        assert_eq!(h6.group("two_or_more"), Some(400.0));

        let h8 = by_code(&hs, "H8");
        assert_relative_eq!(h8.group("one_or_two").unwrap(), 141.42);
        assert!(h8.group("more_than_two").unwrap().is_nan());
    }

    #[test]
    fn test_counts_and_shares() {
        let hs = compute(&rows());
        let h7 = by_code(&hs, "H7");
        assert_eq!(h7.group("2014"), Some(2.0));
        assert_eq!(h7.group("2015"), Some(2.0));

        let h9 = by_code(&hs, "H9");
        assert_eq!(h9.group("renovated"), Some(1.0));
        assert_relative_eq!(h9.group("no_renovated").unwrap(), 1.0 / 3.0);

        let h10 = by_code(&hs, "H10");
        assert_eq!(h10.group("renovated"), Some(1.0));
        assert_relative_eq!(h10.group("no_renovated").unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_monthly_variation_divides_by_current_month() {
        let mut by_month = BTreeMap::new();
        let jan = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2014, 2, 1).unwrap();
        by_month.insert(feb, vec![200.0]);
        by_month.insert(jan, vec![100.0, 200.0]);
        let series = monthly_variation(by_month);
        assert_eq!(series[0].month, jan);
        assert_eq!(series[0].variation_pct, 0.0);
        assert_relative_eq!(series[1].variation_pct, 25.0);
    }

    #[test]
    fn test_bathroom_filter_in_h5() {
        let hs = compute(&rows());
        let Findings::Monthly(series) = &by_code(&hs, "H5").findings else {
            panic!("H5 is a monthly series");
        };
        // rows a (May 2014), b (June 2014), d (Feb 2015) have 3 bathrooms
        assert_eq!(series.len(), 3);
        assert!(hs[4].to_string().contains("05-2014"));
        assert_eq!(waterfront_count(&rows()), 1);
    }
}
