//! The fixed set of metric pairings behind the published charts. Every
//! pairing compares vaccination progress (or a blend including it) on the
//! left against an outcome metric on the right.

use crate::chart_data::{ChartOptions, MetricSpec, SortMode};
use crate::owid_structs::DailyRecord;

pub const LABEL_VACCINATED: &str = "Percentage of population fully vaccinated";

fn vaccinated(d: &DailyRecord) -> Option<f64> {
    d.people_fully_vaccinated_per_hundred
}

fn total_deaths(d: &DailyRecord) -> Option<f64> {
    d.total_deaths_per_million
}

fn excess_mortality(d: &DailyRecord) -> Option<f64> {
    d.excess_mortality_cumulative_per_million
}

fn total_cases(d: &DailyRecord) -> Option<f64> {
    d.total_cases_per_million
}

fn new_cases(d: &DailyRecord) -> Option<f64> {
    d.new_cases_per_million
}

// per-million smoothed dailies, re-expressed as a weekly rate per 100.000
fn new_cases_weekly_per_100k(d: &DailyRecord) -> Option<f64> {
    d.new_cases_smoothed_per_million.map(|v| v / 10.0 * 7.0)
}

fn vacc_stringency_blend(d: &DailyRecord) -> Option<f64> {
    match (d.stringency_index, d.people_fully_vaccinated_per_hundred) {
        (Some(s), Some(v)) => Some(s * 5.0 / 10.0 + v * 5.0 / 10.0),
        _ => None,
    }
}

pub fn percent(v: f64) -> String {
    format!("{}%", v.trunc() as i64)
}

pub fn plain(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

fn vacc_spec(label_right: &'static str, extract_right: fn(&DailyRecord) -> Option<f64>) -> MetricSpec {
    MetricSpec {
        label_left: LABEL_VACCINATED,
        label_right,
        extract_left: vaccinated,
        extract_right,
        format_left: percent,
        format_right: plain,
        post: None,
    }
}

pub fn specs() -> Vec<MetricSpec> {
    vec![
        vacc_spec("Total deaths related to COVID-19 (per million)", total_deaths),
        vacc_spec(
            "Excess mortality since January 2020 (per million)",
            excess_mortality,
        ),
        vacc_spec("Total COVID-19 cases (per million)", total_cases),
        vacc_spec("New COVID-19 cases (per million)", new_cases),
        vacc_spec(
            "New COVID-19 cases, 7-day smoothed (per 100.000)",
            new_cases_weekly_per_100k,
        ),
        MetricSpec {
            label_left: "Vaccrate + Stringency Index",
            label_right: "Total deaths related to COVID-19 (per million)",
            extract_left: vacc_stringency_blend,
            extract_right: total_deaths,
            format_left: plain,
            format_right: plain,
            post: None,
        },
    ]
}

/// Every published chart: each spec rendered twice, first reversed, then
/// re-sorted by the right-hand metric.
pub fn chart_variants() -> Vec<(MetricSpec, ChartOptions)> {
    let mut variants = Vec::new();
    for spec in specs() {
        variants.push((
            spec.clone(),
            ChartOptions {
                reverse: true,
                ..Default::default()
            },
        ));
        variants.push((
            spec,
            ChartOptions {
                sort: SortMode::Right,
                ..Default::default()
            },
        ));
    }
    variants
}
