//! Turns per-country timelines into chart-ready rows.
//!
//! For every country the newest record with a positive right-hand metric is
//! the anchor; the left-hand metric comes from the newest record at or
//! before the anchor's date. Countries missing either side are dropped.
//! The shared right-axis bound is widened over the qualifying countries
//! with the power-of-ten banding rule, and the left values are rescaled
//! against it so both series share one axis.

use std::cmp::Ordering;

use crate::owid_structs::{CountryData, DailyRecord, Dataset};

pub type Extractor = fn(&DailyRecord) -> Option<f64>;
pub type Formatter = fn(f64) -> String;
pub type PostProcess = fn(DailyRecord, &str, &CountryData) -> DailyRecord;

/// One left/right metric pairing: how to pull both values out of a daily
/// record, how to print them, and what to call them on the axis.
#[derive(Clone)]
pub struct MetricSpec {
    pub label_left: &'static str,
    pub label_right: &'static str,
    pub extract_left: Extractor,
    pub extract_right: Extractor,
    pub format_left: Formatter,
    pub format_right: Formatter,
    pub post: Option<PostProcess>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarSide {
    Left = 0,
    Right = 1,
}

/// One renderable bar. Left-side rows carry the negated, rescaled left
/// value; right-side rows carry the raw right value. The id is the
/// country's display name.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartRow {
    pub id: String,
    pub value: f64,
    pub side: BarSide,
    pub title: String,
    pub date: String,
    pub left_value: f64,
    pub right_value: f64,
}

impl ChartRow {
    pub fn side_tag(&self) -> u8 {
        self.side as u8
    }
}

pub const DEFAULT_MAX_LEFT: f64 = 100.0;

/// Shared axis scale, threaded through the country loop instead of living
/// in globals. `max_left` is the fixed left-axis ceiling; `max_right`
/// only ever widens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleState {
    pub max_left: f64,
    pub max_right: f64,
}

impl ScaleState {
    pub fn new() -> Self {
        Self {
            max_left: DEFAULT_MAX_LEFT,
            max_right: 1.0,
        }
    }

    pub fn widen(&mut self, right: f64) {
        if right > self.max_right {
            self.max_right = band(right);
        }
    }

    pub fn scale_left(&self) -> f64 {
        self.max_right / self.max_left
    }

    pub fn x_domain(&self) -> [f64; 2] {
        [-self.max_right, self.max_right]
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest multiple of `10^floor(log10(r))` at or above `r`:
/// 85 -> 90, 5600 -> 6000, 90 -> 90.
fn band(r: f64) -> f64 {
    let step = 10f64.powi(r.log10().floor() as i32);
    (r / step).ceil() * step
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub sort: SortMode,
    pub reverse: bool,
    pub max_date: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            sort: SortMode::Left,
            reverse: false,
            max_date: None,
        }
    }
}

fn positive(value: Option<f64>) -> bool {
    value.map_or(false, |v| v.is_finite() && v > 0.0)
}

struct CountryPoint {
    name: String,
    date: String,
    left: f64,
    right: f64,
}

fn select_point(
    code: &str,
    cdata: &CountryData,
    spec: &MetricSpec,
    max_date: Option<&str>,
) -> Option<CountryPoint> {
    let mut timeline: Vec<&DailyRecord> = cdata
        .data
        .iter()
        .filter(|d| max_date.map_or(true, |cutoff| d.date.as_str() < cutoff))
        .collect();
    timeline.sort_by(|a, b| b.date.cmp(&a.date));

    let anchor = *timeline
        .iter()
        .find(|d| positive((spec.extract_right)(d)))?;
    let left_rec = *timeline
        .iter()
        .find(|d| d.date <= anchor.date && positive((spec.extract_left)(d)))?;

    let mut merged = anchor.merged_onto(left_rec);
    if let Some(post) = spec.post {
        merged = post(merged, code, cdata);
    }

    // re-extract from the merged record: anchor fields win, so a conflicting
    // anchor value can still disqualify the country here
    let left = (spec.extract_left)(&merged).filter(|v| v.is_finite() && *v > 0.0)?;
    let right = (spec.extract_right)(&merged).filter(|v| v.is_finite() && *v > 0.0)?;

    Some(CountryPoint {
        name: cdata.display_name(code),
        date: merged.date,
        left,
        right,
    })
}

/// Compute the full row sequence and the scale it was built against.
pub fn build_chart_rows(
    owid: &Dataset,
    countries: &[&str],
    spec: &MetricSpec,
    opts: &ChartOptions,
) -> (Vec<ChartRow>, ScaleState) {
    let mut scale = ScaleState::new();
    let mut points = Vec::new();
    for code in countries {
        let Some(cdata) = owid.get(*code) else {
            continue;
        };
        let Some(point) = select_point(code, cdata, spec, opts.max_date.as_deref()) else {
            continue;
        };
        scale.widen(point.right);
        points.push(point);
    }

    let mut rows = Vec::with_capacity(points.len() * 2);
    for p in &points {
        rows.push(ChartRow {
            id: p.name.clone(),
            value: -p.left * scale.scale_left(),
            side: BarSide::Left,
            title: format!("{} @ {}", (spec.format_left)(p.left), p.date),
            date: p.date.clone(),
            left_value: p.left,
            right_value: p.right,
        });
        rows.push(ChartRow {
            id: p.name.clone(),
            value: p.right,
            side: BarSide::Right,
            title: (spec.format_right)(p.right),
            date: p.date.clone(),
            left_value: p.left,
            right_value: p.right,
        });
    }

    match opts.sort {
        SortMode::Left => rows.sort_by(|a, b| desc(a.left_value, b.left_value)),
        SortMode::Right => rows.sort_by(|a, b| desc(a.right_value, b.right_value)),
    }

    if opts.reverse {
        rows.reverse();
    } else {
        swap_leading_pair(&mut rows);
    }

    (rows, scale)
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Swap the first two rows so the renderer's ordinal color scale picks up
/// the series colors in the opposite order. Purely cosmetic.
fn swap_leading_pair(rows: &mut [ChartRow]) {
    if rows.len() >= 2 {
        rows.swap(0, 1);
    }
}
