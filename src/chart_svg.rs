//! Diverging horizontal bar chart rendered to a self-contained SVG string.
//!
//! Left-series rows carry negative values and grow leftwards from the zero
//! line, right-series rows grow rightwards. One lane per distinct row id,
//! in first-appearance order. Series colors are assigned to the row type
//! tags in first-appearance order as well, which is what the upstream
//! swap-of-the-leading-pair toggles.

use crate::chart_data::{BarSide, ChartRow};

const MARGIN_LEFT: f64 = 120.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 24.0;
const BAR_PAD: f64 = 4.0;
const TICK_COUNT: usize = 10; // tick positions = TICK_COUNT + 1

const PALETTE: [&str; 2] = ["#1f77b4", "#ff7f0e"];
const GRID_COLOR: &str = "#dddddd";
const ZERO_COLOR: &str = "#555555";
const TEXT_COLOR: &str = "#222222";
const FAINT_TEXT_COLOR: &str = "#777777";
const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

pub struct BarChart<'a> {
    pub x_domain: [f64; 2],
    pub x_format: &'a dyn Fn(f64) -> String,
    pub x_label_left: &'a str,
    pub x_label: &'a str,
    pub x_label_right: &'a str,
    pub x_label_bottom_right: &'a str,
    pub width: u32,
    pub height: u32,
}

impl BarChart<'_> {
    pub fn render(&self, rows: &[ChartRow]) -> String {
        if rows.is_empty() {
            return empty_svg(self.width, self.height, "no data");
        }

        let w = self.width as f64;
        let h = self.height as f64;
        let plot_left = MARGIN_LEFT;
        let plot_right = w - MARGIN_RIGHT;
        let plot_top = MARGIN_TOP;
        let plot_bottom = h - MARGIN_BOTTOM;
        let [d0, d1] = self.x_domain;
        let span = d1 - d0;
        let x = |v: f64| plot_left + (v - d0) / span * (plot_right - plot_left);

        let mut lanes: Vec<&str> = Vec::new();
        for row in rows {
            if !lanes.iter().any(|id| *id == row.id) {
                lanes.push(&row.id);
            }
        }
        let lane_h = (plot_bottom - plot_top) / lanes.len() as f64;

        let mut side_order: Vec<BarSide> = Vec::new();
        for row in rows {
            if !side_order.contains(&row.side) {
                side_order.push(row.side);
            }
        }
        let color_of = |side: BarSide| {
            let pos = side_order.iter().position(|s| *s == side).unwrap_or(0);
            PALETTE[pos % PALETTE.len()]
        };

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"svg-chart\" \
             width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" \
             font-family=\"{FONT_FAMILY}\">",
            w = self.width,
            h = self.height,
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>");

        // gridlines and tick labels along the top edge of the plot area
        for i in 0..=TICK_COUNT {
            // kill fp drift so the formatters see round tick values
            let v = ((d0 + span * i as f64 / TICK_COUNT as f64) * 1e6).round() / 1e6;
            let tx = x(v);
            svg.push_str(&format!(
                "<line x1=\"{tx:.1}\" y1=\"{y1:.1}\" x2=\"{tx:.1}\" y2=\"{y2:.1}\" \
                 stroke=\"{GRID_COLOR}\" stroke-width=\"1\"/>",
                y1 = plot_top,
                y2 = plot_bottom,
            ));
            svg.push_str(&format!(
                "<text x=\"{tx:.1}\" y=\"{ty:.1}\" text-anchor=\"middle\" \
                 font-size=\"11\" fill=\"{FAINT_TEXT_COLOR}\">{label}</text>",
                ty = plot_top - 6.0,
                label = xml_escape(&(self.x_format)(v)),
            ));
        }

        // emphasized zero line
        let zero_x = x(0.0);
        svg.push_str(&format!(
            "<line x1=\"{zero_x:.1}\" y1=\"{y1:.1}\" x2=\"{zero_x:.1}\" y2=\"{y2:.1}\" \
             stroke=\"{ZERO_COLOR}\" stroke-width=\"1.5\"/>",
            y1 = plot_top,
            y2 = plot_bottom,
        ));

        // lane labels
        for (i, id) in lanes.iter().enumerate() {
            let cy = plot_top + (i as f64 + 0.5) * lane_h;
            svg.push_str(&format!(
                "<text x=\"{lx:.1}\" y=\"{ly:.1}\" text-anchor=\"end\" \
                 font-size=\"12\" fill=\"{TEXT_COLOR}\">{label}</text>",
                lx = plot_left - 8.0,
                ly = cy + 4.0,
                label = xml_escape(id),
            ));
        }

        // bars
        let bar_h = (lane_h - 2.0 * BAR_PAD).max(1.0);
        for row in rows {
            let lane_idx = lanes.iter().position(|id| *id == row.id).unwrap_or(0);
            let y = plot_top + lane_idx as f64 * lane_h + BAR_PAD;
            let v = row.value.clamp(d0, d1);
            let x0 = x(v.min(0.0));
            let x1 = x(v.max(0.0));
            svg.push_str(&format!(
                "<rect class=\"bar\" x=\"{x0:.1}\" y=\"{y:.1}\" width=\"{bw:.1}\" \
                 height=\"{bar_h:.1}\" fill=\"{fill}\"><title>{title}</title></rect>",
                bw = x1 - x0,
                fill = color_of(row.side),
                title = xml_escape(&row.title),
            ));
        }

        // header labels: left metric, the connective, right metric
        svg.push_str(&format!(
            "<text x=\"{lx:.1}\" y=\"16\" text-anchor=\"start\" font-size=\"13\" \
             fill=\"{TEXT_COLOR}\">{label}</text>",
            lx = plot_left,
            label = xml_escape(self.x_label_left),
        ));
        svg.push_str(&format!(
            "<text x=\"{cx:.1}\" y=\"16\" text-anchor=\"middle\" font-size=\"13\" \
             fill=\"{FAINT_TEXT_COLOR}\">{label}</text>",
            cx = (plot_left + plot_right) / 2.0,
            label = xml_escape(self.x_label),
        ));
        svg.push_str(&format!(
            "<text x=\"{rx:.1}\" y=\"16\" text-anchor=\"end\" font-size=\"13\" \
             fill=\"{TEXT_COLOR}\">{label}</text>",
            rx = plot_right,
            label = xml_escape(self.x_label_right),
        ));

        // update stamp, bottom right
        svg.push_str(&format!(
            "<text x=\"{rx:.1}\" y=\"{ry:.1}\" text-anchor=\"end\" font-size=\"10\" \
             fill=\"{FAINT_TEXT_COLOR}\">{label}</text>",
            rx = plot_right,
            ry = h - 8.0,
            label = xml_escape(self.x_label_bottom_right),
        ));

        svg.push_str("</svg>");
        svg
    }
}

fn empty_svg(width: u32, height: u32, message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"svg-chart\" width=\"{width}\" \
         height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"{FONT_FAMILY}\">\
         <text x=\"{cx}\" y=\"{cy}\" text-anchor=\"middle\" font-size=\"13\" \
         fill=\"{FAINT_TEXT_COLOR}\">{msg}</text></svg>",
        cx = width / 2,
        cy = height / 2,
        msg = xml_escape(message),
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod svg_test {
    use super::*;

    fn row(id: &str, value: f64, side: BarSide, title: &str) -> ChartRow {
        ChartRow {
            id: id.to_string(),
            value,
            side,
            title: title.to_string(),
            date: "2021-06-01".to_string(),
            left_value: 50.0,
            right_value: 85.0,
        }
    }

    fn chart(format: &dyn Fn(f64) -> String) -> BarChart<'_> {
        BarChart {
            x_domain: [-100.0, 100.0],
            x_format: format,
            x_label_left: "vaccinated",
            x_label: "vs.",
            x_label_right: "deaths",
            x_label_bottom_right: "Updated @ test",
            width: 1024,
            height: 540,
        }
    }

    #[test]
    fn structure() {
        let fmt = |v: f64| format!("{}", v);
        let rows = vec![
            row("Sweden", 85.0, BarSide::Right, "85"),
            row("Sweden", -50.0, BarSide::Left, "50% @ 2021-06-01"),
        ];
        let svg = chart(&fmt).render(&rows);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"1024\""));
        assert!(svg.contains("height=\"540\""));
        assert_eq!(svg.matches("class=\"bar\"").count(), 2);
        assert_eq!(svg.matches(">Sweden</text>").count(), 1);
        assert!(svg.contains(">vs.</text>"));
        assert!(svg.contains("Updated @ test"));
        assert!(svg.contains("<title>50% @ 2021-06-01</title>"));
    }

    #[test]
    fn colors_follow_first_appearance() {
        let fmt = |v: f64| format!("{}", v);
        let right_first = vec![
            row("Sweden", 85.0, BarSide::Right, "right-bar"),
            row("Sweden", -50.0, BarSide::Left, "left-bar"),
        ];
        let svg = chart(&fmt).render(&right_first);
        assert!(svg.contains("fill=\"#1f77b4\"><title>right-bar</title>"));
        assert!(svg.contains("fill=\"#ff7f0e\"><title>left-bar</title>"));

        let left_first = vec![
            row("Sweden", -50.0, BarSide::Left, "left-bar"),
            row("Sweden", 85.0, BarSide::Right, "right-bar"),
        ];
        let svg = chart(&fmt).render(&left_first);
        assert!(svg.contains("fill=\"#1f77b4\"><title>left-bar</title>"));
        assert!(svg.contains("fill=\"#ff7f0e\"><title>right-bar</title>"));
    }

    #[test]
    fn labels_are_escaped() {
        let fmt = |v: f64| format!("{}", v);
        let rows = vec![
            row("A<B&C", 85.0, BarSide::Right, "85"),
            row("A<B&C", -50.0, BarSide::Left, "50"),
        ];
        let svg = chart(&fmt).render(&rows);
        assert!(svg.contains("A&lt;B&amp;C"));
        assert!(!svg.contains("A<B&C"));
    }

    #[test]
    fn empty_rows_placeholder() {
        let fmt = |v: f64| format!("{}", v);
        let svg = chart(&fmt).render(&[]);
        assert!(svg.contains("no data"));
        assert!(!svg.contains("class=\"bar\""));
    }

    #[test]
    fn negative_ticks_use_formatter() {
        let fmt = |v: f64| {
            if v < 0.0 {
                format!("{}%", -v)
            } else {
                format!("{}", v)
            }
        };
        let rows = vec![
            row("Sweden", 85.0, BarSide::Right, "85"),
            row("Sweden", -50.0, BarSide::Left, "50"),
        ];
        let svg = chart(&fmt).render(&rows);
        // leftmost tick is the domain edge, formatted through the left branch
        assert!(svg.contains(">100%</text>"));
        assert!(svg.contains(">100</text>"));
    }
}
