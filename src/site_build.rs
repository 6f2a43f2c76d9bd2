//! Runs every chart variant, assembles the static page, and writes the
//! published artifacts: docs/index.html, the numbered PNG screenshots and
//! optionally one gzipped CSV of rows per chart.

use std::{fs, fs::File, io};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use tqdm::*;

use crate::chart_data::{build_chart_rows, ChartOptions, MetricSpec};
use crate::chart_raster::write_screenshots;
use crate::chart_specs::chart_variants;
use crate::chart_svg::BarChart;
use crate::common::{io_err, Stowage, CHART_HEIGHT, CHART_WIDTH, COUNTRIES};
use crate::owid_structs::Dataset;

const SITE_TITLE: &str = "COVID-19 Stats";
const PREVIEW_IMAGE: &str = "screenshot00.png";

pub fn build_site(stowage: &Stowage, owid: &Dataset) -> io::Result<()> {
    let variants = chart_variants();
    let mut charts = Vec::with_capacity(variants.len());
    for (spec, opts) in variants.iter().tqdm().desc(Some("charts")) {
        charts.push(render_chart(owid, spec, opts));
    }

    let index_path = stowage.docs.join("index.html");
    fs::write(&index_path, page_shell(&charts))?;
    println!("wrote {} charts to {:?}", charts.len(), index_path);

    write_screenshots(&stowage.docs, charts, CHART_WIDTH, CHART_HEIGHT);
    Ok(())
}

pub fn render_chart(owid: &Dataset, spec: &MetricSpec, opts: &ChartOptions) -> String {
    let (rows, scale) = build_chart_rows(owid, &COUNTRIES, spec, opts);
    let stamp = updated_line();
    // negative ticks are left-axis values: unscale, then hand to the left formatter
    let x_format = |d: f64| {
        if d < 0.0 {
            (spec.format_left)(-d * scale.max_left / scale.max_right)
        } else {
            (spec.format_right)(d)
        }
    };
    BarChart {
        x_domain: scale.x_domain(),
        x_format: &x_format,
        x_label_left: spec.label_left,
        x_label: "vs.",
        x_label_right: spec.label_right,
        x_label_bottom_right: &stamp,
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
    }
    .render(&rows)
}

fn updated_line() -> String {
    format!(
        "Updated @ {} - Source: ourworldindata.org",
        Local::now().format("%H:%M %d %b %Y")
    )
}

fn page_shell(charts: &[String]) -> String {
    let mut html = String::new();
    html.push_str("<html><head>");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />");
    html.push_str("<meta name=\"twitter:card\" content=\"summary_large_image\" />");
    html.push_str(&format!(
        "<meta name=\"twitter:title\" content=\"{}\" />",
        SITE_TITLE
    ));
    html.push_str(&format!(
        "<meta name=\"twitter:image\" content=\"{}\" />",
        PREVIEW_IMAGE
    ));
    html.push_str(&format!(
        "<meta property=\"og:image\" content=\"{}\" />",
        PREVIEW_IMAGE
    ));
    html.push_str("</head><body>");
    html.push_str(&charts.join("<br />"));
    html.push_str("</body></html>");
    html
}

pub fn write_row_csvs(stowage: &Stowage, owid: &Dataset) -> io::Result<()> {
    let variants = chart_variants();
    for (i, (spec, opts)) in variants.iter().enumerate() {
        let (rows, _) = build_chart_rows(owid, &COUNTRIES, spec, opts);
        let path = stowage.row_csvs.join(format!("chart{:02}.csv.gz", i));
        let encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        let mut wtr = csv::Writer::from_writer(encoder);
        wtr.write_record(["id", "side", "value", "date", "title"])
            .map_err(io_err)?;
        for row in &rows {
            let side = row.side_tag().to_string();
            let value = row.value.to_string();
            wtr.write_record([
                row.id.as_str(),
                side.as_str(),
                value.as_str(),
                row.date.as_str(),
                row.title.as_str(),
            ])
            .map_err(io_err)?;
        }
        wtr.into_inner().map_err(io_err)?.finish()?;
    }
    println!("wrote {} row csvs to {:?}", variants.len(), stowage.row_csvs);
    Ok(())
}

#[cfg(test)]
mod site_test {
    use std::io::Read;

    use super::*;
    use crate::common::get_gz_buf;
    use crate::mock::mock_dataset;

    #[test]
    fn twelve_charts_in_page() {
        let owid = mock_dataset(7);
        let charts: Vec<String> = chart_variants()
            .iter()
            .map(|(spec, opts)| render_chart(&owid, spec, opts))
            .collect();
        assert_eq!(charts.len(), 12);
        let html = page_shell(&charts);
        assert!(html.starts_with("<html><head>"));
        assert!(html.ends_with("</body></html>"));
        assert_eq!(html.matches("<svg").count(), 12);
        assert_eq!(html.matches("<br />").count(), 11);
        assert!(html.contains("twitter:card"));
        assert!(html.contains("og:image"));
    }

    #[test]
    fn rows_are_deterministic() {
        let owid_a = mock_dataset(7);
        let owid_b = mock_dataset(7);
        for (spec, opts) in chart_variants() {
            let (rows_a, scale_a) = build_chart_rows(&owid_a, &COUNTRIES, &spec, &opts);
            let (rows_b, scale_b) = build_chart_rows(&owid_b, &COUNTRIES, &spec, &opts);
            assert!(!rows_a.is_empty());
            assert_eq!(rows_a, rows_b);
            assert_eq!(scale_a, scale_b);
        }
    }

    #[test]
    fn csv_dump_headers() {
        let stowage = Stowage::new("/tmp/vaxeff-csv-test");
        let owid = mock_dataset(3);
        write_row_csvs(&stowage, &owid).unwrap();
        let mut content = String::new();
        get_gz_buf(&stowage.row_csvs.join("chart00.csv.gz"))
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.starts_with("id,side,value,date,title"));
        assert!(content.lines().count() > 1);
        assert!(stowage.row_csvs.join("chart11.csv.gz").is_file());
    }
}
