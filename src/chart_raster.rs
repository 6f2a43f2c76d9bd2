//! SVG to PNG via resvg, plus the worker pool that writes the numbered
//! screenshot files. Jobs go through a bounded channel and workers drain
//! until they hit a poison marker; a failed screenshot is logged and
//! skipped, never fatal to the batch.

use std::{fs, io, path::Path, sync::Arc, thread};

use crossbeam_channel::{bounded, Receiver};
use resvg::{
    tiny_skia::Pixmap,
    usvg::{fontdb, Options, Transform, Tree},
};

use crate::common::io_err;

enum RasterJob {
    Go(usize, String),
    Poison,
}

/// One-off rasterization with its own font database.
pub fn rasterize(svg: &str, width: u32, height: u32) -> io::Result<Vec<u8>> {
    let options = Options {
        fontdb: Arc::new(system_fonts()),
        ..Options::default()
    };
    render_png(svg, &options, width, height)
}

fn system_fonts() -> fontdb::Database {
    let mut font_db = fontdb::Database::new();
    font_db.load_system_fonts();
    font_db
}

fn render_png(svg: &str, options: &Options, width: u32, height: u32) -> io::Result<Vec<u8>> {
    let tree = Tree::from_str(svg, options).map_err(io_err)?;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| io_err("zero-sized pixmap"))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(io_err)
}

/// Write `screenshotNN.png` for every chart into `dir`, fanned out over
/// the available cores. The font database is loaded once and shared.
pub fn write_screenshots(dir: &Path, charts: Vec<String>, width: u32, height: u32) {
    let n_threads: usize = thread::available_parallelism().map(usize::from).unwrap_or(2);
    let (sender, receiver) = bounded::<RasterJob>(n_threads * 2);
    let fonts = Arc::new(system_fonts());

    thread::scope(|s| {
        for _ in 0..n_threads {
            let jobs = receiver.clone();
            let fonts = fonts.clone();
            s.spawn(move || raster_worker(jobs, fonts, dir, width, height));
        }
        for (index, svg) in charts.into_iter().enumerate().rev() {
            sender.send(RasterJob::Go(index, svg)).unwrap();
        }
        for _ in 0..n_threads {
            sender.send(RasterJob::Poison).unwrap();
        }
    });
}

fn raster_worker(
    jobs: Receiver<RasterJob>,
    fonts: Arc<fontdb::Database>,
    dir: &Path,
    width: u32,
    height: u32,
) {
    let options = Options {
        fontdb: fonts,
        ..Options::default()
    };
    while let Ok(RasterJob::Go(index, svg)) = jobs.recv() {
        let path = dir.join(format!("screenshot{:02}.png", index));
        match render_png(&svg, &options, width, height) {
            Ok(bytes) => {
                if let Err(e) = fs::write(&path, bytes) {
                    println!("screenshot {:02} write failed: {}", index, e);
                }
            }
            Err(e) => println!("screenshot {:02} raster failed: {}", index, e),
        }
    }
}
