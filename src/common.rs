use std::{
    fs::{create_dir_all, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};

pub const DATASET_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.json";
pub const DATASET_FILE: &str = "owid-covid-data.json.gz";
pub const CACHE_MAX_AGE_SECS: u64 = 60 * 60 * 2;

pub const COUNTRIES: [&str; 18] = [
    "GRC", "NOR", "SWE", "FIN", "DNK", "DEU", "CHE", "POL", "AUT", "HUN", "IRL", "GBR", "FRA",
    "NLD", "BEL", "PRT", "ESP", "ITA",
];

pub const CHART_WIDTH: u32 = 1024;
pub const LANE_HEIGHT: u32 = 30;
pub const CHART_HEIGHT: u32 = LANE_HEIGHT * COUNTRIES.len() as u32;

/// Root-relative directory layout for everything the pipeline reads or writes.
/// Construction creates the directories.
pub struct Stowage {
    pub cache: PathBuf,
    pub docs: PathBuf,
    pub row_csvs: PathBuf,
}

impl Stowage {
    pub fn new(root_path: &str) -> Self {
        let root = Path::new(root_path);
        let stowage = Self {
            cache: root.join("cache"),
            docs: root.join("docs"),
            row_csvs: root.join("row-csvs"),
        };
        for dir in [&stowage.cache, &stowage.docs, &stowage.row_csvs] {
            create_dir_all(dir).unwrap();
        }
        stowage
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.cache.join(DATASET_FILE)
    }
}

pub fn get_gz_buf(path: &Path) -> io::Result<BufReader<GzDecoder<File>>> {
    let file = File::open(path)?;
    Ok(BufReader::new(GzDecoder::new(file)))
}

pub fn write_gz_bytes(out_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let out_file = File::create(out_path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(out_file), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()?;
    Ok(())
}

pub fn io_err<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}
