//! Dataset loading: a gzip on-disk cache in front of the OWID endpoint.
//! The cache is trusted while its mtime is younger than the refresh
//! interval; a failed fetch falls back to a stale cache when one exists.

use std::{
    fs,
    io::{self, Read},
    path::Path,
    time::Duration,
};

use crate::common::{get_gz_buf, io_err, write_gz_bytes, Stowage, CACHE_MAX_AGE_SECS, DATASET_URL};
use crate::owid_structs::Dataset;

pub fn load_dataset(stowage: &Stowage, force: bool) -> io::Result<Dataset> {
    let path = stowage.dataset_path();
    if !force && cache_fresh(&path) {
        match read_cached(&path) {
            Ok(owid) => return Ok(owid),
            Err(e) => println!("cache read failed ({}), refetching", e),
        }
    }
    match fetch_remote(&path) {
        Ok(owid) => Ok(owid),
        Err(e) => {
            if path.is_file() {
                println!("fetch failed ({}), falling back to cached dataset", e);
                read_cached(&path)
            } else {
                Err(e)
            }
        }
    }
}

fn cache_fresh(path: &Path) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    match meta.modified() {
        Ok(mtime) => mtime
            .elapsed()
            .map_or(false, |age| age < Duration::from_secs(CACHE_MAX_AGE_SECS)),
        Err(_) => false,
    }
}

fn read_cached(path: &Path) -> io::Result<Dataset> {
    let mut raw = String::new();
    get_gz_buf(path)?.read_to_string(&mut raw)?;
    parse_dataset(&raw)
}

fn fetch_remote(path: &Path) -> io::Result<Dataset> {
    println!("fetching {}", DATASET_URL);
    let raw = reqwest::blocking::get(DATASET_URL)
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .map_err(io_err)?;
    let owid = parse_dataset(&raw)?;
    write_gz_bytes(path, raw.as_bytes())?;
    Ok(owid)
}

/// Parse the full document, reporting the JSON path on schema mismatch.
pub fn parse_dataset(raw: &str) -> io::Result<Dataset> {
    let deserializer = &mut serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        println!("dataset parse failed at {}", err.path());
        io_err(err)
    })
}

#[cfg(test)]
mod fetch_test {
    use std::fs::remove_file;

    use super::*;

    const SMALL_DOC: &str = r#"{
        "NOR": {
            "location": "Norway",
            "continent": "Europe",
            "population": 5421241,
            "data": [
                {"date": "2021-06-01", "total_deaths_per_million": 142.0, "new_tests": 1200},
                {"date": "2021-06-02", "people_fully_vaccinated_per_hundred": 21.5}
            ]
        }
    }"#;

    #[test]
    fn parse_ignores_unknown_fields() {
        let owid = parse_dataset(SMALL_DOC).unwrap();
        let nor = &owid["NOR"];
        assert_eq!(nor.location.as_deref(), Some("Norway"));
        assert_eq!(nor.data.len(), 2);
        assert_eq!(nor.data[0].total_deaths_per_million, Some(142.0));
        assert_eq!(nor.data[1].people_fully_vaccinated_per_hundred, Some(21.5));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        assert!(parse_dataset(r#"{"NOR": {"location": 3}}"#).is_err());
        assert!(parse_dataset("[1, 2]").is_err());
    }

    #[test]
    fn freshness_by_mtime() {
        let stowage = Stowage::new("/tmp/vaxeff-fresh-test");
        let path = stowage.dataset_path();
        remove_file(&path).unwrap_or(());
        assert!(!cache_fresh(&path));
        write_gz_bytes(&path, SMALL_DOC.as_bytes()).unwrap();
        assert!(cache_fresh(&path));
    }

    #[test]
    fn cached_roundtrip() {
        let stowage = Stowage::new("/tmp/vaxeff-cached-test");
        let path = stowage.dataset_path();
        write_gz_bytes(&path, SMALL_DOC.as_bytes()).unwrap();
        let owid = read_cached(&path).unwrap();
        assert_eq!(owid["NOR"].data[0].date, "2021-06-01");
    }
}
