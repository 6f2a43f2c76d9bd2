//! Seeded synthetic dataset so the whole pipeline can run and be tested
//! without touching the network. Magnitudes roughly track the real feed;
//! records are shuffled and have reporting gaps on purpose.

use std::io;

use chrono::{Days, NaiveDate};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::common::{io_err, write_gz_bytes, Stowage, COUNTRIES};
use crate::owid_structs::{CountryData, DailyRecord, Dataset};

pub const COUNTRY_NAMES: [&str; 18] = [
    "Greece",
    "Norway",
    "Sweden",
    "Finland",
    "Denmark",
    "Germany",
    "Switzerland",
    "Poland",
    "Austria",
    "Hungary",
    "Ireland",
    "United Kingdom",
    "France",
    "Netherlands",
    "Belgium",
    "Portugal",
    "Spain",
    "Italy",
];

const MOCK_DAYS: usize = 420;

pub fn mock_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    let mut owid = Dataset::new();

    for (code, name) in COUNTRIES.iter().zip(COUNTRY_NAMES.iter()) {
        let vacc_start = rng.gen_range(280..320);
        let mut total_deaths = 0.0;
        let mut total_cases = 0.0;
        let mut excess = 0.0;
        let mut vacc: f64 = 0.0;
        let mut data = Vec::with_capacity(MOCK_DAYS);

        for day in 0..MOCK_DAYS {
            let date = (start + Days::new(day as u64)).format("%Y-%m-%d").to_string();
            let new_cases = rng.gen_range(0.0..400.0);
            total_cases += new_cases;
            total_deaths += rng.gen_range(0.0..6.0);
            excess += rng.gen_range(-2.0..8.0);
            if day >= vacc_start {
                vacc = (vacc + rng.gen_range(0.0..0.6)).min(95.0);
            }
            // every third day goes unreported, like the real feed's gaps
            let reported = day % 3 != 0;
            data.push(DailyRecord {
                date,
                people_fully_vaccinated_per_hundred: (day >= vacc_start && reported)
                    .then_some(vacc),
                total_deaths_per_million: reported.then_some(total_deaths),
                excess_mortality_cumulative_per_million: reported.then_some(excess),
                total_cases_per_million: reported.then_some(total_cases),
                new_cases_per_million: reported.then_some(new_cases),
                new_cases_smoothed_per_million: reported.then_some(new_cases),
                stringency_index: Some(rng.gen_range(20.0..80.0)),
            });
        }
        data.shuffle(&mut rng);

        owid.insert(
            code.to_string(),
            CountryData {
                location: Some(name.to_string()),
                data,
            },
        );
    }
    owid
}

pub fn write_mock_dataset(stowage: &Stowage, seed: u64) -> io::Result<()> {
    let owid = mock_dataset(seed);
    let raw = serde_json::to_string(&owid).map_err(io_err)?;
    write_gz_bytes(&stowage.dataset_path(), raw.as_bytes())?;
    println!(
        "wrote mock dataset ({} countries, seed {}) to {:?}",
        owid.len(),
        seed,
        stowage.dataset_path()
    );
    Ok(())
}

#[cfg(test)]
mod mock_test {
    use super::*;

    #[test]
    fn deterministic_per_seed() {
        assert_eq!(mock_dataset(42), mock_dataset(42));
        assert_ne!(mock_dataset(42), mock_dataset(43));
    }

    #[test]
    fn covers_all_countries() {
        let owid = mock_dataset(1);
        assert_eq!(owid.len(), COUNTRIES.len());
        for (code, name) in COUNTRIES.iter().zip(COUNTRY_NAMES.iter()) {
            let cdata = &owid[*code];
            assert_eq!(cdata.location.as_deref(), Some(*name));
            assert_eq!(cdata.data.len(), MOCK_DAYS);
        }
    }

    #[test]
    fn has_reporting_gaps() {
        let owid = mock_dataset(1);
        let sweden = &owid["SWE"];
        assert!(sweden
            .data
            .iter()
            .any(|d| d.total_deaths_per_million.is_none()));
        assert!(sweden
            .data
            .iter()
            .any(|d| d.total_deaths_per_million.is_some()));
    }
}
