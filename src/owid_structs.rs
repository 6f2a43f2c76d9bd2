use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// The OWID document: ISO-3 country code to static info plus daily records.
pub type Dataset = HashMap<String, CountryData>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CountryData {
    pub location: Option<String>,
    #[serde(default)]
    pub data: Vec<DailyRecord>,
}

impl CountryData {
    pub fn display_name(&self, code: &str) -> String {
        self.location.clone().unwrap_or_else(|| code.to_string())
    }
}

/// One day of reported values. Dates are ISO strings and compare
/// chronologically as plain strings. Metrics the charts never read are
/// dropped at parse time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct DailyRecord {
    pub date: String,
    pub people_fully_vaccinated_per_hundred: Option<f64>,
    pub total_deaths_per_million: Option<f64>,
    pub excess_mortality_cumulative_per_million: Option<f64>,
    pub total_cases_per_million: Option<f64>,
    pub new_cases_per_million: Option<f64>,
    pub new_cases_smoothed_per_million: Option<f64>,
    pub stringency_index: Option<f64>,
}

impl DailyRecord {
    /// Field-wise merge of the anchor record (`self`) with the older record
    /// that supplied the left-hand metric. The anchor wins on every
    /// populated field and always supplies the date.
    pub fn merged_onto(&self, older: &Self) -> Self {
        Self {
            date: self.date.clone(),
            people_fully_vaccinated_per_hundred: self
                .people_fully_vaccinated_per_hundred
                .or(older.people_fully_vaccinated_per_hundred),
            total_deaths_per_million: self.total_deaths_per_million.or(older.total_deaths_per_million),
            excess_mortality_cumulative_per_million: self
                .excess_mortality_cumulative_per_million
                .or(older.excess_mortality_cumulative_per_million),
            total_cases_per_million: self.total_cases_per_million.or(older.total_cases_per_million),
            new_cases_per_million: self.new_cases_per_million.or(older.new_cases_per_million),
            new_cases_smoothed_per_million: self
                .new_cases_smoothed_per_million
                .or(older.new_cases_smoothed_per_million),
            stringency_index: self.stringency_index.or(older.stringency_index),
        }
    }
}
