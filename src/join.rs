//! Pure reshaping helpers shared by the aggregation operations.

use crate::error::{Error, Result};
use crate::models::{
    CityPopulationGrowth, CitySample, CombinedEntry, CountryPopulationGrowth, CurrencyEntry,
    DialCodeEntry, PopulationSample,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder dial code used by [`JoinPolicy::Sentinel`].
pub const MISSING_DIAL_CODE: &str = "N/A";

/// What to do with a currency row whose country has no dial code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinPolicy {
    /// Leave the country out of the joined table.
    #[default]
    DropUnmatched,
    /// Keep the country with [`MISSING_DIAL_CODE`] as its dial code.
    Sentinel,
}

/// Join currencies with dial codes on exact country-name equality.
///
/// Output follows the order of `currencies`. When the dial-code table names a
/// country twice, the later entry wins.
pub fn join_by_country(
    currencies: Vec<CurrencyEntry>,
    dial_codes: &[DialCodeEntry],
    policy: JoinPolicy,
) -> Vec<CombinedEntry> {
    let by_country: HashMap<&str, &str> = dial_codes
        .iter()
        .map(|d| (d.country.as_str(), d.dial_code.as_str()))
        .collect();

    currencies
        .into_iter()
        .filter_map(|c| {
            let dial_code = match (by_country.get(c.country.as_str()), policy) {
                (Some(code), _) => (*code).to_string(),
                (None, JoinPolicy::Sentinel) => MISSING_DIAL_CODE.to_string(),
                (None, JoinPolicy::DropUnmatched) => return None,
            };
            Some(CombinedEntry {
                country: c.country,
                currency_code: c.currency_code,
                dial_code,
            })
        })
        .collect()
}

/// The first `n` names in ascending (case-sensitive, byte-wise) order.
pub fn first_ascending(names: &[String], n: usize) -> Vec<String> {
    let mut sorted = names.to_vec();
    sorted.sort();
    sorted.truncate(n);
    sorted
}

/// Latest figure and last-minus-first growth, or `None` for an empty series.
pub fn country_growth(
    country: &str,
    samples: &[PopulationSample],
) -> Option<CountryPopulationGrowth> {
    let first = samples.first()?;
    let latest = samples.last()?;
    Some(CountryPopulationGrowth {
        country: country.to_string(),
        latest_year: latest.year,
        latest_population: latest.population,
        growth: latest.population - first.population,
    })
}

/// Read a population count, ignoring thousands separators.
pub fn parse_population(text: &str) -> Result<i64> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<i64>().map_err(|_| Error::Parse {
        field: "population",
        value: text.to_string(),
    })
}

/// Growth row for one city. A missing or empty series gives a row with the
/// city name only.
pub fn city_growth(city: &str, samples: Option<&[CitySample]>) -> Result<CityPopulationGrowth> {
    let Some((first, latest)) = samples.and_then(|s| Some((s.first()?, s.last()?))) else {
        return Ok(CityPopulationGrowth::without_figures(city));
    };
    let earliest = parse_population(&first.value)?;
    let latest_population = parse_population(&latest.value)?;
    Ok(CityPopulationGrowth {
        city: city.to_string(),
        latest_year: Some(latest.year.clone()),
        latest_population: Some(latest_population),
        growth: Some(latest_population - earliest),
    })
}
