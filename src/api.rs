//! Synchronous client for the **countriesnow.space** countries API (v0.1).
//!
//! Every operation issues one or more requests through a [`Transport`], checks each
//! response with [`validate`], and reshapes the `data` payload into the types of
//! [`crate::models`]. No state is kept between calls.
//!
//! ### Notes
//! - Query values are percent-encoded (`"Czech Republic"` → `Czech%20Republic`).
//! - Independent sub-requests of one operation run on scoped threads; results always
//!   come back in input order.
//! - The default timeout is 10s and can be changed through [`ClientConfig`].
//!
//! Typical usage:
//! ```no_run
//! # use countriesnow_rs::{Client, ClientConfig};
//! let client = Client::from_config(&ClientConfig::default())?;
//! let record = client.fetch_population("Czech Republic")?;
//! println!("{} samples", record.samples.len());
//! # Ok::<(), countriesnow_rs::Error>(())
//! ```
use crate::error::{Error, Result};
use crate::join::{self, JoinPolicy};
use crate::models::{
    CityList, CityPopulationData, CityPopulationGrowth, CombinedEntry, CountryPopulationData,
    CountryPopulationGrowth, CountryPopulationRecord, CurrencyEntry, CurrencyRecord,
    DialCodeEntry, DialCodeRecord, Envelope, FlagData,
};
use crate::transport::{HttpTransport, Method, Transport};
use crate::validate::validate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::panic;
use std::thread;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://countriesnow.space/api/v0.1/countries";

/// Country queried when none is given.
pub const DEFAULT_COUNTRY: &str = "Czech Republic";

/// Countries compared by `compare-countries` when none are given.
pub const DEFAULT_COMPARED_COUNTRIES: [&str; 5] = [
    "Czech Republic",
    "Germany",
    "Austria",
    "Slovak Republic",
    "Poland",
];

/// Cities compared by `compare-cities` when none are given.
pub const DEFAULT_COMPARED_CITIES: [&str; 4] = ["Praha", "Brno", "Ostrava", "Plzen"];

/// Connection settings and the join policy for combined currency/dial-code tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub join_policy: JoinPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            join_policy: JoinPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client<T = HttpTransport> {
    transport: T,
    join_policy: JoinPolicy,
}

// Keep -, _, ., ~ unescaped; everything else (notably space) is percent-encoded.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, QUERY_SAFE).to_string()
}

/// Run `f` for every item on its own scoped thread and collect the results in
/// input order. All threads finish before this returns; the first error by
/// input position wins.
fn fetch_each<I, R, F>(items: &[I], f: F) -> Result<Vec<R>>
where
    I: Sync,
    R: Send,
    F: Fn(&I) -> Result<R> + Sync,
{
    let f = &f;
    thread::scope(|s| {
        let handles: Vec<_> = items.iter().map(|item| s.spawn(move || f(item))).collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|p| panic::resume_unwind(p)))
            .collect()
    })
}

impl Client<HttpTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport =
            HttpTransport::new(&config.base_url, config.timeout, config.connect_timeout)?;
        Ok(Self::new(transport).with_join_policy(config.join_policy))
    }
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            join_policy: JoinPolicy::default(),
        }
    }

    pub fn with_join_policy(mut self, join_policy: JoinPolicy) -> Self {
        self.join_policy = join_policy;
        self
    }

    pub fn join_policy(&self) -> JoinPolicy {
        self.join_policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch, validate and decode one response. Shape mismatches in an otherwise
    /// successful response are reported as [`Error::MissingField`].
    fn request<D: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        context: &'static str,
    ) -> Result<D> {
        let raw = self.transport.fetch(method, path, body)?;
        let checked = validate(raw)?;
        serde_json::from_value(checked).map_err(|e| Error::MissingField {
            context,
            detail: e.to_string(),
        })
    }

    /// Population series of `country`, in the order the API returns it.
    pub fn fetch_population(&self, country: &str) -> Result<CountryPopulationRecord> {
        let path = format!("population/q?country={}", enc(country));
        let env: Envelope<CountryPopulationData> =
            self.request(Method::Get, &path, None, "population")?;
        Ok(env.data.into())
    }

    /// Every city the API lists for `country`.
    pub fn fetch_all_cities(&self, country: &str) -> Result<CityList> {
        let path = format!("cities/q?country={}", enc(country));
        let env: Envelope<Vec<String>> = self.request(Method::Get, &path, None, "cities")?;
        Ok(CityList {
            country: country.to_string(),
            cities: env.data,
        })
    }

    /// The first three cities of `country` in ascending order; fewer when the
    /// country has fewer.
    pub fn fetch_top3_cities_ascending(&self, country: &str) -> Result<CityList> {
        let all = self.fetch_all_cities(country)?;
        Ok(CityList {
            cities: join::first_ascending(&all.cities, 3),
            country: all.country,
        })
    }

    /// URL of the flag image of `country`.
    pub fn fetch_flag_url(&self, country: &str) -> Result<String> {
        let body = json!({ "country": country });
        let env: Envelope<FlagData> =
            self.request(Method::Post, "flag/images", Some(&body), "flag/images")?;
        Ok(env.data.flag)
    }

    /// Country/currency table. One malformed record fails the whole call.
    pub fn fetch_currency_table(&self) -> Result<Vec<CurrencyEntry>> {
        let env: Envelope<Vec<CurrencyRecord>> =
            self.request(Method::Get, "currency", None, "currency")?;
        Ok(env.data.into_iter().map(CurrencyEntry::from).collect())
    }

    /// Country/dial-code table. One malformed record fails the whole call.
    pub fn fetch_dial_code_table(&self) -> Result<Vec<DialCodeEntry>> {
        let env: Envelope<Vec<DialCodeRecord>> =
            self.request(Method::Get, "codes", None, "codes")?;
        Ok(env.data.into_iter().map(DialCodeEntry::from).collect())
    }

    /// Currency table joined with dial codes by country name under the client's
    /// [`JoinPolicy`]. Both tables are fetched concurrently.
    pub fn fetch_currency_and_dial_codes(&self) -> Result<Vec<CombinedEntry>> {
        let (currencies, dial_codes) = thread::scope(|s| {
            let currencies = s.spawn(|| self.fetch_currency_table());
            let dial_codes = s.spawn(|| self.fetch_dial_code_table());
            (
                currencies.join().unwrap_or_else(|p| panic::resume_unwind(p)),
                dial_codes.join().unwrap_or_else(|p| panic::resume_unwind(p)),
            )
        });
        let (currencies, dial_codes) = (currencies?, dial_codes?);
        Ok(join::join_by_country(currencies, &dial_codes, self.join_policy))
    }

    /// Latest population and growth for each country, in input order. Countries
    /// with an empty series are left out.
    pub fn compare_population_growth<S>(
        &self,
        countries: &[S],
    ) -> Result<Vec<CountryPopulationGrowth>>
    where
        S: AsRef<str> + Sync,
    {
        let records = fetch_each(countries, |c| self.fetch_population(c.as_ref()))?;
        Ok(countries
            .iter()
            .zip(records)
            .filter_map(|(country, record)| {
                let growth = join::country_growth(country.as_ref(), &record.samples);
                if growth.is_none() {
                    log::warn!("no population samples for {}, skipping", country.as_ref());
                }
                growth
            })
            .collect())
    }

    /// Latest population and growth for each city of `country`, in input order.
    /// A city without a usable series still gets a row, with no figures.
    pub fn compare_city_population_growth<S>(
        &self,
        cities: &[S],
        country: &str,
    ) -> Result<Vec<CityPopulationGrowth>>
    where
        S: AsRef<str> + Sync,
    {
        fetch_each(cities, |city| {
            let city = city.as_ref();
            let body = json!({ "country": country, "city": city });
            let env: Envelope<CityPopulationData> = self.request(
                Method::Post,
                "population/cities",
                Some(&body),
                "population/cities",
            )?;
            if env.data.population_counts.as_deref().is_none_or(|s| s.is_empty()) {
                log::warn!("no population series for {city}, {country}");
            }
            join::city_growth(city, env.data.population_counts.as_deref())
        })
    }
}
