use serde::{Deserialize, Serialize};

/// Top-level response wrapper; every endpoint nests its payload under `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One year of a country population series.
///
/// The API calls the count `value`; it is accepted on input under either name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopulationSample {
    pub year: i32,
    #[serde(alias = "value")]
    pub population: i64,
}

/// `data` payload of `population/q`.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryPopulationData {
    pub country: String,
    pub code: String,
    #[serde(rename = "populationCounts")]
    pub population_counts: Vec<PopulationSample>,
}

/// Population series of one country, in the order the API returned it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryPopulationRecord {
    pub country: String,
    pub iso_code: String,
    pub samples: Vec<PopulationSample>,
}

impl From<CountryPopulationData> for CountryPopulationRecord {
    fn from(d: CountryPopulationData) -> Self {
        Self {
            country: d.country,
            iso_code: d.code,
            samples: d.population_counts,
        }
    }
}

/// Cities of one country, case-sensitive and as returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CityList {
    pub country: String,
    pub cities: Vec<String>,
}

/// Raw record of the `currency` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyRecord {
    pub name: String,
    pub currency: String,
}

/// Raw record of the `codes` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DialCodeRecord {
    pub name: String,
    pub dial_code: String,
}

/// `data` payload of `flag/images`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagData {
    pub flag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrencyEntry {
    pub country: String,
    pub currency_code: String,
}

impl From<CurrencyRecord> for CurrencyEntry {
    fn from(r: CurrencyRecord) -> Self {
        Self {
            country: r.name,
            currency_code: r.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialCodeEntry {
    pub country: String,
    pub dial_code: String,
}

impl From<DialCodeRecord> for DialCodeEntry {
    fn from(r: DialCodeRecord) -> Self {
        Self {
            country: r.name,
            dial_code: r.dial_code,
        }
    }
}

/// Currency and dial code of one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinedEntry {
    pub country: String,
    pub currency_code: String,
    pub dial_code: String,
}

/// Latest figure and growth of one country's series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryPopulationGrowth {
    pub country: String,
    pub latest_year: i32,
    pub latest_population: i64,
    pub growth: i64,
}

/// Latest figure and growth of one city.
///
/// The three figures are either all present or all absent; they are absent when
/// the API has no usable series for the city.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CityPopulationGrowth {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_population: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<i64>,
}

impl CityPopulationGrowth {
    pub fn without_figures(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            latest_year: None,
            latest_population: None,
            growth: None,
        }
    }
}

/// `data` payload of `population/cities`.
#[derive(Debug, Clone, Deserialize)]
pub struct CityPopulationData {
    #[serde(rename = "populationCounts", default)]
    pub population_counts: Option<Vec<CitySample>>,
}

/// One entry of a city population series. The city endpoint sends both fields
/// as strings and the value may carry thousands separators (`"1,268,796"`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CitySample {
    #[serde(deserialize_with = "de_text_from_string_or_number")]
    pub year: String,
    #[serde(deserialize_with = "de_text_from_string_or_number")]
    pub value: String,
}

/// Serde helper: read a JSON string or number as its textual form.
fn de_text_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or a number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(s.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_sample_accepts_text_or_number() {
        let s: CitySample = serde_json::from_str(r#"{"year":"2011","value":"1,268,796"}"#).unwrap();
        assert_eq!(s.year, "2011");
        assert_eq!(s.value, "1,268,796");

        let s: CitySample = serde_json::from_str(r#"{"year":2011,"value":1268796}"#).unwrap();
        assert_eq!(s.year, "2011");
        assert_eq!(s.value, "1268796");
    }

    #[test]
    fn city_sample_rejects_null_value() {
        assert!(serde_json::from_str::<CitySample>(r#"{"year":"2011","value":null}"#).is_err());
    }

    #[test]
    fn population_sample_reads_api_value_field() {
        let s: PopulationSample = serde_json::from_str(r#"{"year":2020,"value":10700000}"#).unwrap();
        assert_eq!(
            s,
            PopulationSample {
                year: 2020,
                population: 10_700_000
            }
        );
    }

    #[test]
    fn city_growth_without_figures_omits_them_in_json() {
        let row = CityPopulationGrowth::without_figures("Plzen");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"city":"Plzen"}"#);
    }
}
