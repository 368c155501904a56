//! Turn operation results into fixed-width text tables, JSON or CSV.

use crate::models::{
    CityList, CityPopulationGrowth, CombinedEntry, CountryPopulationGrowth,
    CountryPopulationRecord, CurrencyEntry,
};
use anyhow::Result;
use csv::WriterBuilder;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Csv,
}

impl Format {
    /// Guess a format from a file extension; unknown extensions give `None`.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Format::Text),
            "json" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            _ => None,
        }
    }
}

/// Result of one aggregation operation, ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Population(CountryPopulationRecord),
    Cities(CityList),
    Flag { country: String, flag: String },
    Currencies(Vec<CurrencyEntry>),
    Codes(Vec<CombinedEntry>),
    CountryGrowth(Vec<CountryPopulationGrowth>),
    CityGrowth(Vec<CityPopulationGrowth>),
}

fn thousands(n: i64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Thousands-separated with an explicit `+` for non-negative values.
pub fn signed_thousands(n: i64) -> String {
    if n >= 0 {
        format!("+{}", thousands(n))
    } else {
        thousands(n)
    }
}

/// Append one row, left-aligning each cell to its width. Trailing padding is dropped.
fn push_row(out: &mut String, cells: &[(&str, usize)]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&format!("{cell:<width$}"));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn push_rule(out: &mut String, len: usize) {
    out.push_str(&"-".repeat(len));
    out.push('\n');
}

impl Report {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self {
            Report::Population(r) => {
                out.push_str(&format!("Population of {} ({}):\n", r.country, r.iso_code));
                push_rule(&mut out, 36);
                push_row(&mut out, &[("Year", 6), ("Population", 15)]);
                push_rule(&mut out, 36);
                for s in &r.samples {
                    push_row(
                        &mut out,
                        &[(&s.year.to_string(), 6), (&s.population.to_string(), 15)],
                    );
                }
            }
            Report::Cities(list) => {
                push_row(&mut out, &[("No.", 5), ("City", 30)]);
                push_rule(&mut out, 38);
                for (i, city) in list.cities.iter().enumerate() {
                    push_row(&mut out, &[(&(i + 1).to_string(), 5), (city, 30)]);
                }
            }
            Report::Flag { country, flag } => {
                out.push_str(&format!("Flag of {country}: {flag}\n"));
            }
            Report::Currencies(rows) => {
                push_row(&mut out, &[("Country", 40), ("Currency", 15)]);
                push_rule(&mut out, 63);
                for r in rows {
                    push_row(&mut out, &[(&r.country, 40), (&r.currency_code, 15)]);
                }
            }
            Report::Codes(rows) => {
                push_row(
                    &mut out,
                    &[("Country", 35), ("Currency", 15), ("Dial Code", 15)],
                );
                push_rule(&mut out, 63);
                for r in rows {
                    push_row(
                        &mut out,
                        &[(&r.country, 35), (&r.currency_code, 15), (&r.dial_code, 15)],
                    );
                }
            }
            Report::CountryGrowth(rows) => {
                growth_header(&mut out, "Country");
                for r in rows {
                    push_row(
                        &mut out,
                        &[
                            (&r.country, 25),
                            (&r.latest_year.to_string(), 8),
                            (&thousands(r.latest_population), 20),
                            (&signed_thousands(r.growth), 15),
                        ],
                    );
                }
            }
            Report::CityGrowth(rows) => {
                growth_header(&mut out, "City");
                for r in rows {
                    let year = r.latest_year.clone().unwrap_or_else(|| "-".into());
                    let population = r.latest_population.map_or_else(|| "-".into(), thousands);
                    let growth = r.growth.map_or_else(|| "-".into(), signed_thousands);
                    push_row(
                        &mut out,
                        &[(&r.city, 25), (&year, 8), (&population, 20), (&growth, 15)],
                    );
                }
            }
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Header and rows in plain (unformatted) form.
    fn table(&self) -> (Vec<&'static str>, Vec<Vec<String>>) {
        match self {
            Report::Population(r) => (
                vec!["country", "iso_code", "year", "population"],
                r.samples
                    .iter()
                    .map(|s| {
                        vec![
                            r.country.clone(),
                            r.iso_code.clone(),
                            s.year.to_string(),
                            s.population.to_string(),
                        ]
                    })
                    .collect(),
            ),
            Report::Cities(list) => (
                vec!["country", "city"],
                list.cities
                    .iter()
                    .map(|c| vec![list.country.clone(), c.clone()])
                    .collect(),
            ),
            Report::Flag { country, flag } => {
                (vec!["country", "flag"], vec![vec![country.clone(), flag.clone()]])
            }
            Report::Currencies(rows) => (
                vec!["country", "currency_code"],
                rows.iter()
                    .map(|r| vec![r.country.clone(), r.currency_code.clone()])
                    .collect(),
            ),
            Report::Codes(rows) => (
                vec!["country", "currency_code", "dial_code"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.country.clone(),
                            r.currency_code.clone(),
                            r.dial_code.clone(),
                        ]
                    })
                    .collect(),
            ),
            Report::CountryGrowth(rows) => (
                vec!["country", "latest_year", "latest_population", "growth"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.country.clone(),
                            r.latest_year.to_string(),
                            r.latest_population.to_string(),
                            r.growth.to_string(),
                        ]
                    })
                    .collect(),
            ),
            Report::CityGrowth(rows) => (
                vec!["city", "latest_year", "latest_population", "growth"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.city.clone(),
                            r.latest_year.clone().unwrap_or_default(),
                            r.latest_population.map(|n| n.to_string()).unwrap_or_default(),
                            r.growth.map(|n| n.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect(),
            ),
        }
    }

    /// Write as CSV with a header row; missing figures become empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let (header, rows) = self.table();
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(&header)?;
        for row in rows {
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write<W: Write>(&self, format: Format, mut writer: W) -> Result<()> {
        match format {
            Format::Text => writer.write_all(self.to_text().as_bytes())?,
            Format::Json => {
                writer.write_all(self.to_json()?.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            Format::Csv => self.write_csv(&mut writer)?,
        }
        writer.flush()?;
        Ok(())
    }

    /// Save the report to `path`.
    pub fn save<P: AsRef<Path>>(&self, format: Format, path: P) -> Result<()> {
        let f = File::create(path)?;
        self.write(format, f)
    }
}

fn growth_header(out: &mut String, label: &str) {
    push_row(
        out,
        &[(label, 25), ("Year", 8), ("Population", 20), ("Growth", 15)],
    );
    push_rule(out, 70);
}
