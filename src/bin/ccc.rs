use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use countriesnow_rs::api::{
    DEFAULT_BASE_URL, DEFAULT_COMPARED_CITIES, DEFAULT_COMPARED_COUNTRIES, DEFAULT_COUNTRY,
};
use countriesnow_rs::render::{Format, Report};
use countriesnow_rs::{Client, ClientConfig, JoinPolicy};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "ccc",
    version,
    about = "Query countriesnow.space for population, city, currency, dial code and flag data"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Output format. If omitted, inferred from --out extension, else text.
    #[arg(long, value_enum, global = true)]
    format: Option<OutFormat>,
    /// Save the result to a file instead of printing it.
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    /// Total request timeout in seconds.
    #[arg(
        long,
        default_value_t = 10,
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
    /// What to do with countries that have a currency but no dial code.
    #[arg(long, value_enum, default_value_t = JoinArg::Drop, global = true)]
    join: JoinArg,
    /// API base URL.
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Population series of a country.
    Population(CountryArg),
    /// All cities of a country.
    Cities(CountryArg),
    /// First three cities of a country in alphabetical order.
    TopCities(CountryArg),
    /// Flag image URL of a country.
    Flag(CountryArg),
    /// All countries with their currency.
    Currencies,
    /// All countries with currency and dial code.
    Codes,
    /// Compare latest population and growth across countries.
    CompareCountries {
        /// Country names separated by comma (default: Czech Republic and its neighbours)
        #[arg(short, long, value_delimiter = ',')]
        countries: Vec<String>,
    },
    /// Compare latest population and growth across cities of one country.
    CompareCities {
        /// City names separated by comma (default: Praha,Brno,Ostrava,Plzen)
        #[arg(long, value_delimiter = ',')]
        cities: Vec<String>,
        #[command(flatten)]
        country: CountryArg,
    },
}

#[derive(Args, Debug)]
struct CountryArg {
    /// Country name as the API knows it (e.g., "Czech Republic")
    #[arg(short, long, default_value = DEFAULT_COUNTRY)]
    country: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Text,
    Json,
    Csv,
}

impl From<OutFormat> for Format {
    fn from(f: OutFormat) -> Self {
        match f {
            OutFormat::Text => Format::Text,
            OutFormat::Json => Format::Json,
            OutFormat::Csv => Format::Csv,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum JoinArg {
    /// Leave such countries out
    Drop,
    /// Keep them with "N/A" as dial code
    Sentinel,
}

impl From<JoinArg> for JoinPolicy {
    fn from(j: JoinArg) -> Self {
        match j {
            JoinArg::Drop => JoinPolicy::DropUnmatched,
            JoinArg::Sentinel => JoinPolicy::Sentinel,
        }
    }
}

fn or_defaults(given: Vec<String>, defaults: &[&str]) -> Vec<String> {
    let given: Vec<String> = given
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if given.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        given
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = ClientConfig {
        base_url: cli.global.base_url.clone(),
        timeout: Duration::from_secs(cli.global.timeout),
        join_policy: cli.global.join.into(),
        ..ClientConfig::default()
    };
    let client = Client::from_config(&config).context("set up API client")?;
    let report = run(&client, cli.cmd)?;
    emit(&report, &cli.global)
}

fn run(client: &Client, cmd: Command) -> Result<Report> {
    let report = match cmd {
        Command::Population(a) => Report::Population(client.fetch_population(&a.country)?),
        Command::Cities(a) => Report::Cities(client.fetch_all_cities(&a.country)?),
        Command::TopCities(a) => Report::Cities(client.fetch_top3_cities_ascending(&a.country)?),
        Command::Flag(a) => {
            let flag = client.fetch_flag_url(&a.country)?;
            Report::Flag {
                country: a.country,
                flag,
            }
        }
        Command::Currencies => Report::Currencies(client.fetch_currency_table()?),
        Command::Codes => Report::Codes(client.fetch_currency_and_dial_codes()?),
        Command::CompareCountries { countries } => {
            let countries = or_defaults(countries, &DEFAULT_COMPARED_COUNTRIES);
            Report::CountryGrowth(client.compare_population_growth(countries.as_slice())?)
        }
        Command::CompareCities { cities, country } => {
            let cities = or_defaults(cities, &DEFAULT_COMPARED_CITIES);
            Report::CityGrowth(
                client.compare_city_population_growth(cities.as_slice(), &country.country)?,
            )
        }
    };
    Ok(report)
}

fn emit(report: &Report, global: &GlobalArgs) -> Result<()> {
    match global.out.as_ref() {
        Some(path) => {
            let format = global
                .format
                .map(Format::from)
                .or_else(|| Format::from_extension(path))
                .unwrap_or(Format::Text);
            report
                .save(format, path)
                .with_context(|| format!("write {}", path.display()))?;
            eprintln!("Saved result to {}", path.display());
        }
        None => {
            let format = global.format.map(Format::from).unwrap_or(Format::Text);
            report
                .write(format, std::io::stdout().lock())
                .context("write to stdout")?;
        }
    }
    Ok(())
}
