//! countriesnow_rs
//!
//! A small Rust library for querying the public **countriesnow.space** API and
//! reshaping its answers. Pairs with the `ccc` CLI.
//!
//! ### Features
//! - Population series of a country, growth comparison across countries and cities
//! - City lists, with an alphabetical top-3
//! - Flag image URLs
//! - Currency table, optionally joined with dial codes by country name
//! - Fixed-width text, JSON or CSV output
//!
//! ### Example
//! ```no_run
//! use countriesnow_rs::{Client, ClientConfig, render::Report};
//!
//! let client = Client::from_config(&ClientConfig::default())?;
//! let growth = client.compare_population_growth(&["Czech Republic", "Poland"])?;
//! print!("{}", Report::CountryGrowth(growth).to_text());
//! # Ok::<(), countriesnow_rs::Error>(())
//! ```

pub mod api;
pub mod error;
pub mod join;
pub mod models;
pub mod render;
pub mod transport;
pub mod validate;

pub use api::{Client, ClientConfig};
pub use error::{Error, Result};
pub use join::JoinPolicy;
pub use transport::{HttpTransport, Method, Transport};
