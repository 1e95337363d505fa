//! Extract the IP networks of a single country from GeoLite2 country CSV tables.
//!
//! The pipeline reads the locations table to find the country's geoname ids, then
//! keeps the networks of every block row carrying one of those ids, and writes
//! them one per line.

mod blocks;
mod error;
mod locations;
mod sources;
mod utils;
mod write;

use std::path::PathBuf;

use log::{info, warn};

pub use crate::{
    blocks::extract_networks,
    error::{Error, Result, Table},
    locations::{filter_locations, GeonameIdSet},
    sources::{
        DataDir, FixedPaths, IpVersion, ResolveSources, Sources, DEFAULT_BLOCKS_V4,
        DEFAULT_BLOCKS_V6, DEFAULT_LOCATIONS,
    },
    write::write_networks,
};

use crate::utils::open_table;

pub const DEFAULT_COUNTRY: &str = "ID";
pub const DEFAULT_OUTPUT: &str = "/etc/ipset/id.cidr";

#[derive(Debug, Clone)]
pub struct Config {
    /// ISO 3166 alpha-2 code, compared exactly
    pub country: String,
    pub output: PathBuf,
    /// abort instead of writing an empty list when no location matches
    pub fail_on_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.into(),
            output: DEFAULT_OUTPUT.into(),
            fail_on_empty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub geoname_ids: usize,
    pub networks: usize,
    pub output: PathBuf,
}

/// Run the whole extraction: locations, then blocks, then the output file.
///
/// Each table is opened, read to the end and closed before the next stage starts.
pub fn run(sources: &Sources, config: &Config) -> Result<Report> {
    let ids = {
        let f = open_table(Table::Locations, &sources.locations)?;
        filter_locations(f, &config.country).map_err(|source| Error::SourceUnreadable {
            table: Table::Locations,
            path: sources.locations.clone(),
            source,
        })?
    };
    if ids.is_empty() {
        if config.fail_on_empty {
            return Err(Error::NoMatchesFound {
                country: config.country.clone(),
            });
        }
        warn!(
            "no locations match country code {:?}, output will be empty",
            config.country
        );
    } else {
        info!(
            "found {} geoname id{} for {}",
            ids.len(),
            plural(ids.len()),
            config.country
        );
    }

    let networks = {
        let f = open_table(Table::Blocks, &sources.blocks)?;
        extract_networks(f, &ids).map_err(|source| Error::SourceUnreadable {
            table: Table::Blocks,
            path: sources.blocks.clone(),
            source,
        })?
    };
    info!("matched {} network{}", networks.len(), plural(networks.len()));

    write_networks(&config.output, &networks)?;

    Ok(Report {
        geoname_ids: ids.len(),
        networks: networks.len(),
        output: config.output.clone(),
    })
}

/// `"s"` unless `n` is one
pub const fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
