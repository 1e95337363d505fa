use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Which input table a read failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Locations,
    Blocks,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Locations => f.write_str("locations"),
            Table::Blocks => f.write_str("blocks"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{table} table not found at {}", path.display())]
    SourceNotFound { table: Table, path: PathBuf },

    #[error("could not read {table} table {}: {source}", path.display())]
    SourceUnreadable {
        table: Table,
        path: PathBuf,
        source: csv::Error,
    },

    #[error("no GeoLite2 country data directory found under {}", root.display())]
    DataDirNotFound { root: PathBuf },

    #[error("output directory {} does not exist", dir.display())]
    DestinationMissingDir { dir: PathBuf },

    #[error("could not write output {}: {source}", path.display())]
    DestinationUnwritable { path: PathBuf, source: io::Error },

    /// only fatal when the caller asks for it, see `Config::fail_on_empty`
    #[error("no locations match country code {country:?}")]
    NoMatchesFound { country: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
