use anyhow::{Context, Result};
use clap::Parser;
use geocidr::{Config, DataDir, FixedPaths, IpVersion, ResolveSources};
use log::{info, LevelFilter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version)]
/// Write the GeoLite2 country networks of one country to an ipset-ready list
struct Args {
    /// ISO country code to extract, matched exactly
    #[clap(short, long, value_parser, default_value = geocidr::DEFAULT_COUNTRY)]
    country: String,
    /// locations table [default: /etc/ipset/GeoLite2-Country-Locations-en.csv]
    #[clap(short, long, value_parser)]
    locations: Option<PathBuf>,
    /// blocks table [default: /etc/ipset/GeoLite2-Country-Blocks-IPv4.csv, or the IPv6 file with --ipv6]
    #[clap(short, long, value_parser)]
    blocks: Option<PathBuf>,
    /// search this directory for the newest GeoLite2-Country-CSV_<date> folder
    #[clap(
        short,
        long,
        value_parser,
        env = "GEOCIDR_DATA_DIR",
        conflicts_with_all = &["locations", "blocks"]
    )]
    data_dir: Option<PathBuf>,
    /// locale of the locations table inside the data directory
    #[clap(long, value_parser, default_value = "en")]
    locale: String,
    /// read IPv6 blocks instead of IPv4
    #[clap(short = '6', long, action)]
    ipv6: bool,
    /// output file, replaced on success
    #[clap(short, long, value_parser, default_value = geocidr::DEFAULT_OUTPUT)]
    output: PathBuf,
    /// exit with an error when no location matches the country
    #[clap(long, action)]
    fail_on_empty: bool,
    /// more logging, repeat for trace
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// only log errors, wins over --verbose
    #[clap(short, long, action)]
    quiet: bool,
}

impl Args {
    fn ip_version(&self) -> IpVersion {
        if self.ipv6 {
            IpVersion::V6
        } else {
            IpVersion::V4
        }
    }

    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }

    fn resolver(&self) -> Box<dyn ResolveSources> {
        match &self.data_dir {
            Some(root) => Box::new(DataDir {
                root: root.clone(),
                locale: self.locale.clone(),
                ip_version: self.ip_version(),
            }),
            None => {
                let default_blocks = match self.ip_version() {
                    IpVersion::V4 => geocidr::DEFAULT_BLOCKS_V4,
                    IpVersion::V6 => geocidr::DEFAULT_BLOCKS_V6,
                };
                Box::new(FixedPaths::new(
                    self.locations
                        .clone()
                        .unwrap_or_else(|| geocidr::DEFAULT_LOCATIONS.into()),
                    self.blocks
                        .clone()
                        .unwrap_or_else(|| default_blocks.into()),
                ))
            }
        }
    }

    fn config(&self) -> Config {
        Config {
            country: self.country.clone(),
            output: self.output.clone(),
            fail_on_empty: self.fail_on_empty,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level()).context("initializing logger")?;

    let sources = args
        .resolver()
        .resolve()
        .context("locating input tables")?;
    let report = geocidr::run(&sources, &args.config())
        .with_context(|| format!("extracting networks for {}", args.country))?;

    info!(
        "wrote {} network{} to {}",
        report.networks,
        geocidr::plural(report.networks),
        report.output.display()
    );
    Ok(())
}

// RUST_LOG is read first, the command line level wins
fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .try_init()
}
