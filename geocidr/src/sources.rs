use std::path::{Path, PathBuf};

use log::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

pub const DEFAULT_LOCATIONS: &str = "/etc/ipset/GeoLite2-Country-Locations-en.csv";
pub const DEFAULT_BLOCKS_V4: &str = "/etc/ipset/GeoLite2-Country-Blocks-IPv4.csv";
pub const DEFAULT_BLOCKS_V6: &str = "/etc/ipset/GeoLite2-Country-Blocks-IPv6.csv";

/// prefix of the dated directories a GeoLite2 country CSV archive unpacks into
const DATA_DIR_PREFIX: &str = "GeoLite2-Country-CSV_";

/// The two input tables the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub locations: PathBuf,
    pub blocks: PathBuf,
}

/// Something that knows where the input tables live.
pub trait ResolveSources {
    fn resolve(&self) -> Result<Sources>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpVersion {
    #[default]
    V4,
    V6,
}

impl IpVersion {
    fn blocks_file(self) -> &'static str {
        match self {
            IpVersion::V4 => "GeoLite2-Country-Blocks-IPv4.csv",
            IpVersion::V6 => "GeoLite2-Country-Blocks-IPv6.csv",
        }
    }
}

/// Explicit paths, taken as given.
#[derive(Debug, Clone)]
pub struct FixedPaths(pub Sources);

impl FixedPaths {
    pub fn new<L: Into<PathBuf>, B: Into<PathBuf>>(locations: L, blocks: B) -> Self {
        Self(Sources {
            locations: locations.into(),
            blocks: blocks.into(),
        })
    }
}

impl Default for FixedPaths {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATIONS, DEFAULT_BLOCKS_V4)
    }
}

impl ResolveSources for FixedPaths {
    fn resolve(&self) -> Result<Sources> {
        Ok(self.0.clone())
    }
}

/// Search a directory for the newest unpacked `GeoLite2-Country-CSV_<date>` folder.
#[derive(Debug, Clone)]
pub struct DataDir {
    pub root: PathBuf,
    pub locale: String,
    pub ip_version: IpVersion,
}

impl DataDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            locale: "en".into(),
            ip_version: IpVersion::V4,
        }
    }

    fn locations_file(&self) -> String {
        format!("GeoLite2-Country-Locations-{}.csv", self.locale)
    }

    fn holds_tables(&self, dir: &Path) -> bool {
        dir.join(self.locations_file()).is_file()
            && dir.join(self.ip_version.blocks_file()).is_file()
    }
}

impl ResolveSources for DataDir {
    fn resolve(&self) -> Result<Sources> {
        // dated names sort chronologically
        let newest = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok().filter(is_data_dir))
            .map(DirEntry::into_path)
            .max();

        let dir = match newest {
            Some(d) => d,
            None if self.holds_tables(&self.root) => self.root.clone(),
            None => {
                return Err(Error::DataDirNotFound {
                    root: self.root.clone(),
                })
            }
        };
        debug!("using data directory {}", dir.display());

        Ok(Sources {
            locations: dir.join(self.locations_file()),
            blocks: dir.join(self.ip_version.blocks_file()),
        })
    }
}

fn is_data_dir(e: &DirEntry) -> bool {
    e.file_type().is_dir() && e.file_name().to_string_lossy().starts_with(DATA_DIR_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_tables(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        for f in [
            "GeoLite2-Country-Locations-en.csv",
            "GeoLite2-Country-Locations-de.csv",
            "GeoLite2-Country-Blocks-IPv4.csv",
            "GeoLite2-Country-Blocks-IPv6.csv",
        ] {
            fs::write(dir.join(f), "").unwrap();
        }
    }

    #[test]
    fn fixed_paths_resolve_verbatim() {
        let sources = FixedPaths::new("a.csv", "b.csv").resolve().unwrap();
        assert_eq!(sources.locations, Path::new("a.csv"));
        assert_eq!(sources.blocks, Path::new("b.csv"));
    }

    #[test]
    fn fixed_paths_default() {
        let sources = FixedPaths::default().resolve().unwrap();
        assert_eq!(sources.locations, Path::new(DEFAULT_LOCATIONS));
        assert_eq!(sources.blocks, Path::new(DEFAULT_BLOCKS_V4));
    }

    #[test]
    fn picks_newest_dated_directory() {
        let root = tempfile::tempdir().unwrap();
        touch_tables(&root.path().join("GeoLite2-Country-CSV_20240102"));
        touch_tables(&root.path().join("GeoLite2-Country-CSV_20241105"));
        touch_tables(&root.path().join("GeoLite2-Country-CSV_20230630"));
        fs::write(root.path().join("GeoLite2-Country-CSV_20991231.zip"), "").unwrap();

        let sources = DataDir::new(root.path()).resolve().unwrap();
        let expected = root.path().join("GeoLite2-Country-CSV_20241105");
        assert_eq!(
            sources.locations,
            expected.join("GeoLite2-Country-Locations-en.csv")
        );
        assert_eq!(
            sources.blocks,
            expected.join("GeoLite2-Country-Blocks-IPv4.csv")
        );
    }

    #[test]
    fn locale_and_ip_version_select_files() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("GeoLite2-Country-CSV_20240102");
        touch_tables(&data);

        let finder = DataDir {
            root: root.path().to_path_buf(),
            locale: "de".into(),
            ip_version: IpVersion::V6,
        };
        let sources = finder.resolve().unwrap();
        assert_eq!(
            sources.locations,
            data.join("GeoLite2-Country-Locations-de.csv")
        );
        assert_eq!(sources.blocks, data.join("GeoLite2-Country-Blocks-IPv6.csv"));
    }

    #[test]
    fn root_holding_tables_is_used_directly() {
        let root = tempfile::tempdir().unwrap();
        touch_tables(root.path());

        let sources = DataDir::new(root.path()).resolve().unwrap();
        assert_eq!(
            sources.locations,
            root.path().join("GeoLite2-Country-Locations-en.csv")
        );
    }

    #[test]
    fn nothing_found_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("unrelated")).unwrap();

        let err = DataDir::new(root.path()).resolve().unwrap_err();
        assert!(matches!(err, Error::DataDirNotFound { .. }));
    }
}
