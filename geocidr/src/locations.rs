use std::{collections::HashSet, io::Read};

use crate::utils::{column, field, table_reader};

/// Geoname ids whose location row carries the target country code.
pub type GeonameIdSet = HashSet<String>;

/// Scan a locations table and collect every `geoname_id` whose `country_iso_code`
/// is exactly `country`.
///
/// Rows without either field never match. An empty set is a valid result.
pub fn filter_locations<R: Read>(rdr: R, country: &str) -> csv::Result<GeonameIdSet> {
    let mut rdr = table_reader(rdr);
    let headers = rdr.headers()?.clone();
    let iso_idx = column(&headers, "country_iso_code");
    let id_idx = column(&headers, "geoname_id");

    let mut ids = GeonameIdSet::new();
    let mut record = csv::StringRecord::new();
    while rdr.read_record(&mut record)? {
        match (field(&record, iso_idx), field(&record, id_idx)) {
            (Some(iso), Some(id)) if iso == country => {
                ids.insert(id.to_owned());
            }
            _ => (),
        }
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATIONS: &str = "\
geoname_id,locale_code,continent_code,continent_name,country_iso_code,country_name,is_in_european_union
1643084,en,AS,Asia,ID,Indonesia,0
6252001,en,NA,\"North America\",US,\"United States\",0
1733045,en,AS,Asia,MY,Malaysia,0
";

    #[test]
    fn collects_only_matching_country() {
        let ids = filter_locations(LOCATIONS.as_bytes(), "ID").unwrap();
        assert_eq!(ids, GeonameIdSet::from(["1643084".to_string()]));
    }

    #[test]
    fn match_is_case_sensitive() {
        let ids = filter_locations(LOCATIONS.as_bytes(), "id").unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn duplicate_ids_collapse() {
        let data = "geoname_id,country_iso_code\n100,ID\n100,ID\n101,ID\n";
        let ids = filter_locations(data.as_bytes(), "ID").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("100"));
        assert!(ids.contains("101"));
    }

    #[test]
    fn short_rows_are_skipped() {
        let data = "geoname_id,country_iso_code\n100\n200,ID\n";
        let ids = filter_locations(data.as_bytes(), "ID").unwrap();
        assert_eq!(ids, GeonameIdSet::from(["200".to_string()]));
    }

    #[test]
    fn missing_column_matches_nothing() {
        let data = "geoname_id,country_name\n100,Indonesia\n";
        let ids = filter_locations(data.as_bytes(), "ID").unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn column_order_does_not_matter() {
        let data = "country_iso_code,geoname_id\nID,300\nUS,400\n";
        let ids = filter_locations(data.as_bytes(), "ID").unwrap();
        assert_eq!(ids, GeonameIdSet::from(["300".to_string()]));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let data: &[u8] = b"geoname_id,country_iso_code\n\xff\xfe,ID\n";
        assert!(filter_locations(data, "ID").is_err());
    }
}
