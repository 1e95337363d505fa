use std::io::Read;

use log::debug;

use crate::{
    locations::GeonameIdSet,
    utils::{column, field, table_reader},
};

/// Scan a blocks table and return the `network` of every row whose `geoname_id`
/// is in `ids`, in table order.
pub fn extract_networks<R: Read>(rdr: R, ids: &GeonameIdSet) -> csv::Result<Vec<String>> {
    let mut rdr = table_reader(rdr);
    let headers = rdr.headers()?.clone();
    let id_idx = column(&headers, "geoname_id");
    let net_idx = column(&headers, "network");

    let mut networks = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut rows = 0usize;
    while rdr.read_record(&mut record)? {
        rows += 1;
        match (field(&record, id_idx), field(&record, net_idx)) {
            (Some(id), Some(net)) if ids.contains(id) => networks.push(net.to_owned()),
            _ => (),
        }
    }
    debug!("matched {} of {} block rows", networks.len(), rows);

    Ok(networks)
}
