use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use csv::{Reader, ReaderBuilder, StringRecord};
use log::warn;

use crate::error::{Error, Result, Table};

/// Open one of the input tables, telling a missing file apart from one that can't be read.
pub(crate) fn open_table(table: Table, p: &Path) -> Result<File> {
    File::open(p).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::SourceNotFound {
            table,
            path: p.to_path_buf(),
        },
        _ => Error::SourceUnreadable {
            table,
            path: p.to_path_buf(),
            source: e.into(),
        },
    })
}

// short rows are allowed through and skipped by the callers
pub(crate) fn table_reader<R: Read>(rdr: R) -> Reader<R> {
    ReaderBuilder::new().flexible(true).from_reader(rdr)
}

pub(crate) fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    let idx = headers.iter().position(|h| h == name);
    if idx.is_none() {
        warn!("column <{}> missing from header, no rows will match", name);
    }
    idx
}

pub(crate) fn field(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
}
