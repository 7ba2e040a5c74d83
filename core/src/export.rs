//! JSON export of store contents in their current order.

use crate::{
    error::ScopeResult,
    record::{Channel, Record},
    store::{Backend, RecordStore},
    workspace::Workspace,
};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Write `store` as a JSON array of records.
pub fn write_json<W: Write>(store: &dyn RecordStore, writer: W, pretty: bool) -> ScopeResult<()> {
    let records: Vec<&Record> = store.iter().collect();
    if pretty {
        serde_json::to_writer_pretty(writer, &records)?;
    } else {
        serde_json::to_writer(writer, &records)?;
    }
    Ok(())
}

pub fn to_json_string(store: &dyn RecordStore, pretty: bool) -> ScopeResult<String> {
    let mut buf = Vec::new();
    write_json(store, &mut buf, pretty)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write every channel's store for `backend` as one object keyed by
/// channel name.
pub fn write_channel_report<W: Write>(
    workspace: &Workspace,
    backend: Backend,
    writer: W,
    pretty: bool,
) -> ScopeResult<()> {
    let report: BTreeMap<&str, Vec<&Record>> = Channel::ALL
        .iter()
        .map(|c| (c.name(), workspace.store(*c, backend).iter().collect()))
        .collect();
    if pretty {
        serde_json::to_writer_pretty(writer, &report)?;
    } else {
        serde_json::to_writer(writer, &report)?;
    }
    Ok(())
}

/// Export `store` to a file at `path`. Returns the number of records written.
pub fn export_path(store: &dyn RecordStore, path: impl AsRef<Path>) -> ScopeResult<usize> {
    let path = path.as_ref();
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_json(store, &mut file, true)?;
    file.flush()?;
    log::info!("exported {} records to {}", store.len(), path.display());
    Ok(store.len())
}
