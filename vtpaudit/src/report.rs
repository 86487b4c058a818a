//! Per-family CSV reports.
//!
//! Each vendor family has one [`ReportStore`]: a CSV file that is only ever
//! appended to. The header `HOSTNAME,IP ADDR,VTP MODE` is written when the
//! store opens a file that is empty, so it appears exactly once no matter
//! how many runs append to the same file.
//!
//! A store serializes its open-check-header-append sequence behind an async
//! mutex. The file I/O itself runs on the blocking pool, and every row
//! reaches the file in a single `write_all`, so concurrent device tasks never
//! interleave rows. A row whose write fails is truncated away, and a file
//! that still ends in a partial row is terminated before the next append.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, warn};
use tokio::sync::Mutex;

use crate::error::ReportError;
use crate::platform::VendorFamily;
use crate::task::AuditRecord;

/// Header row of every report.
pub const HEADER: [&str; 3] = ["HOSTNAME", "IP ADDR", "VTP MODE"];

/// Encode one CSV row, terminator included.
fn encode_row(fields: &[&str]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

/// Single-writer handle on one report file.
///
/// The file is opened on the first append and reused afterwards. A store
/// that is never written to never creates its file.
#[derive(Debug)]
pub struct ReportStore {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl ReportStore {
    /// Create a store for `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
        }
    }

    /// Path of the report file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record as one row.
    ///
    /// On failure the file handle is dropped, and the next append reopens
    /// it and re-checks whether the header is needed.
    pub async fn append(&self, record: &AuditRecord) -> Result<(), ReportError> {
        let row = encode_row(&[
            record.hostname.as_str(),
            record.address.as_str(),
            record.result.mode.as_str(),
        ])?;

        let mut slot = self.file.lock().await;
        let file = slot.take();
        let path = self.path.clone();

        let (file, result) = tokio::task::spawn_blocking(move || write_row(&path, file, &row))
            .await
            .map_err(|e| ReportError::Io(io::Error::other(e)))?;

        *slot = file;
        result
    }
}

/// Write `row`, opening the report first if needed.
///
/// Returns the handle to keep, which is `None` after any failure.
fn write_row(
    path: &Path,
    file: Option<File>,
    row: &[u8],
) -> (Option<File>, Result<(), ReportError>) {
    let mut file = match file {
        Some(file) => file,
        None => match open_report(path) {
            Ok(file) => file,
            Err(e) => return (None, Err(e)),
        },
    };

    match append_row(&mut file, row) {
        Ok(()) => (Some(file), Ok(())),
        Err(e) => {
            warn!("{}: row write failed: {}", path.display(), e);
            (None, Err(e.into()))
        }
    }
}

/// Append one row, truncating back to the previous length on failure.
fn append_row(file: &mut File, row: &[u8]) -> io::Result<()> {
    let len = file.metadata()?.len();

    if let Err(e) = file.write_all(row).and_then(|_| file.flush()) {
        if let Err(truncate) = file.set_len(len) {
            warn!("Failed to remove partial row: {}", truncate);
        }
        return Err(e);
    }

    Ok(())
}

/// Open for append, writing the header if the file is empty.
fn open_report(path: &Path) -> Result<File, ReportError> {
    let open_err = |source| ReportError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)?;

    let len = file.metadata().map_err(open_err)?.len();
    if len == 0 {
        debug!("Writing header to {}", path.display());
        file.write_all(&encode_row(&HEADER)?)?;
        file.flush()?;
    } else if !ends_with_newline(&mut file, len).map_err(open_err)? {
        warn!("{} ends with a partial row, terminating it", path.display());
        file.write_all(b"\r\n")?;
        file.flush()?;
    }

    Ok(file)
}

fn ends_with_newline(file: &mut File, len: u64) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Report paths for each family.
#[derive(Debug)]
pub struct ReportSet {
    stores: IndexMap<VendorFamily, ReportStore>,
}

impl ReportSet {
    /// Create one store per (family, path) pair.
    pub fn new(paths: impl IntoIterator<Item = (VendorFamily, PathBuf)>) -> Self {
        Self {
            stores: paths
                .into_iter()
                .map(|(family, path)| (family, ReportStore::new(path)))
                .collect(),
        }
    }

    /// Get the store of a family.
    pub fn store(&self, family: VendorFamily) -> Option<&ReportStore> {
        self.stores.get(&family)
    }

    /// Append a record to its family's store.
    pub async fn append(&self, record: &AuditRecord) -> Result<(), ReportError> {
        let store = self
            .store(record.family)
            .ok_or(ReportError::NoStore {
                family: record.family,
            })?;
        store.append(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{ModeResult, VtpMode};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(family: VendorFamily, hostname: &str, mode: VtpMode) -> AuditRecord {
        AuditRecord {
            family,
            hostname: hostname.to_string(),
            address: format!("10.0.0.{}", hostname.len()),
            result: ModeResult::new(mode),
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_encode_row() {
        assert_eq!(encode_row(&HEADER).unwrap(), b"HOSTNAME,IP ADDR,VTP MODE\r\n");
        assert_eq!(encode_row(&["a,b", "c"]).unwrap(), b"\"a,b\",c\r\n");
    }

    #[tokio::test]
    async fn test_header_written_once_sequentially() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path().join("nxos.csv"));

        for i in 0..5 {
            let r = record(VendorFamily::CiscoNxos, &format!("sw{i}"), VtpMode::Server);
            store.append(&r).await.unwrap();
        }

        let lines = read_lines(store.path());
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "HOSTNAME,IP ADDR,VTP MODE");
        assert_eq!(lines[1], "sw0,10.0.0.3,server");
        assert_eq!(lines.iter().filter(|l| l.starts_with("HOSTNAME")).count(), 1);
    }

    #[tokio::test]
    async fn test_header_written_once_concurrently() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ReportStore::new(dir.path().join("nxos.csv")));

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let r = record(VendorFamily::CiscoNxos, &format!("sw{i}"), VtpMode::Off);
                store.append(&r).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let lines = read_lines(store.path());
        assert_eq!(lines.len(), 33);
        assert_eq!(lines[0], "HOSTNAME,IP ADDR,VTP MODE");
        assert_eq!(lines.iter().filter(|l| l.starts_with("HOSTNAME")).count(), 1);
        assert!(lines[1..].iter().all(|l| l.ends_with(",off")));
    }

    #[tokio::test]
    async fn test_existing_report_is_appended_without_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ios.csv");

        let first = ReportStore::new(&path);
        first
            .append(&record(VendorFamily::CiscoIos, "a", VtpMode::Client))
            .await
            .unwrap();
        drop(first);

        let second = ReportStore::new(&path);
        second
            .append(&record(VendorFamily::CiscoIos, "b", VtpMode::Transparent))
            .await
            .unwrap();

        let lines = read_lines(&path);
        assert_eq!(
            lines,
            ["HOSTNAME,IP ADDR,VTP MODE", "a,10.0.0.1,client", "b,10.0.0.1,transparent"]
        );
    }

    #[tokio::test]
    async fn test_families_are_isolated() {
        let dir = TempDir::new().unwrap();
        let nxos_path = dir.path().join("nxos.csv");
        let ios_path = dir.path().join("ios.csv");
        let reports = ReportSet::new([
            (VendorFamily::CiscoNxos, nxos_path.clone()),
            (VendorFamily::CiscoIos, ios_path.clone()),
        ]);

        reports
            .append(&record(VendorFamily::CiscoNxos, "nx1", VtpMode::FeatureDisabled))
            .await
            .unwrap();

        assert!(nxos_path.exists());
        assert!(!ios_path.exists());
        assert_eq!(read_lines(&nxos_path)[1], "nx1,10.0.0.3,feature-disabled");
    }

    #[tokio::test]
    async fn test_failed_open_does_not_poison_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("later").join("nxos.csv");
        let store = ReportStore::new(&path);
        let r = record(VendorFamily::CiscoNxos, "nx1", VtpMode::Server);

        let err = store.append(&r).await.unwrap_err();
        assert!(matches!(err, ReportError::Open { .. }));

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        store.append(&r).await.unwrap();

        assert_eq!(
            read_lines(&path),
            ["HOSTNAME,IP ADDR,VTP MODE", "nx1,10.0.0.3,server"]
        );
    }

    #[tokio::test]
    async fn test_partial_row_is_terminated_before_next_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nxos.csv");
        fs::write(&path, "HOSTNAME,IP ADDR,VTP MODE\r\nsw1,10.0.0").unwrap();

        let store = ReportStore::new(&path);
        store
            .append(&record(VendorFamily::CiscoNxos, "sw2", VtpMode::Server))
            .await
            .unwrap();

        assert_eq!(
            read_lines(&path),
            ["HOSTNAME,IP ADDR,VTP MODE", "sw1,10.0.0", "sw2,10.0.0.3,server"]
        );
    }

    #[test]
    fn test_failed_write_leaves_no_partial_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ios.csv");
        fs::write(&path, "HOSTNAME,IP ADDR,VTP MODE\r\n").unwrap();

        // Read-only handle: the write fails and the file is left as it was
        let mut file = File::open(&path).unwrap();
        assert!(append_row(&mut file, b"a,10.0.0.1,client\r\n").is_err());
        drop(file);

        let (file, result) = write_row(&path, None, b"b,10.0.0.1,client\r\n");
        result.unwrap();
        assert!(file.is_some());
        assert_eq!(
            read_lines(&path),
            ["HOSTNAME,IP ADDR,VTP MODE", "b,10.0.0.1,client"]
        );
    }

    #[tokio::test]
    async fn test_missing_store() {
        let reports = ReportSet::new([]);
        let err = reports
            .append(&record(VendorFamily::CiscoIos, "a", VtpMode::Client))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::NoStore { family: VendorFamily::CiscoIos }));
    }
}
