//! Append-only correlation ledger.
//!
//! Every record is written as one line and flushed before the next pair is
//! computed, so a killed run loses at most the line being written. On open
//! the existing file is scanned into a completed-key set and the sweep
//! skips those keys.
//!
//! Only newline-terminated lines count as records. A last line without its
//! newline is a torn write even when its fields happen to parse.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::LedgerResult;
use crate::record::{CorrelationKey, CorrelationRecord};

pub struct CorrelationLedger {
    path: PathBuf,
    writer: BufWriter<File>,
    completed: HashSet<CorrelationKey>,
}

impl CorrelationLedger {
    /// Open (or create) the ledger at `path` for appending.
    ///
    /// A torn last line left by an interrupted write is cut off, so the
    /// next record starts on a fresh line and the torn bytes are never read
    /// back.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let scan = scan_ledger(&path)?;
        let completed: HashSet<CorrelationKey> = scan.records.iter().map(|r| r.key).collect();

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        if scan.torn_tail {
            warn!(
                path = %path.display(),
                keep = scan.terminated_len,
                "ledger ends with a partial record, truncating it"
            );
            file.set_len(scan.terminated_len)?;
        }

        info!(
            path = %path.display(),
            completed = completed.len(),
            "correlation ledger opened"
        );
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            completed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_completed(&self, key: &CorrelationKey) -> bool {
        self.completed.contains(key)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn completed(&self) -> &HashSet<CorrelationKey> {
        &self.completed
    }

    /// Write `record` as one line and flush it to the file.
    pub fn append(&mut self, record: &CorrelationRecord) -> LedgerResult<()> {
        writeln!(self.writer, "{}", record.to_line())?;
        self.writer.flush()?;
        self.completed.insert(record.key);
        debug!(key = %record.key, i2 = record.i2, "ledger record appended");
        Ok(())
    }
}

/// Keys of every well-formed record in the ledger at `path`.
///
/// A missing file is an empty ledger. Malformed lines are skipped.
pub fn load_completed(path: &Path) -> LedgerResult<HashSet<CorrelationKey>> {
    Ok(read_records(path)?.into_iter().map(|r| r.key).collect())
}

/// Every well-formed record in file order.
///
/// A missing file yields no records. Malformed lines, lines that are not
/// valid UTF-8 and an unterminated last line are skipped and counted in a
/// log message.
pub fn read_records(path: &Path) -> LedgerResult<Vec<CorrelationRecord>> {
    Ok(scan_ledger(path)?.records)
}

struct LedgerScan {
    records: Vec<CorrelationRecord>,
    /// Byte length up to and including the last newline.
    terminated_len: u64,
    torn_tail: bool,
}

fn scan_ledger(path: &Path) -> LedgerResult<LedgerScan> {
    let mut scan = LedgerScan {
        records: Vec::new(),
        terminated_len: 0,
        torn_tail: false,
    };
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(scan),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut malformed = 0usize;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        if buf.last() != Some(&b'\n') {
            scan.torn_tail = true;
            malformed += 1;
            break;
        }
        scan.terminated_len += read as u64;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                malformed += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match CorrelationRecord::parse_line(line) {
            Ok(record) => scan.records.push(record),
            Err(_) => malformed += 1,
        }
    }
    if malformed > 0 {
        warn!(path = %path.display(), malformed, "skipped malformed ledger lines");
    }
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ColumnOrigin;
    use datastore_miner_core::MoranPair;

    fn record(ci: usize, cj: usize, i2: f64) -> CorrelationRecord {
        CorrelationRecord::new(
            CorrelationKey::new(0, 1, ci, cj),
            MoranPair::single(i2),
            ColumnOrigin::new("a.csv", format!("c{}", ci)),
            ColumnOrigin::new("b.csv", format!("c{}", cj)),
            4,
            10,
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.csv");
        assert!(load_completed(&path).unwrap().is_empty());
        assert!(read_records(&path).unwrap().is_empty());
    }

    #[test]
    fn test_append_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");

        let mut ledger = CorrelationLedger::open(&path).unwrap();
        ledger.append(&record(0, 0, 0.5)).unwrap();
        ledger.append(&record(0, 1, f64::NAN)).unwrap();
        assert!(ledger.is_completed(&CorrelationKey::new(0, 1, 0, 1)));
        drop(ledger);

        let ledger = CorrelationLedger::open(&path).unwrap();
        assert_eq!(ledger.completed_count(), 2);
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].is_degenerate());
    }

    #[test]
    fn test_partial_last_line_is_cut_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let full = record(0, 0, 0.25).to_line();
        std::fs::write(&path, format!("{}\nCorrelate,,0.1,0,1,0", full)).unwrap();

        let mut ledger = CorrelationLedger::open(&path).unwrap();
        assert_eq!(ledger.completed_count(), 1);
        ledger.append(&record(0, 1, 0.75)).unwrap();
        drop(ledger);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].i2, 0.75);
    }

    #[test]
    fn test_line_cut_inside_multibyte_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut bytes = format!("{}\n", record(0, 0, 0.25).to_line()).into_bytes();
        bytes.extend_from_slice(b"Correlate,,0.1,0,1,0,0,a.csv,b.csv,caf\xC3");
        std::fs::write(&path, &bytes).unwrap();

        assert_eq!(load_completed(&path).unwrap().len(), 1);
        let mut ledger = CorrelationLedger::open(&path).unwrap();
        assert_eq!(ledger.completed_count(), 1);
        ledger.append(&record(0, 1, 0.75)).unwrap();
        drop(ledger);

        // the torn bytes are gone, so the whole file is UTF-8 again
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_invalid_utf8_inside_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut bytes = b"Correlate,,0.1,0,1,0,0,a.csv,b.csv,caf\xC3,x,4,4,4,9\n".to_vec();
        bytes.extend_from_slice(format!("{}\n", record(0, 0, 0.25).to_line()).as_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, CorrelationKey::new(0, 1, 0, 0));
        assert_eq!(CorrelationLedger::open(&path).unwrap().completed_count(), 1);
    }

    #[test]
    fn test_unterminated_line_that_parses_is_not_a_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut torn = record(0, 1, 0.5);
        torn.elapsed_ms = 1234;
        let line = torn.to_line();
        // cut inside the elapsedMs digits
        let cut = &line[..line.len() - 2];
        assert!(CorrelationRecord::parse_line(cut).is_ok());
        std::fs::write(&path, format!("{}\n{}", record(0, 0, 0.25).to_line(), cut)).unwrap();

        assert_eq!(read_records(&path).unwrap().len(), 1);
        let ledger = CorrelationLedger::open(&path).unwrap();
        assert!(!ledger.is_completed(&CorrelationKey::new(0, 1, 0, 1)));
        drop(ledger);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
