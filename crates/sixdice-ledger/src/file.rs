use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sixdice_types::Amount;
use tracing::{debug, info, warn};

use crate::entry::{sum_entries, EntryKind, LedgerEntry, INITIAL_BALANCE};
use crate::error::{LedgerError, LedgerResult};
use crate::memory::InMemoryLedger;
use crate::traits::{LedgerReader, LedgerWriter};

/// Flush/sync strategy for the ledger file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` after every append.
    EveryWrite,
    /// Flush to the OS and rely on page-cache buffering.
    #[default]
    OsDefault,
}

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Append-only ledger persisted to a single log file.
///
/// On-disk format, one frame per entry:
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized LedgerEntry)]
/// ```
///
/// Every append is encoded into one buffer and written unbuffered before it
/// becomes visible in memory. A failed write truncates the file back to the
/// last committed frame. On open the file is replayed front-to-back: frames
/// that fail the CRC check are skipped, and a torn tail frame is cut off so
/// later appends land after the last complete frame.
pub struct FileLedger {
    path: PathBuf,
    file: File,
    /// Byte length of the file covered by committed entries.
    committed_len: u64,
    state: InMemoryLedger,
    sync_mode: SyncMode,
}

impl FileLedger {
    /// Open (or create) the ledger file at `path` and replay its entries.
    pub fn open(path: &Path, sync_mode: SyncMode) -> LedgerResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let (entries, valid_len) = recover(path)?;
        let file_len = file.metadata()?.len();
        if valid_len < file_len {
            warn!(
                path = %path.display(),
                valid_len,
                file_len,
                "discarding torn tail of ledger file"
            );
            file.set_len(valid_len)?;
        }

        info!(path = %path.display(), entries = entries.len(), "ledger file opened");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            committed_len: valid_len,
            state: InMemoryLedger::from_entries(entries),
            sync_mode,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file used to stage a reset before it replaces the ledger.
    fn reset_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".reset");
        self.path.with_file_name(name)
    }

    /// Write pre-encoded frames at the end of the file.
    ///
    /// On failure the file is cut back to `committed_len` so no partial or
    /// stale frame survives into the next append or a later replay.
    fn write_frames(&mut self, frames: &[u8]) -> LedgerResult<()> {
        let written = self.file.write_all(frames).and_then(|()| {
            if self.sync_mode == SyncMode::EveryWrite {
                self.file.sync_data()
            } else {
                Ok(())
            }
        });

        if let Err(e) = written {
            if let Err(rollback) = self.file.set_len(self.committed_len) {
                warn!(
                    path = %self.path.display(),
                    error = %rollback,
                    "failed to roll back partial ledger write"
                );
            }
            return Err(e.into());
        }
        self.committed_len += frames.len() as u64;
        Ok(())
    }
}

/// Write `frames` to `staged`, sync, and rename it over `target`.
///
/// The returned handle stays valid after the rename and is opened for append.
fn replace_with_staged(staged: &Path, target: &Path, frames: &[u8]) -> io::Result<File> {
    match fs::remove_file(staged) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(staged)?;
    file.write_all(frames)?;
    file.sync_all()?;
    fs::rename(staged, target)?;
    Ok(file)
}

/// Encode entries as consecutive frames.
fn encode_frames(entries: &[LedgerEntry]) -> LedgerResult<Vec<u8>> {
    let mut buf = Vec::new();
    for entry in entries {
        let payload =
            bincode::serialize(entry).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let length = payload.len() as u32;
        buf.extend_from_slice(&length.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        buf.extend_from_slice(&payload);
    }
    Ok(buf)
}

impl LedgerReader for FileLedger {
    fn entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        Ok(self.state.as_slice().to_vec())
    }

    fn balance(&self) -> LedgerResult<Amount> {
        sum_entries(self.state.as_slice())
    }

    fn len(&self) -> LedgerResult<usize> {
        Ok(self.state.as_slice().len())
    }
}

impl LedgerWriter for FileLedger {
    fn append(&mut self, value: Amount, kind: EntryKind) -> LedgerResult<LedgerEntry> {
        let entry = self.state.prepare(value, kind);
        self.write_frames(&encode_frames(std::slice::from_ref(&entry))?)?;
        self.state.commit(entry.clone());
        debug!(id = entry.id, value, %kind, "ledger append");
        Ok(entry)
    }

    fn append_all(&mut self, batch: &[(Amount, EntryKind)]) -> LedgerResult<Vec<LedgerEntry>> {
        let entries = self.state.prepare_batch(batch);
        self.write_frames(&encode_frames(&entries)?)?;
        for entry in &entries {
            self.state.commit(entry.clone());
        }
        debug!(count = entries.len(), "ledger batch append");
        Ok(entries)
    }

    /// Stage the fresh `Init` frame in a sibling file, then rename it over
    /// the ledger. The old history stays intact until the rename succeeds.
    fn reset(&mut self) -> LedgerResult<LedgerEntry> {
        let entry = self.state.prepare(INITIAL_BALANCE, EntryKind::Init);
        let frames = encode_frames(std::slice::from_ref(&entry))?;
        let staged = self.reset_path();

        let staged_file = replace_with_staged(&staged, &self.path, &frames);

        let file = match staged_file {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger reset failed; history kept");
                if staged.is_file() {
                    let _ = fs::remove_file(&staged);
                }
                return Err(e.into());
            }
        };

        let discarded = self.state.as_slice().len();
        self.file = file;
        self.committed_len = frames.len() as u64;
        self.state.clear();
        self.state.commit(entry.clone());
        info!(path = %self.path.display(), discarded, "ledger reset");
        Ok(entry)
    }
}

/// Replay every intact frame, returning the entries and the byte length of
/// the readable prefix.
fn recover(path: &Path) -> LedgerResult<(Vec<LedgerEntry>, u64)> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let mut entries = Vec::new();
    let mut offset: u64 = 0;

    while offset + HEADER_SIZE as u64 <= file_len {
        let mut header = [0u8; HEADER_SIZE];
        match reader.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }

        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if length == 0 || offset + HEADER_SIZE as u64 + length as u64 > file_len {
            warn!(offset, length, file_len, "invalid ledger frame length; stopping recovery");
            break;
        }

        let mut payload = vec![0u8; length as usize];
        match reader.read_exact(&mut payload) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                warn!(offset, "truncated ledger frame; stopping recovery");
                break;
            }
            Err(e) => return Err(e.into()),
        }

        let frame_end = offset + HEADER_SIZE as u64 + length as u64;
        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            warn!(
                offset,
                expected = expected_crc,
                actual = actual_crc,
                "CRC mismatch; skipping ledger frame"
            );
            offset = frame_end;
            continue;
        }

        match bincode::deserialize::<LedgerEntry>(&payload) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(offset, error = %e, "failed to decode ledger frame; skipping"),
        }
        offset = frame_end;
    }

    debug!(recovered = entries.len(), "ledger recovery complete");
    Ok((entries, offset))
}
