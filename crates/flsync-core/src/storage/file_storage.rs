//! Append-only log record storage

use crate::error::{FlError, FlResult, ResultExt};
use crate::state::TaskFileState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use super::encoding::{decode_state, encode_state};
use super::{RecordId, RecordStorage};

const MAGIC: &[u8; 4] = b"FLRS";
const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: u64 = 5;
const ENTRY_HEADER_LEN: usize = 8;

/// Location of the latest payload of a record inside the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    offset: u64,
    len: u32,
}

/// Result of scanning an existing log
#[derive(Debug, Default)]
struct Scan {
    index: HashMap<u32, Slot>,
    max_id: u32,
    /// End of the last complete entry
    valid_end: u64,
}

struct Inner {
    file: Option<fs::File>,
    index: HashMap<u32, Slot>,
    next_id: u32,
    end: u64,
}

/// Record storage backed by a single append-only log file
///
/// Layout:
/// ```text
/// "FLRS" version:u8
/// { record_id:u32le payload_len:u32le payload:[u8; payload_len] }*
/// ```
/// Payloads are gzip-compressed JSON states. The latest entry of a record id
/// wins, so updates supersede without rewriting the file.
pub struct FileRecordStorage {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl FileRecordStorage {
    /// Open the log at `path`, creating it if needed
    pub async fn open(path: impl Into<PathBuf>) -> FlResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .storage_context("Failed to create storage directory")?;
        }

        let mut file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await
            .storage_context(format!("Failed to open storage {:?}", path))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .await
            .storage_context("Failed to read storage")?;

        let mut header = MAGIC.to_vec();
        header.push(FORMAT_VERSION);

        let scan = if bytes.len() < header.len() && header.starts_with(&bytes) {
            if !bytes.is_empty() {
                tracing::warn!(
                    "Storage {:?} has an incomplete header ({} bytes), starting empty",
                    path,
                    bytes.len()
                );
                file.set_len(0)
                    .await
                    .storage_context("Failed to truncate storage")?;
                file.seek(SeekFrom::Start(0))
                    .await
                    .storage_context("Failed to seek storage")?;
            }
            file.write_all(&header)
                .await
                .storage_context("Failed to write storage header")?;
            file.flush().await.storage_context("Failed to flush storage")?;
            Scan {
                valid_end: HEADER_LEN,
                ..Default::default()
            }
        } else {
            let scan = scan_log(&bytes)?;
            if scan.valid_end < bytes.len() as u64 {
                tracing::warn!(
                    "Storage {:?} has {} trailing bytes of an incomplete entry, truncating",
                    path,
                    bytes.len() as u64 - scan.valid_end
                );
                file.set_len(scan.valid_end)
                    .await
                    .storage_context("Failed to truncate storage")?;
            }
            scan
        };

        tracing::debug!(
            "Opened storage {:?} with {} records",
            path,
            scan.index.len()
        );

        Ok(Self {
            path,
            inner: Mutex::new(Inner {
                file: Some(file),
                index: scan.index,
                next_id: scan.max_id + 1,
                end: scan.valid_end,
            }),
        })
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct records in the log
    pub async fn record_count(&self) -> usize {
        self.inner.lock().await.index.len()
    }
}

fn disposed() -> FlError {
    FlError::storage("Storage is disposed")
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn scan_log(bytes: &[u8]) -> FlResult<Scan> {
    if bytes.len() < HEADER_LEN as usize || &bytes[..4] != MAGIC {
        return Err(FlError::storage("Not a record storage file"));
    }
    if bytes[4] != FORMAT_VERSION {
        return Err(FlError::storage(format!(
            "Unsupported storage format version {}",
            bytes[4]
        )));
    }

    let mut scan = Scan {
        valid_end: HEADER_LEN,
        ..Default::default()
    };
    let mut pos = HEADER_LEN as usize;

    while pos + ENTRY_HEADER_LEN <= bytes.len() {
        let id = read_u32(bytes, pos);
        let len = read_u32(bytes, pos + 4);
        let payload_start = pos + ENTRY_HEADER_LEN;
        let payload_end = payload_start + len as usize;
        if payload_end > bytes.len() {
            break;
        }
        if id == 0 {
            return Err(FlError::storage_with_context(
                "Corrupted storage entry",
                format!("record id 0 at offset {}", pos),
            ));
        }
        scan.index.insert(
            id,
            Slot {
                offset: payload_start as u64,
                len,
            },
        );
        scan.max_id = scan.max_id.max(id);
        pos = payload_end;
        scan.valid_end = pos as u64;
    }

    Ok(scan)
}

#[async_trait]
impl RecordStorage for FileRecordStorage {
    async fn get_state(&self, record: Option<RecordId>) -> FlResult<TaskFileState> {
        let Some(record) = record else {
            return Ok(TaskFileState::new());
        };

        let mut inner = self.inner.lock().await;
        let slot = *inner
            .index
            .get(&record.0)
            .ok_or_else(|| FlError::storage(format!("Unknown record {}", record)))?;
        let file = inner.file.as_mut().ok_or_else(disposed)?;

        file.seek(SeekFrom::Start(slot.offset))
            .await
            .storage_context("Failed to seek storage")?;
        let mut payload = vec![0u8; slot.len as usize];
        file.read_exact(&mut payload)
            .await
            .storage_context(format!("Failed to read record {}", record))?;

        decode_state(&payload)
    }

    async fn update_state(
        &self,
        record: Option<RecordId>,
        state: &TaskFileState,
    ) -> FlResult<RecordId> {
        let payload = encode_state(state)?;
        let len = u32::try_from(payload.len())
            .map_err(|_| FlError::storage("State is too large to store"))?;

        let mut inner = self.inner.lock().await;
        let id = match record {
            Some(record) => record.0,
            None => inner.next_id,
        };
        let end = inner.end;
        let file = inner.file.as_mut().ok_or_else(disposed)?;

        let mut entry = Vec::with_capacity(ENTRY_HEADER_LEN + payload.len());
        entry.extend_from_slice(&id.to_le_bytes());
        entry.extend_from_slice(&len.to_le_bytes());
        entry.extend_from_slice(&payload);

        file.seek(SeekFrom::Start(end))
            .await
            .storage_context("Failed to seek storage")?;
        file.write_all(&entry)
            .await
            .storage_context(format!("Failed to write record #{}", id))?;

        inner.index.insert(
            id,
            Slot {
                offset: end + ENTRY_HEADER_LEN as u64,
                len,
            },
        );
        inner.end = end + entry.len() as u64;
        if id >= inner.next_id {
            inner.next_id = id + 1;
        }

        tracing::debug!("Stored {} files under record #{}", state.len(), id);
        Ok(RecordId(id))
    }

    async fn force(&self) -> FlResult<()> {
        let mut inner = self.inner.lock().await;
        let file = inner.file.as_mut().ok_or_else(disposed)?;
        file.flush().await.storage_context("Failed to flush storage")?;
        file.sync_data()
            .await
            .storage_context("Failed to sync storage")
    }

    async fn dispose(&self) -> FlResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(mut file) = inner.file.take() {
            file.flush().await.storage_context("Failed to flush storage")?;
            file.sync_all()
                .await
                .storage_context("Failed to sync storage")?;
            tracing::debug!("Disposed storage {:?}", self.path);
        }
        Ok(())
    }
}
