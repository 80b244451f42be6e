//! Attachment storage: a named binary blob per device.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use super::StoreError;

/// Metadata kept for every stored attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRecord {
    pub id: String,
    pub device_id: String,
    /// Caller supplied type, e.g. `".jpg"` or `"image/png"`.
    pub content_type: String,
    pub size: u64,
}

/// Abstract storage for attachments.
pub trait AttachmentStore: Send + Sync {
    /// Persist `data` for `device_id` and return the generated attachment id.
    fn save(&self, device_id: &str, content_type: &str, data: Vec<u8>) -> Result<String, StoreError>;

    /// Metadata for a previously saved attachment.
    fn find(&self, id: &str) -> Result<Option<AttachmentRecord>, StoreError>;
}

fn new_attachment_id() -> String {
    Uuid::new_v4().to_string()
}

/// Writes each attachment to `<folder>/<id><content_type>`.
#[derive(Clone)]
pub struct DiskAttachmentStore {
    folder: PathBuf,
    records: Arc<RwLock<HashMap<String, AttachmentRecord>>>,
}

impl DiskAttachmentStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Location of a stored attachment on disk.
    pub fn path_of(&self, record: &AttachmentRecord) -> PathBuf {
        self.folder
            .join(format!("{}{}", record.id, sanitize(&record.content_type)))
    }
}

/// Content types become file suffixes; keep them from escaping the folder.
fn sanitize(content_type: &str) -> String {
    content_type
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

impl AttachmentStore for DiskAttachmentStore {
    fn save(&self, device_id: &str, content_type: &str, data: Vec<u8>) -> Result<String, StoreError> {
        let record = AttachmentRecord {
            id: new_attachment_id(),
            device_id: device_id.to_string(),
            content_type: content_type.to_string(),
            size: data.len() as u64,
        };

        fs::create_dir_all(&self.folder)?;
        fs::write(self.path_of(&record), &data)?;

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::LockPoisoned("attachment save"))?;
        let id = record.id.clone();
        records.insert(id.clone(), record);
        Ok(id)
    }

    fn find(&self, id: &str) -> Result<Option<AttachmentRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned("attachment find"))?;
        Ok(records.get(id).cloned())
    }
}

/// Keeps attachments in memory. Clones share the same contents.
#[derive(Clone, Default)]
pub struct InMemoryAttachmentStore {
    blobs: Arc<RwLock<HashMap<String, (AttachmentRecord, Vec<u8>)>>>,
}

impl InMemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes for an attachment.
    pub fn content(&self, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("attachment content"))?;
        Ok(blobs.get(id).map(|(_, data)| data.clone()))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("attachment len"))?;
        Ok(blobs.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl AttachmentStore for InMemoryAttachmentStore {
    fn save(&self, device_id: &str, content_type: &str, data: Vec<u8>) -> Result<String, StoreError> {
        let record = AttachmentRecord {
            id: new_attachment_id(),
            device_id: device_id.to_string(),
            content_type: content_type.to_string(),
            size: data.len() as u64,
        };

        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| StoreError::LockPoisoned("attachment save"))?;
        let id = record.id.clone();
        blobs.insert(id.clone(), (record, data));
        Ok(id)
    }

    fn find(&self, id: &str) -> Result<Option<AttachmentRecord>, StoreError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| StoreError::LockPoisoned("attachment find"))?;
        Ok(blobs.get(id).map(|(record, _)| record.clone()))
    }
}
