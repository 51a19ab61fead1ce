use crate::{CollectionRecord, StoreError};

use serde::{Deserialize, Serialize};

use std::fs;
use std::io::Write;
use std::path::Path;

pub const FILE_VERSION: u32 = 1;

/// On-disk layout of the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreFile {
    pub version: u32,
    pub next_id: u64,
    pub records: Vec<CollectionRecord>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: FILE_VERSION,
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Reads the store file, `None` if it does not exist yet.
pub fn load(path: &Path) -> Result<Option<StoreFile>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let file: StoreFile = serde_json::from_str(&contents)?;
    if file.version > FILE_VERSION {
        return Err(StoreError::Version(file.version));
    }

    Ok(Some(file))
}

/// Writes through a sibling temp file so a crash never leaves a torn store.
pub fn save(path: &Path, file: &StoreFile) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(file)?;
    let tmp = path.with_extension("json.tmp");
    {
        let mut out = fs::File::create(&tmp)?;
        out.write_all(json.as_bytes())?;
        out.sync_all()?;
    }
    fs::rename(&tmp, path)?;

    Ok(())
}
