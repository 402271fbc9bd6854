use serde::{Deserialize, Serialize};

use crate::models::error::CameraError;
use crate::traits::media_storage::MediaStorage;

const FIRST_DIRECTORY: u32 = 100;
const LAST_DIRECTORY: u32 = 999;
const FIRST_FILE: u32 = 1;
const LAST_FILE: u32 = 9999;

/// What kind of media a DCF name is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DcfKind {
    Image,
    Video,
}

impl DcfKind {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Image => "IMG_",
            Self::Video => "VID_",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Video => "3gp",
        }
    }
}

/// A storage-relative DCF location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcfName {
    /// Directory including the trailing slash, e.g. `DCIM/100MZLLA/`.
    pub directory: String,
    /// File name, e.g. `IMG_0001.jpg`.
    pub file_name: String,
}

impl DcfName {
    pub fn path(&self) -> String {
        format!("{}{}", self.directory, self.file_name)
    }

    /// Hidden sibling used to force the directory into existence.
    pub fn placeholder_path(&self) -> String {
        format!("{}.{}", self.directory, self.file_name)
    }
}

/// Persistable counter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcfPosition {
    pub directory: u32,
    pub file: u32,
}

/// Hands out DCF file names. Images and videos share one counter.
#[derive(Debug, Clone)]
pub struct DcfNamer {
    suffix: String,
    directory: u32,
    file: u32,
}

impl DcfNamer {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            directory: FIRST_DIRECTORY,
            file: FIRST_FILE,
        }
    }

    /// Restore a previously persisted position. Out-of-range values are
    /// clamped into the DCF ranges.
    pub fn seed(&mut self, position: DcfPosition) {
        self.directory = position.directory.clamp(FIRST_DIRECTORY, LAST_DIRECTORY + 1);
        self.file = position.file.clamp(FIRST_FILE, LAST_FILE);
    }

    /// Position of the next name to be handed out.
    pub fn position(&self) -> DcfPosition {
        DcfPosition {
            directory: self.directory,
            file: self.file,
        }
    }

    pub fn next(&mut self, kind: DcfKind) -> Result<DcfName, CameraError> {
        if self.directory > LAST_DIRECTORY {
            return Err(CameraError::StorageWriteFailed(
                "dcf directory numbers exhausted".into(),
            ));
        }

        let name = DcfName {
            directory: format!("DCIM/{}{}/", self.directory, self.suffix),
            file_name: format!("{}{:04}.{}", kind.prefix(), self.file, kind.extension()),
        };

        if self.file == LAST_FILE {
            self.file = FIRST_FILE;
            self.directory += 1;
        } else {
            self.file += 1;
        }

        log::debug!("dcf name {}", name.path());
        Ok(name)
    }

    /// Next name not already taken on `storage`. Files left by an earlier
    /// run, or written by another app, are skipped.
    pub fn next_free(&mut self, kind: DcfKind, storage: &dyn MediaStorage) -> Result<DcfName, CameraError> {
        loop {
            let name = self.next(kind)?;
            if !storage.exists(&name.path()) {
                return Ok(name);
            }
            log::debug!("dcf name {} already taken", name.path());
        }
    }
}
