//! File-based token store adapter.
//!
//! Stores the access token as a small JSON document, by default at
//! `~/.pge/token.json`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::{TokenStore, TokenStoreError};

/// The token directory name, relative to the home directory.
const TOKEN_DIR: &str = ".pge";

/// The token file name.
const TOKEN_FILE: &str = "token.json";

/// On-disk layout of the token file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct TokenFile {
    access_token: Option<String>,
}

/// Default token file location, or `None` if the home directory is unknown.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(TOKEN_DIR).join(TOKEN_FILE))
}

/// Open `path` for writing, truncated. On unix the file is readable by its
/// owner only, including a file left by an older version with wider bits.
fn open_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        Ok(file)
    }

    #[cfg(not(unix))]
    options.open(path)
}

/// File-based token store.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by `path`. The file is created lazily on save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the default location.
    pub fn at_default_location() -> Result<Self, TokenStoreError> {
        default_token_path().map(Self::new).ok_or_else(|| {
            TokenStoreError::LoadFailed("Failed to determine home directory".to_string())
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)
            .map_err(|e| TokenStoreError::LoadFailed(format!("{}: {}", self.path.display(), e)))?;
        let contents: TokenFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;

        Ok(contents.access_token.filter(|token| !token.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| TokenStoreError::SaveFailed(e.to_string()))?;
            }
        }

        let file =
            open_private(&self.path).map_err(|e| TokenStoreError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        let contents = TokenFile {
            access_token: Some(token.to_string()),
        };
        serde_json::to_writer_pretty(&mut writer, &contents)
            .map_err(|e| TokenStoreError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| TokenStoreError::SaveFailed(e.to_string()))
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        if !self.path.exists() {
            return Ok(());
        }

        fs::remove_file(&self.path).map_err(|e| TokenStoreError::ClearFailed(e.to_string()))
    }
}
