use anyhow::{Context, Result};
use network_client::error::NetworkClientError;
use network_client::{Identity, IdentityStore};
use std::fs;
use std::path::{Path, PathBuf};

const IDENTITY_FILE: &str = "identity.json";
const COOKIES_FILE: &str = "cookies";

/// On-disk session: the logged in identity and the backend session cookies.
#[derive(Debug, Clone)]
pub struct SessionFiles {
    dir: PathBuf,
}

impl SessionFiles {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match custom_dir {
            Some(dir) => dir,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".network")
            }
        };

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn identity_path(&self) -> PathBuf {
        self.dir.join(IDENTITY_FILE)
    }

    fn cookies_path(&self) -> PathBuf {
        self.dir.join(COOKIES_FILE)
    }

    pub fn identity_store(&self) -> FileIdentityStore {
        FileIdentityStore {
            path: self.identity_path(),
        }
    }

    pub fn save_cookies(&self, cookies: &str) -> Result<()> {
        write_private(&self.cookies_path(), cookies)
            .with_context(|| format!("Failed to save cookies to {:?}", self.cookies_path()))
    }

    pub fn load_cookies(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.cookies_path()) {
            Ok(cookies) => {
                let cookies = cookies.trim().to_string();
                Ok((!cookies.is_empty()).then_some(cookies))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read cookies file"),
        }
    }

    pub fn clear_cookies(&self) -> Result<()> {
        remove_if_exists(&self.cookies_path())
            .with_context(|| format!("Failed to remove {:?}", self.cookies_path()))
    }
}

/// [`IdentityStore`] backed by a JSON file readable only by its owner.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> NetworkClientError {
    NetworkClientError::StorageError(format!("{:?}: {}", path, e))
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> network_client::error::Result<Option<Identity>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| storage_error(&self.path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn save(&self, identity: &Identity) -> network_client::error::Result<()> {
        let raw = serde_json::to_string_pretty(identity)?;
        write_private(&self.path, &raw).map_err(|e| storage_error(&self.path, e))
    }

    fn clear(&self) -> network_client::error::Result<()> {
        remove_if_exists(&self.path).map_err(|e| storage_error(&self.path, e))
    }
}

fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
