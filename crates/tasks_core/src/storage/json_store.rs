use crate::error::{AppError, PersistenceError};
use crate::storage::Slot;
use std::path::PathBuf;

const STORE_DIR_ENV_VAR: &str = "CUTE_TASKS_STORE_DIR";

/// Slot backed by one JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

/// Default directory for slot files.
pub fn store_dir() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_DIR_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("cute_tasks"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("cute_tasks"))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|err| PersistenceError::Read {
                key: key.to_string(),
                reason: format!("{}: {}", path.display(), err),
            })
    }

    fn write(&self, key: &str, content: &str) -> Result<(), PersistenceError> {
        let write_error = |reason: String| PersistenceError::Write {
            key: key.to_string(),
            reason,
        };

        std::fs::create_dir_all(&self.dir).map_err(|err| write_error(err.to_string()))?;
        let path = self.path_for(key);
        std::fs::write(&path, content).map_err(|err| write_error(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions)
                .map_err(|err| write_error(err.to_string()))?;
        }

        Ok(())
    }
}
