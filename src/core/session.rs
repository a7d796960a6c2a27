//! Persists the signed-in user between CLI invocations.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::utils::ensure_dir;
use crate::api::HubError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    pub user_id: String,
    pub email: String,
}

pub fn load(path: &Path) -> Result<Option<SavedSession>, HubError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

pub fn save(path: &Path, session: &SavedSession) -> Result<(), HubError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(session)?)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).ok();
    }
    Ok(())
}

pub fn clear(path: &Path) -> Result<(), HubError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        assert_eq!(load(&path).unwrap(), None);

        let session = SavedSession {
            user_id: "u1".into(),
            email: "ada@example.com".into(),
        };
        save(&path, &session).unwrap();
        assert_eq!(load(&path).unwrap(), Some(session));

        clear(&path).unwrap();
        clear(&path).unwrap();
        assert_eq!(load(&path).unwrap(), None);
    }
}
