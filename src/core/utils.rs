use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::api::HubError;

/// Ensure directory exists.
pub fn ensure_dir(path: &Path) -> Result<(), HubError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    #[cfg(unix)]
    {
        fs::set_permissions(path, fs::Permissions::from_mode(0o700)).ok();
    }
    Ok(())
}

/// Parse `key=value` assignments; entries without `=` are ignored.
pub fn parse_vars(vars: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for v in vars {
        if let Some((key, value)) = v.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    map
}

/// Split an `owner/name` repository reference.
pub fn parse_repo_ref(reference: &str) -> Result<(&str, &str), HubError> {
    match reference.split_once('/') {
        Some((owner, name)) if !owner.trim().is_empty() && !name.trim().is_empty() => {
            Ok((owner.trim(), name.trim()))
        }
        _ => Err(HubError::Validation(format!(
            "Repository reference '{}' must look like owner/name",
            reference
        ))),
    }
}

/// Split a comma-separated tag line into trimmed, non-empty entries.
pub fn split_tags(line: &str) -> Vec<String> {
    line.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vars_are_trimmed_and_malformed_entries_skipped() {
        let vars = parse_vars(&[
            "name = Ada".to_string(),
            "broken".to_string(),
            "tone=warm".to_string(),
        ]);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["name"], "Ada");
        assert_eq!(vars["tone"], "warm");
    }

    #[test]
    fn repo_refs_need_both_parts() {
        assert_eq!(parse_repo_ref("ada/emails").unwrap(), ("ada", "emails"));
        assert!(parse_repo_ref("emails").is_err());
        assert!(parse_repo_ref("/emails").is_err());
    }

    #[test]
    fn tag_lines_drop_blanks() {
        assert_eq!(split_tags(" a, ,b ,"), vec!["a", "b"]);
    }
}
