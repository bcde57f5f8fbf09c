use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// System-wide client config. Skipped silently when it does not exist.
pub const SYSTEM_CONFIG: &str = "/etc/ssh/ssh_config";

/// Per-user client config.
pub const USER_CONFIG: &str = "~/.ssh/config";

/// Expand a leading `~/` with the given home directory.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Read a config file into a string.
///
/// Returns `Ok(None)` only when `original` is the system-wide default and
/// the file does not exist. Any other failure names the resolved path.
pub fn read_config(original: &str, resolved: &Path) -> Result<Option<String>, ConfigError> {
    match read_file(resolved) {
        Ok(bytes) => decode(resolved, bytes).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound && original == SYSTEM_CONFIG => {
            tracing::debug!(path = %resolved.display(), "optional config not found, skipping");
            Ok(None)
        }
        Err(e) => Err(ConfigError::Open {
            path: resolved.to_path_buf(),
            source: e,
        }),
    }
}

// The handle is dropped when this returns, whatever the outcome.
fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn decode(path: &Path, bytes: Vec<u8>) -> Result<String, ConfigError> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        ConfigError::parse(path, line, "invalid UTF-8")
    })
}

/// Default config paths followed by `extra`, with duplicates removed after
/// `~/` expansion. The first spelling of a path wins.
pub fn default_paths(extra: &str, home: &Path) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut seen: Vec<PathBuf> = Vec::new();
    for p in [SYSTEM_CONFIG, USER_CONFIG, extra] {
        let resolved = expand_home(p, home);
        if !seen.contains(&resolved) {
            seen.push(resolved);
            paths.push(p.to_string());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/alice");
        assert_eq!(
            expand_home("~/.ssh/config", home),
            PathBuf::from("/home/alice/.ssh/config")
        );
        assert_eq!(expand_home("/etc/ssh/ssh_config", home), PathBuf::from("/etc/ssh/ssh_config"));
        // Only the "~/" prefix is expanded
        assert_eq!(expand_home("~bob/config", home), PathBuf::from("~bob/config"));
        assert_eq!(expand_home("conf.d/~/x", home), PathBuf::from("conf.d/~/x"));
    }

    #[test]
    fn test_missing_system_config_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ssh_config");
        assert!(read_config(SYSTEM_CONFIG, &missing).unwrap().is_none());
    }

    #[test]
    fn test_missing_user_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config");
        let err = read_config("~/.ssh/config", &missing).unwrap_err();
        match err {
            ConfigError::Open { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected Open error, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_optional() {
        // Only NotFound is tolerated for the system config
        let dir = tempfile::tempdir().unwrap();
        assert!(read_config(SYSTEM_CONFIG, dir.path()).is_err());
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        std::fs::write(&path, b"Host a\n  User \xff\n").unwrap();
        match read_config("config", &path).unwrap_err() {
            ConfigError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_paths_dedup() {
        let home = Path::new("/home/alice");
        assert_eq!(
            default_paths("~/.ssh/config", home),
            vec!["/etc/ssh/ssh_config", "~/.ssh/config"]
        );
        assert_eq!(
            default_paths("/home/alice/.ssh/config", home),
            vec!["/etc/ssh/ssh_config", "~/.ssh/config"]
        );
        assert_eq!(
            default_paths("~/work.conf", home),
            vec!["/etc/ssh/ssh_config", "~/.ssh/config", "~/work.conf"]
        );
    }
}
