use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "roster.config.json";
const DATA_FILE: &str = "roster.enc";
const ACCOUNTS_FILE: &str = "accounts.json";
const DEFAULT_EXPORT_NAME: &str = "roster-export.csv";

/// Files the app keeps under its storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.as_path())?;
        Ok(StoragePaths { root })
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE)
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("file");
    path.with_file_name(format!(".{name}.tmp.{}", std::process::id()))
}

/// Writes through a sibling temp file and renames it over `path`, so a
/// failed or interrupted write leaves the previous contents in place.
pub fn write_text_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_sibling(path);
    let written = fs::File::create(tmp.as_path()).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(tmp.as_path());
        return Err(err);
    }
    fs::rename(tmp.as_path(), path)
}

/// Drops control characters and caps the length in chars.
pub fn clamp_string(value: &str, max_len: usize, trim: bool) -> String {
    let value = if trim { value.trim() } else { value };
    value
        .chars()
        .filter(|ch| {
            let code = *ch as u32;
            code >= 32 && code != 127
        })
        .take(max_len)
        .collect()
}

pub fn sanitize_filename(value: &str) -> String {
    let out: String = value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        DEFAULT_EXPORT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn sanitize_export_filename(value: &str) -> String {
    let trimmed = clamp_string(value, 255, true);
    let safe = sanitize_filename(trimmed.as_str());
    if safe.to_lowercase().ends_with(".csv") {
        safe
    } else {
        format!("{safe}.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_reduced_to_safe_characters() {
        assert_eq!(sanitize_filename("a b/c.csv"), "a_b_c.csv");
        assert_eq!(sanitize_filename("///"), DEFAULT_EXPORT_NAME);
        assert_eq!(
            sanitize_export_filename("  hr-bookmarked-profiles-2024-05-01 "),
            "hr-bookmarked-profiles-2024-05-01.csv"
        );
        assert_eq!(sanitize_export_filename("X.CSV"), "X.CSV");
    }

    #[test]
    fn clamp_strips_control_characters() {
        assert_eq!(clamp_string(" a\u{7}b\tc ", 10, true), "abc");
        assert_eq!(clamp_string("abcdef", 3, false), "abc");
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = StoragePaths::new(dir.path().join("nested")).unwrap();
        let target = paths.root().join("deeper").join("file.txt");
        write_text_file(target.as_path(), "hello").unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "hello");
        assert!(paths.data_file().ends_with("roster.enc"));
    }

    #[test]
    fn failed_write_keeps_previous_contents() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("roster.enc");
        write_text_file(target.as_path(), "first").unwrap();
        write_text_file(target.as_path(), "second").unwrap();
        assert_eq!(fs::read_to_string(target.as_path()).unwrap(), "second");

        // A directory squatting on the temp name makes the next write fail.
        fs::create_dir(temp_sibling(target.as_path())).unwrap();
        assert!(write_text_file(target.as_path(), "third").is_err());
        assert_eq!(fs::read_to_string(target.as_path()).unwrap(), "second");
    }
}
