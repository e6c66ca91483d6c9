use crate::error::Result;
use crate::models::{CityMap, RawTable};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads raw annual files laid out as `<root>/<City>/<file>`.
pub struct DirectoryReader {
    extension: Option<String>,
}

impl DirectoryReader {
    pub fn new() -> Self {
        Self { extension: None }
    }

    /// Only load files with this extension (case-insensitive).
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: Some(extension.trim_start_matches('.').to_lowercase()),
        }
    }

    /// Read every city folder under `root` into raw tables keyed by city and
    /// file name.
    pub fn read_all(&self, root: &Path) -> Result<CityMap<RawTable>> {
        let mut data: CityMap<RawTable> = BTreeMap::new();

        for city_dir in sorted_entries(root)? {
            if !city_dir.is_dir() {
                continue;
            }
            let Some(city) = entry_name(&city_dir) else {
                continue;
            };

            let files = data.entry(city.clone()).or_default();
            for path in sorted_entries(&city_dir)? {
                if !path.is_file() || !self.accepts(&path) {
                    continue;
                }
                let Some(file_name) = entry_name(&path) else {
                    continue;
                };
                debug!("Loading {}", path.display());
                files.insert(file_name, read_raw_table(&path)?);
            }
        }

        for (city, files) in &data {
            let names: Vec<&str> = files.keys().map(String::as_str).collect();
            info!("Files loaded for {}: {}", city, names.join(", "));
        }

        Ok(data)
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.extension {
            None => true,
            Some(wanted) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(wanted)),
        }
    }
}

impl Default for DirectoryReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one file as a raw single-column table, dropping blank lines.
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let bytes = fs::read(path)?;
    Ok(RawTable::from_text(&String::from_utf8_lossy(&bytes)))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn entry_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_all_groups_by_city() -> Result<()> {
        let root = TempDir::new()?;
        let karachi = root.path().join("Karachi");
        let lahore = root.path().join("Lahore");
        fs::create_dir_all(&karachi)?;
        fs::create_dir_all(&lahore)?;

        fs::write(karachi.join("Karachi (2016).csv"), "b\n\nc\n")?;
        fs::write(karachi.join("Karachi (2015).csv"), "a\n")?;
        fs::write(root.path().join("stray.txt"), "ignored")?;

        let data = DirectoryReader::new().read_all(root.path())?;

        assert_eq!(data.len(), 2);
        assert!(data["Lahore"].is_empty());
        let names: Vec<&String> = data["Karachi"].keys().collect();
        assert_eq!(names, ["Karachi (2015).csv", "Karachi (2016).csv"]);
        assert_eq!(data["Karachi"]["Karachi (2016).csv"].lines, ["b", "c"]);

        Ok(())
    }

    #[test]
    fn test_extension_filter() -> Result<()> {
        let root = TempDir::new()?;
        let city = root.path().join("Quetta");
        fs::create_dir_all(&city)?;
        fs::write(city.join("Quetta (2015).CSV"), "a\n")?;
        fs::write(city.join("notes.md"), "b\n")?;

        let data = DirectoryReader::with_extension(".csv").read_all(root.path())?;

        assert_eq!(data["Quetta"].len(), 1);
        assert!(data["Quetta"].contains_key("Quetta (2015).CSV"));

        Ok(())
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let result = DirectoryReader::new().read_all(Path::new("does/not/exist"));
        assert!(result.is_err());
    }
}
