//! Migration script discovery
//!
//! A script is a `<number>_<name>.up.sql` file, optionally paired with a
//! `<number>_<name>.down.sql` file holding its inverse.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";

/// One numbered migration read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    /// Version number (file name prefix)
    pub number: i64,

    /// Descriptive name (file name between number and suffix)
    pub name: String,

    /// Path to the upgrade script
    pub up_path: PathBuf,

    /// Upgrade SQL
    pub up_sql: String,

    /// Rollback SQL, if a `.down.sql` file exists
    pub down_sql: Option<String>,
}

impl MigrationScript {
    pub fn has_rollback(&self) -> bool {
        self.down_sql.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptKind {
    Up,
    Down,
}

/// Parsed script file name
#[derive(Debug, PartialEq, Eq)]
struct ScriptFile {
    number: i64,
    name: String,
    kind: ScriptKind,
}

/// Parse `0003_add_users.up.sql` into its number, name and kind
fn parse_file_name(file_name: &str) -> Option<ScriptFile> {
    let (stem, kind) = if let Some(stem) = file_name.strip_suffix(UP_SUFFIX) {
        (stem, ScriptKind::Up)
    } else if let Some(stem) = file_name.strip_suffix(DOWN_SUFFIX) {
        (stem, ScriptKind::Down)
    } else {
        return None;
    };
    let (digits, name) = stem.split_once('_')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) || name.is_empty() {
        return None;
    }
    let number = digits.parse().ok()?;
    Some(ScriptFile {
        number,
        name: name.to_string(),
        kind,
    })
}

/// File stem for a new script, e.g. `0004_add_index`
pub fn script_stem(number: i64, name: &str) -> String {
    format!("{number:04}_{name}")
}

/// Upgrade and rollback file names for a new script
pub fn script_file_names(number: i64, name: &str) -> (String, String) {
    let stem = script_stem(number, name);
    (format!("{stem}{UP_SUFFIX}"), format!("{stem}{DOWN_SUFFIX}"))
}

/// Number to give the next script: one past the highest existing number
///
/// Fails when the highest number is already `i64::MAX`.
pub fn next_number(scripts: &[MigrationScript]) -> CoreResult<i64> {
    let Some(highest) = scripts.iter().max_by_key(|s| s.number) else {
        return Ok(1);
    };
    highest
        .number
        .checked_add(1)
        .ok_or_else(|| CoreError::ConfigInvalid {
            message: format!(
                "no version number left after {}",
                highest.up_path.display()
            ),
        })
}

#[derive(Default)]
struct Pending {
    up: Option<(String, PathBuf)>,
    down: Option<(String, PathBuf)>,
}

/// Discover migration scripts in the given directories, sorted by number
///
/// Missing directories are ignored. Files that do not follow the naming
/// pattern are skipped with a warning.
pub fn discover_scripts(paths: &[PathBuf]) -> CoreResult<Vec<MigrationScript>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            log::debug!("migration path {} does not exist", path.display());
            continue;
        }
        collect_files(path, &mut files)?;
    }
    files.sort();

    let mut pending: BTreeMap<i64, Pending> = BTreeMap::new();
    for path in files {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(".sql") {
            continue;
        }
        let Some(parsed) = parse_file_name(file_name) else {
            log::warn!("Skipping {}: expected <number>_<name>.up.sql", path.display());
            continue;
        };

        let entry = pending.entry(parsed.number).or_default();
        let slot = match parsed.kind {
            ScriptKind::Up => &mut entry.up,
            ScriptKind::Down => &mut entry.down,
        };
        if let Some((_, existing)) = slot {
            return Err(CoreError::DuplicateVersion {
                version: parsed.number,
                first: existing.display().to_string(),
                second: path.display().to_string(),
            });
        }
        *slot = Some((parsed.name, path));
    }

    let mut scripts = Vec::with_capacity(pending.len());
    for (number, entry) in pending {
        let (name, up_path) = match (entry.up, &entry.down) {
            (Some(up), _) => up,
            (None, Some((_, down_path))) => {
                return Err(CoreError::OrphanRollback {
                    path: down_path.display().to_string(),
                })
            }
            (None, None) => continue,
        };
        if let Some((down_name, down_path)) = &entry.down {
            if *down_name != name {
                return Err(CoreError::DuplicateVersion {
                    version: number,
                    first: up_path.display().to_string(),
                    second: down_path.display().to_string(),
                });
            }
        }
        let up_sql = read_script(&up_path)?;
        let down_sql = match &entry.down {
            Some((_, down_path)) => Some(read_script(down_path)?),
            None => None,
        };
        scripts.push(MigrationScript {
            number,
            name,
            up_path,
            up_sql,
            down_sql,
        });
    }
    Ok(scripts)
}

fn read_script(path: &Path) -> CoreResult<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> CoreResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;
    for entry in entries {
        let path = entry
            .map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?
            .path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
