use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub fn backup_path(source_file: &Path) -> PathBuf {
    let mut backup = source_file.to_path_buf();
    let name = format!(
        ".{}.mutator.bak",
        source_file.file_name().unwrap_or_default().to_string_lossy()
    );
    backup.set_file_name(name);
    backup
}

/// Keep a copy of the baseline next to the file while it is being mutated.
pub fn write_backup(source_file: &Path, baseline: &str) -> std::io::Result<PathBuf> {
    let bak = backup_path(source_file);
    std::fs::write(&bak, baseline)?;
    Ok(bak)
}

pub fn remove_backup(source_file: &Path) -> std::io::Result<()> {
    let bak = backup_path(source_file);
    if bak.exists() {
        std::fs::remove_file(bak)?;
    }
    Ok(())
}

/// Check if a backup file exists from a previous interrupted campaign.
pub fn check_interrupted_run(source_file: &Path) -> Option<PathBuf> {
    let bak = backup_path(source_file);
    if bak.exists() {
        Some(bak)
    } else {
        None
    }
}

pub fn restore_from_backup(source_file: &Path, backup_file: &Path) -> std::io::Result<()> {
    std::fs::copy(backup_file, source_file)?;
    std::fs::remove_file(backup_file)?;
    Ok(())
}

/// Restore every file in `files` that still has a backup. Returns the
/// restored paths in first-seen order; repeated paths are checked once.
pub fn recover_interrupted<'a, I>(files: I) -> std::io::Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut seen = HashSet::new();
    let mut restored = Vec::new();
    for file in files {
        if !seen.insert(file) {
            continue;
        }
        if let Some(bak) = check_interrupted_run(file) {
            restore_from_backup(file, &bak)?;
            restored.push(file.to_path_buf());
        }
    }
    Ok(restored)
}
