use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MutationError, Result};
use crate::operators::Catalog;
use crate::syntax;
use crate::Dialect;

/// One operator applied to one node of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationPlan {
    pub filepath: Utf8PathBuf,
    pub start: usize,
    pub apx_line: usize,
    pub mutator_index: usize,
    pub text: String,
}

pub fn plan(files: &[Utf8PathBuf], catalog: &Catalog) -> Result<Vec<MutationPlan>> {
    if files.is_empty() {
        return Err(MutationError::InvalidInput("no source files to plan".to_string()));
    }
    let mut plans = Vec::new();
    for file in files {
        let dialect = crate::detect_dialect(file.as_std_path())
            .ok_or_else(|| MutationError::UnsupportedFile(file.to_string()))?;
        let source = std::fs::read_to_string(file)?;
        let file_plans = plan_source(file, &source, dialect, catalog)?;
        debug!(file = %file, plans = file_plans.len(), "planned file");
        plans.extend(file_plans);
    }
    Ok(plans)
}

/// Plans for a single source text, in walk order.
pub fn plan_source(
    path: &Utf8Path,
    source: &str,
    dialect: Dialect,
    catalog: &Catalog,
) -> Result<Vec<MutationPlan>> {
    let root = syntax::parse(source, dialect)?;
    if let Some(err) = root.first_error() {
        warn!(
            file = %path,
            line = err.line(),
            column = err.column(),
            "syntax error; malformed nodes will not be planned"
        );
    }

    let mut plans = Vec::new();
    root.walk(|node| {
        for (index, operator) in catalog.iter() {
            if operator.matches(node) {
                plans.push(MutationPlan {
                    filepath: path.to_path_buf(),
                    start: node.start(),
                    apx_line: node.line(),
                    mutator_index: index,
                    text: node.text().to_string(),
                });
            }
        }
    });
    Ok(plans)
}

/// Write the plan list as pretty JSON. The file is replaced atomically so an
/// interrupted write never leaves a truncated plan behind.
pub fn write_plans(path: &Path, plans: &[MutationPlan]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, plans)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn read_plans(path: &Path) -> Result<Vec<MutationPlan>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Read a newline-separated file list. Blank lines and `#` comments are skipped.
pub fn read_file_list(path: &Path) -> Result<Vec<Utf8PathBuf>> {
    let data = std::fs::read_to_string(path)?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(Utf8PathBuf::from)
        .collect())
}
