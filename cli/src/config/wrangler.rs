//! wrangler.toml rewrite
//!
//! After `wrangler d1 create`, the worker's config must point at the new
//! database. Any previous `d1_databases` entries are dropped and replaced by a
//! single binding. The file is replaced atomically: the new document is written
//! to a temp file in the same directory and renamed over the original, so a
//! crash mid-write never leaves a truncated config behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::domain::DatabaseBinding;
use crate::error::ProvisionError;

pub const D1_DATABASES_KEY: &str = "d1_databases";

/// Replace every D1 binding in `doc` with `binding`
///
/// All other keys are left as they are.
pub fn apply_database_binding(
    doc: &mut toml::Table,
    binding: &DatabaseBinding,
) -> Result<(), toml::ser::Error> {
    let bindings = toml::Value::try_from(vec![binding.clone()])?;
    doc.remove(D1_DATABASES_KEY);
    doc.insert(D1_DATABASES_KEY.to_string(), bindings);
    Ok(())
}

/// D1 bindings currently declared in `doc`
///
/// Entries that don't have the binding shape are skipped.
pub fn database_bindings(doc: &toml::Table) -> Vec<DatabaseBinding> {
    match doc.get(D1_DATABASES_KEY) {
        Some(toml::Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| entry.clone().try_into::<DatabaseBinding>().ok())
            .collect(),
        Some(entry @ toml::Value::Table(_)) => entry
            .clone()
            .try_into::<DatabaseBinding>()
            .ok()
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

/// Read `path`, point its D1 binding at `binding`, and write it back atomically
pub fn rewrite_database_binding(
    path: &Path,
    binding: &DatabaseBinding,
) -> Result<(), ProvisionError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProvisionError::config(path, format!("failed to read: {}", e)))?;

    let mut doc: toml::Table = toml::from_str(&content)
        .map_err(|e| ProvisionError::config(path, format!("invalid TOML: {}", e)))?;

    let previous = database_bindings(&doc);
    if !previous.is_empty() {
        info!(
            "Replacing {} existing D1 binding(s) in {}",
            previous.len(),
            path.display()
        );
        for old in &previous {
            debug!("   • {} -> {} ({})", old.binding, old.database_name, old.database_id);
        }
    }

    apply_database_binding(&mut doc, binding)
        .map_err(|e| ProvisionError::config(path, format!("failed to build binding: {}", e)))?;

    let rendered = toml::to_string(&doc)
        .map_err(|e| ProvisionError::config(path, format!("failed to serialize: {}", e)))?;

    write_atomically(path, &rendered)
        .map_err(|e| ProvisionError::config(path, format!("failed to write: {}", e)))?;

    info!(
        "{}: {} -> {} ({})",
        path.display(),
        binding.binding,
        binding.database_name,
        binding.database_id
    );
    Ok(())
}

fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    // Keep the original file mode
    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
