//! Writes deployment descriptors to disk.

use std::path::{Path, PathBuf};

use databridge_core::deploy::{render_all, DeploymentConfig, Descriptor};

/// Write every descriptor for `config` into `out_dir`, creating it if
/// needed. Returns the written paths in render order.
pub fn write_descriptors(config: &DeploymentConfig, out_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    render_all(config)
        .iter()
        .map(|descriptor| {
            let path = write_descriptor(out_dir, descriptor)?;
            tracing::info!(path = %path.display(), "Descriptor written");
            Ok(path)
        })
        .collect()
}

fn write_descriptor(out_dir: &Path, descriptor: &Descriptor) -> std::io::Result<PathBuf> {
    let path = out_dir.join(descriptor.file_name);
    std::fs::write(&path, &descriptor.contents)?;
    if descriptor.executable {
        set_executable(&path)?;
    }
    Ok(path)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Format `(key, value)` pairs as aligned `KEY = value` lines.
pub fn format_env_table(vars: &[(String, String)]) -> String {
    let width = vars.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    vars.iter()
        .map(|(k, v)| format!("{k:<width$} = {v}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_table_aligns_keys() {
        let table = format_env_table(&[
            ("PORT".into(), "8000".into()),
            ("DB_PASSWORD".into(), "****".into()),
        ]);
        assert_eq!(table, "PORT        = 8000\nDB_PASSWORD = ****\n");
    }
}
