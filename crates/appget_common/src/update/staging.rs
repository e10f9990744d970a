//! Downloading, verifying and applying a new release
//!
//! Staging writes the verified binary to `<staging root>/<version>/`.
//! Applying swaps it in for the installed binary, keeping the old one aside
//! until the swap succeeded.

use super::source::ReleaseSource;
use crate::github_releases::is_update_available;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Checksum manifest published with every release
pub const CHECKSUMS_ASSET: &str = "SHA256SUMS";

/// Update downloaded and verified, waiting to be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpdate {
    pub version: String,
    pub binary: PathBuf,
    pub sha256: String,
}

/// Release asset name for the running platform, e.g. `appget-linux-x86_64`
pub fn platform_asset_name() -> String {
    format!(
        "appget-{}-{}{}",
        std::env::consts::OS,
        std::env::consts::ARCH,
        std::env::consts::EXE_SUFFIX
    )
}

/// Check the release feed and stage a newer release if there is one
pub async fn stage_release(
    source: &dyn ReleaseSource,
    current_version: &str,
    staging_root: &Path,
) -> Result<Option<StagedUpdate>> {
    let release = source.latest_release().await?;
    let latest = release.version().to_string();

    if !is_update_available(current_version, &latest) {
        debug!("Running latest version v{} (feed: v{})", current_version, latest);
        return Ok(None);
    }

    info!("Update available: v{} -> v{}", current_version, latest);

    let asset_name = platform_asset_name();
    let asset = release
        .asset(&asset_name)
        .with_context(|| format!("Release v{} has no {} asset", latest, asset_name))?;
    let checksums_asset = release
        .asset(CHECKSUMS_ASSET)
        .with_context(|| format!("Release v{} has no {} asset", latest, CHECKSUMS_ASSET))?;

    let checksums = String::from_utf8(source.download(checksums_asset).await?)
        .context("Checksum manifest is not valid UTF-8")?;
    let data = source.download(asset).await?;
    let sha256 = verify_checksum(&data, &asset_name, &checksums)?;

    let dir = staging_root.join(&latest);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create staging dir {}", dir.display()))?;
    let binary = dir.join(&asset_name);
    fs::write(&binary, &data)
        .with_context(|| format!("Failed to write {}", binary.display()))?;
    set_executable(&binary)?;

    Ok(Some(StagedUpdate {
        version: latest,
        binary,
        sha256,
    }))
}

/// Hex SHA256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Verify `data` against the `SHA256SUMS` entry for `name`, returning the hash
pub fn verify_checksum(data: &[u8], name: &str, checksums: &str) -> Result<String> {
    let calculated = sha256_hex(data);

    for line in checksums.lines() {
        let mut parts = line.split_whitespace();
        let (Some(expected), Some(file)) = (parts.next(), parts.next()) else {
            continue;
        };
        // `sha256sum -b` marks binary mode with a leading '*'
        if file.trim_start_matches('*') != name {
            continue;
        }

        if expected.eq_ignore_ascii_case(&calculated) {
            return Ok(calculated);
        }
        anyhow::bail!(
            "Checksum mismatch for {}: expected {}, got {}",
            name,
            expected,
            calculated
        );
    }

    anyhow::bail!("Checksum not found for {}", name)
}

/// Replace `target` with the staged binary
pub fn apply_staged_update(staged: &StagedUpdate, target: &Path) -> Result<()> {
    let data = fs::read(&staged.binary)
        .with_context(|| format!("Staged binary {} is missing", staged.binary.display()))?;
    if sha256_hex(&data) != staged.sha256 {
        anyhow::bail!(
            "Staged binary {} changed since it was verified",
            staged.binary.display()
        );
    }

    let backup = backup_path(target);
    let had_target = target.exists();
    if had_target {
        fs::rename(target, &backup)
            .with_context(|| format!("Failed to move {} aside", target.display()))?;
    }

    if let Err(e) = move_into_place(&staged.binary, target) {
        warn!("Replace failed, restoring {}: {:#}", target.display(), e);
        if had_target {
            return Err(restore_backup(&backup, target, e));
        }
        return Err(e);
    }

    // The old binary may still be locked while it runs; it goes next time.
    if had_target {
        if let Err(e) = fs::remove_file(&backup) {
            debug!("Keeping {}: {}", backup.display(), e);
        }
    }
    if let Some(dir) = staged.binary.parent() {
        let _ = fs::remove_dir_all(dir);
    }

    Ok(())
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name: OsString = target.as_os_str().to_owned();
    name.push(".old");
    PathBuf::from(name)
}

/// Put the backup back after a failed replace. A failed restore is attached
/// to `cause` since the installed binary is then only at `backup`.
fn restore_backup(backup: &Path, target: &Path, cause: anyhow::Error) -> anyhow::Error {
    match fs::rename(backup, target) {
        Ok(()) => cause,
        Err(restore) => {
            error!(
                "Failed to restore {} from {}: {}",
                target.display(),
                backup.display(),
                restore
            );
            cause.context(format!(
                "previous binary left at {} (restore failed: {})",
                backup.display(),
                restore
            ))
        }
    }
}

fn move_into_place(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // Staging and install dir can live on different filesystems
    fs::copy(from, to)
        .with_context(|| format!("Failed to install {}", to.display()))?;
    set_executable(to)?;
    let _ = fs::remove_file(from);
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to mark {} executable", path.display()))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_platform_asset_name() {
        let name = platform_asset_name();
        assert!(name.starts_with("appget-"));
        assert!(name.contains(std::env::consts::ARCH));
    }

    #[test]
    fn test_verify_checksum() {
        let data = b"new appget binary";
        let hash = sha256_hex(data);
        let checksums = format!("{}  appget-linux-x86_64\n{}  other\n", hash, "00");

        assert_eq!(
            verify_checksum(data, "appget-linux-x86_64", &checksums).unwrap(),
            hash
        );
    }

    #[test]
    fn test_verify_checksum_binary_mode_marker() {
        let data = b"payload";
        let checksums = format!("{} *appget-windows-x86_64.exe", sha256_hex(data));
        assert!(verify_checksum(data, "appget-windows-x86_64.exe", &checksums).is_ok());
    }

    #[test]
    fn test_verify_checksum_mismatch() {
        let checksums = format!("{}  appget-linux-x86_64", sha256_hex(b"expected"));
        let err = verify_checksum(b"tampered", "appget-linux-x86_64", &checksums).unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_verify_checksum_missing_entry() {
        let err = verify_checksum(b"x", "appget-linux-x86_64", "").unwrap_err();
        assert!(err.to_string().contains("Checksum not found"));
    }

    #[test]
    fn test_apply_replaces_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("appget");
        fs::write(&target, b"old").unwrap();

        let staged_dir = tmp.path().join("updates/2.0.0");
        fs::create_dir_all(&staged_dir).unwrap();
        let binary = staged_dir.join("appget-new");
        fs::write(&binary, b"new").unwrap();

        let staged = StagedUpdate {
            version: "2.0.0".to_string(),
            binary,
            sha256: sha256_hex(b"new"),
        };
        apply_staged_update(&staged, &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
        assert!(!backup_path(&target).exists());
        assert!(!staged_dir.exists());
    }

    #[test]
    fn test_apply_refuses_modified_staged_binary() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("appget");
        fs::write(&target, b"old").unwrap();
        let binary = tmp.path().join("staged");
        fs::write(&binary, b"evil").unwrap();

        let staged = StagedUpdate {
            version: "2.0.0".to_string(),
            binary,
            sha256: sha256_hex(b"new"),
        };
        assert!(apply_staged_update(&staged, &target).is_err());
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_restore_backup_puts_old_binary_back() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("appget");
        let backup = backup_path(&target);
        fs::write(&backup, b"old").unwrap();

        let err = restore_backup(&backup, &target, anyhow::anyhow!("copy failed"));

        assert_eq!(err.to_string(), "copy failed");
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_failed_restore_is_reported() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("appget");
        let backup = backup_path(&target);

        let err = restore_backup(&backup, &target, anyhow::anyhow!("copy failed"));

        let chain = format!("{:#}", err);
        assert!(chain.contains("restore failed"), "{}", chain);
        assert!(chain.contains("appget.old"));
        assert!(chain.contains("copy failed"));
    }
}
