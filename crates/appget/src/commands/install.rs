//! `appget install` / `appget uninstall`
//!
//! Both resolve the package first, so an unknown id fails with suggestions
//! before the installer is involved.

use crate::console::Console;
use appget_common::{CommandError, PackageManifest, PackageRepository};
use async_trait::async_trait;
use tracing::info;

/// Performs the actual installation of a resolved package
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(
        &self,
        manifest: &PackageManifest,
        version: Option<&str>,
    ) -> Result<(), CommandError>;

    async fn uninstall(&self, manifest: &PackageManifest) -> Result<(), CommandError>;
}

/// Installer for platforms without an installation backend
#[derive(Debug, Default)]
pub struct UnsupportedInstaller;

#[async_trait]
impl Installer for UnsupportedInstaller {
    async fn install(
        &self,
        manifest: &PackageManifest,
        _version: Option<&str>,
    ) -> Result<(), CommandError> {
        Err(CommandError::NotImplemented(format!(
            "installing {} on this platform",
            manifest.id
        )))
    }

    async fn uninstall(&self, manifest: &PackageManifest) -> Result<(), CommandError> {
        Err(CommandError::NotImplemented(format!(
            "uninstalling {} on this platform",
            manifest.id
        )))
    }
}

pub async fn install(
    repository: &dyn PackageRepository,
    installer: &dyn Installer,
    console: &dyn Console,
    package_id: &str,
    version: Option<&str>,
) -> Result<(), CommandError> {
    let manifest = repository.get(package_id).await?;
    installer.install(&manifest, version).await?;

    let installed = version.or(manifest.version.as_deref()).unwrap_or("latest");
    info!("Installed {} {}", manifest.id, installed);
    console.write_line(&format!("Installed {} {}", manifest.id, installed));
    Ok(())
}

pub async fn uninstall(
    repository: &dyn PackageRepository,
    installer: &dyn Installer,
    console: &dyn Console,
    package_id: &str,
) -> Result<(), CommandError> {
    let manifest = repository.get(package_id).await?;
    installer.uninstall(&manifest).await?;

    info!("Uninstalled {}", manifest.id);
    console.write_line(&format!("Uninstalled {}", manifest.id));
    Ok(())
}
