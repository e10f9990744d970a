//! `appget view <package>`

use crate::console::Console;
use appget_common::{CommandError, PackageManifest, PackageRepository};

pub async fn run(
    repository: &dyn PackageRepository,
    console: &dyn Console,
    package_id: &str,
) -> Result<(), CommandError> {
    let manifest = repository.get(package_id).await?;
    for line in manifest_lines(&manifest) {
        console.write_line(&line);
    }
    Ok(())
}

fn manifest_lines(manifest: &PackageManifest) -> Vec<String> {
    let mut lines = vec![format!("id: {}", manifest.id)];

    let optional = [
        ("name", &manifest.name),
        ("version", &manifest.version),
        ("home", &manifest.home),
        ("description", &manifest.description),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{}: {}", label, value));
        }
    }

    if !manifest.tags.is_empty() {
        lines.push(format!("tags: {}", manifest.tags.join(", ")));
    }
    lines
}
