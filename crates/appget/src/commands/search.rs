//! `appget search <query>`

use crate::console::Console;
use appget_common::{CommandError, DomainError, PackageRepository};

pub async fn run(
    repository: &dyn PackageRepository,
    console: &dyn Console,
    query: &str,
) -> Result<(), CommandError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(DomainError::Unsupported("searching with an empty query".to_string()).into());
    }

    let hits = repository.search(query).await?;
    if hits.is_empty() {
        console.write_line(&format!("No packages found matching '{}'", query));
        return Ok(());
    }

    for hit in hits {
        console.write_line(&format!(
            "{}\t{}\t{}",
            hit.id,
            hit.version.as_deref().unwrap_or("-"),
            hit.name.as_deref().unwrap_or("")
        ));
    }
    Ok(())
}
