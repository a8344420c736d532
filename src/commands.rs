use anyhow::{Context, Result};
use log::debug;
use std::io::Write;

use crate::http::UrlProber;
use crate::registry::MetadataProvider;
use crate::resolver::ChangelogResolver;

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub found: usize,
    pub not_found: Vec<String>,
}

/// Resolves each package in turn, printing the URL to `out` or a
/// "not found" line to `err`. One package failing never stops the batch.
#[tracing::instrument(skip(resolver, out, err))]
pub async fn run<P, M, O, E>(
    resolver: &ChangelogResolver<P, M>,
    packages: &[String],
    out: &mut O,
    err: &mut E,
) -> Result<Summary>
where
    P: UrlProber,
    M: MetadataProvider,
    O: Write,
    E: Write,
{
    let mut summary = Summary::default();

    for package in packages {
        debug!("Processing package: {}", package);

        match resolver.resolve(package).await {
            Some(resolution) => {
                writeln!(out, "{}", resolution).context("Failed to write to stdout")?;
                summary.found += 1;
            }
            None => {
                writeln!(err, "{}: CHANGELOG.md not found", package)
                    .context("Failed to write to stderr")?;
                summary.not_found.push(package.clone());
            }
        }
    }

    Ok(summary)
}
