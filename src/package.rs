//! npm package names.

use anyhow::{Result, bail};

/// Longest name the npm registry accepts.
const MAX_NAME_LENGTH: usize = 214;

/// Checks `name` against the npm naming rules.
///
/// Accepts plain names (`left-pad`) and scoped names (`@babel/core`).
pub fn validate_package_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Package name cannot be empty");
    }
    if name.len() > MAX_NAME_LENGTH {
        bail!("Package name exceeds {} characters", MAX_NAME_LENGTH);
    }
    if name.trim() != name || name.contains(char::is_whitespace) {
        bail!("Package name cannot contain spaces: {:?}", name);
    }
    if name.to_lowercase() != name {
        bail!("Package name must be lowercase: {}", name);
    }

    let bare = match name.strip_prefix('@') {
        Some(scoped) => match scoped.split_once('/') {
            Some((scope, bare)) if !scope.is_empty() && !bare.is_empty() => {
                check_component(scope, name)?;
                bare
            }
            _ => bail!("Scoped package name must look like @scope/name: {}", name),
        },
        None => name,
    };

    check_component(bare, name)
}

fn check_component(component: &str, name: &str) -> Result<()> {
    if component.starts_with('.') || component.starts_with('_') {
        bail!("Package name cannot start with '.' or '_': {}", name);
    }
    if let Some(c) = component
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')))
    {
        bail!("Package name contains invalid character {:?}: {}", c, name);
    }
    Ok(())
}
