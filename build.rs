use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let version = tagged_version().unwrap_or_else(|| {
        format!(
            "{}+untagged",
            std::env::var("CARGO_PKG_VERSION").unwrap_or_default()
        )
    });

    println!("cargo:rustc-env=CHANGELOGGER_VERSION={}", version);
}

/// Version from the nearest git tag, e.g. `v1.4.0-3-gabc1234` -> `1.4.0-3-gabc1234`.
fn tagged_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty=+dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let version = described.strip_prefix('v').unwrap_or(described);

    (!version.is_empty()).then(|| version.to_string())
}
