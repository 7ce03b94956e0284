// Embeds BLOG_SEARCH_VERSION for --version and the HTTP User-Agent.
// Release pipelines stamp their run number over the patch segment.

use std::env;

const PATCH_OVERRIDE: &str = "BLOG_SEARCH_PATCH_VERSION";

fn main() {
    let major = cargo_env("CARGO_PKG_VERSION_MAJOR");
    let minor = cargo_env("CARGO_PKG_VERSION_MINOR");
    let patch = match env::var(PATCH_OVERRIDE) {
        Ok(run) if run.is_empty() => cargo_env("CARGO_PKG_VERSION_PATCH"),
        Ok(run) if run.bytes().all(|b| b.is_ascii_digit()) => run,
        Ok(run) => panic!("{PATCH_OVERRIDE} must be numeric, got: {run}"),
        Err(_) => cargo_env("CARGO_PKG_VERSION_PATCH"),
    };

    let version = match env::var("CARGO_PKG_VERSION_PRE") {
        Ok(pre) if !pre.is_empty() => format!("{major}.{minor}.{patch}-{pre}"),
        _ => format!("{major}.{minor}.{patch}"),
    };

    println!("cargo:rustc-env=BLOG_SEARCH_VERSION={version}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed={PATCH_OVERRIDE}");
}

fn cargo_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} not set by cargo"))
}
