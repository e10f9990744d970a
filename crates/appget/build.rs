// Build script for appget - embeds version at compile time

fn main() {
    // Release pipelines set APPGET_VERSION; local builds use Cargo.toml
    let version =
        std::env::var("APPGET_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=APPGET_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=APPGET_VERSION");
}
