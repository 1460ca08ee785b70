use std::process::Command;

/// Stamp the build with the short git revision (`unknown` outside a checkout).
fn main() {
    let revision = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=RELAY_BUILD_REV={}", revision);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
