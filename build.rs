use std::process::Command;

/// `pose-match --version` にパッケージ版と git の記述子を埋め込む
fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let describe = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty());

    let version = match describe {
        Some(git) => format!("{} ({})", pkg, git),
        None => pkg,
    };

    println!("cargo:rustc-env=GIT_VERSION={}", version);
}
