//! Build script: version metadata for `ytloop --version` and `--help`.
//!
//! Always sets `YTLOOP_REPO_NAME` and `YTLOOP_BUILD_DATE`. Dev builds also
//! get `VERGEN_GIT_SHA`; `--features release` leaves it out.

use std::process::Command;

fn build_date() -> String {
    Command::new("date")
        .arg("+%Y-%m-%d")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// `owner/repo` from the package's repository URL.
fn repo_name() -> String {
    let repository = std::env::var("CARGO_PKG_REPOSITORY").unwrap_or_default();
    let path: Vec<&str> = repository
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .rsplit('/')
        .take(2)
        .collect();
    match path.as_slice() {
        [repo, owner] if !repo.is_empty() && !owner.is_empty() => format!("{}/{}", owner, repo),
        _ => "ytloop".to_string(),
    }
}

fn main() {
    println!("cargo:rustc-env=YTLOOP_REPO_NAME={}", repo_name());
    println!("cargo:rustc-env=YTLOOP_BUILD_DATE={}", build_date());

    #[cfg(not(feature = "release"))]
    {
        use vergen_gitcl::{Emitter, GitclBuilder};

        let emitted = GitclBuilder::default()
            .sha(true)
            .build()
            .map_err(|e| e.to_string())
            .and_then(|git| {
                Emitter::default()
                    .add_instructions(&git)
                    .and_then(|emitter| emitter.emit())
                    .map_err(|e| e.to_string())
            });

        // Source tarballs have no git metadata
        if let Err(e) = emitted {
            println!("cargo:warning=git sha unavailable: {}", e);
            println!("cargo:rustc-env=VERGEN_GIT_SHA=unknown");
        }
    }
}
