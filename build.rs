use vergen::EmitBuilder;
use std::process::Command;

fn main() {
    // Git metadata feeds the `commit` field of /api/version
    let is_git_available = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false);

    // Generate build-time metadata based on git availability
    let result = if is_git_available {
        EmitBuilder::builder()
            .build_timestamp()
            .git_sha(false) // Short SHA
            .emit()
    } else {
        // Outside a checkout the version handler reports "unknown"
        EmitBuilder::builder()
            .build_timestamp()
            .emit()
    };

    result.expect("Unable to generate version metadata");
}
