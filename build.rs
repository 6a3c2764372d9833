use std::process::Command;
use std::fs;
use regex::Regex;

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    let git_hash = git_output(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let git_count = git_output(&["rev-list", "--count", "HEAD"]).unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=GIT_COUNT={}", git_count);
    println!("cargo:rustc-rerun-if-changed=.git/HEAD");

    if let Ok(head) = fs::read_to_string(".git/HEAD") {
        let re = Regex::new(r"ref: (.*)").unwrap();
        if let Some(captures) = re.captures(&head) {
            println!("cargo:rustc-rerun-if-changed=.git/{}",
                     captures.get(1).map_or("", |m| m.as_str()));
        }
    }
}
