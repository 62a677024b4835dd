//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries
//! (domain → application → infra/commands/output) are maintained.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        if line.trim().contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-comment lines outside `#[cfg(test)]` blocks, with 1-based line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            !in_test && !trimmed.starts_with("//") && !trimmed.starts_with("///")
        })
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect()
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Scan `dir` for any of `forbidden`, returning `file:line: text` violations.
fn scan(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = file
            .strip_prefix(env!("CARGO_MANIFEST_DIR"))
            .unwrap_or(&file)
            .display()
            .to_string();
        for (lineno, line) in production_lines(&file) {
            for needle in forbidden {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{lineno}: `{needle}` in: {}", line.trim()));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_is_pure() {
    let violations = scan(
        &src_dir().join("domain"),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::fs",
            "std::process",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay free of I/O and outer layers:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_depends_only_on_domain_and_ports() {
    let violations = scan(
        &src_dir().join("application"),
        &[
            "crate::infra",
            "crate::commands",
            "crate::output",
            "std::fs",
            "println!",
        ],
    );
    assert!(
        violations.is_empty(),
        "application/ must not import infra, commands, or output:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = scan(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output", "println!", "eprintln!"],
    );
    assert!(
        violations.is_empty(),
        "infra/ must not import commands/ or output/, nor print:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_concrete_runtime_types_in_service_signatures() {
    let services = src_dir().join("application").join("services");
    let violations: Vec<String> = scan(&services, &["DockerCli", "TokioCommandRunner"]);
    assert!(
        violations.is_empty(),
        "services must take port trait bounds, not concrete adapters:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_handlers_accept_app_context() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir().join("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        if content.contains("pub async fn run(") && !content.contains("app: &AppContext") {
            violations.push(file.display().to_string());
        }
    }
    assert!(
        violations.is_empty(),
        "async command handlers must take `&AppContext`:\n{}",
        violations.join("\n")
    );
}
