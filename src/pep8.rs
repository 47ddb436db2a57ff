use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use encoding_rs::UTF_8;

use crate::config::ToolConfig;

/// Runs the formatter in diff mode. Conformant means exit 0 and an empty
/// diff; a non-empty diff is relayed to stderr, as is the tool's own stderr
/// on a nonzero exit.
pub fn check(config: &ToolConfig, roots: &[PathBuf]) -> Result<bool> {
    let output = run_formatter(config, &config.formatter.check_args, roots)?;
    if !output.status.success() {
        eprintln!("error checking code formatting\n{}", decode(&output.stderr));
        return Ok(false);
    }
    let diff = decode(&output.stdout);
    if !diff.is_empty() {
        eprintln!("{diff}");
        return Ok(false);
    }
    Ok(true)
}

/// Obtains the diff first to learn which files will change, then rewrites in
/// place and reports them. Any nonzero exit from the tool is a hard failure.
pub fn fix(config: &ToolConfig, roots: &[PathBuf]) -> Result<bool> {
    let preview = run_formatter(config, &config.formatter.check_args, roots)?;
    if !preview.status.success() {
        eprintln!("error checking code formatting\n{}", decode(&preview.stderr));
        return Ok(false);
    }
    let changed = changed_files_from_diff(&decode(&preview.stdout));

    let output = run_formatter(config, &config.formatter.fix_args, roots)?;
    if !output.status.success() {
        eprintln!("error fixing code formatting\n{}", decode(&output.stderr));
        return Ok(false);
    }
    for file in &changed {
        println!("reformatted {file}");
    }
    Ok(true)
}

pub fn install_deps(config: &ToolConfig) -> Result<bool> {
    let installer = &config.installer;
    let status = Command::new(&installer.program)
        .args(&installer.args)
        .stdout(Stdio::null())
        .status()
        .with_context(|| format!("running {}", installer.program))?;
    Ok(status.success())
}

fn run_formatter(config: &ToolConfig, mode_args: &[String], roots: &[PathBuf]) -> Result<Output> {
    let formatter = &config.formatter;
    Command::new(&formatter.program)
        .args(&formatter.common_args)
        .args(mode_args)
        .args(roots)
        .output()
        .with_context(|| format!("running {}", formatter.program))
}

// invalid byte sequences become replacement characters
fn decode(bytes: &[u8]) -> String {
    let (text, _, _) = UTF_8.decode(bytes);
    text.into_owned()
}

fn changed_files_from_diff(diff: &str) -> Vec<String> {
    diff.lines()
        .filter_map(|line| line.strip_prefix("+++ "))
        .map(|rest| rest.strip_prefix("fixed/").unwrap_or(rest).to_string())
        .collect()
}
