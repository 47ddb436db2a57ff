use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};

mod config;
mod files;
mod header;
mod newline;
mod pep8;

use config::ToolConfig;

#[derive(Debug, Parser)]
#[command(
    name = "pytidy",
    version,
    about = "Header and formatting hygiene for Python script trees"
)]
struct Cli {
    /// Rewrite offending files instead of only reporting them
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "install_deps")]
    fix: bool,
    /// Install or upgrade the external formatter
    #[arg(long = "install-deps", action = ArgAction::SetTrue)]
    install_deps: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = ToolConfig::new()?;
    let roots = vec![PathBuf::from(".")];

    if cli.install_deps {
        pep8::install_deps(&config)
    } else if cli.fix {
        run_fix(&config, &roots)
    } else {
        run_check(&config, &roots)
    }
}

/// Exhaustive: every pass runs over every file, failures accumulate.
fn run_check(config: &ToolConfig, roots: &[PathBuf]) -> Result<bool> {
    let shebang_ok = check_shebangs(config, roots)?;
    let coding_ok = check_codings(config, roots)?;
    let format_ok = pep8::check(config, roots)?;
    Ok(shebang_ok && coding_ok && format_ok)
}

/// Fail-fast across stages; the coding fix requires canonical shebangs, so
/// stage order is load-bearing.
fn run_fix(config: &ToolConfig, roots: &[PathBuf]) -> Result<bool> {
    fix_shebangs(config, roots)?;
    fix_codings(config, roots)?;
    pep8::fix(config, roots)
}

fn check_shebangs(config: &ToolConfig, roots: &[PathBuf]) -> Result<bool> {
    let mut success = true;
    for root in roots {
        for path in files::script_files(root, &config.extension) {
            let path = path?;
            let lines = files::read_lines(&path)?;
            if !header::shebang_is_valid(config, &lines) {
                success = false;
                eprintln!("invalid shebang header in {}", path.display());
            }
        }
    }
    Ok(success)
}

fn check_codings(config: &ToolConfig, roots: &[PathBuf]) -> Result<bool> {
    let mut success = true;
    for root in roots {
        for path in files::script_files(root, &config.extension) {
            let path = path?;
            let lines = files::read_lines(&path)?;
            if !header::coding_is_valid(config, &lines) {
                success = false;
                eprintln!("invalid coding header in {}", path.display());
            }
        }
    }
    Ok(success)
}

fn fix_shebangs(config: &ToolConfig, roots: &[PathBuf]) -> Result<()> {
    for root in roots {
        for path in files::script_files(root, &config.extension) {
            let path = path?;
            let mut lines = files::read_lines(&path)?;
            let style = newline::detect_newline(&lines);
            if header::fix_shebang(config, &mut lines) {
                println!("fixing shebang of {}", path.display());
                files::write_lines(&path, &lines, style)?;
            }
        }
    }
    Ok(())
}

fn fix_codings(config: &ToolConfig, roots: &[PathBuf]) -> Result<()> {
    for root in roots {
        for path in files::script_files(root, &config.extension) {
            let path = path?;
            let mut lines = files::read_lines(&path)?;
            let style = newline::detect_newline(&lines);
            if header::fix_coding(config, &mut lines)? {
                println!("fixing coding of {}", path.display());
                files::write_lines(&path, &lines, style)?;
            }
        }
    }
    Ok(())
}

fn print_usage() {
    println!("usage: pytidy                  recursively check shebang, coding and formatting");
    println!("       pytidy --fix            check and fix formatting");
    println!("       pytidy --install-deps   install and update the external formatter");
}
