use anyhow::{Result, anyhow};
use regex::Regex;

#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub shebang_marker: Regex,
    pub shebang_canonical: Regex,
    pub shebang_line: String,
    pub coding_any: Regex,
    pub coding_canonical: Regex,
    pub coding_line: String,
    pub extension: String,
    pub formatter: FormatterCommand,
    pub installer: InstallerCommand,
}

#[derive(Debug, Clone)]
pub struct InstallerCommand {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FormatterCommand {
    pub program: String,
    pub common_args: Vec<String>,
    pub check_args: Vec<String>,
    pub fix_args: Vec<String>,
}

impl ToolConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            shebang_marker: compile(r"^#!")?,
            // trailing \s* also eats the line terminator, so lines keep theirs
            shebang_canonical: compile(r"^#!/usr/bin/env[ \t]+python\s*$")?,
            shebang_line: "#!/usr/bin/env python".to_string(),
            coding_any: compile(r"coding[:=]\s*[-\w]+")?,
            coding_canonical: compile(r"coding[=:]\s*utf-8")?,
            coding_line: "# -*- coding: utf-8 -*-".to_string(),
            extension: "py".to_string(),
            formatter: FormatterCommand {
                program: "autopep8".to_string(),
                common_args: string_vec(&[
                    "--recursive",
                    "--aggressive",
                    "--aggressive",
                    "--max-line-length",
                    "99",
                ]),
                check_args: string_vec(&["--diff"]),
                fix_args: string_vec(&["--in-place", "--verbose"]),
            },
            installer: InstallerCommand {
                program: "pip".to_string(),
                args: string_vec(&["install", "--upgrade", "autopep8"]),
            },
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| anyhow!("invalid pattern '{pattern}': {err}"))
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
