use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use encoding_rs::UTF_8;
use time::OffsetDateTime;
use walkdir::{DirEntry, WalkDir};

use crate::newline::{self, NewlineStyle};

/// Lazily yields every managed script under `root`, or `root` itself if it is
/// a plain file. Hidden entries are pruned (the root is exempt so running from
/// `.` still descends it); directories are sorted so enumeration order is
/// reproducible. Walk errors are yielded to the caller, never swallowed.
pub fn script_files(root: &Path, extension: &str) -> impl Iterator<Item = Result<PathBuf>> + use<> {
    let extension = extension.to_string();
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => {
                let eligible = entry.depth() == 0 || has_extension(entry.path(), &extension);
                eligible.then(|| Ok(entry.into_path()))
            }
            Err(err) => Some(Err(err.into())),
        })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == extension)
}

pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (text, _, had_errors) = UTF_8.decode(&bytes);
    if had_errors {
        eprintln!(
            "warning: decoding errors encountered for {}; continuing",
            path.display()
        );
    }
    Ok(newline::split_lines(&text))
}

/// Full-file overwrite: every line gets exactly one instance of `style`, any
/// prior terminator stripped first.
pub fn write_lines(path: &Path, lines: &[String], style: NewlineStyle) -> Result<()> {
    let mut content = String::with_capacity(lines.iter().map(String::len).sum());
    for line in lines {
        content.push_str(newline::trim_line_ending(line));
        content.push_str(style.as_str());
    }
    write_via_temp(path, content.as_bytes())
        .with_context(|| format!("writing {}", path.display()))
}

fn write_via_temp(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let base_dir = parent.unwrap_or_else(|| Path::new("."));
    let unique = format!(
        ".pytidy-tmp-{}-{}",
        std::process::id(),
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    );
    let temp_path = base_dir.join(unique);
    {
        let mut file = fs::File::create(&temp_path)
            .with_context(|| format!("creating temp file {}", temp_path.display()))?;
        file.write_all(data)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("syncing temp file {}", temp_path.display()))?;
    }
    fs::rename(&temp_path, path).or_else(|err| {
        let _ = fs::remove_file(&temp_path);
        Err(err).with_context(|| format!("replacing {}", path.display()))
    })?;
    Ok(())
}
