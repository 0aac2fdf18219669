//! Checks the bundled prompt templates before they are embedded with `include_str!`.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PromptHeader {
    id: String,
    #[serde(default)]
    vars: Vec<String>,
}

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let prompts_dir = manifest_dir.join("prompts");
    println!("cargo:rerun-if-changed={}", prompts_dir.display());

    let mut problems = Vec::new();
    let mut seen = BTreeSet::new();

    let mut paths: Vec<PathBuf> = fs::read_dir(&prompts_dir)
        .expect("prompts dir")
        .map(|entry| entry.expect("prompt entry").path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("md"))
        .collect();
    paths.sort();

    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());
        if let Err(problem) = check_prompt(path, &mut seen) {
            problems.push(format!("{}: {problem}", path.display()));
        }
    }

    if paths.is_empty() {
        problems.push(format!("no prompt templates in {}", prompts_dir.display()));
    }

    if !problems.is_empty() {
        panic!("invalid prompt templates:\n  {}", problems.join("\n  "));
    }
}

fn check_prompt(path: &Path, seen: &mut BTreeSet<String>) -> Result<(), String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let (header, body) = split_header(&text)?;
    let header: PromptHeader = toml::from_str(header).map_err(|e| e.to_string())?;

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    if header.id != stem {
        return Err(format!("id '{}' does not match the file name", header.id));
    }
    if !seen.insert(header.id.clone()) {
        return Err(format!("duplicate id '{}'", header.id));
    }
    if body.trim().is_empty() {
        return Err("empty body".to_string());
    }

    let declared: BTreeSet<&str> = header.vars.iter().map(String::as_str).collect();
    if let Some(bad) = declared.iter().find(|var| !is_var_name(var)) {
        return Err(format!("'{bad}' is not a valid var name"));
    }

    let used = placeholders(body);
    if let Some(missing) = used.difference(&declared).next() {
        return Err(format!("{{{{{missing}}}}} is used but not declared"));
    }
    if let Some(unused) = declared.difference(&used).next() {
        return Err(format!("'{unused}' is declared but never used"));
    }

    Ok(())
}

/// Split `+++`-fenced TOML header from the template body.
fn split_header(text: &str) -> Result<(&str, &str), String> {
    let rest = text
        .strip_prefix("+++")
        .and_then(|rest| rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")))
        .ok_or("missing opening +++")?;
    let end = rest.find("\n+++").ok_or("missing closing +++")?;
    let body = &rest[end + 4..];
    Ok((&rest[..end], body.trim_start_matches(['\r', '\n'])))
}

fn placeholders(body: &str) -> BTreeSet<&str> {
    let mut found = BTreeSet::new();
    let mut rest = body;
    while let Some(open) = rest.find("{{") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            break;
        };
        let name = after[..close].trim();
        if !name.is_empty() {
            found.insert(name);
        }
        rest = &after[close + 2..];
    }
    found
}

fn is_var_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
