//! `psynth.json` loading.
//!
//! The file holds [`SynthesisOptions`] in camelCase; every key is optional.
//! Comments and trailing commas are tolerated the way editors write them.

use anyhow::{Context, Result, bail};
use psynth_common::{SynthesisOptions, TypeReference};
use std::path::{Path, PathBuf};

use crate::cli::args::SynthesizeArgs;

pub const CONFIG_FILE_NAME: &str = "psynth.json";

pub fn parse_options(source: &str) -> Result<SynthesisOptions> {
    let normalized = remove_trailing_commas(&strip_comments(source));
    if normalized.trim().is_empty() {
        return Ok(SynthesisOptions::default());
    }
    serde_json::from_str(&normalized).context("failed to parse psynth options JSON")
}

/// Options from `explicit`, or from `psynth.json` beside `model`, or the
/// defaults when neither exists.
pub fn load_options(explicit: Option<&Path>, model: &Path) -> Result<SynthesisOptions> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match discover_config(model) {
            Some(path) => path,
            None => return Ok(SynthesisOptions::default()),
        },
    };
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_options(&source).with_context(|| format!("invalid config: {}", path.display()))
}

fn discover_config(model: &Path) -> Option<PathBuf> {
    let dir = model.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Apply command-line overrides on top of loaded options.
pub fn apply_overrides(mut options: SynthesisOptions, args: &SynthesizeArgs) -> Result<SynthesisOptions> {
    if let Some(mode) = args.mode {
        options.mode = mode.into();
    }
    if let Some(policy_type) = &args.policy_type {
        options.policy_type = TypeReference::parse(policy_type)
            .with_context(|| format!("invalid --policy-type `{policy_type}`"))?;
    }
    Ok(options)
}

/// Drop `//` and `/* */` comments outside string literals. Newlines inside
/// comments are kept so parse errors report the right line.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                _ if escape => escape = false,
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if previous == '*' && next == '/' {
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    previous = next;
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                _ if escape => escape = false,
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars.clone().find(|c| !c.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }
        out.push(ch);
    }
    out
}
