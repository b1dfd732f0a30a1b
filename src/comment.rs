//! DDoc comment parser — splits a raw doc comment into named sections.
//!
//! The first paragraph is the `Summary`, following paragraphs up to the first
//! section header form the unnamed description, and every `Name:` line starts
//! a new named section. `Params:` and `Macros:` hold `name = value` tables.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Name given to the first, unnamed paragraph of a comment.
pub const SUMMARY: &str = "Summary";

/// Name of the unnamed description that follows the summary.
pub const DESCRIPTION: &str = "";

static RE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*):(?:\s+(.*))?$").unwrap());

static RE_MAPPING_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s?(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("code block opened on line {line} is never closed")]
    UnterminatedCodeBlock { line: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    /// Raw text of the section. Empty for mapping sections.
    pub content: String,
    /// `name = value` pairs of `Params:`/`Macros:` sections, in source order.
    pub mapping: Vec<(String, String)>,
}

impl Section {
    pub fn is_mapping(&self) -> bool {
        is_mapping_section(&self.name)
    }

    /// Display title: `See_Also` reads as "See Also".
    pub fn title(&self) -> String {
        self.name.replace('_', " ")
    }
}

fn is_mapping_section(name: &str) -> bool {
    name.eq_ignore_ascii_case("params") || name.eq_ignore_ascii_case("macros")
}

/// Lines of three or more dashes, or a markdown fence, open and close code blocks.
pub fn is_code_fence(line: &str) -> bool {
    let t = line.trim();
    (t.len() >= 3 && t.chars().all(|c| c == '-')) || t.starts_with("```")
}

/// Parse a raw comment into sections.
pub fn parse(raw: &str) -> Result<Vec<Section>, CommentError> {
    let text = unindent(raw);
    let mut sections = Vec::new();
    let mut current = String::from(SUMMARY);
    let mut buffer: Vec<&str> = Vec::new();
    let mut code_opened_at: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        if is_code_fence(line) {
            if code_opened_at.take().is_none() {
                code_opened_at = Some(idx + 1);
                // A code block never belongs to the summary.
                if current == SUMMARY && buffer.iter().any(|l| !l.trim().is_empty()) {
                    flush(&mut sections, &current, &buffer);
                    buffer.clear();
                    current = DESCRIPTION.to_string();
                }
            }
            buffer.push(line);
            continue;
        }
        if code_opened_at.is_some() {
            buffer.push(line);
            continue;
        }

        if line.trim().is_empty() && current == SUMMARY {
            if buffer.iter().any(|l| !l.trim().is_empty()) {
                flush(&mut sections, &current, &buffer);
                buffer.clear();
                current = DESCRIPTION.to_string();
            }
            continue;
        }

        if let Some(caps) = RE_HEADER.captures(line) {
            flush(&mut sections, &current, &buffer);
            buffer.clear();
            current = caps[1].to_string();
            if let Some(rest) = caps.get(2) {
                buffer.push(rest.as_str());
            }
            continue;
        }

        buffer.push(line);
    }

    if let Some(line) = code_opened_at {
        return Err(CommentError::UnterminatedCodeBlock { line });
    }
    flush(&mut sections, &current, &buffer);
    Ok(sections)
}

/// Raw content of the first section, used for one-line module listings.
pub fn summary(sections: &[Section]) -> &str {
    sections.first().map(|s| s.content.as_str()).unwrap_or("")
}

fn flush(sections: &mut Vec<Section>, name: &str, lines: &[&str]) {
    let content = trim_blank_lines(lines);
    let is_named = name != SUMMARY && name != DESCRIPTION;
    if content.is_empty() && !is_named {
        return;
    }

    if is_mapping_section(name) {
        sections.push(Section {
            name: name.to_string(),
            content: String::new(),
            mapping: parse_mapping(&content),
        });
    } else {
        sections.push(Section {
            name: name.to_string(),
            content,
            mapping: Vec::new(),
        });
    }
}

fn parse_mapping(content: &str) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = Vec::new();
    for line in content.lines() {
        if let Some(caps) = RE_MAPPING_ENTRY.captures(line) {
            entries.push((caps[1].to_string(), caps[2].trim().to_string()));
        } else if let Some((_, value)) = entries.last_mut() {
            let cont = line.trim();
            if !cont.is_empty() {
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(cont);
            }
        }
    }
    entries
}

fn trim_blank_lines(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].join("\n"),
        _ => String::new(),
    }
}

/// Remove common leading indentation from a multi-line string.
pub fn unindent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l.get(indent..).unwrap_or_else(|| l.trim_start())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
