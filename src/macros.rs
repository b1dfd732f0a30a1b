//! DDoc macro table and `$(NAME args)` expansion.
//!
//! The table is an ordinary value: built once from the defaults and any
//! user macro files, then passed by reference into every rendering call.

use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{DocError, Result};

/// Expansion stops descending past this depth so self-referential macros terminate.
const MAX_DEPTH: usize = 32;

static RE_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s?(.*)$").unwrap());

const DEFAULT_MACROS: &[(&str, &str)] = &[
    ("B", "<b>$0</b>"),
    ("I", "<i>$0</i>"),
    ("U", "<u>$0</u>"),
    ("P", "<p>$0</p>"),
    ("C", "<code>$0</code>"),
    ("D", "<code>$0</code>"),
    ("DL", "<dl>$0</dl>"),
    ("DT", "<dt>$0</dt>"),
    ("DD", "<dd>$0</dd>"),
    ("UL", "<ul>$0</ul>"),
    ("OL", "<ol>$0</ol>"),
    ("LI", "<li>$0</li>"),
    ("TABLE", "<table>$0</table>"),
    ("TR", "<tr>$0</tr>"),
    ("TH", "<th>$0</th>"),
    ("TD", "<td>$0</td>"),
    ("BR", "<br>"),
    ("LINK", "<a href=\"$0\">$0</a>"),
    ("LINK2", "<a href=\"$1\">$+</a>"),
    ("RED", "<span style=\"color:red\">$0</span>"),
    ("BLUE", "<span style=\"color:blue\">$0</span>"),
    ("GREEN", "<span style=\"color:green\">$0</span>"),
    ("YELLOW", "<span style=\"color:yellow\">$0</span>"),
    ("BLACK", "<span style=\"color:black\">$0</span>"),
    ("WHITE", "<span style=\"color:white\">$0</span>"),
    ("LPAREN", "("),
    ("RPAREN", ")"),
    ("DOLLAR", "$"),
    ("DDOC_BLANKLINE", "<br><br>"),
];

#[derive(Debug, Clone)]
pub struct MacroTable {
    macros: IndexMap<String, String>,
}

impl Default for MacroTable {
    fn default() -> Self {
        Self {
            macros: DEFAULT_MACROS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MacroTable {
    /// A table with no macros at all, not even the defaults.
    pub fn empty() -> Self {
        Self {
            macros: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(String::as_str)
    }

    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.insert(name.into(), value.into());
    }

    /// Load a macro file (`NAME = value` lines); later definitions win.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|source| DocError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for (name, value) in parse_definitions(&text) {
            self.define(name, value);
        }
        Ok(())
    }

    /// Copy of this table with a comment's own `Macros:` section applied on top.
    pub fn overlay(&self, overrides: &[(String, String)]) -> MacroTable {
        let mut table = self.clone();
        for (name, value) in overrides {
            table.define(name.clone(), value.clone());
        }
        table
    }

    /// Expand every `$(NAME args)` occurrence in `text`.
    pub fn expand(&self, text: &str) -> String {
        self.expand_at(text, 0)
    }

    fn expand_at(&self, text: &str, depth: usize) -> String {
        if depth >= MAX_DEPTH || !text.contains("$(") {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("$(") {
            out.push_str(&rest[..start]);
            let inner_start = start + 2;
            let Some(len) = matching_paren(&rest[inner_start..]) else {
                // Unbalanced: leave the remainder untouched.
                out.push_str(&rest[start..]);
                return out;
            };
            let inner = &rest[inner_start..inner_start + len];
            let (name, args) = split_invocation(inner);
            let body = self.get(name).unwrap_or("");
            let substituted = substitute(body, args);
            out.push_str(&self.expand_at(&substituted, depth + 1));
            rest = &rest[inner_start + len + 1..];
        }
        out.push_str(rest);
        out
    }
}

/// Parse `NAME = value` definitions; non-matching lines continue the previous value.
pub fn parse_definitions(text: &str) -> Vec<(String, String)> {
    let mut defs: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        if let Some(caps) = RE_DEFINITION.captures(line) {
            defs.push((caps[1].to_string(), caps[2].trim_end().to_string()));
        } else if let Some((_, value)) = defs.last_mut() {
            let cont = line.trim();
            if !cont.is_empty() {
                if !value.is_empty() {
                    value.push('\n');
                }
                value.push_str(cont);
            }
        }
    }
    defs
}

/// Byte length up to (not including) the `)` closing an invocation.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn split_invocation(inner: &str) -> (&str, &str) {
    let end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(inner.len());
    let name = &inner[..end];
    let args = inner[end..].strip_prefix(|c: char| c.is_whitespace() || c == ',');
    (name, args.unwrap_or(&inner[end..]))
}

/// Split on commas that are not nested inside parentheses.
fn split_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&args[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);
    parts
}

fn substitute(body: &str, args: &str) -> String {
    if !body.contains('$') {
        return body.to_string();
    }
    let parts = split_args(args);
    let after_first = args.find(',').map(|i| &args[i + 1..]).unwrap_or("");

    let mut out = String::with_capacity(body.len() + args.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('0') => {
                chars.next();
                out.push_str(args);
            }
            Some('+') => {
                chars.next();
                out.push_str(after_first);
            }
            Some(d @ '1'..='9') => {
                chars.next();
                let idx = d as usize - '1' as usize;
                out.push_str(parts.get(idx).map(|p| p.trim()).unwrap_or(""));
            }
            _ => out.push('$'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_default_macros() {
        let table = MacroTable::default();
        assert_eq!(table.expand("a $(B bold) b"), "a <b>bold</b> b");
        assert_eq!(
            table.expand("$(LINK2 http://x.org, the site)"),
            "<a href=\"http://x.org\"> the site</a>"
        );
    }

    #[test]
    fn nested_invocations() {
        let table = MacroTable::default();
        assert_eq!(table.expand("$(B $(I both))"), "<b><i>both</i></b>");
    }

    #[test]
    fn unknown_macro_is_empty() {
        let table = MacroTable::default();
        assert_eq!(table.expand("x$(NOPE y)z"), "xz");
    }

    #[test]
    fn unbalanced_is_left_alone() {
        let table = MacroTable::default();
        assert_eq!(table.expand("f$(B oops"), "f$(B oops");
    }

    #[test]
    fn recursive_macro_terminates() {
        let mut table = MacroTable::empty();
        table.define("LOOP", "x$(LOOP)");
        let out = table.expand("$(LOOP)");
        assert_eq!(out.matches('x').count(), MAX_DEPTH);
    }

    #[test]
    fn numbered_arguments() {
        let mut table = MacroTable::empty();
        table.define("PAIR", "[$2|$1]");
        assert_eq!(table.expand("$(PAIR a, b)"), "[b|a]");
    }

    #[test]
    fn definitions_with_continuation() {
        let defs = parse_definitions("A = one\n  two\nB=three\n");
        assert_eq!(
            defs,
            vec![
                ("A".to_string(), "one\ntwo".to_string()),
                ("B".to_string(), "three".to_string()),
            ]
        );
    }

    #[test]
    fn overlay_does_not_touch_base() {
        let base = MacroTable::default();
        let local = base.overlay(&[("B".to_string(), "**$0**".to_string())]);
        assert_eq!(local.expand("$(B x)"), "**x**");
        assert_eq!(base.expand("$(B x)"), "<b>x</b>");
    }
}
