//! Cross-referenced text: inline code, code blocks and prose paragraphs.
//!
//! Every identifier chain inside code is offered to the resolver. A chain
//! that does not resolve as a whole is retried one component at a time, so
//! `widget.draw` still links `draw` when `widget` is just a local variable.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::comment::{is_code_fence, unindent};
use crate::macros::MacroTable;
use crate::symbols::link::relative_link;
use crate::symbols::Resolver;

use super::{escape, escape_attr};

static RE_QUALIFIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.?[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*$").unwrap());

static RE_IDENT_CHAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*").unwrap());

static RE_CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// String, character and backtick literals, which are never linked.
static RE_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\\n]|\\.)*'|`[^`]*`"#).unwrap()
});

/// Stands in for a rendered code span while macros expand around it.
fn placeholder(i: usize) -> String {
    format!("\u{E000}{i}\u{E001}")
}

/// Where a piece of text is being rendered.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'a> {
    pub resolver: Resolver<'a>,
    /// Scope of the symbol whose documentation is being rendered.
    pub scope: &'a [String],
    /// Root-relative page the text will end up on.
    pub page: &'a str,
    pub macros: &'a MacroTable,
}

impl LinkContext<'_> {
    fn anchor(&self, target: &str, text: &str) -> String {
        format!(
            "<a href=\"{}\">{}</a>",
            escape_attr(&relative_link(self.page, target)),
            escape(text)
        )
    }
}

/// Link a dotted word, falling back to its components.
pub fn link_word(ctx: &LinkContext<'_>, word: &str) -> String {
    if let Some(target) = ctx.resolver.resolve(ctx.scope, word) {
        return ctx.anchor(&target, word);
    }

    let (lead, body) = match word.strip_prefix('.') {
        Some(body) => (".", body),
        None => ("", word),
    };
    if !body.contains('.') {
        return escape(word);
    }

    let mut out = String::new();
    for (i, part) in body.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        let candidate = if i == 0 {
            format!("{lead}{part}")
        } else {
            part.to_string()
        };
        match ctx.resolver.resolve(ctx.scope, &candidate) {
            Some(target) => out.push_str(&ctx.anchor(&target, &candidate)),
            None => out.push_str(&escape(&candidate)),
        }
    }
    out
}

/// Escape a piece of code and link every identifier chain in it.
pub fn link_code(ctx: &LinkContext<'_>, code: &str) -> String {
    if RE_QUALIFIED.is_match(code) {
        return link_word(ctx, code);
    }

    let mut out = String::with_capacity(code.len());
    let mut last = 0;
    for lit in RE_LITERAL.find_iter(code) {
        link_identifiers(ctx, code, last..lit.start(), &mut out);
        out.push_str(&escape(lit.as_str()));
        last = lit.end();
    }
    link_identifiers(ctx, code, last..code.len(), &mut out);
    out
}

/// Link the identifier chains of `code[range]`. A chain glued to a
/// preceding word character (`1.5f`, `0xFF`) is part of a number or
/// longer token and stays plain text.
fn link_identifiers(ctx: &LinkContext<'_>, code: &str, range: Range<usize>, out: &mut String) {
    let mut last = range.start;
    for m in RE_IDENT_CHAIN.find_iter(&code[range.clone()]) {
        let (start, end) = (range.start + m.start(), range.start + m.end());
        let glued = code[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        if glued {
            continue;
        }
        out.push_str(&escape(&code[last..start]));
        out.push_str(&link_word(ctx, m.as_str()));
        last = end;
    }
    out.push_str(&escape(&code[last..range.end]));
}

/// One line of prose: escaped, code spans linked, macros expanded.
///
/// Macros see the whole line, so `$(B `f`)` wraps the linked span.
pub fn render_inline(ctx: &LinkContext<'_>, text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut spans = Vec::new();
    let mut last = 0;
    for m in RE_CODE_SPAN.find_iter(text) {
        masked.push_str(&escape(&text[last..m.start()]));
        masked.push_str(&placeholder(spans.len()));
        let code = &text[m.start() + 1..m.end() - 1];
        spans.push(format!("<code>{}</code>", link_code(ctx, code)));
        last = m.end();
    }
    masked.push_str(&escape(&text[last..]));

    let mut out = ctx.macros.expand(&masked);
    for (i, span) in spans.iter().enumerate() {
        out = out.replace(&placeholder(i), span);
    }
    out
}

/// Paragraphs and fenced code blocks.
pub fn render_prose(ctx: &LinkContext<'_>, text: &str) -> String {
    let mut out = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Option<Vec<&str>> = None;

    for line in text.lines() {
        if is_code_fence(line) {
            match code.take() {
                Some(lines) => out.push_str(&code_block(ctx, &lines)),
                None => {
                    flush_paragraph(ctx, &mut out, &mut paragraph);
                    code = Some(Vec::new());
                }
            }
            continue;
        }
        if let Some(lines) = code.as_mut() {
            lines.push(line);
        } else if line.trim().is_empty() {
            flush_paragraph(ctx, &mut out, &mut paragraph);
        } else {
            paragraph.push(line.trim());
        }
    }

    if let Some(lines) = code {
        out.push_str(&code_block(ctx, &lines));
    }
    flush_paragraph(ctx, &mut out, &mut paragraph);
    out
}

fn flush_paragraph(ctx: &LinkContext<'_>, out: &mut String, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    out.push_str("<p>");
    out.push_str(&render_inline(ctx, &paragraph.join("\n")));
    out.push_str("</p>\n");
    paragraph.clear();
}

fn code_block(ctx: &LinkContext<'_>, lines: &[&str]) -> String {
    let code = unindent(&lines.join("\n"));
    format!("<pre><code>{}</code></pre>\n", link_code(ctx, &code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{DatabaseBuilder, Layout, SymbolDatabase, SymbolKind};
    use std::path::Path;

    fn database(layout: Layout) -> SymbolDatabase {
        let mut b = DatabaseBuilder::new(layout);
        b.add_module("a", Path::new("a.d"), String::new());
        b.add_module("b", Path::new("b.d"), String::new());
        b.tree_mut().insert(&["a", "Widget"], SymbolKind::Class);
        b.tree_mut().insert(&["a", "Widget", "draw"], SymbolKind::Function);
        b.tree_mut().insert(&["a", "f"], SymbolKind::Function);
        b.tree_mut().insert(&["a", "xFF"], SymbolKind::Variable);
        b.finish()
    }

    fn scope(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn inline_code_links_across_modules() {
        let db = database(Layout::Aggregated);
        let macros = MacroTable::default();
        let scope = scope(&["b"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "b/index.html",
            macros: &macros,
        };
        assert_eq!(
            render_inline(&ctx, "Calls `Widget.draw` once."),
            "Calls <code><a href=\"../a/Widget.html#draw\">Widget.draw</a></code> once."
        );
    }

    #[test]
    fn simple_layout_link() {
        let db = database(Layout::Simple);
        let macros = MacroTable::default();
        let scope = scope(&["b"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "b/index.html",
            macros: &macros,
        };
        assert_eq!(
            link_word(&ctx, "Widget.draw"),
            "<a href=\"../a/Widget.draw.html\">Widget.draw</a>"
        );
    }

    #[test]
    fn falls_back_to_components() {
        let db = database(Layout::Aggregated);
        let macros = MacroTable::default();
        let scope = scope(&["a", "Widget"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "a/Widget.html",
            macros: &macros,
        };
        assert_eq!(link_word(&ctx, "w.draw"), "w.<a href=\"#draw\">draw</a>");
        assert_eq!(link_word(&ctx, "nothing"), "nothing");
    }

    #[test]
    fn code_blocks_link_identifiers() {
        let db = database(Layout::Aggregated);
        let macros = MacroTable::default();
        let scope = scope(&["b"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "b/index.html",
            macros: &macros,
        };
        let html = render_prose(&ctx, "Example:\n---\nauto w = new Widget();\nif (a < b) Widget.draw();\n---");
        assert!(html.starts_with("<p>Example:</p>\n<pre><code>"));
        assert!(html.contains("new <a href=\"../a/Widget.html\">Widget</a>();"));
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("<a href=\"../a/Widget.html#draw\">Widget.draw</a>();"));
    }

    #[test]
    fn macros_expand_in_prose_only() {
        let db = database(Layout::Aggregated);
        let macros = MacroTable::default();
        let scope = scope(&["b"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "b/index.html",
            macros: &macros,
        };
        assert_eq!(
            render_prose(&ctx, "Very $(B bold) & `$(B x)`\n\nSecond."),
            "<p>Very <b>bold</b> &amp; <code>$(B x)</code></p>\n<p>Second.</p>\n"
        );
    }

    #[test]
    fn literals_and_number_suffixes_stay_plain() {
        let db = database(Layout::Aggregated);
        let macros = MacroTable::default();
        let scope = scope(&["a"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "a/index.html",
            macros: &macros,
        };
        assert_eq!(
            link_code(&ctx, "auto x = 1.5f + 0xFF; puts(\"f\"); c = 'f'; f(xFF);"),
            "auto x = 1.5f + 0xFF; puts(\"f\"); c = 'f'; \
             <a href=\"#f\">f</a>(<a href=\"#xFF\">xFF</a>);"
        );
        assert_eq!(
            link_code(&ctx, r#"puts("a \"f\" b", `f`);"#),
            r#"puts("a \"f\" b", `f`);"#
        );
    }

    #[test]
    fn macros_wrap_code_spans() {
        let db = database(Layout::Aggregated);
        let macros = MacroTable::default();
        let scope = scope(&["b"]);
        let ctx = LinkContext {
            resolver: db.resolver(),
            scope: &scope,
            page: "b/index.html",
            macros: &macros,
        };
        assert_eq!(
            render_inline(&ctx, "See $(B `Widget`) and `x`, `y` here."),
            "See <b><code><a href=\"../a/Widget.html\">Widget</a></code></b> \
             and <code>x</code>, <code>y</code> here."
        );
    }
}
