//! HTML renderer — page shell, symbol doc blocks and member tables.

use crate::comment::{Section, DESCRIPTION, SUMMARY};
use crate::symbols::{Members, SymbolKind};

use super::xref::{render_inline, render_prose, LinkContext};
use super::{escape, escape_attr};

/// Wrap a page body in a standalone HTML document.
///
/// `root` is the relative prefix (`""`, `"../"`, …) from the page to the output root.
pub fn page(title: &str, root: &str, body: &str) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(title)));
    out.push_str("<style>\n");
    out.push_str("body { font-family: system-ui, sans-serif; max-width: 56em; margin: 2em auto; padding: 0 1em; }\n");
    out.push_str("code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }\n");
    out.push_str("pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }\n");
    out.push_str("pre code { padding: 0; }\n");
    out.push_str("nav { font-size: 0.9em; margin-bottom: 1em; }\n");
    out.push_str("section.symbol { border-top: 1px solid #ddd; margin-top: 1.5em; }\n");
    out.push_str("table { border-collapse: collapse; }\n");
    out.push_str("td { padding: 0.2em 0.8em 0.2em 0; vertical-align: top; }\n");
    out.push_str(".tag { display: inline-block; font-size: 0.75em; padding: 0.1em 0.4em; border-radius: 3px; margin-left: 0.5em; background: #e8e8e8; }\n");
    out.push_str("</style>\n");
    out.push_str("</head>\n<body>\n");

    out.push_str(&format!(
        "<nav><a href=\"{root}index.html\">Index</a> | <a href=\"{root}toc.html\">Contents</a></nav>\n",
        root = escape_attr(root)
    ));
    out.push_str(body);

    out.push_str("</body>\n</html>\n");
    out
}

/// Relative prefix from a root-relative page back to the output root.
pub fn root_prefix(page: &str) -> String {
    "../".repeat(page.matches('/').count())
}

/// Heading, signature and body of one documented symbol.
pub fn doc_block(
    id: Option<&str>,
    name: &str,
    kind: SymbolKind,
    signature: &str,
    body: &str,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("<section class=\"symbol {}\">\n", kind.as_str()));

    match id {
        Some(id) => out.push_str(&format!("<h3 id=\"{}\">", escape_attr(id))),
        None => out.push_str("<h3>"),
    }
    out.push_str(&escape(name));
    out.push_str(&format!(" <span class=\"tag\">{kind}</span></h3>\n"));

    if !signature.is_empty() && signature != name {
        out.push_str(&format!(
            "<pre class=\"signature\"><code>{}</code></pre>\n",
            escape(signature)
        ));
    }
    out.push_str(body);
    out.push_str("</section>\n");
    out
}

/// Render parsed comment sections. `Macros:` sections are configuration, not content.
pub fn sections(ctx: &LinkContext<'_>, sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        if section.name.eq_ignore_ascii_case("macros") {
            continue;
        }
        if section.is_mapping() {
            out.push_str(&format!("<h4>{}</h4>\n", escape(&section.title())));
            out.push_str("<table class=\"params\">\n");
            for (name, value) in &section.mapping {
                out.push_str(&format!(
                    "<tr><td><code>{}</code></td><td>{}</td></tr>\n",
                    escape(name),
                    render_inline(ctx, value)
                ));
            }
            out.push_str("</table>\n");
            continue;
        }
        if section.name != SUMMARY && section.name != DESCRIPTION {
            out.push_str(&format!("<h4>{}</h4>\n", escape(&section.title())));
        }
        out.push_str(&render_prose(ctx, &section.content));
    }
    out
}

/// One table per non-empty member category.
pub fn member_tables(ctx: &LinkContext<'_>, members: &Members) -> String {
    let mut out = String::new();
    for (title, items) in members.categories() {
        out.push_str(&format!("<h4>{title}</h4>\n<table class=\"members\">\n"));
        for item in items {
            let name = if item.is_linkable() {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape_attr(&item.url),
                    escape(&item.name)
                )
            } else {
                escape(&item.name)
            };
            let signature = item.detail.signature(&item.name, item.ty.as_deref());
            let decl = if signature != item.name {
                format!("<code>{}</code>", escape(&signature))
            } else {
                String::new()
            };
            out.push_str(&format!(
                "<tr><td>{name}</td><td>{decl}</td><td>{}</td></tr>\n",
                render_inline(ctx, &item.summary)
            ));
        }
        out.push_str("</table>\n");
    }
    out
}
