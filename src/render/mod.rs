//! HTML rendering: cross-referenced text, page shells, contents and search index.

pub mod html;
pub mod search;
pub mod toc;
pub mod xref;

pub use xref::LinkContext;

/// Escape text for use between HTML tags.
pub fn escape(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}
