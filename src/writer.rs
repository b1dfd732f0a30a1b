//! Phase two: walk every gathered module again and emit HTML pages.
//!
//! Page placement comes from the layout's link for each symbol. Symbols whose
//! links share a file (overloads, or leaves in the aggregated layout) are
//! appended to that file in declaration order.

use indexmap::{IndexMap, IndexSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::ast::{Decl, DeclKind, ModuleDecl};
use crate::comment::{self, Section};
use crate::error::{DocError, Result};
use crate::macros::MacroTable;
use crate::render::{self, html, search, toc, xref, LinkContext};
use crate::symbols::gather::Gathered;
use crate::symbols::link::{anchor_of, page_of, relative_link};
use crate::symbols::members::NO_LINK;
use crate::symbols::{Item, ItemDetail, Members, SymbolDatabase, SymbolKind};

const ROOT_INDEX: &str = "index.html";
const TOC_PAGE: &str = "toc.html";
const SEARCH_INDEX: &str = "search-index.json";

/// One output page under construction.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: String,
    pub body: String,
    anchors: IndexSet<String>,
}

/// A declaration that will be documented, with the comment that applies to it.
struct Documented<'d> {
    decl: &'d Decl,
    kind: SymbolKind,
    comment: &'d str,
}

/// Declarations of one scope that get documented, in source order.
///
/// Anonymous enums contribute their members directly; `ditto` comments take
/// the comment of the previous documented declaration.
fn documented(decls: &[Decl]) -> Vec<Documented<'_>> {
    let mut out = Vec::new();
    let mut previous: &str = "";

    for decl in decls {
        if decl.is_anonymous_enum() {
            for member in &decl.members {
                if !member.name().is_empty() {
                    out.push(Documented {
                        decl: member,
                        kind: SymbolKind::Value,
                        comment: member.comment(),
                    });
                }
            }
            continue;
        }
        let Some(kind) = SymbolKind::of_decl(decl) else {
            continue;
        };

        let comment = if decl.is_ditto() {
            previous
        } else {
            decl.comment()
        };
        if decl.is_documented() && !decl.is_ditto() {
            previous = decl.comment();
        }
        if decl.name().is_empty() {
            continue;
        }
        if decl.is_documented() || decl.kind == DeclKind::EnumMember {
            out.push(Documented {
                decl,
                kind,
                comment,
            });
        }
    }
    out
}

pub struct DocWriter<'a> {
    db: &'a SymbolDatabase,
    macros: &'a MacroTable,
    pages: IndexMap<String, Page>,
    scope: Vec<String>,
}

impl<'a> DocWriter<'a> {
    pub fn new(db: &'a SymbolDatabase, macros: &'a MacroTable) -> Self {
        Self {
            db,
            macros,
            pages: IndexMap::new(),
            scope: Vec::new(),
        }
    }

    pub fn pages(&self) -> &IndexMap<String, Page> {
        &self.pages
    }

    /// Render one gathered module and everything documented inside it.
    pub fn write_module(&mut self, name: &str, module: &ModuleDecl) {
        let Some(scope) = module.name_parts() else {
            warn!(module = name, "module has no name; skipping");
            return;
        };
        self.scope = scope;
        let Some(page) = self.db.symbol_link(&self.scope) else {
            warn!(module = name, "module was not gathered; skipping");
            return;
        };
        let page = page_of(&page).to_string();
        debug!(module = name, page = %page, "writing module");

        let sections = self.parse_comment(module.comment(), name);
        let macros = self.macros.overlay(&macro_overrides(&sections));
        let ctx = self.context(&page, &macros);

        let mut body = format!("<h1>Module {}</h1>\n", render::escape(name));
        body.push_str(&html::sections(&ctx, &sections));
        let members = self.members(&module.members, &page);
        body.push_str(&html::member_tables(&ctx, &members));

        self.append(&page, name, None, body);
        self.visit(&module.members);
        self.scope.clear();
    }

    fn visit(&mut self, decls: &[Decl]) {
        for item in documented(decls) {
            self.write_decl(&item);
        }
    }

    fn write_decl(&mut self, item: &Documented<'_>) {
        let name = item.decl.name();
        self.scope.push(name.to_string());

        if let Some(link) = self.db.symbol_link(&self.scope) {
            let page = page_of(&link).to_string();
            let id = anchor_of(&link).unwrap_or(name).to_string();
            let qualified = self.scope.join(".");

            let sections = self.parse_comment(item.comment, &qualified);
            let macros = self.macros.overlay(&macro_overrides(&sections));
            let ctx = self.context(&page, &macros);

            let signature = ItemDetail::of_decl(item.decl)
                .signature(name, item.decl.original_type.as_deref());
            let mut body = html::sections(&ctx, &sections);
            let members = self.members(&item.decl.members, &page);
            body.push_str(&html::member_tables(&ctx, &members));

            let block = html::doc_block(Some(&id), name, item.kind, &signature, &body);
            self.append(&page, &qualified, Some(id), block);
            self.visit(&item.decl.members);
        } else {
            debug!(symbol = %self.scope.join("."), "not in symbol tree; skipping");
        }

        self.scope.pop();
    }

    /// Member table of the current scope, with links relative to `page`.
    fn members(&self, decls: &[Decl], page: &str) -> Members {
        let mut members = Members::default();

        for decl in decls {
            if decl.kind == DeclKind::Import && decl.protection.as_deref() == Some("public") {
                let url = self
                    .db
                    .registry()
                    .link(decl.name())
                    .map(|link| relative_link(page, link))
                    .unwrap_or_else(|| NO_LINK.to_string());
                members.public_imports.push(Item {
                    url,
                    name: decl.name().to_string(),
                    summary: String::new(),
                    ty: None,
                    detail: ItemDetail::Plain,
                });
            }
        }

        for child in documented(decls) {
            let name = child.decl.name();
            let url = if child.kind == SymbolKind::Value {
                NO_LINK.to_string()
            } else {
                let mut path = self.scope.clone();
                path.push(name.to_string());
                match self.db.symbol_link(&path) {
                    Some(link) => relative_link(page, &link),
                    None => NO_LINK.to_string(),
                }
            };
            let summary = comment::parse(child.comment)
                .map(|sections| comment::summary(&sections).to_string())
                .unwrap_or_default();
            members.push(
                child.kind,
                Item {
                    url,
                    name: name.to_string(),
                    summary,
                    ty: child.decl.original_type.clone(),
                    detail: ItemDetail::of_decl(child.decl),
                },
            );
        }
        members
    }

    fn parse_comment(&self, raw: &str, symbol: &str) -> Vec<Section> {
        match comment::parse(raw) {
            Ok(sections) => sections,
            Err(e) => {
                warn!(symbol, "skipping comment: {}", DocError::from(e));
                Vec::new()
            }
        }
    }

    fn context<'c>(&'c self, page: &'c str, macros: &'c MacroTable) -> LinkContext<'c> {
        LinkContext {
            resolver: self.db.resolver(),
            scope: &self.scope,
            page,
            macros,
        }
    }

    fn append(&mut self, page: &str, title: &str, anchor: Option<String>, block: String) {
        let entry = self.pages.entry(page.to_string()).or_insert_with(|| Page {
            title: title.to_string(),
            ..Page::default()
        });
        let block = match anchor {
            // Only the first block for an anchor keeps its id.
            Some(anchor) if !entry.anchors.insert(anchor.clone()) => {
                block.replacen(&format!(" id=\"{}\"", render::escape_attr(&anchor)), "", 1)
            }
            _ => block,
        };
        entry.body.push_str(&block);
    }

    /// Listing pages for packages that have no module of their own.
    fn write_packages(&mut self) {
        for path in toc::package_paths(self.db) {
            let Some(link) = self.db.symbol_link(&path) else {
                continue;
            };
            let page = page_of(&link).to_string();
            let name = path.join(".");
            let mut body = format!("<h1>Package {}</h1>\n<ul>\n", render::escape(&name));

            let Some(node) = self.db.tree().lookup(&path) else {
                continue;
            };
            for (child, child_node) in node.children() {
                if !child_node.kind().is_container() {
                    continue;
                }
                let mut child_path = path.clone();
                child_path.push(child.to_string());
                if let Some(target) = self.db.symbol_link(&child_path) {
                    body.push_str(&format!(
                        "<li><a href=\"{}\">{}</a> <span class=\"tag\">{}</span></li>\n",
                        render::escape_attr(&relative_link(&page, &target)),
                        render::escape(child),
                        child_node.kind()
                    ));
                }
            }
            body.push_str("</ul>\n");
            self.append(&page, &name, None, body);
        }
    }

    /// Root index, table of contents and search index; then every page as HTML.
    pub fn finish(mut self, project: &str) -> Result<Vec<(String, String)>> {
        self.write_packages();

        let macros = self.macros;
        let no_scope: Vec<String> = Vec::new();
        let ctx = LinkContext {
            resolver: self.db.resolver(),
            scope: &no_scope,
            page: ROOT_INDEX,
            macros,
        };

        let mut index = format!("<h1>{}</h1>\n<h2>Modules</h2>\n<table class=\"modules\">\n", render::escape(project));
        let registry = self.db.registry();
        for name in registry.sorted_names() {
            let Some(link) = registry.link(name) else {
                continue;
            };
            let summary = self.db.module_summary(name).unwrap_or("");
            index.push_str(&format!(
                "<tr><td><a href=\"{}\">{}</a></td><td>{}</td></tr>\n",
                render::escape_attr(link),
                render::escape(name),
                xref::render_inline(&ctx, summary)
            ));
        }
        index.push_str("</table>\n<h2>Contents</h2>\n");
        index.push_str(&toc::render_toc(self.db, ROOT_INDEX));

        let contents = format!("<h1>Contents</h1>\n{}", toc::render_toc(self.db, TOC_PAGE));

        let mut files: Vec<(String, String)> = Vec::with_capacity(self.pages.len() + 3);
        files.push((ROOT_INDEX.to_string(), html::page(project, "", &index)));
        files.push((TOC_PAGE.to_string(), html::page("Contents", "", &contents)));

        let entries = search::build_index(self.db);
        let json = search::to_json(&entries).map_err(|source| DocError::Json {
            path: SEARCH_INDEX.into(),
            source,
        })?;
        files.push((SEARCH_INDEX.to_string(), json));

        for (path, page) in self.pages {
            if path == ROOT_INDEX || path == TOC_PAGE {
                warn!(page = %path, "symbol page collides with a root page; skipping");
                continue;
            }
            let shell = html::page(&page.title, &html::root_prefix(&path), &page.body);
            files.push((path, shell));
        }
        Ok(files)
    }
}

/// Render every gathered module and write the result under `out_dir`.
///
/// Returns the number of files written.
pub fn write_all(
    db: &SymbolDatabase,
    macros: &MacroTable,
    modules: &[Gathered<'_>],
    project: &str,
    out_dir: &Path,
) -> Result<usize> {
    let mut writer = DocWriter::new(db, macros);
    for module in modules {
        writer.write_module(module.name, module.decl);
    }

    let files = writer.finish(project)?;
    for (rel, contents) in &files {
        let path = out_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DocError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, contents).map_err(|source| DocError::Io {
            path: path.clone(),
            source,
        })?;
    }
    info!(files = files.len(), out = %out_dir.display(), "documentation written");
    Ok(files.len())
}

fn macro_overrides(sections: &[Section]) -> Vec<(String, String)> {
    sections
        .iter()
        .filter(|s| s.name.eq_ignore_ascii_case("macros"))
        .flat_map(|s| s.mapping.iter().cloned())
        .collect()
}
