//! Declaration model handed to us by the D front-end.
//!
//! The front-end is the compiler itself: `dmd -X -Xf=out.json` writes one JSON
//! array of modules. Only the fields the documentation pipeline reads are
//! modelled; everything else in the file is ignored by serde.

use serde::Deserialize;

/// One module as emitted by the front-end.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleDecl {
    /// Dotted module name. Absent when the file has no `module` declaration.
    #[serde(default)]
    pub name: Option<String>,
    /// Source file the module was compiled from.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub members: Vec<Decl>,
}

impl ModuleDecl {
    pub fn name_parts(&self) -> Option<Vec<String>> {
        let name = self.name.as_deref()?;
        if name.is_empty() {
            return None;
        }
        Some(name.split('.').map(str::to_string).collect())
    }

    pub fn comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

/// A declaration inside a module or inside another declaration's body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Decl {
    /// Missing for anonymous enums and some unnamed blocks.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: DeclKind,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub members: Vec<Decl>,
    #[serde(default, rename = "storageClass")]
    pub storage_class: Vec<String>,
    /// Declared type as written in source. Absent for type-inferred declarations.
    #[serde(default, rename = "originalType", alias = "type")]
    pub original_type: Option<String>,
    #[serde(default)]
    pub protection: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub parameters: Vec<Param>,
    /// Base class of a class or base type of an enum.
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

impl Decl {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn comment(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    pub fn is_documented(&self) -> bool {
        !self.comment().trim().is_empty()
    }

    pub fn is_ditto(&self) -> bool {
        self.comment().trim().eq_ignore_ascii_case("ditto")
    }

    pub fn is_type_inferred(&self) -> bool {
        self.original_type.is_none()
    }

    pub fn has_storage_class(&self, class: &str) -> bool {
        self.storage_class.iter().any(|s| s == class)
    }

    /// Anonymous enums spill their members into the enclosing scope.
    pub fn is_anonymous_enum(&self) -> bool {
        self.kind == DeclKind::Enum && self.name.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub default: Option<String>,
}

/// Declaration kinds the front-end reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum DeclKind {
    #[serde(rename = "module")]
    Module,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "struct")]
    Struct,
    #[serde(rename = "union")]
    Union,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "enum member")]
    EnumMember,
    #[serde(rename = "template")]
    Template,
    #[serde(
        rename = "function",
        alias = "constructor",
        alias = "destructor",
        alias = "static constructor",
        alias = "static destructor",
        alias = "shared static constructor",
        alias = "shared static destructor"
    )]
    Function,
    #[serde(rename = "variable")]
    Variable,
    #[serde(rename = "alias")]
    Alias,
    #[serde(rename = "import", alias = "static import")]
    Import,
    #[default]
    #[serde(other)]
    Other,
}

/// Parse the front-end's JSON text into modules.
pub fn parse_modules(text: &str) -> serde_json::Result<Vec<ModuleDecl>> {
    serde_json::from_str(text)
}
