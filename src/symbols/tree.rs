//! Symbol tree: one node per documented symbol, children keyed by name.
//!
//! The tree only grows. Nodes are created while modules are gathered and are
//! never removed or moved afterwards.

use indexmap::IndexMap;

use super::kind::SymbolKind;

/// Data carried only by module nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Raw first section of the module comment.
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct SymbolNode {
    kind: SymbolKind,
    children: IndexMap<String, SymbolNode>,
    module: Option<ModuleInfo>,
}

/// Result of walking a path as far as the tree allows.
#[derive(Debug, Clone, Copy)]
pub struct Walk<'a> {
    /// Deepest node reached.
    pub node: &'a SymbolNode,
    /// Number of path components consumed to reach `node`.
    pub matched: usize,
}

impl SymbolNode {
    pub fn new(kind: SymbolKind) -> Self {
        Self {
            kind,
            children: IndexMap::new(),
            module: None,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: SymbolKind) {
        self.kind = kind;
    }

    /// Module metadata; only present while the node is a module.
    pub fn module_info(&self) -> Option<&ModuleInfo> {
        match self.kind {
            SymbolKind::Module => self.module.as_ref(),
            _ => None,
        }
    }

    pub fn set_module_info(&mut self, info: ModuleInfo) {
        self.kind = SymbolKind::Module;
        self.module = Some(info);
    }

    pub fn child(&self, name: &str) -> Option<&SymbolNode> {
        self.children.get(name)
    }

    /// The child together with the tree's own copy of its name.
    pub fn child_entry(&self, name: &str) -> Option<(&str, &SymbolNode)> {
        self.children
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &SymbolNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Walk `path` below this node. Any missing component yields `None`.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&SymbolNode> {
        let walk = self.iterate(path);
        (walk.matched == path.len()).then_some(walk.node)
    }

    /// Like [`SymbolNode::find`], but never steps into a package or module.
    ///
    /// Submodules hang off their parent module's node; this keeps a lookup
    /// inside one module's declarations.
    pub fn find_declared<S: AsRef<str>>(&self, path: &[S]) -> Option<&SymbolNode> {
        let mut node = self;
        for name in path {
            node = node
                .children
                .get(name.as_ref())
                .filter(|child| !child.kind.is_container())?;
        }
        Some(node)
    }

    /// Walk `path` below this node, stopping at the deepest node that exists.
    pub fn iterate<S: AsRef<str>>(&self, path: &[S]) -> Walk<'_> {
        let mut node = self;
        let mut matched = 0;
        for name in path {
            match node.children.get(name.as_ref()) {
                Some(next) => {
                    node = next;
                    matched += 1;
                }
                None => break,
            }
        }
        Walk { node, matched }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolTree {
    root: SymbolNode,
}

impl Default for SymbolTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTree {
    pub fn new() -> Self {
        Self {
            root: SymbolNode::new(SymbolKind::Package),
        }
    }

    pub fn root(&self) -> &SymbolNode {
        &self.root
    }

    /// Insert `path`, creating missing intermediate nodes as packages.
    ///
    /// The final node takes `kind` whether it is new or already existed, so a
    /// package stub created on the way to a deeper symbol is upgraded once the
    /// stub's own declaration is seen. An empty path returns the root.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], kind: SymbolKind) -> &mut SymbolNode {
        let Some((last, parents)) = path.split_last() else {
            return &mut self.root;
        };

        let mut node = &mut self.root;
        for name in parents {
            node = node
                .children
                .entry(name.as_ref().to_string())
                .or_insert_with(|| SymbolNode::new(SymbolKind::Package));
        }

        let leaf = node
            .children
            .entry(last.as_ref().to_string())
            .or_insert_with(|| SymbolNode::new(kind));
        leaf.set_kind(kind);
        leaf
    }

    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&SymbolNode> {
        self.root.find(path)
    }

    /// Like [`SymbolTree::lookup`] but starting from `start` and reporting partial progress.
    pub fn iterate<'a, S: AsRef<str>>(&self, start: &'a SymbolNode, path: &[S]) -> Walk<'a> {
        start.iterate(path)
    }
}
