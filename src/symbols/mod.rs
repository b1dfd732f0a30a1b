//! Symbol database: everything known about every documented symbol in a run.
//!
//! Built in two phases. [`DatabaseBuilder`] is mutated while each module is
//! gathered; [`DatabaseBuilder::finish`] then freezes it into a
//! [`SymbolDatabase`] that the writer only ever reads. Because the frozen value
//! has no mutating methods, references to modules that have not been written
//! yet are always safe to resolve.

pub mod gather;
pub mod kind;
pub mod link;
pub mod members;
pub mod registry;
pub mod resolve;
pub mod tree;

pub use kind::SymbolKind;
pub use link::Layout;
pub use members::{Item, ItemDetail, Members};
pub use registry::ModuleRegistry;
pub use resolve::Resolver;
pub use tree::{ModuleInfo, SymbolNode, SymbolTree};

use std::path::Path;

/// Phase-one handle: the tree and registry while modules are gathered.
#[derive(Debug, Default)]
pub struct DatabaseBuilder {
    tree: SymbolTree,
    registry: ModuleRegistry,
    layout: Layout,
}

impl DatabaseBuilder {
    pub fn new(layout: Layout) -> Self {
        Self {
            tree: SymbolTree::new(),
            registry: ModuleRegistry::new(),
            layout,
        }
    }

    pub fn tree(&self) -> &SymbolTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SymbolTree {
        &mut self.tree
    }

    /// Create (or upgrade) the module node and record it in the registry.
    pub fn add_module(&mut self, name: &str, file: &Path, summary: String) {
        let parts: Vec<&str> = name.split('.').collect();
        self.tree
            .insert(&parts, SymbolKind::Module)
            .set_module_info(ModuleInfo { summary });

        let segments = link::decode(&self.tree, &parts, &[]).unwrap_or_default();
        let module_link = self.layout.link_for(&segments);
        self.registry.register(name, file, module_link);
    }

    pub fn finish(self) -> SymbolDatabase {
        SymbolDatabase {
            tree: self.tree,
            registry: self.registry,
            layout: self.layout,
        }
    }
}

/// Phase-two handle: frozen, read-only, freely shared.
#[derive(Debug)]
pub struct SymbolDatabase {
    tree: SymbolTree,
    registry: ModuleRegistry,
    layout: Layout,
}

impl SymbolDatabase {
    pub fn tree(&self) -> &SymbolTree {
        &self.tree
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }

    /// One-line summary of a gathered module, for module listings.
    pub fn module_summary(&self, module: &str) -> Option<&str> {
        let parts: Vec<&str> = module.split('.').collect();
        self.tree
            .lookup(&parts)?
            .module_info()
            .map(|info| info.summary.as_str())
    }

    /// Root-relative link for a fully qualified symbol path.
    pub fn symbol_link<S: AsRef<str>>(&self, path: &[S]) -> Option<String> {
        let segments = link::decode::<S>(&self.tree, path, &[])?;
        Some(self.layout.link_for(&segments))
    }
}
