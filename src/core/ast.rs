//! Parse-phase syntax state.

use std::path::PathBuf;

/// A parsed TypeScript source file, retained only while the extractor runs.
#[derive(Clone, Debug)]
pub struct TypeScriptAst {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub path: PathBuf,
}

/// Handle tying an extracted record back to its declaration node.
///
/// Scoped to the parse phase of one run: released before the run finishes and
/// excluded from every serialized artifact.
#[derive(Clone)]
pub struct SyntaxHandle {
    pub tree: tree_sitter::Tree,
    pub node_id: usize,
}

impl SyntaxHandle {
    pub fn new(tree: tree_sitter::Tree, node_id: usize) -> Self {
        Self { tree, node_id }
    }
}

impl std::fmt::Debug for SyntaxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxHandle")
            .field("node_id", &self.node_id)
            .finish_non_exhaustive()
    }
}
