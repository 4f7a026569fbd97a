//! Folder tree arena and its text rendering.

use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

/// Index of a node inside a [`FolderTree`].
pub type NodeId = usize;

/// One directory of the tree.
#[derive(Debug, Clone, Default)]
pub struct FolderTreeNode {
    pub name: String,
    pub dirs: BTreeMap<String, NodeId>,
    pub files: Vec<String>,
}

/// Directory nodes stored in an arena and addressed by their path relative to
/// the root. The root is node `0` and has the empty relative path.
#[derive(Debug, Clone)]
pub struct FolderTree {
    nodes: Vec<FolderTreeNode>,
    index: HashMap<PathBuf, NodeId>,
}

impl Default for FolderTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderTree {
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(PathBuf::new(), 0);
        Self {
            nodes: vec![FolderTreeNode::default()],
            index,
        }
    }

    pub fn root(&self) -> &FolderTreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &FolderTreeNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1 && self.nodes[0].files.is_empty()
    }

    /// Looks up the node for a relative directory path.
    pub fn get(&self, rel: &Path) -> Option<&FolderTreeNode> {
        self.index.get(rel).map(|&id| &self.nodes[id])
    }

    /// Returns the node for `rel`, creating it and any missing ancestors.
    /// An existing node is reused, never replaced.
    pub fn ensure_dir(&mut self, rel: &Path) -> NodeId {
        if let Some(&id) = self.index.get(rel) {
            return id;
        }
        let mut current = 0;
        let mut walked = PathBuf::new();
        for component in rel.components() {
            let Component::Normal(part) = component else {
                continue;
            };
            walked.push(part);
            current = match self.index.get(&walked) {
                Some(&id) => id,
                None => {
                    let name = part.to_string_lossy().into_owned();
                    let id = self.nodes.len();
                    self.nodes.push(FolderTreeNode {
                        name: name.clone(),
                        ..Default::default()
                    });
                    self.nodes[current].dirs.insert(name, id);
                    self.index.insert(walked.clone(), id);
                    id
                }
            };
        }
        current
    }

    /// Adds a file name to the directory at `rel`. Returns false when the
    /// directory already lists it.
    pub fn add_file(&mut self, rel: &Path, name: &str) -> bool {
        let id = self.ensure_dir(rel);
        let files = &mut self.nodes[id].files;
        if files.iter().any(|f| f == name) {
            return false;
        }
        files.push(name.to_string());
        true
    }
}

/// Renders the tree: `-<root_name>` on the first line, then each level
/// indented by two spaces, subdirectories (sorted) before files (sorted).
pub fn render_tree(tree: &FolderTree, root_name: &str) -> String {
    let mut out = format!("-{}\n", root_name);
    render_node(tree, tree.root(), 1, &mut out);
    out
}

fn render_node(tree: &FolderTree, node: &FolderTreeNode, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    for (name, &child) in &node.dirs {
        out.push_str(&indent);
        out.push_str("- ");
        out.push_str(name);
        out.push('\n');
        render_node(tree, tree.node(child), level + 1, out);
    }
    let mut files: Vec<&String> = node.files.iter().collect();
    files.sort();
    for name in files {
        out.push_str(&indent);
        out.push_str("- ");
        out.push_str(name);
        out.push('\n');
    }
}
