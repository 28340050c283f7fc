//! Functional hierarchy trees.
//!
//! A hierarchy is a forest of nodes, e.g. KEGG pathway -> module -> ortholog. Only leaves
//! correspond to directly measured entities; internal nodes are populated by aggregating their
//! leaf descendants.
//!
//! Trees are supplied as JSON. A node object carries an `entry` and optionally a `name` and
//! `children`. The presence of `children`, even as an empty list, makes a node internal. Other
//! attributes (such as `layer`) are ignored.

use std::io::Read;

use serde::Deserialize;

use crate::error::FuncTreeError;

/// A node of a functional hierarchy
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "RawNode")]
pub enum HierarchyNode {
    /// A directly measured entity
    Leaf { entry: String, name: Option<String> },
    /// A functional category
    Internal {
        entry: String,
        name: Option<String>,
        children: Vec<HierarchyNode>,
    },
}

/// Wire representation of a node.
#[derive(Deserialize)]
struct RawNode {
    entry: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    children: Option<Vec<HierarchyNode>>,
}

impl From<RawNode> for HierarchyNode {
    fn from(raw: RawNode) -> Self {
        match raw.children {
            Some(children) => HierarchyNode::Internal {
                entry: raw.entry,
                name: raw.name,
                children,
            },
            None => HierarchyNode::Leaf {
                entry: raw.entry,
                name: raw.name,
            },
        }
    }
}

impl HierarchyNode {
    /// Return a new leaf node.
    pub fn leaf(entry: &str) -> Self {
        HierarchyNode::Leaf {
            entry: entry.to_string(),
            name: None,
        }
    }

    /// Return a new internal node.
    pub fn internal(entry: &str, children: Vec<HierarchyNode>) -> Self {
        HierarchyNode::Internal {
            entry: entry.to_string(),
            name: None,
            children,
        }
    }

    /// Identifier of the node.
    pub fn entry(&self) -> &str {
        match self {
            HierarchyNode::Leaf { entry, .. } | HierarchyNode::Internal { entry, .. } => entry,
        }
    }

    /// Human readable name of the node, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            HierarchyNode::Leaf { name, .. } | HierarchyNode::Internal { name, .. } => {
                name.as_deref()
            }
        }
    }

    /// Direct children of the node. Empty for leaves.
    pub fn children(&self) -> &[HierarchyNode] {
        match self {
            HierarchyNode::Leaf { .. } => &[],
            HierarchyNode::Internal { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HierarchyNode::Leaf { .. })
    }

    /// Placeholder nodes (e.g. `*Module undefined*`) never carry values.
    pub fn is_placeholder(&self) -> bool {
        self.entry().starts_with('*')
    }

    /// Iterate over this node and all of its descendants in pre-order.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Iterate over the leaf descendants of this node, at any depth.
    ///
    /// The leaf set of a leaf is the leaf itself.
    pub fn leaves(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.iter().filter(|node| node.is_leaf())
    }

    /// Number of levels below this node. Zero for leaves and childless internal nodes.
    pub fn depth(&self) -> usize {
        self.children()
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Pre-order traversal over a subtree.
pub struct Preorder<'a> {
    stack: Vec<&'a HierarchyNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a HierarchyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so that children are visited in order.
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

/// A stored tree document, as served by the tree provider.
#[derive(Deserialize)]
struct TreeDocument {
    tree: HierarchyNode,
}

/// The accepted shapes of a hierarchy JSON document.
#[derive(Deserialize)]
#[serde(untagged)]
enum HierarchyDocument {
    Node(HierarchyNode),
    Nodes(Vec<HierarchyNode>),
    Document(TreeDocument),
    Documents(Vec<TreeDocument>),
}

/// A forest of hierarchy nodes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hierarchy {
    roots: Vec<HierarchyNode>,
}

impl Hierarchy {
    /// Return a new Hierarchy with the given roots.
    pub fn new(roots: Vec<HierarchyNode>) -> Self {
        Hierarchy { roots }
    }

    /// Parse a hierarchy from JSON.
    ///
    /// Accepts a single root node, a list of root nodes, or a tree document
    /// (`{"tree": <root>, ...}`) optionally wrapped in a list.
    pub fn from_slice(data: &[u8]) -> Result<Self, FuncTreeError> {
        let document: HierarchyDocument = serde_json::from_slice(data)?;
        Ok(document.into())
    }

    /// Read and parse a hierarchy from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FuncTreeError> {
        let document: HierarchyDocument = serde_json::from_reader(reader)?;
        Ok(document.into())
    }

    pub fn roots(&self) -> &[HierarchyNode] {
        &self.roots
    }

    /// Expand the forest into a pre-order sequence of all of its nodes.
    pub fn flatten(&self) -> Vec<&HierarchyNode> {
        self.roots.iter().flat_map(HierarchyNode::iter).collect()
    }

    /// Find the first node in pre-order with the given entry.
    pub fn find(&self, entry: &str) -> Option<&HierarchyNode> {
        self.roots
            .iter()
            .flat_map(HierarchyNode::iter)
            .find(|node| node.entry() == entry)
    }

    /// Number of levels in the deepest tree of the forest.
    pub fn depth(&self) -> usize {
        self.roots.iter().map(HierarchyNode::depth).max().unwrap_or(0)
    }
}

impl From<HierarchyDocument> for Hierarchy {
    fn from(document: HierarchyDocument) -> Self {
        let roots = match document {
            HierarchyDocument::Node(node) => vec![node],
            HierarchyDocument::Nodes(nodes) => nodes,
            HierarchyDocument::Document(document) => vec![document.tree],
            HierarchyDocument::Documents(documents) => {
                documents.into_iter().map(|document| document.tree).collect()
            }
        };
        Hierarchy::new(roots)
    }
}
