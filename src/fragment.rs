//! Parsed text as a tree of typed fragments.
//!
//! Nodes live in an arena and refer to each other by [`FragmentId`]. The
//! top-level sequence of a tree is addressed with `None` wherever an
//! operation takes a parent, any other sequence is the child list of the
//! given node.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(usize);

/// Tag identifying a fragment variant, used to key formatters and renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FragmentType {
    Unparsed,
    PlainText,
    Link,
}

impl fmt::Display for FragmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FragmentType::Unparsed => "Unparsed",
            FragmentType::PlainText => "PlainText",
            FragmentType::Link => "Link",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FragmentKind {
    /// Raw text no formatter has looked at yet.
    Unparsed(String),
    /// Literal display text. The only kind that contributes characters.
    PlainText(String),
    /// A link whose display text is the concatenation of its children.
    Link { url: String },
}

impl FragmentKind {
    pub fn fragment_type(&self) -> FragmentType {
        match self {
            FragmentKind::Unparsed(_) => FragmentType::Unparsed,
            FragmentKind::PlainText(_) => FragmentType::PlainText,
            FragmentKind::Link { .. } => FragmentType::Link,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, FragmentKind::Link { .. })
    }

    /// Copy of this kind without any text content. Composite attributes are
    /// kept, leaves come back empty.
    fn shell(&self) -> FragmentKind {
        match self {
            FragmentKind::Unparsed(_) => FragmentKind::Unparsed(String::new()),
            FragmentKind::PlainText(_) => FragmentKind::PlainText(String::new()),
            FragmentKind::Link { url } => FragmentKind::Link { url: url.clone() },
        }
    }
}

/// Owned form of a fragment and its descendants.
///
/// Formatters produce these, and [`FragmentTree::snapshot`] turns arena
/// content back into them for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub children: Vec<Fragment>,
}

impl Fragment {
    pub fn new(kind: FragmentKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn unparsed(text: impl Into<String>) -> Self {
        Self::new(FragmentKind::Unparsed(text.into()))
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(FragmentKind::PlainText(text.into()))
    }

    pub fn link(url: impl Into<String>, children: Vec<Fragment>) -> Self {
        Self {
            kind: FragmentKind::Link { url: url.into() },
            children,
        }
    }

    pub fn with_children(mut self, children: Vec<Fragment>) -> Self {
        self.children = children;
        self
    }

    /// Concatenated `PlainText` content of this fragment and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let FragmentKind::PlainText(text) = &self.kind {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    kind: FragmentKind,
    children: Vec<FragmentId>,
}

/// Arena holding one parsed text.
///
/// Nodes detached by a splice stay allocated until the tree is dropped; they
/// are no longer reachable from the top-level sequence.
#[derive(Clone, Debug, Default)]
pub struct FragmentTree {
    nodes: Vec<Node>,
    roots: Vec<FragmentId>,
}

impl FragmentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        let mut tree = Self::new();
        for fragment in fragments {
            let id = tree.insert(fragment);
            tree.roots.push(id);
        }
        tree
    }

    /// Allocates `fragment` and its descendants without attaching it anywhere.
    pub fn insert(&mut self, fragment: Fragment) -> FragmentId {
        let children = fragment
            .children
            .into_iter()
            .map(|child| self.insert(child))
            .collect();
        self.alloc(fragment.kind, children)
    }

    fn alloc(&mut self, kind: FragmentKind, children: Vec<FragmentId>) -> FragmentId {
        let id = FragmentId(self.nodes.len());
        self.nodes.push(Node { kind, children });
        id
    }

    pub fn roots(&self) -> &[FragmentId] {
        &self.roots
    }

    pub fn kind(&self, id: FragmentId) -> &FragmentKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: FragmentId) -> &mut FragmentKind {
        &mut self.nodes[id.0].kind
    }

    pub fn children(&self, id: FragmentId) -> &[FragmentId] {
        &self.nodes[id.0].children
    }

    pub fn sequence(&self, parent: Option<FragmentId>) -> &[FragmentId] {
        match parent {
            Some(id) => &self.nodes[id.0].children,
            None => &self.roots,
        }
    }

    pub fn sequence_mut(&mut self, parent: Option<FragmentId>) -> &mut Vec<FragmentId> {
        match parent {
            Some(id) => &mut self.nodes[id.0].children,
            None => &mut self.roots,
        }
    }

    /// Linearized display text of `id`.
    pub fn text(&self, id: FragmentId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    /// Linearized display text of a whole sequence.
    pub fn sequence_text(&self, parent: Option<FragmentId>) -> String {
        let mut out = String::new();
        for id in self.sequence(parent) {
            self.collect_text(*id, &mut out);
        }
        out
    }

    fn collect_text(&self, id: FragmentId, out: &mut String) {
        let node = &self.nodes[id.0];
        if let FragmentKind::PlainText(text) = &node.kind {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// Number of display characters below `id`.
    pub fn char_len(&self, id: FragmentId) -> usize {
        let node = &self.nodes[id.0];
        let own = match &node.kind {
            FragmentKind::PlainText(text) => text.chars().count(),
            _ => 0,
        };
        own + node
            .children
            .iter()
            .map(|child| self.char_len(*child))
            .sum::<usize>()
    }

    /// Allocates a node of the same type and attributes as `id`, with no
    /// text and no children.
    pub fn shell_clone(&mut self, id: FragmentId) -> FragmentId {
        let kind = self.nodes[id.0].kind.shell();
        self.alloc(kind, Vec::new())
    }

    pub fn snapshot(&self, parent: Option<FragmentId>) -> Vec<Fragment> {
        self.sequence(parent)
            .iter()
            .map(|id| self.snapshot_node(*id))
            .collect()
    }

    pub fn snapshot_node(&self, id: FragmentId) -> Fragment {
        let node = &self.nodes[id.0];
        Fragment {
            kind: node.kind.clone(),
            children: node
                .children
                .iter()
                .map(|child| self.snapshot_node(*child))
                .collect(),
        }
    }

    /// Whether any node reachable from the top-level sequence is still unparsed.
    pub fn contains_unparsed(&self) -> bool {
        self.roots.iter().any(|id| self.subtree_has_unparsed(*id))
    }

    fn subtree_has_unparsed(&self, id: FragmentId) -> bool {
        let node = &self.nodes[id.0];
        matches!(node.kind, FragmentKind::Unparsed(_))
            || node
                .children
                .iter()
                .any(|child| self.subtree_has_unparsed(*child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FragmentTree {
        FragmentTree::from_fragments(vec![
            Fragment::plain("see "),
            Fragment::link("https://example.com/x", vec![Fragment::plain("docs")]),
            Fragment::plain(" now"),
        ])
    }

    #[test]
    fn linearized_text_skips_non_plain_content() {
        let tree = sample_tree();
        assert_eq!(tree.sequence_text(None), "see docs now");
        assert_eq!(tree.text(tree.roots()[1]), "docs");
        assert_eq!(tree.char_len(tree.roots()[1]), 4);
    }

    #[test]
    fn snapshot_reproduces_inserted_fragments() {
        let tree = sample_tree();
        let snapshot = tree.snapshot(None);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot[1],
            Fragment::link("https://example.com/x", vec![Fragment::plain("docs")])
        );
    }

    #[test]
    fn shell_clone_keeps_url_but_not_children() {
        let mut tree = sample_tree();
        let link = tree.roots()[1];
        let shell = tree.shell_clone(link);
        assert_eq!(
            tree.kind(shell),
            &FragmentKind::Link {
                url: "https://example.com/x".to_string()
            }
        );
        assert!(tree.children(shell).is_empty());
        assert_eq!(tree.children(link).len(), 1);
    }

    #[test]
    fn unparsed_nodes_are_found_below_composites() {
        let tree = FragmentTree::from_fragments(vec![Fragment::link(
            "https://a.b",
            vec![Fragment::unparsed("label")],
        )]);
        assert!(tree.contains_unparsed());
        assert!(!sample_tree().contains_unparsed());
    }

    #[test]
    fn unparsed_text_is_not_display_text() {
        let fragment = Fragment::unparsed("raw").with_children(vec![Fragment::plain("x")]);
        assert_eq!(fragment.text(), "x");
    }
}
