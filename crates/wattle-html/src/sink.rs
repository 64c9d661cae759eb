//! The node-tree interface the tree builder writes through.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! The tree builder never touches nodes directly. It asks a [`TreeSink`] to
//! create nodes, link them, and answer a handful of read queries. Handles are
//! plain copyable indices so the stack of open elements and the list of
//! active formatting elements can both refer to a node without owning it.

use core::fmt::Debug;

use wattle_dom::{
    Attribute, DoctypeData, DomTree, Namespace, NodeId, NodeType, QuirksMode,
};

/// The "build a node" capability used by the tree builder.
pub trait TreeSink {
    /// Identifies a node owned by the sink.
    type Handle: Copy + Eq + Debug;

    /// The Document node.
    fn document(&self) -> Self::Handle;

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Create a detached element. An HTML `template` element must come with
    /// its template contents fragment.
    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attrs: Vec<Attribute>,
    ) -> Self::Handle;

    /// Create a detached comment.
    fn create_comment(&mut self, data: &str) -> Self::Handle;

    /// Create a detached DocumentType node.
    fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> Self::Handle;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle);

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data." Otherwise create
    /// a new Text node as the last child of `parent`.
    fn append_text(&mut self, parent: Self::Handle, text: &str);

    /// Insert `child` immediately before `sibling`, in `sibling`'s parent.
    fn insert_before(&mut self, sibling: Self::Handle, child: Self::Handle);

    /// Like [`TreeSink::append_text`], but at the position before `sibling`.
    fn insert_text_before(&mut self, sibling: Self::Handle, text: &str);

    /// Detach `node` from its parent, if it has one.
    fn remove(&mut self, node: Self::Handle);

    /// Move all children of `from` to the end of `to`, keeping their order.
    fn reparent_children(&mut self, from: Self::Handle, to: Self::Handle);

    /// "For each attribute on the token, check to see if the attribute is
    /// already present on the element. If it is not, add the attribute and its
    /// corresponding value to that element."
    fn add_attrs_if_missing(&mut self, element: Self::Handle, attrs: Vec<Attribute>);

    /// Record the document's quirks mode.
    fn set_quirks_mode(&mut self, mode: QuirksMode);

    /// Namespace and local name of an element, or `None` for other nodes.
    fn element_name(&self, node: Self::Handle) -> Option<(Namespace, &str)>;

    /// The attributes of an element. Empty for other nodes.
    fn attributes(&self, node: Self::Handle) -> &[Attribute];

    /// The parent of a node, if it is attached.
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// The children of a node, in order.
    fn children(&self, node: Self::Handle) -> Vec<Self::Handle>;

    /// The template contents fragment of an HTML `template` element.
    fn template_contents(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Node identity.
    fn is_same_node(&self, a: Self::Handle, b: Self::Handle) -> bool {
        a == b
    }
}

impl TreeSink for DomTree {
    type Handle = NodeId;

    fn document(&self) -> NodeId {
        self.root()
    }

    fn create_element(&mut self, name: &str, namespace: Namespace, attrs: Vec<Attribute>) -> NodeId {
        self.alloc_element(name, namespace, attrs)
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Comment(data.to_string()))
    }

    fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(NodeType::Doctype(DoctypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        Self::append_child(self, parent, child);
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.last_child(parent)
            && let Some(node) = self.get_mut(last)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push_str(text);
            return;
        }
        let node = self.alloc(NodeType::Text(text.to_string()));
        Self::append_child(self, parent, node);
    }

    fn insert_before(&mut self, sibling: NodeId, child: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        Self::insert_before(self, parent, child, sibling);
    }

    fn insert_text_before(&mut self, sibling: NodeId, text: &str) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        if let Some(previous) = self.prev_sibling(sibling)
            && let Some(node) = self.get_mut(previous)
            && let NodeType::Text(data) = &mut node.node_type
        {
            data.push_str(text);
            return;
        }
        let node = self.alloc(NodeType::Text(text.to_string()));
        Self::insert_before(self, parent, node, sibling);
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        self.move_children(from, to);
    }

    fn add_attrs_if_missing(&mut self, element: NodeId, attrs: Vec<Attribute>) {
        let Some(data) = self.as_element_mut(element) else {
            return;
        };
        for attr in attrs {
            if !data.attrs.iter().any(|existing| existing.name == attr.name) {
                data.attrs.push(attr);
            }
        }
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        Self::set_quirks_mode(self, mode);
    }

    fn element_name(&self, node: NodeId) -> Option<(Namespace, &str)> {
        self.as_element(node)
            .map(|data| (data.namespace, data.tag_name.as_str()))
    }

    fn attributes(&self, node: NodeId) -> &[Attribute] {
        self.as_element(node).map_or(&[], |data| data.attrs.as_slice())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Self::parent(self, node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        Self::children(self, node).to_vec()
    }

    fn template_contents(&self, node: NodeId) -> Option<NodeId> {
        self.as_element(node).and_then(|data| data.template_contents)
    }
}

/// Print a DOM tree for debugging.
///
/// Elements outside the HTML namespace are prefixed with their namespace's
/// short name (`svg path`), and template contents are shown under a
/// `content` line.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut out = String::new();
    write_tree(tree, id, indent, &mut out);
    print!("{out}");
}

/// Render the outline [`print_tree`] prints.
#[must_use]
pub fn tree_to_string(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    use core::fmt::Write;

    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}#document"),
        NodeType::DocumentFragment => writeln!(out, "{prefix}content"),
        NodeType::Doctype(data) => {
            if data.public_id.is_empty() && data.system_id.is_empty() {
                writeln!(out, "{prefix}<!DOCTYPE {}>", data.name)
            } else {
                writeln!(
                    out,
                    "{prefix}<!DOCTYPE {} \"{}\" \"{}\">",
                    data.name, data.public_id, data.system_id
                )
            }
        }
        NodeType::Element(data) => {
            let name = match data.namespace {
                Namespace::Html => data.tag_name.clone(),
                other => format!("{} {}", other.short_name(), data.tag_name),
            };
            let _ = writeln!(out, "{prefix}<{name}>");
            let mut attrs: Vec<&Attribute> = data.attrs.iter().collect();
            attrs.sort_by_key(|a| a.qualified_name());
            for attr in attrs {
                let _ = writeln!(out, "{prefix}  {}=\"{}\"", attr.qualified_name(), attr.value);
            }
            if let Some(contents) = data.template_contents {
                write_tree(tree, contents, indent + 1, out);
            }
            Ok(())
        }
        NodeType::Text(data) => writeln!(out, "{prefix}\"{data}\""),
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child in tree.children(id) {
        write_tree(tree, child, indent + 1, out);
    }
}
