//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)

use wattle_dom::Namespace;

use crate::sink::TreeSink;

/// Which "has an element in ... scope" variant to run.
///
/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    General,
    /// "has an element in list item scope"
    ListItem,
    /// "has an element in button scope"
    Button,
    /// "has an element in table scope"
    Table,
    /// "has an element in select scope"
    Select,
}

impl Scope {
    /// Whether an element with this namespace and name ends the scope walk.
    ///
    /// Select scope is the odd one out: "all element types except the
    /// following: optgroup in the HTML namespace, option in the HTML namespace".
    #[must_use]
    pub fn is_boundary(self, namespace: Namespace, name: &str) -> bool {
        match self {
            Self::General => is_default_scope_boundary(namespace, name),
            Self::ListItem => {
                is_default_scope_boundary(namespace, name)
                    || (namespace == Namespace::Html && matches!(name, "ol" | "ul"))
            }
            Self::Button => {
                is_default_scope_boundary(namespace, name)
                    || (namespace == Namespace::Html && name == "button")
            }
            Self::Table => {
                namespace == Namespace::Html && matches!(name, "html" | "table" | "template")
            }
            Self::Select => {
                !(namespace == Namespace::Html && matches!(name, "optgroup" | "option"))
            }
        }
    }
}

/// "The stack of open elements is said to have a particular element in scope
/// when it has that element in the specific scope consisting of the following
/// element types: applet, caption, html, table, td, th, marquee, object,
/// template, MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, MathML
/// annotation-xml, SVG foreignObject, SVG desc, SVG title"
fn is_default_scope_boundary(namespace: Namespace, name: &str) -> bool {
    match namespace {
        Namespace::Html => matches!(
            name,
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object" | "template"
        ),
        Namespace::MathMl => matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
///
/// "dd, dt, li, optgroup, option, p, rb, rp, rt, rtc"
pub const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
///
/// The implied end tags plus the table structure elements.
pub const THOROUGH_IMPLIED_END_TAGS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
///
/// "Initially, the stack of open elements is empty. The stack grows downwards;
/// the topmost node on the stack is the first one added to the stack, and the
/// bottommost node of the stack is the most recently added node in the stack."
///
/// Index 0 is the topmost node (the `html` element once there is one); the
/// end of the vector is the current node. Element names are looked up in the
/// sink on every query, never cached.
#[derive(Debug, Clone)]
pub struct StackOfOpenElements<H> {
    elements: Vec<H>,
}

impl<H> Default for StackOfOpenElements<H> {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> StackOfOpenElements<H> {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an element. It becomes the current node.
    pub fn push(&mut self, element: H) {
        self.elements.push(element);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<H> {
        self.elements.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<H> {
        self.elements.last().copied()
    }

    /// The topmost node, the `html` element once it has been inserted.
    #[must_use]
    pub fn first(&self) -> Option<H> {
        self.elements.first().copied()
    }

    /// The entry at `index`, counted from the top.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<H> {
        self.elements.get(index).copied()
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The entries from top to bottom.
    #[must_use]
    pub fn as_slice(&self) -> &[H] {
        &self.elements
    }

    /// Whether `element` is anywhere on the stack.
    #[must_use]
    pub fn contains(&self, element: H) -> bool {
        self.elements.contains(&element)
    }

    /// Index of `element`, counted from the top.
    #[must_use]
    pub fn position(&self, element: H) -> Option<usize> {
        self.elements.iter().rposition(|&e| e == element)
    }

    /// Remove `element` wherever it is.
    pub fn remove(&mut self, element: H) {
        if let Some(index) = self.position(element) {
            let _ = self.elements.remove(index);
        }
    }

    /// Insert `element` at `index`, shifting the entries below it down.
    pub fn insert(&mut self, index: usize, element: H) {
        self.elements.insert(index.min(self.elements.len()), element);
    }

    /// Put `new` in the slot `old` occupies.
    pub fn replace(&mut self, old: H, new: H) {
        if let Some(index) = self.position(old) {
            self.elements[index] = new;
        }
    }

    /// Pop entries until only `len` remain.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
    }

    /// Pop elements until `element` has been popped. Nothing happens when it
    /// is not on the stack.
    pub fn pop_until_node(&mut self, element: H) {
        if let Some(index) = self.position(element) {
            self.elements.truncate(index);
        }
    }

    /// Index of the bottommost HTML element named one of `names`.
    #[must_use]
    pub fn find<S>(&self, sink: &S, names: &[&str]) -> Option<usize>
    where
        S: TreeSink<Handle = H>,
    {
        self.elements
            .iter()
            .rposition(|&e| is_html_one_of(sink, e, names))
    }

    /// "Pop elements from the stack of open elements until an element with
    /// one of these tag names has been popped from the stack."
    ///
    /// Only HTML elements match. When none is open the stack is left alone.
    pub fn pop_until<S>(&mut self, sink: &S, names: &[&str])
    where
        S: TreeSink<Handle = H>,
    {
        if let Some(index) = self.find(sink, names) {
            self.elements.truncate(index);
        }
    }

    /// Pop while the current node is an HTML element that is not named in
    /// `names`. Used by the "clear the stack back to a table context" family.
    pub fn pop_until_current_is<S>(&mut self, sink: &S, names: &[&str])
    where
        S: TreeSink<Handle = H>,
    {
        while let Some(current) = self.current() {
            if is_html_one_of(sink, current, names) {
                break;
            }
            let _ = self.elements.pop();
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the
    /// stack).
    /// 2. If node is the target node, terminate in a match state.
    /// 3. Otherwise, if node is one of the element types in list, terminate in
    /// a failure state.
    /// 4. Otherwise, set node to the previous entry in the stack of open
    /// elements and return to step 2. (This will never fail, since the loop
    /// will always terminate in the previous step if the top of the stack, an
    /// html element, is reached.)"
    ///
    /// The walk also ends when the top of the stack is passed, so a stack
    /// without an `html` element at the top still terminates.
    pub fn in_scope_where<S, F>(&self, sink: &S, scope: Scope, mut is_target: F) -> bool
    where
        S: TreeSink<Handle = H>,
        F: FnMut(H) -> bool,
    {
        for &node in self.elements.iter().rev() {
            if is_target(node) {
                return true;
            }
            if let Some((namespace, name)) = sink.element_name(node)
                && scope.is_boundary(namespace, name)
            {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element named `name` is in `scope`.
    #[must_use]
    pub fn has_element_in_scope<S>(&self, sink: &S, name: &str, scope: Scope) -> bool
    where
        S: TreeSink<Handle = H>,
    {
        self.in_scope_where(sink, scope, |node| is_html_named(sink, node, name))
    }

    /// Whether an HTML element named any of `names` is in `scope`.
    #[must_use]
    pub fn has_any_in_scope<S>(&self, sink: &S, names: &[&str], scope: Scope) -> bool
    where
        S: TreeSink<Handle = H>,
    {
        self.in_scope_where(sink, scope, |node| is_html_one_of(sink, node, names))
    }

    /// Whether the specific node `target` is in `scope`.
    #[must_use]
    pub fn has_node_in_scope<S>(&self, sink: &S, target: H, scope: Scope) -> bool
    where
        S: TreeSink<Handle = H>,
    {
        self.in_scope_where(sink, scope, |node| node == target)
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub fn generate_implied_end_tags<S>(&mut self, sink: &S, exclude: Option<&str>)
    where
        S: TreeSink<Handle = H>,
    {
        while let Some(current) = self.current() {
            let implied = matches!(
                sink.element_name(current),
                Some((Namespace::Html, name)) if IMPLIED_END_TAGS.contains(&name) && Some(name) != exclude
            );
            if !implied {
                break;
            }
            let _ = self.elements.pop();
        }
    }

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub fn generate_implied_end_tags_thoroughly<S>(&mut self, sink: &S)
    where
        S: TreeSink<Handle = H>,
    {
        while let Some(current) = self.current() {
            if !is_html_one_of(sink, current, THOROUGH_IMPLIED_END_TAGS) {
                break;
            }
            let _ = self.elements.pop();
        }
    }
}

/// Whether `node` is an HTML element named `name`.
pub fn is_html_named<S: TreeSink>(sink: &S, node: S::Handle, name: &str) -> bool {
    matches!(sink.element_name(node), Some((Namespace::Html, n)) if n == name)
}

/// Whether `node` is an HTML element named any of `names`.
pub fn is_html_one_of<S: TreeSink>(sink: &S, node: S::Handle, names: &[&str]) -> bool {
    matches!(sink.element_name(node), Some((Namespace::Html, n)) if names.contains(&n))
}
