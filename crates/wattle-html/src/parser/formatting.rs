//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)

use crate::tokenizer::{Attribute, Token};

use super::stack::StackOfOpenElements;

/// An entry in the list of active formatting elements.
#[derive(Debug, Clone)]
pub enum FormattingEntry<H> {
    /// A formatting element entry.
    ///
    /// The token is kept so the element can be recreated by the
    /// reconstruction and adoption agency algorithms.
    Element {
        /// The element in the tree.
        node: H,
        /// "the token for which the element was created"
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Inserted when entering applet, object, marquee, template, td, th and
    /// caption.
    Marker,
}

impl<H: Copy + Eq> FormattingEntry<H> {
    /// The element handle, or `None` for a marker.
    #[must_use]
    pub fn node(&self) -> Option<H> {
        match self {
            Self::Element { node, .. } => Some(*node),
            Self::Marker => None,
        }
    }

    /// The originating token, or `None` for a marker.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Element { token, .. } => Some(token),
            Self::Marker => None,
        }
    }

    /// Whether this entry is a marker.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Marker)
    }
}

/// The list of active formatting elements.
///
/// "Initially, the list of active formatting elements is empty. It is used to
/// handle mis-nested formatting element tags."
#[derive(Debug, Clone)]
pub struct ActiveFormattingElements<H> {
    entries: Vec<FormattingEntry<H>>,
}

impl<H> Default for ActiveFormattingElements<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> ActiveFormattingElements<H> {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries, earliest first.
    #[must_use]
    pub fn entries(&self) -> &[FormattingEntry<H>] {
        &self.entries
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry<H>> {
        self.entries.get(index)
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "When the steps below require the UA to push onto the list of active
    /// formatting elements an element element, the UA must perform the
    /// following steps:
    ///
    /// 1. If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if
    /// there are no markers, that have the same tag name, namespace, and
    /// attributes as element, then remove the earliest such element from the
    /// list of active formatting elements. For these purposes, the attributes
    /// must be compared as they were when the elements were created by the
    /// parser; two elements have the same attributes if all their parsed
    /// attributes can be paired such that the two attributes in each pair have
    /// identical names, namespaces, and values (the order of the attributes
    /// does not matter).
    ///
    /// 2. Add element to the list of active formatting elements."
    ///
    /// Only HTML elements are ever pushed, so the namespace always matches.
    pub fn push(&mut self, node: H, token: Token) {
        let start = self.last_marker_index().map_or(0, |i| i + 1);
        let matching: Vec<usize> = self.entries[start..]
            .iter()
            .enumerate()
            .filter_map(|(offset, entry)| match entry {
                FormattingEntry::Element { token: existing, .. } if same_element(existing, &token) => {
                    Some(start + offset)
                }
                _ => None,
            })
            .collect();
        if matching.len() >= 3 {
            let _ = self.entries.remove(matching[0]);
        }
        self.entries.push(FormattingEntry::Element { node, token });
    }

    /// "push a marker onto the list of active formatting elements"
    pub fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list of
    /// active formatting elements.
    /// 2. Remove entry from the list of active formatting elements.
    /// 3. If entry was a marker, then stop the algorithm at this point.
    /// 4. Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry.is_marker() {
                break;
            }
        }
    }

    fn last_marker_index(&self) -> Option<usize> {
        self.entries.iter().rposition(FormattingEntry::is_marker)
    }

    /// Index of the entry for `node`.
    #[must_use]
    pub fn position(&self, node: H) -> Option<usize> {
        self.entries.iter().rposition(|e| e.node() == Some(node))
    }

    /// Whether `node` has an entry.
    #[must_use]
    pub fn contains(&self, node: H) -> bool {
        self.position(node).is_some()
    }

    /// Remove the entry for `node`, if any.
    pub fn remove(&mut self, node: H) {
        if let Some(index) = self.position(node) {
            let _ = self.entries.remove(index);
        }
    }

    /// Remove the entry at `index`.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.entries.len() {
            let _ = self.entries.remove(index);
        }
    }

    /// Insert an element entry at `index`.
    pub fn insert_at(&mut self, index: usize, node: H, token: Token) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, FormattingEntry::Element { node, token });
    }

    /// Point the entry at `index` to `node`, keeping its token.
    pub fn replace_node(&mut self, index: usize, node: H) {
        if let Some(FormattingEntry::Element { node: slot, .. }) = self.entries.get_mut(index) {
            *slot = node;
        }
    }

    /// The last element between the end of the list and the last marker (or
    /// the start of the list) whose tag name is `name`.
    #[must_use]
    pub fn last_element_named(&self, name: &str) -> Option<(usize, H)> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { node, token } if token.tag_name() == Some(name) => {
                    return Some((index, *node));
                }
                FormattingEntry::Element { .. } => {}
            }
        }
        None
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// The first half of "reconstruct the active formatting elements": find
    /// the entry to start reopening from.
    ///
    /// "1. If there are no entries in the list of active formatting elements,
    /// then there is nothing to reconstruct; stop this algorithm.
    /// 2. If the last (most recently added) entry in the list of active
    /// formatting elements is a marker, or if it is an element that is in the
    /// stack of open elements, then there is nothing to reconstruct; stop this
    /// algorithm.
    /// 3. Let entry be the last (most recently added) element in the list of
    /// active formatting elements.
    /// 4. Rewind: If there are no entries before entry in the list of active
    /// formatting elements, then jump to the step labeled create.
    /// 5. Let entry be the entry one earlier than entry in the list of active
    /// formatting elements.
    /// 6. If entry is neither a marker nor an element that is also in the
    /// stack of open elements, go to the step labeled rewind.
    /// 7. Advance: Let entry be the element one later than entry in the list
    /// of active formatting elements."
    ///
    /// Returns the index of the first entry to recreate. Every entry from
    /// there to the end of the list is an element that is not open.
    #[must_use]
    pub fn reconstruction_start(&self, stack: &StackOfOpenElements<H>) -> Option<usize> {
        let is_open_or_marker = |entry: &FormattingEntry<H>| match entry {
            FormattingEntry::Marker => true,
            FormattingEntry::Element { node, .. } => stack.contains(*node),
        };

        // STEP 1-2
        let last = self.entries.last()?;
        if is_open_or_marker(last) {
            return None;
        }

        // STEP 3-7
        let start = self.entries[..self.entries.len() - 1]
            .iter()
            .rposition(is_open_or_marker)
            .map_or(0, |index| index + 1);
        Some(start)
    }
}

/// Same tag name and the same attribute set, compared without regard to order.
fn same_element(a: &Token, b: &Token) -> bool {
    if a.tag_name() != b.tag_name() {
        return false;
    }
    let (a_attrs, b_attrs) = (a.attributes(), b.attributes());
    a_attrs.len() == b_attrs.len() && a_attrs.iter().all(|attr| has_matching(b_attrs, attr))
}

fn has_matching(attrs: &[Attribute], wanted: &Attribute) -> bool {
    attrs.iter().any(|attr| {
        attr.name == wanted.name && attr.namespace == wanted.namespace && attr.value == wanted.value
    })
}
