//! Tree fragment extraction and projection.
//!
//! The navigation endpoint returns a server-rendered page. Only the element
//! carrying the `tree-root` class is kept. Inside it, every node header is an
//! element with class `node-content` and a `data-id` attribute, optionally
//! holding an `expander`. The header's parent is the tree node, whose direct
//! `children-container` child holds the nested nodes.
//!
//! The scanner is a tag tokenizer, not a full HTML parser. It tolerates
//! unclosed elements, void elements, comments and quoted `>` inside
//! attribute values, which covers what the template emits. Node ids and
//! labels are reported with character references decoded, the way a DOM
//! would expose them; the markup itself is never re-encoded.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;

use super::NodeRef;

/// Class marking the element that is swapped on reload.
pub const TREE_ROOT_CLASS: &str = "tree-root";
/// Class of a node header.
pub const NODE_CONTENT_CLASS: &str = "node-content";
/// Class of the element holding a node's children.
pub const CHILDREN_CONTAINER_CLASS: &str = "children-container";
/// Class of the open/closed indicator inside a header.
pub const EXPANDER_CLASS: &str = "expander";

const ACTIVE_CLASS: &str = "active";
const EXPANDED_CLASS: &str = "expanded";
const OPEN_CLASS: &str = "open";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
        .expect("tag pattern is valid")
});

static ATTR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// One node header found in the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Resource the header stands for.
    pub id: NodeRef,
    /// Visible header text, expander excluded.
    pub label: String,
    /// Whether the node has a non-empty children container.
    pub has_children: bool,
    /// Nesting depth, 0 for top-level nodes.
    pub depth: usize,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: Vec<String>,
    data_id: Option<String>,
    class_value: Option<ClassValue>,
    inner: Range<usize>,
    outer: Range<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Clone)]
struct ClassValue {
    span: Range<usize>,
    quoted: bool,
}

impl Element {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// The tree markup currently displayed, with an outline of its nodes.
#[derive(Debug, Clone)]
pub struct TreeFragment {
    markup: String,
    elements: Vec<Element>,
    nodes: Vec<TreeNode>,
    headers: Vec<usize>,
    index: HashMap<NodeRef, usize>,
}

impl PartialEq for TreeFragment {
    fn eq(&self, other: &Self) -> bool {
        self.markup == other.markup
    }
}

impl TreeFragment {
    /// Pull the `tree-root` element out of a navigation response.
    ///
    /// Returns `None` when the document has no such element.
    pub fn extract(document: &str) -> Option<Self> {
        let elements = scan(document);
        let root = elements.iter().find(|e| e.has_class(TREE_ROOT_CLASS))?;
        Some(Self::parse(&document[root.outer.clone()]))
    }

    /// Build a fragment from markup whose outermost element is the tree root.
    pub fn parse(markup: &str) -> Self {
        let markup = markup.to_string();
        let elements = scan(&markup);

        let headers: Vec<usize> = elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(NODE_CONTENT_CLASS) && e.data_id.is_some())
            .map(|(i, _)| i)
            .collect();

        let tree_nodes: Vec<usize> = headers.iter().filter_map(|&h| elements[h].parent).collect();

        let mut nodes = Vec::with_capacity(headers.len());
        let mut index = HashMap::new();
        for (position, &h) in headers.iter().enumerate() {
            let header = &elements[h];
            let id = NodeRef::new(header.data_id.clone().unwrap_or_default());

            let has_children = header.parent.is_some_and(|p| {
                elements[p].children.iter().any(|&c| {
                    elements[c].has_class(CHILDREN_CONTAINER_CLASS)
                        && !elements[c].children.is_empty()
                })
            });

            let mut depth = 0;
            let mut cursor = header.parent.and_then(|p| elements[p].parent);
            while let Some(ancestor) = cursor {
                if tree_nodes.contains(&ancestor) {
                    depth += 1;
                }
                cursor = elements[ancestor].parent;
            }

            index.entry(id.clone()).or_insert(position);
            nodes.push(TreeNode {
                id,
                label: header_label(&markup, &elements, h),
                has_children,
                depth,
            });
        }

        Self {
            markup,
            elements,
            nodes,
            headers,
            index,
        }
    }

    /// Markup exactly as received.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Node headers in document order. A resource reachable along several
    /// paths appears once per occurrence.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// First occurrence of `id` in the fragment.
    pub fn node(&self, id: &NodeRef) -> Option<&TreeNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Whether `id` is rendered in the fragment.
    pub fn contains(&self, id: &NodeRef) -> bool {
        self.index.contains_key(id)
    }

    /// Whether any occurrence of `id` has children.
    pub fn has_children(&self, id: &NodeRef) -> bool {
        self.nodes.iter().any(|n| &n.id == id && n.has_children)
    }

    /// Project selection and expansion onto the markup.
    ///
    /// State classes already present in the markup are dropped first, so
    /// the output depends only on `selected` and `is_expanded`.
    pub fn render<F>(&self, selected: Option<&NodeRef>, is_expanded: F) -> String
    where
        F: Fn(&NodeRef) -> bool,
    {
        let mut extra: HashMap<usize, &'static str> = HashMap::new();
        for (node, &h) in self.nodes.iter().zip(&self.headers) {
            let header = &self.elements[h];
            if selected == Some(&node.id) {
                extra.insert(h, ACTIVE_CLASS);
            }
            if !is_expanded(&node.id) {
                continue;
            }
            for &c in &header.children {
                if self.elements[c].has_class(EXPANDER_CLASS) {
                    extra.insert(c, OPEN_CLASS);
                }
            }
            if let Some(p) = header.parent {
                for &c in &self.elements[p].children {
                    if self.elements[c].has_class(CHILDREN_CONTAINER_CLASS) {
                        extra.insert(c, EXPANDED_CLASS);
                    }
                }
            }
        }

        let stateful = [
            (NODE_CONTENT_CLASS, ACTIVE_CLASS),
            (EXPANDER_CLASS, OPEN_CLASS),
            (CHILDREN_CONTAINER_CLASS, EXPANDED_CLASS),
        ];
        let mut replacements: Vec<(Range<usize>, String)> = Vec::new();
        for (i, element) in self.elements.iter().enumerate() {
            let Some(&(_, state_class)) = stateful.iter().find(|(kind, _)| element.has_class(kind))
            else {
                continue;
            };
            let Some(class_value) = &element.class_value else {
                continue;
            };

            let mut classes: Vec<&str> = element
                .classes
                .iter()
                .map(String::as_str)
                .filter(|c| *c != state_class)
                .collect();
            if let Some(add) = extra.get(&i) {
                classes.push(*add);
            }
            let joined = classes.join(" ");
            let value = if class_value.quoted {
                joined
            } else {
                format!("\"{}\"", joined)
            };
            replacements.push((class_value.span.clone(), value));
        }

        replacements.sort_by_key(|(span, _)| span.start);
        let mut out = String::with_capacity(self.markup.len() + replacements.len() * 10);
        let mut cursor = 0;
        for (span, value) in replacements {
            out.push_str(&self.markup[cursor..span.start]);
            out.push_str(&value);
            cursor = span.end;
        }
        out.push_str(&self.markup[cursor..]);
        out
    }
}

fn header_label(markup: &str, elements: &[Element], header: usize) -> String {
    let element = &elements[header];
    let mut text = String::new();
    let mut cursor = element.inner.start;
    for &c in &element.children {
        if elements[c].has_class(EXPANDER_CLASS) {
            text.push_str(&markup[cursor..elements[c].outer.start]);
            cursor = elements[c].outer.end;
        }
    }
    text.push_str(&markup[cursor..element.inner.end.max(cursor)]);
    let stripped = TAG_PATTERN.replace_all(&text, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

/// Resolve named and numeric character references.
///
/// Text with a malformed reference is kept verbatim.
fn decode_entities(raw: &str) -> String {
    match unescape_with(raw, resolve_html5_entity) {
        Ok(text) => text.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn scan(markup: &str) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for caps in TAG_PATTERN.captures_iter(markup) {
        let Some(name) = caps.get(2) else {
            continue; // comment
        };
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        let tag = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.is_empty());

        if closing {
            let Some(depth) = stack.iter().rposition(|&i| elements[i].tag == tag) else {
                continue;
            };
            for &open in &stack[depth + 1..] {
                elements[open].inner.end = whole.start;
                elements[open].outer.end = whole.start;
            }
            let matched = stack[depth];
            elements[matched].inner.end = whole.start;
            elements[matched].outer.end = whole.end;
            stack.truncate(depth);
            continue;
        }

        let attrs = caps.get(3);
        let mut classes = Vec::new();
        let mut data_id = None;
        let mut class_value = None;
        if let Some(attrs) = attrs {
            for attr in ATTR_PATTERN.captures_iter(attrs.as_str()) {
                let key = attr.get(1).map(|m| m.as_str().to_ascii_lowercase());
                let value = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4));
                match (key.as_deref(), value) {
                    (Some("class"), Some(v)) => {
                        classes = v.as_str().split_whitespace().map(str::to_string).collect();
                        class_value = Some(ClassValue {
                            span: attrs.start() + v.start()..attrs.start() + v.end(),
                            quoted: attr.get(4).is_none(),
                        });
                    }
                    (Some("data-id"), Some(v)) => data_id = Some(decode_entities(v.as_str())),
                    _ => {}
                }
            }
        }

        let self_closing = caps.get(4).is_some_and(|m| !m.is_empty());
        let void = self_closing || VOID_ELEMENTS.contains(&tag.as_str());
        let index = elements.len();
        let parent = stack.last().copied();
        elements.push(Element {
            tag,
            classes,
            data_id,
            class_value,
            inner: whole.end..whole.end,
            outer: whole.start..if void { whole.end } else { markup.len() },
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            elements[p].children.push(index);
        }
        if !void {
            elements[index].inner.end = markup.len();
            stack.push(index);
        }
    }

    elements
}
