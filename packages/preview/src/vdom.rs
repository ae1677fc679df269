use maildraft_common::{css_value, escape_attr, escape_text};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Block id for keyed reconciliation by the host page
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// Markup inserted as-is (already run through the sanitizer)
    Raw { html: String },

    /// Comment node
    Comment { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn raw(html: impl Into<String>) -> Self {
        VNode::Raw { html: html.into() }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), css_value(value.as_ref()).into_owned());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first element with the given tag
    pub fn find_tag(&self, tag_name: &str) -> Option<&VNode> {
        if self.tag() == Some(tag_name) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_tag(tag_name))
    }

    /// Count elements with the given tag in this subtree
    pub fn count_tag(&self, tag_name: &str) -> usize {
        let own = usize::from(self.tag() == Some(tag_name));
        own + self
            .children()
            .iter()
            .map(|c| c.count_tag(tag_name))
            .sum::<usize>()
    }

    /// Serialize this subtree to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
                }
                if !styles.is_empty() {
                    let style = styles
                        .iter()
                        .map(|(k, v)| format!("{}: {};", k, v))
                        .collect::<Vec<_>>()
                        .join(" ");
                    let _ = write!(out, " style=\"{}\"", escape_attr(&style));
                }

                if children.is_empty() && is_self_closing(tag) {
                    out.push_str(" />");
                    return;
                }

                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", tag);
            }
            VNode::Text { content } => out.push_str(&escape_text(content)),
            VNode::Raw { html } => out.push_str(html),
            VNode::Comment { content } => {
                let _ = write!(out, "<!-- {} -->", content.replace("--", "- -"));
            }
        }
    }
}

/// Virtual Document (collection of root nodes with metadata)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualDomDocument {
    pub nodes: Vec<VNode>,
    pub styles: Vec<CssRule>,
}

/// CSS Rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub properties: BTreeMap<String, String>,
}

impl VirtualDomDocument {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            styles: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }

    pub fn add_style(&mut self, selector: impl Into<String>, properties: &[(&str, &str)]) {
        self.styles.push(CssRule {
            selector: selector.into(),
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
    }

    /// Stylesheet followed by the node markup, ready to mount in a host page
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if !self.styles.is_empty() {
            out.push_str("<style>");
            for rule in &self.styles {
                let _ = write!(out, "{} {{", rule.selector);
                for (property, value) in &rule.properties {
                    let _ = write!(out, " {}: {};", property, value);
                }
                out.push_str(" }");
            }
            out.push_str("</style>");
        }
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}

impl Default for VirtualDomDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn is_self_closing(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "meta" | "link" | "input" | "wbr")
}
