//! Owned SDF element tree
//!
//! `roxmltree` gives a read-only view borrowed from the source text. Merging
//! needs to copy subtrees between documents and edit names and poses, so the
//! parsed tree is converted into plain owned `Element` values. Each element
//! owns its children; cloning an element is a deep copy.

use std::collections::{BTreeMap, BTreeSet};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A namespace declaration: prefix (empty for the default namespace) and URI
pub type NamespaceDecl = (String, String);

/// A tagged node with attributes, optional text and ordered child elements
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Tag name, including the namespace prefix if one was used
    pub tag: String,
    /// Attributes in document order (namespace declarations first)
    pub attributes: Vec<(String, String)>,
    /// Character data before the first child element
    pub text: Option<String>,
    /// Character data after this element's end tag, inside its parent
    pub tail: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_tag_name(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// The `name` attribute, if present
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// First direct child with the given tag
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.has_tag_name(tag))
    }

    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.has_tag_name(tag))
    }

    /// Text of the first direct child with the given tag
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.find(tag).and_then(Element::text)
    }

    /// Build an owned element from a parsed node, recursively
    pub(crate) fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let tag_name = node.tag_name();
        let mut element = Element::new(qualified_name(node, tag_name.namespace(), tag_name.name()));

        // Only declarations introduced here; inherited ones live on an ancestor.
        let parent = node.parent_element();
        for ns in node.namespaces() {
            if ns.uri() == XML_NAMESPACE {
                continue;
            }
            let inherited = parent
                .map(|p| {
                    p.namespaces()
                        .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
                })
                .unwrap_or(false);
            if inherited {
                continue;
            }
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            element.attributes.push((key, ns.uri().to_string()));
        }

        for attr in node.attributes() {
            element.attributes.push((
                qualified_name(node, attr.namespace(), attr.name()),
                attr.value().to_string(),
            ));
        }

        let mut text = String::new();
        for child in node.children() {
            if child.is_element() {
                element.children.push(Element::from_node(child));
            } else if child.is_text() {
                let Some(t) = child.text() else { continue };
                match element.children.last_mut() {
                    Some(last) => last.tail.get_or_insert_with(String::new).push_str(t),
                    None => text.push_str(t),
                }
            }
        }

        // Indentation between child elements is layout, not content.
        if !text.is_empty() && (element.children.is_empty() || !text.trim().is_empty()) {
            element.text = Some(text);
        }
        for child in &mut element.children {
            if child.tail.as_deref().is_some_and(|t| t.trim().is_empty()) {
                child.tail = None;
            }
        }

        element
    }

    /// Namespace declarations (`xmlns`, `xmlns:p`) made on this element
    pub fn namespace_declarations(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .iter()
            .filter_map(|(key, uri)| declared_prefix(key).map(|p| (p, uri.as_str())))
    }

    /// Redeclare inherited namespaces this subtree relies on
    ///
    /// `inherited` lists the declarations in scope where the element was
    /// parsed, outermost first. Any prefix used by the subtree but not
    /// declared inside it is declared on this element, so a copy stays
    /// well-formed wherever it is placed.
    pub fn adopt_namespaces(&mut self, inherited: &[NamespaceDecl]) {
        let scope: BTreeMap<&str, &str> = inherited
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
            .collect();

        let mut free = BTreeSet::new();
        self.collect_free_prefixes(&mut Vec::new(), &mut free);

        let adopted: Vec<(String, String)> = free
            .iter()
            .filter_map(|prefix| scope.get(prefix.as_str()).map(|uri| (prefix, *uri)))
            .map(|(prefix, uri)| {
                let key = if prefix.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{}", prefix)
                };
                (key, uri.to_string())
            })
            .collect();
        let existing = std::mem::take(&mut self.attributes);
        self.attributes = adopted.into_iter().chain(existing).collect();
    }

    fn collect_free_prefixes(&self, bound: &mut Vec<String>, free: &mut BTreeSet<String>) {
        let mark = bound.len();
        bound.extend(self.namespace_declarations().map(|(p, _)| p.to_string()));

        let mut used = vec![self.tag.split_once(':').map(|(p, _)| p).unwrap_or("")];
        used.extend(
            self.attributes
                .iter()
                .filter(|(key, _)| declared_prefix(key).is_none())
                .filter_map(|(key, _)| key.split_once(':').map(|(p, _)| p)),
        );
        for prefix in used {
            if prefix != "xml" && !bound.iter().any(|b| b == prefix) {
                free.insert(prefix.to_string());
            }
        }

        for child in &self.children {
            child.collect_free_prefixes(bound, free);
        }
        bound.truncate(mark);
    }
}

fn declared_prefix(key: &str) -> Option<&str> {
    match key {
        "xmlns" => Some(""),
        _ => key.strip_prefix("xmlns:"),
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = match namespace {
        Some(XML_NAMESPACE) => Some("xml"),
        Some(uri) => node.lookup_prefix(uri),
        None => None,
    };
    match prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, local),
        _ => local.to_string(),
    }
}

/// A parsed world document: a single root element (usually `<sdf>`)
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse XML text into an owned document
    pub fn parse_str(xml: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(xml)?;
        Ok(Self::new(Element::from_node(doc.root_element())))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_attributes_and_text() {
        let doc = Document::parse_str(
            r#"<sdf version="1.6"><world name="w"><model name="box"><pose>1 2 3 0 0 0</pose></model></world></sdf>"#,
        )
        .unwrap();

        let root = doc.root();
        assert_eq!(root.tag, "sdf");
        assert_eq!(root.attribute("version"), Some("1.6"));

        let model = root.find("world").unwrap().find("model").unwrap();
        assert_eq!(model.name(), Some("box"));
        assert_eq!(model.child_text("pose"), Some("1 2 3 0 0 0"));
    }

    #[test]
    fn test_layout_whitespace_dropped_from_parents() {
        let doc = Document::parse_str("<sdf>\n  <world name=\"w\">\n  </world>\n</sdf>").unwrap();
        assert_eq!(doc.root().text, None);
        // A childless element keeps its text verbatim
        assert_eq!(doc.root().find("world").unwrap().text.as_deref(), Some("\n  "));
    }

    #[test]
    fn test_namespace_prefixes_preserved() {
        let doc = Document::parse_str(
            r#"<sdf xmlns:ignition="http://ignitionrobotics.org/schema"><world name="w"><ignition:note ignition:level="2">hi</ignition:note></world></sdf>"#,
        )
        .unwrap();

        let root = doc.root();
        assert_eq!(
            root.attribute("xmlns:ignition"),
            Some("http://ignitionrobotics.org/schema")
        );
        let note = root.find("world").unwrap().find("ignition:note").unwrap();
        assert_eq!(note.attribute("ignition:level"), Some("2"));
        // Declaration is not repeated on descendants
        assert!(note.attribute("xmlns:ignition").is_none());
    }

    #[test]
    fn test_text_after_child_kept_as_tail() {
        let doc = Document::parse_str(r#"<plugin name="p">head<a/>tail<b/>  </plugin>"#).unwrap();

        let plugin = doc.root();
        assert_eq!(plugin.text(), Some("head"));
        assert_eq!(plugin.children[0].tail.as_deref(), Some("tail"));
        assert_eq!(plugin.children[1].tail, None);
    }

    #[test]
    fn test_adopt_inherited_namespaces() {
        let inherited = vec![
            ("ignition".to_string(), "http://ignitionrobotics.org/schema".to_string()),
            ("gz".to_string(), "http://gazebosim.org/schema".to_string()),
            ("unused".to_string(), "urn:unused".to_string()),
        ];
        let mut actor = Element::new("actor")
            .with_attribute("name", "walker")
            .with_child(Element::new("ignition:walk").with_attribute("speed", "1"))
            .with_child(
                Element::new("gz:plugin")
                    .with_attribute("xmlns:gz", "urn:local-gz")
                    .with_attribute("gz:rate", "10"),
            );

        actor.adopt_namespaces(&inherited);

        assert_eq!(
            actor.attribute("xmlns:ignition"),
            Some("http://ignitionrobotics.org/schema")
        );
        // Declared inside the subtree, so not taken from the outer scope
        assert!(actor.attribute("xmlns:gz").is_none());
        assert!(actor.attribute("xmlns:unused").is_none());
        assert_eq!(actor.attributes[0].0, "xmlns:ignition");
    }

    #[test]
    fn test_adopt_default_namespace() {
        let inherited = vec![(String::new(), "urn:scene".to_string())];
        let mut model = Element::new("model").with_attribute("name", "m");

        model.adopt_namespaces(&inherited);
        assert_eq!(model.attribute("xmlns"), Some("urn:scene"));
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut elem = Element::new("model")
            .with_attribute("name", "a")
            .with_attribute("type", "x");
        elem.set_attribute("name", "b");

        assert_eq!(
            elem.attributes,
            vec![
                ("name".to_string(), "b".to_string()),
                ("type".to_string(), "x".to_string())
            ]
        );
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Element::new("model")
            .with_attribute("name", "a")
            .with_child(Element::new("pose").with_text("0 0 0 0 0 0"));
        let mut copy = original.clone();
        copy.find_mut("pose").unwrap().text = Some("1 1 1 0 0 0".to_string());

        assert_eq!(original.child_text("pose"), Some("0 0 0 0 0 0"));
    }
}
