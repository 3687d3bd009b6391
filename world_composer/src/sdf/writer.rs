//! Pretty-printing serializer for world documents
//!
//! Output is indented two spaces per nesting level. Whitespace between
//! elements is regenerated on every write, so writing a document, parsing
//! the result and writing it again yields identical text.

use std::io::Cursor;
use std::path::Path;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::element::{Document, Element};
use crate::error::{ComposeError, ComposeResult};

impl Document {
    /// Serialize with an XML declaration and indentation
    pub fn to_xml_string(&self) -> ComposeResult<String> {
        let mut buffer = Vec::with_capacity(4096);
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
        write_element(&mut writer, self.root())?;
        buffer.push(b'\n');

        String::from_utf8(buffer).map_err(|e| ComposeError::Serialize(e.to_string()))
    }

    /// Write the document as UTF-8, creating parent directories as needed
    pub fn write_file(&self, path: impl AsRef<Path>) -> ComposeResult<()> {
        let path = path.as_ref();
        let xml = self.to_xml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ComposeError::io(parent, e))?;
        }
        std::fs::write(path, xml).map_err(|e| ComposeError::io(path, e))
    }
}

fn emit<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> ComposeResult<()> {
    writer
        .write_event(event)
        .map_err(|e| ComposeError::Serialize(e.to_string()))
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, elem: &Element) -> ComposeResult<()> {
    let mut start = BytesStart::new(elem.tag.as_str());
    for (key, value) in &elem.attributes {
        let escaped = escape_attribute(value);
        start.push_attribute(Attribute::from((key.as_bytes(), escaped.as_bytes())));
    }

    let text = elem.text().filter(|t| !t.is_empty());
    if elem.children.is_empty() && text.is_none() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(t) = text {
        emit(writer, Event::Text(BytesText::new(t)))?;
    }
    for child in &elem.children {
        write_element(writer, child)?;
        if let Some(tail) = child.tail.as_deref() {
            emit(writer, Event::Text(BytesText::new(tail)))?;
        }
    }
    emit(writer, Event::End(BytesEnd::new(elem.tag.as_str())))
}

/// Attribute values also keep their line breaks and tabs
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_layout() {
        let doc = Document::parse_str(
            r#"<sdf version="1.6"><world name="default"><model name="wall"><pose>0 0 0 0 0 0</pose><static/></model></world></sdf>"#,
        )
        .unwrap();

        let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<sdf version=\"1.6\">\n\
\x20 <world name=\"default\">\n\
\x20   <model name=\"wall\">\n\
\x20     <pose>0 0 0 0 0 0</pose>\n\
\x20     <static/>\n\
\x20   </model>\n\
\x20 </world>\n\
</sdf>\n";
        assert_eq!(doc.to_xml_string().unwrap(), expected);
    }

    #[test]
    fn test_reformat_is_idempotent() {
        let source = "<sdf>\n<world name=\"w\">\n\t<actor name=\"a\">\n<pose>1 2 0 0 0 0</pose></actor>\n\n</world></sdf>";
        let first = Document::parse_str(source).unwrap().to_xml_string().unwrap();
        let second = Document::parse_str(&first).unwrap().to_xml_string().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mixed_content_keeps_text_position() {
        let doc = Document::parse_str(r#"<plugin name="p">head<a/>tail</plugin>"#).unwrap();

        let xml = doc.to_xml_string().unwrap();
        assert!(xml.contains(r#"<plugin name="p">head<a/>tail</plugin>"#));
        assert_eq!(Document::parse_str(&xml).unwrap(), doc);
    }

    #[test]
    fn test_escaping_round_trips() {
        let root = Element::new("sdf").with_child(
            Element::new("world")
                .with_attribute("name", "a \"quoted\" & <odd>\nname")
                .with_child(Element::new("uri").with_text("model://x?a=1&b=<2>")),
        );
        let doc = Document::new(root);

        let reparsed = Document::parse_str(&doc.to_xml_string().unwrap()).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/out/unified.world");
        let doc = Document::new(Element::new("sdf").with_child(Element::new("world")));

        doc.write_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<sdf>"));
    }
}
