//! World file loading and `<world>` lookup

use std::path::Path;

use tracing::warn;

use super::element::{Document, Element, NamespaceDecl};
use crate::error::{ComposeError, ComposeResult};

/// Placeholder some world generators emit for an unset pose frame
const MALFORMED_POSE_TAG: &str = "<pose frame=>";

pub struct WorldLoader;

impl WorldLoader {
    /// Load a world file, repairing known generator defects on failure
    ///
    /// The first attempt parses the file as-is. If that fails the text is
    /// repaired (`<pose frame=>` becomes `<pose>`, backslashes are removed)
    /// and parsed once more. Any other malformation is reported as
    /// [`ComposeError::Parse`].
    pub fn load_file(path: impl AsRef<Path>) -> ComposeResult<Document> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ComposeError::io(path, e))?;

        match Document::parse_str(&contents) {
            Ok(doc) => Ok(doc),
            Err(first) => {
                warn!(
                    "Failed to parse {}: {}; retrying with textual repair",
                    path.display(),
                    first
                );
                let repaired = Self::repair(&contents);
                Document::parse_str(&repaired).map_err(|e| ComposeError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Apply the two known textual repairs
    pub fn repair(contents: &str) -> String {
        contents.replace(MALFORMED_POSE_TAG, "<pose>").replace('\\', "")
    }
}

impl Document {
    /// The `<world>` child of the root element
    pub fn world(&self) -> ComposeResult<&Element> {
        self.root()
            .find("world")
            .ok_or_else(ComposeError::missing_world)
    }

    pub fn world_mut(&mut self) -> ComposeResult<&mut Element> {
        self.root_mut()
            .find_mut("world")
            .ok_or_else(ComposeError::missing_world)
    }

    /// Namespaces in scope for the world's children, outermost first
    pub fn world_namespaces(&self) -> ComposeResult<Vec<NamespaceDecl>> {
        let world = self.world()?;
        Ok(self
            .root()
            .namespace_declarations()
            .chain(world.namespace_declarations())
            .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_repair_replaces_known_tokens_only() {
        let broken = r#"<model name="a\"><pose frame=>1 2 0 0 0 0</pose></model>"#;
        assert_eq!(
            WorldLoader::repair(broken),
            r#"<model name="a"><pose>1 2 0 0 0 0</pose></model>"#
        );
    }

    #[test]
    fn test_load_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ok.world");
        fs::write(&path, r#"<sdf version="1.6"><world name="default"/></sdf>"#).unwrap();

        let doc = WorldLoader::load_file(&path).unwrap();
        assert_eq!(doc.world().unwrap().name(), Some("default"));
    }

    #[test]
    fn test_load_repairs_malformed_pose_frame() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("repair.world");
        fs::write(
            &path,
            r#"<sdf><world name="default"><actor name="walker\"><pose frame=>1 2 0 0 0 0</pose></actor></world></sdf>"#,
        )
        .unwrap();

        let doc = WorldLoader::load_file(&path).unwrap();
        let actor = doc.world().unwrap().find("actor").unwrap();
        assert_eq!(actor.name(), Some("walker"));
        assert_eq!(actor.child_text("pose"), Some("1 2 0 0 0 0"));
    }

    #[test]
    fn test_load_unrepairable_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.world");
        fs::write(&path, "<sdf><world name=\"default\"></sdf>").unwrap();

        let result = WorldLoader::load_file(&path);
        assert!(matches!(result, Err(ComposeError::Parse { .. })));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = WorldLoader::load_file("/nonexistent/static_seed_0001.world");
        assert!(matches!(result, Err(ComposeError::Io { .. })));
    }

    #[test]
    fn test_world_namespaces_outermost_first() {
        let doc = Document::parse_str(
            r#"<sdf xmlns:a="urn:a"><world name="w" xmlns:a="urn:a2"/></sdf>"#,
        )
        .unwrap();

        let scope = doc.world_namespaces().unwrap();
        assert_eq!(
            scope,
            vec![
                ("a".to_string(), "urn:a".to_string()),
                ("a".to_string(), "urn:a2".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_world_is_structure_error() {
        let doc = Document::parse_str("<sdf><model name=\"a\"/></sdf>").unwrap();
        assert!(matches!(doc.world(), Err(ComposeError::Structure(_))));
    }
}
