//! Top-level entity name registry

use std::collections::HashSet;

use crate::sdf::Element;

/// Name given to entities without a `name` attribute
pub const DEFAULT_NAME: &str = "unnamed";

/// Names in use among a world's top-level children
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the `name` attributes of a world's direct children
    pub fn from_world(world: &Element) -> Self {
        Self {
            names: world
                .children
                .iter()
                .filter_map(Element::name)
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Reserve `name`, or the first free `name_<i>` for i = 1, 2, ...
    pub fn reserve(&mut self, name: &str) -> String {
        let unique = if self.names.contains(name) {
            (1u64..)
                .map(|i| format!("{}_{}", name, i))
                .find(|candidate| !self.names.contains(candidate))
                .unwrap_or_else(|| name.to_string())
        } else {
            name.to_string()
        };
        self.names.insert(unique.clone());
        unique
    }

    /// Give `elem` a registered unique name, rewriting its `name` attribute
    ///
    /// Returns the original name when the element had to be renamed.
    pub fn ensure_unique(&mut self, elem: &mut Element) -> Option<String> {
        let original = elem.name().unwrap_or(DEFAULT_NAME).to_string();
        let unique = self.reserve(&original);
        let had_name = elem.name().is_some();
        elem.set_attribute("name", unique.as_str());
        (had_name && unique != original).then_some(original)
    }
}
