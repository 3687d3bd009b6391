//! Selection of the dynamic world's movable and behavioural content

use tracing::debug;

use crate::config::ModelPolicy;
use crate::sdf::{Bounds, Element};

/// `<include>` URIs containing these fragments duplicate the static scene
const STATIC_INCLUDE_MARKERS: &[&str] = &["sun", "ground"];

/// Elements selected for transplanting, borrowed from the dynamic world
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    pub elements: Vec<&'a Element>,
    /// Planar bounds of the selected models and actors
    pub bounds: Option<Bounds>,
}

impl Extraction<'_> {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Whether an `<include>` pulls in the sun or a ground plane
pub fn is_static_include(elem: &Element) -> bool {
    elem.has_tag_name("include")
        && elem
            .child_text("uri")
            .map(|uri| STATIC_INCLUDE_MARKERS.iter().any(|m| uri.contains(m)))
            .unwrap_or(false)
}

/// Whether a model carries behaviour (a direct `<plugin>` child)
pub fn has_plugin(elem: &Element) -> bool {
    elem.children.iter().any(|c| c.has_tag_name("plugin"))
}

/// Walk the dynamic world's direct children in order and select content
///
/// Actors and `<plugins>` containers are always taken; models follow
/// `policy`; includes and every other tag are left behind.
pub fn extract_dynamic(world: &Element, policy: ModelPolicy) -> Extraction<'_> {
    let mut elements = Vec::new();

    for elem in &world.children {
        match elem.tag.as_str() {
            "include" => {
                if is_static_include(elem) {
                    debug!("Skipping static include {:?}", elem.child_text("uri"));
                }
            }
            "actor" | "plugins" => elements.push(elem),
            "model" => match policy {
                ModelPolicy::All => elements.push(elem),
                ModelPolicy::PluginBearing if has_plugin(elem) => elements.push(elem),
                ModelPolicy::PluginBearing => {
                    debug!("Skipping passive model {:?}", elem.name());
                }
            },
            _ => {}
        }
    }

    let bounds = Bounds::of_elements(elements.iter().copied());
    Extraction { elements, bounds }
}
