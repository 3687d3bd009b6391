//! Transplanting dynamic content into a static world

use std::path::Path;

use tracing::{debug, info};

use super::extract::extract_dynamic;
use super::names::NameRegistry;
use super::placement::{compute_offset, translate, Offset};
use crate::config::MergeConfig;
use crate::error::ComposeResult;
use crate::sdf::element::NamespaceDecl;
use crate::sdf::{Bounds, Document, Element, WorldLoader};

/// Outcome of one merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeSummary {
    /// Number of top-level elements appended to the static world
    pub appended: usize,
    /// `(original, new)` names of elements renamed to avoid collisions
    pub renamed: Vec<(String, String)>,
    /// Translation applied, if placement was enabled
    pub offset: Option<Offset>,
}

/// Append copies of `elements` to `world`
///
/// Each element is deep-copied, given the namespace declarations from
/// `namespaces` that it relies on, translated by `offset` when given,
/// renamed against the world's existing top-level names and appended in
/// order.
pub fn merge_elements<'a, I>(
    world: &mut Element,
    elements: I,
    namespaces: &[NamespaceDecl],
    offset: Option<Offset>,
) -> MergeSummary
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut registry = NameRegistry::from_world(world);
    let mut summary = MergeSummary {
        offset,
        ..Default::default()
    };

    for elem in elements {
        let mut copy = elem.clone();
        copy.adopt_namespaces(namespaces);
        if let Some(offset) = offset {
            translate(&mut copy, offset);
        }
        if let Some(original) = registry.ensure_unique(&mut copy) {
            let new_name = copy.name().unwrap_or_default().to_string();
            debug!("Renamed <{}> '{}' to '{}'", copy.tag, original, new_name);
            summary.renamed.push((original, new_name));
        }
        world.children.push(copy);
        summary.appended += 1;
    }

    summary
}

/// Merge the dynamic document's selected content into the static document
///
/// `static_doc` is modified in place and becomes the unified world;
/// `dynamic_doc` is only read.
pub fn compose_documents(
    static_doc: &mut Document,
    dynamic_doc: &Document,
    config: &MergeConfig,
) -> ComposeResult<MergeSummary> {
    let static_world = static_doc.world_mut()?;
    let extraction = extract_dynamic(dynamic_doc.world()?, config.model_policy);
    let namespaces = dynamic_doc.world_namespaces()?;

    let offset = config.placement.enabled.then(|| {
        let static_bounds = Bounds::of_elements(&static_world.children);
        compute_offset(static_bounds, extraction.bounds, &config.placement)
    });

    Ok(merge_elements(
        static_world,
        extraction.elements,
        &namespaces,
        offset,
    ))
}

/// Load a static/dynamic pair, merge them and write the unified world
pub fn compose_files(
    static_path: impl AsRef<Path>,
    dynamic_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &MergeConfig,
) -> ComposeResult<MergeSummary> {
    let output_path = output_path.as_ref();
    let mut static_doc = WorldLoader::load_file(static_path)?;
    let dynamic_doc = WorldLoader::load_file(dynamic_path)?;

    let summary = compose_documents(&mut static_doc, &dynamic_doc, config)?;
    static_doc.write_file(output_path)?;

    info!(
        "Wrote {} ({} entities appended, {} renamed)",
        output_path.display(),
        summary.appended,
        summary.renamed.len()
    );
    Ok(summary)
}
