//! Post-processing for URDF robot descriptions.
//!
//! - [`rename()`] gives auto-generated joints and links readable names
//!   (`<joint>_joint`, `<joint>_link`).
//! - [`resize()`] additionally rescales lengths, masses, inertias, efforts and
//!   damping, derives mimic joint limits and optionally fixes mimic joints.
//! - [`print_tree()`] lists the actuated joints as an indented tree.
//!
//! Passes edit attribute values in place; everything else in the file,
//! including comments and indentation, is written back untouched.

use camino::{Utf8Path, Utf8PathBuf};
use pest_derive::Parser;

pub mod config;
pub mod document;
pub mod errors;
pub mod log;
pub mod mimic;
mod number;
pub mod relations;
pub mod rename;
pub mod resize;
pub mod scan;
pub mod tree;

pub use config::{Config, Quantity};
pub use document::Document;
pub use errors::{ScanError, SourceContext, UrdfError};
pub use number::format_number;
pub use tree::{KinematicTree, TreeLine, TreeListing};

#[derive(Parser)]
#[grammar = "urdf.pest"]
pub struct UrdfParser;

pub const URDF_EXTENSION: &str = "urdf";

/// Rename joints and their child links.
///
/// `name` is only used in diagnostics.
pub fn rename(name: &str, source: &str) -> Result<String, UrdfError> {
    let doc = Document::parse(name, source)?;
    let links = relations::joint_links(&doc)?;
    log::info!(file = name, joints = links.len(), "renaming");
    Ok(rename::rename_identifiers(&doc, &links))
}

/// Rename, rescale, derive mimic limits and (if configured) fix mimic joints.
pub fn resize(name: &str, source: &str, config: &Config) -> Result<String, UrdfError> {
    config.validate()?;

    let renamed = rename(name, source)?;
    let doc = Document::parse(name, renamed)?;
    let resized = resize::resize_quantities(&doc, config)?;

    let doc = Document::parse(name, resized)?;
    let limits = mimic::joint_limits(&doc)?;
    let adjusted = mimic::adjust_mimic_limits(&doc, &limits, config.mimic_margin)?;

    if !config.fix_mimic_joints {
        return Ok(adjusted);
    }
    let doc = Document::parse(name, adjusted)?;
    mimic::fix_mimic_joints(&doc)
}

/// List the joints reachable from `config.root_link`
pub fn print_tree(name: &str, source: &str, config: &Config) -> Result<TreeListing, UrdfError> {
    let doc = Document::parse(name, source)?;
    KinematicTree::from_document(&doc)?.listing(&config.root_link)
}

/// Where the output for `path` goes: `robot.urdf` becomes `robot_.urdf`
pub fn output_path(path: &Utf8Path) -> Utf8PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{stem}_.{ext}"),
        None => format!("{stem}_"),
    };
    path.with_file_name(file_name)
}

/// Whether `path` looks like something [`output_path`] produced
pub fn is_tidied_output(path: &Utf8Path) -> bool {
    path.extension() == Some(URDF_EXTENSION)
        && path.file_stem().is_some_and(|stem| stem.ends_with('_'))
}
