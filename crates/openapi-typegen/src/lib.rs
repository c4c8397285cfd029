#![allow(clippy::doc_markdown)] // README uses "OpenAPI" and "TypeScript" proper nouns throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod doc;
mod emit;
mod enum_name;
mod error;
mod imports;
mod media;
mod merge;
mod operation;
pub mod print;
mod resolve;
mod synth;
pub mod types;
mod walk;

use std::path::Path;

use openapi_typegen_core::Document;

pub use config::{Config, FileKind, FilenameCase};
pub use error::{Error, Result};
pub use print::Emit;
pub use types::GeneratedFile;

use crate::types::{Declaration, ImportClause, Namespace};

/// Load an OpenAPI document; `.json` files are parsed as JSON, anything
/// else as YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(Document::from_json_str(&content)?)
    } else {
        Ok(Document::from_yaml_str(&content)?)
    }
}

/// Compile a document into TypeScript declaration files.
///
/// Files come out in a fixed order: schemas, parameters, requestBodies,
/// responses, utils, the operations (`components`) file, then the starter
/// fetcher and context files when `emit_fetcher` is set. Component
/// files with no declarations are omitted, as is the utils file when no
/// status range helper is referenced and the operations file when the
/// document has no operations.
///
/// # Phase Ordering
///
/// - **Components**: each `components` namespace synthesizes into its own
///   file; references into other namespaces stay qualified.
/// - **Operations**: per-operation types, fetch functions and hooks.
/// - **Imports**: computed from each file's finished declarations, so every
///   file imports exactly what it references.
/// - **Utils**: from the helper names the other files import.
/// - **Starters**: the fetcher and context templates, on request.
///
/// # Errors
///
/// Any [`Error`] raised while resolving references, synthesizing types or
/// validating operations. Generation stops at the first one.
pub fn generate(document: &Document, config: &Config) -> Result<Vec<GeneratedFile>> {
    let resolver = resolve::Resolver::new(&document.components);
    let header = emit::header(&document.info);

    // Phase 1: component namespaces
    let mut sections: Vec<(FileKind, Option<Namespace>, Vec<Declaration>)> = vec![
        (
            FileKind::Schemas,
            Some(Namespace::Schemas),
            emit::components::schemas(resolver, config)?,
        ),
        (
            FileKind::Parameters,
            Some(Namespace::Parameters),
            emit::components::parameters(resolver, config)?,
        ),
        (
            FileKind::RequestBodies,
            Some(Namespace::RequestBodies),
            emit::components::request_bodies(resolver, config)?,
        ),
        (
            FileKind::Responses,
            Some(Namespace::Responses),
            emit::components::responses(resolver, config)?,
        ),
    ];

    // Phase 2: operations
    if document.operations().next().is_some() {
        sections.push((
            FileKind::Components,
            None,
            emit::operations::operations(document, resolver, config)?,
        ));
    }

    // Phase 3: imports
    let mut files: Vec<GeneratedFile> = sections
        .into_iter()
        .filter(|(_, _, declarations)| !declarations.is_empty())
        .map(|(kind, namespace, declarations)| GeneratedFile {
            kind,
            filename: config.filename(kind),
            header: Some(header.clone()),
            imports: imports::used_imports(&declarations, namespace, config),
            declarations,
        })
        .collect();

    // Phase 4: utils
    let utils_module = format!("./{}", config.filename(FileKind::Utils));
    let mut used_utils: Vec<String> = Vec::new();
    for import in files.iter().flat_map(|f| &f.imports) {
        let ImportClause::Named(names) = &import.clause else {
            continue;
        };
        if import.from != utils_module {
            continue;
        }
        for name in names {
            if !used_utils.contains(&name.name) {
                used_utils.push(name.name.clone());
            }
        }
    }
    let utils = emit::utils::utils(&used_utils);
    if !utils.is_empty() {
        let position = files
            .iter()
            .position(|f| f.kind == FileKind::Components)
            .unwrap_or(files.len());
        files.insert(
            position,
            GeneratedFile {
                kind: FileKind::Utils,
                filename: config.filename(FileKind::Utils),
                header: Some(header.clone()),
                imports: Vec::new(),
                declarations: utils,
            },
        );
    }

    // Phase 5: starter fetcher and context
    if config.emit_fetcher {
        files.push(GeneratedFile {
            kind: FileKind::Fetcher,
            filename: config.filename(FileKind::Fetcher),
            header: Some(header.clone()),
            imports: Vec::new(),
            declarations: emit::fetcher::fetcher(config),
        });
        let (imports, declarations) = emit::fetcher::context(config);
        files.push(GeneratedFile {
            kind: FileKind::Context,
            filename: config.filename(FileKind::Context),
            header: Some(header),
            imports,
            declarations,
        });
    }

    for file in &files {
        tracing::debug!(
            file = file.filename.as_str(),
            declarations = file.declarations.len(),
            imports = file.imports.len(),
            "generated file"
        );
    }
    Ok(files)
}

/// Internal types for advanced use and testing.
///
/// **Not covered by semver guarantees.** These re-exports are `#[doc(hidden)]`
/// and may change in any release, including patch versions. They exist for
/// integration testing and advanced use cases only.
#[doc(hidden)]
pub mod internal {
    pub use crate::emit::fetcher::{context, fetcher};
    pub use crate::emit::operations::{Wrapper, COMPONENT_OVERRIDE, QUERY_OPERATION};
    pub use crate::enum_name::{enum_members, literal, member_name, number_to_words};
    pub use crate::imports::{classify_usage, used_imports, Usage};
    pub use crate::media::compatible;
    pub use crate::merge::{is_never, merge, merge_all, Merged, NEVER_MARKER};
    pub use crate::operation::status::{DeclaredStatuses, StatusKey};
    pub use crate::operation::{derive, operation_id, url_template, OperationTypes};
    pub use crate::resolve::{Node, Pointer, Resolver};
    pub use crate::synth::{nested_enums, synthesize, synthesize_schema, type_name, Context};
    pub use crate::walk::{walk_declarations, Position, Symbol, Visitor};
}
