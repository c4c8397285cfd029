//! Declaration emitters, one submodule per output file family.

pub mod components;
pub mod fetcher;
pub mod operations;
pub mod utils;

use std::collections::HashSet;

use openapi_typegen_core::Info;

use crate::types::Declaration;

/// Declarations of one file, unique by name. A repeated name keeps the
/// first declaration and logs a warning.
#[derive(Debug, Default)]
pub(crate) struct Declarations {
    items: Vec<Declaration>,
    names: HashSet<String>,
}

impl Declarations {
    pub(crate) fn push(&mut self, declaration: Declaration) {
        if self.names.insert(declaration.name().to_string()) {
            self.items.push(declaration);
        } else {
            tracing::warn!(
                name = declaration.name(),
                "duplicate declaration name; keeping the first"
            );
        }
    }

    pub(crate) fn extend(&mut self, declarations: impl IntoIterator<Item = Declaration>) {
        for declaration in declarations {
            self.push(declaration);
        }
    }

    pub(crate) fn into_inner(self) -> Vec<Declaration> {
        self.items
    }
}

/// Header comment placed at the top of every generated file.
pub fn header(info: &Info) -> String {
    let mut header = String::from("Generated by openapi-typegen");
    if !info.version.is_empty() {
        header.push_str(&format!("\n\n@version {}", info.version));
    }
    header
}
