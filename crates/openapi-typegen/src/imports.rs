//! Import analysis.
//!
//! Imports are derived from the declarations a file actually contains, so a
//! file only imports what it references. Whether a symbol is needed at
//! runtime decides between `import` and `import type`.

use std::ops::ControlFlow;

use indexmap::IndexMap;

use crate::config::{Config, FileKind};
use crate::operation::ERROR_WRAPPER;
use crate::types::{Declaration, Import, ImportClause, NamedImport, Namespace, Qualifier};
use crate::walk::{walk_declarations, Position, Symbol, Visitor};

/// Module the query hooks are generated against.
pub const REACT_QUERY_MODULE: &str = "@tanstack/react-query";

/// Alias the generated hooks use for [`REACT_QUERY_MODULE`].
pub const REACT_QUERY_ALIAS: &str = "reactQuery";

/// How a symbol is used across a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Only in type positions, or not at all.
    TypeOnly,
    /// At least once at runtime.
    Value,
}

impl From<Position> for Usage {
    fn from(position: Position) -> Self {
        match position {
            Position::Type => Self::TypeOnly,
            Position::Value => Self::Value,
        }
    }
}

struct FindValueUse<'s> {
    symbol: &'s str,
}

impl<'a> Visitor<'a> for FindValueUse<'_> {
    type Break = ();

    fn visit(&mut self, symbol: Symbol<'a>) -> ControlFlow<()> {
        if symbol.position() == Position::Value && symbol.root() == self.symbol {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Classify how `symbol` is used in `declarations`. Stops at the first
/// value use; a symbol that never appears is [`Usage::TypeOnly`].
pub fn classify_usage(declarations: &[Declaration], symbol: &str) -> Usage {
    match walk_declarations(declarations, &mut FindValueUse { symbol }) {
        ControlFlow::Break(()) => Usage::Value,
        ControlFlow::Continue(()) => Usage::TypeOnly,
    }
}

#[derive(Default)]
struct UsedSymbols<'a> {
    roots: IndexMap<&'a str, Position>,
    utils: Vec<&'a str>,
}

impl<'a> Visitor<'a> for UsedSymbols<'a> {
    type Break = ();

    fn visit(&mut self, symbol: Symbol<'a>) -> ControlFlow<()> {
        let position = self.roots.entry(symbol.root()).or_insert(symbol.position());
        *position = (*position).max(symbol.position());
        if let Symbol::Type(reference) = symbol {
            if reference.qualifier == Some(Qualifier::Namespace(Namespace::Utils))
                && !self.utils.contains(&reference.name.as_str())
            {
                self.utils.push(&reference.name);
            }
        }
        ControlFlow::Continue(())
    }
}

fn used_symbols(declarations: &[Declaration]) -> UsedSymbols<'_> {
    let mut used = UsedSymbols::default();
    let _ = walk_declarations(declarations, &mut used);
    used
}

fn module_path(config: &Config, kind: FileKind) -> String {
    format!("./{}", config.filename(kind))
}

/// Imports needed by a file declaring `declarations`.
///
/// `own` is the namespace the file declares, whose references are bare and
/// never imported; `None` marks the operations file, which additionally
/// imports the fetcher and context modules and react-query.
///
/// Order: component namespaces, utils, fetcher, context, react-query.
pub fn used_imports(
    declarations: &[Declaration],
    own: Option<Namespace>,
    config: &Config,
) -> Vec<Import> {
    let used = used_symbols(declarations);
    let mut imports = Vec::new();

    for namespace in Namespace::COMPONENTS {
        let Some(alias) = namespace.alias() else {
            continue;
        };
        if Some(namespace) != own && used.roots.contains_key(alias) {
            imports.push(Import {
                clause: ImportClause::Namespace(alias.to_string()),
                from: module_path(config, namespace.file_kind()),
                type_only: true,
            });
        }
    }

    if own != Some(Namespace::Utils) && !used.utils.is_empty() {
        imports.push(Import {
            clause: ImportClause::Named(
                used.utils
                    .iter()
                    .map(|name| NamedImport {
                        name: (*name).to_string(),
                        type_only: true,
                    })
                    .collect(),
            ),
            from: module_path(config, FileKind::Utils),
            type_only: true,
        });
    }

    if own.is_none() {
        let fetcher = [
            config.fetcher_fn(),
            config.extra_props_type(),
            ERROR_WRAPPER.to_string(),
        ];
        imports.extend(named_import(&used, &fetcher, module_path(config, FileKind::Fetcher)));
        imports.extend(named_import(
            &used,
            &[config.context_hook()],
            module_path(config, FileKind::Context),
        ));
        if let Some(&position) = used.roots.get(REACT_QUERY_ALIAS) {
            imports.push(Import {
                clause: ImportClause::Namespace(REACT_QUERY_ALIAS.to_string()),
                from: REACT_QUERY_MODULE.to_string(),
                type_only: Usage::from(position) == Usage::TypeOnly,
            });
        }
    }
    imports
}

/// `import { a, type B } from "<from>"` for the used subset of `names`;
/// the whole statement becomes `import type` when nothing is a value.
fn named_import(used: &UsedSymbols<'_>, names: &[String], from: String) -> Option<Import> {
    let specifiers: Vec<NamedImport> = names
        .iter()
        .filter_map(|name| {
            used.roots.get(name.as_str()).map(|&position| NamedImport {
                name: name.clone(),
                type_only: Usage::from(position) == Usage::TypeOnly,
            })
        })
        .collect();
    if specifiers.is_empty() {
        return None;
    }
    let type_only = specifiers.iter().all(|s| s.type_only);
    Some(Import {
        clause: ImportClause::Named(specifiers),
        from,
        type_only,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::Emit;
    use crate::types::{Expr, FunctionBody, FunctionDeclaration, Member, Param, TypeExpr};
    use pretty_assertions::assert_eq;

    fn render(imports: &[Import]) -> String {
        imports.iter().map(Emit::emit).collect()
    }

    fn fetch_function() -> Declaration {
        Declaration::Function(FunctionDeclaration {
            name: "fetchListPets".into(),
            type_params: Vec::new(),
            params: vec![Param::typed(
                "variables",
                TypeExpr::reference("ApiFetcherExtraProps"),
            )],
            body: FunctionBody::Expr(
                Expr::ident("apiFetch").call(vec![TypeExpr::reference("ListPetsError")], Vec::new()),
            ),
            doc: None,
        })
    }

    #[test]
    fn value_use_wins_over_type_use() {
        let declarations = vec![
            Declaration::alias("X", TypeExpr::reference("apiFetch"), None),
            fetch_function(),
        ];
        assert_eq!(classify_usage(&declarations, "apiFetch"), Usage::Value);
        assert_eq!(
            classify_usage(&declarations, "ApiFetcherExtraProps"),
            Usage::TypeOnly
        );
        assert_eq!(classify_usage(&declarations, "missing"), Usage::TypeOnly);
    }

    #[test]
    fn only_referenced_namespaces_are_imported() {
        let declarations = vec![Declaration::alias(
            "AddPetVariables",
            TypeExpr::object(vec![Member::new(
                "body",
                TypeExpr::qualified(Namespace::RequestBodies, "PetBody"),
                false,
            )]),
            None,
        )];
        let imports = used_imports(&declarations, None, &Config::default());
        assert_eq!(
            render(&imports),
            "import type * as RequestBodies from \"./apiRequestBodies\";\n"
        );
    }

    #[test]
    fn own_namespace_is_not_imported() {
        let declarations = vec![Declaration::alias(
            "Pets",
            TypeExpr::array(TypeExpr::union([
                TypeExpr::reference("Pet"),
                TypeExpr::qualified(Namespace::Schemas, "Pet"),
            ])),
            None,
        )];
        assert!(used_imports(&declarations, Some(Namespace::Schemas), &Config::default()).is_empty());
    }

    #[test]
    fn utils_and_fetcher_imports() {
        let declarations = vec![
            Declaration::alias(
                "ListPetsError",
                TypeExpr::generic(
                    "ErrorWrapper",
                    vec![TypeExpr::qualified(Namespace::Utils, "ClientErrorStatus")],
                ),
                None,
            ),
            fetch_function(),
        ];
        let imports = used_imports(&declarations, None, &Config::default());
        assert_eq!(
            render(&imports),
            "import type { ClientErrorStatus } from \"./apiUtils\";\n\
             import { apiFetch, type ApiFetcherExtraProps, type ErrorWrapper } from \"./apiFetcher\";\n"
        );
    }

    #[test]
    fn react_query_namespace_import() {
        let declarations = vec![Declaration::Function(FunctionDeclaration {
            name: "useListPets".into(),
            type_params: Vec::new(),
            params: Vec::new(),
            body: FunctionBody::Expr(
                Expr::member(Expr::ident(REACT_QUERY_ALIAS), "useQuery").call(Vec::new(), Vec::new()),
            ),
            doc: None,
        })];
        let imports = used_imports(&declarations, None, &Config::default());
        assert_eq!(
            render(&imports),
            "import * as reactQuery from \"@tanstack/react-query\";\n"
        );
    }
}
