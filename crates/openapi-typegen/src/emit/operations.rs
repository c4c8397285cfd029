//! The operations file: per-operation types, a fetch function and a
//! react-query hook, plus the `QueryOperation` union used for cache keys.

use std::collections::HashSet;

use openapi_typegen_core::{Document, HttpMethod, Operation};
use serde_json::Value;

use crate::config::Config;
use crate::doc::operation_doc;
use crate::error::{Error, Result};
use crate::imports::REACT_QUERY_ALIAS;
use crate::operation::{self, derive, url_template, OperationTypes};
use crate::resolve::Resolver;
use crate::synth::Context;
use crate::types::{
    Arrow, Binding, Declaration, Expr, FunctionBody, FunctionDeclaration, Member, Param, Prop,
    Statement, TypeExpr, TypeParam,
};

use super::Declarations;

/// Operation extension selecting the hook shape.
pub const COMPONENT_OVERRIDE: &str = "x-openapi-typegen-component";

/// Name of the trailing union of query operations.
pub const QUERY_OPERATION: &str = "QueryOperation";

/// Which react-query hook wraps an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrapper {
    /// `useQuery`
    Query,
    /// `useMutation`
    Mutate,
}

impl Wrapper {
    /// GET operations are queries, everything else mutates, unless the
    /// operation overrides it with [`COMPONENT_OVERRIDE`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidComponentOverride`] for values other than
    /// `useQuery` and `useMutate`.
    pub fn of(operation_id: &str, method: HttpMethod, operation: &Operation) -> Result<Self> {
        match operation.extensions.get(COMPONENT_OVERRIDE) {
            None => Ok(if method == HttpMethod::Get {
                Self::Query
            } else {
                Self::Mutate
            }),
            Some(Value::String(value)) if value == "useQuery" => Ok(Self::Query),
            Some(Value::String(value)) if value == "useMutate" => Ok(Self::Mutate),
            Some(other) => Err(Error::InvalidComponentOverride {
                operation_id: operation_id.to_string(),
                value: match other {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            }),
        }
    }
}

/// Everything the wrappers of one operation need.
struct Wrapped<'o> {
    id: &'o str,
    prefix: String,
    path: String,
    method: HttpMethod,
    types: &'o OperationTypes,
    doc: Option<String>,
}

impl Wrapped<'_> {
    fn fetch_name(&self) -> String {
        format!("fetch{}", self.prefix)
    }

    fn hook_name(&self) -> String {
        format!("use{}", self.prefix)
    }

    fn has_variables(&self) -> bool {
        !self.types.variables.is_void()
    }

    /// `fetchOp({ ...fetcherOptions, ...variables }, signal)`
    fn fetch_call(&self, signal: bool) -> Expr {
        let mut props = vec![Prop::Spread(Expr::ident("fetcherOptions"))];
        if self.has_variables() {
            props.push(Prop::Spread(Expr::ident("variables")));
        }
        let mut args = Vec::new();
        if self.has_variables() {
            args.push(Expr::Object(props));
        }
        if signal {
            args.push(Expr::ident("signal"));
        }
        Expr::ident(self.fetch_name()).call(Vec::new(), args)
    }
}

/// `T`, or the given placeholder when `T` is `void`.
fn or_placeholder(ty: &TypeExpr, placeholder: TypeExpr) -> TypeExpr {
    if ty.is_void() {
        placeholder
    } else {
        ty.clone()
    }
}

fn string_union(values: &[&str]) -> TypeExpr {
    TypeExpr::union(values.iter().map(|v| TypeExpr::string_literal(*v)))
}

/// Declarations of the operations file, in document order.
///
/// # Errors
///
/// [`Error::DuplicateOperationId`] when two ids are equal or differ only in
/// casing, [`Error::InvalidComponentOverride`], and reference or enum
/// errors from synthesis.
pub fn operations(
    document: &Document,
    resolver: Resolver<'_>,
    config: &Config,
) -> Result<Vec<Declaration>> {
    let ctx = Context::new(resolver, None, config.use_enums);
    let extra_props = TypeExpr::reference(config.extra_props_type());
    let mut out = Declarations::default();
    let mut seen = HashSet::new();
    let mut query_operations = Vec::new();

    for (path, method, path_item, op) in document.operations() {
        let id = operation::operation_id(path, method, op);
        // `listPets` and `list_pets` would declare the same names.
        if !seen.insert(operation::type_prefix(&id)) {
            return Err(Error::DuplicateOperationId { operation_id: id });
        }
        let wrapper = Wrapper::of(&id, method, op)?;
        tracing::debug!(operation_id = id.as_str(), ?wrapper, "deriving operation");

        let types = derive(&id, path_item, op, &ctx, config, &extra_props)?;
        out.extend(types.declarations.iter().cloned());

        let wrapped = Wrapped {
            id: &id,
            prefix: operation::type_prefix(&id),
            path: url_template(path),
            method,
            types: &types,
            doc: operation_doc(op),
        };
        out.push(fetch_function(&wrapped, config));
        match wrapper {
            Wrapper::Query => {
                out.push(query_hook(&wrapped, config));
                query_operations.push(TypeExpr::object(vec![
                    Member::new("path", TypeExpr::string_literal(wrapped.path.clone()), false),
                    Member::new("operationId", TypeExpr::string_literal(id.clone()), false),
                    Member::new("variables", types.variables.clone(), false),
                ]));
            }
            Wrapper::Mutate => out.push(mutation_hook(&wrapped, config)),
        }
    }

    let query_operation = if query_operations.is_empty() {
        TypeExpr::object(vec![
            Member::new("path", TypeExpr::string(), false),
            Member::new("operationId", TypeExpr::Never, false),
            Member::new("variables", TypeExpr::Unknown, false),
        ])
    } else {
        TypeExpr::union(query_operations)
    };
    out.push(Declaration::alias(QUERY_OPERATION, query_operation, None));
    Ok(out.into_inner())
}

/// `export const fetchOp = (variables, signal?) => prefixFetch<...>({ ... });`
fn fetch_function(op: &Wrapped<'_>, config: &Config) -> Declaration {
    let types = op.types;
    let type_args = vec![
        types.data.clone(),
        types.error.clone(),
        or_placeholder(&types.request_body, TypeExpr::undefined()),
        or_placeholder(&types.headers, TypeExpr::object(Vec::new())),
        or_placeholder(&types.query_params, TypeExpr::object(Vec::new())),
        or_placeholder(&types.path_params, TypeExpr::object(Vec::new())),
    ];

    let mut params = Vec::new();
    let mut props = vec![
        Prop::KeyValue("url".into(), Expr::string(op.path.clone())),
        Prop::KeyValue("method".into(), Expr::string(op.method.as_str())),
    ];
    if op.has_variables() {
        params.push(Param::typed("variables", types.variables.clone()));
        props.push(Prop::Spread(Expr::ident("variables")));
    }
    params.push(Param::optional("signal", TypeExpr::reference("AbortSignal")));
    props.push(Prop::Shorthand("signal".into()));

    Declaration::Function(FunctionDeclaration {
        name: op.fetch_name(),
        type_params: Vec::new(),
        params,
        body: FunctionBody::Expr(
            Expr::ident(config.fetcher_fn()).call(type_args, vec![Expr::Object(props)]),
        ),
        doc: op.doc.clone(),
    })
}

fn react_query(name: &str) -> Expr {
    Expr::member(Expr::ident(REACT_QUERY_ALIAS), name)
}

/// `export const useOp = <TData = Data>(variables, options?) => { ... };`
fn query_hook(op: &Wrapped<'_>, config: &Config) -> Declaration {
    let types = op.types;
    let generics = vec![
        types.data.clone(),
        types.error.clone(),
        TypeExpr::reference("TData"),
    ];
    let options = TypeExpr::generic(
        "Omit",
        vec![
            TypeExpr::module(REACT_QUERY_ALIAS, "UseQueryOptions", generics.clone()),
            string_union(&["queryKey", "queryFn", "initialData"]),
        ],
    );

    let mut params = Vec::new();
    if op.has_variables() {
        params.push(Param::typed("variables", types.variables.clone()));
    }
    params.push(Param::optional("options", options));

    let key_variables = if op.has_variables() {
        Prop::Shorthand("variables".into())
    } else {
        Prop::KeyValue("variables".into(), Expr::Object(Vec::new()))
    };
    let query_key = Expr::ident("queryKeyFn").call(
        Vec::new(),
        vec![Expr::Object(vec![
            Prop::KeyValue("path".into(), Expr::string(op.path.clone())),
            Prop::KeyValue("operationId".into(), Expr::string(op.id)),
            key_variables,
        ])],
    );
    let query_fn = Expr::Arrow(Box::new(Arrow {
        params: vec![Param {
            binding: Binding::Destructure(vec!["signal".into()]),
            ty: None,
            optional: false,
        }],
        body: op.fetch_call(true),
    }));

    let body = vec![
        Statement::Const {
            binding: Binding::Destructure(vec![
                "fetcherOptions".into(),
                "queryOptions".into(),
                "queryKeyFn".into(),
            ]),
            init: Expr::ident(config.context_hook()).call(Vec::new(), vec![Expr::ident("options")]),
        },
        Statement::Return(react_query("useQuery").call(
            generics,
            vec![Expr::Object(vec![
                Prop::KeyValue("queryKey".into(), query_key),
                Prop::KeyValue("queryFn".into(), query_fn),
                Prop::Spread(Expr::ident("options")),
                Prop::Spread(Expr::ident("queryOptions")),
            ])],
        )),
    ];

    Declaration::Function(FunctionDeclaration {
        name: op.hook_name(),
        type_params: vec![TypeParam {
            name: "TData".into(),
            default: Some(types.data.clone()),
        }],
        params,
        body: FunctionBody::Block(body),
        doc: op.doc.clone(),
    })
}

/// `export const useOp = (options?) => { ... };`
fn mutation_hook(op: &Wrapped<'_>, config: &Config) -> Declaration {
    let types = op.types;
    let generics = vec![
        types.data.clone(),
        types.error.clone(),
        types.variables.clone(),
    ];
    let options = TypeExpr::generic(
        "Omit",
        vec![
            TypeExpr::module(REACT_QUERY_ALIAS, "UseMutationOptions", generics.clone()),
            TypeExpr::string_literal("mutationFn"),
        ],
    );

    let mutation_params = if op.has_variables() {
        vec![Param::typed("variables", types.variables.clone())]
    } else {
        Vec::new()
    };
    let mutation_fn = Expr::Arrow(Box::new(Arrow {
        params: mutation_params,
        body: op.fetch_call(false),
    }));

    let body = vec![
        Statement::Const {
            binding: Binding::Destructure(vec!["fetcherOptions".into()]),
            init: Expr::ident(config.context_hook()).call(Vec::new(), Vec::new()),
        },
        Statement::Return(react_query("useMutation").call(
            generics,
            vec![Expr::Object(vec![
                Prop::KeyValue("mutationFn".into(), mutation_fn),
                Prop::Spread(Expr::ident("options")),
            ])],
        )),
    ];

    Declaration::Function(FunctionDeclaration {
        name: op.hook_name(),
        type_params: Vec::new(),
        params: vec![Param::optional("options", options)],
        body: FunctionBody::Block(body),
        doc: op.doc.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::Emit;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn generate(yaml: &str) -> Result<Vec<Declaration>> {
        let doc = Document::from_yaml_str(yaml).unwrap();
        operations(&doc, Resolver::new(&doc.components), &Config::default())
    }

    fn find<'d>(decls: &'d [Declaration], name: &str) -> &'d Declaration {
        decls
            .iter()
            .find(|d| d.name() == name)
            .unwrap_or_else(|| panic!("no declaration {name}"))
    }

    const PETS: &str = indoc! {"
        paths:
          /pets/{pet_id}:
            get:
              operationId: showPet
              summary: Show a pet
              parameters:
                - {name: pet_id, in: path, required: true, schema: {type: string}}
              responses:
                '200':
                  content:
                    application/json:
                      schema: {type: string}
            delete:
              operationId: deletePet
              parameters:
                - {name: pet_id, in: path, required: true, schema: {type: string}}
              responses:
                '204': {description: gone}
    "};

    #[test]
    fn fetch_function_shape() {
        let decls = generate(PETS).unwrap();
        assert_eq!(
            find(&decls, "fetchShowPet").emit(),
            indoc! {r#"
                /**
                 * Show a pet
                 */
                export const fetchShowPet = (variables: ShowPetVariables, signal?: AbortSignal) =>
                  apiFetch<string, ShowPetError, undefined, {}, {}, ShowPetPathParams>({
                    url: "/pets/{petId}",
                    method: "get",
                    ...variables,
                    signal,
                  });
            "#}
        );
    }

    #[test]
    fn query_hook_shape() {
        let decls = generate(PETS).unwrap();
        assert_eq!(
            find(&decls, "useShowPet").emit(),
            indoc! {r#"
                /**
                 * Show a pet
                 */
                export const useShowPet = <TData = string>(variables: ShowPetVariables, options?: Omit<reactQuery.UseQueryOptions<string, ShowPetError, TData>, "queryKey" | "queryFn" | "initialData">) => {
                  const { fetcherOptions, queryOptions, queryKeyFn } = useApiContext(options);
                  return reactQuery.useQuery<string, ShowPetError, TData>({
                    queryKey: queryKeyFn({ path: "/pets/{petId}", operationId: "showPet", variables }),
                    queryFn: ({ signal }) => fetchShowPet({ ...fetcherOptions, ...variables }, signal),
                    ...options,
                    ...queryOptions,
                  });
                };
            "#}
        );
    }

    #[test]
    fn mutation_hook_shape() {
        let decls = generate(PETS).unwrap();
        assert_eq!(
            find(&decls, "useDeletePet").emit(),
            indoc! {r#"
                export const useDeletePet = (options?: Omit<reactQuery.UseMutationOptions<void, DeletePetError, DeletePetVariables>, "mutationFn">) => {
                  const { fetcherOptions } = useApiContext();
                  return reactQuery.useMutation<void, DeletePetError, DeletePetVariables>({
                    mutationFn: (variables: DeletePetVariables) => fetchDeletePet({ ...fetcherOptions, ...variables }),
                    ...options,
                  });
                };
            "#}
        );
    }

    #[test]
    fn query_operation_union() {
        let decls = generate(PETS).unwrap();
        assert_eq!(
            decls.last().unwrap().emit(),
            indoc! {r#"
                export type QueryOperation = {
                  path: "/pets/{petId}";
                  operationId: "showPet";
                  variables: ShowPetVariables;
                };
            "#}
        );
    }

    #[test]
    fn placeholder_without_queries() {
        let decls = generate("paths:\n  /pets:\n    post:\n      responses: {}\n").unwrap();
        assert_eq!(
            decls.last().unwrap().emit(),
            "export type QueryOperation = {\n  path: string;\n  operationId: never;\n  variables: unknown;\n};\n"
        );
        assert!(decls.iter().any(|d| d.name() == "usePostPets"));
    }

    #[test]
    fn override_selects_wrapper() {
        let decls = generate(indoc! {"
            paths:
              /search:
                post:
                  operationId: search
                  x-openapi-typegen-component: useQuery
                  responses: {}
        "})
        .unwrap();
        assert!(matches!(
            find(&decls, "useSearch"),
            Declaration::Function(f) if !f.type_params.is_empty()
        ));
    }

    #[test]
    fn invalid_override_is_fatal() {
        let err = generate(indoc! {"
            paths:
              /search:
                post:
                  operationId: search
                  x-openapi-typegen-component: useInfinite
                  responses: {}
        "})
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidComponentOverride { ref operation_id, ref value }
                if operation_id == "search" && value == "useInfinite"
        ));
    }

    #[test]
    fn duplicate_operation_ids_are_fatal() {
        let err = generate(indoc! {"
            paths:
              /a:
                get: {operationId: same, responses: {}}
              /b:
                get: {operationId: same, responses: {}}
        "})
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateOperationId { .. }));
    }

    #[test]
    fn ids_differing_only_in_case_are_duplicates() {
        let err = generate(indoc! {"
            paths:
              /a:
                get: {operationId: listPets, responses: {}}
              /b:
                get: {operationId: list_pets, responses: {}}
        "})
        .unwrap_err();
        assert!(
            matches!(err, Error::DuplicateOperationId { ref operation_id } if operation_id == "list_pets"),
            "unexpected error: {err}"
        );
    }
}
