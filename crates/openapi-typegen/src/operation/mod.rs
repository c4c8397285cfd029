//! Per-operation type derivation.
//!
//! [`derive`] turns one operation into the types its fetch function and
//! hook are generic over: success data, error union, request body,
//! parameter groups and the combined variables object. Types worth naming
//! are hoisted into `<Op>…` declarations and replaced by references.

pub mod params;
pub mod status;

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use openapi_typegen_core::{
    HttpMethod, Operation, ParameterLocation, PathItem, RefOr, RequestBody, Response,
};

use crate::config::Config;
use crate::error::Result;
use crate::media;
use crate::resolve::Pointer;
use crate::synth::{component_reference, synthesize, Context};
use crate::types::{Declaration, Member, Namespace, TypeExpr};

use self::status::{DeclaredStatuses, StatusKey};

/// Name of the error wrapper type exported by the fetcher module.
pub const ERROR_WRAPPER: &str = "ErrorWrapper";

/// Everything derived from one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationTypes {
    /// Success payload; `void` when no 2xx response has a body.
    pub data: TypeExpr,
    /// `<Op>Error` reference.
    pub error: TypeExpr,
    /// Request body type; `void` when there is none.
    pub request_body: TypeExpr,
    /// Path parameter object; `void` when there are none.
    pub path_params: TypeExpr,
    /// Query parameter object; `void` when there are none.
    pub query_params: TypeExpr,
    /// Header object; `void` when there are none.
    pub headers: TypeExpr,
    /// Combined variables; `void` when the operation takes no input.
    pub variables: TypeExpr,
    /// Hoisted declarations in output order.
    pub declarations: Vec<Declaration>,
}

/// `operationId`, or `<verb><PascalPath>` when the document has none.
pub fn operation_id(path: &str, method: HttpMethod, operation: &Operation) -> String {
    operation.operation_id.clone().unwrap_or_else(|| {
        let words = path.replace(['{', '}'], " ");
        format!("{} {words}", method.as_str()).to_lower_camel_case()
    })
}

/// Prefix shared by every type derived from `operation_id`.
pub fn type_prefix(operation_id: &str) -> String {
    operation_id.to_upper_camel_case()
}

/// URL template with path parameter names camelCased to match the
/// `pathParams` keys.
pub fn url_template(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..=open]);
        out.push_str(&rest[open + 1..open + close].to_lower_camel_case());
        out.push('}');
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Derive the types of one operation.
///
/// `extra_props` is intersected into the variables unless it is `void`.
///
/// # Errors
///
/// Reference and enum errors from synthesis.
pub fn derive(
    operation_id: &str,
    path_item: &PathItem,
    operation: &Operation,
    ctx: &Context<'_>,
    config: &Config,
    extra_props: &TypeExpr,
) -> Result<OperationTypes> {
    let prefix = type_prefix(operation_id);
    let mut declarations = Vec::new();
    let mut hoist = |suffix: &str, ty: TypeExpr, always: bool| {
        if always || ty.should_hoist() {
            let name = format!("{prefix}{suffix}");
            declarations.push(Declaration::alias(name.clone(), ty, None));
            TypeExpr::reference(name)
        } else {
            ty
        }
    };

    let parameters = params::merged(&path_item.parameters, &operation.parameters, &ctx.resolver())?;
    let path = params::group(&parameters, ParameterLocation::Path, ctx, config)?;
    let query = params::group(&parameters, ParameterLocation::Query, ctx, config)?;
    let headers = params::group(&parameters, ParameterLocation::Header, ctx, config)?;

    let path_params = hoist("PathParams", path.ty, false);
    let query_params = hoist("QueryParams", query.ty, false);
    let header_params = hoist("Headers", headers.ty, false);

    let error = hoist("Error", error_type(operation, ctx)?, true);
    let data = hoist("Response", data_type(operation, ctx)?, false);

    let (body, body_optional) = request_body(operation, ctx)?;
    let request_body = hoist("RequestBody", body, false);

    let mut members = Vec::new();
    for (name, ty, optional) in [
        ("body", &request_body, body_optional),
        ("pathParams", &path_params, path.optional),
        ("queryParams", &query_params, query.optional),
        ("headers", &header_params, headers.optional),
    ] {
        if !ty.is_void() {
            members.push(Member::new(name, ty.clone(), optional));
        }
    }
    let structural = if members.is_empty() {
        TypeExpr::Void
    } else {
        TypeExpr::object(members)
    };
    let combined = match (structural.is_void(), extra_props.is_void()) {
        (true, _) => extra_props.clone(),
        (false, true) => structural,
        (false, false) => TypeExpr::intersection([structural, extra_props.clone()]),
    };
    let variables = hoist("Variables", combined, false);

    Ok(OperationTypes {
        data,
        error,
        request_body,
        path_params,
        query_params,
        headers: header_params,
        variables,
        declarations,
    })
}

/// Payload type of a response: a component reference passes through,
/// inline responses use their compatible media type. `None` when there is
/// no usable body.
fn response_payload(response: &RefOr<Response>, ctx: &Context<'_>) -> Result<Option<TypeExpr>> {
    let response = match response {
        RefOr::Ref(r) => {
            let pointer = Pointer::parse(&r.ref_path)?;
            let target = ctx.resolver().response(&r.ref_path)?;
            if pointer.is_shallow() {
                return Ok(Some(component_reference(
                    Namespace::Responses,
                    &pointer.name,
                    ctx,
                )));
            }
            target
        }
        RefOr::Item(response) => response,
    };
    media::compatible(&response.content)
        .and_then(|m| m.schema.as_ref())
        .map(|schema| synthesize(schema, ctx))
        .transpose()
}

fn data_type(operation: &Operation, ctx: &Context<'_>) -> Result<TypeExpr> {
    let mut payloads = Vec::new();
    for (key, response) in &operation.responses {
        if !StatusKey::parse(key).is_some_and(StatusKey::is_success) {
            continue;
        }
        if let Some(payload) = response_payload(response, ctx)? {
            payloads.push(payload);
        }
    }
    Ok(if payloads.is_empty() {
        TypeExpr::Void
    } else {
        TypeExpr::union(payloads)
    })
}

fn error_type(operation: &Operation, ctx: &Context<'_>) -> Result<TypeExpr> {
    let mut keys = Vec::new();
    for (key, response) in &operation.responses {
        match StatusKey::parse(key) {
            Some(parsed) if parsed.is_success() => {}
            Some(parsed) => keys.push((parsed, response)),
            None => tracing::warn!(key = key.as_str(), "unsupported response key; skipping"),
        }
    }
    let declared = DeclaredStatuses::new(keys.iter().map(|(key, _)| *key));

    let mut variants = Vec::with_capacity(keys.len());
    for (key, response) in keys {
        let payload = response_payload(response, ctx)?.unwrap_or_else(TypeExpr::undefined);
        variants.push(TypeExpr::object(vec![
            Member::new("status", declared.discriminant(key), false),
            Member::new("payload", payload, false),
        ]));
    }
    let union = if variants.is_empty() {
        TypeExpr::undefined()
    } else {
        TypeExpr::union(variants)
    };
    Ok(TypeExpr::generic(ERROR_WRAPPER, vec![union]))
}

/// Request body type and whether the body may be omitted.
///
/// A body is optional when the document does not mark it required and its
/// schema requires no properties.
fn request_body(operation: &Operation, ctx: &Context<'_>) -> Result<(TypeExpr, bool)> {
    let Some(body) = &operation.request_body else {
        return Ok((TypeExpr::Void, true));
    };
    let resolved: &RequestBody = match body {
        RefOr::Ref(r) => ctx.resolver().request_body(&r.ref_path)?,
        RefOr::Item(body) => body,
    };
    let Some(schema) = media::compatible(&resolved.content).and_then(|m| m.schema.as_ref()) else {
        return Ok((TypeExpr::Void, true));
    };
    let optional = !resolved.required && ctx.resolver().schema_of(schema)?.required.is_empty();

    if let RefOr::Ref(r) = body {
        let pointer = Pointer::parse(&r.ref_path)?;
        if pointer.is_shallow() {
            let ty = component_reference(Namespace::RequestBodies, &pointer.name, ctx);
            return Ok((ty, optional));
        }
    }
    Ok((synthesize(schema, ctx)?, optional))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::Emit;
    use crate::resolve::Resolver;
    use indoc::indoc;
    use openapi_typegen_core::Document;
    use pretty_assertions::assert_eq;

    fn derive_first(yaml: &str, extra: &TypeExpr) -> OperationTypes {
        let doc = Document::from_yaml_str(yaml).unwrap();
        let (path, method, item, op) = doc.operations().next().unwrap();
        let ctx = Context::new(Resolver::new(&doc.components), None, false);
        let id = operation_id(path, method, op);
        derive(&id, item, op, &ctx, &Config::default(), extra).unwrap()
    }

    fn declaration(types: &OperationTypes, name: &str) -> String {
        types
            .declarations
            .iter()
            .find(|d| d.name() == name)
            .unwrap_or_else(|| panic!("no declaration {name}"))
            .emit()
            .trim_end()
            .to_string()
    }

    #[test]
    fn identical_success_payloads_collapse() {
        let types = derive_first(
            indoc! {"
                paths:
                  /pets:
                    get:
                      operationId: listPets
                      responses:
                        '200':
                          content:
                            application/json:
                              schema: {$ref: '#/components/schemas/Pet'}
                        '201':
                          content:
                            application/json:
                              schema: {$ref: '#/components/schemas/Pet'}
                components:
                  schemas:
                    Pet: {type: object}
            "},
            &TypeExpr::Void,
        );
        assert_eq!(types.data.emit(), "Schemas.Pet");
    }

    #[test]
    fn array_response_is_hoisted() {
        let types = derive_first(
            indoc! {"
                paths:
                  /pets:
                    get:
                      operationId: listPets
                      responses:
                        '200':
                          content:
                            application/json:
                              schema:
                                type: array
                                items: {type: string}
            "},
            &TypeExpr::Void,
        );
        assert_eq!(types.data.emit(), "ListPetsResponse");
        assert_eq!(
            declaration(&types, "ListPetsResponse"),
            "export type ListPetsResponse = string[];"
        );
    }

    #[test]
    fn error_union_uses_status_algebra() {
        let types = derive_first(
            indoc! {"
                paths:
                  /pets:
                    post:
                      operationId: addPet
                      responses:
                        '201':
                          description: created
                        '422':
                          $ref: '#/components/responses/Invalid'
                        4XX:
                          content:
                            application/json:
                              schema: {type: string}
                        default:
                          description: other
                components:
                  responses:
                    Invalid:
                      content:
                        application/json:
                          schema: {type: object}
            "},
            &TypeExpr::Void,
        );
        assert_eq!(types.error.emit(), "AddPetError");
        assert!(types.data.is_void());
        assert_eq!(
            declaration(&types, "AddPetError"),
            indoc! {"
                export type AddPetError = ErrorWrapper<{
                  status: 422;
                  payload: Responses.Invalid;
                } | {
                  status: Exclude<ClientErrorStatus, 422>;
                  payload: string;
                } | {
                  status: ServerErrorStatus;
                  payload: undefined;
                }>;"}
        );
    }

    #[test]
    fn no_error_responses() {
        let types = derive_first(
            "paths:\n  /ping:\n    get:\n      responses:\n        '204': {description: ok}\n",
            &TypeExpr::Void,
        );
        assert_eq!(
            declaration(&types, "GetPingError"),
            "export type GetPingError = ErrorWrapper<undefined>;"
        );
    }

    #[test]
    fn optional_query_params_only() {
        let types = derive_first(
            indoc! {"
                paths:
                  /pets:
                    get:
                      operationId: listPets
                      parameters:
                        - {name: limit, in: query, schema: {type: integer}}
                      responses: {}
            "},
            &TypeExpr::Void,
        );
        assert_eq!(
            declaration(&types, "ListPetsVariables"),
            "export type ListPetsVariables = {\n  queryParams?: ListPetsQueryParams;\n};"
        );
    }

    #[test]
    fn no_inputs_and_no_extra_props_is_void() {
        let types = derive_first(
            "paths:\n  /ping:\n    get:\n      operationId: ping\n      responses: {}\n",
            &TypeExpr::Void,
        );
        assert!(types.variables.is_void());

        let types = derive_first(
            "paths:\n  /ping:\n    get:\n      operationId: ping\n      responses: {}\n",
            &TypeExpr::reference("ApiFetcherExtraProps"),
        );
        assert_eq!(types.variables.emit(), "ApiFetcherExtraProps");
    }

    #[test]
    fn variables_intersect_extra_props() {
        let types = derive_first(
            indoc! {"
                paths:
                  /pets/{pet_id}:
                    put:
                      operationId: updatePet
                      parameters:
                        - {name: pet_id, in: path, required: true, schema: {type: string}}
                      requestBody:
                        $ref: '#/components/requestBodies/PetBody'
                      responses: {}
                components:
                  requestBodies:
                    PetBody:
                      required: true
                      content:
                        application/json:
                          schema: {type: object}
            "},
            &TypeExpr::reference("ApiFetcherExtraProps"),
        );
        assert_eq!(types.request_body.emit(), "RequestBodies.PetBody");
        assert_eq!(
            declaration(&types, "UpdatePetVariables"),
            indoc! {"
                export type UpdatePetVariables = {
                  body: RequestBodies.PetBody;
                  pathParams: UpdatePetPathParams;
                } & ApiFetcherExtraProps;"}
        );
    }

    #[test]
    fn inline_body_without_required_properties_is_optional() {
        let types = derive_first(
            indoc! {"
                paths:
                  /pets:
                    post:
                      operationId: addPet
                      requestBody:
                        content:
                          application/json:
                            schema:
                              type: object
                              properties:
                                name: {type: string}
                      responses: {}
            "},
            &TypeExpr::Void,
        );
        assert_eq!(types.request_body.emit(), "AddPetRequestBody");
        assert_eq!(
            declaration(&types, "AddPetVariables"),
            "export type AddPetVariables = {\n  body?: AddPetRequestBody;\n};"
        );
    }

    #[test]
    fn derived_operation_ids() {
        let op = Operation::default();
        assert_eq!(operation_id("/pets/{pet_id}", HttpMethod::Get, &op), "getPetsPetId");
        assert_eq!(type_prefix("listPets"), "ListPets");
        assert_eq!(url_template("/pets/{pet_id}/toys/{toy-id}"), "/pets/{petId}/toys/{toyId}");
        assert_eq!(url_template("/pets"), "/pets");
    }
}
