//! Declarations for the four `components` files.

use openapi_typegen_core::{RefOr, Schema, SchemaType};

use crate::config::Config;
use crate::doc::{described, schema_doc};
use crate::enum_name;
use crate::error::Result;
use crate::media;
use crate::resolve::Resolver;
use crate::synth::{
    is_enum_declaration, nested_enums, synthesize, type_name, Context,
};
use crate::types::{Declaration, EnumDeclaration, Namespace, TypeExpr};

use super::Declarations;

/// `components/schemas`: one alias per schema, or enum declarations in
/// enum mode (including enums extracted from nested properties).
///
/// # Errors
///
/// Reference and enum errors from synthesis.
pub fn schemas(resolver: Resolver<'_>, config: &Config) -> Result<Vec<Declaration>> {
    let base = Context::new(resolver, Some(Namespace::Schemas), config.use_enums);
    let mut out = Declarations::default();

    for (key, schema) in &resolver.components().schemas {
        let name = type_name(key);
        let ctx = base.named(name.clone());
        let item = schema.as_item();

        match item {
            Some(item) if config.use_enums && is_enum_declaration(item) => {
                out.push(enum_declaration(&name, item)?);
            }
            _ => {
                let doc = item.and_then(schema_doc);
                out.push(Declaration::alias(name.clone(), synthesize(schema, &ctx)?, doc));
            }
        }

        if let (Some(item), true) = (item, config.use_enums) {
            for (nested_name, nested) in nested_enums(item, &name) {
                out.push(enum_declaration(&nested_name, nested)?);
            }
        }
    }
    Ok(out.into_inner())
}

fn enum_declaration(name: &str, schema: &Schema) -> Result<Declaration> {
    let values = schema.enum_values.as_deref().unwrap_or_default();
    Ok(Declaration::Enum(EnumDeclaration {
        name: name.to_string(),
        members: enum_name::enum_members(values)?,
        doc: schema_doc(schema),
    }))
}

/// `components/parameters`: one alias per parameter, typed by its schema.
///
/// # Errors
///
/// Reference errors from the resolver and synthesis.
pub fn parameters(resolver: Resolver<'_>, config: &Config) -> Result<Vec<Declaration>> {
    let ctx = Context::new(resolver, Some(Namespace::Parameters), config.use_enums);
    let mut out = Declarations::default();
    for (key, parameter) in &resolver.components().parameters {
        let parameter = resolver.parameter_of(parameter)?;
        let ty = match &parameter.schema {
            Some(schema) => synthesize(schema, &ctx)?,
            None => synthesize(&RefOr::Item(Schema::of_type(SchemaType::String)), &ctx)?,
        };
        let doc = described(parameter.description.as_deref(), parameter.deprecated);
        out.push(Declaration::alias(type_name(key), ty, doc));
    }
    Ok(out.into_inner())
}

/// `components/requestBodies`: one alias per body with a usable media type.
///
/// # Errors
///
/// Reference errors from the resolver and synthesis.
pub fn request_bodies(resolver: Resolver<'_>, config: &Config) -> Result<Vec<Declaration>> {
    let ctx = Context::new(resolver, Some(Namespace::RequestBodies), config.use_enums);
    let mut out = Declarations::default();
    for (key, body) in &resolver.components().request_bodies {
        let body = resolver.request_body_of(body)?;
        let Some(schema) = media::compatible(&body.content).and_then(|m| m.schema.as_ref()) else {
            tracing::debug!(request_body = key.as_str(), "no compatible media type; skipping");
            continue;
        };
        let doc = described(body.description.as_deref(), false);
        out.push(Declaration::alias(type_name(key), synthesize(schema, &ctx)?, doc));
    }
    Ok(out.into_inner())
}

/// `components/responses`: one alias per response; `undefined` for
/// responses without a body.
///
/// # Errors
///
/// Reference errors from the resolver and synthesis.
pub fn responses(resolver: Resolver<'_>, config: &Config) -> Result<Vec<Declaration>> {
    let ctx = Context::new(resolver, Some(Namespace::Responses), config.use_enums);
    let mut out = Declarations::default();
    for (key, response) in &resolver.components().responses {
        let response = resolver.response_of(response)?;
        let ty = match media::compatible(&response.content).and_then(|m| m.schema.as_ref()) {
            Some(schema) => synthesize(schema, &ctx)?,
            None => TypeExpr::undefined(),
        };
        let doc = described(response.description.as_deref(), false);
        out.push(Declaration::alias(type_name(key), ty, doc));
    }
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::Emit;
    use indoc::indoc;
    use openapi_typegen_core::Document;
    use pretty_assertions::assert_eq;

    fn render(decls: &[Declaration]) -> String {
        decls.iter().map(Emit::emit).collect::<Vec<_>>().join("\n")
    }

    const DOC: &str = indoc! {"
        components:
          schemas:
            Pet:
              type: object
              description: A pet
              required: [status]
              properties:
                status:
                  type: string
                  enum: [available, sold-out]
            Kind:
              type: string
              enum: [dog, cat]
            pet:
              type: string
          parameters:
            Limit:
              name: limit
              in: query
              description: Page size
              schema: {type: integer}
          requestBodies:
            PetBody:
              content:
                application/json:
                  schema: {$ref: '#/components/schemas/Pet'}
            Xml:
              content:
                application/xml:
                  schema: {type: string}
          responses:
            NotFound:
              description: Not found
            PetResponse:
              content:
                application/json:
                  schema: {$ref: '#/components/schemas/Pet'}
    "};

    #[test]
    fn schemas_as_aliases() {
        let doc = Document::from_yaml_str(DOC).unwrap();
        let decls = schemas(Resolver::new(&doc.components), &Config::default()).unwrap();
        assert_eq!(
            render(&decls),
            indoc! {r#"
                /**
                 * A pet
                 */
                export type Pet = {
                  status: "available" | "sold-out";
                };

                export type Kind = "dog" | "cat";
            "#}
        );
    }

    #[test]
    fn schemas_in_enum_mode() {
        let doc = Document::from_yaml_str(DOC).unwrap();
        let config = Config::default().use_enums(true);
        let decls = schemas(Resolver::new(&doc.components), &config).unwrap();
        let names: Vec<&str> = decls.iter().map(Declaration::name).collect();
        assert_eq!(names, vec!["Pet", "PetStatus", "Kind"]);
        assert_eq!(
            decls[1].emit(),
            "export enum PetStatus {\n  Available = \"available\",\n  SoldOut = \"sold-out\",\n}\n"
        );
    }

    #[test]
    fn parameters_request_bodies_and_responses() {
        let doc = Document::from_yaml_str(DOC).unwrap();
        let resolver = Resolver::new(&doc.components);
        let config = Config::default();

        assert_eq!(
            render(&parameters(resolver, &config).unwrap()),
            "/**\n * Page size\n */\nexport type Limit = number;\n"
        );
        assert_eq!(
            render(&request_bodies(resolver, &config).unwrap()),
            "export type PetBody = Schemas.Pet;\n"
        );
        assert_eq!(
            render(&responses(resolver, &config).unwrap()),
            indoc! {"
                /**
                 * Not found
                 */
                export type NotFound = undefined;

                export type PetResponse = Schemas.Pet;
            "}
        );
    }
}
