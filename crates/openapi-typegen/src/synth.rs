//! Schema → type expression synthesis.
//!
//! [`synthesize`] is a pure function of its input schema and an immutable
//! [`Context`]. Rules apply in priority order:
//!
//! 1. never marker → `never`
//! 2. `oneOf` / `anyOf` → union (with discriminator refinement)
//! 3. `allOf` → schema algebra ([`crate::merge`])
//! 4. `enum` → literal union, or a reference to an enum declaration
//! 5. object / array inferred from `properties` / `items` without `type`
//! 6. primitives
//! 7. objects
//! 8. arrays
//! 9. anything else → `void`
//!
//! Named (`#/components/<ns>/<name>`) references stay references, so
//! recursive component graphs terminate. Deep references are inlined; an
//! inlined reference that re-enters itself becomes `unknown`.

use heck::ToUpperCamelCase;
use openapi_typegen_core::{AdditionalProperties, RefOr, Schema, SchemaType};
use serde_json::Value;

use crate::enum_name;
use crate::error::Result;
use crate::merge::{self, is_never};
use crate::resolve::{Pointer, Resolver};
use crate::types::{Member, Namespace, ObjectType, TypeExpr};

/// Immutable synthesis context.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    resolver: Resolver<'a>,
    namespace: Option<Namespace>,
    synthetic_name: Option<String>,
    use_enums: bool,
    inlining: Vec<String>,
}

impl<'a> Context<'a> {
    /// Context for declarations living in `namespace` (`None` for the
    /// operations file, where every reference is qualified).
    pub fn new(resolver: Resolver<'a>, namespace: Option<Namespace>, use_enums: bool) -> Self {
        Self {
            resolver,
            namespace,
            synthetic_name: None,
            use_enums,
            inlining: Vec::new(),
        }
    }

    /// Same context, naming the schema being synthesized. Nested property
    /// enums are named after it.
    #[must_use]
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            synthetic_name: Some(name.into()),
            ..self.clone()
        }
    }

    /// The resolver.
    pub fn resolver(&self) -> Resolver<'a> {
        self.resolver
    }

    /// Namespace of the file being generated.
    pub fn namespace(&self) -> Option<Namespace> {
        self.namespace
    }

    fn anonymous(&self) -> Self {
        Self {
            synthetic_name: None,
            ..self.clone()
        }
    }

    fn child(&self, key: &str) -> Self {
        Self {
            synthetic_name: self
                .synthetic_name
                .as_ref()
                .map(|parent| property_type_name(parent, key)),
            ..self.clone()
        }
    }
}

/// PascalCase identifier for a component name (`pet.v1.Pet` → `PetV1Pet`).
pub fn type_name(component: &str) -> String {
    component.to_upper_camel_case()
}

/// Name of a nested property's extracted type: parent + PascalCase(key).
pub fn property_type_name(parent: &str, key: &str) -> String {
    format!("{parent}{}", key.to_upper_camel_case())
}

/// Reference to a component type, bare inside its own namespace.
pub fn component_reference(namespace: Namespace, name: &str, ctx: &Context<'_>) -> TypeExpr {
    if ctx.namespace == Some(namespace) {
        TypeExpr::reference(type_name(name))
    } else {
        TypeExpr::qualified(namespace, type_name(name))
    }
}

/// Which rule a schema falls under.
enum Shape<'s> {
    Never,
    Combinator(&'s [RefOr<Schema>]),
    AllOf(&'s [RefOr<Schema>]),
    Enum(&'s [Value]),
    Object,
    Array,
    Primitive(SchemaType),
    Void,
}

fn shape(schema: &Schema) -> Shape<'_> {
    if is_never(schema) {
        return Shape::Never;
    }
    if let Some(members) = schema.one_of.as_ref().or(schema.any_of.as_ref()) {
        return Shape::Combinator(members);
    }
    if let Some(members) = &schema.all_of {
        return Shape::AllOf(members);
    }
    if let Some(values) = &schema.enum_values {
        return Shape::Enum(values);
    }
    match schema.schema_type {
        Some(SchemaType::Object) => Shape::Object,
        Some(SchemaType::Array) => Shape::Array,
        Some(primitive) => Shape::Primitive(primitive),
        None if schema.properties.is_some() || schema.additional_properties.is_some() => {
            Shape::Object
        }
        None if schema.items.is_some() => Shape::Array,
        None => Shape::Void,
    }
}

/// Whether an `enum` can become an `export enum`: at least one non-null
/// value, and only strings and numbers.
pub fn enum_declarable(schema: &Schema) -> bool {
    let Some(values) = &schema.enum_values else {
        return false;
    };
    let mut non_null = values.iter().filter(|v| !v.is_null()).peekable();
    non_null.peek().is_some() && non_null.all(|v| v.is_string() || v.is_number())
}

/// Whether `schema` itself becomes an enum declaration in enum mode.
pub fn is_enum_declaration(schema: &Schema) -> bool {
    matches!(shape(schema), Shape::Enum(_)) && enum_declarable(schema)
}

/// Nested property enums that enum mode extracts from a named schema, with
/// the names their use sites reference.
pub fn nested_enums<'s>(schema: &'s Schema, name: &str) -> Vec<(String, &'s Schema)> {
    let mut found = Vec::new();
    collect_nested_enums(schema, name, &mut found);
    found
}

fn collect_nested_enums<'s>(schema: &'s Schema, name: &str, found: &mut Vec<(String, &'s Schema)>) {
    if !matches!(shape(schema), Shape::Object) || schema.max_properties == Some(0) {
        return;
    }
    let Some(properties) = &schema.properties else {
        return;
    };
    for (key, property) in properties {
        let RefOr::Item(property) = property else {
            continue;
        };
        let child = property_type_name(name, key);
        if is_enum_declaration(property) {
            found.push((child, property));
        } else {
            collect_nested_enums(property, &child, found);
        }
    }
}

/// Synthesize a schema or schema reference.
///
/// # Errors
///
/// Reference errors from the resolver and
/// [`Error::UnsupportedEnumValueType`](crate::Error::UnsupportedEnumValueType).
pub fn synthesize(schema: &RefOr<Schema>, ctx: &Context<'_>) -> Result<TypeExpr> {
    match schema {
        RefOr::Item(schema) => synthesize_schema(schema, ctx),
        RefOr::Ref(r) => synthesize_reference(&r.ref_path, ctx),
    }
}

fn synthesize_reference(reference: &str, ctx: &Context<'_>) -> Result<TypeExpr> {
    let pointer = Pointer::parse(reference)?;
    let target = ctx.resolver.schema(reference)?;
    if pointer.is_shallow() {
        let ty = component_reference(pointer.namespace, &pointer.name, ctx);
        return Ok(ty.nullable_if(declares_nullable_enum(&pointer, ctx)));
    }

    if ctx.inlining.iter().any(|r| r == reference) {
        tracing::warn!(reference, "cyclic inline reference; emitting unknown");
        return Ok(TypeExpr::Unknown);
    }
    let mut inner = ctx.anonymous();
    inner.inlining.push(reference.to_string());
    synthesize_schema(target, &inner)
}

/// In enum mode a nullable enum component is declared as an `enum`, which
/// cannot carry `null`; its use sites add it instead.
fn declares_nullable_enum(pointer: &Pointer, ctx: &Context<'_>) -> bool {
    if !ctx.use_enums || pointer.namespace != Namespace::Schemas {
        return false;
    }
    let components = ctx.resolver.components();
    components
        .schemas
        .get(&pointer.name)
        .and_then(RefOr::as_item)
        .is_some_and(|schema| is_enum_declaration(schema) && enum_nullable(schema))
}

fn enum_nullable(schema: &Schema) -> bool {
    schema.is_nullable()
        || schema
            .enum_values
            .as_ref()
            .is_some_and(|values| values.iter().any(Value::is_null))
}

/// Synthesize an inline schema.
///
/// # Errors
///
/// As [`synthesize`].
pub fn synthesize_schema(schema: &Schema, ctx: &Context<'_>) -> Result<TypeExpr> {
    let nullable = schema.is_nullable();
    Ok(match shape(schema) {
        Shape::Never => TypeExpr::Never,
        Shape::Combinator(members) => combinator(schema, members, ctx)?.nullable_if(nullable),
        Shape::AllOf(members) => all_of(schema, members, ctx)?.nullable_if(nullable),
        Shape::Enum(values) => enumeration(schema, values, ctx)?,
        Shape::Primitive(SchemaType::Null) => TypeExpr::null(),
        Shape::Primitive(SchemaType::Integer | SchemaType::Number) => {
            TypeExpr::number().nullable_if(nullable)
        }
        Shape::Primitive(SchemaType::String) => {
            if schema.format.as_deref() == Some("binary") {
                TypeExpr::reference("Blob").nullable_if(nullable)
            } else {
                TypeExpr::string().nullable_if(nullable)
            }
        }
        Shape::Primitive(SchemaType::Boolean) => TypeExpr::boolean().nullable_if(nullable),
        Shape::Object | Shape::Primitive(SchemaType::Object) => {
            object(schema, ctx)?.nullable_if(nullable)
        }
        Shape::Array | Shape::Primitive(SchemaType::Array) => {
            array(schema, ctx)?.nullable_if(nullable)
        }
        Shape::Void => TypeExpr::Void,
    })
}

fn enumeration(schema: &Schema, values: &[Value], ctx: &Context<'_>) -> Result<TypeExpr> {
    let nullable = enum_nullable(schema);
    if ctx.use_enums && enum_declarable(schema) {
        if let Some(name) = &ctx.synthetic_name {
            return Ok(TypeExpr::reference(name.clone()).nullable_if(nullable));
        }
    }
    let literals = values
        .iter()
        .map(|v| enum_name::literal(v).map(TypeExpr::Literal))
        .collect::<Result<Vec<_>>>()?;
    Ok(TypeExpr::union(literals).nullable_if(nullable))
}

fn object(schema: &Schema, ctx: &Context<'_>) -> Result<TypeExpr> {
    if schema.max_properties == Some(0) {
        return Ok(TypeExpr::object(Vec::new()));
    }
    let properties = schema.properties.as_ref().filter(|p| !p.is_empty());
    if properties.is_none() && schema.additional_properties.is_none() {
        return Ok(TypeExpr::generic(
            "Record",
            vec![TypeExpr::string(), TypeExpr::any()],
        ));
    }

    let mut members = Vec::new();
    for (key, property) in properties.into_iter().flatten() {
        members.push(Member {
            name: key.clone(),
            ty: synthesize(property, &ctx.child(key))?,
            optional: !schema.is_required(key),
            doc: property.as_item().and_then(crate::doc::schema_doc),
        });
    }

    let index = match &schema.additional_properties {
        Some(AdditionalProperties::Bool(true)) => Some(TypeExpr::any()),
        Some(AdditionalProperties::Schema(value)) if is_empty_schema(value) => Some(TypeExpr::any()),
        Some(AdditionalProperties::Schema(value)) => Some(synthesize(value, &ctx.anonymous())?),
        Some(AdditionalProperties::Bool(false)) | None => None,
    };

    Ok(match index {
        None => TypeExpr::object(members),
        Some(index) => {
            let signature = TypeExpr::Object(ObjectType {
                members: Vec::new(),
                index_signature: Some(Box::new(index)),
            });
            if members.is_empty() {
                signature
            } else {
                TypeExpr::intersection([TypeExpr::object(members), signature])
            }
        }
    })
}

fn array(schema: &Schema, ctx: &Context<'_>) -> Result<TypeExpr> {
    let element = match schema.items.as_deref() {
        None => TypeExpr::any(),
        Some(items) if is_empty_schema(items) => TypeExpr::any(),
        Some(items) => synthesize(items, &ctx.anonymous())?,
    };
    Ok(TypeExpr::array(element))
}

/// `{}`: accepts any value.
fn is_empty_schema(schema: &RefOr<Schema>) -> bool {
    matches!(schema, RefOr::Item(item) if *item == Schema::default())
}

/// Parent fields that every `oneOf`/`anyOf` member inherits.
fn shared_fields(schema: &Schema) -> Schema {
    Schema {
        one_of: None,
        any_of: None,
        discriminator: None,
        nullable: None,
        title: None,
        description: None,
        default: None,
        example: None,
        deprecated: false,
        ..schema.clone()
    }
}

/// Shared fields that change a member's shape (beyond its `type`).
fn is_structural(shared: &Schema) -> bool {
    shared.properties.is_some()
        || !shared.required.is_empty()
        || shared.additional_properties.is_some()
        || shared.items.is_some()
        || shared.all_of.is_some()
        || shared.enum_values.is_some()
}

fn combinator(schema: &Schema, members: &[RefOr<Schema>], ctx: &Context<'_>) -> Result<TypeExpr> {
    let ctx = ctx.anonymous();
    let shared = shared_fields(schema);
    let structural = is_structural(&shared);

    let mut types = Vec::with_capacity(members.len());
    for member in members {
        let ty = match member {
            RefOr::Ref(r) => {
                let ty = discriminated(schema, &r.ref_path, &ctx)?;
                if structural {
                    let base = Schema {
                        schema_type: None,
                        ..shared.clone()
                    };
                    TypeExpr::intersection([ty, synthesize_schema(&base, &ctx)?])
                } else {
                    ty
                }
            }
            RefOr::Item(item) => {
                let mut base = shared.clone();
                if item.schema_type.is_some() {
                    base.schema_type = None;
                }
                let overlaid = if structural {
                    merge::merge(item, &base, ctx.resolver())?.0
                } else {
                    Schema {
                        schema_type: item.schema_type.or(base.schema_type),
                        ..item.clone()
                    }
                };
                synthesize_schema(&overlaid, &ctx)?
            }
        };
        types.push(ty);
    }
    Ok(TypeExpr::union(types))
}

/// A combinator member reference, refined by the parent's discriminator
/// mapping when the reference is one of its targets.
fn discriminated(parent: &Schema, reference: &str, ctx: &Context<'_>) -> Result<TypeExpr> {
    let member = synthesize_reference(reference, ctx)?;
    let Some(discriminator) = &parent.discriminator else {
        return Ok(member);
    };
    let pointer = Pointer::parse(reference)?;
    let tags: Vec<&str> = discriminator
        .mapping
        .iter()
        .filter(|(_, target)| *target == reference || **target == pointer.name)
        .map(|(tag, _)| tag.as_str())
        .collect();
    if tags.is_empty() {
        return Ok(member);
    }

    let property = &discriminator.property_name;
    let target = ctx.resolver.schema(reference)?;
    let declared = target
        .properties
        .as_ref()
        .and_then(|props| props.get(property))
        .map(|p| ctx.resolver.schema_of(p))
        .transpose()?;

    if let (Some(declared), [tag]) = (declared, tags.as_slice()) {
        let expected = [Value::String((*tag).to_string())];
        let single = declared.enum_values.as_deref() == Some(&expected[..]);
        if single && target.is_required(property) {
            return Ok(member);
        }
    }

    let base = if declared.is_some() {
        TypeExpr::generic("Omit", vec![member, TypeExpr::string_literal(property.clone())])
    } else {
        member
    };
    let tag_type = TypeExpr::union(tags.into_iter().map(TypeExpr::string_literal));
    Ok(TypeExpr::intersection([
        base,
        TypeExpr::object(vec![Member::new(property.clone(), tag_type, false)]),
    ]))
}

fn all_of(schema: &Schema, members: &[RefOr<Schema>], ctx: &Context<'_>) -> Result<TypeExpr> {
    let ctx = ctx.anonymous();

    let mut parts: Vec<RefOr<Schema>> = Vec::new();
    flatten_all_of(members, &mut parts);
    if schema.properties.is_some() || schema.additional_properties.is_some() {
        parts.push(RefOr::Item(Schema {
            schema_type: schema.schema_type,
            properties: schema.properties.clone(),
            required: schema.required.clone(),
            additional_properties: schema.additional_properties.clone(),
            ..Schema::default()
        }));
    }

    let has_reference = parts.iter().any(RefOr::is_ref);
    let resolved = parts
        .iter()
        .map(|part| ctx.resolver.schema_of(part))
        .collect::<Result<Vec<_>>>()?;
    let merged = merge::merge_all(resolved, ctx.resolver())?;

    if has_reference && !merged.collision {
        let types = parts
            .iter()
            .map(|part| synthesize(part, &ctx))
            .collect::<Result<Vec<_>>>()?;
        return Ok(TypeExpr::intersection(types));
    }
    synthesize_schema(&merged.schema, &ctx)
}

/// Expand nested inline `allOf` lists into one flat member list.
fn flatten_all_of(members: &[RefOr<Schema>], out: &mut Vec<RefOr<Schema>>) {
    for member in members {
        match member {
            RefOr::Item(item) if item.all_of.is_some() => {
                flatten_all_of(item.all_of.as_deref().unwrap_or_default(), out);
                let rest = Schema {
                    all_of: None,
                    ..item.clone()
                };
                if rest != Schema::default() {
                    out.push(RefOr::Item(rest));
                }
            }
            other => out.push(other.clone()),
        }
    }
}
