//! `allOf` schema algebra.
//!
//! Two schemas merge deeply with the first operand winning on scalar
//! conflicts. Two different explicit `type`s are a collision: the scope
//! where it happens (the whole schema, or a single property) is replaced by
//! a schema carrying [`NEVER_MARKER`], which synthesizes to `never`.
//!
//! Nested schemas given as `$ref` are compared by their resolved `type`
//! only; without a collision the first operand is kept as written.

use indexmap::IndexMap;
use openapi_typegen_core::{RefOr, Schema, SchemaType};
use serde_json::Value;

use crate::error::Result;
use crate::resolve::Resolver;

/// Vendor extension that forces a schema to synthesize as `never`.
pub const NEVER_MARKER: &str = "x-openapi-typegen-never";

/// Result of folding a member list.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    /// The merged schema (never carries `allOf`).
    pub schema: Schema,
    /// Whether any scope collided.
    pub collision: bool,
}

/// Schema that synthesizes to `never`.
pub fn never() -> Schema {
    let mut schema = Schema::default();
    schema
        .extensions
        .insert(NEVER_MARKER.to_string(), Value::Bool(true));
    schema
}

/// Whether `schema` carries the never marker.
pub fn is_never(schema: &Schema) -> bool {
    schema
        .extension(NEVER_MARKER)
        .is_some_and(|v| v.as_bool() == Some(true))
}

/// Fold `schemas` left to right.
///
/// # Errors
///
/// Reference errors while resolving nested `$ref`s.
pub fn merge_all<'s>(
    schemas: impl IntoIterator<Item = &'s Schema>,
    resolver: Resolver<'_>,
) -> Result<Merged> {
    let mut iter = schemas.into_iter();
    let mut merged = Merged {
        schema: iter.next().cloned().unwrap_or_default(),
        collision: false,
    };
    for next in iter {
        let (schema, collision) = merge(&merged.schema, next, resolver)?;
        merged.schema = schema;
        merged.collision |= collision;
    }
    merged.schema.all_of = None;
    Ok(merged)
}

/// Merge two schemas; returns the result and whether anything collided.
///
/// # Errors
///
/// Reference errors while resolving nested `$ref`s.
pub fn merge(a: &Schema, b: &Schema, resolver: Resolver<'_>) -> Result<(Schema, bool)> {
    if is_never(a) || is_never(b) {
        return Ok((never(), false));
    }
    if let (Some(left), Some(right)) = (a.schema_type, b.schema_type) {
        if left != right {
            return Ok((never(), true));
        }
    }

    let mut collision = false;
    let properties = match (&a.properties, &b.properties) {
        (Some(left), Some(right)) => {
            let (props, c) = merge_properties(left, right, resolver)?;
            collision |= c;
            Some(props)
        }
        (left, right) => left.clone().or_else(|| right.clone()),
    };
    let items = match (&a.items, &b.items) {
        (Some(left), Some(right)) => {
            let (merged, c) = merge_nested(left, right, resolver)?;
            collision |= c;
            Some(Box::new(merged))
        }
        (left, right) => left.clone().or_else(|| right.clone()),
    };

    let mut required = a.required.clone();
    for key in &b.required {
        if !required.contains(key) {
            required.push(key.clone());
        }
    }

    let mut extensions = a.extensions.clone();
    for (key, value) in &b.extensions {
        extensions.entry(key.clone()).or_insert_with(|| value.clone());
    }

    let schema = Schema {
        schema_type: a.schema_type.or(b.schema_type),
        format: a.format.clone().or_else(|| b.format.clone()),
        title: a.title.clone().or_else(|| b.title.clone()),
        description: a.description.clone().or_else(|| b.description.clone()),
        nullable: a.nullable.or(b.nullable),
        deprecated: a.deprecated || b.deprecated,
        read_only: a.read_only || b.read_only,
        write_only: a.write_only || b.write_only,
        properties,
        required,
        additional_properties: a
            .additional_properties
            .clone()
            .or_else(|| b.additional_properties.clone()),
        min_properties: a.min_properties.or(b.min_properties),
        max_properties: a.max_properties.or(b.max_properties),
        items,
        min_items: a.min_items.or(b.min_items),
        max_items: a.max_items.or(b.max_items),
        unique_items: a.unique_items || b.unique_items,
        one_of: a.one_of.clone().or_else(|| b.one_of.clone()),
        any_of: a.any_of.clone().or_else(|| b.any_of.clone()),
        all_of: a.all_of.clone().or_else(|| b.all_of.clone()),
        discriminator: a.discriminator.clone().or_else(|| b.discriminator.clone()),
        enum_values: a.enum_values.clone().or_else(|| b.enum_values.clone()),
        default: a.default.clone().or_else(|| b.default.clone()),
        example: a.example.clone().or_else(|| b.example.clone()),
        minimum: a.minimum.or(b.minimum),
        maximum: a.maximum.or(b.maximum),
        exclusive_minimum: a.exclusive_minimum || b.exclusive_minimum,
        exclusive_maximum: a.exclusive_maximum || b.exclusive_maximum,
        multiple_of: a.multiple_of.or(b.multiple_of),
        min_length: a.min_length.or(b.min_length),
        max_length: a.max_length.or(b.max_length),
        pattern: a.pattern.clone().or_else(|| b.pattern.clone()),
        extensions,
    };
    Ok((schema, collision))
}

fn merge_properties(
    left: &IndexMap<String, RefOr<Schema>>,
    right: &IndexMap<String, RefOr<Schema>>,
    resolver: Resolver<'_>,
) -> Result<(IndexMap<String, RefOr<Schema>>, bool)> {
    let mut collision = false;
    let mut merged = left.clone();
    for (key, value) in right {
        let Some(existing) = merged.get_mut(key) else {
            merged.insert(key.clone(), value.clone());
            continue;
        };
        let (schema, c) = merge_nested(existing, value, resolver)?;
        collision |= c;
        *existing = schema;
    }
    Ok((merged, collision))
}

fn merge_nested(
    left: &RefOr<Schema>,
    right: &RefOr<Schema>,
    resolver: Resolver<'_>,
) -> Result<(RefOr<Schema>, bool)> {
    if let (RefOr::Item(l), RefOr::Item(r)) = (left, right) {
        let (schema, collision) = merge(l, r, resolver)?;
        return Ok((RefOr::Item(schema), collision));
    }
    let (l, r) = (resolver.schema_of(left)?, resolver.schema_of(right)?);
    match (l.schema_type, r.schema_type) {
        (Some(a), Some(b)) if a != b => Ok((RefOr::Item(never()), true)),
        _ => Ok((left.clone(), false)),
    }
}
