//! Parameter merging and grouping.

use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use openapi_typegen_core::{Parameter, ParameterLocation, RefOr, Schema, SchemaType};

use crate::config::Config;
use crate::doc::described;
use crate::error::Result;
use crate::resolve::Resolver;
use crate::synth::{synthesize_schema, Context};
use crate::types::TypeExpr;

/// Path-level parameters followed by operation-level ones. An operation
/// parameter with the same name and location replaces the path-level one
/// in place.
///
/// # Errors
///
/// Reference errors from the resolver.
pub fn merged<'d>(
    path_level: &'d [RefOr<Parameter>],
    operation_level: &'d [RefOr<Parameter>],
    resolver: &Resolver<'d>,
) -> Result<Vec<&'d Parameter>> {
    let mut merged: Vec<&'d Parameter> = Vec::new();
    for parameter in path_level.iter().chain(operation_level) {
        let parameter = resolver.parameter_of(parameter)?;
        match merged
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location)
        {
            Some(slot) => *slot = parameter,
            None => merged.push(parameter),
        }
    }
    Ok(merged)
}

/// Property key for a parameter: path names are camelCased so they can be
/// substituted into the URL template, everything else stays verbatim.
pub fn property_key(parameter: &Parameter) -> String {
    match parameter.location {
        ParameterLocation::Path => parameter.name.to_lower_camel_case(),
        _ => parameter.name.clone(),
    }
}

/// A synthesized parameter group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Object type of the group, `void` when it has no parameters.
    pub ty: TypeExpr,
    /// Every member is optional.
    pub optional: bool,
}

/// Synthesize the parameters at `location` into one object type.
///
/// Parameters without a schema are typed as `string`. Injected headers stay
/// in the type but are never required.
///
/// # Errors
///
/// As [`crate::synth::synthesize`].
pub fn group(
    parameters: &[&Parameter],
    location: ParameterLocation,
    ctx: &Context<'_>,
    config: &Config,
) -> Result<Group> {
    let selected: Vec<&Parameter> = parameters
        .iter()
        .copied()
        .filter(|p| p.location == location)
        .collect();
    if selected.is_empty() {
        return Ok(Group {
            ty: TypeExpr::Void,
            optional: true,
        });
    }

    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for parameter in &selected {
        let key = property_key(parameter);
        let schema = parameter
            .schema
            .clone()
            .unwrap_or_else(|| RefOr::Item(Schema::of_type(SchemaType::String)));
        let injected = location == ParameterLocation::Header && config.is_injected_header(&key);
        if (parameter.required || location == ParameterLocation::Path) && !injected {
            required.push(key.clone());
        }
        properties.insert(key, schema);
    }
    let optional = required.is_empty();
    let schema = Schema {
        schema_type: Some(SchemaType::Object),
        properties: Some(properties),
        required,
        ..Schema::default()
    };

    let mut ty = synthesize_schema(&schema, ctx)?;
    if let TypeExpr::Object(object) = &mut ty {
        for (member, parameter) in object.members.iter_mut().zip(&selected) {
            if let Some(doc) = described(parameter.description.as_deref(), parameter.deprecated) {
                member.doc = Some(doc);
            }
        }
    }
    Ok(Group { ty, optional })
}
