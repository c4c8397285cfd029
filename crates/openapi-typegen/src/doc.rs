//! Doc comments built from schema, parameter and operation metadata.

use std::fmt::Display;

use openapi_typegen_core::{Operation, Schema};

/// Extensions owned by this generator; never echoed into docs.
const OWN_EXTENSION_PREFIX: &str = "x-openapi-typegen-";

/// Description followed by JSDoc-style tags for constraints, defaults,
/// examples, deprecation and vendor extensions.
pub fn schema_doc(schema: &Schema) -> Option<String> {
    let mut tags = Vec::new();
    push_tag(&mut tags, "format", schema.format.as_ref());
    push_tag(&mut tags, "minimum", schema.minimum.as_ref());
    push_tag(&mut tags, "maximum", schema.maximum.as_ref());
    push_tag(&mut tags, "multipleOf", schema.multiple_of.as_ref());
    push_tag(&mut tags, "minLength", schema.min_length.as_ref());
    push_tag(&mut tags, "maxLength", schema.max_length.as_ref());
    push_tag(&mut tags, "pattern", schema.pattern.as_ref());
    push_tag(&mut tags, "minItems", schema.min_items.as_ref());
    push_tag(&mut tags, "maxItems", schema.max_items.as_ref());
    push_tag(&mut tags, "default", schema.default.as_ref());
    push_tag(&mut tags, "example", schema.example.as_ref());
    if schema.deprecated {
        tags.push("@deprecated".to_string());
    }
    for (key, value) in &schema.extensions {
        if key.starts_with("x-") && !key.starts_with(OWN_EXTENSION_PREFIX) {
            tags.push(format!("@{key} {value}"));
        }
    }

    let text = schema.description.as_deref().or(schema.title.as_deref());
    compose(text, &tags)
}

/// Summary and description of an operation, plus `@deprecated`.
pub fn operation_doc(operation: &Operation) -> Option<String> {
    let text = match (&operation.summary, &operation.description) {
        (Some(summary), Some(description)) if summary != description => {
            Some(format!("{summary}\n\n{description}"))
        }
        (Some(text), _) | (None, Some(text)) => Some(text.clone()),
        (None, None) => None,
    };
    let tags = if operation.deprecated {
        vec!["@deprecated".to_string()]
    } else {
        Vec::new()
    };
    compose(text.as_deref(), &tags)
}

/// Plain description with an optional `@deprecated` tag.
pub fn described(description: Option<&str>, deprecated: bool) -> Option<String> {
    let tags = if deprecated {
        vec!["@deprecated".to_string()]
    } else {
        Vec::new()
    };
    compose(description, &tags)
}

fn push_tag(tags: &mut Vec<String>, name: &str, value: Option<&impl Display>) {
    if let Some(value) = value {
        tags.push(format!("@{name} {value}"));
    }
}

fn compose(text: Option<&str>, tags: &[String]) -> Option<String> {
    let text = text.map(str::trim).filter(|t| !t.is_empty());
    match (text, tags.is_empty()) {
        (None, true) => None,
        (Some(text), true) => Some(text.to_string()),
        (None, false) => Some(tags.join("\n")),
        (Some(text), false) => Some(format!("{text}\n\n{}", tags.join("\n"))),
    }
}
