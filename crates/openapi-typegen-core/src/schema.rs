//! Schema Object model and the `$ref`-or-inline wrapper.
//!
//! [`Schema`] mirrors the `OpenAPI` 3.0 Schema Object closely enough for type
//! synthesis: the kind of a schema is implied by which fields are present
//! (`type`, `properties`, `items`, combinators, `enum`). Unknown keywords and
//! `x-` vendor extensions are kept in [`Schema::extensions`] so later stages
//! can read (and set) markers without a model change.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// Either a `$ref` pointer or an inline item.
///
/// `Ref` is tried first, so any mapping carrying `$ref` is a reference
/// (sibling keys are ignored, as in `OpenAPI` 3.0).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ $ref: "#/components/..." }`
    Ref(Reference),
    /// Inline definition.
    Item(T),
}

impl<T> RefOr<T> {
    /// The inline item, if this is not a reference.
    pub fn as_item(&self) -> Option<&T> {
        match self {
            Self::Item(item) => Some(item),
            Self::Ref(_) => None,
        }
    }

    /// The reference pointer, if this is a reference.
    pub fn as_ref_path(&self) -> Option<&str> {
        match self {
            Self::Ref(r) => Some(&r.ref_path),
            Self::Item(_) => None,
        }
    }

    /// Whether this is a `$ref`.
    pub fn is_ref(&self) -> bool {
        matches!(self, Self::Ref(_))
    }
}

impl<T> From<T> for RefOr<T> {
    fn from(item: T) -> Self {
        Self::Item(item)
    }
}

/// A JSON reference object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    /// Pointer string, e.g. `#/components/schemas/Pet`.
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Reference {
    /// Build a reference from a pointer string.
    pub fn new(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: ref_path.into(),
        }
    }
}

/// Explicit `type` keyword values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `object`
    Object,
    /// `array`
    Array,
    /// `null`
    Null,
}

impl SchemaType {
    /// Keyword as written in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

/// `additionalProperties`: either a boolean switch or a value schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true | false`
    Bool(bool),
    /// `additionalProperties: { ... }`
    Schema(Box<RefOr<Schema>>),
}

/// Discriminator object attached to `oneOf`/`anyOf`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// Name of the tag property.
    pub property_name: String,
    /// Tag value → schema pointer (or bare schema name).
    #[serde(default)]
    pub mapping: IndexMap<String, String>,
}

/// An `OpenAPI` 3.0 Schema Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Explicit `type`.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// `format` (e.g. `int64`, `date-time`, `binary`).
    pub format: Option<String>,
    /// `title`
    pub title: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `nullable`; `None` when absent.
    pub nullable: Option<bool>,
    /// `deprecated`
    #[serde(default)]
    pub deprecated: bool,
    /// `readOnly`
    #[serde(default)]
    pub read_only: bool,
    /// `writeOnly`
    #[serde(default)]
    pub write_only: bool,

    /// `properties`; `None` when absent (distinct from an empty mapping).
    pub properties: Option<IndexMap<String, RefOr<Schema>>>,
    /// `required`
    #[serde(default)]
    pub required: Vec<String>,
    /// `additionalProperties`
    pub additional_properties: Option<AdditionalProperties>,
    /// `minProperties`
    pub min_properties: Option<u64>,
    /// `maxProperties`
    pub max_properties: Option<u64>,

    /// `items`
    pub items: Option<Box<RefOr<Schema>>>,
    /// `minItems`
    pub min_items: Option<u64>,
    /// `maxItems`
    pub max_items: Option<u64>,
    /// `uniqueItems`
    #[serde(default)]
    pub unique_items: bool,

    /// `oneOf`
    pub one_of: Option<Vec<RefOr<Schema>>>,
    /// `anyOf`
    pub any_of: Option<Vec<RefOr<Schema>>>,
    /// `allOf`
    pub all_of: Option<Vec<RefOr<Schema>>>,
    /// `discriminator`
    pub discriminator: Option<Discriminator>,

    /// `enum`
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// `default`
    pub default: Option<Value>,
    /// `example`
    pub example: Option<Value>,

    /// `minimum`
    pub minimum: Option<f64>,
    /// `maximum`
    pub maximum: Option<f64>,
    /// `exclusiveMinimum` (3.0 boolean form)
    #[serde(default)]
    pub exclusive_minimum: bool,
    /// `exclusiveMaximum` (3.0 boolean form)
    #[serde(default)]
    pub exclusive_maximum: bool,
    /// `multipleOf`
    pub multiple_of: Option<f64>,
    /// `minLength`
    pub min_length: Option<u64>,
    /// `maxLength`
    pub max_length: Option<u64>,
    /// `pattern`
    pub pattern: Option<String>,

    /// Vendor extensions (`x-…`) and any keyword this model does not name.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl Schema {
    /// Schema with only `type` set.
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// `nullable: true` was declared.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// Look up a vendor extension or unmodelled keyword.
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Whether `key` is listed in `required`.
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|r| r == key)
    }

    /// Whether any `oneOf`/`anyOf`/`allOf` combinator is present.
    pub fn has_combinator(&self) -> bool {
        self.one_of.is_some() || self.any_of.is_some() || self.all_of.is_some()
    }
}
