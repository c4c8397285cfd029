//! Document-level `OpenAPI` 3.0 types: paths, operations and components.
//!
//! All maps are [`IndexMap`]s so that iteration follows declaration order;
//! generated output must be deterministic and mirror the document.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::schema::{RefOr, Schema};

/// Root `OpenAPI` document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// `openapi` version string (e.g. `3.0.3`).
    #[serde(default)]
    pub openapi: String,
    /// `info` block.
    #[serde(default)]
    pub info: Info,
    /// `paths`, keyed by path template.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable `components`.
    #[serde(default)]
    pub components: Components,
}

impl Document {
    /// Parse a YAML document.
    ///
    /// The YAML is first read into a JSON value so that non-string mapping
    /// keys (`200:` in `responses`) become strings before typed decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid YAML or does not match the
    /// document model.
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml_ng::Error> {
        let value: Value = serde_yaml_ng::from_str(input)?;
        serde_json::from_value(value).map_err(serde::de::Error::custom)
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON or does not match the
    /// document model.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Iterate over every operation as `(path, method, path_item, operation)`
    /// in declared path and verb order.
    pub fn operations(
        &self,
    ) -> impl Iterator<Item = (&str, HttpMethod, &PathItem, &Operation)> + '_ {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path.as_str(), *method, item, op))
        })
    }
}

/// `info` block; only the fields used for naming and headers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default)]
    pub title: String,
    /// API version.
    #[serde(default)]
    pub version: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Reusable component definitions, one map per namespace.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// `components/schemas`
    #[serde(default)]
    pub schemas: IndexMap<String, RefOr<Schema>>,
    /// `components/parameters`
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    /// `components/requestBodies`
    #[serde(default)]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    /// `components/responses`
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// HTTP verbs that may appear as path item keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `get`
    Get,
    /// `put`
    Put,
    /// `post`
    Post,
    /// `delete`
    Delete,
    /// `options`
    Options,
    /// `head`
    Head,
    /// `patch`
    Patch,
    /// `trace`
    Trace,
}

impl HttpMethod {
    /// Parse a path item key; `None` for non-operation keys such as
    /// `summary`, `parameters` or `servers`.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "get" => Self::Get,
            "put" => Self::Put,
            "post" => Self::Post,
            "delete" => Self::Delete,
            "options" => Self::Options,
            "head" => Self::Head,
            "patch" => Self::Patch,
            "trace" => Self::Trace,
            _ => return None,
        })
    }

    /// Lowercase verb as written in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

/// A path item: shared parameters plus operations in declared verb order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawPathItem")]
pub struct PathItem {
    /// `summary`
    pub summary: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// Parameters shared by every operation under this path.
    pub parameters: Vec<RefOr<Parameter>>,
    /// Operations keyed by verb, in the order they were declared.
    pub operations: IndexMap<HttpMethod, Operation>,
}

/// Wire shape of a path item before verb keys are split out.
#[derive(Deserialize)]
struct RawPathItem {
    summary: Option<String>,
    description: Option<String>,
    #[serde(default)]
    parameters: Vec<RefOr<Parameter>>,
    #[serde(flatten)]
    rest: IndexMap<String, Value>,
}

impl TryFrom<RawPathItem> for PathItem {
    type Error = serde_json::Error;

    fn try_from(raw: RawPathItem) -> Result<Self, Self::Error> {
        let mut operations = IndexMap::new();
        for (key, value) in raw.rest {
            let Some(method) = HttpMethod::from_key(&key) else {
                continue;
            };
            operations.insert(method, serde_json::from_value(value)?);
        }

        Ok(Self {
            summary: raw.summary,
            description: raw.description,
            parameters: raw.parameters,
            operations,
        })
    }
}

/// An Operation Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// `operationId`
    pub operation_id: Option<String>,
    /// `summary`
    pub summary: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `deprecated`
    #[serde(default)]
    pub deprecated: bool,
    /// `tags`
    #[serde(default)]
    pub tags: Vec<String>,
    /// Operation-level parameters (override path-level ones by name + location).
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    /// `requestBody`
    pub request_body: Option<RefOr<RequestBody>>,
    /// `responses`, keyed by status code, range (`4XX`) or `default`.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    /// Vendor extensions and unmodelled keys.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Parameter location (`in`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// `path`
    Path,
    /// `query`
    Query,
    /// `header`
    Header,
    /// `cookie`
    Cookie,
}

/// A Parameter Object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// `required`
    #[serde(default)]
    pub required: bool,
    /// `description`
    pub description: Option<String>,
    /// `deprecated`
    #[serde(default)]
    pub deprecated: bool,
    /// Value schema.
    pub schema: Option<RefOr<Schema>>,
}

/// A Request Body Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestBody {
    /// `description`
    pub description: Option<String>,
    /// Media type → payload.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    /// `required`
    #[serde(default)]
    pub required: bool,
}

/// A Response Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    /// `description`
    pub description: Option<String>,
    /// Media type → payload.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A Media Type Object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaType {
    /// Payload schema.
    pub schema: Option<RefOr<Schema>>,
}
