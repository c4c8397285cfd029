//! Local `$ref` resolution under `#/components`.
//!
//! Pointers name a component (`#/components/schemas/Pet`) and may continue
//! into it (`.../Pet/properties/owner/items`). Reference-to-reference chains
//! are followed transitively; a chain that revisits a pointer is reported as
//! unresolved.

use std::collections::HashSet;

use openapi_typegen_core::{
    AdditionalProperties, Components, MediaType, Parameter, RefOr, RequestBody, Response, Schema,
};

use crate::error::{Error, Result};
use crate::types::Namespace;

/// A parsed `#/components/<namespace>/<name>[/...]` pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    /// Component namespace.
    pub namespace: Namespace,
    /// Component name (unescaped).
    pub name: String,
    /// Remaining segments below the component (unescaped).
    pub rest: Vec<String>,
}

impl Pointer {
    /// Parse a local pointer.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedReferenceShape`] unless the pointer has the form
    /// `#/components/<schemas|parameters|requestBodies|responses>/<name>...`.
    pub fn parse(reference: &str) -> Result<Self> {
        let Some(path) = reference.strip_prefix("#/") else {
            return Err(Error::unsupported_ref(
                reference,
                "only local '#/components/...' references are supported",
            ));
        };
        let mut segments = path.split('/').map(unescape);

        if segments.next().as_deref() != Some("components") {
            return Err(Error::unsupported_ref(
                reference,
                "reference must point under '#/components'",
            ));
        }
        let namespace = segments
            .next()
            .and_then(|segment| Namespace::from_component(&segment))
            .ok_or_else(|| {
                Error::unsupported_ref(
                    reference,
                    "expected schemas, parameters, requestBodies or responses",
                )
            })?;
        let name = segments
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::unsupported_ref(reference, "missing component name"))?;

        Ok(Self {
            namespace,
            name,
            rest: segments.collect(),
        })
    }

    /// Points at a whole component rather than inside one.
    pub fn is_shallow(&self) -> bool {
        self.rest.is_empty()
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// A resolved node.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Schema Object.
    Schema(&'a Schema),
    /// Parameter Object.
    Parameter(&'a Parameter),
    /// Request Body Object.
    RequestBody(&'a RequestBody),
    /// Response Object.
    Response(&'a Response),
    /// Media Type Object.
    MediaType(&'a MediaType),
}

impl Node<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Self::Schema(_) => "schema",
            Self::Parameter(_) => "parameter",
            Self::RequestBody(_) => "request body",
            Self::Response(_) => "response",
            Self::MediaType(_) => "media type",
        }
    }
}

/// A position during a walk, possibly still a `$ref`.
#[derive(Clone, Copy)]
enum Cursor<'a> {
    Schema(&'a RefOr<Schema>),
    Parameter(&'a RefOr<Parameter>),
    RequestBody(&'a RefOr<RequestBody>),
    Response(&'a RefOr<Response>),
    MediaType(&'a MediaType),
}

/// Resolves pointers against a document's `components`.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    components: &'a Components,
}

impl<'a> Resolver<'a> {
    /// Resolver over `components`.
    pub fn new(components: &'a Components) -> Self {
        Self { components }
    }

    /// The components this resolver reads.
    pub fn components(&self) -> &'a Components {
        self.components
    }

    /// Resolve any supported pointer.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedReferenceShape`] for malformed pointers and
    /// [`Error::UnresolvedReference`] when the target is missing or the
    /// chain loops.
    pub fn resolve(&self, reference: &str) -> Result<Node<'a>> {
        self.lookup(reference, &mut HashSet::new())
    }

    /// Resolve a pointer that must land on a schema.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve`], plus [`Error::UnsupportedReferenceShape`]
    /// when the target is not a schema.
    pub fn schema(&self, reference: &str) -> Result<&'a Schema> {
        match self.resolve(reference)? {
            Node::Schema(schema) => Ok(schema),
            other => Err(wrong_kind(reference, "schema", &other)),
        }
    }

    /// Resolve a pointer that must name a component parameter.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve`], plus [`Error::UnsupportedReferenceShape`]
    /// when the pointer is outside `#/components/parameters`.
    pub fn parameter(&self, reference: &str) -> Result<&'a Parameter> {
        expect_namespace(reference, Namespace::Parameters)?;
        match self.resolve(reference)? {
            Node::Parameter(parameter) => Ok(parameter),
            other => Err(wrong_kind(reference, "parameter", &other)),
        }
    }

    /// Resolve a pointer that must name a component request body.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve`], plus [`Error::UnsupportedReferenceShape`]
    /// when the pointer is outside `#/components/requestBodies`.
    pub fn request_body(&self, reference: &str) -> Result<&'a RequestBody> {
        expect_namespace(reference, Namespace::RequestBodies)?;
        match self.resolve(reference)? {
            Node::RequestBody(body) => Ok(body),
            other => Err(wrong_kind(reference, "request body", &other)),
        }
    }

    /// Resolve a pointer that must name a component response.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve`], plus [`Error::UnsupportedReferenceShape`]
    /// when the pointer is outside `#/components/responses`.
    pub fn response(&self, reference: &str) -> Result<&'a Response> {
        expect_namespace(reference, Namespace::Responses)?;
        match self.resolve(reference)? {
            Node::Response(response) => Ok(response),
            other => Err(wrong_kind(reference, "response", &other)),
        }
    }

    /// Inline schema as-is, or the schema a `$ref` points at.
    ///
    /// # Errors
    ///
    /// As [`Resolver::schema`].
    pub fn schema_of<'s>(&self, schema: &'s RefOr<Schema>) -> Result<&'s Schema>
    where
        'a: 's,
    {
        match schema {
            RefOr::Item(item) => Ok(item),
            RefOr::Ref(r) => self.schema(&r.ref_path),
        }
    }

    /// Inline parameter as-is, or the component a `$ref` points at.
    ///
    /// # Errors
    ///
    /// As [`Resolver::parameter`].
    pub fn parameter_of<'s>(&self, parameter: &'s RefOr<Parameter>) -> Result<&'s Parameter>
    where
        'a: 's,
    {
        match parameter {
            RefOr::Item(item) => Ok(item),
            RefOr::Ref(r) => self.parameter(&r.ref_path),
        }
    }

    /// Inline request body as-is, or the component a `$ref` points at.
    ///
    /// # Errors
    ///
    /// As [`Resolver::request_body`].
    pub fn request_body_of<'s>(&self, body: &'s RefOr<RequestBody>) -> Result<&'s RequestBody>
    where
        'a: 's,
    {
        match body {
            RefOr::Item(item) => Ok(item),
            RefOr::Ref(r) => self.request_body(&r.ref_path),
        }
    }

    /// Inline response as-is, or the component a `$ref` points at.
    ///
    /// # Errors
    ///
    /// As [`Resolver::response`].
    pub fn response_of<'s>(&self, response: &'s RefOr<Response>) -> Result<&'s Response>
    where
        'a: 's,
    {
        match response {
            RefOr::Item(item) => Ok(item),
            RefOr::Ref(r) => self.response(&r.ref_path),
        }
    }

    fn lookup(&self, reference: &str, visited: &mut HashSet<String>) -> Result<Node<'a>> {
        let pointer = Pointer::parse(reference)?;
        if !visited.insert(reference.to_string()) {
            return Err(Error::unresolved(reference));
        }

        let missing = || Error::unresolved(reference);
        let c = self.components;
        let mut cursor = match pointer.namespace {
            Namespace::Schemas => c.schemas.get(&pointer.name).map(Cursor::Schema),
            Namespace::Parameters => c.parameters.get(&pointer.name).map(Cursor::Parameter),
            Namespace::RequestBodies => {
                c.request_bodies.get(&pointer.name).map(Cursor::RequestBody)
            }
            Namespace::Responses => c.responses.get(&pointer.name).map(Cursor::Response),
            Namespace::Utils => None,
        }
        .ok_or_else(missing)?;

        let mut segments = pointer.rest.iter().map(String::as_str);
        while let Some(segment) = segments.next() {
            let node = self.deref(cursor, visited)?;
            cursor = step(node, segment, &mut segments).ok_or_else(missing)?;
        }
        self.deref(cursor, visited)
    }

    fn deref(&self, cursor: Cursor<'a>, visited: &mut HashSet<String>) -> Result<Node<'a>> {
        Ok(match cursor {
            Cursor::Schema(RefOr::Item(s)) => Node::Schema(s),
            Cursor::Parameter(RefOr::Item(p)) => Node::Parameter(p),
            Cursor::RequestBody(RefOr::Item(b)) => Node::RequestBody(b),
            Cursor::Response(RefOr::Item(r)) => Node::Response(r),
            Cursor::MediaType(m) => Node::MediaType(m),
            Cursor::Schema(RefOr::Ref(r))
            | Cursor::Parameter(RefOr::Ref(r))
            | Cursor::RequestBody(RefOr::Ref(r))
            | Cursor::Response(RefOr::Ref(r)) => self.lookup(&r.ref_path, visited)?,
        })
    }
}

/// Move one level down from `node`; some segments consume a second one
/// (`properties/<key>`, `allOf/<index>`, `content/<media>`).
fn step<'a, 's>(
    node: Node<'a>,
    segment: &str,
    segments: &mut impl Iterator<Item = &'s str>,
) -> Option<Cursor<'a>> {
    match (node, segment) {
        (Node::Schema(s), "properties") => {
            let key = segments.next()?;
            s.properties.as_ref()?.get(key).map(Cursor::Schema)
        }
        (Node::Schema(s), "items") => s.items.as_deref().map(Cursor::Schema),
        (Node::Schema(s), "additionalProperties") => match s.additional_properties.as_ref()? {
            AdditionalProperties::Schema(inner) => Some(Cursor::Schema(&**inner)),
            AdditionalProperties::Bool(_) => None,
        },
        (Node::Schema(s), "allOf" | "oneOf" | "anyOf") => {
            let list = match segment {
                "allOf" => s.all_of.as_ref(),
                "oneOf" => s.one_of.as_ref(),
                _ => s.any_of.as_ref(),
            }?;
            let index: usize = segments.next()?.parse().ok()?;
            list.get(index).map(Cursor::Schema)
        }
        (Node::Parameter(p), "schema") => p.schema.as_ref().map(Cursor::Schema),
        (Node::RequestBody(RequestBody { content, .. }), "content")
        | (Node::Response(Response { content, .. }), "content") => {
            let media = segments.next()?;
            content.get(media).map(Cursor::MediaType)
        }
        (Node::MediaType(m), "schema") => m.schema.as_ref().map(Cursor::Schema),
        _ => None,
    }
}

fn expect_namespace(reference: &str, namespace: Namespace) -> Result<()> {
    let pointer = Pointer::parse(reference)?;
    if pointer.namespace == namespace {
        Ok(())
    } else {
        Err(Error::unsupported_ref(
            reference,
            format!(
                "expected a reference under '#/components/{}'",
                namespace.component_key()
            ),
        ))
    }
}

fn wrong_kind(reference: &str, expected: &str, found: &Node<'_>) -> Error {
    Error::unsupported_ref(
        reference,
        format!("expected a {expected}, found a {}", found.kind()),
    )
}
