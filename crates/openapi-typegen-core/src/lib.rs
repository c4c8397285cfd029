//! Shared `OpenAPI` 3.0 document model for the openapi-typegen ecosystem.
//!
//! This crate provides order-preserving [`serde`] types for the subset of an
//! `OpenAPI` 3.0 document the type compiler consumes: paths, operations,
//! parameters, request bodies, responses and schema objects, plus the
//! reusable `components` they reference.
//!
//! The compiler crate (`openapi-typegen`) depends on these types. You should
//! not need to depend on this crate directly; use the compiler instead.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod document;
pub mod schema;

pub use document::{
    Components, Document, HttpMethod, Info, MediaType, Operation, Parameter, ParameterLocation,
    PathItem, RequestBody, Response,
};
pub use schema::{AdditionalProperties, Discriminator, RefOr, Reference, Schema, SchemaType};
