//! Output IR: type expressions, declarations and the small expression
//! language used by the generated fetch/query wrappers.
//!
//! Nothing here knows how to print itself as text; see [`crate::print`].

use serde_json::Number;

use crate::config::FileKind;

/// Cross-file namespaces a reference can be qualified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    /// `components/schemas`
    Schemas,
    /// `components/parameters`
    Parameters,
    /// `components/requestBodies`
    RequestBodies,
    /// `components/responses`
    Responses,
    /// Generated status-range helpers, imported by name.
    Utils,
}

impl Namespace {
    /// The four namespaces backed by `components`, in file order.
    pub const COMPONENTS: [Self; 4] = [
        Self::Schemas,
        Self::Parameters,
        Self::RequestBodies,
        Self::Responses,
    ];

    /// Parse the segment after `#/components/`.
    pub fn from_component(segment: &str) -> Option<Self> {
        Some(match segment {
            "schemas" => Self::Schemas,
            "parameters" => Self::Parameters,
            "requestBodies" => Self::RequestBodies,
            "responses" => Self::Responses,
            _ => return None,
        })
    }

    /// The segment after `#/components/`.
    pub fn component_key(self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Parameters => "parameters",
            Self::RequestBodies => "requestBodies",
            Self::Responses => "responses",
            Self::Utils => "utils",
        }
    }

    /// Import alias; `None` for utils, whose names are imported directly.
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Self::Schemas => Some("Schemas"),
            Self::Parameters => Some("Parameters"),
            Self::RequestBodies => Some("RequestBodies"),
            Self::Responses => Some("Responses"),
            Self::Utils => None,
        }
    }

    /// The file declaring this namespace.
    pub fn file_kind(self) -> FileKind {
        match self {
            Self::Schemas => FileKind::Schemas,
            Self::Parameters => FileKind::Parameters,
            Self::RequestBodies => FileKind::RequestBodies,
            Self::Responses => FileKind::Responses,
            Self::Utils => FileKind::Utils,
        }
    }
}

/// Keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `any`
    Any,
    /// `undefined`
    Undefined,
}

/// Literal values usable both as types and as expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `"text"`
    String(String),
    /// `42`, `1.5`
    Number(Number),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
}

/// Left-hand side of a reference: a component namespace or an imported
/// module alias such as `reactQuery`.
#[derive(Debug, Clone, PartialEq)]
pub enum Qualifier {
    /// `Schemas.Pet`; utils print without a qualifier.
    Namespace(Namespace),
    /// `reactQuery.UseQueryOptions`
    Module(String),
}

/// A named type, optionally qualified and with generic arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeReference {
    /// Qualifier, if any.
    pub qualifier: Option<Qualifier>,
    /// Type name.
    pub name: String,
    /// Generic arguments.
    pub args: Vec<TypeExpr>,
}

/// One member of an object literal type.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Property name (quoted on output when not an identifier).
    pub name: String,
    /// Property type.
    pub ty: TypeExpr,
    /// `?` marker.
    pub optional: bool,
    /// Doc comment.
    pub doc: Option<String>,
}

impl Member {
    /// Undocumented member.
    pub fn new(name: impl Into<String>, ty: TypeExpr, optional: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            optional,
            doc: None,
        }
    }
}

/// Object literal type with an optional `[key: string]: T` signature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    /// Declared members in order.
    pub members: Vec<Member>,
    /// Index signature value type.
    pub index_signature: Option<Box<TypeExpr>>,
}

impl ObjectType {
    /// No members and no index signature (`{}`).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.index_signature.is_none()
    }
}

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Keyword type.
    Primitive(Primitive),
    /// Literal type.
    Literal(Literal),
    /// `T[]`
    Array(Box<TypeExpr>),
    /// `A | B`; never built empty.
    Union(Vec<TypeExpr>),
    /// `A & B`; never built empty.
    Intersection(Vec<TypeExpr>),
    /// `{ a: T }`
    Object(ObjectType),
    /// Named type.
    Reference(TypeReference),
    /// `never`
    Never,
    /// `void`
    Void,
    /// `unknown`
    Unknown,
}

impl TypeExpr {
    /// `string`
    pub fn string() -> Self {
        Self::Primitive(Primitive::String)
    }

    /// `number`
    pub fn number() -> Self {
        Self::Primitive(Primitive::Number)
    }

    /// `boolean`
    pub fn boolean() -> Self {
        Self::Primitive(Primitive::Boolean)
    }

    /// `any`
    pub fn any() -> Self {
        Self::Primitive(Primitive::Any)
    }

    /// `undefined`
    pub fn undefined() -> Self {
        Self::Primitive(Primitive::Undefined)
    }

    /// `null`
    pub fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// String literal type.
    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Numeric literal type.
    pub fn number_literal(value: impl Into<Number>) -> Self {
        Self::Literal(Literal::Number(value.into()))
    }

    /// Unqualified reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    /// Unqualified reference with generic arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Reference(TypeReference {
            qualifier: None,
            name: name.into(),
            args,
        })
    }

    /// Reference qualified by a component namespace (or a utils name).
    pub fn qualified(namespace: Namespace, name: impl Into<String>) -> Self {
        Self::Reference(TypeReference {
            qualifier: Some(Qualifier::Namespace(namespace)),
            name: name.into(),
            args: Vec::new(),
        })
    }

    /// Reference qualified by an imported module alias.
    pub fn module(module: &str, name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        Self::Reference(TypeReference {
            qualifier: Some(Qualifier::Module(module.to_string())),
            name: name.into(),
            args,
        })
    }

    /// Object literal type.
    pub fn object(members: Vec<Member>) -> Self {
        Self::Object(ObjectType {
            members,
            index_signature: None,
        })
    }

    /// `T[]`
    pub fn array(element: TypeExpr) -> Self {
        Self::Array(Box::new(element))
    }

    /// Union of `members`, flattening nested unions and dropping members
    /// whose printed form repeats. One member collapses to itself; none
    /// yields `unknown`.
    pub fn union(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Self::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        collapse(dedup_printed(flat), Self::Union)
    }

    /// Intersection of `members`, flattening nested intersections. One
    /// member collapses to itself; none yields `unknown`.
    pub fn intersection(members: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                Self::Intersection(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        collapse(dedup_printed(flat), Self::Intersection)
    }

    /// `self | null`
    #[must_use]
    pub fn or_null(self) -> Self {
        Self::union([self, Self::null()])
    }

    /// `self | null` when `nullable`.
    #[must_use]
    pub fn nullable_if(self, nullable: bool) -> Self {
        if nullable {
            self.or_null()
        } else {
            self
        }
    }

    /// `void`
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Intersections, non-empty object literals and arrays get their own
    /// named declaration instead of being inlined at the use site.
    pub fn should_hoist(&self) -> bool {
        match self {
            Self::Intersection(_) | Self::Array(_) => true,
            Self::Object(object) => !object.is_empty(),
            _ => false,
        }
    }
}

fn dedup_printed(members: Vec<TypeExpr>) -> Vec<TypeExpr> {
    use crate::print::Emit;

    let mut seen = std::collections::HashSet::new();
    members
        .into_iter()
        .filter(|member| seen.insert(member.emit()))
        .collect()
}

fn collapse(mut members: Vec<TypeExpr>, wrap: fn(Vec<TypeExpr>) -> TypeExpr) -> TypeExpr {
    match members.len() {
        0 => TypeExpr::Unknown,
        1 => members.swap_remove(0),
        _ => wrap(members),
    }
}

/// `export type Name = T;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    /// Alias name.
    pub name: String,
    /// Aliased type.
    pub ty: TypeExpr,
    /// Doc comment.
    pub doc: Option<String>,
}

/// One `Identifier = value` entry of an enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    /// Member key (quoted on output when not an identifier).
    pub identifier: String,
    /// Member value.
    pub value: Literal,
}

/// `export enum Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    /// Enum name.
    pub name: String,
    /// Members in declared order.
    pub members: Vec<EnumMember>,
    /// Doc comment.
    pub doc: Option<String>,
}

/// Generic parameter of a function, e.g. `TData = ListPetsResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    /// Parameter name.
    pub name: String,
    /// Default type.
    pub default: Option<TypeExpr>,
}

/// Binding target of a parameter or `const`.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// `name`
    Name(String),
    /// `{ a, b }`
    Destructure(Vec<String>),
}

/// Function or arrow parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Bound name(s).
    pub binding: Binding,
    /// Type annotation.
    pub ty: Option<TypeExpr>,
    /// `?` marker.
    pub optional: bool,
}

impl Param {
    /// `name: ty`
    pub fn typed(name: &str, ty: TypeExpr) -> Self {
        Self {
            binding: Binding::Name(name.to_string()),
            ty: Some(ty),
            optional: false,
        }
    }

    /// `name?: ty`
    pub fn optional(name: &str, ty: TypeExpr) -> Self {
        Self {
            optional: true,
            ..Self::typed(name, ty)
        }
    }
}

/// Object literal expression entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    /// `key: value`
    KeyValue(String, Expr),
    /// `key`
    Shorthand(String),
    /// `...value`
    Spread(Expr),
}

/// Arrow function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    /// Parameters.
    pub params: Vec<Param>,
    /// Expression body.
    pub body: Expr,
}

/// Value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier.
    Ident(String),
    /// Literal.
    Literal(Literal),
    /// `object.property`
    Member {
        /// Receiver.
        object: Box<Expr>,
        /// Property name.
        property: String,
    },
    /// `callee<T>(args)`
    Call {
        /// Called expression.
        callee: Box<Expr>,
        /// Explicit type arguments.
        type_args: Vec<TypeExpr>,
        /// Arguments.
        args: Vec<Expr>,
    },
    /// `{ ... }`
    Object(Vec<Prop>),
    /// `(params) => body`
    Arrow(Box<Arrow>),
}

impl Expr {
    /// Identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// String literal expression.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// `object.property`
    pub fn member(object: Expr, property: &str) -> Self {
        Self::Member {
            object: Box::new(object),
            property: property.to_string(),
        }
    }

    /// `self<type_args>(args)`
    #[must_use]
    pub fn call(self, type_args: Vec<TypeExpr>, args: Vec<Expr>) -> Self {
        Self::Call {
            callee: Box::new(self),
            type_args,
            args,
        }
    }
}

/// Function body statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `const binding = init;`
    Const {
        /// Binding target.
        binding: Binding,
        /// Initializer.
        init: Expr,
    },
    /// `return expr;`
    Return(Expr),
}

/// Function body: a bare expression or a statement block.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    /// `=> expr`
    Expr(Expr),
    /// `=> { ... }`
    Block(Vec<Statement>),
}

/// `export const name = <T>(params) => body;`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// Exported name.
    pub name: String,
    /// Generic parameters.
    pub type_params: Vec<TypeParam>,
    /// Parameters.
    pub params: Vec<Param>,
    /// Body.
    pub body: FunctionBody,
    /// Doc comment.
    pub doc: Option<String>,
}

/// Hand-written source emitted as-is, for constructs the IR does not model
/// (async functions, control flow). Invisible to the usage walk.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDeclaration {
    /// Declared name, used for de-duplication.
    pub name: String,
    /// Source text.
    pub text: String,
}

/// A top-level exported declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// Type alias.
    TypeAlias(TypeAlias),
    /// Enum.
    Enum(EnumDeclaration),
    /// Arrow function constant.
    Function(FunctionDeclaration),
    /// Verbatim source.
    Raw(RawDeclaration),
}

impl Declaration {
    /// Build a type alias declaration.
    pub fn alias(name: impl Into<String>, ty: TypeExpr, doc: Option<String>) -> Self {
        Self::TypeAlias(TypeAlias {
            name: name.into(),
            ty,
            doc,
        })
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            Self::TypeAlias(alias) => &alias.name,
            Self::Enum(decl) => &decl.name,
            Self::Function(func) => &func.name,
            Self::Raw(raw) => &raw.name,
        }
    }
}

/// Named import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImport {
    /// Imported name.
    pub name: String,
    /// `type` modifier on this specifier.
    pub type_only: bool,
}

/// What an import statement binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClause {
    /// `* as Alias`
    Namespace(String),
    /// `{ a, type B }`
    Named(Vec<NamedImport>),
}

/// One import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Bound names.
    pub clause: ImportClause,
    /// Module specifier, e.g. `./apiSchemas`.
    pub from: String,
    /// `import type` form.
    pub type_only: bool,
}

/// One output file: declarations plus the imports they need.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    /// Which file this is.
    pub kind: FileKind,
    /// File name without extension.
    pub filename: String,
    /// Header doc comment.
    pub header: Option<String>,
    /// Import statements.
    pub imports: Vec<Import>,
    /// Declarations in output order.
    pub declarations: Vec<Declaration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn union_collapses_and_dedups() {
        assert_eq!(TypeExpr::union([TypeExpr::string()]), TypeExpr::string());
        assert_eq!(TypeExpr::union([]), TypeExpr::Unknown);
        assert_eq!(
            TypeExpr::union([
                TypeExpr::qualified(Namespace::Schemas, "Pet"),
                TypeExpr::qualified(Namespace::Schemas, "Pet"),
            ]),
            TypeExpr::qualified(Namespace::Schemas, "Pet")
        );
    }

    #[test]
    fn nested_unions_flatten() {
        let inner = TypeExpr::union([TypeExpr::string(), TypeExpr::number()]);
        let outer = TypeExpr::union([inner, TypeExpr::null()]);
        assert_eq!(
            outer,
            TypeExpr::Union(vec![TypeExpr::string(), TypeExpr::number(), TypeExpr::null()])
        );
    }

    #[test]
    fn hoisting_rules() {
        assert!(TypeExpr::array(TypeExpr::string()).should_hoist());
        assert!(TypeExpr::object(vec![Member::new("a", TypeExpr::string(), false)]).should_hoist());
        assert!(!TypeExpr::object(Vec::new()).should_hoist());
        assert!(!TypeExpr::qualified(Namespace::Schemas, "Pet").should_hoist());
        assert!(!TypeExpr::union([TypeExpr::string(), TypeExpr::null()]).should_hoist());
    }

    #[test]
    fn namespace_segments() {
        assert_eq!(
            Namespace::from_component("requestBodies"),
            Some(Namespace::RequestBodies)
        );
        assert_eq!(Namespace::from_component("securitySchemes"), None);
        assert_eq!(Namespace::Utils.alias(), None);
    }
}
