//! Read-only traversal of generated declarations.
//!
//! One walker serves every usage question: it reports each symbol use with
//! its position (type or value) to a [`Visitor`], which can stop the walk
//! early by returning [`ControlFlow::Break`].

use std::ops::ControlFlow;

use crate::types::{
    Declaration, Expr, FunctionBody, FunctionDeclaration, Prop, Qualifier, Statement, TypeExpr,
    TypeReference,
};

/// Where a symbol is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Position {
    /// Erased at runtime (annotations, type arguments, aliases).
    Type,
    /// Needed at runtime (calls, member access, object literals).
    Value,
}

/// One symbol use.
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    /// A (possibly qualified) type reference.
    Type(&'a TypeReference),
    /// An identifier in an expression.
    Value(&'a str),
}

impl<'a> Symbol<'a> {
    /// The binding an import would have to provide: the qualifier for
    /// `Schemas.Pet` or `reactQuery.UseQueryOptions`, the name otherwise.
    /// Utils references print bare and so bind their own name.
    pub fn root(&self) -> &'a str {
        match *self {
            Self::Type(reference) => match &reference.qualifier {
                Some(Qualifier::Namespace(ns)) => ns.alias().unwrap_or(reference.name.as_str()),
                Some(Qualifier::Module(module)) => module,
                None => &reference.name,
            },
            Self::Value(name) => name,
        }
    }

    /// Type or value position.
    pub fn position(&self) -> Position {
        match self {
            Self::Type(_) => Position::Type,
            Self::Value(_) => Position::Value,
        }
    }
}

/// Receives symbol uses in source order.
pub trait Visitor<'a> {
    /// Value carried out of an early stop.
    type Break;

    /// Called for every symbol use.
    fn visit(&mut self, symbol: Symbol<'a>) -> ControlFlow<Self::Break>;
}

/// Walk every declaration in order.
pub fn walk_declarations<'a, V: Visitor<'a>>(
    declarations: &'a [Declaration],
    visitor: &mut V,
) -> ControlFlow<V::Break> {
    for declaration in declarations {
        match declaration {
            Declaration::TypeAlias(alias) => walk_type(&alias.ty, visitor)?,
            Declaration::Enum(_) | Declaration::Raw(_) => {}
            Declaration::Function(function) => walk_function(function, visitor)?,
        }
    }
    ControlFlow::Continue(())
}

/// Walk a type expression; every reference is a type-position use.
pub fn walk_type<'a, V: Visitor<'a>>(ty: &'a TypeExpr, visitor: &mut V) -> ControlFlow<V::Break> {
    match ty {
        TypeExpr::Reference(reference) => {
            visitor.visit(Symbol::Type(reference))?;
            walk_types(&reference.args, visitor)
        }
        TypeExpr::Array(inner) => walk_type(inner, visitor),
        TypeExpr::Union(members) | TypeExpr::Intersection(members) => walk_types(members, visitor),
        TypeExpr::Object(object) => {
            for member in &object.members {
                walk_type(&member.ty, visitor)?;
            }
            match &object.index_signature {
                Some(value) => walk_type(value, visitor),
                None => ControlFlow::Continue(()),
            }
        }
        TypeExpr::Primitive(_)
        | TypeExpr::Literal(_)
        | TypeExpr::Never
        | TypeExpr::Void
        | TypeExpr::Unknown => ControlFlow::Continue(()),
    }
}

fn walk_types<'a, V: Visitor<'a>>(types: &'a [TypeExpr], visitor: &mut V) -> ControlFlow<V::Break> {
    for ty in types {
        walk_type(ty, visitor)?;
    }
    ControlFlow::Continue(())
}

fn walk_function<'a, V: Visitor<'a>>(
    function: &'a FunctionDeclaration,
    visitor: &mut V,
) -> ControlFlow<V::Break> {
    for param in &function.type_params {
        if let Some(default) = &param.default {
            walk_type(default, visitor)?;
        }
    }
    for param in &function.params {
        if let Some(ty) = &param.ty {
            walk_type(ty, visitor)?;
        }
    }
    match &function.body {
        FunctionBody::Expr(expr) => walk_expr(expr, visitor),
        FunctionBody::Block(statements) => {
            for statement in statements {
                match statement {
                    Statement::Const { init, .. } => walk_expr(init, visitor)?,
                    Statement::Return(expr) => walk_expr(expr, visitor)?,
                }
            }
            ControlFlow::Continue(())
        }
    }
}

/// Walk an expression. Identifiers are value uses; explicit type arguments
/// and arrow parameter annotations are type uses.
pub fn walk_expr<'a, V: Visitor<'a>>(expr: &'a Expr, visitor: &mut V) -> ControlFlow<V::Break> {
    match expr {
        Expr::Ident(name) => visitor.visit(Symbol::Value(name)),
        Expr::Literal(_) => ControlFlow::Continue(()),
        Expr::Member { object, .. } => walk_expr(object, visitor),
        Expr::Call {
            callee,
            type_args,
            args,
        } => {
            walk_expr(callee, visitor)?;
            walk_types(type_args, visitor)?;
            for arg in args {
                walk_expr(arg, visitor)?;
            }
            ControlFlow::Continue(())
        }
        Expr::Object(props) => {
            for prop in props {
                match prop {
                    Prop::KeyValue(_, value) | Prop::Spread(value) => walk_expr(value, visitor)?,
                    Prop::Shorthand(name) => visitor.visit(Symbol::Value(name))?,
                }
            }
            ControlFlow::Continue(())
        }
        Expr::Arrow(arrow) => {
            for param in &arrow.params {
                if let Some(ty) = &param.ty {
                    walk_type(ty, visitor)?;
                }
            }
            walk_expr(&arrow.body, visitor)
        }
    }
}
