//! Plain-text TypeScript rendering via the [`Emit`] trait.
//!
//! Output is deterministic and reasonably indented but not formatted;
//! run a formatter over the written files if house style matters.

use crate::types::{
    Arrow, Binding, Declaration, EnumDeclaration, Expr, FunctionBody, FunctionDeclaration,
    GeneratedFile, Import, ImportClause, Literal, Member, ObjectType, Param, Primitive, Prop,
    Qualifier, Statement, TypeAlias, TypeExpr, TypeParam, TypeReference,
};

const INDENT: &str = "  ";

/// Object literal expressions with more entries than this, or with an arrow
/// function value, break over lines.
const INLINE_OBJECT_MAX: usize = 3;

/// Render an IR node as TypeScript source text.
pub trait Emit {
    /// Render at the given indentation depth.
    fn emit_at(&self, depth: usize) -> String;

    /// Render at top level.
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

/// Whether `name` can be written without quotes as a property or enum key.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quote `name` as a string literal unless it is a plain identifier.
pub fn quote_if_needed(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn pad(depth: usize) -> String {
    INDENT.repeat(depth)
}

fn doc_block(doc: Option<&str>, depth: usize) -> String {
    let Some(doc) = doc.filter(|d| !d.trim().is_empty()) else {
        return String::new();
    };
    let pad = pad(depth);
    let mut out = format!("{pad}/**\n");
    for line in doc.lines() {
        let line = line.replace("*/", "*\\/");
        if line.is_empty() {
            out.push_str(&format!("{pad} *\n"));
        } else {
            out.push_str(&format!("{pad} * {line}\n"));
        }
    }
    out.push_str(&format!("{pad} */\n"));
    out
}

fn join<T: Emit>(items: &[T], depth: usize, sep: &str) -> String {
    items
        .iter()
        .map(|item| item.emit_at(depth))
        .collect::<Vec<_>>()
        .join(sep)
}

impl Emit for Literal {
    fn emit_at(&self, _depth: usize) -> String {
        match self {
            Self::String(s) => string_literal(s),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
        }
    }
}

impl Emit for Primitive {
    fn emit_at(&self, _depth: usize) -> String {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::Undefined => "undefined",
        }
        .to_string()
    }
}

impl Emit for TypeReference {
    fn emit_at(&self, depth: usize) -> String {
        let mut out = match &self.qualifier {
            Some(Qualifier::Namespace(ns)) => match ns.alias() {
                Some(alias) => format!("{alias}.{}", self.name),
                None => self.name.clone(),
            },
            Some(Qualifier::Module(module)) => format!("{module}.{}", self.name),
            None => self.name.clone(),
        };
        if !self.args.is_empty() {
            out.push('<');
            out.push_str(&join(&self.args, depth, ", "));
            out.push('>');
        }
        out
    }
}

impl Emit for Member {
    fn emit_at(&self, depth: usize) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!(
            "{}{}{}{opt}: {};\n",
            doc_block(self.doc.as_deref(), depth),
            pad(depth),
            quote_if_needed(&self.name),
            self.ty.emit_at(depth)
        )
    }
}

impl Emit for ObjectType {
    fn emit_at(&self, depth: usize) -> String {
        if self.is_empty() {
            return "{}".to_string();
        }
        let mut out = String::from("{\n");
        for member in &self.members {
            out.push_str(&member.emit_at(depth + 1));
        }
        if let Some(value) = &self.index_signature {
            out.push_str(&format!(
                "{}[key: string]: {};\n",
                pad(depth + 1),
                value.emit_at(depth + 1)
            ));
        }
        out.push_str(&pad(depth));
        out.push('}');
        out
    }
}

impl Emit for TypeExpr {
    fn emit_at(&self, depth: usize) -> String {
        match self {
            Self::Primitive(p) => p.emit_at(depth),
            Self::Literal(lit) => lit.emit_at(depth),
            Self::Array(inner) => {
                let inner_str = inner.emit_at(depth);
                if matches!(**inner, Self::Union(_) | Self::Intersection(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            Self::Union(types) => join(types, depth, " | "),
            Self::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit_at(depth);
                    if matches!(t, Self::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            Self::Object(object) => object.emit_at(depth),
            Self::Reference(reference) => reference.emit_at(depth),
            Self::Never => "never".to_string(),
            Self::Void => "void".to_string(),
            Self::Unknown => "unknown".to_string(),
        }
    }
}

impl Emit for TypeParam {
    fn emit_at(&self, depth: usize) -> String {
        match &self.default {
            Some(default) => format!("{} = {}", self.name, default.emit_at(depth)),
            None => self.name.clone(),
        }
    }
}

impl Emit for Binding {
    fn emit_at(&self, _depth: usize) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Destructure(names) => format!("{{ {} }}", names.join(", ")),
        }
    }
}

impl Emit for Param {
    fn emit_at(&self, depth: usize) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{opt}: {}", self.binding.emit_at(depth), ty.emit_at(depth)),
            None => format!("{}{opt}", self.binding.emit_at(depth)),
        }
    }
}

impl Emit for Prop {
    fn emit_at(&self, depth: usize) -> String {
        match self {
            Self::KeyValue(key, value) => {
                format!("{}: {}", quote_if_needed(key), value.emit_at(depth))
            }
            Self::Shorthand(name) => name.clone(),
            Self::Spread(value) => format!("...{}", value.emit_at(depth)),
        }
    }
}

impl Prop {
    fn holds_arrow(&self) -> bool {
        matches!(self, Self::KeyValue(_, Expr::Arrow(_)))
    }
}

impl Emit for Arrow {
    fn emit_at(&self, depth: usize) -> String {
        format!(
            "({}) => {}",
            join(&self.params, depth, ", "),
            self.body.emit_at(depth)
        )
    }
}

impl Emit for Expr {
    fn emit_at(&self, depth: usize) -> String {
        match self {
            Self::Ident(name) => name.clone(),
            Self::Literal(lit) => lit.emit_at(depth),
            Self::Member { object, property } => format!("{}.{property}", object.emit_at(depth)),
            Self::Call {
                callee,
                type_args,
                args,
            } => {
                let generics = if type_args.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", join(type_args, depth, ", "))
                };
                format!(
                    "{}{generics}({})",
                    callee.emit_at(depth),
                    join(args, depth, ", ")
                )
            }
            Self::Object(props) if props.is_empty() => "{}".to_string(),
            Self::Object(props)
                if props.len() <= INLINE_OBJECT_MAX && !props.iter().any(Prop::holds_arrow) =>
            {
                format!("{{ {} }}", join(props, depth, ", "))
            }
            Self::Object(props) => {
                let mut out = String::from("{\n");
                for prop in props {
                    out.push_str(&format!("{}{},\n", pad(depth + 1), prop.emit_at(depth + 1)));
                }
                out.push_str(&pad(depth));
                out.push('}');
                out
            }
            Self::Arrow(arrow) => arrow.emit_at(depth),
        }
    }
}

impl Emit for Statement {
    fn emit_at(&self, depth: usize) -> String {
        match self {
            Self::Const { binding, init } => format!(
                "{}const {} = {};\n",
                pad(depth),
                binding.emit_at(depth),
                init.emit_at(depth)
            ),
            Self::Return(expr) => format!("{}return {};\n", pad(depth), expr.emit_at(depth)),
        }
    }
}

impl Emit for TypeAlias {
    fn emit_at(&self, depth: usize) -> String {
        format!(
            "{}{}export type {} = {};\n",
            doc_block(self.doc.as_deref(), depth),
            pad(depth),
            self.name,
            self.ty.emit_at(depth)
        )
    }
}

impl Emit for EnumDeclaration {
    fn emit_at(&self, depth: usize) -> String {
        let mut out = doc_block(self.doc.as_deref(), depth);
        out.push_str(&format!("{}export enum {} {{\n", pad(depth), self.name));
        for member in &self.members {
            out.push_str(&format!(
                "{}{} = {},\n",
                pad(depth + 1),
                quote_if_needed(&member.identifier),
                member.value.emit_at(depth + 1)
            ));
        }
        out.push_str(&pad(depth));
        out.push_str("}\n");
        out
    }
}

impl Emit for FunctionDeclaration {
    fn emit_at(&self, depth: usize) -> String {
        let generics = if self.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", join(&self.type_params, depth, ", "))
        };
        let head = format!(
            "{}{}export const {} = {generics}({}) =>",
            doc_block(self.doc.as_deref(), depth),
            pad(depth),
            self.name,
            join(&self.params, depth, ", ")
        );
        match &self.body {
            FunctionBody::Expr(expr) => format!(
                "{head}\n{}{};\n",
                pad(depth + 1),
                expr.emit_at(depth + 1)
            ),
            FunctionBody::Block(statements) => {
                let mut out = format!("{head} {{\n");
                for statement in statements {
                    out.push_str(&statement.emit_at(depth + 1));
                }
                out.push_str(&pad(depth));
                out.push_str("};\n");
                out
            }
        }
    }
}

impl Emit for Declaration {
    fn emit_at(&self, depth: usize) -> String {
        match self {
            Self::TypeAlias(alias) => alias.emit_at(depth),
            Self::Enum(decl) => decl.emit_at(depth),
            Self::Function(func) => func.emit_at(depth),
            Self::Raw(raw) => {
                let mut text = raw.text.clone();
                if !text.ends_with('\n') {
                    text.push('\n');
                }
                text
            }
        }
    }
}

impl Emit for Import {
    fn emit_at(&self, _depth: usize) -> String {
        let keyword = if self.type_only { "import type" } else { "import" };
        let clause = match &self.clause {
            ImportClause::Namespace(alias) => format!("* as {alias}"),
            ImportClause::Named(names) => {
                let names: Vec<String> = names
                    .iter()
                    .map(|n| {
                        if n.type_only && !self.type_only {
                            format!("type {}", n.name)
                        } else {
                            n.name.clone()
                        }
                    })
                    .collect();
                format!("{{ {} }}", names.join(", "))
            }
        };
        format!("{keyword} {clause} from {};\n", string_literal(&self.from))
    }
}

impl Emit for GeneratedFile {
    fn emit_at(&self, _depth: usize) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(&doc_block(Some(header), 0));
        }
        for import in &self.imports {
            out.push_str(&import.emit());
        }
        for declaration in &self.declarations {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&declaration.emit());
        }
        out
    }
}
