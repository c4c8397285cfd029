//! Error status algebra.
//!
//! Each non-2xx response key maps to a status discriminant: a literal code,
//! a status range minus the codes declared alongside it, or for `default`
//! whatever the other keys leave uncovered.

use std::ops::RangeInclusive;

use crate::types::{Namespace, TypeExpr};

/// Name of the 400..=499 literal union helper.
pub const CLIENT_ERROR_STATUS: &str = "ClientErrorStatus";

/// Name of the 500..=599 literal union helper.
pub const SERVER_ERROR_STATUS: &str = "ServerErrorStatus";

/// Codes covered by [`CLIENT_ERROR_STATUS`].
pub const CLIENT_ERROR_CODES: RangeInclusive<u16> = 400..=499;

/// Codes covered by [`SERVER_ERROR_STATUS`].
pub const SERVER_ERROR_CODES: RangeInclusive<u16> = 500..=599;

/// A parsed response map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKey {
    /// Explicit code, e.g. `404`.
    Code(u16),
    /// `2XX`
    SuccessRange,
    /// `4XX`
    ClientRange,
    /// `5XX`
    ServerRange,
    /// `default`
    Default,
}

impl StatusKey {
    /// Parse a response key; `None` for keys this generator does not model
    /// (`1XX`, `3XX`, garbage).
    pub fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "2xx" => Some(Self::SuccessRange),
            "4xx" => Some(Self::ClientRange),
            "5xx" => Some(Self::ServerRange),
            other => other.parse().ok().map(Self::Code),
        }
    }

    /// 2xx responses feed the data type; everything else is an error.
    pub fn is_success(self) -> bool {
        match self {
            Self::Code(code) => (200..=299).contains(&code),
            Self::SuccessRange => true,
            Self::ClientRange | Self::ServerRange | Self::Default => false,
        }
    }
}

/// Every status key declared by one operation.
#[derive(Debug, Clone, Default)]
pub struct DeclaredStatuses {
    codes: Vec<u16>,
    client_range: bool,
    server_range: bool,
}

impl DeclaredStatuses {
    /// Collect from parsed keys.
    pub fn new(keys: impl IntoIterator<Item = StatusKey>) -> Self {
        let mut declared = Self::default();
        for key in keys {
            match key {
                StatusKey::Code(code) => declared.codes.push(code),
                StatusKey::ClientRange => declared.client_range = true,
                StatusKey::ServerRange => declared.server_range = true,
                StatusKey::SuccessRange | StatusKey::Default => {}
            }
        }
        declared
    }

    fn codes_in(&self, range: &RangeInclusive<u16>) -> Vec<u16> {
        self.codes
            .iter()
            .copied()
            .filter(|code| range.contains(code))
            .collect()
    }

    /// Status discriminant for an error entry.
    pub fn discriminant(&self, key: StatusKey) -> TypeExpr {
        match key {
            StatusKey::Code(code) => TypeExpr::number_literal(code),
            StatusKey::ClientRange => {
                exclude(client(), &self.codes_in(&CLIENT_ERROR_CODES))
            }
            StatusKey::ServerRange => {
                exclude(server(), &self.codes_in(&SERVER_ERROR_CODES))
            }
            StatusKey::Default => match (self.client_range, self.server_range) {
                (true, true) => TypeExpr::Never,
                (true, false) => server(),
                (false, true) => client(),
                (false, false) => exclude(
                    TypeExpr::union([client(), server()]),
                    &self.codes_in(&(*CLIENT_ERROR_CODES.start()..=*SERVER_ERROR_CODES.end())),
                ),
            },
            StatusKey::SuccessRange => TypeExpr::Never,
        }
    }
}

fn client() -> TypeExpr {
    TypeExpr::qualified(Namespace::Utils, CLIENT_ERROR_STATUS)
}

fn server() -> TypeExpr {
    TypeExpr::qualified(Namespace::Utils, SERVER_ERROR_STATUS)
}

/// `Exclude<range, a | b>`, or `range` itself when nothing is excluded.
fn exclude(range: TypeExpr, codes: &[u16]) -> TypeExpr {
    if codes.is_empty() {
        return range;
    }
    let codes = TypeExpr::union(codes.iter().map(|&code| TypeExpr::number_literal(code)));
    TypeExpr::generic("Exclude", vec![range, codes])
}

/// `400 | 401 | ...` literal union for a status range.
pub fn range_union(range: RangeInclusive<u16>) -> TypeExpr {
    TypeExpr::union(range.map(TypeExpr::number_literal))
}
