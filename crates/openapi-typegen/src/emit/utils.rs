//! Status-range helper types.

use crate::operation::status::{
    range_union, CLIENT_ERROR_CODES, CLIENT_ERROR_STATUS, SERVER_ERROR_CODES, SERVER_ERROR_STATUS,
};
use crate::types::Declaration;

/// Declarations for the requested helper names, in a fixed order.
pub fn utils(used: &[String]) -> Vec<Declaration> {
    [
        (CLIENT_ERROR_STATUS, CLIENT_ERROR_CODES),
        (SERVER_ERROR_STATUS, SERVER_ERROR_CODES),
    ]
    .into_iter()
    .filter(|(name, _)| used.iter().any(|u| u == name))
    .map(|(name, codes)| Declaration::alias(name, range_union(codes), None))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::Emit;

    #[test]
    fn only_used_helpers() {
        let decls = utils(&["ServerErrorStatus".to_string()]);
        assert_eq!(decls.len(), 1);
        let text = decls[0].emit();
        assert!(text.starts_with("export type ServerErrorStatus = 500 | 501 | "));
        assert!(text.ends_with(" | 599;\n"));
        assert!(utils(&[]).is_empty());
    }
}
