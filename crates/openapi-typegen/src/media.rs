//! Media type selection for request and response bodies.

use indexmap::IndexMap;
use openapi_typegen_core::MediaType;

/// Pick the usable media type of a body.
///
/// Checked in order: `*/*`, any `application/json` variant (parameters such
/// as `; charset=utf-8` are ignored), `application/octet-stream`,
/// `multipart/form-data`, any `text/csv` variant. Other media types are
/// never used.
pub fn compatible(content: &IndexMap<String, MediaType>) -> Option<&MediaType> {
    let preferences: [fn(&str) -> bool; 5] = [
        |m| m == "*/*",
        |m| m == "application/json",
        |m| m == "application/octet-stream",
        |m| m == "multipart/form-data",
        |m| m == "text/csv",
    ];
    preferences.iter().find_map(|matches| {
        content
            .iter()
            .find(|(key, _)| matches(&essence(key)))
            .map(|(_, media)| media)
    })
}

/// `type/subtype` without parameters, lowercased.
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use openapi_typegen_core::{RefOr, Reference};

    fn content(keys: &[&str]) -> IndexMap<String, MediaType> {
        keys.iter()
            .map(|key| {
                (
                    (*key).to_string(),
                    MediaType {
                        schema: Some(RefOr::Ref(Reference::new(*key))),
                    },
                )
            })
            .collect()
    }

    fn picked(keys: &[&str]) -> Option<String> {
        compatible(&content(keys))
            .and_then(|m| m.schema.as_ref())
            .and_then(RefOr::as_ref_path)
            .map(ToString::to_string)
    }

    #[test]
    fn preference_order_not_declaration_order() {
        assert_eq!(
            picked(&["text/csv", "multipart/form-data", "application/json"]).as_deref(),
            Some("application/json")
        );
        assert_eq!(
            picked(&["application/json", "*/*"]).as_deref(),
            Some("*/*")
        );
    }

    #[test]
    fn parameters_are_ignored() {
        assert_eq!(
            picked(&["application/json; charset=utf-8"]).as_deref(),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(
            picked(&["text/csv;header=present"]).as_deref(),
            Some("text/csv;header=present")
        );
    }

    #[test]
    fn unsupported_media_types() {
        assert_eq!(picked(&["application/xml", "text/plain"]), None);
        assert_eq!(picked(&[]), None);
    }
}
