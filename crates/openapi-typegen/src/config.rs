//! Generation settings loaded from YAML or set programmatically.
//!
//! # File format
//!
//! ```yaml
//! # openapi-typegen.yaml
//! filename_prefix: petstore
//!
//! # camel | snake | kebab | pascal
//! filename_case: camel
//!
//! # Emit `export enum` declarations instead of inline literal unions.
//! use_enums: true
//!
//! # Headers supplied by the fetcher; never required from callers.
//! injected_headers:
//!   - Authorization
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::Deserialize;

/// Casing strategy applied to generated file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameCase {
    /// `petstoreRequestBodies`
    #[default]
    Camel,
    /// `petstore_request_bodies`
    Snake,
    /// `petstore-request-bodies`
    Kebab,
    /// `PetstoreRequestBodies`
    Pascal,
}

impl FilenameCase {
    fn apply(self, name: &str) -> String {
        match self {
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::Pascal => name.to_upper_camel_case(),
        }
    }
}

impl FromStr for FilenameCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel" => Ok(Self::Camel),
            "snake" => Ok(Self::Snake),
            "kebab" => Ok(Self::Kebab),
            "pascal" => Ok(Self::Pascal),
            other => Err(format!(
                "unknown filename case '{other}' (expected camel, snake, kebab or pascal)"
            )),
        }
    }
}

/// The files a generation pass may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Component schemas.
    Schemas,
    /// Component parameters.
    Parameters,
    /// Component request bodies.
    RequestBodies,
    /// Component responses.
    Responses,
    /// Status-range helper types.
    Utils,
    /// Per-operation types, fetchers and hooks.
    Components,
    /// User-owned fetch implementation (import target only).
    Fetcher,
    /// User-owned react context (import target only).
    Context,
}

impl FileKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::Parameters => "parameters",
            Self::RequestBodies => "request-bodies",
            Self::Responses => "responses",
            Self::Utils => "utils",
            Self::Components => "components",
            Self::Fetcher => "fetcher",
            Self::Context => "context",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Generation config.
///
/// Loaded from a YAML file via [`Config::load`] or built with the
/// `#[must_use]` setters; setters called after loading override file values.
///
/// # Example
///
/// ```ignore
/// let config = Config::default()
///     .filename_prefix("petstore")
///     .use_enums(true)
///     .injected_headers(&["Authorization"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for file names and fetcher/context symbols.
    pub filename_prefix: String,

    /// Casing applied to `prefix-suffix` file names.
    pub filename_case: FilenameCase,

    /// Turn schema enums into `export enum` declarations.
    pub use_enums: bool,

    /// Header names the fetcher supplies (matched case-insensitively).
    pub injected_headers: Vec<String>,

    /// Also write starter fetcher and context modules.
    pub emit_fetcher: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filename_prefix: "api".to_string(),
            filename_case: FilenameCase::default(),
            use_enums: false,
            injected_headers: Vec::new(),
            emit_fetcher: false,
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Set the file name and symbol prefix.
    #[must_use]
    pub fn filename_prefix(mut self, prefix: &str) -> Self {
        self.filename_prefix = prefix.to_string();
        self
    }

    /// Set the file name casing.
    #[must_use]
    pub fn filename_case(mut self, case: FilenameCase) -> Self {
        self.filename_case = case;
        self
    }

    /// Enable or disable enum declarations.
    #[must_use]
    pub fn use_enums(mut self, enabled: bool) -> Self {
        self.use_enums = enabled;
        self
    }

    /// Set the header names supplied by the fetcher.
    #[must_use]
    pub fn injected_headers(mut self, headers: &[&str]) -> Self {
        self.injected_headers = headers.iter().map(ToString::to_string).collect();
        self
    }

    /// Enable or disable the starter fetcher and context files.
    #[must_use]
    pub fn emit_fetcher(mut self, enabled: bool) -> Self {
        self.emit_fetcher = enabled;
        self
    }

    /// File name (without extension) for `kind`.
    pub fn filename(&self, kind: FileKind) -> String {
        self.filename_case
            .apply(&format!("{}-{}", self.filename_prefix, kind.suffix()))
    }

    /// Whether `name` is an injected header.
    pub fn is_injected_header(&self, name: &str) -> bool {
        self.injected_headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }

    /// `<prefix>Fetch`, the fetch function exported by the fetcher module.
    pub(crate) fn fetcher_fn(&self) -> String {
        format!("{}Fetch", self.filename_prefix.to_lower_camel_case())
    }

    /// `<Prefix>FetcherExtraProps`, merged into every operation's variables.
    pub(crate) fn extra_props_type(&self) -> String {
        format!(
            "{}FetcherExtraProps",
            self.filename_prefix.to_upper_camel_case()
        )
    }

    /// `<Prefix>FetcherOptions`, the argument of the fetch function.
    pub(crate) fn fetcher_options_type(&self) -> String {
        format!("{}FetcherOptions", self.filename_prefix.to_upper_camel_case())
    }

    /// `<Prefix>Context`, the value returned by the context hook.
    pub(crate) fn context_type(&self) -> String {
        format!("{}Context", self.filename_prefix.to_upper_camel_case())
    }

    /// `use<Prefix>Context`, the hook exported by the context module.
    pub(crate) fn context_hook(&self) -> String {
        format!("use{}Context", self.filename_prefix.to_upper_camel_case())
    }
}
