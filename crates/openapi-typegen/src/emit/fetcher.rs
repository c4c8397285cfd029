//! Starter fetcher and context modules.
//!
//! The operations file only imports these. When the user has not written
//! their own yet, these starters make the output type-check: a `fetch`
//! based fetcher and a context hook with no extra options. Both are plain
//! source templates; the IR does not model async functions or control flow.

use crate::config::{Config, FileKind};
use crate::imports::{REACT_QUERY_ALIAS, REACT_QUERY_MODULE};
use crate::operation::ERROR_WRAPPER;
use crate::types::{Declaration, Import, ImportClause, NamedImport, RawDeclaration};

const EXTRA_PROPS: &str = r"export type __EXTRA_PROPS__ = {
  /**
   * Added to every fetcher call, e.g. an auth token.
   */
};";

const ERROR_WRAPPER_TYPE: &str = r#"export type __ERROR_WRAPPER__<TError> =
  | TError
  | { status: "unknown"; payload: string };"#;

const OPTIONS: &str = r"export type __OPTIONS__<TBody, THeaders, TQueryParams, TPathParams> = {
  url: string;
  method: string;
  body?: TBody;
  headers?: THeaders;
  queryParams?: TQueryParams;
  pathParams?: TPathParams;
  signal?: AbortSignal;
} & __EXTRA_PROPS__;";

const BASE_URL: &str = r#"const baseUrl = "";"#;

const FETCH: &str = r#"export async function __FETCH__<
  TData,
  TError,
  TBody extends {} | FormData | undefined | null,
  THeaders extends {},
  TQueryParams extends {},
  TPathParams extends {},
>({
  url,
  method,
  body,
  headers,
  pathParams,
  queryParams,
  signal,
}: __OPTIONS__<TBody, THeaders, TQueryParams, TPathParams>): Promise<TData> {
  let error: __ERROR_WRAPPER__<TError>;
  try {
    const requestHeaders: Record<string, string> = {
      ...(headers as Record<string, string> | undefined),
    };
    if (!(body instanceof FormData)) {
      requestHeaders["Content-Type"] = "application/json";
    }
    const response = await fetch(
      `${baseUrl}${resolveUrl(
        url,
        queryParams as Record<string, string> | undefined,
        pathParams as Record<string, string> | undefined,
      )}`,
      {
        signal,
        method: method.toUpperCase(),
        body: body instanceof FormData ? body : body ? JSON.stringify(body) : undefined,
        headers: requestHeaders,
      },
    );
    if (!response.ok) {
      try {
        error = { status: response.status, payload: await response.json() } as TError;
      } catch (e) {
        error = { status: "unknown", payload: e instanceof Error ? e.message : String(e) };
      }
    } else if (response.headers.get("content-type")?.includes("json")) {
      return await response.json();
    } else {
      return (await response.blob()) as unknown as TData;
    }
  } catch (e) {
    error = { status: "unknown", payload: e instanceof Error ? e.message : String(e) };
  }
  throw error;
}"#;

const RESOLVE_URL: &str = r"const resolveUrl = (
  url: string,
  queryParams: Record<string, string> = {},
  pathParams: Record<string, string> = {},
) => {
  let query = new URLSearchParams(queryParams).toString();
  if (query) query = `?${query}`;
  return url.replace(/\{\w*\}/g, (key) => pathParams[key.slice(1, -1)] ?? key) + query;
};";

const CONTEXT: &str = r"export type __CONTEXT__ = {
  fetcherOptions: __EXTRA_PROPS__;
  queryOptions: {
    enabled?: boolean;
  };
  queryKeyFn: (operation: __QUERY_OPERATION__) => __REACT_QUERY__.QueryKey;
};";

const HOOK: &str = r#"export function __HOOK__<
  TQueryFnData = unknown,
  TError = unknown,
  TData = TQueryFnData,
>(
  _queryOptions?: Omit<
    __REACT_QUERY__.UseQueryOptions<TQueryFnData, TError, TData>,
    "queryKey" | "queryFn"
  >,
): __CONTEXT__ {
  return {
    fetcherOptions: {},
    queryOptions: {},
    queryKeyFn,
  };
}"#;

const QUERY_KEY_FN: &str = r"export const queryKeyFn = (
  operation: __QUERY_OPERATION__,
): __REACT_QUERY__.QueryKey => [operation.path, operation.operationId, operation.variables];";

/// Fills the `__NAME__` placeholders of a template with configured names.
fn render(template: &str, config: &Config) -> String {
    [
        ("__EXTRA_PROPS__", config.extra_props_type()),
        ("__OPTIONS__", config.fetcher_options_type()),
        ("__FETCH__", config.fetcher_fn()),
        ("__CONTEXT__", config.context_type()),
        ("__HOOK__", config.context_hook()),
        ("__ERROR_WRAPPER__", ERROR_WRAPPER.to_string()),
        ("__QUERY_OPERATION__", super::operations::QUERY_OPERATION.to_string()),
        ("__REACT_QUERY__", REACT_QUERY_ALIAS.to_string()),
    ]
    .iter()
    .fold(template.to_string(), |text, (placeholder, name)| {
        text.replace(placeholder, name)
    })
}

fn raw(name: String, template: &str, config: &Config) -> Declaration {
    Declaration::Raw(RawDeclaration {
        name,
        text: render(template, config),
    })
}

/// Declarations of the starter fetcher module.
pub fn fetcher(config: &Config) -> Vec<Declaration> {
    vec![
        raw(config.extra_props_type(), EXTRA_PROPS, config),
        raw(ERROR_WRAPPER.to_string(), ERROR_WRAPPER_TYPE, config),
        raw(config.fetcher_options_type(), OPTIONS, config),
        raw("baseUrl".to_string(), BASE_URL, config),
        raw(config.fetcher_fn(), FETCH, config),
        raw("resolveUrl".to_string(), RESOLVE_URL, config),
    ]
}

/// Imports and declarations of the starter context module.
pub fn context(config: &Config) -> (Vec<Import>, Vec<Declaration>) {
    let named = |kind: FileKind, name: String| Import {
        clause: ImportClause::Named(vec![NamedImport {
            name,
            type_only: true,
        }]),
        from: format!("./{}", config.filename(kind)),
        type_only: true,
    };
    let imports = vec![
        Import {
            clause: ImportClause::Namespace(REACT_QUERY_ALIAS.to_string()),
            from: REACT_QUERY_MODULE.to_string(),
            type_only: true,
        },
        named(
            FileKind::Components,
            super::operations::QUERY_OPERATION.to_string(),
        ),
        named(FileKind::Fetcher, config.extra_props_type()),
    ];
    let declarations = vec![
        raw(config.context_type(), CONTEXT, config),
        raw(config.context_hook(), HOOK, config),
        raw("queryKeyFn".to_string(), QUERY_KEY_FN, config),
    ];
    (imports, declarations)
}
