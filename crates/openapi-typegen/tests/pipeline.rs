//! Document-in, files-out tests for the full generation pipeline.
//!
//! Each test provides a minimal OpenAPI document and verifies the files
//! produced by [`openapi_typegen::generate`] with a specific config.

use pretty_assertions::assert_eq;

use openapi_typegen::internal::{classify_usage, Usage};
use openapi_typegen::types::{Declaration, ImportClause};
use openapi_typegen::{Config, Emit, Error, FileKind, FilenameCase, GeneratedFile};
use openapi_typegen_core::Document;

/// Helper to parse YAML and run the pipeline.
fn run_generate(input: &str, config: &Config) -> Vec<GeneratedFile> {
    let document = Document::from_yaml_str(input).expect("document should parse");
    openapi_typegen::generate(&document, config).expect("generate should succeed")
}

fn run_generate_err(input: &str) -> Error {
    let document = Document::from_yaml_str(input).expect("document should parse");
    openapi_typegen::generate(&document, &Config::default()).expect_err("generate should fail")
}

fn file(files: &[GeneratedFile], kind: FileKind) -> &GeneratedFile {
    files
        .iter()
        .find(|f| f.kind == kind)
        .unwrap_or_else(|| panic!("no {kind} file"))
}

fn declaration<'f>(file: &'f GeneratedFile, name: &str) -> &'f Declaration {
    file.declarations
        .iter()
        .find(|d| d.name() == name)
        .unwrap_or_else(|| panic!("no declaration {name}"))
}

fn imports(file: &GeneratedFile) -> String {
    file.imports.iter().map(Emit::emit).collect()
}

const PETSTORE: &str = r"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
      responses:
        '200':
          description: A list of pets
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pets'
        default:
          $ref: '#/components/responses/Error'
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
          format: int64
        name:
          type: string
        tag:
          type: string
    Pets:
      type: array
      items:
        $ref: '#/components/schemas/Pet'
    Error:
      type: object
      required: [code, message]
      properties:
        code:
          type: integer
        message:
          type: string
  responses:
    Error:
      description: Unexpected error
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Error'
";

#[test]
fn petstore_file_set() {
    let files = run_generate(PETSTORE, &Config::default());
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec!["apiSchemas", "apiResponses", "apiUtils", "apiComponents"]
    );
}

#[test]
fn petstore_schemas_file() {
    let files = run_generate(PETSTORE, &Config::default());
    assert_eq!(
        file(&files, FileKind::Schemas).emit(),
        r"/**
 * Generated by openapi-typegen
 *
 * @version 1.0.0
 */

export type Pet = {
  /**
   * @format int64
   */
  id: number;
  name: string;
  tag?: string;
};

export type Pets = Pet[];

export type Error = {
  code: number;
  message: string;
};
"
    );
}

#[test]
fn petstore_responses_import_schemas() {
    let files = run_generate(PETSTORE, &Config::default());
    let responses = file(&files, FileKind::Responses);
    assert_eq!(
        imports(responses),
        "import type * as Schemas from \"./apiSchemas\";\n"
    );
    assert_eq!(
        declaration(responses, "Error").emit(),
        "/**\n * Unexpected error\n */\nexport type Error = Schemas.Error;\n"
    );
}

#[test]
fn petstore_operations_imports() {
    let files = run_generate(PETSTORE, &Config::default());
    assert_eq!(
        imports(file(&files, FileKind::Components)),
        r#"import type * as Schemas from "./apiSchemas";
import type * as Responses from "./apiResponses";
import type { ClientErrorStatus, ServerErrorStatus } from "./apiUtils";
import { apiFetch, type ApiFetcherExtraProps, type ErrorWrapper } from "./apiFetcher";
import { useApiContext } from "./apiContext";
import * as reactQuery from "@tanstack/react-query";
"#
    );
}

#[test]
fn petstore_operation_declarations() {
    let files = run_generate(PETSTORE, &Config::default());
    let operations = file(&files, FileKind::Components);
    let names: Vec<&str> = operations.declarations.iter().map(Declaration::name).collect();
    assert_eq!(
        names,
        vec![
            "ListPetsQueryParams",
            "ListPetsError",
            "ListPetsVariables",
            "fetchListPets",
            "useListPets",
            "QueryOperation",
        ]
    );
    assert_eq!(
        declaration(operations, "ListPetsError").emit(),
        r"export type ListPetsError = ErrorWrapper<{
  status: ClientErrorStatus | ServerErrorStatus;
  payload: Responses.Error;
}>;
"
    );
    assert_eq!(
        declaration(operations, "ListPetsVariables").emit(),
        r"export type ListPetsVariables = {
  queryParams?: ListPetsQueryParams;
} & ApiFetcherExtraProps;
"
    );
}

#[test]
fn petstore_utils_file() {
    let files = run_generate(PETSTORE, &Config::default());
    let utils = file(&files, FileKind::Utils);
    let names: Vec<&str> = utils.declarations.iter().map(Declaration::name).collect();
    assert_eq!(names, vec!["ClientErrorStatus", "ServerErrorStatus"]);
    assert!(utils.imports.is_empty());
}

#[test]
fn fetcher_symbols_classified_by_usage() {
    let files = run_generate(PETSTORE, &Config::default());
    let declarations = &file(&files, FileKind::Components).declarations;
    assert_eq!(classify_usage(declarations, "apiFetch"), Usage::Value);
    assert_eq!(classify_usage(declarations, "useApiContext"), Usage::Value);
    assert_eq!(classify_usage(declarations, "ErrorWrapper"), Usage::TypeOnly);
    assert_eq!(classify_usage(declarations, "Schemas"), Usage::TypeOnly);
    assert_eq!(classify_usage(declarations, "notThere"), Usage::TypeOnly);
}

#[test]
fn status_algebra_pipeline() {
    let input = r"
openapi: 3.0.3
info:
  title: Test
  version: 0.1.0
paths:
  /things:
    post:
      operationId: create
      responses:
        '201':
          description: created
        '422':
          description: invalid
        4XX:
          description: client error
        5XX:
          description: server error
        default:
          description: anything else
";
    let files = run_generate(input, &Config::default());
    let operations = file(&files, FileKind::Components);
    assert_eq!(
        declaration(operations, "CreateError").emit(),
        r"export type CreateError = ErrorWrapper<{
  status: 422;
  payload: undefined;
} | {
  status: Exclude<ClientErrorStatus, 422>;
  payload: undefined;
} | {
  status: ServerErrorStatus;
  payload: undefined;
} | {
  status: never;
  payload: undefined;
}>;
"
    );
}

#[test]
fn server_range_with_default_uses_client_range() {
    let input = r"
paths:
  /things:
    get:
      operationId: listThings
      responses:
        5XX:
          description: server error
        default:
          description: anything else
";
    let files = run_generate(input, &Config::default());
    let error = declaration(file(&files, FileKind::Components), "ListThingsError").emit();
    assert!(error.contains("status: ServerErrorStatus;"));
    assert!(error.contains("status: ClientErrorStatus;"));
    assert!(!error.contains("Exclude"));
}

#[test]
fn utils_omitted_without_ranges() {
    let input = r"
paths:
  /things/{id}:
    get:
      operationId: getThing
      parameters:
        - {name: id, in: path, required: true, schema: {type: string}}
      responses:
        '200':
          content:
            application/json:
              schema: {type: string}
        '404':
          description: missing
";
    let files = run_generate(input, &Config::default());
    assert!(files.iter().all(|f| f.kind != FileKind::Utils));
    let operations = file(&files, FileKind::Components);
    assert!(!imports(operations).contains("./apiUtils"));
}

#[test]
fn only_request_bodies_namespace_imported() {
    let input = r"
paths:
  /pets:
    post:
      operationId: addPet
      requestBody:
        $ref: '#/components/requestBodies/PetBody'
      responses: {}
components:
  requestBodies:
    PetBody:
      required: true
      content:
        application/json:
          schema:
            type: object
            properties:
              name: {type: string}
";
    let files = run_generate(input, &Config::default());
    let operations = file(&files, FileKind::Components);
    let namespaces: Vec<&str> = operations
        .imports
        .iter()
        .filter_map(|import| match &import.clause {
            ImportClause::Namespace(alias) if import.from.starts_with("./") => Some(alias.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(namespaces, vec!["RequestBodies"]);
    assert_eq!(
        declaration(operations, "AddPetVariables").emit(),
        "export type AddPetVariables = {\n  body: RequestBodies.PetBody;\n} & ApiFetcherExtraProps;\n"
    );
}

#[test]
fn identical_success_payloads_collapse() {
    let input = r"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        '200':
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
        '203':
          content:
            application/json; charset=utf-8:
              schema: {$ref: '#/components/schemas/Pet'}
components:
  schemas:
    Pet: {type: object}
";
    let files = run_generate(input, &Config::default());
    let fetch = declaration(file(&files, FileKind::Components), "fetchListPets").emit();
    assert!(fetch.contains("apiFetch<Schemas.Pet, ListPetsError, undefined, {}, {}, {}>"));
}

#[test]
fn no_operations_no_components_file() {
    let input = r"
components:
  schemas:
    Pet: {type: string}
";
    let files = run_generate(input, &Config::default());
    let kinds: Vec<FileKind> = files.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FileKind::Schemas]);
}

#[test]
fn prefix_and_case_shape_names() {
    let config = Config::default()
        .filename_prefix("petstore")
        .filename_case(FilenameCase::Kebab);
    let files = run_generate(PETSTORE, &config);
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "petstore-schemas",
            "petstore-responses",
            "petstore-utils",
            "petstore-components"
        ]
    );
    let operations = file(&files, FileKind::Components);
    let text = imports(operations);
    assert!(text.contains(
        "import { petstoreFetch, type PetstoreFetcherExtraProps, type ErrorWrapper } from \"./petstore-fetcher\";"
    ));
    assert!(text.contains("import { usePetstoreContext } from \"./petstore-context\";"));
}

#[test]
fn enum_mode_pipeline() {
    let input = r"
components:
  schemas:
    Pet:
      type: object
      properties:
        status:
          type: string
          enum: [available, pending]
    Size:
      type: integer
      enum: [1, 2, 10]
";
    let files = run_generate(input, &Config::default().use_enums(true));
    assert_eq!(
        file(&files, FileKind::Schemas)
            .declarations
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join("\n"),
        r#"export type Pet = {
  status?: PetStatus;
};

export enum PetStatus {
  Available = "available",
  Pending = "pending",
}

export enum Size {
  One = 1,
  Two = 2,
  Ten = 10,
}
"#
    );
}

#[test]
fn enum_mode_keeps_nullable_enum_references_nullable() {
    let input = r"
components:
  schemas:
    Status:
      type: string
      nullable: true
      enum: [active, inactive]
    Pet:
      type: object
      required: [status]
      properties:
        status:
          $ref: '#/components/schemas/Status'
";
    let files = run_generate(input, &Config::default().use_enums(true));
    let schemas = file(&files, FileKind::Schemas);
    assert_eq!(
        declaration(schemas, "Status").emit(),
        "export enum Status {\n  Active = \"active\",\n  Inactive = \"inactive\",\n}\n"
    );
    assert_eq!(
        declaration(schemas, "Pet").emit(),
        "export type Pet = {\n  status: Status | null;\n};\n"
    );
}

#[test]
fn injected_headers_are_optional() {
    let input = r"
paths:
  /me:
    get:
      operationId: me
      parameters:
        - {name: Authorization, in: header, required: true, schema: {type: string}}
      responses: {}
";
    let config = Config::default().injected_headers(&["authorization"]);
    let files = run_generate(input, &config);
    let operations = file(&files, FileKind::Components);
    assert_eq!(
        declaration(operations, "MeVariables").emit(),
        "export type MeVariables = {\n  headers?: MeHeaders;\n} & ApiFetcherExtraProps;\n"
    );
}

#[test]
fn generation_is_deterministic() {
    let first = run_generate(PETSTORE, &Config::default());
    let second = run_generate(PETSTORE, &Config::default());
    assert_eq!(first, second);
}

#[test]
fn starter_files_only_on_request() {
    let files = run_generate(PETSTORE, &Config::default().emit_fetcher(true));
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "apiSchemas",
            "apiResponses",
            "apiUtils",
            "apiComponents",
            "apiFetcher",
            "apiContext",
        ]
    );

    let files = run_generate(PETSTORE, &Config::default());
    assert!(files
        .iter()
        .all(|f| f.kind != FileKind::Fetcher && f.kind != FileKind::Context));
}

#[test]
fn starter_files_declare_every_imported_symbol() {
    let files = run_generate(PETSTORE, &Config::default().emit_fetcher(true));
    let components = file(&files, FileKind::Components);
    for (kind, module) in [
        (FileKind::Fetcher, "./apiFetcher"),
        (FileKind::Context, "./apiContext"),
    ] {
        let starter = file(&files, kind);
        let import = components
            .imports
            .iter()
            .find(|i| i.from == module)
            .unwrap_or_else(|| panic!("no import from {module}"));
        let ImportClause::Named(names) = &import.clause else {
            panic!("expected named import from {module}");
        };
        for name in names {
            declaration(starter, &name.name);
        }
    }

    let context = file(&files, FileKind::Context);
    assert_eq!(
        imports(context),
        "import type * as reactQuery from \"@tanstack/react-query\";\n\
         import type { QueryOperation } from \"./apiComponents\";\n\
         import type { ApiFetcherExtraProps } from \"./apiFetcher\";\n"
    );
    assert!(file(&files, FileKind::Fetcher).imports.is_empty());
}

// --- Error path tests ---

#[test]
fn generate_rejects_unresolved_reference() {
    let err = run_generate_err(
        r"
components:
  schemas:
    Pets:
      type: array
      items:
        $ref: '#/components/schemas/Missing'
",
    );
    assert!(
        matches!(err, Error::UnresolvedReference { ref reference } if reference == "#/components/schemas/Missing"),
        "unexpected error: {err}"
    );
}

#[test]
fn generate_rejects_external_reference() {
    let err = run_generate_err(
        r"
components:
  schemas:
    Pet:
      $ref: 'other.yaml#/Pet'
",
    );
    assert!(matches!(err, Error::UnsupportedReferenceShape { .. }), "unexpected error: {err}");
}

#[test]
fn generate_rejects_duplicate_operation_ids() {
    let err = run_generate_err(
        r"
paths:
  /a:
    get: {operationId: same, responses: {}}
  /b:
    post: {operationId: same, responses: {}}
",
    );
    assert!(matches!(err, Error::DuplicateOperationId { ref operation_id } if operation_id == "same"));
}

#[test]
fn generate_rejects_operation_ids_with_same_declaration_names() {
    let err = run_generate_err(
        r"
paths:
  /a:
    get: {operationId: listPets, responses: {}}
  /b:
    get: {operationId: list_pets, responses: {}}
",
    );
    assert_eq!(err.to_string(), "duplicate operationId 'list_pets'");
}

#[test]
fn generate_rejects_invalid_component_override() {
    let err = run_generate_err(
        r"
paths:
  /a:
    get:
      operationId: a
      x-openapi-typegen-component: useSubscription
      responses: {}
",
    );
    assert_eq!(
        err.to_string(),
        "invalid component override 'useSubscription' on operation 'a'; expected 'useQuery' or 'useMutate'"
    );
}

#[test]
fn load_document_rejects_invalid_yaml() {
    let dir = std::env::temp_dir().join("openapi-typegen-pipeline-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("broken.yaml");
    std::fs::write(&path, "paths: [unclosed").unwrap();
    let err = openapi_typegen::load_document(&path).unwrap_err();
    assert!(matches!(err, Error::Yaml(_)), "unexpected error: {err}");
}
