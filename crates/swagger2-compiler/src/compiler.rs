use std::collections::BTreeMap;
use std::path::Path;

use swagger2_spec::{parse_document, parse_document_file, Document, PathItem};

use crate::compiled::{Compiled, CompiledOperation, CompiledParameter, CompiledRoute};
use crate::definition::{CompileOptions, SchemaFactory};
use crate::error::CompileError;
use crate::matcher::{normalize_base_path, PathTemplate};
use crate::parameters::resolve_parameters;

/// Compile a dereferenced document with default options.
pub fn compile(document: &Document) -> Compiled {
    compile_with_options(document, &CompileOptions::default())
}

/// Compile a dereferenced document.
///
/// Never fails. Templates that cannot be turned into a matcher are skipped
/// and schemas that cannot be compiled reject every value.
pub fn compile_with_options(document: &Document, options: &CompileOptions) -> Compiled {
    let base_path = normalize_base_path(document.base_path.as_deref());
    let factory = SchemaFactory::new(&document.definitions, options);

    let mut routes = Vec::with_capacity(document.paths.len());
    for (name, path_item) in &document.paths {
        let template = match PathTemplate::compile(&base_path, name) {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(template = %name, error = %e, "path template failed to compile; skipping");
                continue;
            }
        };
        tracing::debug!(
            template = %name,
            regex = %template.regex().as_str(),
            "compiled path template"
        );

        routes.push(CompiledRoute {
            operations: compile_operations(name, path_item, &factory),
            path_item: path_item.clone(),
            template,
        });
    }

    swagger2_telemetry::log_document_compiled!(
        title = %document.info.title,
        base_path = %base_path,
        paths = routes.len(),
        "document compiled"
    );

    Compiled { base_path, routes }
}

fn compile_operations(
    name: &str,
    path_item: &PathItem,
    factory: &SchemaFactory<'_>,
) -> BTreeMap<swagger2_spec::Method, CompiledOperation> {
    path_item
        .operations()
        .map(|(method, operation)| {
            let context = format!("{} {}", method, name);

            let resolved_parameters = resolve_parameters(&path_item.parameters, &operation.parameters)
                .into_iter()
                .map(|parameter| CompiledParameter {
                    definition: factory.parameter(&parameter, &context),
                    parameter,
                })
                .collect();

            let responses = operation
                .responses
                .iter()
                .map(|(status, response)| {
                    let definition = factory.response(response, &format!("{} {}", context, status));
                    (status.clone(), definition)
                })
                .collect();

            let compiled = CompiledOperation {
                operation: operation.clone(),
                resolved_parameters,
                responses,
            };
            (method, compiled)
        })
        .collect()
}

/// Parse, check, dereference and compile a YAML/JSON document.
pub fn compile_spec(input: &str) -> Result<Compiled, CompileError> {
    let document = parse_document(input)?;
    Ok(compile(&document))
}

/// Parse, check, dereference and compile a document file.
pub fn compile_spec_file(path: &Path) -> Result<Compiled, CompileError> {
    let document = parse_document_file(path)?;
    swagger2_telemetry::log_document_loaded!(
        path = %path.display(),
        title = %document.info.title,
        paths = document.paths.len(),
        "document loaded"
    );
    Ok(compile(&document))
}
