use std::collections::BTreeMap;

use regex_lite::Regex;
use swagger2_spec::{Method, Operation, Parameter, PathItem};

use crate::definition::CompiledDefinition;
use crate::matcher::PathTemplate;

/// A parameter together with its compiled validator.
#[derive(Debug)]
pub struct CompiledParameter {
    pub parameter: Parameter,
    pub definition: CompiledDefinition,
}

/// An operation with its precedence-resolved parameters and response
/// validators.
#[derive(Debug)]
pub struct CompiledOperation {
    pub operation: Operation,
    /// At most one entry per `(name, in)`; operation-level entries win.
    pub resolved_parameters: Vec<CompiledParameter>,
    /// Status code (or `default`) to response validator.
    pub responses: BTreeMap<String, CompiledDefinition>,
}

impl CompiledOperation {
    /// The response validator for `status`, falling back to `default`.
    pub fn response(&self, status: u16) -> Option<&CompiledDefinition> {
        self.responses
            .get(&status.to_string())
            .or_else(|| self.responses.get("default"))
    }
}

/// One path template with its operations.
#[derive(Debug)]
pub struct CompiledRoute {
    pub(crate) template: PathTemplate,
    pub(crate) path_item: PathItem,
    pub(crate) operations: BTreeMap<Method, CompiledOperation>,
}

impl CompiledRoute {
    pub fn name(&self) -> &str {
        self.template.name()
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn path_item(&self) -> &PathItem {
        &self.path_item
    }

    pub fn operation(&self, method: Method) -> Option<&CompiledOperation> {
        self.operations.get(&method)
    }

    pub fn operations(&self) -> impl Iterator<Item = (Method, &CompiledOperation)> {
        self.operations.iter().map(|(method, op)| (*method, op))
    }
}

/// A compiled document: route matchers plus validators.
///
/// Immutable once built; lookups and validation can run from many threads.
#[derive(Debug)]
pub struct Compiled {
    pub(crate) base_path: String,
    pub(crate) routes: Vec<CompiledRoute>,
}

impl Compiled {
    /// Find the single template matching `path`.
    ///
    /// Returns `None` when no template matches, or when more than one does.
    pub fn lookup(&self, path: &str) -> Option<CompiledPath<'_>> {
        let mut matches = self.routes.iter().filter(|route| route.template.is_match(path));
        let route = matches.next()?;
        if let Some(other) = matches.next() {
            swagger2_telemetry::log_route_not_found!(
                path,
                first = route.name(),
                second = other.name(),
                "ambiguous path matches more than one template"
            );
            return None;
        }

        let request_path = path.get(self.base_path.len()..).unwrap_or_default().to_string();
        let path_parameters = route.template.captures(path).unwrap_or_default();

        Some(CompiledPath {
            route,
            request_path,
            path_parameters,
        })
    }

    /// `basePath` with trailing slashes removed.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }
}

/// The result of a successful lookup: the matched route plus the values
/// captured from the concrete path.
#[derive(Debug, Clone)]
pub struct CompiledPath<'a> {
    route: &'a CompiledRoute,
    request_path: String,
    path_parameters: Vec<(String, String)>,
}

impl<'a> CompiledPath<'a> {
    /// The matched template (e.g. `/pets/{petId}`).
    pub fn name(&self) -> &'a str {
        self.route.name()
    }

    pub fn regex(&self) -> &'a Regex {
        self.route.template.regex()
    }

    /// Template segments in order.
    pub fn expected(&self) -> &'a [String] {
        self.route.template.expected()
    }

    pub fn path_item(&self) -> &'a PathItem {
        &self.route.path_item
    }

    /// The looked-up path with the base path removed.
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn operation(&self, method: Method) -> Option<&'a CompiledOperation> {
        self.route.operation(method)
    }

    /// A placeholder value captured from the concrete path.
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value.as_str())
    }
}
