use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dereferenced Swagger 2.0 document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Always `"2.0"` once the document has been checked.
    pub swagger: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Prefix prepended to every path template when routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Path templates (e.g. `/pets/{petId}`) to their path items.
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    /// Named schemas. Recursive definitions keep their `$ref` pointers.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub definitions: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub responses: Map<String, Value>,
    /// Everything else (security, tags, `x-*` extensions).
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// The `info` object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// The operations available on a single path template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    /// Parameters shared by every operation on this path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl PathItem {
    /// The operation declared for `method`, if any.
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
        }
    }

    /// All declared operations, in [`Method::ALL`] order.
    pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
        Method::ALL
            .iter()
            .filter_map(move |&method| self.operation(method).map(|op| (method, op)))
    }
}

/// A single API operation (path + method).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Status code (or `default`) to response.
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// A declared response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,
    /// Body schema. No schema means no body is expected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: Location,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Wrapper schema (body parameters only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<CollectionFormat>,
    /// Remaining keywords (`enum`, `minimum`, `pattern`, `maxItems`, ...).
    #[serde(flatten)]
    pub constraints: Map<String, Value>,
}

/// Keys in [`Parameter::constraints`] that are not JSON Schema keywords.
const NON_SCHEMA_KEYS: &[&str] = &["allowEmptyValue", "collectionFormat", "required", "in", "name"];

impl Parameter {
    /// Render the parameter's own fields as a JSON Schema.
    ///
    /// `file` is not a JSON Schema type and is dropped, so file uploads only
    /// have to be present.
    pub fn as_schema(&self) -> Value {
        let mut schema: Map<String, Value> = self
            .constraints
            .iter()
            .filter(|(key, _)| !key.starts_with("x-") && !NON_SCHEMA_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if let Some(param_type) = self.param_type.as_deref().filter(|t| *t != "file") {
            schema.insert("type".into(), Value::String(param_type.to_string()));
        }
        if let Some(format) = &self.format {
            schema.insert("format".into(), Value::String(format.clone()));
        }
        if let Some(items) = &self.items {
            schema.insert("items".into(), items.clone());
        }
        Value::Object(schema)
    }

    /// The `type` of array elements, when this is an array parameter.
    pub fn item_type(&self) -> Option<&str> {
        self.items.as_ref()?.get("type")?.as_str()
    }

    /// The collection format, defaulting to `csv`.
    pub fn collection_format(&self) -> CollectionFormat {
        self.collection_format.unwrap_or_default()
    }
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    Query,
    Path,
    Body,
    Header,
    FormData,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Query => "query",
            Location::Path => "path",
            Location::Body => "body",
            Location::Header => "header",
            Location::FormData => "formData",
        }
    }

    /// Parse the value of a parameter's `in` field.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "query" => Some(Location::Query),
            "path" => Some(Location::Path),
            "body" => Some(Location::Body),
            "header" => Some(Location::Header),
            "formData" => Some(Location::FormData),
            _ => None,
        }
    }

    /// Transport locations carry string values that need coercion.
    pub fn is_transport(&self) -> bool {
        matches!(self, Location::Query | Location::Path | Location::Header)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delimiter convention for array-valued string parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    #[default]
    Csv,
    Ssv,
    Tsv,
    Pipes,
    /// Repeated `key=value` pairs; the caller already supplies a sequence.
    Multi,
}

impl CollectionFormat {
    /// The element delimiter, or `None` for `multi`.
    pub fn delimiter(&self) -> Option<char> {
        match self {
            CollectionFormat::Csv => Some(','),
            CollectionFormat::Ssv => Some(' '),
            CollectionFormat::Tsv => Some('\t'),
            CollectionFormat::Pipes => Some('|'),
            CollectionFormat::Multi => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(CollectionFormat::Csv),
            "ssv" => Some(CollectionFormat::Ssv),
            "tsv" => Some(CollectionFormat::Tsv),
            "pipes" => Some(CollectionFormat::Pipes),
            "multi" => Some(CollectionFormat::Multi),
            _ => None,
        }
    }
}

/// HTTP methods a Swagger 2.0 path item can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Patch,
    ];

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
    }

    /// The lowercase key used in path items.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Put => "put",
            Method::Post => "post",
            Method::Delete => "delete",
            Method::Options => "options",
            Method::Head => "head",
            Method::Patch => "patch",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}
