use regex_lite::Regex;

/// An anchored matcher for one path template.
///
/// Literal text is matched exactly, every `{name}` placeholder matches one
/// non-empty path segment, and a single trailing slash is tolerated.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    name: String,
    regex: Regex,
    expected: Vec<String>,
    params: Vec<String>,
}

impl PathTemplate {
    /// Compile `template` under an already-normalized `base_path`.
    pub fn compile(base_path: &str, template: &str) -> Result<Self, regex_lite::Error> {
        let (pattern, params) = template_pattern(base_path, template);
        Ok(Self {
            name: template.to_string(),
            regex: Regex::new(&pattern)?,
            expected: parse_path_template(template),
            params,
        })
    }

    /// The path template as written in the document (e.g. `/pets/{petId}`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Template segments in order (e.g. `["pets", "{petId}"]`).
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// Placeholder names in order of appearance.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Capture placeholder values from a concrete path.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.params
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// Strip trailing slashes from a `basePath` (`/` becomes empty).
pub fn normalize_base_path(base_path: Option<&str>) -> String {
    base_path.unwrap_or("").trim_end_matches('/').to_string()
}

/// Split a path template into its non-empty segments.
pub fn parse_path_template(template: &str) -> Vec<String> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the anchored regex source for a template and collect placeholder names.
fn template_pattern(base_path: &str, template: &str) -> (String, Vec<String>) {
    let mut pattern = String::with_capacity(base_path.len() + template.len() + 16);
    let mut params = Vec::new();

    pattern.push('^');
    pattern.push_str(&regex_lite::escape(base_path));

    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(len) = rest[open..].find('}') else {
            break;
        };
        pattern.push_str(&regex_lite::escape(&rest[..open]));
        params.push(rest[open + 1..open + len].to_string());
        pattern.push_str("([^/]+)");
        rest = &rest[open + len + 1..];
    }
    pattern.push_str(&regex_lite::escape(rest));
    pattern.push_str("/?$");

    (pattern, params)
}
