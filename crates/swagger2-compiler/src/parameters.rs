use swagger2_spec::Parameter;

/// Merge path-level and operation-level parameters.
///
/// Parameters are keyed by `(name, in)`. An operation-level parameter replaces
/// a path-level one with the same key in place; new keys are appended in the
/// order they are declared.
pub fn resolve_parameters(path_level: &[Parameter], operation_level: &[Parameter]) -> Vec<Parameter> {
    let mut resolved: Vec<Parameter> = Vec::with_capacity(path_level.len() + operation_level.len());

    for parameter in path_level.iter().chain(operation_level) {
        match resolved
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location)
        {
            Some(existing) => *existing = parameter.clone(),
            None => resolved.push(parameter.clone()),
        }
    }

    resolved
}
