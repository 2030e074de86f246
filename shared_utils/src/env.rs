use thiserror::Error;

/// An environment variable required by the application is not set.
///
/// A variable that is present but empty (or only whitespace) is reported
/// the same way, since it can never hold a usable credential.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables. Surrounding
/// whitespace is trimmed from the returned value.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Reads every variable in `names`, failing on the first one that is missing.
///
/// Values are returned in the same order as `names`.
pub fn get_env_vars<const N: usize>(names: [&str; N]) -> Result<[String; N], MissingEnvVarError> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, name) in values.iter_mut().zip(names) {
        *slot = get_env_var(name)?;
    }
    Ok(values)
}
