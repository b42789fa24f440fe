use std::fmt;
use thiserror::Error;

/// Errors produced while parsing a resource name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("resource name '{0}' is missing a type")]
    MissingType(String),

    #[error("resource name '{0}' is missing an entry")]
    MissingEntry(String),
}

/// A resource name of the form `[package:]type/entry`.
///
/// The package component is optional; callers that need a fully-qualified
/// name default it to the overlay's target package. Type and entry are
/// mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    pub package: Option<String>,
    pub type_name: String,
    pub entry: String,
}

impl ResourceName {
    /// Parse a `[package:]type/entry` name.
    ///
    /// An empty package component (`:type/entry`) is treated the same as an
    /// omitted one.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        let (package, rest) = match name.split_once(':') {
            Some((package, rest)) => (Some(package), rest),
            None => (None, name),
        };

        let (type_name, entry) = rest
            .split_once('/')
            .ok_or_else(|| NameError::MissingType(name.to_string()))?;
        if type_name.is_empty() {
            return Err(NameError::MissingType(name.to_string()));
        }
        if entry.is_empty() {
            return Err(NameError::MissingEntry(name.to_string()));
        }

        Ok(Self {
            package: package.filter(|p| !p.is_empty()).map(str::to_string),
            type_name: type_name.to_string(),
            entry: entry.to_string(),
        })
    }

    /// The package component, or `default_package` if the name did not
    /// carry one.
    pub fn package_or<'a>(&'a self, default_package: &'a str) -> &'a str {
        self.package.as_deref().unwrap_or(default_package)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{}:{}/{}", package, self.type_name, self.entry),
            None => write!(f, "{}/{}", self.type_name, self.entry),
        }
    }
}
