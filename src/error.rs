//! Fatal introspection failures.
//!
//! Everything else the modeller encounters (missing tags, ambiguous sources,
//! unreadable custom tag values) degrades locally or is reported through a
//! [`DiagnosticsSink`](crate::diagnostics::DiagnosticsSink). Only the cases
//! below reach the caller.

/// Errors that stop a class from being modelled at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntrospectionError {
    /// The class is not known to the metadata source.
    #[error("unknown class: {0}")]
    UnknownClass(String),
    /// The host policy forbids enumerating the members of this class.
    #[error("member enumeration denied for class {0}")]
    AccessDenied(String),
    /// The superclass chain loops back on itself.
    #[error("class hierarchy of {0} contains a cycle")]
    HierarchyCycle(String),
}

impl IntrospectionError {
    /// Name of the class the failure refers to.
    pub fn class_name(&self) -> &str {
        match self {
            IntrospectionError::UnknownClass(name)
            | IntrospectionError::AccessDenied(name)
            | IntrospectionError::HierarchyCycle(name) => name,
        }
    }
}
