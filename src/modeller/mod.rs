//! # Modeller
//!
//! Turns the metadata of one class into a [`Resource`](crate::model::Resource).
//!
//! ## Overview
//!
//! Building a model happens in three steps:
//!
//! 1. **Classification**: every method visible on the class (declared or
//!    inherited and not overridden) is placed in exactly one category:
//!    setter, resource method, sub-resource method, sub-resource locator,
//!    or excluded.
//! 2. **Parameter resolution**: each parameter slot of each member is
//!    resolved against the active [`TagTable`](crate::tags::TagTable) to a
//!    source kind, a lookup name, an encoding flag and a default value.
//! 3. **Assembly**: members are collected into the resource in declaration
//!    order, content types are chosen (method level overrides class level),
//!    and non-public handlers are reported.
//!
//! Diagnostics are passed to a [`DiagnosticsSink`](crate::diagnostics::DiagnosticsSink)
//! and never stop the build. Only failures to enumerate a class surface as
//! errors.
//!
//! ## Example
//!
//! ```rust,ignore
//! use resmodel::diagnostics::DiagnosticLog;
//! use resmodel::meta::load_registry;
//! use resmodel::modeller::ResourceModeller;
//!
//! let registry = load_registry("demos/colours.yaml".as_ref())?;
//! let log = DiagnosticLog::new();
//! let resource = ResourceModeller::new(&registry)
//!     .with_sink(&log)
//!     .build("Colours")?;
//! assert!(resource.is_root());
//! ```

mod build;
mod classify;
mod resolve;

pub use build::*;
pub use classify::*;
pub use resolve::*;
