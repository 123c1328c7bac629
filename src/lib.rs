//! # resmodel
//!
//! **resmodel** builds resource models from declarative class metadata: it
//! looks at a class, its constructors, fields and methods, and the tags
//! attached to them, and works out which members handle HTTP requests and
//! where each parameter gets its value.
//!
//! ## Overview
//!
//! A class is described by a [`ClassDescriptor`](meta::ClassDescriptor)
//! carrying tags such as `Path`, `GET`, `Produces` or `QueryParam`. The
//! modeller reads these through the [`MetadataAccessor`](meta::MetadataAccessor)
//! trait and produces a [`Resource`]:
//!
//! - the root path, for classes tagged with `Path`
//! - constructors and fields whose parameters are injected
//! - setter methods
//! - resource methods, sub-resource methods and sub-resource locators,
//!   with their verb, path and content types
//!
//! Each parameter is resolved to a [`SourceKind`](model::SourceKind)
//! (path, query, matrix, header, cookie, context, entity or unknown) plus
//! a lookup name, a raw-encoding flag and an optional default value.
//!
//! ## Architecture
//!
//! - **[`meta`]** - Class descriptors, tags, the accessor trait and the
//!   descriptor file loader
//! - **[`tags`]** - Role table mapping tag kinds to their meaning
//! - **[`modeller`]** - Method classification, parameter resolution and
//!   model assembly
//! - **[`model`]** - The immutable resource model
//! - **[`diagnostics`]** - Non-fatal findings and the sinks that receive them
//! - **[`error`]** - Fatal introspection errors
//! - **[`logging`]** / **[`config`]** - Environment-driven setup for the binary
//! - **[`cli`]** - The `resmodel` command-line tool
//!
//! ### Modelling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant Loader as meta::load_registry
//!     participant Modeller as ResourceModeller
//!     participant Accessor as MetadataAccessor
//!     participant Sink as DiagnosticsSink
//!
//!     User->>Loader: classes.yaml
//!     Loader-->>User: ClassRegistry
//!     User->>Modeller: build("Colours")
//!     Modeller->>Accessor: class, class_tags, declared_fields, methods
//!     Modeller->>Modeller: classify methods
//!     Modeller->>Modeller: resolve parameters
//!     Modeller->>Sink: ambiguity / visibility diagnostics
//!     Modeller-->>User: Resource
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use resmodel::meta::{ClassDescriptor, ClassRegistry, MethodDescriptor, ParameterDescriptor, Tag};
//! use resmodel::model::SourceKind;
//! use resmodel::build_resource;
//!
//! let mut registry = ClassRegistry::new();
//! registry.register(
//!     ClassDescriptor::new("Colours")
//!         .tag(Tag::with_value("Path", "/colours"))
//!         .method(
//!             MethodDescriptor::new("list")
//!                 .returns("String")
//!                 .tag(Tag::new("GET"))
//!                 .param(ParameterDescriptor::new("String").tag(Tag::with_value("QueryParam", "match"))),
//!         ),
//! );
//!
//! let resource = build_resource(&registry, "Colours").unwrap();
//! assert_eq!(resource.path.unwrap().template, "/colours");
//! assert_eq!(resource.resource_methods[0].parameters[0].source, SourceKind::Query);
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! resmodel inspect --classes demos/colours.yaml --format json
//! resmodel classify --classes demos/colours.yaml --class Form
//! resmodel list --classes demos/colours.yaml
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod meta;
pub mod model;
pub mod modeller;
pub mod tags;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog, DiagnosticsSink};
pub use error::IntrospectionError;
pub use meta::{load_registry, ClassRegistry, MetadataAccessor};
pub use model::{Parameter, Resource, SourceKind};
pub use modeller::{build_resource, ResourceModeller};
pub use tags::TagTable;
