//! # CLI Module
//!
//! Command-line interface for building resource models from class
//! descriptor files.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Build and print the model of one or more classes, followed by the
//! diagnostics recorded while building them:
//!
//! ```bash
//! resmodel inspect --classes demos/colours.yaml --class Colours --format json
//! ```
//!
//! Options:
//! - `--classes <FILE>` - Class descriptor file, YAML or JSON (required)
//! - `--class <NAME>` - Class to model; repeatable (default: every class)
//! - `--format <FORMAT>` - `text`, `json` or `yaml` (default: text)
//! - `--tags <FILE>` - Alternate TOML tag table
//! - `--fail-on-diagnostics` - Exit non-zero when diagnostics were recorded
//!
//! ### `classify`
//!
//! Show the category each method of a class falls into:
//!
//! ```bash
//! resmodel classify --classes demos/colours.yaml --class Colours
//! ```
//!
//! ### `list`
//!
//! List every class in a descriptor file with its root path:
//!
//! ```bash
//! resmodel list --classes demos/colours.yaml
//! ```
//!
//! Fatal introspection errors (unknown class, denied enumeration, cyclic
//! hierarchy) end the process with a non-zero status.

mod commands;


pub use commands::{execute, inspect, run_cli, Cli, Commands, InspectReport, OutputFormat};
