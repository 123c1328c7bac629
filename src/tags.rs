//! # Tag Table
//!
//! Assigns roles to tag kinds: which kinds mark a parameter source, which
//! mark raw encoding or a default value, and which carry the path,
//! content-type and verb information at class and method level.
//!
//! The standard table uses the conventional names (`PathParam`,
//! `QueryParam`, `Encoded`, `Path`, `Consumes`, `HttpMethod`, ...). It is
//! built once and shared read-only; alternate tables can be built in code or
//! loaded from TOML and passed to the modeller by reference.
//!
//! ```toml
//! path = "Route"
//!
//! [sources]
//! PathParam = "path"
//! QueryParam = "query"
//! Ctx = "context"
//! ```
//!
//! Keys left out of a TOML table keep their standard value; a `[sources]`
//! section replaces the standard source assignments as a whole.

use crate::meta::{MetadataAccessor, Tag, TagValue};
use crate::model::SourceKind;
use anyhow::{bail, Context};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

static STANDARD: Lazy<TagTable> = Lazy::new(TagTable::build_standard);

/// Role of a single parameter tag, as decided by a [`TagTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamTag {
    /// A recognized source tag. `name` is `None` for CONTEXT.
    Source {
        kind: SourceKind,
        name: Option<String>,
    },
    Encoded,
    Default(Option<String>),
    /// Any other tag; `name` is its text `value`, if it has one.
    Unknown { kind: String, name: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagTable {
    pub path: String,
    pub encoded: String,
    pub default_value: String,
    pub consumes: String,
    pub produces: String,
    /// Meta-tag that marks a tag kind as an HTTP verb.
    pub http_method: String,
    pub sources: BTreeMap<String, SourceKind>,
}

impl TagTable {
    /// The process-wide standard table.
    pub fn standard() -> &'static TagTable {
        &STANDARD
    }

    fn build_standard() -> TagTable {
        let sources = [
            ("PathParam", SourceKind::Path),
            ("QueryParam", SourceKind::Query),
            ("MatrixParam", SourceKind::Matrix),
            ("HeaderParam", SourceKind::Header),
            ("CookieParam", SourceKind::Cookie),
            ("Context", SourceKind::Context),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        TagTable {
            path: "Path".to_string(),
            encoded: "Encoded".to_string(),
            default_value: "DefaultValue".to_string(),
            consumes: "Consumes".to_string(),
            produces: "Produces".to_string(),
            http_method: "HttpMethod".to_string(),
            sources,
        }
    }

    /// Assign a source kind to a tag kind.
    ///
    /// Only the six recognized kinds can be assigned; ENTITY and UNKNOWN are
    /// outcomes of resolution, not tag roles, and are ignored here.
    pub fn with_source(mut self, tag_kind: impl Into<String>, source: SourceKind) -> Self {
        if SourceKind::RECOGNIZED.contains(&source) {
            self.sources.insert(tag_kind.into(), source);
        }
        self
    }

    pub fn without_source(mut self, tag_kind: &str) -> Self {
        self.sources.remove(tag_kind);
        self
    }

    pub fn source_of(&self, tag_kind: &str) -> Option<SourceKind> {
        self.sources.get(tag_kind).copied()
    }

    /// Decide the role of one parameter tag.
    pub fn param_tag(&self, accessor: &dyn MetadataAccessor, tag: &Tag) -> ParamTag {
        if let Some(kind) = self.source_of(&tag.kind) {
            let name = if kind == SourceKind::Context {
                None
            } else {
                text_value(accessor, tag)
            };
            return ParamTag::Source { kind, name };
        }
        if tag.kind == self.encoded {
            return ParamTag::Encoded;
        }
        if tag.kind == self.default_value {
            return ParamTag::Default(text_value(accessor, tag));
        }
        ParamTag::Unknown {
            kind: tag.kind.clone(),
            name: text_value(accessor, tag),
        }
    }

    /// Parse a table from TOML, starting from the standard table.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, unknown keys, or a source entry mapped to
    /// `entity` or `unknown`.
    pub fn from_toml_str(content: &str) -> anyhow::Result<TagTable> {
        let table: TagTable = toml::from_str(content)?;
        if let Some((kind, source)) = table
            .sources
            .iter()
            .find(|(_, s)| !SourceKind::RECOGNIZED.contains(*s))
        {
            bail!("tag {kind} cannot be mapped to source {source}");
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> anyhow::Result<TagTable> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading tag table from {}", path.display()))?;
        TagTable::from_toml_str(&content)
            .with_context(|| format!("parsing tag table {}", path.display()))
    }
}

impl Default for TagTable {
    fn default() -> Self {
        TagTable::standard().clone()
    }
}

/// The tag's `value` argument when it is text; `None` otherwise, silently.
fn text_value(accessor: &dyn MetadataAccessor, tag: &Tag) -> Option<String> {
    accessor
        .attribute(tag, "value")
        .and_then(TagValue::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{ClassRegistry, TagDefinition};

    #[test]
    fn test_standard_roles() {
        let registry = ClassRegistry::new();
        let table = TagTable::standard();
        assert_eq!(
            table.param_tag(&registry, &Tag::with_value("HeaderParam", "x-id")),
            ParamTag::Source {
                kind: SourceKind::Header,
                name: Some("x-id".into())
            }
        );
        assert_eq!(
            table.param_tag(&registry, &Tag::with_value("Context", "ignored")),
            ParamTag::Source {
                kind: SourceKind::Context,
                name: None
            }
        );
        assert_eq!(table.param_tag(&registry, &Tag::new("Encoded")), ParamTag::Encoded);
        assert_eq!(
            table.param_tag(&registry, &Tag::with_value("DefaultValue", "10")),
            ParamTag::Default(Some("10".into()))
        );
    }

    #[test]
    fn test_unknown_tag_value_extraction() {
        let mut registry = ClassRegistry::new();
        registry.define(TagDefinition::new("Session").with_default("value", "sid"));
        let table = TagTable::standard();
        assert_eq!(
            table.param_tag(&registry, &Tag::new("Session")),
            ParamTag::Unknown {
                kind: "Session".into(),
                name: Some("sid".into())
            }
        );
        // Non-text value: silently no name.
        assert_eq!(
            table.param_tag(&registry, &Tag::with_value("Limit", 5_i64)),
            ParamTag::Unknown {
                kind: "Limit".into(),
                name: None
            }
        );
    }

    #[test]
    fn test_alternate_table_from_toml() {
        let table = TagTable::from_toml_str(
            r#"
path = "Route"

[sources]
Var = "path"
Ctx = "context"
"#,
        )
        .unwrap();
        assert_eq!(table.path, "Route");
        assert_eq!(table.encoded, "Encoded");
        assert_eq!(table.source_of("Var"), Some(SourceKind::Path));
        assert_eq!(table.source_of("PathParam"), None);
    }

    #[test]
    fn test_toml_rejects_entity_source() {
        let err = TagTable::from_toml_str("[sources]\nBody = \"entity\"\n").unwrap_err();
        assert!(err.to_string().contains("cannot be mapped"));
        assert!(TagTable::from_toml_str("bogus = 1").is_err());
    }

    #[test]
    fn test_builder_ignores_unassignable_kinds() {
        let table = TagTable::default()
            .with_source("Body", SourceKind::Entity)
            .with_source("Q", SourceKind::Query)
            .without_source("QueryParam");
        assert_eq!(table.source_of("Body"), None);
        assert_eq!(table.source_of("Q"), Some(SourceKind::Query));
        assert_eq!(table.source_of("QueryParam"), None);
    }
}
