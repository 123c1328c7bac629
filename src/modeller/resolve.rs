use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::meta::{FieldDescriptor, MetadataAccessor, ParameterDescriptor, Tag};
use crate::model::{Parameter, SourceKind};
use crate::tags::{ParamTag, TagTable};

/// What the resolver needs to know about one parameter slot.
#[derive(Debug, Clone, Copy)]
pub struct ParameterInput<'a> {
    pub raw_type: &'a str,
    pub generic_type: Option<&'a str>,
    /// `None` when the tag list itself is unavailable.
    pub tags: Option<&'a [Tag]>,
}

impl<'a> From<&'a ParameterDescriptor> for ParameterInput<'a> {
    fn from(p: &'a ParameterDescriptor) -> Self {
        ParameterInput {
            raw_type: &p.raw_type,
            generic_type: p.generic_type.as_deref(),
            tags: p.tags.as_deref(),
        }
    }
}

impl<'a> From<&'a FieldDescriptor> for ParameterInput<'a> {
    fn from(f: &'a FieldDescriptor) -> Self {
        ParameterInput {
            raw_type: &f.raw_type,
            generic_type: f.generic_type.as_deref(),
            tags: f.tags.as_deref(),
        }
    }
}

/// Resolves parameter sources against one tag table.
#[derive(Clone, Copy)]
pub struct ParameterResolver<'a> {
    accessor: &'a dyn MetadataAccessor,
    table: &'a TagTable,
    sink: &'a dyn DiagnosticsSink,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(
        accessor: &'a dyn MetadataAccessor,
        table: &'a TagTable,
        sink: &'a dyn DiagnosticsSink,
    ) -> Self {
        ParameterResolver {
            accessor,
            table,
            sink,
        }
    }

    /// Resolve a single parameter.
    ///
    /// `member` and `position` (1-based) only label diagnostics. `encoded`
    /// is the flag inherited from the member and class. Returns `None` when
    /// the tag list is unavailable.
    pub fn resolve(
        &self,
        member: &str,
        position: usize,
        encoded: bool,
        input: ParameterInput<'_>,
    ) -> Option<Parameter> {
        let tags = input.tags?;

        let mut source_tag: Option<&Tag> = None;
        let mut source = None;
        let mut source_name = None;
        let mut recognized_seen = false;
        let mut encoded = encoded;
        let mut default_value = None;

        for tag in tags {
            match self.table.param_tag(self.accessor, tag) {
                ParamTag::Source { kind, name } => {
                    if recognized_seen {
                        self.sink
                            .record(Diagnostic::ambiguous_parameter(member, position));
                    }
                    recognized_seen = true;
                    source_tag = Some(tag);
                    source = Some(kind);
                    source_name = name;
                }
                ParamTag::Encoded => encoded = true,
                ParamTag::Default(value) => default_value = value,
                ParamTag::Unknown { name, .. } => {
                    source_tag = Some(tag);
                    source = Some(SourceKind::Unknown);
                    source_name = name;
                }
            }
        }

        Some(Parameter {
            raw_type: input.raw_type.to_string(),
            generic_type: input.generic_type.unwrap_or(input.raw_type).to_string(),
            source: source.unwrap_or(SourceKind::Entity),
            source_name,
            encoded,
            default_value,
            source_tag: source_tag.cloned(),
            tags: tags.to_vec(),
        })
    }

    /// Resolve every parameter of a member. If any parameter fails the
    /// whole list is empty.
    pub fn resolve_all<'p>(
        &self,
        member: &str,
        encoded: bool,
        inputs: impl IntoIterator<Item = ParameterInput<'p>>,
    ) -> Vec<Parameter> {
        let mut out = Vec::new();
        for (i, input) in inputs.into_iter().enumerate() {
            match self.resolve(member, i + 1, encoded, input) {
                Some(p) => out.push(p),
                None => {
                    tracing::debug!(member, position = i + 1, "tag list unavailable, dropping parameters");
                    return Vec::new();
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, DiagnosticLog};
    use crate::meta::ClassRegistry;

    fn resolve_with(tags: Vec<Tag>, encoded: bool) -> (Parameter, DiagnosticLog) {
        let registry = ClassRegistry::new();
        let log = DiagnosticLog::new();
        let p = ParameterDescriptor {
            raw_type: "String".into(),
            generic_type: None,
            tags: Some(tags),
        };
        let resolver = ParameterResolver::new(&registry, TagTable::standard(), &log);
        let param = resolver
            .resolve("void A.m(String)", 1, encoded, (&p).into())
            .unwrap();
        (param, log)
    }

    #[test]
    fn test_single_recognized_tag() {
        let (p, log) = resolve_with(vec![Tag::with_value("PathParam", "id")], false);
        assert_eq!(p.source, SourceKind::Path);
        assert_eq!(p.source_name.as_deref(), Some("id"));
        assert!(!p.encoded);
        assert_eq!(p.generic_type, "String");
        assert!(log.is_empty());
    }

    #[test]
    fn test_last_recognized_tag_wins_with_diagnostic() {
        let (p, log) = resolve_with(
            vec![
                Tag::with_value("QueryParam", "a"),
                Tag::with_value("HeaderParam", "b"),
            ],
            false,
        );
        assert_eq!(p.source, SourceKind::Header);
        assert_eq!(p.source_name.as_deref(), Some("b"));
        assert_eq!(log.count(DiagnosticKind::AmbiguousParameter), 1);
        assert_eq!(log.snapshot()[0].position, Some(1));
    }

    #[test]
    fn test_unknown_after_recognized_wins_silently() {
        let (p, log) = resolve_with(
            vec![
                Tag::with_value("QueryParam", "a"),
                Tag::with_value("Session", "sid"),
            ],
            false,
        );
        assert_eq!(p.source, SourceKind::Unknown);
        assert_eq!(p.source_name.as_deref(), Some("sid"));
        assert_eq!(p.source_tag.as_ref().map(|t| t.kind.as_str()), Some("Session"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_recognized_after_unknown_wins() {
        let (p, log) = resolve_with(
            vec![Tag::new("Marker"), Tag::with_value("CookieParam", "c")],
            false,
        );
        assert_eq!(p.source, SourceKind::Cookie);
        assert_eq!(p.source_name.as_deref(), Some("c"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_encoded_and_default_combine_with_source() {
        let (p, _) = resolve_with(
            vec![
                Tag::new("Encoded"),
                Tag::with_value("MatrixParam", "m"),
                Tag::with_value("DefaultValue", "7"),
            ],
            false,
        );
        assert_eq!(p.source, SourceKind::Matrix);
        assert!(p.encoded);
        assert_eq!(p.default_value.as_deref(), Some("7"));
        assert_eq!(p.tags.len(), 3);
    }

    #[test]
    fn test_no_source_tag_is_entity() {
        let (p, _) = resolve_with(vec![Tag::new("Encoded")], true);
        assert_eq!(p.source, SourceKind::Entity);
        assert_eq!(p.source_name, None);
        assert!(p.source_tag.is_none());
        assert!(p.encoded);
    }

    #[test]
    fn test_context_has_no_name() {
        let (p, _) = resolve_with(vec![Tag::new("Context")], false);
        assert_eq!(p.source, SourceKind::Context);
        assert_eq!(p.source_name, None);
    }

    #[test]
    fn test_missing_tag_list_drops_member_parameters() {
        let registry = ClassRegistry::new();
        let log = DiagnosticLog::new();
        let resolver = ParameterResolver::new(&registry, TagTable::standard(), &log);
        let ok = ParameterDescriptor::new("int").tag(Tag::with_value("QueryParam", "n"));
        let broken = ParameterDescriptor::new("String").without_tags();
        let params = [ok.clone(), broken, ok];
        let out = resolver.resolve_all("m", false, params.iter().map(ParameterInput::from));
        assert!(out.is_empty());

        let params = [ParameterDescriptor::new("int"), ParameterDescriptor::new("long")];
        let out = resolver.resolve_all("m", false, params.iter().map(ParameterInput::from));
        assert_eq!(out.len(), 2);
    }
}
