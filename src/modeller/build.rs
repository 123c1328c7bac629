use super::classify::{partition, ClassifiedMethod, MethodCategory};
use super::resolve::{ParameterInput, ParameterResolver};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsSink, TracingSink};
use crate::error::IntrospectionError;
use crate::meta::{MetadataAccessor, Tag, TagSet, TagValue};
use crate::model::{
    MediaType, PathValue, Resource, ResourceConstructor, ResourceField, ResourceMethod,
    SetterMethod, SubResourceLocator, SubResourceMethod,
};
use crate::tags::TagTable;

static TRACING_SINK: TracingSink = TracingSink;

/// Builds a [`Resource`] for one class at a time.
///
/// Holds only shared references, so one modeller can be reused for many
/// classes and from several threads.
#[derive(Clone, Copy)]
pub struct ResourceModeller<'a> {
    accessor: &'a dyn MetadataAccessor,
    table: &'a TagTable,
    sink: &'a dyn DiagnosticsSink,
}

impl<'a> ResourceModeller<'a> {
    /// Modeller using the standard tag table and reporting diagnostics as
    /// `tracing` warnings.
    pub fn new(accessor: &'a dyn MetadataAccessor) -> Self {
        ResourceModeller {
            accessor,
            table: TagTable::standard(),
            sink: &TRACING_SINK,
        }
    }

    pub fn with_tag_table(mut self, table: &'a TagTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn DiagnosticsSink) -> Self {
        self.sink = sink;
        self
    }

    /// Introspect `class_name` and build its resource model.
    ///
    /// # Errors
    ///
    /// Only when the class (or one of its superclasses) cannot be
    /// enumerated; see [`IntrospectionError`].
    pub fn build(&self, class_name: &str) -> Result<Resource, IntrospectionError> {
        let class = self.accessor.class(class_name)?;
        let class_tags = self.accessor.class_tags(class_name)?;
        let class_encoded = class_tags.has(&self.table.encoded);

        let path = class_tags.find(&self.table.path).map(|t| self.path_value(t));
        let mut resource = Resource::new(class_name, path);
        let resolver = ParameterResolver::new(self.accessor, self.table, self.sink);

        for ctor in &class.constructors {
            let signature = ctor.signature(&class.name);
            let encoded = class_encoded || ctor.tags.has(&self.table.encoded);
            let parameters = resolver.resolve_all(
                &signature,
                encoded,
                ctor.parameters.iter().map(ParameterInput::from),
            );
            resource.constructors.push(ResourceConstructor {
                signature,
                parameters,
            });
        }

        for (declaring, field) in self.accessor.declared_fields(class_name)? {
            let name = format!("{}.{}", declaring.name, field.name);
            let Some(param) = resolver.resolve(&name, 1, class_encoded, field.into()) else {
                continue;
            };
            if param.is_entity() {
                continue;
            }
            resource.fields.push(ResourceField {
                name,
                declaring_class: declaring.name.clone(),
                parameters: vec![param],
            });
        }

        let methods = self.accessor.methods(class_name)?;
        let partition = partition(self.accessor, self.table, &methods);

        for m in &partition.setters {
            let signature = m.signature();
            let encoded = self.member_encoded(class_encoded, &m.method.tags);
            let Some(input) = m.method.parameters.first().map(ParameterInput::from) else {
                continue;
            };
            let Some(param) = resolver.resolve(&signature, 1, encoded, input) else {
                continue;
            };
            resource.setter_methods.push(SetterMethod {
                signature,
                parameters: vec![param],
            });
        }

        for m in &partition.resource_methods {
            let signature = m.signature();
            let parameters = self.method_parameters(&resolver, class_encoded, m, &signature);
            resource.resource_methods.push(ResourceMethod {
                http_method: verb_of(m),
                consumes: self.media_types(&m.method.tags, &class_tags, &self.table.consumes),
                produces: self.media_types(&m.method.tags, &class_tags, &self.table.produces),
                parameters,
                signature,
            });
        }

        for m in &partition.sub_resource_methods {
            let signature = m.signature();
            let parameters = self.method_parameters(&resolver, class_encoded, m, &signature);
            resource.sub_resource_methods.push(SubResourceMethod {
                path: self.method_path(m),
                http_method: verb_of(m),
                consumes: self.media_types(&m.method.tags, &class_tags, &self.table.consumes),
                produces: self.media_types(&m.method.tags, &class_tags, &self.table.produces),
                parameters,
                signature,
            });
        }

        for m in &partition.sub_resource_locators {
            let signature = m.signature();
            let parameters = self.method_parameters(&resolver, class_encoded, m, &signature);
            resource.sub_resource_locators.push(SubResourceLocator {
                path: self.method_path(m),
                parameters,
                signature,
            });
        }

        for m in partition.non_public_handlers() {
            let kind = match m.category {
                MethodCategory::ResourceMethod { .. } => DiagnosticKind::NonPublicResourceMethod,
                MethodCategory::SubResourceMethod { .. } => {
                    DiagnosticKind::NonPublicSubResourceMethod
                }
                _ => DiagnosticKind::NonPublicSubResourceLocator,
            };
            self.sink.record(Diagnostic::non_public(kind, m.signature()));
        }

        tracing::debug!(
            class = class_name,
            root = resource.is_root(),
            excluded = partition.excluded.len(),
            "{resource}"
        );
        Ok(resource)
    }

    fn member_encoded(&self, class_encoded: bool, member_tags: &[Tag]) -> bool {
        class_encoded || member_tags.has(&self.table.encoded)
    }

    fn method_parameters(
        &self,
        resolver: &ParameterResolver<'_>,
        class_encoded: bool,
        m: &ClassifiedMethod<'_>,
        signature: &str,
    ) -> Vec<crate::model::Parameter> {
        resolver.resolve_all(
            signature,
            self.member_encoded(class_encoded, &m.method.tags),
            m.method.parameters.iter().map(ParameterInput::from),
        )
    }

    fn path_value(&self, tag: &Tag) -> PathValue {
        let flag = |name: &str| {
            self.accessor
                .attribute(tag, name)
                .and_then(TagValue::as_bool)
                .unwrap_or(true)
        };
        PathValue {
            template: self
                .accessor
                .attribute(tag, "value")
                .and_then(TagValue::as_str)
                .unwrap_or_default()
                .to_string(),
            encode: flag("encode"),
            limited: flag("limited"),
        }
    }

    fn method_path(&self, m: &ClassifiedMethod<'_>) -> PathValue {
        m.method
            .tags
            .find(&self.table.path)
            .map(|t| self.path_value(t))
            .unwrap_or_else(|| PathValue::new(""))
    }

    /// Method-level tag overrides the class-level one; neither means empty.
    fn media_types(&self, method_tags: &[Tag], class_tags: &[Tag], kind: &str) -> Vec<MediaType> {
        let Some(tag) = method_tags.find(kind).or_else(|| class_tags.find(kind)) else {
            return Vec::new();
        };
        self.accessor
            .attribute(tag, "value")
            .map(|v| MediaType::parse_all(v.texts()))
            .unwrap_or_default()
    }
}

fn verb_of(m: &ClassifiedMethod<'_>) -> String {
    match &m.category {
        MethodCategory::ResourceMethod { http_method }
        | MethodCategory::SubResourceMethod { http_method } => http_method.clone(),
        _ => String::new(),
    }
}

/// Build the model of `class_name` with the standard tag table, sending
/// diagnostics to `tracing`.
pub fn build_resource(
    accessor: &dyn MetadataAccessor,
    class_name: &str,
) -> Result<Resource, IntrospectionError> {
    ResourceModeller::new(accessor).build(class_name)
}
