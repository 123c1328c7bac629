use crate::meta::{ClassDescriptor, MetadataAccessor, MethodDescriptor, TagSet, TagValue};
use crate::tags::TagTable;

/// The facts about a method that decide its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTraits {
    /// Verb from the first `HttpMethod` meta-tag, if any. A verb tag whose
    /// meta-tag has no text value yields an empty verb.
    pub verb: Option<String>,
    pub has_path: bool,
    pub arity: usize,
    pub returns_void: bool,
    pub setter_name: bool,
    pub public: bool,
}

impl MethodTraits {
    pub fn of(accessor: &dyn MetadataAccessor, table: &TagTable, method: &MethodDescriptor) -> Self {
        let verb = accessor
            .meta_tags_of(&method.tags, &table.http_method)
            .first()
            .map(|meta| {
                accessor
                    .attribute(meta, "value")
                    .and_then(TagValue::as_str)
                    .unwrap_or_default()
                    .to_string()
            });
        MethodTraits {
            verb,
            has_path: method.tags.has(&table.path),
            arity: method.parameters.len(),
            returns_void: method.returns_void(),
            setter_name: method.name.starts_with("set"),
            public: method.visibility.is_public(),
        }
    }

    pub fn category(&self) -> MethodCategory {
        match (&self.verb, self.has_path) {
            (Some(verb), false) => MethodCategory::ResourceMethod {
                http_method: verb.clone(),
            },
            (Some(verb), true) => MethodCategory::SubResourceMethod {
                http_method: verb.clone(),
            },
            (None, true) => MethodCategory::SubResourceLocator,
            (None, false) if self.arity == 1 && self.returns_void && self.setter_name => {
                MethodCategory::Setter
            }
            (None, false) => MethodCategory::Excluded,
        }
    }
}

/// Exactly one category per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodCategory {
    Setter,
    ResourceMethod { http_method: String },
    SubResourceMethod { http_method: String },
    SubResourceLocator,
    Excluded,
}

impl MethodCategory {
    /// Categories whose non-public members are reported.
    pub fn is_handler_like(&self) -> bool {
        matches!(
            self,
            MethodCategory::ResourceMethod { .. }
                | MethodCategory::SubResourceMethod { .. }
                | MethodCategory::SubResourceLocator
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            MethodCategory::Setter => "setter",
            MethodCategory::ResourceMethod { .. } => "resource method",
            MethodCategory::SubResourceMethod { .. } => "sub-resource method",
            MethodCategory::SubResourceLocator => "sub-resource locator",
            MethodCategory::Excluded => "excluded",
        }
    }
}

pub fn classify_method(
    accessor: &dyn MetadataAccessor,
    table: &TagTable,
    method: &MethodDescriptor,
) -> MethodCategory {
    MethodTraits::of(accessor, table, method).category()
}

/// A method together with its declaring class and classification.
#[derive(Debug, Clone)]
pub struct ClassifiedMethod<'m> {
    pub declaring: &'m ClassDescriptor,
    pub method: &'m MethodDescriptor,
    pub traits: MethodTraits,
    pub category: MethodCategory,
}

impl ClassifiedMethod<'_> {
    pub fn signature(&self) -> String {
        self.method.signature(&self.declaring.name)
    }
}

/// Methods split by category, each list in input order.
#[derive(Debug, Clone, Default)]
pub struct MethodPartition<'m> {
    pub setters: Vec<ClassifiedMethod<'m>>,
    pub resource_methods: Vec<ClassifiedMethod<'m>>,
    pub sub_resource_methods: Vec<ClassifiedMethod<'m>>,
    pub sub_resource_locators: Vec<ClassifiedMethod<'m>>,
    pub excluded: Vec<ClassifiedMethod<'m>>,
}

impl<'m> MethodPartition<'m> {
    /// Handler-like methods that are not public, in category order.
    pub fn non_public_handlers(&self) -> impl Iterator<Item = &ClassifiedMethod<'m>> {
        self.resource_methods
            .iter()
            .chain(&self.sub_resource_methods)
            .chain(&self.sub_resource_locators)
            .filter(|m| !m.traits.public)
    }
}

/// Classify every method once and split them into disjoint lists.
pub fn partition<'m>(
    accessor: &dyn MetadataAccessor,
    table: &TagTable,
    methods: &[(&'m ClassDescriptor, &'m MethodDescriptor)],
) -> MethodPartition<'m> {
    let mut out = MethodPartition::default();
    for &(declaring, method) in methods {
        let traits = MethodTraits::of(accessor, table, method);
        let category = traits.category();
        let classified = ClassifiedMethod {
            declaring,
            method,
            traits,
            category,
        };
        let bucket = match classified.category {
            MethodCategory::Setter => &mut out.setters,
            MethodCategory::ResourceMethod { .. } => &mut out.resource_methods,
            MethodCategory::SubResourceMethod { .. } => &mut out.sub_resource_methods,
            MethodCategory::SubResourceLocator => &mut out.sub_resource_locators,
            MethodCategory::Excluded => &mut out.excluded,
        };
        bucket.push(classified);
    }
    out
}
