use super::types::{ClassDescriptor, FieldDescriptor, MethodDescriptor, Tag, TagDefinition, TagSet, TagValue};
use crate::error::IntrospectionError;
use std::collections::{HashMap, HashSet};

/// Verbs that come predefined, each carrying an `HttpMethod` meta-tag.
pub const STANDARD_VERBS: [&str; 6] = ["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS"];

/// Read-only view over class metadata.
///
/// Implementors supply two primitives, [`class`](Self::class) and
/// [`tag_definition`](Self::tag_definition); hierarchy walking, field and
/// method enumeration and meta-tag lookup are derived from them.
pub trait MetadataAccessor: Send + Sync {
    /// Look up a class.
    ///
    /// # Errors
    ///
    /// [`IntrospectionError::UnknownClass`] if the class is not known and
    /// [`IntrospectionError::AccessDenied`] if its members may not be
    /// enumerated.
    fn class(&self, name: &str) -> Result<&ClassDescriptor, IntrospectionError>;

    /// Definition of a tag kind, if one is registered.
    fn tag_definition(&self, kind: &str) -> Option<&TagDefinition>;

    /// The class followed by each superclass, most derived first.
    ///
    /// The walk ends at a class without a superclass or at a superclass the
    /// accessor does not know, both of which stand for the universal base.
    fn hierarchy(&self, name: &str) -> Result<Vec<&ClassDescriptor>, IntrospectionError> {
        let mut chain = vec![self.class(name)?];
        let mut seen: HashSet<&str> = HashSet::from([name]);
        while let Some(parent) = chain.last().copied().and_then(|c| c.superclass.as_deref()) {
            if !seen.insert(parent) {
                return Err(IntrospectionError::HierarchyCycle(name.to_string()));
            }
            match self.class(parent) {
                Ok(class) => chain.push(class),
                Err(IntrospectionError::UnknownClass(_)) => {
                    tracing::debug!(class = name, base = parent, "hierarchy ends at external base");
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(chain)
    }

    /// Fields declared at each level of the hierarchy, paired with their
    /// declaring class. Same-named fields at different levels are all kept.
    fn declared_fields(
        &self,
        name: &str,
    ) -> Result<Vec<(&ClassDescriptor, &FieldDescriptor)>, IntrospectionError> {
        let chain = self.hierarchy(name)?;
        if chain.first().is_some_and(|c| c.interface) {
            return Ok(Vec::new());
        }
        Ok(chain
            .into_iter()
            .flat_map(|class| class.fields.iter().map(move |f| (class, f)))
            .collect())
    }

    /// Declared methods followed by inherited methods not overridden lower
    /// in the hierarchy, paired with their declaring class.
    fn methods(
        &self,
        name: &str,
    ) -> Result<Vec<(&ClassDescriptor, &MethodDescriptor)>, IntrospectionError> {
        let mut out: Vec<(&ClassDescriptor, &MethodDescriptor)> = Vec::new();
        for class in self.hierarchy(name)? {
            for method in &class.methods {
                if !out.iter().any(|(_, m)| m.overrides(method)) {
                    out.push((class, method));
                }
            }
        }
        Ok(out)
    }

    /// Class tags, plus tags of inherited kinds found on superclasses.
    fn class_tags(&self, name: &str) -> Result<Vec<Tag>, IntrospectionError> {
        let chain = self.hierarchy(name)?;
        let mut tags: Vec<Tag> = chain.first().map(|c| c.tags.clone()).unwrap_or_default();
        for ancestor in chain.iter().skip(1) {
            for tag in &ancestor.tags {
                let inherited = self.tag_definition(&tag.kind).is_some_and(|d| d.inherited);
                if inherited && !tags.has(&tag.kind) {
                    tags.push(tag.clone());
                }
            }
        }
        Ok(tags)
    }

    /// Meta-tags of `meta_kind` found on the definitions of `tags`, in
    /// tag order.
    fn meta_tags_of<'a>(&'a self, tags: &'a [Tag], meta_kind: &str) -> Vec<&'a Tag> {
        tags.iter()
            .filter_map(|t| self.tag_definition(&t.kind))
            .filter_map(|d| d.meta.find(meta_kind))
            .collect()
    }

    /// Named argument of a tag, falling back to its definition's default.
    fn attribute<'a>(&'a self, tag: &'a Tag, name: &str) -> Option<&'a TagValue> {
        tag.get(name).or_else(|| {
            self.tag_definition(&tag.kind)
                .and_then(|d| d.defaults.get(name))
        })
    }
}

/// Classes whose members the host refuses to enumerate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    denied: HashSet<String>,
}

impl AccessPolicy {
    pub fn deny(&mut self, class: impl Into<String>) {
        self.denied.insert(class.into());
    }

    pub fn permits(&self, class: &str) -> bool {
        !self.denied.contains(class)
    }
}

/// Precomputed, in-memory metadata source.
///
/// Starts out with definitions for the standard verbs (`GET`, `POST`, ...)
/// and for `Path` (`encode` and `limited` default to `true`).
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: Vec<ClassDescriptor>,
    index: HashMap<String, usize>,
    definitions: HashMap<String, TagDefinition>,
    policy: AccessPolicy,
}

impl ClassRegistry {
    pub fn new() -> Self {
        let mut registry = ClassRegistry::empty();
        for verb in STANDARD_VERBS {
            registry.define(
                TagDefinition::new(verb).with_meta(Tag::with_value("HttpMethod", verb)),
            );
        }
        registry.define(
            TagDefinition::new("Path")
                .with_default("encode", true)
                .with_default("limited", true),
        );
        registry
    }

    /// A registry without any predefined tag definitions.
    pub fn empty() -> Self {
        ClassRegistry {
            classes: Vec::new(),
            index: HashMap::new(),
            definitions: HashMap::new(),
            policy: AccessPolicy::default(),
        }
    }

    /// Add or replace a class. Replacing keeps the original position.
    pub fn register(&mut self, class: ClassDescriptor) -> &mut Self {
        match self.index.get(&class.name) {
            Some(&i) => self.classes[i] = class,
            None => {
                self.index.insert(class.name.clone(), self.classes.len());
                self.classes.push(class);
            }
        }
        self
    }

    pub fn define(&mut self, definition: TagDefinition) -> &mut Self {
        self.definitions.insert(definition.kind.clone(), definition);
        self
    }

    pub fn deny(&mut self, class: impl Into<String>) -> &mut Self {
        self.policy.deny(class);
        self
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Registered classes in registration order, regardless of policy.
    pub fn classes(&self) -> &[ClassDescriptor] {
        &self.classes
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        ClassRegistry::new()
    }
}

impl MetadataAccessor for ClassRegistry {
    fn class(&self, name: &str) -> Result<&ClassDescriptor, IntrospectionError> {
        let i = self
            .index
            .get(name)
            .ok_or_else(|| IntrospectionError::UnknownClass(name.to_string()))?;
        if !self.policy.permits(name) {
            return Err(IntrospectionError::AccessDenied(name.to_string()));
        }
        Ok(&self.classes[*i])
    }

    fn tag_definition(&self, kind: &str) -> Option<&TagDefinition> {
        self.definitions.get(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{FieldDescriptor, MethodDescriptor};

    fn chain() -> ClassRegistry {
        let mut r = ClassRegistry::new();
        r.define(TagDefinition::new("Produces").inherited());
        r.register(
            ClassDescriptor::new("Base")
                .tag(Tag::with_value("Produces", "text/plain"))
                .tag(Tag::with_value("Consumes", "text/plain"))
                .field(FieldDescriptor::new("id", "String"))
                .method(MethodDescriptor::new("get").returns("String").tag(Tag::new("GET")))
                .method(MethodDescriptor::new("base_only")),
        );
        r.register(
            ClassDescriptor::new("Sub")
                .extends("Base")
                .field(FieldDescriptor::new("id", "String"))
                .method(MethodDescriptor::new("get").returns("String")),
        );
        r
    }

    #[test]
    fn test_hierarchy_most_derived_first() {
        let r = chain();
        let names: Vec<_> = r.hierarchy("Sub").unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Sub", "Base"]);
    }

    #[test]
    fn test_unknown_superclass_ends_walk() {
        let mut r = ClassRegistry::new();
        r.register(ClassDescriptor::new("A").extends("java.lang.Object"));
        assert_eq!(r.hierarchy("A").unwrap().len(), 1);
    }

    #[test]
    fn test_cycle_detected() {
        let mut r = ClassRegistry::new();
        r.register(ClassDescriptor::new("A").extends("B"));
        r.register(ClassDescriptor::new("B").extends("A"));
        assert_eq!(
            r.hierarchy("A").unwrap_err(),
            IntrospectionError::HierarchyCycle("A".into())
        );
    }

    #[test]
    fn test_fields_kept_per_level() {
        let r = chain();
        let fields = r.declared_fields("Sub").unwrap();
        let owners: Vec<_> = fields.iter().map(|(c, f)| format!("{}.{}", c.name, f.name)).collect();
        assert_eq!(owners, vec!["Sub.id", "Base.id"]);
    }

    #[test]
    fn test_interface_has_no_fields() {
        let mut r = ClassRegistry::new();
        let mut iface = ClassDescriptor::new("I").field(FieldDescriptor::new("x", "int"));
        iface.interface = true;
        r.register(iface);
        assert!(r.declared_fields("I").unwrap().is_empty());
    }

    #[test]
    fn test_overridden_methods_hidden() {
        let r = chain();
        let methods = r.methods("Sub").unwrap();
        let names: Vec<_> = methods
            .iter()
            .map(|(c, m)| format!("{}.{}", c.name, m.name))
            .collect();
        assert_eq!(names, vec!["Sub.get", "Base.base_only"]);
    }

    #[test]
    fn test_inherited_class_tags() {
        let r = chain();
        let tags = r.class_tags("Sub").unwrap();
        assert!(tags.has("Produces"));
        assert!(!tags.has("Consumes"));
    }

    #[test]
    fn test_meta_tags_and_attribute_defaults() {
        let r = ClassRegistry::new();
        let tags = vec![Tag::new("Encoded"), Tag::new("POST"), Tag::new("GET")];
        let metas = r.meta_tags_of(&tags, "HttpMethod");
        let verbs: Vec<_> = metas
            .iter()
            .filter_map(|t| t.get("value").and_then(TagValue::as_str))
            .collect();
        assert_eq!(verbs, vec!["POST", "GET"]);

        let path = Tag::with_value("Path", "x").arg("limited", false);
        assert_eq!(r.attribute(&path, "encode"), Some(&TagValue::Bool(true)));
        assert_eq!(r.attribute(&path, "limited"), Some(&TagValue::Bool(false)));
        assert_eq!(r.attribute(&path, "missing"), None);
    }

    #[test]
    fn test_denied_class() {
        let mut r = chain();
        r.deny("Base");
        assert_eq!(
            r.class("Base").unwrap_err(),
            IntrospectionError::AccessDenied("Base".into())
        );
        // Denial of a superclass is fatal for the subclass too.
        assert!(matches!(
            r.declared_fields("Sub"),
            Err(IntrospectionError::AccessDenied(_))
        ));
    }
}
