use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Literal argument carried by a [`Tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    List(Vec<TagValue>),
}

impl TagValue {
    /// The value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TagValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// All text entries: a single text value or the text members of a list.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            TagValue::Text(s) => vec![s.as_str()],
            TagValue::List(items) => items.iter().filter_map(TagValue::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bool(b) => write!(f, "{b}"),
            TagValue::Integer(n) => write!(f, "{n}"),
            TagValue::Text(s) => write!(f, "{s:?}"),
            TagValue::List(items) => {
                let items: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Text(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Text(s)
    }
}

impl From<bool> for TagValue {
    fn from(b: bool) -> Self {
        TagValue::Bool(b)
    }
}

impl From<i64> for TagValue {
    fn from(n: i64) -> Self {
        TagValue::Integer(n)
    }
}

/// A declarative metadata tag attached to a class, member or parameter.
///
/// In descriptor files a tag is written as its `kind` plus any named
/// arguments, e.g. `{ kind: QueryParam, value: match }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub kind: String,
    #[serde(flatten)]
    pub args: BTreeMap<String, TagValue>,
}

impl Tag {
    pub fn new(kind: impl Into<String>) -> Self {
        Tag {
            kind: kind.into(),
            args: BTreeMap::new(),
        }
    }

    /// Shorthand for a tag with a single `value` argument.
    pub fn with_value(kind: impl Into<String>, value: impl Into<TagValue>) -> Self {
        Tag::new(kind).arg("value", value)
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Argument given at the use site. Definition defaults are resolved by
    /// [`MetadataAccessor::attribute`](super::MetadataAccessor::attribute).
    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.args.get(name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.kind)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// Lookup helpers over an element's tag list.
pub trait TagSet {
    /// First tag of the given kind.
    fn find(&self, kind: &str) -> Option<&Tag>;

    fn has(&self, kind: &str) -> bool {
        self.find(kind).is_some()
    }
}

impl TagSet for [Tag] {
    fn find(&self, kind: &str) -> Option<&Tag> {
        self.iter().find(|t| t.kind == kind)
    }
}

impl TagSet for Vec<Tag> {
    fn find(&self, kind: &str) -> Option<&Tag> {
        self.as_slice().find(kind)
    }
}

/// Definition of a tag kind: its meta-tags and argument defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub kind: String,
    /// Tags attached to the definition itself (e.g. `HttpMethod` on `GET`).
    #[serde(default)]
    pub meta: Vec<Tag>,
    /// Values used when a use site omits an argument.
    #[serde(default)]
    pub defaults: BTreeMap<String, TagValue>,
    /// Class-level occurrences are inherited by subclasses.
    #[serde(default)]
    pub inherited: bool,
}

impl TagDefinition {
    pub fn new(kind: impl Into<String>) -> Self {
        TagDefinition {
            kind: kind.into(),
            meta: Vec::new(),
            defaults: BTreeMap::new(),
            inherited: false,
        }
    }

    pub fn with_meta(mut self, tag: Tag) -> Self {
        self.meta.push(tag);
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

// A missing `tags` key means "no tags"; an explicit `null` is an absent tag list.
fn present_tags() -> Option<Vec<Tag>> {
    Some(Vec::new())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    #[serde(rename = "type")]
    pub raw_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_type: Option<String>,
    #[serde(default = "present_tags")]
    pub tags: Option<Vec<Tag>>,
}

impl ParameterDescriptor {
    pub fn new(raw_type: impl Into<String>) -> Self {
        ParameterDescriptor {
            raw_type: raw_type.into(),
            generic_type: None,
            tags: Some(Vec::new()),
        }
    }

    pub fn generic(mut self, generic_type: impl Into<String>) -> Self {
        self.generic_type = Some(generic_type.into());
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag);
        self
    }

    /// Marks the tag list as unavailable.
    pub fn without_tags(mut self) -> Self {
        self.tags = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub raw_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_type: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "present_tags")]
    pub tags: Option<Vec<Tag>>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            raw_type: raw_type.into(),
            generic_type: None,
            visibility: Visibility::Private,
            tags: Some(Vec::new()),
        }
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl ConstructorDescriptor {
    pub fn new() -> Self {
        ConstructorDescriptor::default()
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn signature(&self, class: &str) -> String {
        format!("{class}({})", type_list(&self.parameters))
    }
}

fn default_return_type() -> String {
    "void".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default = "default_return_type")]
    pub returns: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        MethodDescriptor {
            name: name.into(),
            visibility: Visibility::Public,
            returns: default_return_type(),
            tags: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = returns.into();
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn returns_void(&self) -> bool {
        matches!(self.returns.as_str(), "void" | "()")
    }

    /// Same name and parameter types, i.e. one overrides the other.
    pub fn overrides(&self, other: &MethodDescriptor) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.raw_type == b.raw_type)
    }

    pub fn signature(&self, class: &str) -> String {
        format!(
            "{} {class}.{}({})",
            self.returns,
            self.name,
            type_list(&self.parameters)
        )
    }
}

fn type_list(params: &[ParameterDescriptor]) -> String {
    params
        .iter()
        .map(|p| p.raw_type.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Everything the modeller may learn about one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    /// `None` means the class extends the universal base directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interface: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDescriptor {
            name: name.into(),
            superclass: None,
            interface: false,
            tags: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn constructor(mut self, ctor: ConstructorDescriptor) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_value_texts() {
        assert_eq!(TagValue::from("a").texts(), vec!["a"]);
        let list = TagValue::List(vec!["a".into(), true.into(), "b".into()]);
        assert_eq!(list.texts(), vec!["a", "b"]);
        assert!(TagValue::Bool(true).texts().is_empty());
    }

    #[test]
    fn test_tag_deserializes_flattened_args() {
        let tag: Tag = serde_yaml::from_str("{ kind: Path, value: items, limited: false }")
            .expect("tag parses");
        assert_eq!(tag.kind, "Path");
        assert_eq!(tag.get("value"), Some(&TagValue::Text("items".into())));
        assert_eq!(tag.get("limited"), Some(&TagValue::Bool(false)));
    }

    #[test]
    fn test_missing_tags_differs_from_null_tags() {
        let p: ParameterDescriptor = serde_yaml::from_str("{ type: String }").expect("parses");
        assert_eq!(p.tags, Some(Vec::new()));
        let p: ParameterDescriptor =
            serde_yaml::from_str("{ type: String, tags: null }").expect("parses");
        assert_eq!(p.tags, None);
    }

    #[test]
    fn test_method_signature_and_override() {
        let a = MethodDescriptor::new("setColor").param(ParameterDescriptor::new("String"));
        let b = MethodDescriptor::new("setColor")
            .param(ParameterDescriptor::new("String").tag(Tag::new("Encoded")));
        let c = MethodDescriptor::new("setColor").param(ParameterDescriptor::new("int"));
        assert!(a.overrides(&b));
        assert!(!a.overrides(&c));
        assert_eq!(a.signature("Palette"), "void Palette.setColor(String)");
    }

    #[test]
    fn test_tag_display() {
        let tag = Tag::with_value("QueryParam", "match");
        assert_eq!(tag.to_string(), "@QueryParam(value=\"match\")");
        assert_eq!(Tag::new("GET").to_string(), "@GET");
    }
}
