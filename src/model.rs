//! # Resource Model
//!
//! The immutable output of introspecting one class. A [`Resource`] lists the
//! members that take part in request handling, in declaration order:
//!
//! - constructors and fields whose values are injected from the request,
//! - setter methods,
//! - resource methods (verb, no sub-path),
//! - sub-resource methods (verb and sub-path),
//! - sub-resource locators (sub-path, no verb).
//!
//! Every member exposes its [`Parameter`]s through [`Parameterized`]. The
//! model is a plain value: the builder keeps no reference to it once it is
//! returned.

use crate::meta::Tag;
use serde::{Serialize, Serializer};
use std::fmt;

/// Where a parameter's runtime value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Path,
    Query,
    Matrix,
    Header,
    Cookie,
    Context,
    /// Request body; used when no source tag is present.
    Entity,
    /// A tag the modeller does not recognize.
    Unknown,
}

impl SourceKind {
    /// Kinds that a recognized parameter tag can establish.
    pub const RECOGNIZED: [SourceKind; 6] = [
        SourceKind::Path,
        SourceKind::Query,
        SourceKind::Matrix,
        SourceKind::Header,
        SourceKind::Cookie,
        SourceKind::Context,
    ];

    /// Whether values of this kind are looked up by name.
    pub fn is_named(self) -> bool {
        !matches!(self, SourceKind::Context | SourceKind::Entity)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Path => "PATH",
            SourceKind::Query => "QUERY",
            SourceKind::Matrix => "MATRIX",
            SourceKind::Header => "HEADER",
            SourceKind::Cookie => "COOKIE",
            SourceKind::Context => "CONTEXT",
            SourceKind::Entity => "ENTITY",
            SourceKind::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A path template with its matching flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathValue {
    pub template: String,
    /// Literal characters are percent-encoded before matching.
    pub encode: bool,
    /// Template variables match a single segment only.
    pub limited: bool,
}

impl PathValue {
    pub fn new(template: impl Into<String>) -> Self {
        PathValue {
            template: template.into(),
            encode: true,
            limited: true,
        }
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)?;
        if !self.encode || !self.limited {
            write!(f, " (encode={}, limited={})", self.encode, self.limited)?;
        }
        Ok(())
    }
}

/// A `type/subtype` media type with optional parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    pub main_type: String,
    pub sub_type: String,
    pub params: Vec<(String, String)>,
}

impl MediaType {
    /// Parse a single media type. Type, subtype and parameter names are
    /// lower-cased; parameter values are kept verbatim (quotes stripped).
    pub fn parse(s: &str) -> Option<MediaType> {
        let mut parts = s.split(';');
        let essence = parts.next()?.trim();
        let (main_type, sub_type) = essence.split_once('/')?;
        let (main_type, sub_type) = (main_type.trim(), sub_type.trim());
        if !is_token(main_type) || !is_token(sub_type) {
            return None;
        }
        let mut params = Vec::new();
        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let (name, value) = param.split_once('=')?;
            let name = name.trim();
            if !is_token(name) {
                return None;
            }
            params.push((
                name.to_ascii_lowercase(),
                value.trim().trim_matches('"').to_string(),
            ));
        }
        Some(MediaType {
            main_type: main_type.to_ascii_lowercase(),
            sub_type: sub_type.to_ascii_lowercase(),
            params,
        })
    }

    /// Parse every comma-separated entry of every value, dropping entries
    /// that do not parse and duplicates (first occurrence wins).
    pub fn parse_all<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<MediaType> {
        let mut out: Vec<MediaType> = Vec::new();
        for entry in values.into_iter().flat_map(|v| v.split(',')) {
            if entry.trim().is_empty() {
                continue;
            }
            match MediaType::parse(entry) {
                Some(mt) if !out.contains(&mt) => out.push(mt),
                Some(_) => {}
                None => tracing::trace!(entry, "ignoring unparseable media type"),
            }
        }
        out
    }

    pub fn is_wildcard(&self) -> bool {
        self.main_type == "*" || self.sub_type == "*"
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+*".contains(c))
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;
        for (k, v) in &self.params {
            write!(f, ";{k}={v}")?;
        }
        Ok(())
    }
}

impl Serialize for MediaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How one parameter obtains its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub raw_type: String,
    /// Generic type; equal to `raw_type` when the descriptor gives none.
    pub generic_type: String,
    pub source: SourceKind,
    /// Lookup key for the source. `None` for CONTEXT and ENTITY, and for
    /// UNKNOWN tags without a text `value`.
    pub source_name: Option<String>,
    pub encoded: bool,
    pub default_value: Option<String>,
    /// The tag that established the source, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_tag: Option<Tag>,
    /// Every tag declared on the parameter, in order.
    #[serde(skip)]
    pub tags: Vec<Tag>,
}

impl Parameter {
    pub fn is_entity(&self) -> bool {
        self.source == SourceKind::Entity
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(name) = &self.source_name {
            write!(f, "({name})")?;
        }
        write!(f, " {}", self.generic_type)?;
        if self.encoded {
            f.write_str(" encoded")?;
        }
        if let Some(d) = &self.default_value {
            write!(f, " default={d:?}")?;
        }
        Ok(())
    }
}

/// A member that carries an ordered parameter list.
pub trait Parameterized {
    fn parameters(&self) -> &[Parameter];

    /// Human-readable identity of the underlying member.
    fn member(&self) -> &str;
}

macro_rules! parameterized {
    ($($ty:ty => $member:ident),* $(,)?) => {
        $(impl Parameterized for $ty {
            fn parameters(&self) -> &[Parameter] {
                &self.parameters
            }

            fn member(&self) -> &str {
                &self.$member
            }
        })*
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConstructor {
    pub signature: String,
    pub parameters: Vec<Parameter>,
}

/// A field treated as a single-parameter member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceField {
    /// `DeclaringClass.name`
    pub name: String,
    pub declaring_class: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetterMethod {
    pub signature: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceMethod {
    pub signature: String,
    pub http_method: String,
    pub consumes: Vec<MediaType>,
    pub produces: Vec<MediaType>,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubResourceMethod {
    pub signature: String,
    pub path: PathValue,
    pub http_method: String,
    pub consumes: Vec<MediaType>,
    pub produces: Vec<MediaType>,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubResourceLocator {
    pub signature: String,
    pub path: PathValue,
    pub parameters: Vec<Parameter>,
}

parameterized!(
    ResourceConstructor => signature,
    ResourceField => name,
    SetterMethod => signature,
    ResourceMethod => signature,
    SubResourceMethod => signature,
    SubResourceLocator => signature,
);

/// Shared view of members that answer a verb.
pub trait HttpMember: Parameterized {
    fn http_method(&self) -> &str;
    fn consumes(&self) -> &[MediaType];
    fn produces(&self) -> &[MediaType];

    /// The verb as an [`http::Method`]; `None` if it is not a valid token.
    fn method(&self) -> Option<http::Method> {
        http::Method::from_bytes(self.http_method().as_bytes()).ok()
    }
}

impl HttpMember for ResourceMethod {
    fn http_method(&self) -> &str {
        &self.http_method
    }
    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }
    fn produces(&self) -> &[MediaType] {
        &self.produces
    }
}

impl HttpMember for SubResourceMethod {
    fn http_method(&self) -> &str {
        &self.http_method
    }
    fn consumes(&self) -> &[MediaType] {
        &self.consumes
    }
    fn produces(&self) -> &[MediaType] {
        &self.produces
    }
}

/// The model of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub class_name: String,
    /// Present only for root resources.
    pub path: Option<PathValue>,
    pub constructors: Vec<ResourceConstructor>,
    pub fields: Vec<ResourceField>,
    pub setter_methods: Vec<SetterMethod>,
    pub resource_methods: Vec<ResourceMethod>,
    pub sub_resource_methods: Vec<SubResourceMethod>,
    pub sub_resource_locators: Vec<SubResourceLocator>,
}

impl Resource {
    pub fn new(class_name: impl Into<String>, path: Option<PathValue>) -> Self {
        Resource {
            class_name: class_name.into(),
            path,
            constructors: Vec::new(),
            fields: Vec::new(),
            setter_methods: Vec::new(),
            resource_methods: Vec::new(),
            sub_resource_methods: Vec::new(),
            sub_resource_locators: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_some()
    }

    /// Number of modelled methods across the four method collections.
    pub fn method_count(&self) -> usize {
        self.setter_methods.len()
            + self.resource_methods.len()
            + self.sub_resource_methods.len()
            + self.sub_resource_locators.len()
    }

    /// Every member with parameters, constructors first.
    pub fn members(&self) -> Vec<&dyn Parameterized> {
        let mut out: Vec<&dyn Parameterized> = Vec::new();
        out.extend(self.constructors.iter().map(|m| m as &dyn Parameterized));
        out.extend(self.fields.iter().map(|m| m as &dyn Parameterized));
        out.extend(self.setter_methods.iter().map(|m| m as &dyn Parameterized));
        out.extend(self.resource_methods.iter().map(|m| m as &dyn Parameterized));
        out.extend(self.sub_resource_methods.iter().map(|m| m as &dyn Parameterized));
        out.extend(self.sub_resource_locators.iter().map(|m| m as &dyn Parameterized));
        out
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(p) => write!(f, "root resource {} at {p}", self.class_name)?,
            None => write!(f, "sub-resource {}", self.class_name)?,
        }
        write!(
            f,
            " [{} constructors, {} fields, {} setters, {} methods, {} sub-resource methods, {} locators]",
            self.constructors.len(),
            self.fields.len(),
            self.setter_methods.len(),
            self.resource_methods.len(),
            self.sub_resource_methods.len(),
            self.sub_resource_locators.len()
        )
    }
}
