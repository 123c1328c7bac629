use super::accessor::ClassRegistry;
use super::types::{ClassDescriptor, TagDefinition};
use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;

/// On-disk layout of a class descriptor file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorFile {
    /// Custom tag definitions, added on top of the standard ones.
    #[serde(default)]
    pub tags: Vec<TagDefinition>,
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
    /// Classes whose member enumeration is refused.
    #[serde(default)]
    pub denied: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Yaml,
    Json,
}

impl DescriptorFormat {
    /// `.yaml`/`.yml` are YAML, anything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DescriptorFormat::Yaml,
            _ => DescriptorFormat::Json,
        }
    }
}

/// Load a [`ClassRegistry`] from a YAML or JSON descriptor file.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed, or if a class is declared
/// twice.
pub fn load_registry(path: &Path) -> anyhow::Result<ClassRegistry> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading class descriptors from {}", path.display()))?;
    load_registry_from_str(&content, DescriptorFormat::from_path(path))
        .with_context(|| format!("loading class descriptors from {}", path.display()))
}

pub fn load_registry_from_str(
    content: &str,
    format: DescriptorFormat,
) -> anyhow::Result<ClassRegistry> {
    let file: DescriptorFile = match format {
        DescriptorFormat::Yaml => serde_yaml::from_str(content)?,
        DescriptorFormat::Json => serde_json::from_str(content)?,
    };
    registry_from_file(file)
}

fn registry_from_file(file: DescriptorFile) -> anyhow::Result<ClassRegistry> {
    let mut registry = ClassRegistry::new();
    for definition in file.tags {
        registry.define(definition);
    }
    for class in file.classes {
        if registry.contains(&class.name) {
            bail!("class {} is declared more than once", class.name);
        }
        registry.register(class);
    }
    for name in file.denied {
        registry.deny(name);
    }
    tracing::debug!(classes = registry.classes().len(), "class registry loaded");
    Ok(registry)
}
