use crate::config::ModellerConfig;
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::meta::{load_registry, ClassRegistry, MetadataAccessor, TagSet, TagValue};
use crate::model::{MediaType, Parameter, Resource};
use crate::modeller::{classify_method, MethodCategory, ResourceModeller};
use crate::tags::TagTable;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line interface for resmodel
///
/// Builds resource models from class descriptor files.
#[derive(Parser)]
#[command(name = "resmodel")]
#[command(about = "Resource model introspection CLI", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and print the resource model of one or more classes
    Inspect {
        /// Class descriptor file (YAML or JSON)
        #[arg(short, long)]
        classes: PathBuf,

        /// Class to model; repeat for several. Defaults to every class in the file.
        #[arg(long = "class")]
        class: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Alternate tag table (TOML); overrides RESMODEL_TAGS
        #[arg(long)]
        tags: Option<PathBuf>,

        /// Exit with an error if any diagnostic was recorded
        #[arg(long, default_value_t = false)]
        fail_on_diagnostics: bool,
    },
    /// Print the category of every method visible on a class
    Classify {
        #[arg(short, long)]
        classes: PathBuf,

        #[arg(long = "class")]
        class: String,

        #[arg(long)]
        tags: Option<PathBuf>,
    },
    /// List the classes of a descriptor file with their root path, if any
    List {
        #[arg(short, long)]
        classes: PathBuf,

        #[arg(long)]
        tags: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

/// Everything `inspect` prints.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub resources: Vec<Resource>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse arguments, set up logging and run the command against stdout.
///
/// # Errors
///
/// Returns an error if:
/// - The descriptor file or tag table cannot be read or parsed
/// - A requested class is unknown, denied, or has a cyclic hierarchy
/// - `--fail-on-diagnostics` is set and diagnostics were recorded
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    // A second initialisation (embedding, tests) is not fatal.
    if let Err(err) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("Warning: {err}");
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Run a parsed command, writing its output to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::Inspect {
            classes,
            class,
            format,
            tags,
            fail_on_diagnostics,
        } => {
            let registry = load_registry(classes)?;
            let table = tag_table(tags)?;
            let report = inspect(&registry, &table, class)?;
            match format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &report)?;
                    writeln!(out)?;
                }
                OutputFormat::Yaml => out.write_all(serde_yaml::to_string(&report)?.as_bytes())?,
                OutputFormat::Text => render_report(&report, out)?,
            }
            if *fail_on_diagnostics && !report.diagnostics.is_empty() {
                bail!("{} diagnostic(s) recorded", report.diagnostics.len());
            }
            Ok(())
        }
        Commands::Classify {
            classes,
            class,
            tags,
        } => {
            let registry = load_registry(classes)?;
            let table = tag_table(tags)?;
            let methods = registry
                .methods(class)
                .with_context(|| format!("classifying {class}"))?;
            for (declaring, method) in methods {
                let category = classify_method(&registry, &table, method);
                let label = match &category {
                    MethodCategory::ResourceMethod { http_method }
                    | MethodCategory::SubResourceMethod { http_method } => {
                        format!("{} {http_method}", category.label())
                    }
                    _ => category.label().to_string(),
                };
                writeln!(out, "{label:<28} {}", method.signature(&declaring.name))?;
            }
            Ok(())
        }
        Commands::List { classes, tags } => {
            let registry = load_registry(classes)?;
            let table = tag_table(tags)?;
            for class in registry.classes() {
                let line = match registry.class_tags(&class.name) {
                    Ok(class_tags) => match class_tags.find(&table.path) {
                        Some(tag) => format!(
                            "root  {} {}",
                            class.name,
                            registry
                                .attribute(tag, "value")
                                .and_then(TagValue::as_str)
                                .unwrap_or_default()
                        ),
                        None => format!("sub   {}", class.name),
                    },
                    Err(err) => format!("error {} ({err})", class.name),
                };
                writeln!(out, "{line}")?;
            }
            Ok(())
        }
    }
}

fn tag_table(flag: &Option<PathBuf>) -> Result<TagTable> {
    ModellerConfig::from_env()
        .with_tag_table(flag.clone())
        .tag_table()
}

/// Model the named classes, or every enumerable class when none are named.
pub fn inspect(
    registry: &ClassRegistry,
    table: &TagTable,
    classes: &[String],
) -> Result<InspectReport> {
    let log = DiagnosticLog::new();
    let modeller = ResourceModeller::new(registry)
        .with_tag_table(table)
        .with_sink(&log);
    let names: Vec<&str> = if classes.is_empty() {
        registry
            .classes()
            .iter()
            .filter(|c| !c.interface && registry.policy().permits(&c.name))
            .map(|c| c.name.as_str())
            .collect()
    } else {
        classes.iter().map(String::as_str).collect()
    };
    let mut resources = Vec::with_capacity(names.len());
    for name in names {
        let resource = modeller
            .build(name)
            .with_context(|| format!("modelling {name}"))?;
        resources.push(resource);
    }
    Ok(InspectReport {
        resources,
        diagnostics: log.drain(),
    })
}

fn render_report(report: &InspectReport, out: &mut dyn Write) -> io::Result<()> {
    for resource in &report.resources {
        render_resource(resource, out)?;
        writeln!(out)?;
    }
    if !report.diagnostics.is_empty() {
        writeln!(out, "diagnostics:")?;
        for d in &report.diagnostics {
            writeln!(out, "  {d}")?;
        }
    }
    Ok(())
}

fn render_resource(resource: &Resource, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{resource}")?;
    for c in &resource.constructors {
        writeln!(out, "  constructor {}", c.signature)?;
        render_parameters(&c.parameters, out)?;
    }
    for f in &resource.fields {
        writeln!(out, "  field {}", f.name)?;
        render_parameters(&f.parameters, out)?;
    }
    for s in &resource.setter_methods {
        writeln!(out, "  setter {}", s.signature)?;
        render_parameters(&s.parameters, out)?;
    }
    for m in &resource.resource_methods {
        writeln!(
            out,
            "  {} {}{}",
            m.http_method,
            m.signature,
            media(&m.consumes, &m.produces)
        )?;
        render_parameters(&m.parameters, out)?;
    }
    for m in &resource.sub_resource_methods {
        writeln!(
            out,
            "  {} {} -> {}{}",
            m.http_method,
            m.path,
            m.signature,
            media(&m.consumes, &m.produces)
        )?;
        render_parameters(&m.parameters, out)?;
    }
    for l in &resource.sub_resource_locators {
        writeln!(out, "  locator {} -> {}", l.path, l.signature)?;
        render_parameters(&l.parameters, out)?;
    }
    Ok(())
}

fn render_parameters(parameters: &[Parameter], out: &mut dyn Write) -> io::Result<()> {
    for p in parameters {
        writeln!(out, "      {p}")?;
    }
    Ok(())
}

fn media(consumes: &[MediaType], produces: &[MediaType]) -> String {
    let join = |types: &[MediaType]| {
        types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut s = String::new();
    if !consumes.is_empty() {
        s.push_str(&format!(" consumes [{}]", join(consumes)));
    }
    if !produces.is_empty() {
        s.push_str(&format!(" produces [{}]", join(produces)));
    }
    s
}
