//! Developer harness: check JSON documents against a type → (wire | host) JSON
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::serialization::Direction;
use crate::session::Session;
use crate::type_system::TypeSystem;
use crate::types::{OptionalValue, TypeRef};
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// run JSON/NDJSON documents through the marshalling kernel and print the converted value or the diagnostic
#[derive(Parser, Debug)]
#[command(name = "jsii-marshal", version)]
pub struct CommandLineInterface {
    /// log every conversion step (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert host-form documents to wire form
    Serialize(ProcessOut),
    /// convert wire-form documents to host form
    Deserialize(ProcessOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct TypeSettings {
    /// type-system documents (`{"types": {"<fqn>": …}}`), merged in order
    #[arg(long = "types", num_args = 1..)]
    types: Vec<PathBuf>,

    /// declared type, e.g. `array<phony.Point>` or `string | number`
    #[arg(long = "type")]
    ty: TypeRef,

    /// accept absent values (undefined or null)
    #[arg(long, default_value_t = false)]
    optional: bool,
}

#[derive(clap::Parser, Debug)]
struct ProcessOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    type_settings: TypeSettings,

    /// name of the value in diagnostics
    #[arg(long, default_value = "value")]
    label: String,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

/// One converted document, or its rendered diagnostic.
#[derive(Debug)]
struct Report {
    source: String,
    result: Result<serde_json::Value, String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Every document selected from one input, tagged with where it came from.
    fn load_documents(&self, path: &Path) -> Result<Vec<(String, serde_json::Value)>> {
        let name = path.display().to_string();
        let source = if path == Path::new("-") {
            std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?
        } else {
            std::fs::read_to_string(path).with_context(|| format!("failed to read source file {name}"))?
        };

        let mut documents = Vec::new();
        if self.ndjson {
            for (i, line) in source.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let value: serde_json::Value = serde_json::from_str(line)
                    .with_context(|| format!("failed to parse JSON line ({name}:{})", i + 1))?;
                documents.push((format!("{name}:{}", i + 1), value));
            }
        } else {
            let value: serde_json::Value = serde_json::from_str(&source)
                .with_context(|| format!("failed to parse JSON source file ({name})"))?;
            documents.push((name, value));
        }

        let mut out = Vec::new();
        for (name, value) in documents {
            let value = match self.json_pointer.as_deref() {
                None => value,
                Some(pointer) => value
                    .pointer(pointer)
                    .cloned()
                    .with_context(|| format!("JSON pointer {pointer} selects nothing in {name}"))?,
            };
            match self.jq_expr.as_deref() {
                None => out.push((name, value)),
                Some(jq_expr) => {
                    let results = crate::jq_exec::run_jaq(jq_expr, &value)
                        .with_context(|| format!("failed to apply jq expression to {name}"))?;
                    for (i, value) in results.into_iter().enumerate() {
                        out.push((format!("{name}#{i}"), value));
                    }
                }
            }
        }
        Ok(out)
    }
}

impl TypeSettings {
    fn load(&self) -> Result<TypeSystem> {
        let mut types = TypeSystem::new();
        for path in &self.types {
            let loaded = TypeSystem::load(path)
                .with_context(|| format!("failed to load type system {}", path.display()))?;
            types
                .merge(loaded)
                .with_context(|| format!("failed to merge type system {}", path.display()))?;
        }
        Ok(types)
    }

    fn descriptor(&self) -> OptionalValue {
        OptionalValue { optional: self.optional, ty: self.ty.clone() }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// `Ok(false)` when at least one document failed to convert.
    pub fn run(&self) -> Result<bool> {
        let (direction, target) = match &self.cmd {
            Command::Serialize(target) => (Direction::Serialize, target),
            Command::Deserialize(target) => (Direction::Deserialize, target),
        };

        // debug path
        if target.no_op {
            eprintln!("{self:#?}");
            return Ok(true);
        }

        // 1) shared, read-only state
        let types = target.type_settings.load()?;
        let descriptor = target.type_settings.descriptor();
        let paths = resolve_file_path_patterns(&target.input_settings.input)?;
        tracing::info!(files = paths.len(), types = types.len(), direction = direction.verb(), "processing inputs");

        // 2) one session per file; references never cross files
        let reports = paths
            .par_iter()
            .map(|path| -> Result<Vec<Report>> {
                let documents = target.input_settings.load_documents(path)?;
                let session = Session::new(&types);
                Ok(documents
                    .into_iter()
                    .map(|(source, document)| {
                        let result = session
                            .process(direction, &Value::from(document), &descriptor, &target.label)
                            .map(|value| value.to_json())
                            .map_err(|error| error.to_string());
                        Report { source, result }
                    })
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;

        // 3) report in input order
        let mut rendered = String::new();
        let mut total = 0usize;
        let mut failures = 0usize;
        for report in reports.iter().flatten() {
            total += 1;
            match &report.result {
                Ok(json) => {
                    let text = if target.input_settings.ndjson {
                        serde_json::to_string(json)?
                    } else {
                        serde_json::to_string_pretty(json)?
                    };
                    rendered.push_str(&text);
                    rendered.push('\n');
                }
                Err(diagnostic) => {
                    failures += 1;
                    eprintln!("{} {}", "✗".red().bold(), report.source.bold());
                    eprintln!("{diagnostic}");
                }
            }
        }

        if let Some(out) = target.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &rendered).with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            print!("{rendered}");
        }

        let summary = format!("{}/{total} documents converted", total - failures);
        if failures == 0 {
            eprintln!("{} {summary}", "✓".green().bold());
        } else {
            eprintln!("{} {summary}", "✗".red().bold());
        }
        Ok(failures == 0)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
