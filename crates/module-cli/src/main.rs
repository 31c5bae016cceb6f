mod report;

use clap::{Parser, Subcommand, ValueEnum};
use module_spec::{
    FieldDefinition, FieldValues, InMemoryCatalog, ModuleSpec, catalog_schema, module_schema,
    required_entries, resolve_visibility, validate, violation_schema,
};
use report::{ReportPresenter, Verbosity};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const CATALOG_ENV: &str = "MODULE_CATALOG_PATH";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form module dependency checker",
    long_about = "Validates module field dependencies and evaluates which entries are active for a set of answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SchemaKind {
    Module,
    Catalog,
    Violations,
}

#[derive(Subcommand)]
enum Command {
    /// Report structural problems in a module definition.
    Validate {
        /// Path to the module JSON.
        #[arg(long, value_name = "MODULE")]
        module: PathBuf,
        /// Field catalog JSON (defaults to MODULE_CATALOG_PATH).
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
        /// Emit the violations as JSON.
        #[arg(long)]
        json: bool,
        /// List every entry with its order and dependency.
        #[arg(long)]
        verbose: bool,
    },
    /// Compute active and required entries for a set of answers.
    Evaluate {
        /// Path to the module JSON.
        #[arg(long, value_name = "MODULE")]
        module: PathBuf,
        /// JSON object of answers keyed by entry id.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        /// Field catalog JSON (defaults to MODULE_CATALOG_PATH).
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
        /// Emit the visibility map as JSON.
        #[arg(long)]
        json: bool,
        /// Also list hidden entries.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the module with catalog metadata attached to each entry.
    Resolve {
        /// Path to the module JSON.
        #[arg(long, value_name = "MODULE")]
        module: PathBuf,
        /// Field catalog JSON (defaults to MODULE_CATALOG_PATH).
        #[arg(long, value_name = "CATALOG")]
        catalog: Option<PathBuf>,
    },
    /// Print a JSON Schema for one of the exchanged documents.
    Schema {
        #[arg(long, value_enum, default_value_t = SchemaKind::Module)]
        kind: SchemaKind,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            module,
            catalog,
            json,
            verbose,
        } => run_validate(module, catalog, json, verbose),
        Command::Evaluate {
            module,
            values,
            catalog,
            json,
            verbose,
        } => run_evaluate(module, values, catalog, json, verbose),
        Command::Resolve { module, catalog } => run_resolve(module, catalog),
        Command::Schema { kind } => run_schema(kind),
    }
}

fn run_validate(
    module_path: PathBuf,
    catalog_path: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> CliResult<()> {
    let spec = load_module(&module_path)?;
    let catalog = load_catalog(catalog_path)?;
    let violations = validate(&spec.fields, &catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    } else {
        let presenter = ReportPresenter::new(Verbosity::from_verbose(verbose));
        presenter.show_header(&spec);
        presenter.show_violations(&violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(format!("module '{}' has {} violation(s)", spec.id, violations.len()).into())
    }
}

fn run_evaluate(
    module_path: PathBuf,
    values_path: PathBuf,
    catalog_path: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> CliResult<()> {
    let spec = load_module(&module_path)?;
    let catalog = load_catalog(catalog_path)?;
    let values = load_values(&values_path)?;

    let visibility = resolve_visibility(&spec.fields, &values, &catalog);
    let required = required_entries(&spec.fields, &values, &catalog);

    if json {
        let payload = json!({
            "moduleId": spec.id,
            "visibility": visibility,
            "required": required,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let presenter = ReportPresenter::new(Verbosity::from_verbose(verbose));
        presenter.show_header(&spec);
        presenter.show_visibility(&visibility, &spec, &required);
    }
    Ok(())
}

fn run_resolve(module_path: PathBuf, catalog_path: Option<PathBuf>) -> CliResult<()> {
    let spec = load_module(&module_path)?;
    let catalog = load_catalog(catalog_path)?;
    let resolved = spec.resolve_fields(&catalog)?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn run_schema(kind: SchemaKind) -> CliResult<()> {
    let schema = match kind {
        SchemaKind::Module => module_schema(),
        SchemaKind::Catalog => catalog_schema(),
        SchemaKind::Violations => violation_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_module(path: &Path) -> CliResult<ModuleSpec> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read module {}: {}", path.display(), err))?;
    Ok(serde_json::from_str(&contents)?)
}

fn resolve_catalog_path(catalog: Option<PathBuf>) -> CliResult<PathBuf> {
    match catalog {
        Some(path) => Ok(path),
        None => env::var_os(CATALOG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                format!("no catalog given; pass --catalog or set {}", CATALOG_ENV).into()
            }),
    }
}

fn load_catalog(catalog: Option<PathBuf>) -> CliResult<InMemoryCatalog> {
    let path = resolve_catalog_path(catalog)?;
    let contents = fs::read_to_string(&path)
        .map_err(|err| format!("failed to read catalog {}: {}", path.display(), err))?;
    let definitions: Vec<FieldDefinition> = serde_json::from_str(&contents)?;
    Ok(InMemoryCatalog::from_definitions(definitions)?)
}

fn load_values(path: &Path) -> CliResult<FieldValues> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read values {}: {}", path.display(), err))?;
    match serde_json::from_str::<Value>(&contents)? {
        Value::Object(map) => Ok(map),
        _ => Err("values must be a JSON object keyed by entry id".into()),
    }
}
