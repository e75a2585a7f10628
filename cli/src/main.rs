use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use field_schema_core::{
    AttributeName, DATATYPE_PROFILES, Datatype, FieldDefinitionStore, FieldDraft, profile_for,
};
use field_schema_document::{
    DocumentFormat, ToolConfig, load_draft, render_errors, render_validated, save_draft, save_spec,
    to_string,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit code when a draft is rejected by validation.
const EXIT_REJECTED: u8 = 1;
/// Exit code for I/O, format and configuration failures.
const EXIT_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "field-schema")]
#[command(about = "Validate and normalize JSON field definitions")]
struct Cli {
    /// Path to a YAML config file (default: ./.field-schema.yml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Output format, overriding the config file.
    #[arg(long, global = true)]
    format: Option<DocumentFormat>,
    /// Disable pretty-printed JSON.
    #[arg(long, global = true)]
    compact: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write an empty draft template.
    New(NewArgs),
    /// Validate a draft file and print the normalized definition or the errors.
    Validate(ValidateArgs),
    /// Show which attributes each datatype uses.
    Attributes(AttributesArgs),
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Prefill the field name.
    #[arg(long)]
    name: Option<String>,
    /// Preselect a datatype (Int, String, Boolean, Number, Enum, Array).
    #[arg(long)]
    datatype: Option<Datatype>,
    /// Output draft path (.json, .yaml or .yml); prints to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Draft file (.json, .yaml or .yml).
    draft: PathBuf,
    /// Also write the accepted definition to this path.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct AttributesArgs {
    /// Only show this datatype.
    datatype: Option<Datatype>,
}

/// Output settings after merging config and flags.
#[derive(Debug, Clone, Copy)]
struct Output {
    format: DocumentFormat,
    pretty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = match ToolConfig::discover(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load config: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    init_logging(&config);

    let output = Output {
        format: cli.format.unwrap_or(config.output.format),
        pretty: config.output.pretty && !cli.compact,
    };
    debug!(?output, "Resolved output settings");

    let result = match cli.command {
        Command::New(args) => run_new(args, output),
        Command::Validate(args) => run_validate(args, output),
        Command::Attributes(args) => run_attributes(args, output),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_logging(config: &ToolConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_new(args: NewArgs, output: Output) -> Result<ExitCode, String> {
    let mut draft = FieldDraft::new();
    if let Some(name) = args.name {
        draft.name = name;
    }
    draft.datatype = args.datatype;

    match args.output {
        Some(path) => {
            save_draft(&draft, &path)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            info!(path = %path.display(), "Wrote draft template");
            println!("Wrote draft template to {}.", path.display());
        }
        None => {
            let raw = to_string(&draft, output.format, output.pretty)
                .map_err(|err| format!("Failed to render draft: {err}"))?;
            print_block(&raw);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_validate(args: ValidateArgs, output: Output) -> Result<ExitCode, String> {
    let draft = load_draft(&args.draft)
        .map_err(|err| format!("Failed to load '{}': {err}", args.draft.display()))?;
    let mut store = FieldDefinitionStore::with_draft(draft);

    match store.submit() {
        Ok(accepted) => {
            if let Some(path) = &args.output {
                save_spec(&accepted.spec, path)
                    .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            }
            let raw = render_validated(accepted, output.format, output.pretty)
                .map_err(|err| format!("Failed to render definition: {err}"))?;
            print_block(&raw);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            let raw = render_errors(&errors, output.format, output.pretty)
                .map_err(|err| format!("Failed to render errors: {err}"))?;
            print_block(&raw);
            eprintln!(
                "'{}' was rejected with {} error(s).",
                args.draft.display(),
                errors.len()
            );
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

#[derive(Debug, Serialize)]
struct AttributeRow {
    datatype: Datatype,
    attributes: &'static [AttributeName],
    implemented: bool,
}

fn run_attributes(args: AttributesArgs, output: Output) -> Result<ExitCode, String> {
    let rows: Vec<AttributeRow> = match args.datatype {
        Some(datatype) => vec![profile_for(datatype)],
        None => DATATYPE_PROFILES.iter().collect(),
    }
    .into_iter()
    .map(|profile| AttributeRow {
        datatype: profile.datatype,
        attributes: profile.attributes,
        implemented: profile.implemented,
    })
    .collect();

    let raw = match output.format {
        DocumentFormat::Text => attributes_to_text(&rows),
        format => to_string(&rows, format, output.pretty)
            .map_err(|err| format!("Failed to render attributes: {err}"))?,
    };
    print_block(&raw);
    Ok(ExitCode::SUCCESS)
}

fn attributes_to_text(rows: &[AttributeRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let attributes = if row.attributes.is_empty() {
            "-".to_string()
        } else {
            row.attributes
                .iter()
                .map(|attribute| attribute.key())
                .collect::<Vec<_>>()
                .join(", ")
        };
        out.push_str(&format!("{:<8} {attributes}", row.datatype.label()));
        if !row.implemented {
            out.push_str(" (not implemented)");
        }
        out.push('\n');
    }
    out
}

fn print_block(raw: &str) {
    if raw.ends_with('\n') {
        print!("{raw}");
    } else {
        println!("{raw}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_to_text() {
        let rows: Vec<AttributeRow> = [Datatype::Int, Datatype::Array]
            .into_iter()
            .map(|datatype| {
                let profile = profile_for(datatype);
                AttributeRow {
                    datatype,
                    attributes: profile.attributes,
                    implemented: profile.implemented,
                }
            })
            .collect();

        assert_eq!(
            attributes_to_text(&rows),
            "Int      startValue, endValue\nArray    - (not implemented)\n"
        );
    }

    #[test]
    fn test_cli_parses_datatype() {
        let cli = Cli::try_parse_from(["field-schema", "new", "--datatype", "Enum"]).unwrap();
        match cli.command {
            Command::New(args) => assert_eq!(args.datatype, Some(Datatype::Enum)),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["field-schema", "new", "--datatype", "Date"]).is_err());
    }
}
