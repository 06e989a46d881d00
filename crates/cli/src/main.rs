mod logging;
mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tagfmt_context::{Context as TemplateContext, Record, load_context_from_str};
use tagfmt_core::{Registry, parse};
use tagfmt_diagnostics::{self as diag, Diagnostic};
use tracing::debug;

use crate::render::{
    Format, print_json, print_summary, print_tokens_pretty, render_diagnostics_pretty,
};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "tagfmt",
    version,
    about = "Render, check, and inspect {tag:filter} placeholder templates"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Tracing filter directive (e.g. "debug" or "tagfmt_core=trace").
    /// Overrides the TAGFMT_LOG environment variable.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render a template once per context record.
    Render {
        /// Template file, or "-" for stdin.
        file: String,
        /// Context JSON declaring tags, parameters, and records.
        #[arg(long)]
        context: Option<String>,
    },

    /// Validate a template against the built-in filters and a context.
    #[command(alias = "validate")]
    Check {
        /// Template file, or "-" for stdin.
        file: String,
        /// Context JSON declaring tags and parameters.
        #[arg(long)]
        context: Option<String>,
    },

    /// Print the parsed token sequence.
    Tokens {
        /// Template file, or "-" for stdin.
        file: String,
    },

    /// Explain a diagnostic ID (e.g. TPL1101).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let result = logging::init(cli.log_level.as_deref()).and_then(|()| match cli.cmd {
        Cmd::Render { file, context } => cmd_render(&file, context.as_deref(), format),
        Cmd::Check { file, context } => cmd_check(&file, context.as_deref(), format),
        Cmd::Tokens { file } => cmd_tokens(&file, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    });

    if let Err(e) = result {
        match format {
            Format::Json => print_json(&serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{e:#}"),
            })),
            Format::Pretty => eprintln!("error: {e:#}"),
        }
        process::exit(1);
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_render(file: &str, context_path: Option<&str>, format: Format) -> Result<()> {
    let (source, name) = read_template(file)?;
    let context = load_context(context_path)?;
    let registry = build_registry(&context)?;

    let template = match registry.compile(&source) {
        Ok(template) => template,
        Err(e) => {
            let issues = e.diagnostics();
            report_issues(&source, &name, &issues, format);
            exit_on_errors(&issues);
            return Ok(());
        }
    };

    let records = context.records();
    let mut outputs = Vec::with_capacity(records.len());
    for record in records.iter() {
        match template.resolve(record) {
            Ok(text) => outputs.push(text),
            Err(e) => {
                let issues = e.diagnostics();
                report_issues(&source, &name, &issues, format);
                exit_on_errors(&issues);
            }
        }
    }
    debug!(records = outputs.len(), "rendered template");

    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": true,
            "outputs": outputs,
        })),
        Format::Pretty => {
            for output in &outputs {
                println!("{output}");
            }
        }
    }
    Ok(())
}

fn cmd_check(file: &str, context_path: Option<&str>, format: Format) -> Result<()> {
    let (source, name) = read_template(file)?;
    let context = load_context(context_path)?;
    let registry = build_registry(&context)?;
    let result = registry.validate(&source);

    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": result.ok,
            "issues": result.issues,
        })),
        Format::Pretty => {
            render_diagnostics_pretty(&source, &name, &result.issues);
            print_summary(&result.issues);
            if result.ok {
                eprintln!("template ok");
            }
        }
    }
    exit_on_errors(&result.issues);
    Ok(())
}

fn cmd_tokens(file: &str, format: Format) -> Result<()> {
    let (source, name) = read_template(file)?;
    match parse(&source) {
        Ok(tokens) => match format {
            Format::Json => print_json(&serde_json::json!({
                "ok": true,
                "tokens": tokens,
            })),
            Format::Pretty => print_tokens_pretty(&tokens),
        },
        Err(e) => {
            let issues = [e.to_diagnostic()];
            report_issues(&source, &name, &issues, format);
            exit_on_errors(&issues);
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "id": id,
            "explanation": diag::explain(id),
        })),
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read the template text and a display name for diagnostics.
fn read_template(file: &str) -> Result<(String, String)> {
    if file == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read template from stdin")?;
        return Ok((source, "<stdin>".to_string()));
    }
    let source =
        fs::read_to_string(file).with_context(|| format!("failed to read template '{file}'"))?;
    Ok((source, file.to_string()))
}

/// Load the context document, or an empty one when no path is given.
fn load_context(path: Option<&str>) -> Result<TemplateContext> {
    let Some(path) = path else {
        return Ok(TemplateContext::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read context '{path}'"))?;
    load_context_from_str(&text).with_context(|| format!("failed to load context '{path}'"))
}

/// Context tags and parameters plus every built-in filter.
fn build_registry(context: &TemplateContext) -> Result<Registry<Record>> {
    tagfmt_filters::register_builtins(context.registry_builder())
        .build()
        .context("context names conflict with the built-in filters")
}

/// Print diagnostics in the requested format: JSON to stdout, pretty to stderr.
fn report_issues(source: &str, name: &str, issues: &[Diagnostic], format: Format) {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "ok": false,
            "issues": issues,
        })),
        Format::Pretty => {
            render_diagnostics_pretty(source, name, issues);
            print_summary(issues);
        }
    }
}

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}
