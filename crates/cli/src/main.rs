mod logger;
mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fieldtag_core::{
    BindMode, BindOptions, Diagnostic, DynamicRecord, Severity, Tag, TokKind, bind, bind_atomic,
    codes, ignored_keys, load_schema_from_str, parse_report, parse_str, resolve, to_pretty_json,
    tokenize,
};
use fieldtag_diagnostics as diag;

use crate::render::{Format, print_summary, render_diagnostics_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "fieldtag",
    version,
    about = "Scan, parse, check, and bind compact field-annotation tags"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log library activity to stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

/// Where the tag text comes from.
#[derive(Args, Debug)]
struct Input {
    /// Tag text, e.g. `12,true,name,~switchField`. Reads stdin when
    /// omitted or `-`, so the `-` skip tag itself must be given through
    /// stdin or `--file`.
    tag: Option<String>,

    /// Read the tag text from a file instead (`-` for stdin).
    #[arg(long, short, conflicts_with = "tag")]
    file: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Analysis (progressive: tokens → parse → check → resolve) ────
    /// Print the scanner's token stream.
    Tokens {
        #[command(flatten)]
        input: Input,
    },

    /// Parse a tag and print its syntax tree.
    Parse {
        #[command(flatten)]
        input: Input,
    },

    /// Check that a tag parses and its arguments are correctly ordered.
    Check {
        #[command(flatten)]
        input: Input,
    },

    /// Split a tag into positional and keyword arguments.
    Resolve {
        #[command(flatten)]
        input: Input,
    },

    // ── Binding ─────────────────────────────────────────────────────
    /// Bind a tag into a record described by a JSON schema and print the
    /// resulting record.
    Bind {
        #[command(flatten)]
        input: Input,
        /// Path to the record schema JSON.
        #[arg(long)]
        schema: String,
        /// Leave the record at its zero values unless every argument binds.
        #[arg(long)]
        atomic: bool,
    },

    // ── Reference ───────────────────────────────────────────────────
    /// Explain a diagnostic ID (e.g. TAG1403).
    Explain { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Tokens { input } => cmd_tokens(&input, format)?,
        Cmd::Parse { input } => cmd_parse(&input, format)?,
        Cmd::Check { input } => cmd_check(&input, format)?,
        Cmd::Resolve { input } => cmd_resolve(&input, format)?,
        Cmd::Bind {
            input,
            schema,
            atomic,
        } => cmd_bind(&input, &schema, atomic, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }
    Ok(())
}

// ── Input ───────────────────────────────────────────────────────────────

/// Tag text plus a name for it in diagnostics.
struct Source {
    text: String,
    origin: String,
}

impl Input {
    fn read(&self) -> Result<Source> {
        if let Some(tag) = self.tag.as_deref().filter(|t| *t != "-") {
            return Ok(Source {
                text: tag.to_string(),
                origin: "<arg>".to_string(),
            });
        }
        let (text, origin) = match self.file.as_deref().filter(|p| *p != "-") {
            Some(path) => (
                fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?,
                path.to_string(),
            ),
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read tag from stdin")?;
                (buf, "<stdin>".to_string())
            }
        };
        // Tags never contain a line break; drop the one editors and `echo` add.
        let trimmed = text.strip_suffix('\n').unwrap_or(&text);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Source {
            text: trimmed.to_string(),
            origin,
        })
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_tokens(input: &Input, format: Format) -> Result<()> {
    let src = input.read()?;
    let tokens = tokenize(&src.text);
    let diagnostics: Vec<Diagnostic> = tokens
        .last()
        .and_then(|tok| match tok.kind {
            TokKind::Error(kind) => Some(Diagnostic::error(
                kind.code(),
                tok.text.to_string(),
                Some(tok.span()),
            )),
            _ => None,
        })
        .into_iter()
        .collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "tokens": tokens,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for tok in &tokens {
                if tok.kind.is_terminal() && tok.kind != TokKind::Eof {
                    continue;
                }
                println!(
                    "{:>4}..{:<4} {:<18} {}",
                    tok.start,
                    tok.end,
                    token_label(tok.kind),
                    tok.text
                );
            }
            render_diagnostics_pretty(&src.text, &src.origin, &diagnostics);
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn token_label(kind: TokKind) -> &'static str {
    match kind {
        TokKind::Error(_) => "error",
        TokKind::Eof => "eof",
        TokKind::Nil => "nil",
        TokKind::Bool => "bool",
        TokKind::Number => "number",
        TokKind::String => "string",
        TokKind::Identifier => "identifier",
        TokKind::Enable => "enable",
        TokKind::Disable => "disable",
        TokKind::Assign => "assign",
        TokKind::ListSeparator => "list-separator",
        TokKind::ArgumentSeparator => "argument-separator",
    }
}

fn cmd_parse(input: &Input, format: Format) -> Result<()> {
    let src = input.read()?;
    let res = parse_report(&src.text);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ast": res.ast,
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Tree on stdout, diagnostics on stderr.
            if let Some(ast) = &res.ast {
                println!("{}", to_pretty_json(ast));
            }
            render_diagnostics_pretty(&src.text, &src.origin, &res.diagnostics);
        }
    }

    exit_on_errors(&res.diagnostics);
    Ok(())
}

fn cmd_check(input: &Input, format: Format) -> Result<()> {
    let src = input.read()?;
    let diagnostics: Vec<Diagnostic> = match parse_str(&src.text) {
        Ok(list) => resolve(&list)
            .err()
            .map(|e| e.to_diagnostic())
            .into_iter()
            .collect(),
        Err(e) => vec![e.to_diagnostic()],
    };
    let ok = !has_errors(&diagnostics);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics_pretty(&src.text, &src.origin, &diagnostics);
            print_summary(&diagnostics);
            if ok {
                eprintln!("tag ok");
            }
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

fn cmd_resolve(input: &Input, format: Format) -> Result<()> {
    let src = input.read()?;
    let list = match parse_str(&src.text) {
        Ok(list) => list,
        Err(e) => return report_failure(&src, &e.to_diagnostic(), format),
    };
    let args = match resolve(&list) {
        Ok(args) => args,
        Err(e) => return report_failure(&src, &e.to_diagnostic(), format),
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "positional": args.positional,
                "keyword": args.keyword,
                "diagnostics": [],
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for (i, value) in args.positional.iter().enumerate() {
                println!("#{i} = {value}");
            }
            for (key, arg) in &args.keyword {
                println!("{key} = {}", arg.value);
            }
        }
    }
    Ok(())
}

fn cmd_bind(input: &Input, schema_path: &str, atomic: bool, format: Format) -> Result<()> {
    let schema_text = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {schema_path}"))?;
    let schema = load_schema_from_str(&schema_text)
        .with_context(|| format!("invalid schema {schema_path}"))?;
    let mut options = schema.options;
    if atomic {
        options.mode = BindMode::Atomic;
    }

    let src = input.read()?;
    let mut record = schema.record();
    let tag = Tag::new(src.origin.as_str(), src.text.as_str());
    let diagnostics = bind_tag(&tag, &mut record, &options);
    let ok = !has_errors(&diagnostics);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": ok,
                "record": record,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            render_diagnostics_pretty(&src.text, &src.origin, &diagnostics);
            print_summary(&diagnostics);
        }
    }

    exit_on_errors(&diagnostics);
    Ok(())
}

/// Bind `tag` into `record`, collecting the failure (if any) plus a
/// warning per skipped key or a note for the `-` sentinel.
fn bind_tag(tag: &Tag, record: &mut DynamicRecord, options: &BindOptions) -> Vec<Diagnostic> {
    if tag.is_ignored() {
        return vec![Diagnostic::info(
            codes::BIND_TAG_SKIPPED,
            "tag is '-'; record left unchanged",
            None,
        )];
    }
    let list = match tag.parse() {
        Ok(list) => list,
        Err(e) => return vec![e.to_diagnostic()],
    };
    let args = match resolve(&list) {
        Ok(args) => args,
        Err(e) => return vec![e.to_diagnostic()],
    };

    let mut diagnostics: Vec<Diagnostic> = ignored_keys(&args, &*record, options)
        .into_iter()
        .map(|(key, arg)| {
            Diagnostic::warn(
                codes::BIND_KEY_IGNORED,
                format!("unknown field {key:?} ignored"),
                Some(arg.span),
            )
        })
        .collect();
    let bound = match options.mode {
        BindMode::BestEffort => bind(&args, record, options),
        BindMode::Atomic => bind_atomic(&args, record, options),
    };
    if let Err(e) = bound {
        diagnostics.push(e.to_diagnostic());
    }
    diagnostics
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    let text = diag::explain(id);
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            use ariadne::{Color, Fmt};
            match text {
                Some(text) => println!("{}: {text}", id.fg(Color::Cyan)),
                None => println!("{}: (no explanation available)", id.fg(Color::Cyan)),
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Report a single failure in the command's JSON envelope shape and exit.
fn report_failure(src: &Source, failure: &Diagnostic, format: Format) -> Result<()> {
    let diagnostics = std::slice::from_ref(failure);
    match format {
        Format::Json => {
            let out = serde_json::json!({ "diagnostics": diagnostics });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => render_diagnostics_pretty(&src.text, &src.origin, diagnostics),
    }
    exit_on_errors(diagnostics);
    Ok(())
}

fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
}

/// Exit with status 1 when any diagnostic is an error.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if has_errors(diagnostics) {
        process::exit(1);
    }
}
