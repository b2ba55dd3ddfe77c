//! Terminal rendering for tag diagnostics.
//!
//! Pretty output goes through ariadne so the offending part of the tag is
//! underlined in place. JSON mode serializes diagnostics inside each
//! command's result envelope instead.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use fieldtag_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// How command results and diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit `--output` choice, else pretty on a TTY and JSON
    /// when stdout is piped.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

/// `k=v, k=v` rendering of the diagnostic context, if any.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Inline label text: the field being bound when known, else the message.
fn label_message(diag: &Diagnostic) -> String {
    match diag.context.as_ref().and_then(|c| c.get("field")) {
        Some(field) => format!("while binding field `{field}`"),
        None => diag.message.clone(),
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Write `diagnostics` to stderr with the tag text underlined.
///
/// `origin` names where the tag came from (a file path, `<arg>` or
/// `<stdin>`) and is shown in the report header.
pub(crate) fn render_diagnostics_pretty(source: &str, origin: &str, diagnostics: &[Diagnostic]) {
    let config = Config::default().with_compact(false);
    let mut cache = (origin, Source::from(source));

    for diag in diagnostics {
        let Some(span) = diag.span else {
            eprintln!("{diag}");
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            if let Some(help) = diag.explain() {
                eprintln!("  = help: {help}");
            }
            continue;
        };

        // Spans on an empty tag or at end of input may sit past the text.
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);

        let mut report = Report::build(report_kind(&diag.severity), (origin, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((origin, start..end))
                    .with_message(label_message(diag))
                    .with_color(severity_color(&diag.severity)),
            );
        if let Some(note) = context_note(diag) {
            report = report.with_note(note);
        }
        if let Some(help) = diag.explain() {
            report = report.with_help(help);
        }
        report.finish().eprint(&mut cache).ok();
    }
}

// ── Summary line ────────────────────────────────────────────────────────

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Print a coloured count line such as `1 error, 2 warnings` to stderr.
/// Nothing is printed when `diagnostics` is empty.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let infos = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Info)
        .count();
    let warnings = diagnostics.len() - errors - infos;

    let mut parts = Vec::new();
    if errors > 0 {
        parts.push(plural(errors, "error").fg(Color::Red).to_string());
    }
    if warnings > 0 {
        parts.push(plural(warnings, "warning").fg(Color::Yellow).to_string());
    }
    if infos > 0 {
        parts.push(format!("{infos} info").fg(Color::Blue).to_string());
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}
