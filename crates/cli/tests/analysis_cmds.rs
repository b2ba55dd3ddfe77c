//! CLI tests for `tokens`, `parse`, `check` and `resolve`, including the
//! three input sources (argument, `--file`, stdin).

mod common;

use common::{run, run_with_stdin, stdout_json, write_temp};

// ── tokens ──────────────────────────────────────────────────────────────

#[test]
fn tokens_json_lists_kinds_through_eof() {
    let output = run(&["tokens", "a=1;'x'", "--output", "json"]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    let kinds: Vec<_> = json["tokens"]
        .as_array()
        .expect("tokens array")
        .iter()
        .map(|t| t["kind"].clone())
        .collect();
    assert_eq!(
        kinds,
        [
            "identifier",
            "assign",
            "number",
            "listSeparator",
            "string",
            "eof"
        ]
    );
    assert_eq!(json["tokens"][4]["text"], "'x'");
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn tokens_error_token_fails_with_diagnostic() {
    let output = run(&["tokens", "a=@", "--output", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    let last = json["tokens"]
        .as_array()
        .and_then(|t| t.last())
        .expect("at least one token");
    assert_eq!(last["kind"]["error"], "badCharacter");
    assert_eq!(json["diagnostics"][0]["id"], "TAG1001");
}

#[test]
fn tokens_pretty_prints_one_line_per_token() {
    let output = run(&["tokens", "~on", "--output", "pretty"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("enable"), "unexpected output: {stdout}");
    assert!(stdout.contains("identifier"), "unexpected output: {stdout}");
    assert!(stdout.contains("eof"), "unexpected output: {stdout}");
}

// ── parse ───────────────────────────────────────────────────────────────

#[test]
fn parse_json_returns_ast() {
    let output = run(&["parse", "12,true,name,~switchField", "--output", "json"]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    let args = json["ast"]["args"].as_array().expect("args array");
    assert_eq!(args.len(), 4);
    assert_eq!(args[0]["value"]["kind"], "number");
    assert_eq!(args[0]["value"]["int"], 12);
    assert_eq!(args[1]["value"]["kind"], "bool");
    assert_eq!(args[2]["value"]["kind"], "identifier");
    assert_eq!(args[3]["value"]["kind"], "switch");
    assert_eq!(args[3]["name"]["name"], "switchField");
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn parse_json_error_has_null_ast_and_diagnostic() {
    let output = run(&["parse", "foo,", "--output", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let json = stdout_json(&output);
    assert!(json["ast"].is_null(), "ast should be null: {json}");
    assert_eq!(json["diagnostics"][0]["id"], "TAG1101");
    assert_eq!(json["diagnostics"][0]["message"], "unexpected end of input");
    assert_eq!(json["diagnostics"][0]["span"]["start"], 4);
    assert_eq!(json["diagnostics"][0]["context"]["category"], "syntax");
}

#[test]
fn parse_pretty_writes_tree_to_stdout() {
    let output = run(&["parse", "x=1", "--output", "pretty"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["args"][0]["name"]["name"], "x");
}

// ── check ───────────────────────────────────────────────────────────────

#[test]
fn check_valid_tag_is_ok() {
    let output = run(&["check", "a=1,~b", "--output", "json"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["ok"], true);
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn check_reports_argument_order() {
    let output = run(&["check", "a=1,2", "--output", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["ok"], false);
    assert_eq!(json["diagnostics"][0]["id"], "TAG1301");
    assert_eq!(json["diagnostics"][0]["span"]["start"], 4);
}

#[test]
fn check_pretty_renders_code_and_summary() {
    let output = run(&["check", "n=0x", "--output", "pretty"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TAG1202"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("1 error"), "unexpected stderr: {stderr}");
}

#[test]
fn check_pretty_ok_message() {
    let output = run(&["check", "x", "--output", "pretty"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tag ok"), "unexpected stderr: {stderr}");
}

// ── resolve ─────────────────────────────────────────────────────────────

#[test]
fn resolve_json_splits_arguments() {
    let output = run(&["resolve", "1,'x',k=2,~s,k=3", "--output", "json"]);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json = stdout_json(&output);
    assert_eq!(json["positional"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["positional"][1]["text"], "x");
    assert_eq!(json["keyword"]["k"]["value"]["text"], "3", "later key wins");
    assert_eq!(json["keyword"]["s"]["value"]["kind"], "switch");
}

#[test]
fn resolve_pretty_prints_rendered_values() {
    let output = run(&["resolve", "7,items=a;b", "--output", "pretty"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#0 = 7"), "unexpected output: {stdout}");
    assert!(stdout.contains("items = a;b"), "unexpected output: {stdout}");
}

#[test]
fn resolve_failure_exits_nonzero() {
    let output = run(&["resolve", "~a,1", "--output", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["diagnostics"][0]["id"], "TAG1301");
}

// ── Input sources ───────────────────────────────────────────────────────

#[test]
fn parse_reads_stdin_when_tag_omitted() {
    let output = run_with_stdin(&["parse", "--output", "json"], "a=1,b\n");
    assert!(
        output.status.success(),
        "parse stdin should succeed, stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = stdout_json(&output);
    assert_eq!(json["ast"]["args"].as_array().map(Vec::len), Some(2));
}

#[test]
fn parse_supports_stdin_dash() {
    let output = run_with_stdin(&["parse", "-", "--output", "json"], "x='y'\r\n");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json = stdout_json(&output);
    assert_eq!(json["ast"]["args"][0]["value"]["text"], "y");
}

#[test]
fn check_reads_file() {
    let (_dir, path) = write_temp("tag.txt", "count=3,~verbose\n");
    let output = run(&["check", "--file", path.as_str(), "--output", "json"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["ok"], true);
}

#[test]
fn pretty_diagnostics_name_the_file() {
    let (_dir, path) = write_temp("bad.tag", "a='open\n");
    let output = run(&["check", "-f", path.as_str(), "--output", "pretty"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.tag"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("TAG1002"), "unexpected stderr: {stderr}");
}

#[test]
fn tag_and_file_conflict() {
    let (_dir, path) = write_temp("tag.txt", "x");
    let output = run(&["check", "x", "--file", path.as_str()]);
    assert!(!output.status.success());
}

#[test]
fn missing_file_is_reported() {
    let output = run(&["check", "--file", "/nonexistent/fieldtag.tag"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "unexpected stderr: {stderr}");
}

#[test]
fn verbose_flag_logs_to_stderr() {
    let output = run(&["-v", "parse", "a=1", "--output", "json"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[debug"), "unexpected stderr: {stderr}");
}
