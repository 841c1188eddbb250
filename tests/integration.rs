use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_bashdoc")))
}

const MYFUNC_BLOCK: &str = "\
# myfunc()
# @description
#  Computes something.
# @arg   x    Input value
function myfunc(x) { ... }
";

// -- stdin mode --

#[test]
fn stdin_mode_renders_function_block() {
    let assert = cmd().write_stdin(MYFUNC_BLOCK).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(output.contains("## Index\n\n* [myfunc](#myfunc)\n"));
    assert!(output.contains("### myfunc\n\nComputes something.\n"));
    assert!(output.contains("| `x` |  | Input value |"));
}

#[test]
fn empty_section_title_fails_with_no_output() {
    cmd()
        .write_stdin("# @section\nf() { :; }\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("@section requires a title"))
        .stderr(predicate::str::contains("line: 1"))
        .stderr(predicate::str::contains("file: <stdin>"));
}

#[test]
fn noargs_conflict_fails_with_no_output() {
    cmd()
        .write_stdin("# @description f\n# @noargs\n# @arg x value\nf() { :; }\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("@noargs conflicts with @arg"));
}

#[test]
fn all_fatal_errors_reported_together() {
    let input = "\
# @section
# @description one
one() { :; }

# @arg
# @description two
two() { :; }
";
    cmd()
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("@section requires a title"))
        .stderr(predicate::str::contains("@arg requires a name"));
}

#[test]
fn internal_functions_are_hidden() {
    let input = "\
# @internal
# @description hidden helper
# @env SECRET
_hidden() { :; }
# @description visible
visible() { :; }
";
    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(!output.contains("_hidden"));
    assert!(!output.contains("SECRET"));
    assert!(output.contains("* [visible](#visible)"));
}

#[test]
fn unknown_tag_is_advisory_only() {
    let input = "# @description f\n# @exitcode 0 fine\nf() { :; }\n";
    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("### f"))
        .stderr(predicate::str::contains("unknown tag @exitcode"));
}

// -- table of contents round-trip --

#[test]
fn toc_anchors_round_trip_to_names() {
    let input = "\
# @description First helper.
string::trim() { :; }
# @description Second helper.
read_file() { :; }
# @type
RETRY_LIMIT=3
";
    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    let mut names = Vec::new();
    for line in output.lines().take_while(|l| !l.starts_with("## Types")) {
        if let Some(rest) = line.strip_prefix("* [") {
            let (name, link) = rest.split_once("](#").unwrap();
            let slug = link.strip_suffix(')').unwrap();
            assert_eq!(slug, expected_slug(name), "anchor mismatch for {name}");
            names.push(name.to_string());
        }
    }
    assert_eq!(names, vec!["string::trim", "read_file", "RETRY_LIMIT"]);
}

/// The documented anchor transform: lowercase; keep alphanumeric, space,
/// underscore; whitespace runs become single hyphens.
fn expected_slug(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

// -- file mode --

#[test]
fn file_mode_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lib.sh");
    std::fs::write(&input, MYFUNC_BLOCK).unwrap();
    let out = dir.path().join("lib.md");

    cmd()
        .args(["-o", out.to_str().unwrap()])
        .arg(input.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let rendered = std::fs::read_to_string(&out).unwrap();
    assert!(rendered.contains("### myfunc"));
}

#[test]
fn file_mode_shares_cross_reference_index() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("a.sh"),
        "# @description a\n# @env HOME\na() { :; }\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("b.sh"),
        "# @description b\n# @env HOME\n# @set REPLY\nb() { :; }\n",
    )
    .unwrap();

    let assert = cmd().arg(dir.path().to_str().unwrap()).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(output.contains("* **HOME**: [a](#a), [b](#b)"));
    assert!(output.contains("* **REPLY**: [b](#b)"));
}

#[test]
fn fatal_error_in_one_file_suppresses_all_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("good.sh"), "# @description g\ng() { :; }\n").unwrap();
    std::fs::write(dir.path().join("bad.sh"), "# @section\n").unwrap();

    cmd()
        .arg(dir.path().to_str().unwrap())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("bad.sh"));
}

// -- output formats --

#[test]
fn json_format() {
    let assert = cmd()
        .args(["-f", "json"])
        .write_stdin(MYFUNC_BLOCK)
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(output.contains("\"kind\": \"function\""));
    assert!(output.contains("\"name\": \"myfunc\""));
    assert!(output.contains("\"location\": \"<stdin>:5\""));
}

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["-f", "xml"])
        .write_stdin(MYFUNC_BLOCK)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

// -- diagnostics configuration --

#[test]
fn info_tier_prints_file_summary() {
    cmd()
        .arg("-v")
        .write_stdin(MYFUNC_BLOCK)
        .assert()
        .success()
        .stderr(predicate::str::contains("<stdin>: 1 functions, 0 types"));
}

#[test]
fn info_tier_via_environment_variable() {
    cmd()
        .env("BASHDOC_LOG", "info")
        .write_stdin(MYFUNC_BLOCK)
        .assert()
        .success()
        .stderr(predicate::str::contains("<stdin>: 1 functions, 0 types"));
}

#[test]
fn default_tier_is_quiet_on_success() {
    cmd()
        .env_remove("BASHDOC_LOG")
        .write_stdin(MYFUNC_BLOCK)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn no_color_strips_ansi_from_diagnostics() {
    cmd()
        .arg("--no-color")
        .write_stdin("# @section\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\x1b").not());
}
