use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_dmdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap_or_else(|e| panic!("{rel}: {e}"))
}

// -- cross-module references --

#[test]
fn aggregated_layout_links_method_anchor() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("a.json"))
        .arg(fixture_path("b.json"))
        .assert()
        .success();

    let b = read(&dir, "b/index.html");
    assert!(b.contains("<a href=\"../a/Widget.html#draw\">Widget.draw</a>"));

    let widget = read(&dir, "a/Widget.html");
    assert!(widget.contains("<h3 id=\"draw\">"));
    assert!(widget.contains("<h3 id=\"resize\">"));
    // `draw` from inside `resize` is a sibling on the same page.
    assert!(widget.contains("<a href=\"#draw\">draw</a>"));
    assert!(widget.contains("<tr><td><code>w</code></td><td>new width</td></tr>"));
    assert!(!widget.contains("cache"));
}

#[test]
fn simple_layout_links_method_page() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "--layout", "simple"])
        .arg(fixture_path("a.json"))
        .arg(fixture_path("b.json"))
        .assert()
        .success();

    let b = read(&dir, "b/index.html");
    assert!(b.contains("<a href=\"../a/Widget.draw.html\">Widget.draw</a>"));
    assert!(dir.path().join("a/Widget.draw.html").is_file());
    assert!(dir.path().join("a/Widget.resize.html").is_file());
    assert!(dir.path().join("b/render.html").is_file());
}

#[test]
fn forward_reference_resolves() {
    // `b` is processed before the module it refers to.
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("b.json"))
        .arg(fixture_path("a.json"))
        .assert()
        .success();

    let b = read(&dir, "b/index.html");
    assert!(b.contains("../a/Widget.html#draw"));
    assert!(b.contains("<a href=\"../a/index.html\">a</a>"));
}

#[test]
fn code_blocks_are_linked() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("a.json"))
        .arg(fixture_path("b.json"))
        .assert()
        .success();

    let b = read(&dir, "b/index.html");
    assert!(b.contains("<pre><code><a href=\"#render\">render</a>(new <a href=\"../a/Widget.html\">Widget</a>());</code></pre>"));
}

// -- root outputs --

#[test]
fn index_lists_modules_sorted_with_summary() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "--project-name", "Widgets"])
        .arg(fixture_path("b.json"))
        .arg(fixture_path("a.json"))
        .assert()
        .success();

    let index = read(&dir, "index.html");
    assert!(index.contains("<title>Widgets</title>"));
    let a = index.find("<a href=\"a/index.html\">a</a>").unwrap();
    let b = index.find("<a href=\"b/index.html\">b</a>").unwrap();
    assert!(a < b);
    assert!(index.contains("Widgets and the things they draw."));
    assert!(!index.contains("immutable once built"));

    assert!(dir.path().join("toc.html").is_file());
    let search = read(&dir, "search-index.json");
    assert!(search.contains("\"name\": \"a.Widget.resize\""));
    assert!(search.contains("\"url\": \"a/Align.html#left\""));
}

#[test]
fn enum_members_and_constants() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("a.json"))
        .assert()
        .success();

    let align = read(&dir, "a/Align.html");
    assert!(align.contains("<h3 id=\"left\">left"));
    assert!(align.contains("<tr><td>right</td>"));

    let module = read(&dir, "a/index.html");
    assert!(module.contains("<h3 id=\"maxWidgets\">maxWidgets <span class=\"tag\">value</span>"));
}

// -- skipping and errors --

#[test]
fn module_without_name_is_skipped() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("noname.json"))
        .arg(fixture_path("a.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("has no module declaration"));

    assert!(!read(&dir, "search-index.json").contains("hidden"));
}

#[test]
fn malformed_input_is_skipped() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("broken.json"))
        .arg(fixture_path("a.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("malformed front-end output"));

    assert!(dir.path().join("a/Widget.html").is_file());
}

#[test]
fn oversized_input_is_skipped() {
    let dir = TempDir::new().unwrap();
    let big = dir.path().join("big.json");
    fs::write(&big, format!("[{}]", " ".repeat(4096))).unwrap();
    let out = dir.path().join("out");

    cmd()
        .args(["-o", out.to_str().unwrap(), "--max-file-size", "1"])
        .arg(&big)
        .assert()
        .success()
        .stderr(predicate::str::contains("byte limit"));
}

#[test]
fn exclusion_is_per_component() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-e", "lib.internal"])
        .arg(fixture_path("internal.json"))
        .assert()
        .success();

    assert!(!dir.path().join("lib/internal/detail").exists());
    assert!(dir.path().join("lib/internals/index.html").is_file());
}

#[test]
fn user_macros_are_expanded() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-o", dir.path().to_str().unwrap(), "-m", fixture_path("colors.ddoc").as_str()])
        .arg(fixture_path("hilite.json"))
        .assert()
        .success();

    assert!(read(&dir, "hot/index.html").contains("Very <mark>hot</mark> code."));
}

#[test]
fn unknown_layout_fails() {
    cmd()
        .args(["--layout", "flat"])
        .arg(fixture_path("a.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown layout: flat"));
}

#[test]
fn no_matching_inputs_fails() {
    cmd()
        .arg("/nonexistent/*.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files found"));
}

#[test]
fn inputs_are_required() {
    cmd().assert().failure();
}

#[test]
fn directory_input() {
    let src = TempDir::new().unwrap();
    fs::copy(fixture_path("a.json"), src.path().join("a.json")).unwrap();
    fs::write(src.path().join("README"), "not json").unwrap();
    let out = TempDir::new().unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .arg(src.path())
        .assert()
        .success();

    assert!(out.path().join("a/index.html").is_file());
}
