mod common;

use common::TestContext;
use predicates::prelude::*;
use std::fs;

const DOC: &str = "---\ntitle: UART Driver\ncategory: modules\nstatus: review\ntags: [serial]\n---\n# UART Driver\n\nRegister notes.\n";

#[test]
fn build_generates_self_contained_index() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.modules_dir()).unwrap();
    fs::write(ctx.modules_dir().join("uart.md"), DOC).unwrap();

    ctx.cli()
        .args(["build", "--project", "MotorCtl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 document(s)"))
        .stdout(predicate::str::contains("Categories: modules(1)"));

    let html = fs::read_to_string(ctx.wiki_dir().join("_site").join("index.html")).unwrap();
    assert!(html.contains("MotorCtl"));
    assert!(html.contains("UART Driver"));
    assert!(!html.contains("__DOCS_DATA__"));
    assert!(!html.contains("__PROJECT_NAME__"));
}

#[test]
fn rebuild_skips_previous_site_output() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.modules_dir()).unwrap();
    fs::write(ctx.modules_dir().join("uart.md"), DOC).unwrap();

    ctx.cli().arg("build").assert().success();
    ctx.cli()
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 document(s)"));
}

#[test]
fn build_without_wiki_directory_fails() {
    let ctx = TestContext::new();

    ctx.cli()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wiki directory not found"));
}
