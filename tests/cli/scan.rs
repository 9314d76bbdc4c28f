use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const APP_VUE: &str = r#"<template>
  <div class="users">
    <h1>用户管理</h1>
    <el-button title="添加用户">+</el-button>
  </div>
</template>
"#;

#[test]
fn test_scan_reports_hardcoded_text() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;

    let mut cmd = test.command();
    cmd.arg("scan");
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "用户管理"  hardcoded
      --> ./src/App.vue:3:9
      |
    3 |     <h1>用户管理</h1>
      |         ^
      = note: found in text

    warning: "添加用户"  hardcoded
      --> ./src/App.vue:4:23
      |
    4 |     <el-button title="添加用户">+</el-button>
      |                       ^
      = note: found in attribute

    ✘ Found 2 hardcoded texts (2 distinct) in 1 scanned file
    Run trnow transform to replace them.

    ----- stderr -----
    "#);

    assert_eq!(test.read_file("src/App.vue")?, APP_VUE);
    assert!(!test.root().join("src/locales").exists());
    Ok(())
}

#[test]
fn test_scan_clean_project() -> Result<()> {
    let test = CliTest::with_file("src/main.js", "export const version = '1.0.0'\n")?;

    let mut cmd = test.command();
    cmd.arg("scan");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Scanned 1 file - no hardcoded text found

    ----- stderr -----
    ");
    Ok(())
}

#[test]
fn test_scan_skips_unparsable_files() -> Result<()> {
    let test = CliTest::with_file("src/Broken.jsx", "const x = <div>用户管理</div\n")?;
    test.write_file("src/api.js", "const msg = '操作成功'\n")?;

    let output = test.run(&["scan"])?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("parse-error"));
    assert!(stdout(&output).contains("\"操作成功\""));
    assert!(stderr(&output).contains("could not be parsed"));
    Ok(())
}

#[test]
fn test_scan_with_src_override() -> Result<()> {
    let test = CliTest::with_file("app/api.js", "const msg = '操作成功'\n")?;

    let mut cmd = test.command();
    cmd.args(["scan", "--src", "app"]);
    assert_cmd_snapshot!(cmd, @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    warning: "操作成功"  hardcoded
      --> app/api.js:1:13
      |
    1 | const msg = '操作成功'
      |             ^
      = note: found in string

    ✘ Found 1 hardcoded text (1 distinct) in 1 scanned file
    Run trnow transform to replace them.

    ----- stderr -----
    "#);
    Ok(())
}

#[test]
fn test_scan_missing_source_dir_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("scan");
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 2
    ----- stdout -----

    ----- stderr -----
    error: Source directory './src' does not exist
    ");
    Ok(())
}
