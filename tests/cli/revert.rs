use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, snapshot_label_filters, stderr};

const LIST_VUE: &str = r#"<template>
  <el-table placeholder="暂无数据">
    <span>用户列表</span>
  </el-table>
</template>
"#;

#[test]
fn test_revert_restores_transformed_files() -> Result<()> {
    let test = CliTest::with_file("src/views/List.vue", LIST_VUE)?;

    let output = test.run(&["transform"])?;
    assert_eq!(output.status.code(), Some(0));
    assert_ne!(test.read_file("src/views/List.vue")?, LIST_VUE);

    let mut cmd = test.command();
    cmd.arg("revert");
    insta::with_settings!({ filters => snapshot_label_filters() }, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        ✓ Restored 1 file from snapshot [LABEL]
          ./src/views/List.vue

        ----- stderr -----
        ");
    });

    assert_eq!(test.read_file("src/views/List.vue")?, LIST_VUE);
    Ok(())
}

#[test]
fn test_revert_after_transform_with_absolute_src() -> Result<()> {
    let test = CliTest::with_file("src/views/List.vue", LIST_VUE)?;
    let src = test.root().join("src");
    let src = src.to_str().context("temp path is not UTF-8")?;

    let output = test.run(&["transform", "--src", src])?;
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_ne!(test.read_file("src/views/List.vue")?, LIST_VUE);

    let output = test.run(&["revert"])?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(test.read_file("src/views/List.vue")?, LIST_VUE);
    let stray = src.trim_start_matches('/').split('/').next().unwrap_or_default();
    assert!(!test.root().join(stray).exists());
    Ok(())
}

#[test]
fn test_revert_without_snapshot() -> Result<()> {
    let test = CliTest::with_file("src/api.js", "const msg = '操作成功'\n")?;

    let mut cmd = test.command();
    cmd.arg("revert");
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----
    ✘ No snapshot found in ./.trnow-backup

    ----- stderr -----
    ");

    assert_eq!(test.read_file("src/api.js")?, "const msg = '操作成功'\n");
    Ok(())
}

#[test]
fn test_revert_uses_latest_snapshot() -> Result<()> {
    let test = CliTest::with_file("src/api.js", "const v = 'current'\n")?;
    test.write_file(
        ".trnow-backup/2024-05-01-10-00-00/src/api.js",
        "const v = 'older'\n",
    )?;
    test.write_file(
        ".trnow-backup/2024-05-02-10-00-00/src/api.js",
        "const v = 'newer'\n",
    )?;

    let mut cmd = test.command();
    cmd.arg("revert");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Restored 1 file from snapshot 2024-05-02-10-00-00
      ./src/api.js

    ----- stderr -----
    ");

    assert_eq!(test.read_file("src/api.js")?, "const v = 'newer'\n");
    Ok(())
}

#[test]
fn test_revert_with_backup_dir_flag() -> Result<()> {
    let test = CliTest::with_file("src/api.js", "const v = 'current'\n")?;
    test.write_file("backups/2024-05-01-10-00-00/src/api.js", "const v = 'saved'\n")?;

    let mut cmd = test.command();
    cmd.args(["revert", "--backup-dir", "backups"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Restored 1 file from snapshot 2024-05-01-10-00-00
      ./src/api.js

    ----- stderr -----
    ");

    assert_eq!(test.read_file("src/api.js")?, "const v = 'saved'\n");
    Ok(())
}
