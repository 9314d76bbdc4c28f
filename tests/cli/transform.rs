use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{CliTest, snapshot_label_filters, stderr};

const HEADER_JSX: &str = "export const Header = () => <h1>用户管理</h1>;\n";
const API_JS: &str = "export const messages = { saved: '保存成功' };\n";

fn setup(test: &CliTest) -> Result<()> {
    test.write_file("src/components/Header.jsx", HEADER_JSX)?;
    test.write_file("src/api.js", API_JS)
}

#[test]
fn test_transform_rewrites_sources_and_resource() -> Result<()> {
    let test = CliTest::new()?;
    setup(&test)?;

    let mut cmd = test.command();
    cmd.arg("transform");
    insta::with_settings!({ filters => snapshot_label_filters() }, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Added 2 keys to ./src/locales/zh-CN.json:
          + success.baocunChenggong: 保存成功
          + common.yonghuGuanli: 用户管理
        Rewrote 2 files:
          ./src/api.js
          ./src/components/Header.jsx
        Snapshot saved to ./.trnow-backup/[LABEL] (run trnow revert to undo).

        ----- stderr -----
        ");
    });

    assert_eq!(
        test.read_json("src/locales/zh-CN.json")?,
        json!({
            "success.baocunChenggong": "保存成功",
            "common.yonghuGuanli": "用户管理",
        })
    );
    assert_eq!(
        test.read_file("src/components/Header.jsx")?,
        "export const Header = () => <h1>{t('common.yonghuGuanli')}</h1>;\n"
    );
    assert_eq!(
        test.read_file("src/api.js")?,
        "export const messages = { saved: t('success.baocunChenggong') };\n"
    );
    Ok(())
}

#[test]
fn test_transform_resource_is_pretty_printed() -> Result<()> {
    let test = CliTest::with_file("src/api.js", API_JS)?;

    test.run(&["transform"])?;

    assert_eq!(
        test.read_file("src/locales/zh-CN.json")?,
        "{\n  \"success.baocunChenggong\": \"保存成功\"\n}\n"
    );
    Ok(())
}

#[test]
fn test_transform_snake_case_flag() -> Result<()> {
    let test = CliTest::with_file("src/components/Header.jsx", HEADER_JSX)?;

    let output = test.run(&["transform", "--key-style", "snake_case"])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        test.read_json("src/locales/zh-CN.json")?,
        json!({ "common.yonghu_guanli": "用户管理" })
    );
    Ok(())
}

#[test]
fn test_transform_dry_run_changes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    setup(&test)?;

    let mut cmd = test.command();
    cmd.args(["transform", "--dry-run"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Would add 2 keys to ./src/locales/zh-CN.json:
      + success.baocunChenggong: 保存成功
      + common.yonghuGuanli: 用户管理
    Would rewrite 2 files:
      ./src/api.js
      ./src/components/Header.jsx
    Run without --dry-run to apply these changes.

    ----- stderr -----
    ");

    assert_eq!(test.read_file("src/components/Header.jsx")?, HEADER_JSX);
    assert_eq!(test.read_file("src/api.js")?, API_JS);
    assert!(!test.root().join("src/locales/zh-CN.json").exists());
    assert!(!test.root().join(".trnow-backup").exists());
    Ok(())
}

#[test]
fn test_transform_twice_is_a_no_op() -> Result<()> {
    let test = CliTest::new()?;
    setup(&test)?;

    test.run(&["transform"])?;
    let resource = test.read_file("src/locales/zh-CN.json")?;
    let header = test.read_file("src/components/Header.jsx")?;

    let mut cmd = test.command();
    cmd.arg("transform");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Scanned 2 files - nothing to transform

    ----- stderr -----
    ");

    assert_eq!(test.read_file("src/locales/zh-CN.json")?, resource);
    assert_eq!(test.read_file("src/components/Header.jsx")?, header);
    Ok(())
}

#[test]
fn test_transform_reuses_existing_keys() -> Result<()> {
    let test = CliTest::with_file("src/api.js", API_JS)?;
    test.write_file(
        "src/locales/zh-CN.json",
        "{\n  \"toast.saved\": \"保存成功\"\n}\n",
    )?;

    let mut cmd = test.command();
    cmd.arg("transform");
    insta::with_settings!({ filters => snapshot_label_filters() }, {
        assert_cmd_snapshot!(cmd, @r"
        success: true
        exit_code: 0
        ----- stdout -----
        Reused 1 key already in the resource.
        Rewrote 1 file:
          ./src/api.js
        Snapshot saved to ./.trnow-backup/[LABEL] (run trnow revert to undo).

        ----- stderr -----
        ");
    });

    assert_eq!(
        test.read_file("src/api.js")?,
        "export const messages = { saved: t('toast.saved') };\n"
    );
    assert_eq!(
        test.read_json("src/locales/zh-CN.json")?,
        json!({ "toast.saved": "保存成功" })
    );
    Ok(())
}

#[test]
fn test_transform_creates_snapshot() -> Result<()> {
    let test = CliTest::with_file("src/api.js", API_JS)?;

    test.run(&["transform"])?;

    let snapshots: Vec<_> = std::fs::read_dir(test.root().join(".trnow-backup"))?
        .filter_map(|entry| entry.ok())
        .collect();
    assert_eq!(snapshots.len(), 1);
    let backup = snapshots[0].path().join("src/api.js");
    assert_eq!(std::fs::read_to_string(backup)?, API_JS);
    Ok(())
}

#[test]
fn test_transform_malformed_resource_is_fatal() -> Result<()> {
    let test = CliTest::with_file("src/api.js", API_JS)?;
    test.write_file("src/locales/zh-CN.json", "{ not json")?;

    let output = test.run(&["transform"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error:"));
    assert_eq!(test.read_file("src/api.js")?, API_JS);
    assert!(!test.root().join(".trnow-backup").exists());
    Ok(())
}

#[test]
fn test_transform_respects_config_file() -> Result<()> {
    let test = CliTest::with_file("app/api.js", API_JS)?;
    test.write_file(
        ".trnowrc.json",
        r#"{
            "sourceDir": "./app",
            "localeDir": "./i18n",
            "sourceLang": "zh-TW",
            "keyGeneration": { "style": "snake_case" }
        }"#,
    )?;

    let output = test.run(&["transform"])?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        test.read_json("i18n/zh-TW.json")?,
        json!({ "success.baocun_chenggong": "保存成功" })
    );
    Ok(())
}
