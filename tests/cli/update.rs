use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::CliTest;

const API_JS: &str = "export const tips = { done: '操作成功', title: '用户管理' };\n";

#[test]
fn test_update_writes_resources_only() -> Result<()> {
    let test = CliTest::with_file("src/api.js", API_JS)?;
    test.write_file(
        "src/locales/ja-JP.json",
        "{\n  \"common.yonghuGuanli\": \"ユーザー管理\"\n}\n",
    )?;

    let mut cmd = test.command();
    cmd.arg("update");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Added 2 keys to ./src/locales/zh-CN.json:
      + success.caozuoChenggong: 操作成功
      + common.yonghuGuanli: 用户管理
    Added 2 placeholders to ./src/locales/en-US.json
    Added 1 placeholder to ./src/locales/ja-JP.json

    ----- stderr -----
    ");

    assert_eq!(
        test.read_json("src/locales/zh-CN.json")?,
        json!({
            "success.caozuoChenggong": "操作成功",
            "common.yonghuGuanli": "用户管理",
        })
    );
    assert_eq!(
        test.read_json("src/locales/en-US.json")?,
        json!({
            "success.caozuoChenggong": "",
            "common.yonghuGuanli": "",
        })
    );
    assert_eq!(
        test.read_json("src/locales/ja-JP.json")?,
        json!({
            "common.yonghuGuanli": "ユーザー管理",
            "success.caozuoChenggong": "",
        })
    );
    assert_eq!(test.read_file("src/api.js")?, API_JS);
    assert!(!test.root().join(".trnow-backup").exists());
    Ok(())
}

#[test]
fn test_update_dry_run() -> Result<()> {
    let test = CliTest::with_file("src/api.js", API_JS)?;

    let mut cmd = test.command();
    cmd.args(["update", "--dry-run"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    Would add 2 keys to ./src/locales/zh-CN.json:
      + success.caozuoChenggong: 操作成功
      + common.yonghuGuanli: 用户管理
    Would add 2 placeholders to ./src/locales/en-US.json
    Run without --dry-run to write these keys.

    ----- stderr -----
    ");

    assert!(!test.root().join("src/locales").exists());
    Ok(())
}

#[test]
fn test_update_up_to_date() -> Result<()> {
    let test = CliTest::with_file("src/api.js", "const msg = '操作成功'\n")?;
    test.write_file(
        "src/locales/zh-CN.json",
        "{\n  \"toast.done\": \"操作成功\"\n}\n",
    )?;

    let mut cmd = test.command();
    cmd.arg("update");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Scanned 1 file - locale files are up to date

    ----- stderr -----
    ");

    assert!(!test.root().join("src/locales/en-US.json").exists());
    Ok(())
}
