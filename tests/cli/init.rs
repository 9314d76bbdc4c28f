use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .trnowrc.json
      created ./src/locales
      created ./.trnow-backup
      added the backup directory to .gitignore

    ----- stderr -----
    ");

    let content = test.read_file(".trnowrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceDir"], "./src");
    assert_eq!(parsed["sourceLang"], "zh-CN");
    assert_eq!(parsed["keyGeneration"]["style"], "camelCase");
    assert_eq!(parsed["backup"]["keep"], 5);

    assert!(test.root().join("src/locales").is_dir());
    assert!(test.root().join(".trnow-backup").is_dir());
    assert_eq!(test.read_file(".gitignore")?, ".trnow-backup\n");
    Ok(())
}

#[test]
fn test_init_twice_fails() -> Result<()> {
    let test = CliTest::new()?;

    test.run(&["init"])?;

    let mut cmd = test.command();
    cmd.arg("init");
    assert_cmd_snapshot!(cmd, @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: .trnowrc.json already exists
    ");

    assert_eq!(test.read_file(".gitignore")?, ".trnow-backup\n");
    Ok(())
}

#[test]
fn test_init_yaml() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.args(["init", "--yaml"]);
    assert_cmd_snapshot!(cmd, @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .trnow.yml
      created ./src/locales
      created ./.trnow-backup
      added the backup directory to .gitignore

    ----- stderr -----
    ");

    assert!(test.root().join(".trnow.yml").exists());
    assert!(!test.root().join(".trnowrc.json").exists());
    Ok(())
}
