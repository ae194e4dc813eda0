// textsub-core/tests/rules_integration_tests.rs
use anyhow::Result;
use tempfile::NamedTempFile;
use std::io::Write;

// Import the specific types and functions needed from the main crate's config module
use textsub_core::{compile_rules, DropReason, ReplacementConfig, TextsubError};

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
rules:
  - id: version-stamp
    filter: [src/version.js, src/about.js]
    replace:
      - from: __VERSION__
        to: 1.2.3
  - filter: { pattern: '\.css$' }
    replace:
      from: 'url(/assets'
      to: 'url(/static'
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = ReplacementConfig::load_from_file(file.path())?;
    assert_eq!(config.rules.len(), 2);
    assert_eq!(config.rules[0].id.as_deref(), Some("version-stamp"));
    assert!(config.rules[1].id.is_none());
    Ok(())
}

#[test]
fn test_load_from_missing_file_is_a_read_error() {
    let err = ReplacementConfig::load_from_file("/nonexistent/rules.yaml").unwrap_err();
    assert!(matches!(err, TextsubError::RulesRead(_, _)));
}

#[test]
fn test_load_from_malformed_yaml_is_a_parse_error() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"rules: {not: [valid")?;
    let err = ReplacementConfig::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, TextsubError::RulesParse(_, _)));
    Ok(())
}

#[test]
fn test_loaded_rules_compile_and_apply() -> Result<()> {
    let config = ReplacementConfig::from_yaml_str(
        r#"
rules:
  - filter: a.js
    replace: { from: FOO, to: bar }
"#,
    )?;
    let compiled = compile_rules(&config.rules);
    assert_eq!(compiled.len(), 1);
    assert!(compiled.dropped.is_empty());
    assert_eq!(
        compiled.rules[0].fold("let x = FOO;".to_string(), "a.js"),
        "let x = bar;"
    );
    Ok(())
}

#[test_log::test]
fn test_malformed_declarations_drop_without_failing_the_rest() -> Result<()> {
    // One good rule between two bad ones: the bad ones drop silently and the
    // good one still compiles.
    let config = ReplacementConfig::from_yaml_str(
        r#"
rules:
  - filter: []
    replace: { from: A, to: B }
  - filter: good.js
    replace: { from: A, to: B }
  - filter: bad.js
    replace: { from: A }
"#,
    )?;
    let compiled = compile_rules(&config.rules);
    assert_eq!(compiled.len(), 1);
    assert_eq!(compiled.dropped.len(), 2);
    assert_eq!(compiled.dropped[0].index, 0);
    assert_eq!(compiled.dropped[0].reason, DropReason::EmptyFilter);
    assert_eq!(compiled.dropped[1].index, 2);
    assert_eq!(compiled.dropped[1].reason, DropReason::NoTransforms);
    assert!(compiled.rules[0].predicate.matches("good.js"));
    Ok(())
}

#[test]
fn test_omitted_fields_default_to_unusable_and_drop() -> Result<()> {
    let config = ReplacementConfig::from_yaml_str("rules:\n  - id: only-a-label\n")?;
    let compiled = compile_rules(&config.rules);
    assert!(compiled.is_empty());
    assert_eq!(compiled.dropped.len(), 1);
    assert_eq!(compiled.dropped[0].id.as_deref(), Some("only-a-label"));
    Ok(())
}
