//! Loading settings from files on disk

use sqltabs::config::Settings;
use sqltabs::error::ConfigError;
use std::io::Write;

#[test]
fn test_load_full_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[backend]
api_url = "http://db.internal:8080/api"
timeout_secs = 10

[editor]
line_numbers = false
smart_indent = false

[ui]
max_tabs = 5
browser_width = 40

[logging]
level = "debug"
file = "/var/tmp/sqltabs.log"
"#
    )
    .unwrap();

    let settings = Settings::load_from(file.path()).unwrap();
    assert_eq!(settings.backend.api_url, "http://db.internal:8080/api");
    assert_eq!(settings.backend.timeout_secs, 10);
    assert!(!settings.editor.line_numbers);
    assert!(!settings.editor.smart_indent);
    assert_eq!(settings.ui.max_tabs, 5);
    assert_eq!(settings.ui.browser_width, 40);
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(
        settings.log_file().unwrap(),
        std::path::PathBuf::from("/var/tmp/sqltabs.log")
    );
}

#[test]
fn test_load_explicit_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let result = Settings::load(Some(&missing));
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_load_rejects_invalid_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ui]\nbrowser_width = 3").unwrap();
    let result = Settings::load(Some(file.path()));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[backend]\ntimeout_secs = \"soon\"").unwrap();
    let result = Settings::load_from(file.path());
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
