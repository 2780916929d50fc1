//! Integration tests for conf-engine

use conf_engine::*;
use std::fs;
use std::path::PathBuf;
use temp_env::with_vars;
use tempfile::TempDir;

const TEST_YAML: &str = r#"
default_option: default_value
test_option_two: test_two
test_int: 12345
"#;

const BOOLEANS_YAML: &str = r#"
booleans:
  boolean_true: "true"
  boolean_yes: "yes"
  boolean_false: "false"
  boolean_no: "no"
"#;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn load_with_file(path: &PathBuf) -> Config {
    ConfigLoader::new()
        .with_prefix("FILE_IT")
        .with_args(["--config-file", path.to_str().unwrap()])
        .load()
        .unwrap()
}

#[test]
fn test_register_option() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "test.yaml", TEST_YAML);
    let config = load_with_file(&path);

    config
        .register_option(ConfigOption::string("default_option"), None)
        .unwrap();
    assert_eq!(
        config.get("default_option").unwrap(),
        Some(Value::from("default_value"))
    );
}

#[test]
fn test_register_options() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "test.yaml", TEST_YAML);
    let config = load_with_file(&path);

    config
        .register_options(
            [
                ConfigOption::string("default_option"),
                ConfigOption::string("test_option_two"),
                ConfigOption::number("test_int"),
            ],
            None,
        )
        .unwrap();

    assert_eq!(
        config.get("default_option").unwrap(),
        Some(Value::from("default_value"))
    );
    assert_eq!(
        config.get("test_option_two").unwrap(),
        Some(Value::from("test_two"))
    );
    // Numbers come back typed, not as the raw string
    let test_int = config.get("test_int").unwrap().unwrap();
    assert_eq!(test_int, Value::Integer(12345));
    assert_eq!(test_int.as_i64(), Some(12345));
    assert_eq!(test_int.as_str(), None);
}

#[test]
fn test_register_options_in_group() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "booleans.yaml", BOOLEANS_YAML);
    let config = load_with_file(&path);

    config
        .register_options(
            [
                ConfigOption::boolean("boolean_true"),
                ConfigOption::boolean("boolean_yes"),
                ConfigOption::boolean("boolean_false"),
                ConfigOption::boolean("boolean_no"),
            ],
            Some("booleans"),
        )
        .unwrap();

    let booleans = config.group("booleans");
    let resolved: Vec<Option<bool>> = ["boolean_true", "boolean_yes", "boolean_false", "boolean_no"]
        .iter()
        .map(|name| booleans.get(name).unwrap().and_then(|v| v.as_bool()))
        .collect();
    assert_eq!(resolved, vec![Some(true), Some(true), Some(false), Some(false)]);
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_register_options_from_ini() {
    let config = load_with_file(&fixture("test.ini"));

    config
        .register_options(
            [
                ConfigOption::string("default_option"),
                ConfigOption::string("test_option_two"),
                ConfigOption::number("test_int"),
            ],
            None,
        )
        .unwrap();

    assert_eq!(
        config.get("default_option").unwrap(),
        Some(Value::from("default_value"))
    );
    assert_eq!(
        config.get("test_option_two").unwrap(),
        Some(Value::from("test_two"))
    );
    assert_eq!(config.get("test_int").unwrap(), Some(Value::Integer(12345)));
}

#[test]
fn test_ini_section_booleans() {
    let config = load_with_file(&fixture("types/booleans.ini"));

    config
        .register_options(
            [
                ConfigOption::boolean("boolean_true"),
                ConfigOption::boolean("boolean_yes"),
                ConfigOption::boolean("boolean_false"),
                ConfigOption::boolean("boolean_no"),
            ],
            Some("booleans"),
        )
        .unwrap();

    let booleans = config.group("booleans");
    let resolved: Vec<Option<bool>> = ["boolean_true", "boolean_yes", "boolean_false", "boolean_no"]
        .iter()
        .map(|name| booleans.get(name).unwrap().and_then(|v| v.as_bool()))
        .collect();
    assert_eq!(resolved, vec![Some(true), Some(true), Some(false), Some(false)]);
}

#[test]
fn test_non_mapping_config_file_fails_to_load() {
    let dir = TempDir::new().unwrap();
    // INI text under a YAML extension parses as a single scalar
    let path = write_config(&dir, "test.yaml", "default_option = default_value\n");

    let result = ConfigLoader::new()
        .with_prefix("FILE_IT")
        .with_args(["--config-file", path.to_str().unwrap()])
        .load();
    assert!(matches!(result, Err(ConfigError::InvalidDocument(_))));
}

#[test]
fn test_register_same_option_name_with_different_params() {
    let config = Config::new();
    config
        .register_option(ConfigOption::string("default_option"), None)
        .unwrap();

    let result = config.register_option(ConfigOption::number("default_option"), None);
    assert!(matches!(result, Err(ConfigError::DuplicateOption { .. })));

    let result = config.register_option(
        ConfigOption::string("default_option").with_default("other"),
        None,
    );
    assert!(matches!(result, Err(ConfigError::DuplicateOption { .. })));
}

#[test]
fn test_register_same_option_name_with_same_params() {
    let config = Config::new();
    config
        .register_option(ConfigOption::string("default_option"), None)
        .unwrap();
    config
        .register_option(ConfigOption::string("default_option"), None)
        .unwrap();
}

#[test]
fn test_default_options() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "test.yaml", TEST_YAML);
    let config = load_with_file(&path);

    config
        .register_options(
            [
                ConfigOption::string("default_option")
                    .with_default("This should not return the default."),
                ConfigOption::number("test_option_default").with_default(100),
                ConfigOption::boolean("test_bool_option").with_default(true),
                ConfigOption::boolean("test_bool_false_option").with_default(false),
            ],
            None,
        )
        .unwrap();

    assert_eq!(config.get("test_bool_option").unwrap(), Some(Value::Boolean(true)));
    assert_eq!(
        config.get("test_bool_false_option").unwrap(),
        Some(Value::Boolean(false))
    );
    assert_eq!(
        config.get("default_option").unwrap(),
        Some(Value::from("default_value"))
    );
    assert_eq!(
        config.get("test_option_default").unwrap(),
        Some(Value::Integer(100))
    );
}

#[test]
fn test_option_precedence() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "test.yaml", TEST_YAML);

    with_vars([("DEFAULT_OPTION", Some("env_value"))], || {
        let config = ConfigLoader::new()
            .with_args(["--config-file", path.to_str().unwrap()])
            .load()
            .unwrap();
        config
            .register_option(
                ConfigOption::string("default_option")
                    .with_default("This should not return the default."),
                None,
            )
            .unwrap();
        assert_eq!(
            config.get("default_option").unwrap(),
            Some(Value::from("env_value"))
        );
    });
}

#[test]
fn test_command_line_beats_environment_and_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "prec.yaml", "prec_it:\n  value: from-file\n");

    with_vars([("PREC_IT_VALUE", Some("from-env"))], || {
        let config = ConfigLoader::new()
            .with_args([
                "--config-file",
                path.to_str().unwrap(),
                "--prec_it-value",
                "from-cli",
            ])
            .load()
            .unwrap();
        config
            .register_option(ConfigOption::string("value"), Some("prec_it"))
            .unwrap();
        assert_eq!(
            config.group("prec_it").get("value").unwrap(),
            Some(Value::from("from-cli"))
        );
    });
}

#[test]
fn test_required_option_missing() {
    let config = ConfigLoader::new().with_prefix("REQ_IT").load().unwrap();
    config
        .register_options(
            [
                ConfigOption::string("needed").required(),
                ConfigOption::string("optional"),
            ],
            None,
        )
        .unwrap();

    assert!(matches!(
        config.get("needed"),
        Err(ConfigError::RequiredOptionMissing { .. })
    ));
    assert_eq!(config.get("optional").unwrap(), None);
}

#[test]
fn test_coercion_error_surfaces_from_access() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.yaml", "coerce_it:\n  flag: sometimes\n  count: lots\n");
    let config = load_with_file(&path);

    config
        .register_options(
            [
                ConfigOption::boolean("flag").with_default(false),
                ConfigOption::number("count").with_default(1),
            ],
            Some("coerce_it"),
        )
        .unwrap();

    let group = config.group("coerce_it");
    assert!(matches!(group.get("flag"), Err(ConfigError::Coercion { .. })));
    assert!(matches!(group.get("count"), Err(ConfigError::Coercion { .. })));
}

#[test]
fn test_option_value_caching() {
    with_vars([("CACHE_IT_DEFAULT_OPTION", Some("env_value"))], || {
        let config = ConfigLoader::new().with_prefix("CACHE_IT").load().unwrap();
        config
            .register_option(
                ConfigOption::string("default_option")
                    .with_default("This should not return the default."),
                None,
            )
            .unwrap();

        let group = config.raw_group(None);
        assert!(!group.is_cached("default_option"));
        let _ = config.get("default_option").unwrap();
        assert!(group.is_cached("default_option"));
        assert_eq!(
            group.cached_value("default_option"),
            Some(Value::from("env_value"))
        );
    });
}

#[test]
fn test_option_value_cache_flush() {
    with_vars([("OPG_STR_OPTION", Some("opt_value"))], || {
        let config = ConfigLoader::new().load().unwrap();
        config
            .register_options([ConfigOption::string("str_option")], Some("opg"))
            .unwrap();

        let group = config.raw_group(Some("opg"));
        assert!(!group.is_cached("str_option"));
        let _ = config.group("opg").get("str_option").unwrap();
        assert!(group.is_cached("str_option"));

        config.flush_cache();
        assert!(!group.is_cached("str_option"));

        let _ = config.group("opg").get("str_option").unwrap();
        assert!(group.is_cached("str_option"));
    });
}

#[test]
fn test_flush_observes_changed_environment() {
    let config = ConfigLoader::new().with_prefix("FLUSH_IT").load().unwrap();
    config
        .register_option(ConfigOption::number("level"), None)
        .unwrap();

    with_vars([("FLUSH_IT_LEVEL", Some("1"))], || {
        assert_eq!(config.get("level").unwrap(), Some(Value::Integer(1)));
    });

    with_vars([("FLUSH_IT_LEVEL", Some("2"))], || {
        // Stale until flushed
        assert_eq!(config.get("level").unwrap(), Some(Value::Integer(1)));
        config.flush_cache();
        assert_eq!(config.get("level").unwrap(), Some(Value::Integer(2)));
    });
}

#[test]
fn test_manifest_driven_configuration() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "app.json",
        r#"{"server": {"listen": "http://0.0.0.0:9090", "workers": 8}}"#,
    );

    let manifest = OptionManifest::from_yaml_str(
        r#"
groups:
  server:
    - name: listen
      type: url
    - name: workers
      type: number
      default: 2
    - name: tags
      type: list
      default: "api,internal"
"#,
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_prefix("MANIFEST_IT")
        .with_config_file(&path)
        .load()
        .unwrap();
    manifest.register(&config).unwrap();

    let server = config.group("server");
    let listen = server.get("listen").unwrap().unwrap();
    assert_eq!(listen.as_url().and_then(|u| u.port()), Some(9090));
    assert_eq!(server.get("workers").unwrap(), Some(Value::Integer(8)));
    assert_eq!(
        server.get("tags").unwrap().unwrap().as_list(),
        Some(&["api".to_string(), "internal".to_string()][..])
    );
}
