#![allow(non_snake_case)]

use super::*;
use std::collections::HashMap;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn NativeConfig___default___has_nothing_set() {
    let config = NativeConfig::default();

    assert!(config.static_parent_dir.is_none());
    assert!(config.preferred_dir.is_none());
    assert!(config.subpath.is_none());
    assert_eq!(config.resource_name_prefix(), "");
}

#[test]
fn NativeConfig___from_lookup___reads_all_variables() {
    let config = NativeConfig::from_lookup(lookup_from(&[
        (ENV_STATIC_PARENT_DIR, "/var/cache/app"),
        (ENV_PREFERRED_DIR, "/opt/app/natives"),
        (ENV_SUBPATH, "linux/aarch64"),
        (ENV_RESOURCE_NAME_PREFIX, "resources/native/"),
    ]));

    assert_eq!(config.static_parent_dir, Some(PathBuf::from("/var/cache/app")));
    assert_eq!(config.preferred_dir, Some(PathBuf::from("/opt/app/natives")));
    assert_eq!(config.subpath.as_deref(), Some("linux/aarch64"));
    assert_eq!(config.resource_name_prefix(), "resources/native/");
}

#[test]
fn NativeConfig___from_lookup___blank_values_are_unset() {
    let config = NativeConfig::from_lookup(lookup_from(&[
        (ENV_STATIC_PARENT_DIR, "   "),
        (ENV_PREFERRED_DIR, ""),
        (ENV_SUBPATH, " "),
    ]));

    assert_eq!(config, NativeConfig::default());
}

#[test]
fn NativeConfig___from_lookup___trims_subpath_separators() {
    let config = NativeConfig::from_lookup(lookup_from(&[(ENV_SUBPATH, "/win/x86-64/ ")]));

    assert_eq!(config.subpath.as_deref(), Some("win/x86-64"));
}

#[test]
fn NativeConfig___from_json___parses_fields() {
    let json = r#"{"static_parent_dir": "/var/cache/app", "subpath": "darwin"}"#;

    let config = NativeConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.static_parent_dir, Some(PathBuf::from("/var/cache/app")));
    assert_eq!(config.subpath.as_deref(), Some("darwin"));
    assert!(config.preferred_dir.is_none());
}

#[test]
fn NativeConfig___from_empty_bytes___returns_defaults() {
    let config = NativeConfig::from_json(&[]).unwrap();

    assert_eq!(config, NativeConfig::default());
}

#[test]
fn NativeConfig___from_json___invalid___returns_error() {
    let result = NativeConfig::from_json(b"{ not json");

    assert!(result.is_err());
}

#[test]
fn NativeConfig___builders___set_values() {
    let config = NativeConfig::new()
        .with_static_parent_dir("/srv/natives")
        .with_preferred_dir("/opt/natives")
        .with_subpath("freebsd/x86-64")
        .with_resource_name_prefix("native/");

    assert_eq!(config.static_parent_dir, Some(PathBuf::from("/srv/natives")));
    assert_eq!(config.preferred_dir, Some(PathBuf::from("/opt/natives")));
    assert_eq!(config.subpath.as_deref(), Some("freebsd/x86-64"));
    assert_eq!(config.resource_name_prefix(), "native/");
}
