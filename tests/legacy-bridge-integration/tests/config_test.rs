//! 从外部配置构造桥接的端到端测试

mod common;

use common::*;
use config_abstractions::ConfigProvider;
use config_impl::{EnvironmentConfigProviderImpl, TomlConfigProvider};
use di_abstractions::{ComponentRegistry, ComponentResolver, RegistryPostProcessor};
use di_impl::{ContainerBootstrapper, DefaultComponentRegistry};
use legacy_bridge::predicates::any_constant;
use legacy_bridge::{
    BridgeConfig, BridgeOptions, LegacyComponentRegistrar, StaticFieldFilter, DEFAULT_SECTION,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn toml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_bridge_from_toml() {
    init_test_logger();
    let world = legacy_world();
    let file = toml_file(
        r#"
[bridge]
basePackages = ["example.legacy"]
order = 42
beanNaming = "qualified"
"#,
    );
    let provider = TomlConfigProvider::new(file.path()).unwrap();
    let options = BridgeOptions::from_provider(&provider, DEFAULT_SECTION).unwrap();

    let registrar = LegacyComponentRegistrar::new(
        BridgeConfig::from_options(&options)
            .with_filter(Arc::new(StaticFieldFilter::fields(any_constant()))),
        world.universe.clone(),
        world.universe.clone(),
    );
    assert_eq!(registrar.order(), 42);

    let mut registry = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(Arc::new(registrar))
        .bootstrap(&mut registry)
        .unwrap();

    assert_eq!(
        registry.list_names(),
        vec![
            "example.legacy.Legacy1#0",
            "example.legacy.LegacyRegistry#0",
            "example.legacy.FailingHolder#0",
        ]
    );
    let value = registry.resolve_by_name("example.legacy.Legacy1#0").unwrap();
    assert!(Arc::ptr_eq(&value, &world.legacy1));
}

#[test]
fn test_environment_overrides_file() {
    let world = legacy_world();
    let file = toml_file(
        r#"
[bridge]
basePackages = ["example.legacy"]
"#,
    );
    let from_file = TomlConfigProvider::new(file.path()).unwrap();
    let from_env = EnvironmentConfigProviderImpl::from_vars(
        "LEGACY",
        vec![("LEGACY_BRIDGE_BASEPACKAGES", "example.outside")],
    );
    let providers: [&dyn ConfigProvider; 2] = [&from_file, &from_env];
    let options = BridgeOptions::from_providers(&providers, DEFAULT_SECTION).unwrap();
    assert_eq!(options.base_packages, vec!["example.outside"]);

    let mut registry = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(Arc::new(LegacyComponentRegistrar::new(
            BridgeConfig::from_options(&options)
                .with_filter(Arc::new(StaticFieldFilter::fields(any_constant()))),
            world.universe.clone(),
            world.universe.clone(),
        )))
        .bootstrap(&mut registry)
        .unwrap();

    assert_eq!(registry.list_names(), vec!["outside"]);
}

#[test]
fn test_empty_configuration_scans_nothing() {
    let world = legacy_world();
    let file = toml_file("[other]\nvalue = 1\n");
    let provider = TomlConfigProvider::new(file.path()).unwrap();
    let options = BridgeOptions::from_provider(&provider, DEFAULT_SECTION).unwrap();
    assert!(options.base_packages.is_empty());

    let mut registry = DefaultComponentRegistry::new();
    let result = ContainerBootstrapper::new()
        .with_processor(Arc::new(LegacyComponentRegistrar::new(
            BridgeConfig::from_options(&options),
            world.universe.clone(),
            world.universe.clone(),
        )))
        .bootstrap(&mut registry);

    // 没有基础包时扫描失败，而不是静默地什么都不注册
    assert!(result.is_err());
    assert!(registry.is_empty());
}
