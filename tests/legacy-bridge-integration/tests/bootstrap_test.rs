//! 遗留组件桥接的端到端测试：扫描、注册、容器启动、遗留代码访问

mod common;

use common::*;
use di_abstractions::{ComponentRegistry, ComponentResolver, ComponentResolverExt};
use di_impl::{ContainerBootstrapper, DefaultComponentRegistry};
use infrastructure_common::{
    ComponentScope, DependencyError, InfrastructureError, Instance, InstantiationStrategy,
    RegistrationDescriptor, RegistrationError,
};
use legacy_bridge::predicates::{all, named};
use legacy_bridge::{
    BridgeConfig, FactoryMethodScanner, LegacyAccess, LegacyComponentRegistrar,
    MissingFactoryPolicy, StaticFieldFilter, StaticMethodFilter,
};
use std::sync::Arc;

fn field_bridge(world: &LegacyWorld) -> Arc<LegacyComponentRegistrar> {
    let config = BridgeConfig::new(["example.legacy"])
        .with_filter(Arc::new(StaticFieldFilter::fields(all())));
    Arc::new(LegacyComponentRegistrar::new(
        config,
        world.universe.clone(),
        world.universe.clone(),
    ))
}

fn method_bridge(world: &LegacyWorld) -> BridgeConfig {
    BridgeConfig::new(["example.legacy"])
        .with_filter(Arc::new(StaticMethodFilter::singletons(named(["getInstance"]))))
        .with_filter(Arc::new(StaticMethodFilter::prototypes(named(["nextValue"]))))
        .with_factory(Arc::new(FactoryMethodScanner::new(
            world.universe.clone(),
            REPORT_FACTORY,
            all(),
        )))
}

fn registrar(world: &LegacyWorld, config: BridgeConfig) -> Arc<LegacyComponentRegistrar> {
    Arc::new(LegacyComponentRegistrar::new(
        config,
        world.universe.clone(),
        world.universe.clone(),
    ))
}

#[test]
fn test_static_field_singleton_end_to_end() {
    init_test_logger();
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();

    let report = ContainerBootstrapper::new()
        .with_processor(field_bridge(&world))
        .bootstrap(&mut registry)
        .unwrap();

    // 私有字段和包外类型不会被注册
    assert_eq!(report.registered, vec!["legacy1", "legacyRegistry", "failingHolder"]);

    let descriptor = registry.get("legacy1").unwrap();
    assert_eq!(descriptor.owner_type.as_deref(), Some(LEGACY1));
    assert_eq!(descriptor.scope, ComponentScope::Singleton);
    assert!(descriptor.lazy);
    match &descriptor.strategy {
        InstantiationStrategy::ReadStaticField(member) => {
            assert_eq!(member.identity(), "example.legacy.Legacy1.INSTANCE");
        }
        other => panic!("应该读取静态字段: {:?}", other),
    }

    // 延迟单例在启动阶段不会被读取
    assert_eq!(world.calls.count(), 0);
    assert!(registry.instantiated_singletons().is_empty());

    let first = registry.resolve_by_name("legacy1").unwrap();
    let second = registry.resolve_by_name("legacy1").unwrap();
    assert!(Arc::ptr_eq(&first, &world.legacy1));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(world.calls.count(), 1);
}

#[test]
fn test_non_public_member_is_forced_open() {
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(field_bridge(&world))
        .bootstrap(&mut registry)
        .unwrap();

    let value = registry.resolve_by_name("legacyRegistry").unwrap();

    assert!(Arc::ptr_eq(&value, &world.registry_value));
}

#[test]
fn test_member_failure_names_the_member() {
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(field_bridge(&world))
        .bootstrap(&mut registry)
        .unwrap();

    match registry.resolve_by_name("failingHolder") {
        Err(DependencyError::MemberAccessFailed { member, .. }) => {
            assert_eq!(member, "example.legacy.FailingHolder.INSTANCE");
        }
        other => panic!("应该报告成员访问失败: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_factory_only_host() {
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();

    let report = ContainerBootstrapper::new()
        .with_processor(registrar(&world, method_bridge(&world)))
        .with_registry_phase(false)
        .bootstrap(&mut registry)
        .unwrap();

    assert_eq!(
        report.registered,
        vec!["legacyClock", "legacySequence", "reportFactory", "dailyReport"]
    );

    let daily = registry.get("dailyReport").unwrap();
    assert_eq!(daily.depends_on.as_deref(), Some("reportFactory"));
    assert!(!daily.lazy);
    // 工厂产物是非延迟单例，启动时已经通过工厂实例创建
    assert_eq!(world.calls.count(), 1);
    assert_eq!(
        registry.instantiated_singletons(),
        vec!["reportFactory", "dailyReport"]
    );

    let report_value = registry.resolve_typed::<LegacyValue>("dailyReport").unwrap();
    assert_eq!(*report_value, LegacyValue("daily"));
    assert_eq!(world.calls.count(), 1);
}

#[test]
fn test_factory_only_host_matches_full_lifecycle() {
    let world = legacy_world();

    let mut full = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(registrar(&world, method_bridge(&world)))
        .with_eager_singletons(false)
        .bootstrap(&mut full)
        .unwrap();

    let mut factory_only = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(registrar(&world, method_bridge(&world)))
        .with_registry_phase(false)
        .with_eager_singletons(false)
        .bootstrap(&mut factory_only)
        .unwrap();

    assert_eq!(factory_only.list_names(), full.list_names());
    for name in full.list_names() {
        assert_eq!(factory_only.get(&name), full.get(&name));
    }
}

#[test]
fn test_prototype_method_creates_new_instances() {
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(registrar(&world, method_bridge(&world)))
        .bootstrap(&mut registry)
        .unwrap();

    let descriptor = registry.get("legacySequence").unwrap();
    assert_eq!(descriptor.scope, ComponentScope::Prototype);
    assert!(!descriptor.lazy);

    let first = registry.resolve_typed::<Sequence>("legacySequence").unwrap();
    let second = registry.resolve_typed::<Sequence>("legacySequence").unwrap();
    assert!(second.0 > first.0);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_bridges_run_in_order() {
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();

    let report = ContainerBootstrapper::new()
        .with_processor(registrar(
            &world,
            BridgeConfig::new(["example.legacy"])
                .with_filter(Arc::new(StaticFieldFilter::fields(named(["INSTANCE"]))))
                .with_order(10),
        ))
        .with_processor(registrar(
            &world,
            BridgeConfig::new(["example.legacy"])
                .with_filter(Arc::new(StaticMethodFilter::singletons(named(["getInstance"]))))
                .with_order(1),
        ))
        .bootstrap(&mut registry)
        .unwrap();

    assert_eq!(
        report.registered,
        vec![
            "legacyClock",
            "reportFactory",
            "legacy1",
            "legacyRegistry",
            "failingHolder",
        ]
    );
}

#[test]
fn test_existing_component_wins() {
    let world = legacy_world();
    let mut registry = DefaultComponentRegistry::new();
    let replacement: Instance = Arc::new(LegacyValue("replacement"));
    let supplied = replacement.clone();
    registry
        .insert(
            "legacy1",
            RegistrationDescriptor::with_supplier(LEGACY1, move || Ok(supplied.clone())),
        )
        .unwrap();

    let report = ContainerBootstrapper::new()
        .with_processor(field_bridge(&world))
        .bootstrap(&mut registry)
        .unwrap();

    assert_eq!(report.skipped, vec!["legacy1"]);
    let value = registry.resolve_by_name("legacy1").unwrap();
    assert!(Arc::ptr_eq(&value, &replacement));
    assert_eq!(world.calls.count(), 0);
}

#[test]
fn test_second_bootstrap_of_same_registry_fails() {
    let world = legacy_world();
    let bootstrapper = ContainerBootstrapper::new().with_processor(field_bridge(&world));
    let mut registry = DefaultComponentRegistry::new();
    bootstrapper.bootstrap(&mut registry).unwrap();

    let again = bootstrapper.bootstrap(&mut registry);

    assert!(matches!(
        again,
        Err(InfrastructureError::RegistrationError {
            source: RegistrationError::DuplicateInvocation { .. }
        })
    ));

    // 同一个注册器处理新的注册表不受影响
    let mut fresh = DefaultComponentRegistry::new();
    bootstrapper.bootstrap(&mut fresh).unwrap();
    assert_eq!(fresh.list_names(), registry.list_names());
}

#[test]
fn test_missing_factory_aborts_unless_skipped() {
    let world = legacy_world();
    let config = || {
        BridgeConfig::new(["example.legacy"])
            .with_filter(Arc::new(StaticFieldFilter::fields(all())))
            .with_factory(Arc::new(FactoryMethodScanner::new(
                world.universe.clone(),
                REPORT_FACTORY,
                all(),
            )))
    };

    let mut registry = DefaultComponentRegistry::new();
    let result = ContainerBootstrapper::new()
        .with_processor(registrar(&world, config()))
        .bootstrap(&mut registry);
    assert!(matches!(
        result,
        Err(InfrastructureError::RegistrationError {
            source: RegistrationError::MissingFactoryDeclaration { .. }
        })
    ));

    let mut registry = DefaultComponentRegistry::new();
    let report = ContainerBootstrapper::new()
        .with_processor(registrar(
            &world,
            config().with_missing_factory_policy(MissingFactoryPolicy::Skip),
        ))
        .bootstrap(&mut registry)
        .unwrap();
    assert!(!report.registered.contains(&"dailyReport".to_string()));
}

#[test]
fn test_legacy_code_reaches_components_after_bootstrap() {
    let world = legacy_world();
    let access = LegacyAccess::new();

    // 遗留代码在容器启动前拿到的延迟组件
    let deferred = access.deferred("legacy1");
    assert!(access.get_instance("legacy1").is_err());

    let mut registry = DefaultComponentRegistry::new();
    ContainerBootstrapper::new()
        .with_processor(field_bridge(&world))
        .bootstrap(&mut registry)
        .unwrap();
    let registry = Arc::new(registry);
    access.install(registry.clone()).unwrap();

    let value = deferred.get().unwrap();
    assert!(Arc::ptr_eq(&value, &world.legacy1));
    assert_eq!(*access.get_typed::<LegacyValue>("legacy1").unwrap(), LegacyValue("legacy1"));
    assert_eq!(world.calls.count(), 1);
}
