//! 测试用的遗留类型

use di_impl::InMemoryTypeUniverse;
use infrastructure_common::{
    Instance, LegacyType, MemberInfo, TypeMetadata, ValueType, Visibility,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

pub const FIELD_SINGLETON: &str = "example.legacy.LegacySingletonByField";
pub const METHOD_SINGLETON: &str = "example.legacy.LegacySingletonByMethod";
pub const STATIC_PROTOTYPE: &str = "example.legacy.LegacyPrototypeByStaticMethod";
pub const TWO_ACCESSORS: &str = "example.legacy.TwoAccessors";
pub const NON_SINGLETON: &str = "example.legacy.NonSingletonBean";
pub const FACTORY: &str = "example.legacy.LegacyFactoryBean";
pub const CREATED_SINGLETON: &str = "example.legacy.CreatedSingleton";
pub const CREATED_PROTOTYPE: &str = "example.legacy.CreatedPrototype";
pub const BROKEN: &str = "example.legacy.Broken";

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 带标签的测试实例
#[derive(Debug, PartialEq, Eq)]
pub struct Tagged(pub String);

pub fn tagged(tag: &str) -> Instance {
    Arc::new(Tagged(tag.to_string()))
}

/// 记录访问器调用次数
#[derive(Debug, Clone, Default)]
pub struct Probe(Arc<AtomicUsize>);

impl Probe {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn reference(name: &str) -> ValueType {
    ValueType::reference(name)
}

/// 静态字段 `INSTANCE`
pub fn field_singleton(probe: &Probe) -> LegacyType {
    let probe = probe.clone();
    let value = tagged("field");
    LegacyType::builder(FIELD_SINGLETON)
        .static_field("INSTANCE", reference(FIELD_SINGLETON), move || {
            probe.hit();
            Ok(value.clone())
        })
        .build()
}

/// 私有静态字段加公开的 `getInstance`
pub fn method_singleton(probe: &Probe) -> LegacyType {
    let probe = probe.clone();
    let value = tagged("method");
    LegacyType::builder(METHOD_SINGLETON)
        .member(
            MemberInfo::field("instance", reference(METHOD_SINGLETON))
                .static_member()
                .with_visibility(Visibility::Private),
        )
        .static_method("getInstance", reference(METHOD_SINGLETON), move || {
            probe.hit();
            Ok(value.clone())
        })
        .build()
}

/// 每次调用 `createInstance` 都返回新实例
pub fn static_prototype(probe: &Probe) -> LegacyType {
    let probe = probe.clone();
    LegacyType::builder(STATIC_PROTOTYPE)
        .static_method("createInstance", reference(STATIC_PROTOTYPE), move || {
            probe.hit();
            Ok(tagged("prototype"))
        })
        .build()
}

/// 两个都满足条件的静态方法，`getInstance` 在前
pub fn two_accessors() -> LegacyType {
    LegacyType::builder(TWO_ACCESSORS)
        .static_method("getInstance", reference(TWO_ACCESSORS), || Ok(tagged("getInstance")))
        .static_method("getSingleton", reference(TWO_ACCESSORS), || Ok(tagged("getSingleton")))
        .build()
}

/// 静态 getter 返回其他类型，不能作为组件
pub fn non_singleton() -> LegacyType {
    LegacyType::builder(NON_SINGLETON)
        .member(
            MemberInfo::field("props", reference("java.util.Properties"))
                .static_member()
                .with_visibility(Visibility::Private),
        )
        .static_method("getProps", reference("java.util.Properties"), || {
            Ok(tagged("props"))
        })
        .build()
}

/// 工厂类型：静态 `getInstance`，实例方法 `getSingleton` 和 `createPrototype`
pub fn factory(probe: &Probe) -> LegacyType {
    let instance = tagged("factory");
    let singleton_probe = probe.clone();
    let prototype_probe = probe.clone();
    LegacyType::builder(FACTORY)
        .member(
            MemberInfo::field("INSTANCE", reference(FACTORY))
                .static_member()
                .with_visibility(Visibility::Private),
        )
        .static_method("getInstance", reference(FACTORY), move || Ok(instance.clone()))
        .instance_method("getSingleton", reference(CREATED_SINGLETON), move |_| {
            singleton_probe.hit();
            Ok(tagged("created singleton"))
        })
        .instance_method("createPrototype", reference(CREATED_PROTOTYPE), move |_| {
            prototype_probe.hit();
            Ok(tagged("created prototype"))
        })
        .member(
            MemberInfo::method("configure", ValueType::Void)
                .with_instance_accessor(|this| Ok(this.clone())),
        )
        .member(
            MemberInfo::method("createWith", reference(CREATED_PROTOTYPE))
                .with_parameters(1),
        )
        .build()
}

/// 包含全部测试类型的类型全集
pub fn legacy_universe(probe: &Probe) -> Arc<InMemoryTypeUniverse> {
    let mut universe = InMemoryTypeUniverse::new();
    universe
        .register_type(field_singleton(probe))
        .register_type(method_singleton(probe))
        .register_type(static_prototype(probe))
        .register_type(two_accessors())
        .register_type(non_singleton())
        .register_type(factory(probe))
        .register_type(LegacyType::builder(CREATED_SINGLETON).build())
        .register_type(LegacyType::builder(CREATED_PROTOTYPE).build())
        .register_unresolvable(TypeMetadata::new(BROKEN), "缺少依赖类 example.missing.Dependency");
    Arc::new(universe)
}
