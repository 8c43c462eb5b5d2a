//! 集成测试共用的遗留类型

#![allow(dead_code)]

use di_impl::InMemoryTypeUniverse;
use infrastructure_common::{Instance, LegacyType, MemberInfo, ValueType, Visibility};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

pub const LEGACY1: &str = "example.legacy.Legacy1";
pub const LEGACY_CLOCK: &str = "example.legacy.LegacyClock";
pub const LEGACY_SEQUENCE: &str = "example.legacy.LegacySequence";
pub const LEGACY_REGISTRY: &str = "example.legacy.LegacyRegistry";
pub const HIDDEN_SETTINGS: &str = "example.legacy.HiddenSettings";
pub const FAILING_HOLDER: &str = "example.legacy.FailingHolder";
pub const REPORT_FACTORY: &str = "example.legacy.ReportFactory";
pub const DAILY_REPORT: &str = "example.legacy.DailyReport";
pub const OUTSIDE: &str = "example.outside.Outside";

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统
pub fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 遗留单例的值
#[derive(Debug, PartialEq, Eq)]
pub struct LegacyValue(pub &'static str);

/// 原型产生的值
#[derive(Debug)]
pub struct Sequence(pub usize);

/// 统计遗留代码被调用的次数
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn record(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// 保存所有遗留单例的值，测试用它比较实例身份
pub struct LegacyWorld {
    pub universe: Arc<InMemoryTypeUniverse>,
    pub legacy1: Instance,
    pub registry_value: Instance,
    pub calls: Calls,
}

fn reference(name: &str) -> ValueType {
    ValueType::reference(name)
}

/// 构造遗留类型全集
///
/// - `Legacy1`：公开静态字段 `INSTANCE`
/// - `LegacyClock`：静态 `getInstance`
/// - `LegacySequence`：静态 `nextValue`，每次返回新值
/// - `LegacyRegistry`：包内可见的静态字段 `INSTANCE`，读取时需要强制访问
/// - `HiddenSettings`：只有私有静态字段
/// - `FailingHolder`：字段读取失败
/// - `ReportFactory`：工厂类型，实例方法 `getDailyReport`
pub fn legacy_world() -> LegacyWorld {
    let calls = Calls::default();
    let legacy1: Instance = Arc::new(LegacyValue("legacy1"));
    let registry_value: Instance = Arc::new(LegacyValue("registry"));

    let mut universe = InMemoryTypeUniverse::new();

    let value = legacy1.clone();
    let counter = calls.clone();
    universe.register_type(
        LegacyType::builder(LEGACY1)
            .static_field("INSTANCE", reference(LEGACY1), move || {
                counter.record();
                Ok(value.clone())
            })
            .build(),
    );

    let counter = calls.clone();
    universe.register_type(
        LegacyType::builder(LEGACY_CLOCK)
            .static_method("getInstance", reference(LEGACY_CLOCK), move || {
                counter.record();
                Ok(Arc::new(LegacyValue("clock")) as Instance)
            })
            .build(),
    );

    let counter = calls.clone();
    universe.register_type(
        LegacyType::builder(LEGACY_SEQUENCE)
            .static_method("nextValue", reference(LEGACY_SEQUENCE), move || {
                Ok(Arc::new(Sequence(counter.record())) as Instance)
            })
            .build(),
    );

    let value = registry_value.clone();
    universe.register_type(
        LegacyType::builder(LEGACY_REGISTRY)
            .member(
                MemberInfo::field("INSTANCE", reference(LEGACY_REGISTRY))
                    .static_member()
                    .with_visibility(Visibility::Package)
                    .with_static_accessor(move || Ok(value.clone())),
            )
            .build(),
    );

    universe.register_type(
        LegacyType::builder(HIDDEN_SETTINGS)
            .member(
                MemberInfo::field("INSTANCE", reference(HIDDEN_SETTINGS))
                    .static_member()
                    .with_visibility(Visibility::Private)
                    .with_static_accessor(|| Ok(Arc::new(LegacyValue("hidden")) as Instance)),
            )
            .build(),
    );

    universe.register_type(
        LegacyType::builder(FAILING_HOLDER)
            .static_field("INSTANCE", reference(FAILING_HOLDER), || {
                Err("静态初始化失败".into())
            })
            .build(),
    );

    let counter = calls.clone();
    universe.register_type(
        LegacyType::builder(REPORT_FACTORY)
            .static_method("getInstance", reference(REPORT_FACTORY), || {
                Ok(Arc::new(LegacyValue("factory")) as Instance)
            })
            .instance_method("getDailyReport", reference(DAILY_REPORT), move |_| {
                counter.record();
                Ok(Arc::new(LegacyValue("daily")) as Instance)
            })
            .build(),
    );
    universe.register_type(LegacyType::builder(DAILY_REPORT).build());

    universe.register_type(
        LegacyType::builder(OUTSIDE)
            .static_field("INSTANCE", reference(OUTSIDE), || {
                Ok(Arc::new(LegacyValue("outside")) as Instance)
            })
            .build(),
    );

    LegacyWorld {
        universe: Arc::new(universe),
        legacy1,
        registry_value,
        calls,
    }
}
