//! 组件名称生成器

use di_abstractions::{ComponentRegistry, NameGenerator};
use infrastructure_common::{simple_name_of, InstantiationStrategy, RegistrationDescriptor};

/// 没有组件类型时使用的名称后缀
const FACTORY_PRODUCT_SUFFIX: &str = "$created";

/// 名称编号分隔符
const GENERATED_NAME_SEPARATOR: char = '#';

/// 简单名称生成器
///
/// 使用首字母小写的简单类型名称，例如 `example.legacy.LegacyFactoryBean` 生成
/// `legacyFactoryBean`。以连续大写字母开头的名称保持不变，例如 `URLHolder`。
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNameGenerator;

impl NameGenerator for SimpleNameGenerator {
    fn generate(&self, descriptor: &RegistrationDescriptor, _registry: &dyn ComponentRegistry) -> String {
        match descriptor.owner_type_name() {
            Some(owner_type) => decapitalize(simple_name_of(owner_type)),
            None => fallback_name(descriptor),
        }
    }
}

/// 完全限定名称生成器
///
/// 使用完全限定类型名称加上 `#n` 编号，编号从 0 开始，取注册表中第一个未被占用的值
#[derive(Debug, Clone, Copy, Default)]
pub struct QualifiedNameGenerator;

impl NameGenerator for QualifiedNameGenerator {
    fn generate(&self, descriptor: &RegistrationDescriptor, registry: &dyn ComponentRegistry) -> String {
        let base = descriptor
            .owner_type_name()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(descriptor));

        let mut counter = 0;
        loop {
            let candidate = format!("{}{}{}", base, GENERATED_NAME_SEPARATOR, counter);
            if !registry.contains(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// 首字母小写，前两个字符都是大写时保持不变
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => first.to_lowercase().chain(name.chars().skip(1)).collect(),
        (None, _) => String::new(),
    }
}

fn fallback_name(descriptor: &RegistrationDescriptor) -> String {
    match &descriptor.strategy {
        InstantiationStrategy::InvokeFactoryMethod { factory, .. } => {
            format!("{}{}", factory, FACTORY_PRODUCT_SUFFIX)
        }
        _ => format!("component{}", FACTORY_PRODUCT_SUFFIX),
    }
}
