//! 成员谓词库
//!
//! 纯函数形式的成员判定条件，可以通过 [`MemberPredicate::and`] 组合。
//! 谓词按成员种类区分类型：字段谓词不能用于方法过滤器，反之亦然。

use infrastructure_common::{MemberInfo, MemberKind, ROOT_TYPE_NAME};
use regex::Regex;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 成员种类标记
pub trait AccessKind: Send + Sync + 'static {
    /// 对应的成员种类
    const KIND: MemberKind;
}

/// 字段种类标记
#[derive(Debug, Clone, Copy)]
pub enum FieldAccess {}

/// 方法种类标记
#[derive(Debug, Clone, Copy)]
pub enum MethodAccess {}

impl AccessKind for FieldAccess {
    const KIND: MemberKind = MemberKind::Field;
}

impl AccessKind for MethodAccess {
    const KIND: MemberKind = MemberKind::Method;
}

/// 成员谓词
pub struct MemberPredicate<K> {
    test: Arc<dyn Fn(&MemberInfo) -> bool + Send + Sync>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: AccessKind> MemberPredicate<K> {
    /// 从闭包创建谓词
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&MemberInfo) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
            _kind: PhantomData,
        }
    }

    /// 判定成员，种类不符的成员永远不匹配
    pub fn test(&self, member: &MemberInfo) -> bool {
        member.kind == K::KIND && (self.test)(member)
    }

    /// 逻辑与组合
    pub fn and(self, other: MemberPredicate<K>) -> Self {
        let (left, right) = (self.test, other.test);
        Self::new(move |member| left(member) && right(member))
    }
}

impl<K> Clone for MemberPredicate<K> {
    fn clone(&self) -> Self {
        Self {
            test: self.test.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for MemberPredicate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberPredicate")
            .field("kind", &std::any::type_name::<K>())
            .finish()
    }
}

/// 接受任意成员
pub fn all<K: AccessKind>() -> MemberPredicate<K> {
    MemberPredicate::new(|_| true)
}

/// 静态成员
pub fn at_class<K: AccessKind>() -> MemberPredicate<K> {
    MemberPredicate::new(MemberInfo::is_static)
}

/// 实例成员
pub fn at_instance<K: AccessKind>() -> MemberPredicate<K> {
    MemberPredicate::new(|member| !member.is_static())
}

/// 可见（非私有）成员
pub fn visible<K: AccessKind>() -> MemberPredicate<K> {
    MemberPredicate::new(MemberInfo::is_visible)
}

/// 名称属于给定集合的成员
pub fn named<K, I, S>(names: I) -> MemberPredicate<K>
where
    K: AccessKind,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    MemberPredicate::new(move |member| names.iter().any(|name| *name == member.name))
}

/// 名称完整匹配正则表达式的成员
pub fn named_pattern<K: AccessKind>(pattern: Regex) -> MemberPredicate<K> {
    let anchored = Regex::new(&format!("^(?:{})$", pattern.as_str())).unwrap_or(pattern);
    MemberPredicate::new(move |member| anchored.is_match(&member.name))
}

/// 从模式字符串创建名称谓词
pub fn named_matching<K: AccessKind>(pattern: &str) -> Result<MemberPredicate<K>, regex::Error> {
    Ok(named_pattern(Regex::new(pattern)?))
}

/// 字段类型为指定类型或其子类型
pub fn with_type(type_name: impl Into<String>) -> MemberPredicate<FieldAccess> {
    let type_name = type_name.into();
    MemberPredicate::new(move |field| field.value_type.is_assignable_to(&type_name))
}

/// 字段类型可以作为组件，排除 void、基本类型和数组
pub fn with_bean_type() -> MemberPredicate<FieldAccess> {
    MemberPredicate::new(|field| field.value_type.is_component_type())
}

/// 方法返回指定类型或其子类型
pub fn returning(type_name: impl Into<String>) -> MemberPredicate<MethodAccess> {
    let type_name = type_name.into();
    MemberPredicate::new(move |method| method.value_type.is_assignable_to(&type_name))
}

/// 方法返回类型可以作为组件，排除 void、基本类型和数组
pub fn returning_bean_type() -> MemberPredicate<MethodAccess> {
    MemberPredicate::new(|method| method.value_type.is_component_type())
}

/// 无参方法
pub fn without_parameters() -> MemberPredicate<MethodAccess> {
    MemberPredicate::new(|method| method.parameter_count == 0)
}

/// 排除根类型声明的方法
pub fn no_root_object_member() -> MemberPredicate<MethodAccess> {
    MemberPredicate::new(|method| method.declaring_type != ROOT_TYPE_NAME)
}

/// 任意 getter 方法，名称为 `get` 后跟大写字母和至少一个字符
pub fn any_getter() -> MemberPredicate<MethodAccess> {
    MemberPredicate::new(|method| is_getter_name(&method.name))
}

/// 任意常量风格的字段，名称由大写字母、数字和下划线组成且以大写字母开头
pub fn any_constant() -> MemberPredicate<FieldAccess> {
    MemberPredicate::new(|field| is_constant_name(&field.name))
}

fn is_getter_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("get") else {
        return false;
    };
    let mut chars = rest.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.next().is_some()
}

fn is_constant_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && name.len() > 1
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
