//! 遗留类型的反射模型
//!
//! Rust 没有运行时反射，遗留类型通过显式的成员列表描述。每个成员携带一个访问器，
//! 访问器只会在组件构造时被调用，发现和过滤阶段只读取成员的元数据。

use crate::metadata::{TypeMetadata, TypeRef, ValueType, ROOT_TYPE_NAME};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 访问器返回的错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 静态访问器（读取静态字段或调用静态无参方法）
pub type StaticAccessor = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// 实例访问器（在接收者上调用无参实例方法）
pub type InstanceAccessor = Arc<dyn Fn(&Instance) -> Result<Instance, BoxError> + Send + Sync>;

/// 成员种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("field"),
            Self::Method => f.write_str("method"),
        }
    }
}

/// 成员可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    /// 包内可见
    Package,
    Private,
}

/// 成员修饰符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// 是否为静态成员
    pub is_static: bool,
    /// 可见性
    pub visibility: Visibility,
}

/// 成员访问方式
///
/// 非公开成员只能以 [`AccessMode::Forced`] 读取或调用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// 按可见性正常访问
    Normal,
    /// 强制打开非公开成员
    Forced,
}

/// 成员访问器
#[derive(Clone)]
pub enum MemberAccessor {
    Static(StaticAccessor),
    Instance(InstanceAccessor),
    /// 带参数的方法或没有提供访问器的成员
    Unavailable,
}

impl fmt::Debug for MemberAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(<function>)"),
            Self::Instance(_) => f.write_str("Instance(<function>)"),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// 字段或方法成员
#[derive(Debug, Clone)]
pub struct MemberInfo {
    /// 成员名称
    pub name: String,
    /// 成员种类
    pub kind: MemberKind,
    /// 声明该成员的类型
    pub declaring_type: String,
    /// 修饰符
    pub modifiers: Modifiers,
    /// 参数数量，字段恒为 0
    pub parameter_count: usize,
    /// 字段类型或方法返回值类型
    pub value_type: ValueType,
    accessor: MemberAccessor,
}

impl MemberInfo {
    fn new(kind: MemberKind, name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            kind,
            declaring_type: String::new(),
            modifiers: Modifiers::default(),
            parameter_count: 0,
            value_type,
            accessor: MemberAccessor::Unavailable,
        }
    }

    /// 创建字段成员
    pub fn field(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::new(MemberKind::Field, name, value_type)
    }

    /// 创建方法成员
    pub fn method(name: impl Into<String>, return_type: ValueType) -> Self {
        Self::new(MemberKind::Method, name, return_type)
    }

    /// 设置声明类型
    pub fn declared_by(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = declaring_type.into();
        self
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.modifiers.visibility = visibility;
        self
    }

    /// 设置参数数量
    pub fn with_parameters(mut self, parameter_count: usize) -> Self {
        self.parameter_count = parameter_count;
        self
    }

    /// 设置静态访问器，同时标记为静态成员
    pub fn with_static_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn() -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.modifiers.is_static = true;
        self.accessor = MemberAccessor::Static(Arc::new(accessor));
        self
    }

    /// 设置实例访问器，同时标记为实例成员
    pub fn with_instance_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&Instance) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.modifiers.is_static = false;
        self.accessor = MemberAccessor::Instance(Arc::new(accessor));
        self
    }

    /// 标记为静态成员（不提供访问器）
    pub fn static_member(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// 是否为静态成员
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    /// 是否可见（非私有）
    pub fn is_visible(&self) -> bool {
        self.modifiers.visibility != Visibility::Private
    }

    /// 是否可以不经强制访问直接使用
    pub fn is_public(&self) -> bool {
        self.modifiers.visibility == Visibility::Public
    }

    /// 成员标识，用于诊断信息，例如 `example.Legacy1.INSTANCE` 或 `example.Legacy1.getInstance()`
    pub fn identity(&self) -> String {
        match self.kind {
            MemberKind::Field => format!("{}.{}", self.declaring_type, self.name),
            MemberKind::Method => format!("{}.{}()", self.declaring_type, self.name),
        }
    }

    /// 检查访问方式是否允许访问该成员
    fn check_access(&self, mode: AccessMode) -> Result<(), BoxError> {
        if mode == AccessMode::Normal && !self.is_public() {
            return Err(format!(
                "{} 不可访问 ({:?})，需要强制访问",
                self.identity(),
                self.modifiers.visibility
            )
            .into());
        }
        Ok(())
    }

    /// 读取静态字段或调用静态无参方法
    pub fn read_static(&self, mode: AccessMode) -> Result<Instance, BoxError> {
        self.check_access(mode)?;
        match &self.accessor {
            MemberAccessor::Static(accessor) => accessor(),
            MemberAccessor::Instance(_) => {
                Err(format!("{} 不是静态成员", self.identity()).into())
            }
            MemberAccessor::Unavailable => {
                Err(format!("{} 没有可用的访问器", self.identity()).into())
            }
        }
    }

    /// 在接收者上调用无参实例方法
    pub fn invoke_on(&self, target: &Instance, mode: AccessMode) -> Result<Instance, BoxError> {
        self.check_access(mode)?;
        match &self.accessor {
            MemberAccessor::Instance(accessor) => accessor(target),
            MemberAccessor::Static(_) => Err(format!("{} 不是实例成员", self.identity()).into()),
            MemberAccessor::Unavailable => {
                Err(format!("{} 没有可用的访问器", self.identity()).into())
            }
        }
    }
}

impl PartialEq for MemberInfo {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.declaring_type == other.declaring_type
            && self.parameter_count == other.parameter_count
    }
}

impl Eq for MemberInfo {}

impl fmt::Display for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

/// 已加载的遗留类型
#[derive(Debug, Clone)]
pub struct LegacyType {
    /// 类型元数据
    pub metadata: TypeMetadata,
    /// 超类型的完全限定名称
    pub supertypes: Vec<String>,
    /// 成员列表，顺序即声明顺序（继承的成员排在最后）
    members: Vec<MemberInfo>,
}

impl LegacyType {
    /// 创建类型构建器
    pub fn builder(name: impl Into<String>) -> LegacyTypeBuilder {
        LegacyTypeBuilder::new(TypeMetadata::new(name))
    }

    /// 从已有元数据创建类型构建器
    pub fn builder_for(metadata: TypeMetadata) -> LegacyTypeBuilder {
        LegacyTypeBuilder::new(metadata)
    }

    /// 完全限定名称
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// 以类型引用的形式表示自身
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef {
            name: self.metadata.name.clone(),
            supertypes: self.supertypes.clone(),
        }
    }

    /// 全部成员，按声明顺序排列
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// 该类型自身声明的指定种类的成员
    pub fn declared_members(&self, kind: MemberKind) -> impl Iterator<Item = &MemberInfo> {
        self.members
            .iter()
            .filter(move |member| member.kind == kind && member.declaring_type == self.metadata.name)
    }

    /// 指定种类的全部成员，包括继承的成员
    pub fn all_members(&self, kind: MemberKind) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(move |member| member.kind == kind)
    }

    /// 按名称查找成员
    pub fn member(&self, kind: MemberKind, name: &str) -> Option<&MemberInfo> {
        self.all_members(kind).find(|member| member.name == name)
    }
}

/// 遗留类型构建器
pub struct LegacyTypeBuilder {
    metadata: TypeMetadata,
    supertypes: Vec<String>,
    members: Vec<MemberInfo>,
    inherited: Vec<MemberInfo>,
}

impl LegacyTypeBuilder {
    fn new(metadata: TypeMetadata) -> Self {
        Self {
            metadata,
            supertypes: Vec::new(),
            members: Vec::new(),
            inherited: Vec::new(),
        }
    }

    /// 标记为接口
    pub fn interface(mut self) -> Self {
        self.metadata = self.metadata.interface();
        self
    }

    /// 添加超类型
    pub fn supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// 添加自身声明的成员，未设置声明类型时使用当前类型
    pub fn member(mut self, member: MemberInfo) -> Self {
        let member = if member.declaring_type.is_empty() {
            member.declared_by(self.metadata.name.clone())
        } else {
            member
        };
        self.members.push(member);
        self
    }

    /// 添加从超类型继承的成员
    pub fn inherited(mut self, member: MemberInfo) -> Self {
        self.inherited.push(member);
        self
    }

    /// 添加公开的静态字段
    pub fn static_field<F>(self, name: &str, value_type: ValueType, accessor: F) -> Self
    where
        F: Fn() -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.member(MemberInfo::field(name, value_type).with_static_accessor(accessor))
    }

    /// 添加公开的静态无参方法
    pub fn static_method<F>(self, name: &str, return_type: ValueType, accessor: F) -> Self
    where
        F: Fn() -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.member(MemberInfo::method(name, return_type).with_static_accessor(accessor))
    }

    /// 添加公开的无参实例方法
    pub fn instance_method<F>(self, name: &str, return_type: ValueType, accessor: F) -> Self
    where
        F: Fn(&Instance) -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.member(MemberInfo::method(name, return_type).with_instance_accessor(accessor))
    }

    /// 构建类型，非接口类型会追加根类型的实例方法
    pub fn build(self) -> LegacyType {
        let mut members = self.members;
        members.extend(self.inherited);
        if !self.metadata.is_interface {
            members.extend(root_type_methods(&self.metadata.name));
        }
        LegacyType {
            metadata: self.metadata,
            supertypes: self.supertypes,
            members,
        }
    }
}

/// 根类型声明的实例方法
fn root_type_methods(owner: &str) -> Vec<MemberInfo> {
    let owner_name = owner.to_string();
    vec![
        MemberInfo::method("toString", ValueType::reference("String"))
            .declared_by(ROOT_TYPE_NAME)
            .with_instance_accessor(|this| {
                Ok(Arc::new(format!("{:p}", Arc::as_ptr(this))) as Instance)
            }),
        MemberInfo::method("hashCode", ValueType::primitive("int"))
            .declared_by(ROOT_TYPE_NAME)
            .with_instance_accessor(|this| {
                Ok(Arc::new(Arc::as_ptr(this) as *const () as usize) as Instance)
            }),
        MemberInfo::method("getClass", ValueType::reference("Class"))
            .declared_by(ROOT_TYPE_NAME)
            .with_instance_accessor(move |_| Ok(Arc::new(owner_name.clone()) as Instance)),
    ]
}
