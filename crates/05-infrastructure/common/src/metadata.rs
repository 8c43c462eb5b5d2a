//! 元数据定义
//!
//! 提供类型扫描阶段使用的轻量元数据，读取元数据不会加载或初始化类型

use std::fmt;

/// 通用根类型名称，所有遗留类型都隐式继承自它
pub const ROOT_TYPE_NAME: &str = "Object";

/// 轻量类型元数据
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeMetadata {
    /// 完全限定名称，例如 `example.legacy.LegacyFactoryBean`
    pub name: String,
    /// 包名
    pub package: String,
    /// 是否为接口
    pub is_interface: bool,
    /// 是否为抽象类型
    pub is_abstract: bool,
    /// 是否可独立实例化（顶层类型或静态嵌套类型）
    pub is_independent: bool,
}

impl TypeMetadata {
    /// 从完全限定名称创建元数据，包名取最后一个 `.` 之前的部分
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let package = name
            .rsplit_once('.')
            .map(|(package, _)| package.to_string())
            .unwrap_or_default();
        Self {
            name,
            package,
            is_interface: false,
            is_abstract: false,
            is_independent: true,
        }
    }

    /// 标记为接口
    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self.is_abstract = true;
        self
    }

    /// 标记为抽象类型
    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    /// 标记为非独立类型（内部类）
    pub fn dependent(mut self) -> Self {
        self.is_independent = false;
        self
    }

    /// 获取简短的类型名称（不包含包名）
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// 检查类型是否位于指定包或其子包中
    pub fn is_in_package(&self, base_package: &str) -> bool {
        base_package.is_empty()
            || self.package == base_package
            || self
                .package
                .strip_prefix(base_package)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// 获取完全限定名称的简短部分
pub fn simple_name_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// 类型引用，携带超类型列表用于可赋值性检查
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// 被引用类型的完全限定名称
    pub name: String,
    /// 所有超类型（类和接口）的完全限定名称
    pub supertypes: Vec<String>,
}

impl TypeRef {
    /// 创建没有超类型的类型引用
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
        }
    }

    /// 添加超类型
    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// 该类型的值是否可以赋给 `target` 类型
    pub fn is_assignable_to(&self, target: &str) -> bool {
        target == ROOT_TYPE_NAME || self.name == target || self.supertypes.iter().any(|s| s == target)
    }
}

/// 字段类型或方法返回值类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 无返回值
    Void,
    /// 基本类型，例如 `int`
    Primitive(String),
    /// 数组
    Array(Box<ValueType>),
    /// 引用类型
    Reference(TypeRef),
}

impl ValueType {
    /// 创建引用类型
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(TypeRef::new(name))
    }

    /// 创建基本类型
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    /// 创建数组类型
    pub fn array_of(element: ValueType) -> Self {
        Self::Array(Box::new(element))
    }

    /// 是否可以作为组件类型（排除 void、基本类型和数组）
    pub fn is_component_type(&self) -> bool {
        matches!(self, Self::Reference(_))
    }

    /// 是否可以赋给 `target` 类型
    pub fn is_assignable_to(&self, target: &str) -> bool {
        match self {
            Self::Reference(type_ref) => type_ref.is_assignable_to(target),
            _ => false,
        }
    }

    /// 引用类型名称
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Reference(type_ref) => Some(&type_ref.name),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Primitive(name) => f.write_str(name),
            Self::Array(element) => write!(f, "{}[]", element),
            Self::Reference(type_ref) => f.write_str(&type_ref.name),
        }
    }
}
