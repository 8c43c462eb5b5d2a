//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },
}

/// 类型解析错误（软失败）
///
/// 扫描和过滤时出现的此类错误会被吸收为"不匹配"，扫描继续进行。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("类型不存在: {type_name}")]
    TypeNotFound { type_name: String },

    #[error("类型加载失败: {type_name}, 原因: {reason}")]
    LinkageFailed { type_name: String, reason: String },
}

impl ResolutionError {
    /// 无法解析的类型名称
    pub fn type_name(&self) -> &str {
        match self {
            Self::TypeNotFound { type_name } | Self::LinkageFailed { type_name, .. } => type_name,
        }
    }
}

/// 组件注册错误类型
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("组件名称已注册: {name}")]
    DuplicateName { name: String },

    #[error("缺少工厂组件声明: {type_name}, 原因: {reason}")]
    MissingFactoryDeclaration { type_name: String, reason: String },

    #[error("生命周期阶段重复调用: {phase}, 注册表: {registry}")]
    DuplicateInvocation { phase: String, registry: String },

    #[error("组件扫描失败: {message}")]
    ScanError { message: String },
}

impl RegistrationError {
    /// 创建缺少工厂声明错误
    pub fn missing_factory(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingFactoryDeclaration {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型（组件构造阶段）
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {name}")]
    ComponentNotRegistered { name: String },

    #[error("组件创建失败: {name}, 原因: {source}")]
    ComponentCreationFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("无法访问成员: {member}, 原因: {source}")]
    MemberAccessFailed {
        member: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("组件缺少实例化策略: {name}")]
    NoInstantiationStrategy { name: String },

    #[error("组件类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("组件注册错误: {source}")]
    RegistrationError {
        #[from]
        source: RegistrationError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },
}
