//! 遗留代码访问容器组件的句柄
//!
//! 句柄在构造时显式传递给遗留代码，容器启动完成后通过 [`LegacyAccess::install`]
//! 安装一次解析器。安装之前的直接访问会失败，延迟访问会在首次使用时解析。

use di_abstractions::ComponentResolver;
use infrastructure_common::{DependencyError, Instance};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// 访问错误
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("容器尚未启动完成，无法获取组件: {name}")]
    NotAvailable { name: String },

    #[error("容器解析器已经安装")]
    AlreadyInstalled,

    #[error("组件类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("组件解析失败: {source}")]
    Resolution {
        #[from]
        source: DependencyError,
    },
}

/// 遗留代码访问句柄
///
/// 克隆的句柄共享同一个解析器
#[derive(Clone, Default)]
pub struct LegacyAccess {
    resolver: Arc<OnceCell<Arc<dyn ComponentResolver>>>,
}

impl LegacyAccess {
    /// 创建尚未安装解析器的句柄
    pub fn new() -> Self {
        Self::default()
    }

    /// 安装解析器，只能成功一次
    pub fn install(&self, resolver: Arc<dyn ComponentResolver>) -> Result<(), AccessError> {
        self.resolver.set(resolver).map_err(|_| {
            warn!("容器解析器已经安装，拒绝重复安装");
            AccessError::AlreadyInstalled
        })?;
        debug!("容器解析器安装完成");
        Ok(())
    }

    /// 解析器是否已经安装
    pub fn is_available(&self) -> bool {
        self.resolver.get().is_some()
    }

    /// 按名称获取组件
    pub fn get_instance(&self, name: &str) -> Result<Instance, AccessError> {
        let resolver = self.resolver.get().ok_or_else(|| AccessError::NotAvailable {
            name: name.to_string(),
        })?;
        Ok(resolver.resolve_by_name(name)?)
    }

    /// 按名称获取组件并转换为具体类型
    pub fn get_typed<T>(&self, name: &str) -> Result<Arc<T>, AccessError>
    where
        T: Any + Send + Sync,
    {
        downcast(name, self.get_instance(name)?)
    }

    /// 创建延迟访问的组件，首次调用 [`DeferredComponent::get`] 时才解析
    pub fn deferred(&self, name: impl Into<String>) -> DeferredComponent {
        DeferredComponent {
            access: self.clone(),
            name: name.into(),
            target: OnceCell::new(),
        }
    }
}

impl fmt::Debug for LegacyAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyAccess")
            .field("available", &self.is_available())
            .finish()
    }
}

/// 延迟访问的组件
///
/// 解析成功后缓存结果，解析失败不缓存
pub struct DeferredComponent {
    access: LegacyAccess,
    name: String,
    target: OnceCell<Instance>,
}

impl DeferredComponent {
    /// 组件名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否已经解析
    pub fn is_resolved(&self) -> bool {
        self.target.get().is_some()
    }

    /// 获取组件
    pub fn get(&self) -> Result<Instance, AccessError> {
        self.target
            .get_or_try_init(|| self.access.get_instance(&self.name))
            .cloned()
    }

    /// 获取组件并转换为具体类型
    pub fn get_typed<T>(&self) -> Result<Arc<T>, AccessError>
    where
        T: Any + Send + Sync,
    {
        downcast(&self.name, self.get()?)
    }
}

impl fmt::Debug for DeferredComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredComponent")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

fn downcast<T>(name: &str, instance: Instance) -> Result<Arc<T>, AccessError>
where
    T: Any + Send + Sync,
{
    instance
        .downcast::<T>()
        .map_err(|_| AccessError::TypeMismatch {
            name: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
        })
}
