//! 组件注册表抽象接口

use infrastructure_common::{RegistrationDescriptor, RegistrationError};
use std::fmt;
use uuid::Uuid;

/// 注册表标识
///
/// 标识在注册表创建时分配，代表引用身份而不是内容；两个内容相同的注册表拥有不同的标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryId(Uuid);

impl RegistryId {
    /// 分配新的标识
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegistryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registry-{}", self.0)
    }
}

/// 组件注册表 trait
///
/// 由外部容器拥有。名称是唯一键，插入只追加不覆盖。
/// 启动阶段只允许单一写入者，实现不必自行加锁。
pub trait ComponentRegistry: Send + Sync {
    /// 注册表标识
    fn id(&self) -> RegistryId;

    /// 插入描述符，名称已存在时返回 [`RegistrationError::DuplicateName`]
    fn insert(
        &mut self,
        name: &str,
        descriptor: RegistrationDescriptor,
    ) -> Result<(), RegistrationError>;

    /// 名称是否已注册
    fn contains(&self, name: &str) -> bool;

    /// 获取描述符
    fn get(&self, name: &str) -> Option<RegistrationDescriptor>;

    /// 按插入顺序列出所有名称
    fn list_names(&self) -> Vec<String>;

    /// 已注册的组件数量
    fn len(&self) -> usize {
        self.list_names().len()
    }

    /// 注册表是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按组件类型查找第一个注册名称
    fn find_by_owner_type(&self, type_name: &str) -> Option<String> {
        self.list_names().into_iter().find(|name| {
            self.get(name)
                .is_some_and(|descriptor| descriptor.owner_type_name() == Some(type_name))
        })
    }
}
