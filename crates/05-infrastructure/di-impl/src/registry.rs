//! 内存组件注册表

use di_abstractions::{ComponentRegistry, ComponentResolver, RegistryId};
use infrastructure_common::{
    AccessMode, DependencyError, Instance, InstantiationStrategy, MemberInfo,
    RegistrationDescriptor, RegistrationError,
};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, info};

/// 内存组件注册表
///
/// 同时充当组件解析器：单例在首次请求时创建并缓存，原型每次请求都重新创建
pub struct DefaultComponentRegistry {
    /// 注册表标识
    id: RegistryId,
    /// 按插入顺序排列的名称
    names: Vec<String>,
    /// 组件描述符
    descriptors: HashMap<String, RegistrationDescriptor>,
    /// 单例缓存
    singletons: Mutex<HashMap<String, Arc<OnceCell<Instance>>>>,
    /// 正在创建的组件，按线程区分
    in_creation: Mutex<HashSet<(ThreadId, String)>>,
}

/// 组件创建标记，离开作用域时移除
struct CreationGuard<'a> {
    in_creation: &'a Mutex<HashSet<(ThreadId, String)>>,
    key: (ThreadId, String),
}

impl Drop for CreationGuard<'_> {
    fn drop(&mut self) {
        self.in_creation.lock().remove(&self.key);
    }
}

impl DefaultComponentRegistry {
    /// 创建新的注册表
    pub fn new() -> Self {
        Self {
            id: RegistryId::new(),
            names: Vec::new(),
            descriptors: HashMap::new(),
            singletons: Mutex::new(HashMap::new()),
            in_creation: Mutex::new(HashSet::new()),
        }
    }

    /// 预先实例化所有非延迟单例，返回实例化的数量
    pub fn pre_instantiate_singletons(&self) -> Result<usize, DependencyError> {
        let eager: Vec<&String> = self
            .names
            .iter()
            .filter(|name| {
                self.descriptors
                    .get(*name)
                    .is_some_and(|descriptor| descriptor.is_singleton() && !descriptor.lazy)
            })
            .collect();

        for name in &eager {
            self.resolve_by_name(name)?;
        }

        info!("预实例化单例完成，共 {} 个", eager.len());
        Ok(eager.len())
    }

    /// 已经创建实例的单例名称
    pub fn instantiated_singletons(&self) -> Vec<String> {
        let singletons = self.singletons.lock();
        self.names
            .iter()
            .filter(|name| singletons.get(*name).is_some_and(|cell| cell.get().is_some()))
            .cloned()
            .collect()
    }

    /// 获取单例缓存单元
    fn singleton_cell(&self, name: &str) -> Arc<OnceCell<Instance>> {
        let mut singletons = self.singletons.lock();
        singletons
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// 标记组件正在当前线程创建，组件已在创建中说明存在循环依赖
    fn enter_creation(&self, name: &str) -> Result<CreationGuard<'_>, DependencyError> {
        let key = (thread::current().id(), name.to_string());
        if !self.in_creation.lock().insert(key.clone()) {
            return Err(DependencyError::ComponentCreationFailed {
                name: name.to_string(),
                source: format!("检测到循环依赖: {}", name).into(),
            });
        }
        Ok(CreationGuard {
            in_creation: &self.in_creation,
            key,
        })
    }

    /// 按描述符创建组件实例
    fn create_instance(
        &self,
        name: &str,
        descriptor: &RegistrationDescriptor,
    ) -> Result<Instance, DependencyError> {
        if let Some(dependency) = &descriptor.depends_on {
            if dependency == name {
                return Err(DependencyError::ComponentCreationFailed {
                    name: name.to_string(),
                    source: "组件不能依赖自身".into(),
                });
            }
            debug!("组件 {} 依赖 {}，先解析依赖", name, dependency);
            self.resolve_by_name(dependency)?;
        }

        match &descriptor.strategy {
            InstantiationStrategy::Unspecified => Err(DependencyError::NoInstantiationStrategy {
                name: name.to_string(),
            }),
            InstantiationStrategy::ReadStaticField(member)
            | InstantiationStrategy::InvokeStaticMethod(member) => {
                member
                    .read_static(access_mode(member))
                    .map_err(|source| DependencyError::MemberAccessFailed {
                        member: member.identity(),
                        source,
                    })
            }
            InstantiationStrategy::InvokeFactoryMethod { factory, method } => {
                let target = self.resolve_by_name(factory)?;
                method
                    .invoke_on(&target, access_mode(method))
                    .map_err(|source| DependencyError::MemberAccessFailed {
                        member: method.identity(),
                        source,
                    })
            }
            InstantiationStrategy::Supplier(supplier) => {
                supplier().map_err(|source| DependencyError::ComponentCreationFailed {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }
}

/// 非公开成员需要强制访问
fn access_mode(member: &MemberInfo) -> AccessMode {
    if member.is_public() {
        AccessMode::Normal
    } else {
        debug!("强制访问非公开成员: {}", member.identity());
        AccessMode::Forced
    }
}

impl Default for DefaultComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DefaultComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultComponentRegistry")
            .field("id", &self.id)
            .field("names", &self.names)
            .finish()
    }
}

impl ComponentRegistry for DefaultComponentRegistry {
    fn id(&self) -> RegistryId {
        self.id
    }

    fn insert(
        &mut self,
        name: &str,
        descriptor: RegistrationDescriptor,
    ) -> Result<(), RegistrationError> {
        if self.descriptors.contains_key(name) {
            return Err(RegistrationError::DuplicateName {
                name: name.to_string(),
            });
        }

        debug!("注册组件: {} -> {:?}", name, descriptor.owner_type);
        self.names.push(name.to_string());
        self.descriptors.insert(name.to_string(), descriptor);
        Ok(())
    }

    fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<RegistrationDescriptor> {
        self.descriptors.get(name).cloned()
    }

    fn list_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn len(&self) -> usize {
        self.names.len()
    }
}

impl ComponentResolver for DefaultComponentRegistry {
    fn resolve_by_name(&self, name: &str) -> Result<Instance, DependencyError> {
        let descriptor =
            self.descriptors
                .get(name)
                .ok_or_else(|| DependencyError::ComponentNotRegistered {
                    name: name.to_string(),
                })?;

        if descriptor.is_singleton() {
            let cell = self.singleton_cell(name);
            if let Some(instance) = cell.get() {
                return Ok(instance.clone());
            }
            let _creating = self.enter_creation(name)?;
            cell.get_or_try_init(|| {
                debug!("创建单例组件: {}", name);
                self.create_instance(name, descriptor)
            })
            .cloned()
        } else {
            let _creating = self.enter_creation(name)?;
            debug!("创建原型组件: {}", name);
            self.create_instance(name, descriptor)
        }
    }

    fn can_resolve_by_name(&self, name: &str) -> bool {
        self.descriptors
            .get(name)
            .is_some_and(|descriptor| descriptor.strategy.is_specified())
    }
}
