//! 内存类型全集
//!
//! 按注册顺序保存类型元数据，完整的类型描述只在首次解析时加载

use di_abstractions::{IncludePredicate, TypeSource, TypeUniverseScanner};
use infrastructure_common::{
    LegacyType, RegistrationError, ResolutionError, TypeMetadata,
};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// 类型加载函数，失败时返回原因
pub type TypeLoader = Arc<dyn Fn() -> Result<LegacyType, String> + Send + Sync>;

struct TypeEntry {
    metadata: TypeMetadata,
    loader: TypeLoader,
    loaded: OnceCell<Result<Arc<LegacyType>, ResolutionError>>,
}

impl TypeEntry {
    fn load(&self) -> Result<Arc<LegacyType>, ResolutionError> {
        self.loaded
            .get_or_init(|| {
                debug!("加载类型: {}", self.metadata.name);
                (self.loader)().map(Arc::new).map_err(|reason| {
                    ResolutionError::LinkageFailed {
                        type_name: self.metadata.name.clone(),
                        reason,
                    }
                })
            })
            .clone()
    }
}

/// 内存类型全集
///
/// 同时实现 [`TypeSource`] 和 [`TypeUniverseScanner`]，扫描只读取元数据
#[derive(Default)]
pub struct InMemoryTypeUniverse {
    entries: Vec<TypeEntry>,
    index: HashMap<String, usize>,
}

impl InMemoryTypeUniverse {
    /// 创建空的类型全集
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册已构建的类型
    pub fn register_type(&mut self, legacy_type: LegacyType) -> &mut Self {
        let metadata = legacy_type.metadata.clone();
        let shared = Arc::new(legacy_type);
        self.register(metadata, move || Ok((*shared).clone()))
    }

    /// 注册元数据和延迟加载函数
    ///
    /// 同名类型重复注册时替换原有条目，保留原有的扫描位置
    pub fn register<F>(&mut self, metadata: TypeMetadata, loader: F) -> &mut Self
    where
        F: Fn() -> Result<LegacyType, String> + Send + Sync + 'static,
    {
        let entry = TypeEntry {
            metadata,
            loader: Arc::new(loader),
            loaded: OnceCell::new(),
        };

        match self.index.get(&entry.metadata.name) {
            Some(&position) => {
                warn!("类型 {} 重复注册，替换原有条目", entry.metadata.name);
                self.entries[position] = entry;
            }
            None => {
                self.index
                    .insert(entry.metadata.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
        self
    }

    /// 注册一个可以扫描但无法加载的类型
    pub fn register_unresolvable(
        &mut self,
        metadata: TypeMetadata,
        reason: impl Into<String>,
    ) -> &mut Self {
        let reason = reason.into();
        self.register(metadata, move || Err(reason.clone()))
    }

    /// 已注册的类型数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有任何类型
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 类型是否已经被加载过
    pub fn is_loaded(&self, type_name: &str) -> bool {
        self.index
            .get(type_name)
            .is_some_and(|&position| self.entries[position].loaded.get().is_some())
    }
}

impl fmt::Debug for InMemoryTypeUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTypeUniverse")
            .field("types", &self.entries.len())
            .finish()
    }
}

impl TypeSource for InMemoryTypeUniverse {
    fn resolve(&self, type_name: &str) -> Result<Arc<LegacyType>, ResolutionError> {
        let position =
            self.index
                .get(type_name)
                .copied()
                .ok_or_else(|| ResolutionError::TypeNotFound {
                    type_name: type_name.to_string(),
                })?;
        self.entries[position].load()
    }
}

impl TypeUniverseScanner for InMemoryTypeUniverse {
    fn scan_candidates(
        &self,
        base_packages: &[String],
        include: IncludePredicate<'_>,
    ) -> Result<Vec<TypeMetadata>, RegistrationError> {
        if base_packages.is_empty() {
            return Err(RegistrationError::scan_error("至少需要指定一个基础包"));
        }

        let candidates: Vec<TypeMetadata> = self
            .entries
            .iter()
            .map(|entry| &entry.metadata)
            .filter(|metadata| {
                base_packages
                    .iter()
                    .any(|package| metadata.is_in_package(package))
            })
            .filter(|metadata| {
                metadata.is_independent && !metadata.is_interface && !metadata.is_abstract
            })
            .filter(|metadata| include(*metadata))
            .cloned()
            .collect();

        debug!(
            "在基础包 {:?} 中扫描到 {} 个候选类型",
            base_packages,
            candidates.len()
        );
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "InMemoryTypeUniverse"
    }
}
