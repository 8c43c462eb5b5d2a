//! 类型解析与扫描抽象接口
//!
//! 扫描只接触轻量元数据，解析才会物化完整的类型描述

use infrastructure_common::{LegacyType, RegistrationError, ResolutionError, TypeMetadata};
use std::sync::Arc;

/// 类型解析 trait
pub trait TypeSource: Send + Sync {
    /// 按完全限定名称解析类型
    ///
    /// 类型不存在或加载失败时返回 [`ResolutionError`]，调用方通常把它当作"不匹配"处理
    fn resolve(&self, type_name: &str) -> Result<Arc<LegacyType>, ResolutionError>;
}

/// 候选类型过滤条件
pub type IncludePredicate<'a> = &'a dyn Fn(&TypeMetadata) -> bool;

/// 候选类型扫描器 trait
///
/// 在不加载、不初始化类型的前提下产生候选类型
pub trait TypeUniverseScanner: Send + Sync {
    /// 扫描基础包中满足过滤条件的候选类型
    fn scan_candidates(
        &self,
        base_packages: &[String],
        include: IncludePredicate<'_>,
    ) -> Result<Vec<TypeMetadata>, RegistrationError>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}
