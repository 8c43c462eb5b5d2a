//! 工厂方法扫描抽象接口
//!
//! 工厂扫描器在工厂阶段运行，从已注册的工厂组件的实例方法产生新的描述符

use crate::registry::ComponentRegistry;
use infrastructure_common::{RegistrationDescriptor, RegistrationError};

/// 工厂扫描产生的描述符序列
///
/// 序列是惰性的、有限的、只能遍历一次；重新遍历需要重新扫描
pub type DescriptorIter<'a> = Box<dyn Iterator<Item = RegistrationDescriptor> + 'a>;

/// 工厂扫描器 trait
pub trait FactoryScanner: Send + Sync {
    /// 针对注册表扫描工厂方法
    ///
    /// 工厂类型无法解析或未在注册表中声明时返回
    /// [`RegistrationError::MissingFactoryDeclaration`]
    fn scan<'a>(
        &'a self,
        registry: &dyn ComponentRegistry,
    ) -> Result<DescriptorIter<'a>, RegistrationError>;

    /// 工厂类型的完全限定名称
    fn factory_type(&self) -> &str;
}
