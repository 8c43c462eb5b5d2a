//! 桥接层单元测试

mod support;
