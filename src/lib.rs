//! # Only Rules
//!
//! `only_rules`提供一组基于梯度的参数更新规则（学习规则/优化器）：
//! 梯度下降、动量、RMSProp 和 Adam。
//!
//! 梯度由外部（如自动微分框架或手写的反向传播）计算，
//! 训练循环每步调用一次 [`LearningRule::update`](nn::optimizer::LearningRule::update)，
//! 由学习规则原地更新参数及其内部累积量。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
