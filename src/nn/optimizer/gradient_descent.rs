/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 梯度下降学习规则实现
 */

use ndarray::Zip;
use tracing::{debug, trace};

use super::base::{LearningRule, OptimizerState};
use crate::errors::OptimizerError;
use crate::nn::Param;
use crate::tensor::Tensor;

/// 梯度下降（学习规则基础版）
///
/// θ = θ - α * ∇θ
///
/// 除参数绑定外不持有任何额外状态。若梯度只基于部分样本计算，即为随机梯度下降。
#[derive(Debug, Clone)]
pub struct GradientDescentRule {
    state: OptimizerState,
}

impl GradientDescentRule {
    /// 默认学习率
    pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;

    /// 创建新的梯度下降规则，`learning_rate`须为有限正数
    pub fn new(learning_rate: f32) -> Result<Self, OptimizerError> {
        Ok(Self {
            state: OptimizerState::new(learning_rate)?,
        })
    }

    /// 使用默认学习率（1e-3）创建
    pub fn new_default() -> Self {
        Self {
            state: OptimizerState::with_default_learning_rate(Self::DEFAULT_LEARNING_RATE),
        }
    }
}

impl LearningRule for GradientDescentRule {
    fn name(&self) -> &'static str {
        "GradientDescentRule"
    }

    fn initialise(&mut self, params: &[Param]) {
        self.state.bind(params);
        debug!(rule = self.name(), params = params.len(), "学习规则已绑定参数");
    }

    fn update(&mut self, grads: &[Tensor]) -> Result<(), OptimizerError> {
        let learning_rate = self.state.learning_rate();
        let params = self.state.checked_params(self.name(), grads)?;

        for (param, grad) in params.iter().zip(grads) {
            param.with_value_mut(|value| {
                Zip::from(value.data_mut())
                    .and(grad.data())
                    .for_each(|p, &g| *p -= learning_rate * g);
            });
        }
        trace!(rule = self.name(), "参数已更新");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), OptimizerError> {
        // 无额外状态，仅确认已初始化
        self.state.bound_params(self.name())?;
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn params(&self) -> &[Param] {
        self.state.params()
    }

    fn is_initialised(&self) -> bool {
        self.state.is_initialised()
    }
}
