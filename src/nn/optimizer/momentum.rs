/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 动量梯度下降学习规则实现
 */

use ndarray::Zip;
use tracing::{debug, trace};

use super::base::{
    LearningRule, OptimizerState, accumulators_like, check_unit_interval, fill_accumulators,
};
use crate::errors::OptimizerError;
use crate::nn::Param;
use crate::tensor::Tensor;

/// 动量梯度下降
///
/// - v = μ * v - α * ∇θ
/// - θ = θ + v
///
/// 先更新速度、再将其加到参数上。μ 为 0 时每步速度恰为负的缩放梯度，退化为普通梯度下降；
/// μ 为 1 时速度不衰减（无摩擦极限），步长可能越来越大，需由调用方避免发散。
#[derive(Debug, Clone)]
pub struct MomentumRule {
    state: OptimizerState,
    /// 动量系数 μ，位于[0, 1]
    momentum_coefficient: f32,
    /// 每个参数一个速度累积量，初值全零
    velocities: Vec<Tensor>,
}

impl MomentumRule {
    pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;
    pub const DEFAULT_MOMENTUM_COEFFICIENT: f32 = 0.9;

    /// 创建新的动量规则
    ///
    /// # 参数
    /// - `learning_rate`: 学习率，须为有限正数
    /// - `momentum_coefficient`: 动量系数，须位于[0, 1]闭区间
    pub fn new(learning_rate: f32, momentum_coefficient: f32) -> Result<Self, OptimizerError> {
        Ok(Self {
            state: OptimizerState::new(learning_rate)?,
            momentum_coefficient: check_unit_interval(
                "momentum_coefficient",
                momentum_coefficient,
            )?,
            velocities: Vec::new(),
        })
    }

    /// 使用默认超参数（学习率1e-3，动量系数0.9）创建
    pub fn new_default() -> Self {
        Self {
            state: OptimizerState::with_default_learning_rate(Self::DEFAULT_LEARNING_RATE),
            momentum_coefficient: Self::DEFAULT_MOMENTUM_COEFFICIENT,
            velocities: Vec::new(),
        }
    }

    pub const fn momentum_coefficient(&self) -> f32 {
        self.momentum_coefficient
    }

    /// 获取各参数的速度累积量（与已绑定参数一一对应）
    ///
    /// 用于调试和可视化优化过程
    pub fn velocities(&self) -> &[Tensor] {
        &self.velocities
    }
}

impl LearningRule for MomentumRule {
    fn name(&self) -> &'static str {
        "MomentumRule"
    }

    fn initialise(&mut self, params: &[Param]) {
        self.state.bind(params);
        self.velocities = accumulators_like(params, 0.0);
        debug!(rule = self.name(), params = params.len(), "学习规则已绑定参数");
    }

    fn update(&mut self, grads: &[Tensor]) -> Result<(), OptimizerError> {
        let name = self.name();
        let learning_rate = self.state.learning_rate();
        let momentum_coefficient = self.momentum_coefficient;
        let params = self.state.checked_params(name, grads)?;

        for ((param, velocity), grad) in params.iter().zip(&mut self.velocities).zip(grads) {
            param.with_value_mut(|value| {
                Zip::from(value.data_mut())
                    .and(velocity.data_mut())
                    .and(grad.data())
                    .for_each(|p, v, &g| {
                        *v = momentum_coefficient * *v - learning_rate * g;
                        *p += *v;
                    });
            });
        }
        trace!(rule = name, "参数已更新");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), OptimizerError> {
        self.state.bound_params(self.name())?;
        fill_accumulators(&mut self.velocities, 0.0);
        debug!(rule = self.name(), "速度累积量已清零");
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
