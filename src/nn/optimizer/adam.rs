/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Adam学习规则实现（简化版，无偏差修正）
 */

use ndarray::Zip;
use tracing::{debug, trace};

use super::base::{
    EPSILON, LearningRule, OptimizerState, accumulators_like, check_unit_interval,
    fill_accumulators,
};
use crate::errors::OptimizerError;
use crate::nn::Param;
use crate::tensor::Tensor;

/// Adam: Adaptive Moment Estimation
///
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - θ = θ - α * m / (√v + ε)
///
/// 与常见的 Adam 不同，这里**不做**偏差修正（即不除以 `1 - β^t`），
/// 因此也不需要记录时间步。β1 即动量系数，β2 即衰减率。
/// 两个矩估计在 `initialise` 和 `reset` 时都是全零。
///
/// # 使用示例
/// ```
/// use only_rules::nn::ParamStore;
/// use only_rules::nn::optimizer::{AdamRule, LearningRule};
/// use only_rules::tensor::Tensor;
///
/// let store = ParamStore::new();
/// let w = store.parameter(&Tensor::new(&[1.0], &[1]));
/// let mut adam = AdamRule::new(0.1, 0.9, 0.99)?;
/// adam.initialise(&store.parameters());
/// adam.update(&[Tensor::new(&[1.0], &[1])])?;
/// assert!((w.value().number().unwrap() - 0.9).abs() < 1e-5);
/// # Ok::<(), only_rules::errors::OptimizerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AdamRule {
    state: OptimizerState,
    /// β1 (一阶矩衰减)
    momentum_coefficient: f32,
    /// β2 (二阶矩衰减)
    decay_rate: f32,
    /// 一阶矩估计
    first_moments: Vec<Tensor>,
    /// 二阶矩估计
    second_moments: Vec<Tensor>,
}

impl AdamRule {
    pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;
    pub const DEFAULT_MOMENTUM_COEFFICIENT: f32 = 0.9;
    pub const DEFAULT_DECAY_RATE: f32 = 0.99;

    /// 创建新的 Adam 规则
    ///
    /// # 参数
    /// - `learning_rate`: 学习率，须为有限正数
    /// - `momentum_coefficient`: 一阶矩衰减 β1，须位于[0, 1]闭区间
    /// - `decay_rate`: 二阶矩衰减 β2，须位于[0, 1]闭区间
    pub fn new(
        learning_rate: f32,
        momentum_coefficient: f32,
        decay_rate: f32,
    ) -> Result<Self, OptimizerError> {
        Ok(Self {
            state: OptimizerState::new(learning_rate)?,
            momentum_coefficient: check_unit_interval(
                "momentum_coefficient",
                momentum_coefficient,
            )?,
            decay_rate: check_unit_interval("decay_rate", decay_rate)?,
            first_moments: Vec::new(),
            second_moments: Vec::new(),
        })
    }

    /// 使用默认超参数（学习率1e-3，β1=0.9，β2=0.99）创建
    pub fn new_default() -> Self {
        Self {
            state: OptimizerState::with_default_learning_rate(Self::DEFAULT_LEARNING_RATE),
            momentum_coefficient: Self::DEFAULT_MOMENTUM_COEFFICIENT,
            decay_rate: Self::DEFAULT_DECAY_RATE,
            first_moments: Vec::new(),
            second_moments: Vec::new(),
        }
    }

    pub const fn momentum_coefficient(&self) -> f32 {
        self.momentum_coefficient
    }

    pub const fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// 获取各参数的一阶矩估计
    pub fn first_moments(&self) -> &[Tensor] {
        &self.first_moments
    }

    /// 获取各参数的二阶矩估计
    pub fn second_moments(&self) -> &[Tensor] {
        &self.second_moments
    }
}

impl LearningRule for AdamRule {
    fn name(&self) -> &'static str {
        "AdamRule"
    }

    fn initialise(&mut self, params: &[Param]) {
        self.state.bind(params);
        self.first_moments = accumulators_like(params, 0.0);
        self.second_moments = accumulators_like(params, 0.0);
        debug!(rule = self.name(), params = params.len(), "学习规则已绑定参数");
    }

    fn update(&mut self, grads: &[Tensor]) -> Result<(), OptimizerError> {
        let name = self.name();
        let learning_rate = self.state.learning_rate();
        let beta1 = self.momentum_coefficient;
        let beta2 = self.decay_rate;
        let params = self.state.checked_params(name, grads)?;

        let moments = self.first_moments.iter_mut().zip(&mut self.second_moments);
        for ((param, (m, v)), grad) in params.iter().zip(moments).zip(grads) {
            param.with_value_mut(|value| {
                Zip::from(value.data_mut())
                    .and(m.data_mut())
                    .and(v.data_mut())
                    .and(grad.data())
                    .for_each(|p, m, v, &g| {
                        *m = beta1 * *m + (1.0 - beta1) * g;
                        *v = beta2 * *v + (1.0 - beta2) * g * g;
                        *p -= learning_rate * *m / (v.sqrt() + EPSILON);
                    });
            });
        }
        trace!(rule = name, "参数已更新");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), OptimizerError> {
        self.state.bound_params(self.name())?;
        fill_accumulators(&mut self.first_moments, 0.0);
        fill_accumulators(&mut self.second_moments, 0.0);
        debug!(rule = self.name(), "一阶、二阶矩估计已清零");
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
