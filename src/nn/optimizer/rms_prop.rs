/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : RMSProp学习规则实现
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

/// RMSProp
///
/// - S = ρ * S + (1 - ρ) * (∇θ)²
/// - θ = θ - α * ∇θ / (√S + ε)
///
/// 以梯度平方的滑动平均对每个元素的学习率做归一化，ε 固定为 [`EPSILON`]。
///
/// # 注意
/// 滑动平均 S 在 `initialise` 时以**全一**初始化，而 `reset` 将其置为**全零**。
/// 两条路径的初值有意保持不一致，切勿"修正"为同一个值。
#[derive(Debug, Clone)]
pub struct RMSPropRule {
    state: OptimizerState,
    /// 衰减率 ρ，位于[0, 1]
    decay_rate: f32,
    /// 每个参数一个梯度平方滑动平均
    averages: Vec<Tensor>,
}

impl RMSPropRule {
    pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;
    pub const DEFAULT_DECAY_RATE: f32 = 0.9;

    /// `initialise` 时滑动平均的初值
    const INITIAL_AVERAGE: f32 = 1.0;
    /// `reset` 时滑动平均的重置值
    const RESET_AVERAGE: f32 = 0.0;

    /// 创建新的 RMSProp 规则
    ///
    /// # 参数
    /// - `learning_rate`: 学习率，须为有限正数
    /// - `decay_rate`: 衰减率，须位于[0, 1]闭区间
    pub fn new(learning_rate: f32, decay_rate: f32) -> Result<Self, OptimizerError> {
        Ok(Self {
            state: OptimizerState::new(learning_rate)?,
            decay_rate: check_unit_interval("decay_rate", decay_rate)?,
            averages: Vec::new(),
        })
    }

    /// 使用默认超参数（学习率1e-3，衰减率0.9）创建
    pub fn new_default() -> Self {
        Self {
            state: OptimizerState::with_default_learning_rate(Self::DEFAULT_LEARNING_RATE),
            decay_rate: Self::DEFAULT_DECAY_RATE,
            averages: Vec::new(),
        }
    }

    pub const fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// 获取各参数的梯度平方滑动平均
    pub fn averages(&self) -> &[Tensor] {
        &self.averages
    }
}

impl LearningRule for RMSPropRule {
    fn name(&self) -> &'static str {
        "RMSPropRule"
    }

    fn initialise(&mut self, params: &[Param]) {
        self.state.bind(params);
        self.averages = accumulators_like(params, Self::INITIAL_AVERAGE);
        debug!(rule = self.name(), params = params.len(), "学习规则已绑定参数");
    }

    fn update(&mut self, grads: &[Tensor]) -> Result<(), OptimizerError> {
        let name = self.name();
        let learning_rate = self.state.learning_rate();
        let decay_rate = self.decay_rate;
        let params = self.state.checked_params(name, grads)?;

        for ((param, average), grad) in params.iter().zip(&mut self.averages).zip(grads) {
            param.with_value_mut(|value| {
                Zip::from(value.data_mut())
                    .and(average.data_mut())
                    .and(grad.data())
                    .for_each(|p, s, &g| {
                        // 凸组合：上一步非负、g²非负，故S恒非负
                        *s = decay_rate * *s + (1.0 - decay_rate) * g * g;
                        *p -= learning_rate * g / (s.sqrt() + EPSILON);
                    });
            });
        }
        trace!(rule = name, "参数已更新");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), OptimizerError> {
        self.state.bound_params(self.name())?;
        fill_accumulators(&mut self.averages, Self::RESET_AVERAGE);
        debug!(rule = self.name(), "梯度平方滑动平均已清零");
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
