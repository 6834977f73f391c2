/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 学习规则核心trait、超参数校验与参数绑定状态
 */

use enum_dispatch::enum_dispatch;

use crate::errors::{COUNT_MISMATCH_MESSAGE, OptimizerError, Requirement};
use crate::nn::Param;
use crate::tensor::Tensor;

/// RMSProp、Adam 中防止除零的数值稳定项（不可配置）
pub const EPSILON: f32 = 1e-8;

/// 学习规则核心 trait
///
/// # 生命周期
/// 构造（传入超参数） → `initialise`（绑定参数、分配累积量） → 若干次 `update`
/// → 任意时刻可 `reset`（清零累积量但保留参数绑定） → 继续 `update`。
///
/// `update`/`reset` 在 `initialise` 之前调用会立即返回
/// [`OptimizerError::NotInitialised`]，不会修改任何状态。
///
/// # 使用示例
/// ```
/// use only_rules::nn::ParamStore;
/// use only_rules::nn::optimizer::{LearningRule, MomentumRule};
/// use only_rules::tensor::Tensor;
///
/// let store = ParamStore::new();
/// let w = store.parameter(&Tensor::new(&[1.0], &[1]));
///
/// let mut rule = MomentumRule::new(0.1, 0.9)?;
/// rule.initialise(&[w.clone()]);
/// rule.update(&[Tensor::new(&[1.0], &[1])])?;
/// assert!((w.value().number().unwrap() - 0.9).abs() < 1e-6);
/// # Ok::<(), only_rules::errors::OptimizerError>(())
/// ```
#[enum_dispatch]
pub trait LearningRule {
    /// 规则名称（用于日志和错误信息）
    fn name(&self) -> &'static str;

    /// 绑定待优化的参数，并按参数形状分配（或重新分配）累积量。
    /// 重复调用会替换原有绑定；训练中途不应这样做。
    fn initialise(&mut self, params: &[Param]);

    /// 用一组梯度（与参数一一对应、形状相同）原地更新所有参数及累积量。
    /// 梯度数量或形状不符时返回错误，且不修改任何参数或累积量。
    fn update(&mut self, grads: &[Tensor]) -> Result<(), OptimizerError>;

    /// 将累积量重置（原地填充，不重新分配），保留参数绑定
    fn reset(&mut self) -> Result<(), OptimizerError>;

    /// 获取学习率（构造后不可变）
    fn learning_rate(&self) -> f32;

    /// 获取已绑定的参数；尚未 `initialise` 时为空
    fn params(&self) -> &[Param];

    /// 是否已调用过 `initialise`
    fn is_initialised(&self) -> bool;
}

/// 校验学习率须为有限正数（NaN、无穷视为非法）
pub(crate) fn check_learning_rate(learning_rate: f32) -> Result<f32, OptimizerError> {
    check_hyperparameter("learning_rate", learning_rate, Requirement::Positive)
}

/// 校验动量系数、衰减率等须位于[0, 1]闭区间（NaN 视为非法）
pub(crate) fn check_unit_interval(name: &str, value: f32) -> Result<f32, OptimizerError> {
    check_hyperparameter(name, value, Requirement::UnitInterval)
}

fn check_hyperparameter(
    name: &str,
    value: f32,
    requirement: Requirement,
) -> Result<f32, OptimizerError> {
    if requirement.is_satisfied_by(value) {
        Ok(value)
    } else {
        Err(OptimizerError::InvalidHyperparameter {
            name: name.to_string(),
            value,
            requirement,
        })
    }
}

/// 学习规则的公共状态（内部实现，不对外暴露）：学习率与参数绑定
#[derive(Debug, Clone)]
pub(crate) struct OptimizerState {
    /// 学习率
    learning_rate: f32,
    /// 已绑定的参数；`None` 表示尚未 `initialise`
    params: Option<Vec<Param>>,
}

impl OptimizerState {
    /// 创建新的状态（学习率须已校验）
    pub(crate) fn new(learning_rate: f32) -> Result<Self, OptimizerError> {
        Ok(Self {
            learning_rate: check_learning_rate(learning_rate)?,
            params: None,
        })
    }

    /// 以内置的默认学习率创建（调用方保证其合法）
    pub(crate) const fn with_default_learning_rate(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            params: None,
        }
    }

    pub(crate) fn bind(&mut self, params: &[Param]) {
        self.params = Some(params.to_vec());
    }

    pub(crate) const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub(crate) fn params(&self) -> &[Param] {
        self.params.as_deref().unwrap_or(&[])
    }

    pub(crate) const fn is_initialised(&self) -> bool {
        self.params.is_some()
    }

    /// 已绑定的参数，未 `initialise` 时报错
    pub(crate) fn bound_params(&self, rule_name: &str) -> Result<&[Param], OptimizerError> {
        self.params
            .as_deref()
            .ok_or_else(|| OptimizerError::NotInitialised(rule_name.to_string()))
    }

    /// 校验梯度与已绑定参数在数量和逐个形状上都一致，通过后返回已绑定的参数
    pub(crate) fn checked_params(
        &self,
        rule_name: &str,
        grads: &[Tensor],
    ) -> Result<&[Param], OptimizerError> {
        let params = self.bound_params(rule_name)?;
        if grads.len() != params.len() {
            return Err(OptimizerError::ShapeMismatch {
                expected: vec![params.len()],
                got: vec![grads.len()],
                message: COUNT_MISMATCH_MESSAGE.to_string(),
            });
        }
        for (i, (param, grad)) in params.iter().zip(grads).enumerate() {
            let param_shape = param.shape();
            if param_shape != grad.shape() {
                return Err(OptimizerError::ShapeMismatch {
                    expected: param_shape,
                    got: grad.shape().to_vec(),
                    message: format!("第{i}个梯度与参数形状不一致"),
                });
            }
        }
        Ok(params)
    }
}

/// 为每个参数分配一个同形状、元素全为`value`的累积量
pub(crate) fn accumulators_like(params: &[Param], value: f32) -> Vec<Tensor> {
    params
        .iter()
        .map(|param| param.with_value(|p| Tensor::full_like(p, value)))
        .collect()
}

/// 将一组累积量原地填充为`value`
pub(crate) fn fill_accumulators(accumulators: &mut [Tensor], value: f32) {
    for accumulator in accumulators {
        accumulator.fill(value);
    }
}
