/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 学习规则的超参数配置（可序列化）与统一的规则枚举
 */

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{AdamRule, GradientDescentRule, LearningRule, MomentumRule, RMSPropRule};
use crate::errors::OptimizerError;
use crate::nn::Param;
use crate::tensor::Tensor;

/// 任意一种学习规则（静态分发）
///
/// 训练循环只需持有 `AnyRule`，即可在不使用 trait object 的前提下切换规则。
#[enum_dispatch(LearningRule)]
#[derive(Debug, Clone)]
pub enum AnyRule {
    GradientDescentRule,
    MomentumRule,
    RMSPropRule,
    AdamRule,
}

/// 学习规则的超参数配置
///
/// 以`rule`字段区分规则种类，缺省字段取各规则的默认值，未知字段（如拼写错误）直接报错，如：
/// ```
/// use only_rules::nn::optimizer::RuleConfig;
///
/// let config = RuleConfig::from_json_str(r#"{"rule": "adam", "learning_rate": 0.01}"#).unwrap();
/// assert_eq!(
///     config,
///     RuleConfig::Adam {
///         learning_rate: 0.01,
///         momentum_coefficient: 0.9,
///         decay_rate: 0.99,
///     }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum RuleConfig {
    GradientDescent {
        #[serde(default = "default_learning_rate")]
        learning_rate: f32,
    },
    Momentum {
        #[serde(default = "default_learning_rate")]
        learning_rate: f32,
        #[serde(default = "default_momentum_coefficient")]
        momentum_coefficient: f32,
    },
    #[serde(rename = "rms_prop", alias = "rmsprop")]
    RMSProp {
        #[serde(default = "default_learning_rate")]
        learning_rate: f32,
        #[serde(default = "default_rms_prop_decay_rate")]
        decay_rate: f32,
    },
    Adam {
        #[serde(default = "default_learning_rate")]
        learning_rate: f32,
        #[serde(default = "default_momentum_coefficient")]
        momentum_coefficient: f32,
        #[serde(default = "default_adam_decay_rate")]
        decay_rate: f32,
    },
}

const fn default_learning_rate() -> f32 {
    GradientDescentRule::DEFAULT_LEARNING_RATE
}

const fn default_momentum_coefficient() -> f32 {
    MomentumRule::DEFAULT_MOMENTUM_COEFFICIENT
}

const fn default_rms_prop_decay_rate() -> f32 {
    RMSPropRule::DEFAULT_DECAY_RATE
}

const fn default_adam_decay_rate() -> f32 {
    AdamRule::DEFAULT_DECAY_RATE
}

impl RuleConfig {
    /// 从 JSON 字符串解析配置（仅做格式解析，取值合法性在`build`时校验）
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 序列化为 JSON 字符串
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 校验超参数并构造对应的学习规则
    pub fn build(&self) -> Result<AnyRule, OptimizerError> {
        let rule: AnyRule = match *self {
            RuleConfig::GradientDescent { learning_rate } => {
                GradientDescentRule::new(learning_rate)?.into()
            }
            RuleConfig::Momentum {
                learning_rate,
                momentum_coefficient,
            } => MomentumRule::new(learning_rate, momentum_coefficient)?.into(),
            RuleConfig::RMSProp {
                learning_rate,
                decay_rate,
            } => RMSPropRule::new(learning_rate, decay_rate)?.into(),
            RuleConfig::Adam {
                learning_rate,
                momentum_coefficient,
                decay_rate,
            } => AdamRule::new(learning_rate, momentum_coefficient, decay_rate)?.into(),
        };
        Ok(rule)
    }
}

impl From<&AnyRule> for RuleConfig {
    fn from(rule: &AnyRule) -> Self {
        match rule {
            AnyRule::GradientDescentRule(r) => RuleConfig::GradientDescent {
                learning_rate: r.learning_rate(),
            },
            AnyRule::MomentumRule(r) => RuleConfig::Momentum {
                learning_rate: r.learning_rate(),
                momentum_coefficient: r.momentum_coefficient(),
            },
            AnyRule::RMSPropRule(r) => RuleConfig::RMSProp {
                learning_rate: r.learning_rate(),
                decay_rate: r.decay_rate(),
            },
            AnyRule::AdamRule(r) => RuleConfig::Adam {
                learning_rate: r.learning_rate(),
                momentum_coefficient: r.momentum_coefficient(),
                decay_rate: r.decay_rate(),
            },
        }
    }
}
