/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 学习规则超参数配置测试
 */

use approx::assert_abs_diff_eq;

use super::single_param;
use crate::assert_err;
use crate::errors::{OptimizerError, Requirement};
use crate::nn::optimizer::{AnyRule, LearningRule, RuleConfig};
use crate::tensor::Tensor;

#[test]
fn test_config_parse_with_defaults() {
    let config = RuleConfig::from_json_str(r#"{"rule": "gradient_descent"}"#).unwrap();
    assert_eq!(config, RuleConfig::GradientDescent { learning_rate: 1e-3 });

    let config = RuleConfig::from_json_str(r#"{"rule": "momentum", "learning_rate": 0.05}"#)
        .unwrap();
    assert_eq!(
        config,
        RuleConfig::Momentum {
            learning_rate: 0.05,
            momentum_coefficient: 0.9,
        }
    );

    let config = RuleConfig::from_json_str(r#"{"rule": "rms_prop"}"#).unwrap();
    assert_eq!(
        config,
        RuleConfig::RMSProp {
            learning_rate: 1e-3,
            decay_rate: 0.9,
        }
    );

    let config = RuleConfig::from_json_str(r#"{"rule": "adam", "decay_rate": 0.5}"#).unwrap();
    assert_eq!(
        config,
        RuleConfig::Adam {
            learning_rate: 1e-3,
            momentum_coefficient: 0.9,
            decay_rate: 0.5,
        }
    );
}

#[test]
fn test_config_rms_prop_alias() {
    let config = RuleConfig::from_json_str(r#"{"rule": "rmsprop", "decay_rate": 0.8}"#).unwrap();
    assert_eq!(
        config,
        RuleConfig::RMSProp {
            learning_rate: 1e-3,
            decay_rate: 0.8,
        }
    );
}

#[test]
fn test_config_unknown_rule() {
    assert!(RuleConfig::from_json_str(r#"{"rule": "adagrad"}"#).is_err());
    assert!(RuleConfig::from_json_str(r#"{"learning_rate": 0.1}"#).is_err());
}

#[test]
fn test_config_rejects_unknown_field() {
    // 拼错的字段名不能悄悄回落到默认值
    assert!(
        RuleConfig::from_json_str(r#"{"rule": "gradient_descent", "learnig_rate": 0.5}"#)
            .is_err()
    );
    assert!(RuleConfig::from_json_str(r#"{"rule": "adam", "momentum": 0.5}"#).is_err());
    // 动量系数不属于 RMSProp
    assert!(
        RuleConfig::from_json_str(r#"{"rule": "rms_prop", "momentum_coefficient": 0.5}"#)
            .is_err()
    );
}

#[test]
fn test_config_build_rejects_infinite_learning_rate() {
    let config = RuleConfig::Momentum {
        learning_rate: f32::INFINITY,
        momentum_coefficient: 0.9,
    };
    assert_err!(
        config.build(),
        OptimizerError::InvalidHyperparameter("learning_rate", Requirement::Positive)
    );
}

#[test]
fn test_config_serialize_uses_rule_tag() {
    let config = RuleConfig::Momentum {
        learning_rate: 0.5,
        momentum_coefficient: 0.25,
    };
    let json: serde_json::Value =
        serde_json::from_str(&config.to_json_string().unwrap()).unwrap();
    assert_eq!(json["rule"], "momentum");
    assert_eq!(json["learning_rate"], 0.5);
    assert_eq!(json["momentum_coefficient"], 0.25);

    let config = RuleConfig::RMSProp {
        learning_rate: 0.5,
        decay_rate: 0.5,
    };
    let json: serde_json::Value =
        serde_json::from_str(&config.to_json_string().unwrap()).unwrap();
    assert_eq!(json["rule"], "rms_prop");
}

#[test]
fn test_config_build_validates_hyperparameters() {
    let config = RuleConfig::GradientDescent { learning_rate: 0. };
    assert_err!(
        config.build(),
        OptimizerError::InvalidHyperparameter("learning_rate", Requirement::Positive)
    );

    let config = RuleConfig::Adam {
        learning_rate: 0.1,
        momentum_coefficient: 0.9,
        decay_rate: 2.,
    };
    assert_err!(
        config.build(),
        OptimizerError::InvalidHyperparameter("decay_rate", Requirement::UnitInterval)
    );
}

#[test]
fn test_config_build_each_rule() {
    let configs = [
        RuleConfig::GradientDescent { learning_rate: 0.1 },
        RuleConfig::Momentum {
            learning_rate: 0.1,
            momentum_coefficient: 0.9,
        },
        RuleConfig::RMSProp {
            learning_rate: 0.1,
            decay_rate: 0.9,
        },
        RuleConfig::Adam {
            learning_rate: 0.1,
            momentum_coefficient: 0.9,
            decay_rate: 0.99,
        },
    ];
    let names = ["GradientDescentRule", "MomentumRule", "RMSPropRule", "AdamRule"];

    for (config, name) in configs.iter().zip(names) {
        let rule = config.build().unwrap();
        assert_eq!(rule.name(), name);
        assert_eq!(rule.learning_rate(), 0.1);
        // 规则 -> 配置 -> 规则，超参数不变
        assert_eq!(RuleConfig::from(&rule), *config);
    }
}

#[test]
fn test_any_rule_dispatches_update() {
    // 同一场景下经由 AnyRule 与直接使用具体规则的结果一致（RMSProp：θ ≈ 0.8246）
    let (_store, w) = single_param(&[1.], &[1]);
    let mut rule = RuleConfig::RMSProp {
        learning_rate: 0.1,
        decay_rate: 0.9,
    }
    .build()
    .unwrap();
    assert!(matches!(rule, AnyRule::RMSPropRule(_)));

    rule.initialise(&[w.clone()]);
    rule.update(&[Tensor::new(&[2.], &[1])]).unwrap();
    assert_abs_diff_eq!(w.value().number().unwrap(), 0.824_588_4, epsilon = 1e-5);
}
