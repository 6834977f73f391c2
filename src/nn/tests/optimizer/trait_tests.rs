/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : LearningRule trait 通用行为测试
 *
 * 这些测试验证所有学习规则实现的共同行为（状态机、参数绑定、错误处理）
 */

use approx::assert_abs_diff_eq;

use crate::errors::OptimizerError;
use crate::nn::ParamStore;
use crate::nn::optimizer::{
    AdamRule, AnyRule, GradientDescentRule, LearningRule, MomentumRule, RMSPropRule,
};
use crate::tensor::Tensor;

fn all_rules() -> Vec<Box<dyn LearningRule>> {
    vec![
        Box::new(GradientDescentRule::new(0.1).unwrap()),
        Box::new(MomentumRule::new(0.1, 0.9).unwrap()),
        Box::new(RMSPropRule::new(0.1, 0.9).unwrap()),
        Box::new(AdamRule::new(0.1, 0.9, 0.99).unwrap()),
    ]
}

#[test]
fn test_rules_as_trait_objects() {
    let names: Vec<_> = all_rules().iter().map(|rule| rule.name()).collect();
    assert_eq!(
        names,
        ["GradientDescentRule", "MomentumRule", "RMSPropRule", "AdamRule"]
    );
    for rule in all_rules() {
        assert_eq!(rule.learning_rate(), 0.1);
    }
}

#[test]
fn test_state_machine_uninitialised_to_ready() {
    let store = ParamStore::new();
    store.parameter(&Tensor::ones(&[2, 2]));
    store.parameter(&Tensor::ones(&[3]));

    for mut rule in all_rules() {
        // UNINITIALISED：update/reset 均报错
        assert!(!rule.is_initialised());
        assert_eq!(
            rule.update(&[Tensor::ones(&[2, 2]), Tensor::ones(&[3])]),
            Err(OptimizerError::NotInitialised(rule.name().to_string()))
        );
        assert_eq!(
            rule.reset(),
            Err(OptimizerError::NotInitialised(rule.name().to_string()))
        );

        // READY：update/reset 可任意交替调用
        rule.initialise(&store.parameters());
        assert!(rule.is_initialised());
        for _ in 0..3 {
            rule.update(&[Tensor::ones(&[2, 2]), Tensor::ones(&[3])])
                .unwrap();
            rule.reset().unwrap();
            assert!(rule.is_initialised());
            assert_eq!(rule.params().len(), 2);
        }
    }
}

#[test]
fn test_every_rule_moves_against_the_gradient() {
    for mut rule in all_rules() {
        let store = ParamStore::new();
        let w = store.parameter(&Tensor::new(&[0., 0.], &[2]));
        rule.initialise(&store.parameters());

        rule.update(&[Tensor::new(&[1., -1.], &[2])]).unwrap();
        let value = w.value().to_vec();
        assert!(value[0] < 0., "{}: {:?}", rule.name(), value);
        assert!(value[1] > 0., "{}: {:?}", rule.name(), value);
    }
}

#[test]
fn test_every_rule_rejects_mismatched_gradients() {
    for mut rule in all_rules() {
        let store = ParamStore::new();
        let w = store.parameter(&Tensor::ones(&[2]));
        rule.initialise(&store.parameters());

        let result = rule.update(&[Tensor::ones(&[3])]);
        assert!(
            matches!(result, Err(OptimizerError::ShapeMismatch { .. })),
            "{}",
            rule.name()
        );
        let result = rule.update(&[Tensor::ones(&[2]), Tensor::ones(&[2])]);
        assert!(
            matches!(result, Err(ref e) if e.is_count_mismatch()),
            "{}",
            rule.name()
        );
        assert_eq!(w.value(), Tensor::ones(&[2]));
    }
}

#[test]
fn test_any_rule_holds_every_variant() {
    let rules: Vec<AnyRule> = vec![
        GradientDescentRule::new_default().into(),
        MomentumRule::new_default().into(),
        RMSPropRule::new_default().into(),
        AdamRule::new_default().into(),
    ];
    for mut rule in rules {
        let store = ParamStore::new();
        store.parameter(&Tensor::ones(&[1]));
        rule.initialise(&store.parameters());
        rule.update(&[Tensor::ones(&[1])]).unwrap();
        rule.reset().unwrap();
        assert_eq!(rule.learning_rate(), 1e-3);
    }
}

#[test]
fn test_empty_parameter_set() {
    for mut rule in all_rules() {
        rule.initialise(&[]);
        assert!(rule.is_initialised());
        rule.update(&[]).unwrap();
        rule.reset().unwrap();
    }
}

#[test]
fn test_same_param_bound_twice_is_updated_twice() {
    // 同一参数出现两次：每个位置各有一份累积量，每步被更新两次
    // lr=0.1, μ=0.9, θ=1, g=1:
    //   第1步：两份速度均为 -0.1，θ = 1 - 2 * 0.1 = 0.8
    //   第2步：两份速度均为 -0.19，θ = 0.8 - 2 * 0.19 = 0.42
    let store = ParamStore::new();
    let w = store.parameter(&Tensor::new(&[1.], &[1]));
    let mut rule = MomentumRule::new(0.1, 0.9).unwrap();
    rule.initialise(&[w.clone(), w.clone()]);
    assert_eq!(rule.velocities().len(), 2);

    rule.update(&[Tensor::new(&[1.], &[1]), Tensor::new(&[1.], &[1])])
        .unwrap();
    assert_abs_diff_eq!(w.value(), Tensor::new(&[0.8], &[1]), epsilon = 1e-6);
    for velocity in rule.velocities() {
        assert_abs_diff_eq!(*velocity, Tensor::new(&[-0.1], &[1]), epsilon = 1e-6);
    }

    rule.update(&[Tensor::new(&[1.], &[1]), Tensor::new(&[1.], &[1])])
        .unwrap();
    assert_abs_diff_eq!(w.value(), Tensor::new(&[0.42], &[1]), epsilon = 1e-6);
    for velocity in rule.velocities() {
        assert_abs_diff_eq!(*velocity, Tensor::new(&[-0.19], &[1]), epsilon = 1e-6);
    }

    // 两个位置的速度彼此独立：只给第二个位置梯度
    rule.reset().unwrap();
    rule.update(&[Tensor::zeros(&[1]), Tensor::new(&[1.], &[1])])
        .unwrap();
    assert_eq!(rule.velocities()[0], Tensor::zeros(&[1]));
    assert_abs_diff_eq!(rule.velocities()[1], Tensor::new(&[-0.1], &[1]), epsilon = 1e-6);
    assert_abs_diff_eq!(w.value(), Tensor::new(&[0.32], &[1]), epsilon = 1e-6);
}

#[test]
fn test_every_rule_survives_same_param_bound_twice() {
    for mut rule in all_rules() {
        let store = ParamStore::new();
        let w = store.parameter(&Tensor::new(&[0., 0.], &[2]));
        rule.initialise(&[w.clone(), w.clone()]);

        for _ in 0..3 {
            rule.update(&[Tensor::new(&[1., -1.], &[2]), Tensor::new(&[1., -1.], &[2])])
                .unwrap();
        }
        let value = w.value().to_vec();
        assert!(value[0] < 0. && value[1] > 0., "{}: {:?}", rule.name(), value);
        assert!(w.value().is_finite());
    }
}
