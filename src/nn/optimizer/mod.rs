/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 学习规则（优化器）模块：梯度下降、动量、RMSProp、Adam
 */

mod adam;
mod base;
mod config;
mod gradient_descent;
mod momentum;
mod rms_prop;

pub use adam::AdamRule;
pub use base::{EPSILON, LearningRule};
pub use config::{AnyRule, RuleConfig};
pub use gradient_descent::GradientDescentRule;
pub use momentum::MomentumRule;
pub use rms_prop::RMSPropRule;
