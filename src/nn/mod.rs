/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 负责神经网络（neural network）训练中的参数及其学习规则
 */

mod param;
pub mod optimizer;

pub use param::{Param, ParamId, ParamStore};
