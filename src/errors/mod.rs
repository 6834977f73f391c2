use thiserror::Error;
mod requirement;
pub use self::requirement::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数{expected_len}不一致")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected_len: usize,
    },
    #[error("随机张量的取值区间非法：[{min}, {max}]")]
    InvalidRandomRange { min: String, max: String },
}

/// 学习规则（优化器）相关的错误
#[derive(Error, Debug, PartialEq)]
pub enum OptimizerError {
    // 构造时检查
    #[error("超参数`{name}`的取值{value}非法，须{requirement}")]
    InvalidHyperparameter {
        name: String,
        value: f32,
        requirement: Requirement,
    },
    /// 更新时检查：梯度数量或某个梯度的形状与参数不符。
    ///
    /// 数量不符时`expected`、`got`均为单元素向量，分别存放参数个数与梯度个数，
    /// `message`为"梯度数量与参数数量不一致"；否则二者为具体形状，`message`指明是第几个梯度。
    /// 两种情况可由[`OptimizerError::is_count_mismatch`]区分。
    #[error("形状不匹配：预期{expected:?}，实际得到{got:?}（{message}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("{0}尚未调用`initialise`绑定参数")]
    NotInitialised(String),
}

/// 梯度数量与参数数量不一致时`ShapeMismatch`携带的消息
pub(crate) const COUNT_MISMATCH_MESSAGE: &str = "梯度数量与参数数量不一致";

impl OptimizerError {
    /// 是否为梯度数量（而非某个梯度的形状）与参数不符
    pub fn is_count_mismatch(&self) -> bool {
        matches!(
            self,
            OptimizerError::ShapeMismatch { message, .. } if message == COUNT_MISMATCH_MESSAGE
        )
    }
}
