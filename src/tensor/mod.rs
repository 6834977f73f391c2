use ndarray::{Array, ArrayD, IxDyn};
use rand::distributions::{Distribution, Uniform};

use crate::errors::TensorError;

mod ops {
    pub mod eq;
}

mod property;


/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：学习规则中的参数、梯度和各类累积量都是张量，且各自的形状在创建后不再改变。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等（`shape`为`[]`时乘积为1），否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        let expected_len = shape.iter().product::<usize>();
        assert!(
            data.len() == expected_len,
            "{}",
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected_len,
            }
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .unwrap_or_else(|e| panic!("{}", e));
        Tensor { data }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个全一张量
    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: ArrayD::ones(IxDyn(shape)),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Tensor {
        Self::new_random_with_rng(min, max, shape, &mut rand::thread_rng())
    }

    /// 同`new_random`，但使用指定的随机数生成器（用于可复现的测试）
    pub fn new_random_with_rng<R: rand::Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        assert!(
            min <= max,
            "{}",
            TensorError::InvalidRandomRange {
                min: min.to_string(),
                max: max.to_string(),
            }
        );
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Tensor::new(&data, shape)
    }

    /// 创建一个与`other`形状相同、元素全为`value`的张量
    pub fn full_like(other: &Tensor, value: f32) -> Tensor {
        Tensor {
            data: ArrayD::from_elem(other.data.raw_dim(), value),
        }
    }
}

// 供学习规则做逐元素运算的底层数据访问
impl Tensor {
    pub(crate) fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ArrayD<f32> {
        &mut self.data
    }
}
