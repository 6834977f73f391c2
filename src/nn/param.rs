/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 参数仓库（ParamStore）与参数句柄（Param）
 *
 * 训练循环持有 ParamStore 并决定各参数的生命周期；
 * 学习规则只持有 Param 句柄，通过句柄原地修改参数值，从不重新分配或改变其形状。
 */

use crate::errors::OptimizerError;
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// 参数在仓库中的位置（按注册顺序从0开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub usize);

/// 参数仓库句柄
///
/// # 设计原则
/// - 是 `Rc<RefCell<Vec<Tensor>>>` 的薄封装
/// - Clone 语义：多个 ParamStore 引用同一份参数存储
/// - 注册参数后返回的 Param 自动持有存储引用
///
/// # 使用示例
/// ```
/// use only_rules::nn::ParamStore;
/// use only_rules::tensor::Tensor;
///
/// let store = ParamStore::new();
/// let w = store.parameter(&Tensor::zeros(&[2, 3]));
/// let b = store.parameter(&Tensor::zeros(&[3]));
/// assert_eq!(store.len(), 2);
/// assert_eq!(w.shape(), vec![2, 3]);
/// assert_eq!(b.shape(), vec![3]);
/// ```
#[derive(Clone, Default)]
pub struct ParamStore {
    tensors: Rc<RefCell<Vec<Tensor>>>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以`value`为初值注册一个新参数，返回其句柄
    pub fn parameter(&self, value: &Tensor) -> Param {
        let mut tensors = self.tensors.borrow_mut();
        let id = ParamId(tensors.len());
        tensors.push(value.clone());
        Param::new(id, Rc::clone(&self.tensors))
    }

    /// 按注册顺序返回所有参数的句柄
    pub fn parameters(&self) -> Vec<Param> {
        (0..self.len())
            .map(|i| Param::new(ParamId(i), Rc::clone(&self.tensors)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tensors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ParamStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamStore")
            .field("len", &self.len())
            .finish()
    }
}

/// 参数句柄 - 携带仓库引用，可读取或原地修改对应参数
///
/// Clone 语义（非 Copy），但开销极低（Rc clone）；
/// 两个句柄指向同一仓库的同一位置时，二者互为别名。
#[derive(Clone)]
pub struct Param {
    id: ParamId,
    store: Rc<RefCell<Vec<Tensor>>>,
}

impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Param").field("id", &self.id).finish()
    }
}

impl Param {
    const fn new(id: ParamId, store: Rc<RefCell<Vec<Tensor>>>) -> Self {
        Self { id, store }
    }

    pub const fn id(&self) -> ParamId {
        self.id
    }

    /// 参数的形状（注册后不再改变）
    pub fn shape(&self) -> Vec<usize> {
        self.with_value(|value| value.shape().to_vec())
    }

    /// 获取参数当前值的拷贝
    pub fn value(&self) -> Tensor {
        self.with_value(Tensor::clone)
    }

    /// 用`value`覆盖参数当前值（原地拷贝，形状必须一致）
    pub fn set_value(&self, value: &Tensor) -> Result<(), OptimizerError> {
        self.with_value_mut(|current| {
            if !current.is_same_shape(value) {
                return Err(OptimizerError::ShapeMismatch {
                    expected: current.shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("参数{:?}的新值形状与原形状不一致", self.id),
                });
            }
            current.data_mut().assign(value.data());
            Ok(())
        })
    }

    /// 判断两个句柄是否指向同一存储中的同一参数
    pub fn is_same_param(&self, other: &Param) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.store, &other.store)
    }

    pub(crate) fn with_value<R>(&self, f: impl FnOnce(&Tensor) -> R) -> R {
        f(&self.store.borrow()[self.id.0])
    }

    pub(crate) fn with_value_mut<R>(&self, f: impl FnOnce(&mut Tensor) -> R) -> R {
        f(&mut self.store.borrow_mut()[self.id.0])
    }
}
