use std::fmt::{self, Display};

/// 超参数须满足的取值范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// 有限且严格大于0
    Positive,
    /// 位于[0, 1]闭区间
    UnitInterval,
}
impl Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requirement = match self {
            Requirement::Positive => "为有限正数",
            Requirement::UnitInterval => "位于[0, 1]闭区间内",
        };
        write!(f, "{}", requirement)
    }
}

impl Requirement {
    /// 判断`value`是否满足该取值范围（NaN与无穷一律不满足）
    pub fn is_satisfied_by(&self, value: f32) -> bool {
        match self {
            Requirement::Positive => value.is_finite() && value > 0.0,
            Requirement::UnitInterval => (0.0..=1.0).contains(&value),
        }
    }
}
