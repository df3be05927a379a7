use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 数值容差配置
///
/// 比较 `|a - b| <= absolute + relative * max(|a|, |b|)`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// 绝对容差（接近0的值）
    pub absolute: f32,

    /// 精确运算族的相对容差
    pub relative: f32,

    /// Est运算族的相对容差
    pub estimate_relative: f32,
}

impl_default!(ToleranceConfig {
    absolute: 1e-6,
    relative: 1e-5,
    estimate_relative: 1.0 / 2048.0,
});

impl ToleranceConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("absolute", self.absolute),
            ("relative", self.relative),
            ("estimate_relative", self.estimate_relative),
        ] {
            if !value.is_finite() || value < 0.0 || value >= 1.0 {
                return Err(ConfigError::ValidationError(format!(
                    "tolerance.{} must be in [0, 1), got {}",
                    name, value
                )));
            }
        }
        if self.estimate_relative < self.relative {
            return Err(ConfigError::ValidationError(
                "tolerance.estimate_relative must not be tighter than tolerance.relative"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// 误差上限
    #[inline]
    pub fn bound(&self, a: f32, b: f32, relative: f32) -> f32 {
        self.absolute + relative * a.abs().max(b.abs())
    }

    /// 两个值在精确容差内是否相等（NaN仅与NaN相等）
    pub fn close(&self, a: f32, b: f32) -> bool {
        if a.is_nan() || b.is_nan() {
            return a.is_nan() && b.is_nan();
        }
        a == b || (a - b).abs() <= self.bound(a, b, self.relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close() {
        let t = ToleranceConfig::default();
        assert!(t.close(1.0, 1.000_005));
        assert!(!t.close(1.0, 1.001));
        assert!(t.close(f32::NAN, f32::NAN));
        assert!(!t.close(f32::NAN, 0.0));
        assert!(t.close(f32::INFINITY, f32::INFINITY));
    }

    #[test]
    fn test_validation() {
        let mut t = ToleranceConfig::default();
        assert!(t.validate().is_ok());
        t.relative = -1.0;
        assert!(t.validate().is_err());
        t.relative = 1e-2;
        assert!(t.validate().is_err());
    }
}
