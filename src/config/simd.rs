use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 后端诊断配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimdConfig {
    /// 要求编译进硬件SIMD后端；为真且当前为标量回退时，诊断报告失败
    pub require_hardware: bool,

    /// 等价性检查的随机样本数
    pub equivalence_samples: u32,

    /// 等价性检查的随机种子
    pub equivalence_seed: u64,
}

impl_default!(SimdConfig {
    require_hardware: false,
    equivalence_samples: 256,
    equivalence_seed: 0x5EED_CAFE,
});

impl SimdConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.equivalence_samples == 0 || self.equivalence_samples > 1_000_000 {
            return Err(ConfigError::ValidationError(
                "equivalence_samples must be in 1..=1000000".to_string(),
            ));
        }
        Ok(())
    }
}
