//! 后端诊断
//!
//! 报告编译进来的后端与CPU特性，并对比当前后端与标量回退的数值结果。
//! 随机样本来自调用方持有的 `StdRng`（由配置中的种子构造），不存在全局随机数生成器。

use std::fmt;

use game_math_simd::{
    describe_cpu, detect_cpu_features, ActiveBackend, BackendKind, CpuFeatures, LaneMatrix,
    ScalarBackend, SimdBackend,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, MathConfig, ToleranceConfig};
use crate::error::{MathError, MathResult};

/// 后端报告
#[derive(Debug, Clone)]
pub struct BackendReport {
    /// 编译进来的后端
    pub active: BackendKind,
    /// 运行时检测到的CPU特性
    pub features: CpuFeatures,
    /// `multiply_add` 是否为单次舍入
    pub fused_multiply_add: bool,
    /// 可读的CPU描述
    pub cpu: String,
}

impl fmt::Display for BackendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backend: {}", self.active)?;
        writeln!(f, "Hardware SIMD: {}", self.active.is_hardware())?;
        writeln!(f, "Fused multiply-add: {}", self.fused_multiply_add)?;
        write!(f, "{}", self.cpu)
    }
}

/// 收集当前后端信息
pub fn backend_report() -> BackendReport {
    let active = BackendKind::active();
    BackendReport {
        active,
        features: detect_cpu_features().clone(),
        fused_multiply_add: active.fused_multiply_add(),
        cpu: describe_cpu(),
    }
}

/// 单个运算的对比结果
#[derive(Debug, Clone, PartialEq)]
pub struct OperationReport {
    pub operation: &'static str,
    /// 最大绝对误差
    pub max_error: f32,
    /// 最大误差与其容差之比，不超过1为通过
    pub worst_ratio: f32,
}

/// 等价性检查结果
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceReport {
    pub backend: BackendKind,
    pub samples: u32,
    pub seed: u64,
    pub operations: Vec<OperationReport>,
}

impl EquivalenceReport {
    /// 误差最大的运算
    pub fn worst(&self) -> Option<&OperationReport> {
        self.operations
            .iter()
            .max_by(|a, b| a.worst_ratio.total_cmp(&b.worst_ratio))
    }
}

/// 参与对比的通道运算
#[derive(Debug, Clone, Copy)]
enum Probe {
    Add,
    Multiply,
    Divide,
    MultiplyAdd,
    Sqrt,
    ReciprocalSqrt,
    ReciprocalSqrtEst,
    Dot4,
    Cross3,
    Sin,
    Cos,
    Acos,
    Atan2,
    Exp2,
    Log2,
}

impl Probe {
    const ALL: [Probe; 15] = [
        Probe::Add,
        Probe::Multiply,
        Probe::Divide,
        Probe::MultiplyAdd,
        Probe::Sqrt,
        Probe::ReciprocalSqrt,
        Probe::ReciprocalSqrtEst,
        Probe::Dot4,
        Probe::Cross3,
        Probe::Sin,
        Probe::Cos,
        Probe::Acos,
        Probe::Atan2,
        Probe::Exp2,
        Probe::Log2,
    ];

    fn name(self) -> &'static str {
        match self {
            Probe::Add => "add",
            Probe::Multiply => "mul",
            Probe::Divide => "div",
            Probe::MultiplyAdd => "multiply_add",
            Probe::Sqrt => "sqrt",
            Probe::ReciprocalSqrt => "reciprocal_sqrt",
            Probe::ReciprocalSqrtEst => "reciprocal_sqrt_est",
            Probe::Dot4 => "dot4",
            Probe::Cross3 => "cross3",
            Probe::Sin => "sin",
            Probe::Cos => "cos",
            Probe::Acos => "acos",
            Probe::Atan2 => "atan2",
            Probe::Exp2 => "exp2",
            Probe::Log2 => "log2",
        }
    }

    /// 输入取值范围，避开相消与定义域边界
    fn domain(self) -> (f32, f32) {
        match self {
            Probe::Add | Probe::Dot4 | Probe::Cross3 | Probe::Acos => (-1.0, 1.0),
            Probe::Multiply | Probe::Atan2 => (-4.0, 4.0),
            Probe::Divide | Probe::MultiplyAdd => (0.5, 2.0),
            Probe::Sqrt => (0.0, 100.0),
            Probe::ReciprocalSqrt | Probe::ReciprocalSqrtEst | Probe::Log2 => (0.01, 100.0),
            Probe::Sin | Probe::Cos => (-std::f32::consts::PI, std::f32::consts::PI),
            Probe::Exp2 => (-10.0, 10.0),
        }
    }

    fn estimate(self) -> bool {
        matches!(self, Probe::ReciprocalSqrtEst)
    }

    fn eval<B: SimdBackend>(self, a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
        let (x, y) = (B::from_array(a), B::from_array(b));
        let r = match self {
            Probe::Add => B::add(x, y),
            Probe::Multiply => B::mul(x, y),
            Probe::Divide => B::div(x, y),
            Probe::MultiplyAdd => B::multiply_add(x, y, x),
            Probe::Sqrt => B::sqrt(x),
            Probe::ReciprocalSqrt => B::reciprocal_sqrt(x),
            Probe::ReciprocalSqrtEst => B::reciprocal_sqrt_est(x),
            Probe::Dot4 => B::dot4(x, y),
            Probe::Cross3 => B::cross3(x, y),
            Probe::Sin => B::sin(x),
            Probe::Cos => B::cos(x),
            Probe::Acos => B::acos(x),
            Probe::Atan2 => B::atan2(x, y),
            Probe::Exp2 => B::exp2(x),
            Probe::Log2 => B::log2(x),
        };
        B::to_array(r)
    }
}

/// 累计单个运算的误差
struct Accumulator {
    operation: &'static str,
    relative: f32,
    max_error: f32,
    worst_ratio: f32,
    worst_tolerance: f32,
}

impl Accumulator {
    fn new(operation: &'static str, relative: f32) -> Self {
        Self {
            operation,
            relative,
            max_error: 0.0,
            worst_ratio: 0.0,
            worst_tolerance: 0.0,
        }
    }

    fn record(&mut self, tolerance: &ToleranceConfig, actual: &[f32], expected: &[f32]) {
        for (&a, &e) in actual.iter().zip(expected) {
            let error = if a == e || (a.is_nan() && e.is_nan()) {
                0.0
            } else {
                (a - e).abs()
            };
            let bound = tolerance.bound(a, e, self.relative);
            let ratio = if error.is_nan() { f32::INFINITY } else { error / bound };
            self.max_error = self.max_error.max(error);
            if ratio > self.worst_ratio {
                self.worst_ratio = ratio;
                self.worst_tolerance = bound;
            }
        }
    }

    fn finish(self) -> MathResult<OperationReport> {
        if self.worst_ratio > 1.0 {
            tracing::warn!(
                target: "game_math::diagnostics",
                operation = self.operation,
                error = self.max_error,
                "Backend mismatch"
            );
            return Err(MathError::BackendMismatch {
                operation: self.operation,
                error: self.max_error,
                tolerance: self.worst_tolerance,
            });
        }
        Ok(OperationReport {
            operation: self.operation,
            max_error: self.max_error,
            worst_ratio: self.worst_ratio,
        })
    }
}

fn sample_lanes(rng: &mut StdRng, (lo, hi): (f32, f32)) -> [f32; 4] {
    [
        rng.gen_range(lo..hi),
        rng.gen_range(lo..hi),
        rng.gen_range(lo..hi),
        rng.gen_range(lo..hi),
    ]
}

/// 对角占优的随机矩阵，保证可逆且条件数良好
fn sample_matrix(rng: &mut StdRng) -> [[f32; 4]; 4] {
    let mut m = [[0.0; 4]; 4];
    for (i, row) in m.iter_mut().enumerate() {
        *row = sample_lanes(rng, (-1.0, 1.0));
        row[i] += 4.0;
    }
    m
}

fn flatten(m: &[[f32; 4]; 4]) -> &[f32] {
    bytemuck::cast_slice(m)
}

fn multiply<B: SimdBackend>(a: &[[f32; 4]; 4], b: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
    B::matrix_multiply(&B::load_float4x4(a), &B::load_float4x4(b)).to_array()
}

fn inverse<B: SimdBackend>(m: &[[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let (inverse, _): (LaneMatrix<B>, f32) = B::matrix_inverse(&B::load_float4x4(m));
    inverse.to_array()
}

/// 对比当前后端与标量回退
///
/// # 参数
///
/// * `config` - 使用 `simd.equivalence_samples` / `simd.equivalence_seed` 与 `tolerance`
///
/// # 返回
///
/// 全部运算在容差内时返回各运算的误差统计；否则返回第一个超差运算的
/// [`MathError::BackendMismatch`]。`simd.require_hardware` 为真而当前是标量回退时返回配置错误。
pub fn check_backend_equivalence(config: &MathConfig) -> MathResult<EquivalenceReport> {
    config.simd.validate()?;
    config.tolerance.validate()?;

    let backend = BackendKind::active();
    if config.simd.require_hardware && !backend.is_hardware() {
        tracing::warn!(
            target: "game_math::diagnostics",
            "Hardware SIMD required but the scalar fallback is compiled in"
        );
        return Err(ConfigError::ValidationError(
            "simd.require_hardware is set but the scalar fallback is compiled in".to_string(),
        )
        .into());
    }

    let samples = config.simd.equivalence_samples;
    let seed = config.simd.equivalence_seed;
    let tolerance = &config.tolerance;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut operations = Vec::with_capacity(Probe::ALL.len() + 2);

    for probe in Probe::ALL {
        let relative = if probe.estimate() {
            tolerance.estimate_relative
        } else {
            tolerance.relative
        };
        let mut acc = Accumulator::new(probe.name(), relative);
        for _ in 0..samples {
            let a = sample_lanes(&mut rng, probe.domain());
            let b = sample_lanes(&mut rng, probe.domain());
            let actual = probe.eval::<ActiveBackend>(a, b);
            let expected = probe.eval::<ScalarBackend>(a, b);
            acc.record(tolerance, &actual, &expected);
        }
        operations.push(acc.finish()?);
    }

    let mut mul = Accumulator::new("matrix_multiply", tolerance.relative);
    let mut inv = Accumulator::new("matrix_inverse", tolerance.relative);
    for _ in 0..samples {
        let a = sample_matrix(&mut rng);
        let b = sample_matrix(&mut rng);
        mul.record(
            tolerance,
            flatten(&multiply::<ActiveBackend>(&a, &b)),
            flatten(&multiply::<ScalarBackend>(&a, &b)),
        );
        inv.record(
            tolerance,
            flatten(&inverse::<ActiveBackend>(&a)),
            flatten(&inverse::<ScalarBackend>(&a)),
        );
    }
    operations.push(mul.finish()?);
    operations.push(inv.finish()?);

    let report = EquivalenceReport {
        backend,
        samples,
        seed,
        operations,
    };
    if let Some(worst) = report.worst() {
        tracing::info!(
            target: "game_math::diagnostics",
            backend = %backend,
            samples,
            worst = worst.operation,
            ratio = worst.worst_ratio,
            "Backend equivalence check passed"
        );
    }
    Ok(report)
}
