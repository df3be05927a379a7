/// CPU特性检测模块
///
/// 运行时检测CPU支持的指令集，仅用于诊断报告；
/// 后端在编译期确定，检测结果不会改变所使用的后端。

use std::fmt::Write as _;
use std::sync::OnceLock;

/// CPU特性标志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuFeatures {
    // x86/x64特性
    pub sse2: bool,
    pub sse41: bool,
    pub avx: bool,
    pub avx2: bool,
    pub fma: bool,

    // ARM特性
    pub neon: bool,

    // 厂商信息
    pub vendor: CpuVendor,
    pub brand: String,
}

/// CPU厂商
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVendor {
    Intel,
    Amd,
    AppleSilicon,
    Qualcomm,
    Other,
}

impl CpuFeatures {
    /// 检测当前CPU特性
    fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            Self::detect_x86()
        }

        #[cfg(target_arch = "aarch64")]
        {
            Self::detect_aarch64()
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::default()
        }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    fn detect_x86() -> Self {
        Self {
            sse2: is_x86_feature_detected!("sse2"),
            sse41: is_x86_feature_detected!("sse4.1"),
            avx: is_x86_feature_detected!("avx"),
            avx2: is_x86_feature_detected!("avx2"),
            fma: is_x86_feature_detected!("fma"),
            neon: false,
            vendor: Self::vendor_from_brand(&Self::get_cpu_brand()),
            brand: Self::get_cpu_brand(),
        }
    }

    #[cfg(target_arch = "aarch64")]
    fn detect_aarch64() -> Self {
        let brand = Self::get_cpu_brand();
        Self {
            sse2: false,
            sse41: false,
            avx: false,
            avx2: false,
            // aarch64上NEON（含FMA）是强制支持的
            fma: true,
            neon: std::arch::is_aarch64_feature_detected!("neon"),
            vendor: Self::vendor_from_brand(&brand),
            brand,
        }
    }

    /// 通过品牌字符串推断厂商
    fn vendor_from_brand(brand: &str) -> CpuVendor {
        let brand = brand.to_lowercase();
        if brand.contains("intel") {
            CpuVendor::Intel
        } else if brand.contains("amd") {
            CpuVendor::Amd
        } else if brand.contains("apple") {
            CpuVendor::AppleSilicon
        } else if brand.contains("qualcomm") || brand.contains("snapdragon") {
            CpuVendor::Qualcomm
        } else {
            CpuVendor::Other
        }
    }

    fn get_cpu_brand() -> String {
        // 尝试从/proc/cpuinfo读取（Linux）
        #[cfg(target_os = "linux")]
        {
            if let Ok(content) = std::fs::read_to_string("/proc/cpuinfo") {
                for line in content.lines() {
                    if line.starts_with("model name") || line.starts_with("Hardware") {
                        if let Some(name) = line.split(':').nth(1) {
                            return name.trim().to_string();
                        }
                    }
                }
            }
        }

        // macOS可以使用sysctl
        #[cfg(target_os = "macos")]
        {
            use std::process::Command;
            if let Ok(output) = Command::new("sysctl")
                .arg("-n")
                .arg("machdep.cpu.brand_string")
                .output()
            {
                if let Ok(brand) = String::from_utf8(output.stdout) {
                    return brand.trim().to_string();
                }
            }
        }

        "Unknown".to_string()
    }
}

impl Default for CpuFeatures {
    fn default() -> Self {
        Self {
            sse2: false,
            sse41: false,
            avx: false,
            avx2: false,
            fma: false,
            neon: false,
            vendor: CpuVendor::Other,
            brand: "Unknown".to_string(),
        }
    }
}

/// 全局CPU特性缓存
static CPU_FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// 检测CPU特性（缓存结果）
pub fn detect_cpu_features() -> &'static CpuFeatures {
    CPU_FEATURES.get_or_init(CpuFeatures::detect)
}

/// 生成CPU信息的多行描述，供日志与诊断报告使用
pub fn describe_cpu() -> String {
    let features = detect_cpu_features();
    let mut out = String::new();
    let _ = writeln!(out, "Vendor: {:?}", features.vendor);
    let _ = writeln!(out, "Brand: {}", features.brand);

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        let _ = writeln!(out, "SSE2: {}", features.sse2);
        let _ = writeln!(out, "SSE4.1: {}", features.sse41);
        let _ = writeln!(out, "AVX: {}", features.avx);
        let _ = writeln!(out, "AVX2: {}", features.avx2);
        let _ = writeln!(out, "FMA: {}", features.fma);
    }

    #[cfg(target_arch = "aarch64")]
    {
        let _ = writeln!(out, "NEON: {}", features.neon);
    }

    let _ = write!(out, "Compiled backend: {}", crate::BackendKind::active().name());
    out
}
