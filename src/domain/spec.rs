//! GPU specification table.
//!
//! Maps GPU model names to their compute throughput and memory so prices can
//! be compared on a cost-performance basis. Lookups go through an explicit
//! canonicalization step instead of raw string equality:
//!
//! 1. The key is trimmed, uppercased, every run of whitespace, `-` or `_`
//!    becomes one space, and leading `NVIDIA`/`GEFORCE` tokens are dropped.
//! 2. The canonical key is matched against entry names, then registered aliases.
//! 3. A `<MODEL> <N>GB` key resolves to `<MODEL>` when that entry has exactly
//!    `N` GB of memory.
//!
//! Anything else is an unknown model. There is no substring matching, so
//! `A100-40GB` never silently collapses into `A100`.
//!
//! # Examples
//!
//! ```
//! use gpuarb::domain::spec::SpecTable;
//!
//! let table = SpecTable::builtin();
//!
//! assert_eq!(table.lookup("a100-80gb").unwrap().model(), "A100");
//! assert_eq!(table.lookup("A100 40GB").unwrap().model(), "A100-40GB");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{DomainError, RecordError};

/// Floating-point precision used to pick a throughput rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Single precision (default).
    #[default]
    Fp32,
    /// Half precision.
    Fp16,
    /// Tensor-core throughput (with sparsity where the vendor quotes it).
    Tensor,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fp32 => "fp32",
            Self::Fp16 => "fp16",
            Self::Tensor => "tensor",
        };
        f.write_str(name)
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fp32" => Ok(Self::Fp32),
            "fp16" => Ok(Self::Fp16),
            "tensor" => Ok(Self::Tensor),
            other => Err(format!(
                "unknown precision '{other}' (expected fp32, fp16 or tensor)"
            )),
        }
    }
}

/// Throughput ratings in TFLOPs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub fp32: f64,
    pub fp16: f64,
    pub tensor: f64,
}

impl Throughput {
    #[must_use]
    pub const fn new(fp32: f64, fp16: f64, tensor: f64) -> Self {
        Self { fp32, fp16, tensor }
    }

    #[must_use]
    pub fn at(&self, precision: Precision) -> f64 {
        match precision {
            Precision::Fp32 => self.fp32,
            Precision::Fp16 => self.fp16,
            Precision::Tensor => self.tensor,
        }
    }
}

/// Coarse performance class by FP32 throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// At least 50 TFLOPs FP32.
    HighEnd,
    /// 15 to 50 TFLOPs FP32.
    MidRange,
    /// Below 15 TFLOPs FP32.
    Entry,
}

impl PerformanceTier {
    /// Classify an FP32 throughput rating.
    #[must_use]
    pub fn from_fp32(tflops: f64) -> Self {
        if tflops >= 50.0 {
            Self::HighEnd
        } else if tflops >= 15.0 {
            Self::MidRange
        } else {
            Self::Entry
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HighEnd => "high-end",
            Self::MidRange => "mid-range",
            Self::Entry => "entry",
        };
        f.write_str(name)
    }
}

/// Static reference data for one GPU model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuSpec {
    model: String,
    throughput: Throughput,
    memory_gb: u32,
    architecture: String,
}

impl GpuSpec {
    /// Create a validated spec entry.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSpec`] for a blank model name or any
    /// non-positive (or non-finite) throughput rating.
    pub fn try_new(
        model: impl Into<String>,
        throughput: Throughput,
        memory_gb: u32,
        architecture: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let model = model.into();
        if canonicalize(&model).is_empty() {
            return Err(DomainError::InvalidSpec {
                model,
                reason: "model name is empty".to_string(),
            });
        }
        for (label, value) in [
            ("fp32", throughput.fp32),
            ("fp16", throughput.fp16),
            ("tensor", throughput.tensor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::InvalidSpec {
                    model,
                    reason: format!("{label} throughput must be positive, got {value}"),
                });
            }
        }
        Ok(Self {
            model,
            throughput,
            memory_gb,
            architecture: architecture.into(),
        })
    }

    /// Canonical display name (e.g. `A100`, `RTX 4090`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn throughput(&self) -> Throughput {
        self.throughput
    }

    /// Throughput rating at the given precision, in TFLOPs.
    #[must_use]
    pub fn throughput_rating(&self, precision: Precision) -> f64 {
        self.throughput.at(precision)
    }

    #[must_use]
    pub fn memory_gb(&self) -> u32 {
        self.memory_gb
    }

    #[must_use]
    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    #[must_use]
    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_fp32(self.throughput.fp32)
    }
}

// model, fp32, fp16, tensor, memory_gb, architecture
const BUILTIN_SPECS: &[(&str, f64, f64, f64, u32, &str)] = &[
    ("H100", 51.2, 989.0, 1979.0, 80, "Hopper"),
    ("A100", 19.5, 312.0, 624.0, 80, "Ampere"),
    ("A100-40GB", 19.5, 312.0, 624.0, 40, "Ampere"),
    ("V100", 15.7, 125.0, 125.0, 32, "Volta"),
    ("A10", 31.2, 125.0, 250.0, 24, "Ampere"),
    ("T4", 8.1, 65.0, 130.0, 16, "Turing"),
    ("L40", 90.5, 181.0, 362.0, 48, "Ada Lovelace"),
    ("RTX 4090", 82.6, 165.2, 661.0, 24, "Ada Lovelace"),
    ("RTX 3090", 35.6, 71.0, 142.0, 24, "Ampere"),
    ("RTX 3080", 29.8, 59.5, 119.0, 10, "Ampere"),
    ("RTX 6000 Ada", 91.1, 182.0, 728.0, 48, "Ada Lovelace"),
];

// alias, target model
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("A100 SXM", "A100"),
    ("A100 SXM4", "A100"),
    ("A100 SXM4 80GB", "A100"),
    ("A100 PCIE", "A100-40GB"),
    ("A100 PCIE 40GB", "A100-40GB"),
    ("H100 SXM", "H100"),
    ("H100 SXM5", "H100"),
    ("RTX6000 ADA", "RTX 6000 Ada"),
];

/// Vendor and brand tokens dropped from the front of a model key.
const VENDOR_PREFIXES: &[&str] = &["NVIDIA", "GEFORCE"];

/// Canonical lookup key for a GPU model name.
///
/// ```
/// use gpuarb::domain::spec::canonicalize;
///
/// assert_eq!(canonicalize("nvidia_a100-80gb"), "A100 80GB");
/// assert_eq!(canonicalize("  RTX   4090 "), "RTX 4090");
/// ```
#[must_use]
pub fn canonicalize(name: &str) -> String {
    let upper = name.to_ascii_uppercase();
    let mut tokens: Vec<&str> = upper
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|token| !token.is_empty())
        .collect();
    while tokens.len() > 1 && VENDOR_PREFIXES.contains(&tokens[0]) {
        tokens.remove(0);
    }
    tokens.join(" ")
}

/// Split `"<BASE> <N>GB"` into `("<BASE>", N)`.
fn split_memory_suffix(key: &str) -> Option<(&str, u32)> {
    let (base, suffix) = key.rsplit_once(' ')?;
    let digits = suffix.strip_suffix("GB")?;
    let memory = digits.parse().ok()?;
    Some((base, memory))
}

/// Lookup table from canonical model keys to [`GpuSpec`] entries.
#[derive(Debug, Clone, Default)]
pub struct SpecTable {
    specs: Vec<GpuSpec>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
}

impl SpecTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table of common data-center and consumer GPUs.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for &(model, fp32, fp16, tensor, memory_gb, architecture) in BUILTIN_SPECS {
            let throughput = Throughput::new(fp32, fp16, tensor);
            if let Ok(spec) = GpuSpec::try_new(model, throughput, memory_gb, architecture) {
                table.insert(spec);
            }
        }
        for &(alias, target) in BUILTIN_ALIASES {
            // Builtin aliases always target builtin entries.
            let _ = table.add_alias(alias, target);
        }
        table
    }

    /// Insert an entry, replacing any entry with the same canonical name.
    pub fn insert(&mut self, spec: GpuSpec) {
        let key = canonicalize(spec.model());
        match self.index.get(&key) {
            Some(&slot) => self.specs[slot] = spec,
            None => {
                self.index.insert(key, self.specs.len());
                self.specs.push(spec);
            }
        }
    }

    /// Register `alias` as another name for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DanglingAlias`] if `target` is not in the table.
    pub fn add_alias(&mut self, alias: &str, target: &str) -> Result<(), DomainError> {
        let slot = self
            .index
            .get(&canonicalize(target))
            .copied()
            .ok_or_else(|| DomainError::DanglingAlias {
                alias: alias.to_string(),
                target: target.to_string(),
            })?;
        self.aliases.insert(canonicalize(alias), slot);
        Ok(())
    }

    /// Resolve a model name to its spec entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownGpuModel`] when no entry, alias or
    /// memory-suffix match exists.
    pub fn lookup(&self, model: &str) -> Result<&GpuSpec, RecordError> {
        let key = canonicalize(model);
        self.resolve(&key)
            .map(|slot| &self.specs[slot])
            .ok_or_else(|| RecordError::UnknownGpuModel {
                model: model.to_string(),
            })
    }

    fn resolve(&self, key: &str) -> Option<usize> {
        if let Some(&slot) = self.index.get(key).or_else(|| self.aliases.get(key)) {
            return Some(slot);
        }
        let (base, memory) = split_memory_suffix(key)?;
        let slot = *self.index.get(base)?;
        (self.specs[slot].memory_gb() == memory).then_some(slot)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GpuSpec> {
        self.specs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
