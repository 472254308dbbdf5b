use std::fmt;
use std::path::PathBuf;

use clap::Parser;

use crate::screens::MAX_ANSWER_LEN;

/// Largest factor accepted in either list.
pub const MAX_FACTOR: u32 = 999;

/// Errors in drill configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A factor list (`"tables"` or `"factors"`) has no members.
    EmptyRange(&'static str),
    /// `num_problems` is zero.
    NoProblems,
    /// A factor list could not be parsed.
    InvalidFactors(String),
    /// A factor exceeds [`MAX_FACTOR`].
    FactorTooLarge(u32),
    /// The largest product has more digits than an answer may hold.
    ProductTooLarge(u64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyRange(name) => write!(f, "{name} range is empty"),
            ConfigError::NoProblems => write!(f, "number of problems must be at least 1"),
            ConfigError::InvalidFactors(s) => write!(
                f,
                "invalid factor list {s:?} (expected e.g. \"2,3,4\", \"1..=12\" or \"1..13\")"
            ),
            ConfigError::FactorTooLarge(n) => {
                write!(f, "factor {n} is larger than {MAX_FACTOR}")
            }
            ConfigError::ProductTooLarge(p) => write!(
                f,
                "largest product {p} does not fit in {MAX_ANSWER_LEN} answer digits"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Session parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillConfig {
    /// First factor of every problem.
    pub tables: Vec<u32>,
    /// Second factor of every problem.
    pub factors: Vec<u32>,
    pub num_problems: usize,
    /// Fixed shuffle seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl DrillConfig {
    pub fn with_tables(mut self, tables: Vec<u32>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_factors(mut self, factors: Vec<u32>) -> Self {
        self.factors = factors;
        self
    }

    pub fn with_num_problems(mut self, n: usize) -> Self {
        self.num_problems = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tables.is_empty() {
            return Err(ConfigError::EmptyRange("tables"));
        }
        if self.factors.is_empty() {
            return Err(ConfigError::EmptyRange("factors"));
        }
        if self.num_problems == 0 {
            return Err(ConfigError::NoProblems);
        }

        let max_table = self.tables.iter().copied().max().unwrap_or(0);
        let max_factor = self.factors.iter().copied().max().unwrap_or(0);
        if let Some(&n) = [max_table, max_factor].iter().find(|&&n| n > MAX_FACTOR) {
            return Err(ConfigError::FactorTooLarge(n));
        }
        let product = u64::from(max_table) * u64::from(max_factor);
        if product >= 10u64.pow(MAX_ANSWER_LEN as u32) {
            return Err(ConfigError::ProductTooLarge(product));
        }
        Ok(())
    }
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            tables: (1..=12).collect(),
            factors: (1..=12).collect(),
            num_problems: 10,
            seed: None,
        }
    }
}

/// Parsed factor list argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factors(pub Vec<u32>);

/// Parses `"2,3,4"`, `"1..=12"`, `"1..13"` or a mix such as `"2,5..=7"`.
///
/// Bounds are checked against [`MAX_FACTOR`] before a range is expanded.
pub fn parse_factors(s: &str) -> Result<Factors, ConfigError> {
    let invalid = || ConfigError::InvalidFactors(s.to_string());
    let bounded = |n: u32| {
        if n > MAX_FACTOR { Err(ConfigError::FactorTooLarge(n)) } else { Ok(n) }
    };
    let mut out = Vec::new();

    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((lo, hi)) = part.split_once("..=") {
            let lo: u32 = lo.trim().parse().map_err(|_| invalid())?;
            let hi: u32 = hi.trim().parse().map_err(|_| invalid())?;
            out.extend(lo..=bounded(hi)?);
        } else if let Some((lo, hi)) = part.split_once("..") {
            let lo: u32 = lo.trim().parse().map_err(|_| invalid())?;
            let hi: u32 = hi.trim().parse().map_err(|_| invalid())?;
            if hi > lo {
                bounded(hi - 1)?;
            }
            out.extend(lo..hi);
        } else {
            out.push(bounded(part.parse().map_err(|_| invalid())?)?);
        }
    }

    out.sort_unstable();
    out.dedup();
    Ok(Factors(out))
}

#[derive(Parser, Debug)]
#[command(
    name = "flashloop-drill",
    version,
    about = "Timed multiplication flash-card drill"
)]
pub struct Cli {
    /// Number of problems in the session
    #[arg(long = "problems", default_value = "10", value_name = "N")]
    pub problems: usize,

    /// First factors, e.g. "2,3,4" or "1..=12"
    #[arg(long = "tables", value_name = "LIST", value_parser = parse_factors)]
    pub tables: Option<Factors>,

    /// Second factors, e.g. "1..=12"
    #[arg(long = "factors", value_name = "LIST", value_parser = parse_factors)]
    pub factors: Option<Factors>,

    /// Seed for a reproducible problem order
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long = "log", value_name = "FILTER")]
    pub log: Option<String>,

    /// TrueType/OpenType font used for all text
    #[arg(long = "font", value_name = "PATH")]
    pub font: Option<PathBuf>,
}

impl From<&Cli> for DrillConfig {
    fn from(cli: &Cli) -> Self {
        let defaults = DrillConfig::default();
        Self {
            tables: cli.tables.clone().map_or(defaults.tables, |f| f.0),
            factors: cli.factors.clone().map_or(defaults.factors, |f| f.0),
            num_problems: cli.problems,
            seed: cli.seed,
        }
    }
}
