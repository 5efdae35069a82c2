//! Index configuration module.
//!
//! Chooses which index engine a table builds and sizes that engine. Values come
//! from environment variables, falling back to the classic defaults.
//!
//! # Environment Variables
//!
//! - `KEYINDEX_KIND`: one of `none`, `tree`, `linhash`, `bptree` (default: `linhash`)
//! - `KEYINDEX_BPTREE_ORDER`: B+Tree fan-out (default: `5`)
//! - `KEYINDEX_LINHASH_SLOTS`: slots per hash bucket (default: `10`)
//! - `KEYINDEX_LINHASH_INITIAL_BUCKETS`: initial bucket count (default: `8`)
//!
//! # Invariants
//!
//! A config that passed [`IndexConfig::validate`] builds every engine without
//! error:
//! - `bptree_order >= 3`
//! - `linhash_slots >= 1`
//! - `linhash_initial_buckets` is a power of two

use std::str::FromStr;

/// Which index structure a table keeps over its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    /// No index; key selection falls back to scanning.
    None,
    /// The standard library ordered map, kept as a reference engine.
    Tree,
    /// Linear hashing (unordered).
    #[default]
    LinearHash,
    /// B+Tree (ordered).
    BPlusTree,
}

impl IndexKind {
    /// The name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Tree => "tree",
            Self::LinearHash => "linhash",
            Self::BPlusTree => "bptree",
        }
    }

    /// Whether the engine supports range scans.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(self, Self::Tree | Self::BPlusTree)
    }
}

impl FromStr for IndexKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "tree" => Ok(Self::Tree),
            "linhash" => Ok(Self::LinearHash),
            "bptree" => Ok(Self::BPlusTree),
            other => Err(ConfigError::UnknownIndexKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` the config has already been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Engine to build.
    pub kind: IndexKind,
    /// Maximum number of children per B+Tree node.
    pub bptree_order: usize,
    /// Key-value slots per linear hash bucket.
    pub linhash_slots: usize,
    /// Home buckets a linear hash table starts with.
    pub linhash_initial_buckets: usize,
}

/// Error returned when loading or validating configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The index kind string is not recognised.
    UnknownIndexKind(String),
    /// A parameter has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownIndexKind(kind) => {
                write!(
                    f,
                    "unknown index kind '{kind}' (expected none, tree, linhash or bptree)"
                )
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            kind: IndexKind::default(),
            bptree_order: Self::DEFAULT_BPTREE_ORDER,
            linhash_slots: Self::DEFAULT_LINHASH_SLOTS,
            linhash_initial_buckets: Self::DEFAULT_LINHASH_INITIAL_BUCKETS,
        }
    }
}

impl IndexConfig {
    /// Default B+Tree fan-out.
    pub const DEFAULT_BPTREE_ORDER: usize = 5;
    /// Default slots per hash bucket.
    pub const DEFAULT_LINHASH_SLOTS: usize = 10;
    /// Default number of initial hash buckets.
    pub const DEFAULT_LINHASH_INITIAL_BUCKETS: usize = 8;
    /// Smallest B+Tree order that still splits into two non-empty halves.
    pub const MIN_BPTREE_ORDER: usize = 3;

    const KIND_VAR: &str = "KEYINDEX_KIND";
    const ORDER_VAR: &str = "KEYINDEX_BPTREE_ORDER";
    const SLOTS_VAR: &str = "KEYINDEX_LINHASH_SLOTS";
    const BUCKETS_VAR: &str = "KEYINDEX_LINHASH_INITIAL_BUCKETS";

    /// A default config for the given engine.
    #[must_use]
    pub fn with_kind(kind: IndexKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but unparsable, or if the
    /// resulting parameters fail [`Self::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup(Self::KIND_VAR) {
            Some(value) => value.parse()?,
            None => IndexKind::default(),
        };

        let config = Self {
            kind,
            bptree_order: Self::load_usize(&lookup, Self::ORDER_VAR, Self::DEFAULT_BPTREE_ORDER)?,
            linhash_slots: Self::load_usize(&lookup, Self::SLOTS_VAR, Self::DEFAULT_LINHASH_SLOTS)?,
            linhash_initial_buckets: Self::load_usize(
                &lookup,
                Self::BUCKETS_VAR,
                Self::DEFAULT_LINHASH_INITIAL_BUCKETS,
            )?,
        };
        config.validate()?;

        tracing::debug!(
            kind = %config.kind,
            order = config.bptree_order,
            slots = config.linhash_slots,
            buckets = config.linhash_initial_buckets,
            "loaded index configuration"
        );

        Ok(config)
    }

    /// Check that every engine parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_order(self.bptree_order)?;
        validate_layout(self.linhash_slots, self.linhash_initial_buckets)
    }

    /// Parse an optional unsigned parameter.
    ///
    /// Returns the default if not set.
    fn load_usize<F>(lookup: &F, name: &str, default: usize) -> Result<usize, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(name) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: format!("'{value}' is not a non-negative integer"),
                }),
            None => Ok(default),
        }
    }
}

/// Validate a B+Tree order.
pub(crate) fn validate_order(order: usize) -> Result<(), ConfigError> {
    if order < IndexConfig::MIN_BPTREE_ORDER {
        return Err(ConfigError::InvalidValue {
            name: "bptree_order".to_string(),
            message: format!(
                "{order} is below the minimum of {}",
                IndexConfig::MIN_BPTREE_ORDER
            ),
        });
    }
    Ok(())
}

/// Validate a linear hash bucket layout.
pub(crate) fn validate_layout(slots: usize, initial_buckets: usize) -> Result<(), ConfigError> {
    if slots == 0 {
        return Err(ConfigError::InvalidValue {
            name: "linhash_slots".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    if !initial_buckets.is_power_of_two() {
        return Err(ConfigError::InvalidValue {
            name: "linhash_initial_buckets".to_string(),
            message: format!("{initial_buckets} is not a power of two"),
        });
    }
    Ok(())
}
