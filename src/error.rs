use thiserror::Error;

/// Errors produced by the cooling model and its configuration layer.
#[derive(Debug, Error)]
pub enum CoolingError {
    /// A non-physical input: negative time, non-positive cooling constant or
    /// mass, ambient at or above the starting temperature, and so on.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown mug material: {0}")]
    UnknownMaterial(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CoolingError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        CoolingError::InvalidParameter { name, value, reason }
    }

    /// True for the non-physical-input variant.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, CoolingError::InvalidParameter { .. })
    }
}

pub type Result<T> = std::result::Result<T, CoolingError>;

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoolingError::invalid(name, value, "must be a finite number"))
    }
}

/// Require `value > 0`.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(CoolingError::invalid(name, value, "must be greater than zero"))
    }
}

/// Require `value >= 0`.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(CoolingError::invalid(name, value, "must not be negative"))
    }
}
