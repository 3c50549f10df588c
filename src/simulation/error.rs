//! Error types for track loading, rule tables and race configuration.

use thiserror::Error;

/// A track image that cannot be turned into a playable track.
#[derive(Debug, Error)]
pub enum TrackFormatError {
    /// The image file could not be opened or decoded.
    #[error("failed to decode track image: {0}")]
    Image(#[from] image::ImageError),
    /// The image has zero width or height.
    #[error("track image has no pixels")]
    Empty,
    /// No pixel has a green channel of at least 128.
    #[error("track has no start pixel (green channel >= 128)")]
    MissingStart,
}

/// A rule table that cannot be parsed or does not fit the policy using it.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Reading or writing the rules file failed.
    #[error("rules file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// A value on the given (1-based) line is not a float.
    #[error("line {line}: invalid value {value:?}: {source}")]
    InvalidValue {
        /// Line number, starting at 1.
        line: usize,
        /// The offending token.
        value: String,
        /// Underlying parse failure.
        source: std::num::ParseFloatError,
    },
    /// Rule lines have different numbers of values.
    #[error("line {line}: expected {expected} values, found {found}")]
    WidthMismatch {
        /// Line number, starting at 1.
        line: usize,
        /// Values per rule established by the first rule.
        expected: usize,
        /// Values found on this line.
        found: usize,
    },
    /// A rule needs at least one weight plus its bias.
    #[error("rules need at least one weight and a bias, found {0} value(s)")]
    TooFewValues(usize),
    /// Weight rows and biases disagree on the number of rules.
    #[error("rules have {rows} weight rows but {biases} biases")]
    BiasMismatch {
        /// Rows of the weight matrix.
        rows: usize,
        /// Length of the bias vector.
        biases: usize,
    },
    /// Steering compares rule 0 against rule 1.
    #[error("at least 2 rules are required, found {0}")]
    TooFewRules(usize),
    /// Number of rule weights does not match the number of sensors.
    #[error("rules have {weights} weights but the player has {sensors} sensors")]
    SensorMismatch {
        /// Weights per rule.
        weights: usize,
        /// Sensors attached to the player.
        sensors: usize,
    },
}

/// Race parameters that cannot be loaded or are out of range.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Reading the parameter file failed.
    #[error("params file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The parameter file is not valid JSON for [`super::params::RaceParams`].
    #[error("invalid params JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A numeric parameter is outside its valid range.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
}
