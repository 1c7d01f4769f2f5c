use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyzygyError {
    #[error("Invalid eccentricity for {body}: {value} (closed orbits need 0 <= e < 1)")]
    InvalidEccentricity { body: &'static str, value: f64 },

    #[error("Invalid orbital period for {body}: {value} s (must be finite and > 0)")]
    InvalidPeriod { body: &'static str, value: f64 },

    #[error("Invalid mean motion for {body}: {value} rad/s (must be finite and > 0)")]
    InvalidMeanMotion { body: &'static str, value: f64 },

    #[error("Neither mean motion nor period given for {0}")]
    MissingMeanMotion(&'static str),

    #[error("Invalid radius for {body}: {value} (must be finite and > 0)")]
    InvalidRadius { body: &'static str, value: f64 },

    #[error("Unable to parse date: {0}")]
    InvalidDate(String),

    #[error("Unknown lunar phase name: {0}")]
    UnknownPhase(String),

    #[error("System clock unavailable: {0}")]
    Clock(String),

    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] ron::Error),
}

impl PartialEq for SyzygyError {
    fn eq(&self, other: &Self) -> bool {
        use SyzygyError::*;
        match (self, other) {
            (
                InvalidEccentricity { body: a, value: x },
                InvalidEccentricity { body: b, value: y },
            ) => a == b && x.to_bits() == y.to_bits(),
            (InvalidPeriod { body: a, value: x }, InvalidPeriod { body: b, value: y }) => {
                a == b && x.to_bits() == y.to_bits()
            }
            (InvalidMeanMotion { body: a, value: x }, InvalidMeanMotion { body: b, value: y }) => {
                a == b && x.to_bits() == y.to_bits()
            }
            (InvalidRadius { body: a, value: x }, InvalidRadius { body: b, value: y }) => {
                a == b && x.to_bits() == y.to_bits()
            }
            (MissingMeanMotion(a), MissingMeanMotion(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (UnknownPhase(a), UnknownPhase(b)) => a == b,
            (Clock(a), Clock(b)) => a == b,

            // Wrapped errors are not comparable: same variant means equal
            (ConfigRead(_), ConfigRead(_)) => true,
            (ConfigParse(_), ConfigParse(_)) => true,
            (ConfigSerialize(_), ConfigSerialize(_)) => true,

            _ => false,
        }
    }
}
