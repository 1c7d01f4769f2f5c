use hifitime::Epoch;
use std::str::FromStr;

use crate::{constants::EpochMs, syzygy_errors::SyzygyError};

/// Current wall-clock instant as milliseconds since the Unix epoch.
///
/// Return
/// ------
/// * The current UTC instant in ms, or [`SyzygyError::Clock`] if the system clock cannot be
///   read.
pub fn now_epoch_ms() -> Result<EpochMs, SyzygyError> {
    Epoch::now()
        .map(|e| e.to_unix_milliseconds())
        .map_err(|e| SyzygyError::Clock(e.to_string()))
}

/// Parse a date string into milliseconds since the Unix epoch.
///
/// Argument
/// --------
/// * `date`: any format accepted by [`hifitime::Epoch::from_str`], e.g.
///   `2024-03-25T07:00:00 UTC` or `2024-03-25T07:00:00`.
///
/// Return
/// ------
/// * The instant in ms, or [`SyzygyError::InvalidDate`] carrying the rejected input.
pub fn parse_epoch_ms(date: &str) -> Result<EpochMs, SyzygyError> {
    Epoch::from_str(date.trim())
        .map(|e| e.to_unix_milliseconds())
        .map_err(|e| SyzygyError::InvalidDate(format!("{date:?}: {e}")))
}

/// Convert milliseconds since the Unix epoch into a hifitime [`Epoch`].
pub fn ms_to_epoch(ms: EpochMs) -> Epoch {
    Epoch::from_unix_milliseconds(ms)
}

/// Human-readable rendering of a simulated instant, used in log lines.
pub fn format_epoch_ms(ms: EpochMs) -> String {
    if ms.is_finite() {
        format!("{}", ms_to_epoch(ms))
    } else {
        format!("{ms} ms")
    }
}

/// Absolute simulated time accepted by `set_sim_time`.
#[derive(Debug, Clone, PartialEq)]
pub enum SimTime {
    /// Milliseconds since the Unix epoch.
    Millis(EpochMs),
    /// A hifitime instant.
    Epoch(Epoch),
    /// A date string, parsed with [`parse_epoch_ms`].
    Text(String),
}

impl SimTime {
    pub fn to_epoch_ms(&self) -> Result<EpochMs, SyzygyError> {
        match self {
            SimTime::Millis(ms) if ms.is_finite() => Ok(*ms),
            SimTime::Millis(ms) => Err(SyzygyError::InvalidDate(format!("{ms} ms"))),
            SimTime::Epoch(e) => Ok(e.to_unix_milliseconds()),
            SimTime::Text(s) => parse_epoch_ms(s),
        }
    }
}

impl From<f64> for SimTime {
    fn from(ms: f64) -> Self {
        SimTime::Millis(ms)
    }
}

impl From<Epoch> for SimTime {
    fn from(e: Epoch) -> Self {
        SimTime::Epoch(e)
    }
}

impl From<&str> for SimTime {
    fn from(s: &str) -> Self {
        SimTime::Text(s.to_string())
    }
}

impl From<String> for SimTime {
    fn from(s: String) -> Self {
        SimTime::Text(s)
    }
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_one_day_apart() {
        let d1 = parse_epoch_ms("2024-01-01T00:00:00 UTC").unwrap();
        let d2 = parse_epoch_ms("2024-01-02T00:00:00 UTC").unwrap();
        assert_abs_diff_eq!(d2 - d1, 86_400_000.0, epsilon = 1e-3);
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse_epoch_ms("not a date").unwrap_err();
        assert!(matches!(err, SyzygyError::InvalidDate(_)));
    }

    #[test]
    fn test_epoch_round_trip() {
        let ms = 1_700_000_000_000.0;
        assert_abs_diff_eq!(ms_to_epoch(ms).to_unix_milliseconds(), ms, epsilon = 1e-3);
    }

    #[test]
    fn test_sim_time_conversions() {
        assert_eq!(SimTime::from(12.5).to_epoch_ms().unwrap(), 12.5);
        assert!(SimTime::from(f64::NAN).to_epoch_ms().is_err());
        assert!(SimTime::from("garbage").to_epoch_ms().is_err());

        let text = SimTime::from("2024-01-01T00:00:00 UTC").to_epoch_ms().unwrap();
        let epoch = SimTime::from(ms_to_epoch(text)).to_epoch_ms().unwrap();
        assert_abs_diff_eq!(text, epoch, epsilon = 1e-3);
    }

    #[test]
    fn test_now_is_after_2020() {
        let now = now_epoch_ms().unwrap();
        assert!(now > 1_577_836_800_000.0);
    }
}
