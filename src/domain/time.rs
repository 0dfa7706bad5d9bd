use crate::utils::error::{Result, SwimBenchError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A swim time in hundredths of a second.
///
/// Standards are published to the hundredth, so integer storage keeps
/// subtraction exact (`54.21 - 53.09` is `1.12`, not `1.1199999`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SwimTime(u32);

impl SwimTime {
    pub const ZERO: SwimTime = SwimTime(0);

    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Converts a seconds value coming from an API layer. Rounds to the hundredth.
    pub fn from_seconds(seconds: f64) -> Result<Self> {
        if !seconds.is_finite() {
            return Err(invalid_time(seconds.to_string(), "time must be a finite number"));
        }
        if seconds <= 0.0 {
            return Err(invalid_time(seconds.to_string(), "time must be greater than zero"));
        }
        let hundredths = (seconds * 100.0).round();
        if hundredths < 1.0 || hundredths > f64::from(u32::MAX) {
            return Err(invalid_time(seconds.to_string(), "time is out of range"));
        }
        Ok(Self(hundredths as u32))
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_seconds(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// `self - other`, or zero when `other` is the slower time.
    pub fn saturating_sub(self, other: SwimTime) -> SwimTime {
        SwimTime(self.0.saturating_sub(other.0))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

fn invalid_time(value: impl Into<String>, reason: &str) -> SwimBenchError {
    SwimBenchError::ValidationError {
        field: "time".to_string(),
        message: format!("'{}': {}", value.into(), reason),
    }
}

/// Parses the `SS.ss` part of a time. At most two decimals.
fn parse_seconds_part(raw: &str, part: &str) -> Result<u32> {
    let (whole, frac) = match part.split_once('.') {
        Some((w, f)) => (w, f),
        None => (part, ""),
    };

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_time(raw, "not a numeric time"));
    }
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_time(raw, "times carry at most two decimal places"));
    }

    let whole: u32 = whole
        .parse()
        .map_err(|_| invalid_time(raw, "not a numeric time"))?;
    let frac: u32 = match frac.len() {
        0 => 0,
        1 => frac.parse::<u32>().unwrap_or(0) * 10,
        _ => frac.parse::<u32>().unwrap_or(0),
    };

    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| invalid_time(raw, "time is out of range"))
}

fn parse_unit(raw: &str, part: &str, max: Option<u32>) -> Result<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_time(raw, "not a numeric time"));
    }
    let value: u32 = part
        .parse()
        .map_err(|_| invalid_time(raw, "time is out of range"))?;
    if let Some(max) = max {
        if value > max {
            return Err(invalid_time(raw, "minutes and seconds must be below 60"));
        }
    }
    Ok(value)
}

impl FromStr for SwimTime {
    type Err = SwimBenchError;

    /// Accepts `54.21`, `1:02.35` and `1:02:03.45`.
    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.starts_with('-') {
            return Err(invalid_time(raw, "time must be greater than zero"));
        }

        let parts: Vec<&str> = raw.split(':').collect();
        let hundredths = match parts.as_slice() {
            [secs] => parse_seconds_part(raw, secs)?,
            [mins, secs] => {
                let mins = parse_unit(raw, mins, None)?;
                let secs = parse_seconds_part(raw, secs)?;
                if secs >= 6000 {
                    return Err(invalid_time(raw, "minutes and seconds must be below 60"));
                }
                mins.checked_mul(6000)
                    .and_then(|m| m.checked_add(secs))
                    .ok_or_else(|| invalid_time(raw, "time is out of range"))?
            }
            [hours, mins, secs] => {
                let hours = parse_unit(raw, hours, None)?;
                let mins = parse_unit(raw, mins, Some(59))?;
                let secs = parse_seconds_part(raw, secs)?;
                if secs >= 6000 {
                    return Err(invalid_time(raw, "minutes and seconds must be below 60"));
                }
                hours
                    .checked_mul(360_000)
                    .and_then(|h| h.checked_add(mins * 6000))
                    .and_then(|hm| hm.checked_add(secs))
                    .ok_or_else(|| invalid_time(raw, "time is out of range"))?
            }
            _ => return Err(invalid_time(raw, "not a numeric time")),
        };

        if hundredths == 0 {
            return Err(invalid_time(raw, "time must be greater than zero"));
        }
        Ok(Self(hundredths))
    }
}

impl fmt::Display for SwimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0;
        let hundredths = total % 100;
        let seconds = (total / 100) % 60;
        let minutes = (total / 6000) % 60;
        let hours = total / 360_000;

        if hours > 0 {
            write!(f, "{}:{:02}:{:02}.{:02}", hours, minutes, seconds, hundredths)
        } else if minutes > 0 {
            write!(f, "{}:{:02}.{:02}", minutes, seconds, hundredths)
        } else {
            write!(f, "{}.{:02}", seconds, hundredths)
        }
    }
}

impl Serialize for SwimTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_seconds())
    }
}

impl<'de> Deserialize<'de> for SwimTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(s) => SwimTime::from_seconds(s).map_err(serde::de::Error::custom),
            Raw::Text(t) => t.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_only() {
        assert_eq!("54.21".parse::<SwimTime>().unwrap().hundredths(), 5421);
        assert_eq!("54.2".parse::<SwimTime>().unwrap().hundredths(), 5420);
        assert_eq!("54".parse::<SwimTime>().unwrap().hundredths(), 5400);
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!("1:02.35".parse::<SwimTime>().unwrap().hundredths(), 6235);
        assert_eq!("16:45.10".parse::<SwimTime>().unwrap().hundredths(), 100_510);
        assert_eq!("1:00:00.00".parse::<SwimTime>().unwrap().hundredths(), 360_000);
    }

    #[test]
    fn test_reject_invalid_times() {
        assert!("0".parse::<SwimTime>().is_err());
        assert!("0.00".parse::<SwimTime>().is_err());
        assert!("-54.21".parse::<SwimTime>().is_err());
        assert!("abc".parse::<SwimTime>().is_err());
        assert!("54.215".parse::<SwimTime>().is_err());
        assert!("1:75.00".parse::<SwimTime>().is_err());
        assert!("".parse::<SwimTime>().is_err());
    }

    #[test]
    fn test_from_seconds() {
        assert_eq!(SwimTime::from_seconds(54.21).unwrap().hundredths(), 5421);
        assert!(SwimTime::from_seconds(0.0).is_err());
        assert!(SwimTime::from_seconds(-1.0).is_err());
        assert!(SwimTime::from_seconds(f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(SwimTime::from_hundredths(5421).to_string(), "54.21");
        assert_eq!(SwimTime::from_hundredths(6235).to_string(), "1:02.35");
        assert_eq!(SwimTime::from_hundredths(112).to_string(), "1.12");
        assert_eq!(SwimTime::from_hundredths(5).to_string(), "0.05");
    }

    #[test]
    fn test_subtraction_is_exact() {
        let swimmer = SwimTime::from_hundredths(5421);
        let target = SwimTime::from_hundredths(5309);
        assert_eq!(swimmer.saturating_sub(target).to_string(), "1.12");
        assert!(target.saturating_sub(swimmer).is_zero());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let t: SwimTime = serde_json::from_str("54.21").unwrap();
        assert_eq!(t.hundredths(), 5421);
        let t: SwimTime = serde_json::from_str("\"1:02.35\"").unwrap();
        assert_eq!(t.hundredths(), 6235);
        assert!(serde_json::from_str::<SwimTime>("-3").is_err());
    }
}
