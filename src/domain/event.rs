use crate::utils::error::{Result, SwimBenchError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "SCY")]
    Scy,
    #[serde(rename = "SCM")]
    Scm,
    #[serde(rename = "LCM")]
    Lcm,
}

impl Course {
    pub const ALL: [Course; 3] = [Course::Scy, Course::Scm, Course::Lcm];

    pub fn code(self) -> &'static str {
        match self {
            Course::Scy => "SCY",
            Course::Scm => "SCM",
            Course::Lcm => "LCM",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Course {
    type Err = SwimBenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCY" | "Y" | "YARDS" => Ok(Course::Scy),
            "SCM" | "S" => Ok(Course::Scm),
            "LCM" | "L" | "LONG" => Ok(Course::Lcm),
            other => Err(SwimBenchError::ValidationError {
                field: "course".to_string(),
                message: format!("unknown course code '{}', expected SCY, SCM or LCM", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stroke {
    Free,
    Back,
    Breast,
    Fly,
    IM,
}

impl Stroke {
    pub fn code(self) -> &'static str {
        match self {
            Stroke::Free => "Free",
            Stroke::Back => "Back",
            Stroke::Breast => "Breast",
            Stroke::Fly => "Fly",
            Stroke::IM => "IM",
        }
    }

    fn parse(token: &str) -> Option<Stroke> {
        match token.to_ascii_lowercase().as_str() {
            "free" | "freestyle" | "fr" | "fs" => Some(Stroke::Free),
            "back" | "backstroke" | "bk" => Some(Stroke::Back),
            "breast" | "breaststroke" | "br" => Some(Stroke::Breast),
            "fly" | "butterfly" | "fl" => Some(Stroke::Fly),
            "im" | "medley" | "individual medley" => Some(Stroke::IM),
            _ => None,
        }
    }
}

/// Coarse grouping used for training advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Sprint,
    Middle,
    Distance,
    #[serde(rename = "im")]
    IM,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventCategory::Sprint => "sprint",
            EventCategory::Middle => "middle",
            EventCategory::Distance => "distance",
            EventCategory::IM => "im",
        };
        f.write_str(name)
    }
}

/// A race distance and stroke, independent of the pool it is swum in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event {
    pub distance: u16,
    pub stroke: Stroke,
}

impl Event {
    pub fn new(distance: u16, stroke: Stroke) -> Self {
        Self { distance, stroke }
    }

    /// Whether this event is contested in `course`.
    pub fn is_swum_in(self, course: Course) -> bool {
        use Stroke::*;
        match (self.stroke, self.distance) {
            (Free, 50 | 100 | 200) => true,
            (Free, 500 | 1000 | 1650) => course == Course::Scy,
            (Free, 400 | 800 | 1500) => course != Course::Scy,
            (Back | Breast | Fly, 50 | 100 | 200) => true,
            (IM, 100) => course != Course::Lcm,
            (IM, 200 | 400) => true,
            _ => false,
        }
    }

    /// Events contested in `course`, in program order.
    pub fn catalog(course: Course) -> Vec<Event> {
        use Stroke::*;
        let mut events = Vec::new();
        for &d in &[50u16, 100, 200, 400, 500, 800, 1000, 1500, 1650] {
            events.push(Event::new(d, Free));
        }
        for stroke in [Back, Breast, Fly] {
            for &d in &[50u16, 100, 200] {
                events.push(Event::new(d, stroke));
            }
        }
        for &d in &[100u16, 200, 400] {
            events.push(Event::new(d, IM));
        }
        events.retain(|e| e.is_swum_in(course));
        events
    }

    pub fn category(self) -> EventCategory {
        match (self.stroke, self.distance) {
            (Stroke::IM, _) => EventCategory::IM,
            (Stroke::Free, d) if d >= 400 => EventCategory::Distance,
            (_, 200) => EventCategory::Middle,
            _ => EventCategory::Sprint,
        }
    }

    /// Parses an event code that may carry a trailing course, e.g. `100 Free SCY`.
    pub fn parse_with_course(s: &str) -> Result<(Event, Option<Course>)> {
        let raw = s.trim();
        if let Some((head, tail)) = raw.rsplit_once(|c: char| c == ' ' || c == '_') {
            if let Ok(course) = tail.parse::<Course>() {
                if tail.len() == 3 {
                    return Ok((head.parse()?, Some(course)));
                }
            }
        }
        Ok((raw.parse()?, None))
    }

    pub fn ensure_swum_in(self, course: Course) -> Result<()> {
        if self.is_swum_in(course) {
            Ok(())
        } else {
            Err(SwimBenchError::ValidationError {
                field: "event".to_string(),
                message: format!("{} is not contested in {}", self, course),
            })
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.distance, self.stroke.code())
    }
}

impl FromStr for Event {
    type Err = SwimBenchError;

    /// Accepts `100 Free`, `100_freestyle`, `100FR` and `200 IM`.
    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim();
        let unknown = || SwimBenchError::ValidationError {
            field: "event".to_string(),
            message: format!("unknown event code '{}'", raw),
        };

        let digits_end = raw
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(unknown)?;
        if digits_end == 0 {
            return Err(unknown());
        }

        let distance: u16 = raw[..digits_end].parse().map_err(|_| unknown())?;
        let stroke_token = raw[digits_end..].trim_matches(|c: char| c == ' ' || c == '_' || c == '-');
        let stroke_token = stroke_token.replace('_', " ");
        let stroke = Stroke::parse(&stroke_token).ok_or_else(unknown)?;

        let event = Event::new(distance, stroke);
        if Course::ALL.iter().any(|&c| event.is_swum_in(c)) {
            Ok(event)
        } else {
            Err(unknown())
        }
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "M",
            Gender::Female => "F",
        })
    }
}

impl FromStr for Gender {
    type Err = SwimBenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "men" | "boys" => Ok(Gender::Male),
            "f" | "w" | "female" | "women" | "girls" => Ok(Gender::Female),
            other => Err(SwimBenchError::ValidationError {
                field: "gender".to_string(),
                message: format!("unknown gender '{}', expected M or F", other),
            }),
        }
    }
}

/// USA Swimming age brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "10&U")]
    TenAndUnder,
    #[serde(rename = "11-12")]
    ElevenTwelve,
    #[serde(rename = "13-14")]
    ThirteenFourteen,
    #[serde(rename = "15-16")]
    FifteenSixteen,
    #[serde(rename = "17-18")]
    SeventeenEighteen,
}

impl AgeGroup {
    pub const MAX_AGE: u8 = 18;

    pub fn from_age(age: u8) -> Result<Self> {
        match age {
            1..=10 => Ok(AgeGroup::TenAndUnder),
            11 | 12 => Ok(AgeGroup::ElevenTwelve),
            13 | 14 => Ok(AgeGroup::ThirteenFourteen),
            15 | 16 => Ok(AgeGroup::FifteenSixteen),
            17 | 18 => Ok(AgeGroup::SeventeenEighteen),
            _ => Err(SwimBenchError::ValidationError {
                field: "age".to_string(),
                message: format!(
                    "age {} is outside the USA Swimming age groups (10&U, 11-12, 13-14, 15-16, 17-18)",
                    age
                ),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::TenAndUnder => "10&U",
            AgeGroup::ElevenTwelve => "11-12",
            AgeGroup::ThirteenFourteen => "13-14",
            AgeGroup::FifteenSixteen => "15-16",
            AgeGroup::SeventeenEighteen => "17-18",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = SwimBenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().replace(' ', "").as_str() {
            "10&U" | "10U" | "10&UNDER" | "10-UNDER" | "10-" => Ok(AgeGroup::TenAndUnder),
            "11-12" => Ok(AgeGroup::ElevenTwelve),
            "13-14" => Ok(AgeGroup::ThirteenFourteen),
            "15-16" => Ok(AgeGroup::FifteenSixteen),
            "17-18" => Ok(AgeGroup::SeventeenEighteen),
            other => Err(SwimBenchError::ValidationError {
                field: "age_group".to_string(),
                message: format!("unknown age group '{}'", other),
            }),
        }
    }
}
