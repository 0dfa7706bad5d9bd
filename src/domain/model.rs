use crate::domain::event::{AgeGroup, Course, Event, EventCategory, Gender};
use crate::domain::time::SwimTime;
use crate::utils::error::{Result, SwimBenchError};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Motivational standard tiers, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    B,
    BB,
    A,
    AA,
    AAA,
    AAAA,
}

impl Level {
    pub const ALL: [Level; 6] = [Level::B, Level::BB, Level::A, Level::AA, Level::AAA, Level::AAAA];

    pub fn code(self) -> &'static str {
        match self {
            Level::B => "B",
            Level::BB => "BB",
            Level::A => "A",
            Level::AA => "AA",
            Level::AAA => "AAA",
            Level::AAAA => "AAAA",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Level {
    type Err = SwimBenchError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        Level::ALL
            .iter()
            .copied()
            .find(|l| l.code() == code)
            .ok_or_else(|| SwimBenchError::ValidationError {
                field: "level".to_string(),
                message: format!("unknown motivational level '{}'", s.trim()),
            })
    }
}

/// College recruiting tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Division {
    D1Elite,
    D1MidMajor,
    D1LowMajor,
    D2,
    D3,
}

impl Division {
    pub const ALL: [Division; 5] = [
        Division::D1Elite,
        Division::D1MidMajor,
        Division::D1LowMajor,
        Division::D2,
        Division::D3,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Division::D1Elite => "D1_ELITE",
            Division::D1MidMajor => "D1_MID_MAJOR",
            Division::D1LowMajor => "D1_LOW_MAJOR",
            Division::D2 => "D2",
            Division::D3 => "D3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Division::D1Elite => "D1 Elite Programs",
            Division::D1MidMajor => "D1 Mid-Major",
            Division::D1LowMajor => "D1 Low-Major",
            Division::D2 => "D2 Programs",
            Division::D3 => "D3 Programs",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Division {
    type Err = SwimBenchError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Division::ALL
            .iter()
            .copied()
            .find(|d| d.code() == code)
            .ok_or_else(|| SwimBenchError::ValidationError {
                field: "division".to_string(),
                message: format!("unknown recruiting division '{}'", s.trim()),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardEntry {
    pub event: Event,
    pub course: Course,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub level: Level,
    pub time: SwimTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruitingEntry {
    pub division: Division,
    pub event: Event,
    pub gender: Gender,
    pub course: Course,
    pub time: SwimTime,
}

/// A validated query: one swim to benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwimResult {
    pub event: Event,
    pub course: Course,
    pub age: u8,
    pub gender: Gender,
    pub time: SwimTime,
}

impl SwimResult {
    pub fn new(event: Event, course: Course, age: u8, gender: Gender, time: SwimTime) -> Result<Self> {
        event.ensure_swum_in(course)?;
        AgeGroup::from_age(age)?;
        Ok(Self {
            event,
            course,
            age,
            gender,
            time,
        })
    }

    pub fn age_group(&self) -> Result<AgeGroup> {
        AgeGroup::from_age(self.age)
    }
}

/// The string-typed request as it arrives from a CLI or API layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwimQuery {
    pub event: String,
    pub course: Option<String>,
    pub age: u8,
    pub gender: Option<String>,
    pub time: String,
}

impl SwimQuery {
    /// Validates into a `SwimResult`, falling back to the given defaults for
    /// gender and course. A course suffix on the event (`100 Free LCM`) wins
    /// over the default but must agree with an explicit course.
    pub fn into_result(self, default_gender: Gender, default_course: Course) -> Result<SwimResult> {
        let (event, embedded_course) = Event::parse_with_course(&self.event)?;

        let explicit_course = self.course.as_deref().map(str::parse::<Course>).transpose()?;
        let course = match (explicit_course, embedded_course) {
            (Some(a), Some(b)) if a != b => {
                return Err(SwimBenchError::ValidationError {
                    field: "course".to_string(),
                    message: format!("event names {} but course is {}", b, a),
                })
            }
            (Some(c), _) | (None, Some(c)) => c,
            (None, None) => default_course,
        };

        let gender = match self.gender.as_deref() {
            Some(g) => g.parse()?,
            None => default_gender,
        };
        let time: SwimTime = self.time.parse()?;

        SwimResult::new(event, course, self.age, gender, time)
    }
}

/// Where a time lands on the motivational ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bracket {
    BelowMinimum,
    Level(Level),
}

impl Bracket {
    pub fn level(self) -> Option<Level> {
        match self {
            Bracket::BelowMinimum => None,
            Bracket::Level(l) => Some(l),
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::BelowMinimum => f.write_str("below minimum"),
            Bracket::Level(l) => f.write_str(l.code()),
        }
    }
}

impl Serialize for Bracket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbilityLevel {
    Elite,
    Advanced,
    Intermediate,
    Novice,
    Beginner,
}

impl From<Bracket> for AbilityLevel {
    fn from(bracket: Bracket) -> Self {
        match bracket {
            Bracket::Level(Level::AAAA) => AbilityLevel::Elite,
            Bracket::Level(Level::AAA | Level::AA) => AbilityLevel::Advanced,
            Bracket::Level(Level::A) => AbilityLevel::Intermediate,
            Bracket::Level(Level::BB | Level::B) => AbilityLevel::Novice,
            Bracket::BelowMinimum => AbilityLevel::Beginner,
        }
    }
}

impl fmt::Display for AbilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruitingCheck {
    pub division: Division,
    pub cutoff: SwimTime,
    pub qualified: bool,
    /// Time still to drop to reach the cutoff; zero once qualified.
    pub gap: SwimTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub event: Event,
    pub course: Course,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub time: SwimTime,
    pub category: EventCategory,
    pub matched_level: Bracket,
    pub ability_level: AbilityLevel,
    pub next_level: Option<Level>,
    pub next_level_time: Option<SwimTime>,
    pub time_drop_needed: SwimTime,
    pub percentile_estimate: f64,
    pub recruiting_qualifications: BTreeMap<Division, bool>,
    pub recruiting: Vec<RecruitingCheck>,
    pub training_focus_hint: Option<String>,
    pub standards_version: u64,
}
