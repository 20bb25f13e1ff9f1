//! Player records, scouting attributes and age buckets

use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Number of scouting attributes carried by every player
pub const ATTRIBUTE_COUNT: usize = 9;

/// Scouting attributes, in the column order used by the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Speed,
    Agility,
    Endurance,
    Strength,
    Technique,
    GameIntelligence,
    WorkEthic,
    Coachability,
    /// Height in centimetres, the only attribute not on a 0-100 scale
    Height,
}

impl Attribute {
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Speed,
        Attribute::Agility,
        Attribute::Endurance,
        Attribute::Strength,
        Attribute::Technique,
        Attribute::GameIntelligence,
        Attribute::WorkEthic,
        Attribute::Coachability,
        Attribute::Height,
    ];

    /// Column name as it appears in the input spreadsheet
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::Speed => "Speed",
            Attribute::Agility => "Agility",
            Attribute::Endurance => "Endurance",
            Attribute::Strength => "Strength",
            Attribute::Technique => "Technique",
            Attribute::GameIntelligence => "Game Intelligence",
            Attribute::WorkEthic => "Work Ethic",
            Attribute::Coachability => "Coachability",
            Attribute::Height => "Height",
        }
    }

    /// Position of the attribute inside a record's value array
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

impl std::str::FromStr for Attribute {
    type Err = PipelineError;

    /// Accepts the column name, case-insensitively, with spaces, dashes or
    /// underscores between words (`game_intelligence`, `Game Intelligence`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        Attribute::ALL
            .into_iter()
            .find(|attr| {
                attr.column_name()
                    .chars()
                    .filter(|c| *c != ' ')
                    .flat_map(char::to_lowercase)
                    .eq(key.chars())
            })
            .ok_or_else(|| PipelineError::UnknownAttribute(s.to_string()))
    }
}

/// One scouted athlete. Loaded once per session and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub gender: String,
    pub age: i64,
    /// Attribute values indexed by [`Attribute::index`]
    pub attributes: [f64; ATTRIBUTE_COUNT],
}

impl PlayerRecord {
    pub fn new(
        name: impl Into<String>,
        gender: impl Into<String>,
        age: i64,
        attributes: [f64; ATTRIBUTE_COUNT],
    ) -> Self {
        Self {
            name: name.into(),
            gender: gender.into(),
            age,
            attributes,
        }
    }

    #[inline]
    pub fn value(&self, attribute: Attribute) -> f64 {
        self.attributes[attribute.index()]
    }
}

/// Age bucket over right-open intervals [0,12), [12,15), [15,18), [18,100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "≤12")]
    UpTo12,
    #[serde(rename = "13-15")]
    From13To15,
    #[serde(rename = "16-18")]
    From16To18,
    #[serde(rename = "19+")]
    From19,
}

/// Lower edges of each bucket, plus the exclusive upper edge of the last one
const AGE_BREAKPOINTS: [i64; 5] = [0, 12, 15, 18, 100];

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::UpTo12,
        AgeGroup::From13To15,
        AgeGroup::From16To18,
        AgeGroup::From19,
    ];

    /// Bucket an age. The labels lag the bins by one year, so an age of
    /// exactly 12 lands in `13-15` and 18 lands in `19+`.
    ///
    /// Returns `None` for ages outside [0, 100).
    pub fn from_age(age: i64) -> Option<AgeGroup> {
        AGE_BREAKPOINTS
            .windows(2)
            .position(|edge| edge[0] <= age && age < edge[1])
            .map(|idx| AgeGroup::ALL[idx])
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::UpTo12 => "≤12",
            AgeGroup::From13To15 => "13-15",
            AgeGroup::From16To18 => "16-18",
            AgeGroup::From19 => "19+",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
