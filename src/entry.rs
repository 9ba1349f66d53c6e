//! Indexed entries and their shared metadata
//!
//! Each domain record (noun, first name, place) embeds an [`Entry`]
//! carrying the fields every domain has: surface text, structural key,
//! semantic category, and the flags merged in from side tables.

use crate::encoder::{self, StructuralKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category of an entry.
///
/// The first nine variants come from the rule-based classifier; the rest
/// only appear when an external label overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryTag {
    Animal,
    FoodPlant,
    Clothing,
    Furniture,
    VehicleMachine,
    ObjectTool,
    NaturalMaterial,
    Person,
    Unknown,
    Food,
    Plant,
    Electronics,
    Household,
    Place,
    Abstract,
    Other,
}

impl CategoryTag {
    pub const ALL: [CategoryTag; 16] = [
        CategoryTag::Animal,
        CategoryTag::FoodPlant,
        CategoryTag::Clothing,
        CategoryTag::Furniture,
        CategoryTag::VehicleMachine,
        CategoryTag::ObjectTool,
        CategoryTag::NaturalMaterial,
        CategoryTag::Person,
        CategoryTag::Unknown,
        CategoryTag::Food,
        CategoryTag::Plant,
        CategoryTag::Electronics,
        CategoryTag::Household,
        CategoryTag::Place,
        CategoryTag::Abstract,
        CategoryTag::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryTag::Animal => "animal",
            CategoryTag::FoodPlant => "food-plant",
            CategoryTag::Clothing => "clothing",
            CategoryTag::Furniture => "furniture",
            CategoryTag::VehicleMachine => "vehicle-machine",
            CategoryTag::ObjectTool => "object-tool",
            CategoryTag::NaturalMaterial => "natural-material",
            CategoryTag::Person => "person",
            CategoryTag::Unknown => "unknown",
            CategoryTag::Food => "food",
            CategoryTag::Plant => "plant",
            CategoryTag::Electronics => "electronics",
            CategoryTag::Household => "household",
            CategoryTag::Place => "place",
            CategoryTag::Abstract => "abstract",
            CategoryTag::Other => "other",
        }
    }

    /// Man-made flag implied by the category alone
    pub fn is_manmade(self) -> bool {
        matches!(
            self,
            CategoryTag::Clothing
                | CategoryTag::Furniture
                | CategoryTag::VehicleMachine
                | CategoryTag::ObjectTool
                | CategoryTag::Electronics
                | CategoryTag::Household
        )
    }

    /// Map an external label category (`vehicle`, `tool`, ...) to a tag
    pub fn from_label(label: &str) -> Option<Self> {
        let tag = match label.trim().to_ascii_lowercase().as_str() {
            "animal" => CategoryTag::Animal,
            "person" => CategoryTag::Person,
            "food" => CategoryTag::Food,
            "plant" => CategoryTag::Plant,
            "vehicle" => CategoryTag::VehicleMachine,
            "tool" => CategoryTag::ObjectTool,
            "electronics" => CategoryTag::Electronics,
            "household" => CategoryTag::Household,
            "clothing" => CategoryTag::Clothing,
            "place" => CategoryTag::Place,
            "abstract" => CategoryTag::Abstract,
            "other" => CategoryTag::Other,
            _ => return None,
        };
        Some(tag)
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        CategoryTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or(s)
    }
}

/// Origin dimension of an external label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelOrigin {
    ManMade,
    Natural,
    Both,
}

impl LabelOrigin {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "man-made" | "manmade" => Some(LabelOrigin::ManMade),
            "natural" => Some(LabelOrigin::Natural),
            "both" => Some(LabelOrigin::Both),
            _ => None,
        }
    }
}

/// Size dimension of an external label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelSize {
    FitsInBackpack,
    TooBigForBackpack,
    SizeVaries,
}

impl LabelSize {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fits-in-backpack" => Some(LabelSize::FitsInBackpack),
            "too-big-for-backpack" => Some(LabelSize::TooBigForBackpack),
            "size-varies" => Some(LabelSize::SizeVaries),
            _ => None,
        }
    }
}

/// Externally produced label row; absent fields leave the entry unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThingLabel {
    pub origin: Option<LabelOrigin>,
    pub size: Option<LabelSize>,
    pub category: Option<CategoryTag>,
}

/// Fields shared by every indexed record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Canonical lowercase surface form (may contain separators)
    #[serde(rename = "word")]
    pub text: String,
    #[serde(skip)]
    pub key: StructuralKey,
    pub category: CategoryTag,
    pub manmade: bool,
    pub common: bool,
    pub holdable: bool,
    pub rhyme: bool,
    pub compound: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<LabelSize>,
}

impl Entry {
    /// Create an entry for `text`; `None` when no structural key can be formed
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let key = StructuralKey::of(&text)?;
        Some(Self {
            text,
            key,
            category: CategoryTag::Unknown,
            manmade: false,
            common: false,
            holdable: false,
            rhyme: false,
            compound: false,
            size: None,
        })
    }

    pub fn with_category(mut self, category: CategoryTag, manmade: bool) -> Self {
        self.category = category;
        self.manmade = manmade;
        self
    }

    /// Text with separators removed
    pub fn letters(&self) -> String {
        encoder::clean(&self.text)
    }

    /// Whether the surface form contains a space or hyphen
    pub fn has_separator(&self) -> bool {
        self.text.chars().any(encoder::is_separator)
    }

    /// Merge an external label, overriding category and man-made flag
    pub fn apply_label(&mut self, label: &ThingLabel) {
        if let Some(category) = label.category {
            self.category = category;
            self.manmade = category.is_manmade();
        }
        match label.origin {
            Some(LabelOrigin::ManMade) => self.manmade = true,
            Some(LabelOrigin::Natural) => self.manmade = false,
            Some(LabelOrigin::Both) | None => {}
        }
        if label.size.is_some() {
            self.size = label.size;
        }
    }
}
