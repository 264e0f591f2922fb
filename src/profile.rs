//! Normalized, localized profile returned to callers.
//!
//! Every numeric ID of the wire model is resolved here into a record with a
//! display name and icon path (relative to the resource host). Unknown IDs
//! keep their ID and carry empty strings / zero values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub player: PlayerInfo,
    pub characters: Vec<CharacterInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub uid: String,
    pub nickname: String,
    pub level: u32,
    pub world_level: u32,
    pub friend_count: u32,
    pub avatar: AvatarInfo,
    pub signature: String,
    pub birthday: u32,
    pub is_display: bool,
    pub space_info: Option<SpaceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceInfo {
    pub challenge_data: Option<SpaceChallengeInfo>,
    pub pass_area_progress: u32,
    pub light_cone_count: u32,
    pub avatar_count: u32,
    pub relic_count: u32,
    pub achievement_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceChallengeInfo {
    pub maze_group_id: u32,
    pub maze_group_index: u32,
    pub pre_maze_group_index: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementInfo {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// A fully resolved character, as displayed on a profile card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub id: String,
    pub name: String,
    pub rarity: u32,
    pub rank: u32,
    pub level: u32,
    pub promotion: u32,
    pub icon: String,
    pub preview: String,
    pub portrait: String,
    /// Eidolon icons, one per unlocked rank.
    pub rank_icons: Vec<String>,
    pub path: PathInfo,
    pub element: ElementInfo,
    pub skills: Vec<SkillInfo>,
    pub skill_trees: Vec<SkillTreeInfo>,
    pub light_cone: Option<LightConeInfo>,
    pub relics: Vec<RelicInfo>,
    pub relic_sets: Vec<RelicSetInfo>,
    /// Base stats of the character and its light cone, grouped by field.
    pub attributes: Vec<AttributeInfo>,
    /// Bonuses from relics, relic sets, light-cone rank and skill tree,
    /// summed per property type.
    pub properties: Vec<PropertyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillInfo {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    pub element: String,
    #[serde(rename = "type")]
    pub skill_type: String,
    pub type_text: String,
    pub effect: String,
    pub simple_desc: String,
    pub desc: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillTreeInfo {
    pub id: String,
    pub level: u32,
    pub anchor: String,
    pub max_level: u32,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightConeInfo {
    pub id: String,
    pub name: String,
    pub rarity: u32,
    pub rank: u32,
    pub level: u32,
    pub promotion: u32,
    pub icon: String,
    pub preview: String,
    pub portrait: String,
    pub path: PathInfo,
    pub attributes: Vec<AttributeInfo>,
    pub properties: Vec<PropertyInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelicInfo {
    pub id: String,
    pub name: String,
    pub set_id: String,
    pub set_name: String,
    pub rarity: u32,
    pub level: u32,
    pub icon: String,
    pub main_affix: Option<PropertyInfo>,
    pub sub_affix: Vec<SubAffixInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubAffixInfo {
    #[serde(flatten)]
    pub property: PropertyInfo,
    pub count: u32,
    pub step: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelicSetInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Number of equipped pieces of this set.
    pub num: u32,
    pub desc: String,
    pub properties: Vec<PropertyInfo>,
}

/// A base stat (`hp`, `atk`, ...) summed across sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub field: String,
    pub name: String,
    pub icon: String,
    pub value: f64,
    pub display: String,
    pub percent: bool,
}

/// A stat bonus keyed by its property type (`HPDelta`, `CriticalChanceBase`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    #[serde(rename = "type")]
    pub property_type: String,
    pub field: String,
    pub name: String,
    pub icon: String,
    pub value: f64,
    pub display: String,
    pub percent: bool,
}

/// Formats a stat the way the game UI does: percentages with one decimal,
/// flat values truncated to an integer.
pub fn display_value(value: f64, percent: bool) -> String {
    if percent {
        format!("{:.1}%", floor_snapped(value * 1000.0) / 10.0)
    } else {
        format!("{}", floor_snapped(value) as i64)
    }
}

/// Sums of table values land a few ulps below whole numbers; those still
/// count as reaching them.
fn floor_snapped(value: f64) -> f64 {
    (value + DISPLAY_EPSILON).floor()
}

const DISPLAY_EPSILON: f64 = 1e-6;
