//! Record types of the `index_min` metadata files.
//!
//! Every field defaults so that a record missing from a map (or a partially
//! populated one) resolves to empty strings and zeroes.

use foldhash::HashMap;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharacterType {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub rarity: u32,
    pub path: String,
    pub element: String,
    pub max_sp: u32,
    pub ranks: Vec<String>,
    pub skills: Vec<String>,
    pub skill_trees: Vec<String>,
    pub icon: String,
    pub preview: String,
    pub portrait: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelUpSkill {
    pub id: String,
    pub num: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharacterRankType {
    pub id: String,
    pub name: String,
    pub rank: u32,
    pub desc: String,
    pub level_up_skills: Vec<LevelUpSkill>,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharacterSkillType {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    pub element: String,
    #[serde(rename = "type")]
    pub skill_type: String,
    pub type_text: String,
    pub effect: String,
    pub effect_text: String,
    pub simple_desc: String,
    pub desc: String,
    pub params: Vec<Vec<f64>>,
    pub icon: String,
}

/// A `{"type": ..., "value": ...}` pair used by every bonus list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyValue {
    #[serde(rename = "type")]
    pub property_type: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SkillTreeLevel {
    pub promotion: u32,
    pub level: u32,
    pub properties: Vec<PropertyValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CharacterSkillTreeType {
    pub id: String,
    pub name: String,
    pub max_level: u32,
    pub anchor: String,
    pub pre_points: Vec<String>,
    pub level_up_skills: Vec<LevelUpSkill>,
    pub levels: Vec<SkillTreeLevel>,
    pub icon: String,
}

/// Linear growth curve: `base + step * n`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ValueGrowth {
    pub base: f64,
    pub step: f64,
}

/// Per-promotion-tier growth curves keyed by stat field (`hp`, `atk`, ...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromotionType {
    pub id: String,
    pub values: Vec<HashMap<String, ValueGrowth>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LightConeType {
    pub id: String,
    pub name: String,
    pub rarity: u32,
    pub path: String,
    pub desc: String,
    pub icon: String,
    pub preview: String,
    pub portrait: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LightConeRankType {
    pub id: String,
    pub skill: String,
    pub desc: String,
    pub params: Vec<Vec<f64>>,
    /// Passive bonuses, one list per superimposition rank.
    pub properties: Vec<Vec<PropertyValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelicType {
    pub id: String,
    pub set_id: String,
    pub name: String,
    pub rarity: u32,
    #[serde(rename = "type")]
    pub slot: String,
    pub max_level: u32,
    pub main_affix_id: String,
    pub sub_affix_id: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelicSetType {
    pub id: String,
    pub name: String,
    /// Bonus descriptions: 2-piece first, then 4-piece.
    pub desc: Vec<String>,
    pub properties: Vec<Vec<PropertyValue>>,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MainAffix {
    pub affix_id: String,
    pub property: String,
    pub base: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelicMainAffixType {
    pub id: String,
    pub affixes: HashMap<String, MainAffix>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubAffix {
    pub affix_id: String,
    pub property: String,
    pub base: f64,
    pub step: f64,
    pub step_num: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelicSubAffixType {
    pub id: String,
    pub affixes: HashMap<String, SubAffix>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathType {
    pub id: String,
    pub text: String,
    pub name: String,
    pub desc: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ElementType {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub color: String,
    pub icon: String,
}

/// Display metadata of a stat property type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyType {
    #[serde(rename = "type")]
    pub property_type: String,
    pub name: String,
    pub field: String,
    pub affix: bool,
    pub ratio: bool,
    pub percent: bool,
    pub order: u32,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AvatarType {
    pub id: String,
    pub name: String,
    pub icon: String,
}
