//! Wire model of the player-data API and the closed set of index languages.
//!
//! These types follow the current API schema (camelCase keys under a
//! `detailInfo` root). Older payloads are converted into the same types by
//! [`crate::schema`], so nothing downstream has to care which variant the
//! server sent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages published by the resource host under `index_min/<code>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Cn,
    Cht,
    De,
    Es,
    Fr,
    Id,
    Jp,
    Kr,
    Pt,
    Ru,
    Th,
    Vi,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::En,
        Language::Cn,
        Language::Cht,
        Language::De,
        Language::Es,
        Language::Fr,
        Language::Id,
        Language::Jp,
        Language::Kr,
        Language::Pt,
        Language::Ru,
        Language::Th,
        Language::Vi,
    ];

    /// Directory name used both remotely and in the local cache.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Cn => "cn",
            Language::Cht => "cht",
            Language::De => "de",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Id => "id",
            Language::Jp => "jp",
            Language::Kr => "kr",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Th => "th",
            Language::Vi => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == lower)
            .ok_or_else(|| {
                let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
                format!("Unknown language '{}' (expected one of: {})", s, codes.join(", "))
            })
    }
}

/// Root of an API response. `detail_info` is absent for unknown or private players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProfile {
    pub detail_info: Option<RawPlayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPlayer {
    pub uid: u64,
    pub nickname: String,
    pub level: u32,
    pub world_level: u32,
    pub friend_count: u32,
    pub head_icon: u32,
    pub signature: String,
    pub birthday: u32,
    pub is_display_avatar: bool,
    pub record_info: Option<RawRecord>,
    pub assist_avatar_detail: Option<RawCharacter>,
    pub avatar_detail_list: Vec<RawCharacter>,
}

/// Player icon shown when the API omits `headIcon`.
pub const DEFAULT_HEAD_ICON: u32 = 200001;

impl Default for RawPlayer {
    fn default() -> Self {
        Self {
            uid: 0,
            nickname: String::new(),
            level: 0,
            world_level: 0,
            friend_count: 0,
            head_icon: DEFAULT_HEAD_ICON,
            signature: String::new(),
            birthday: 0,
            is_display_avatar: false,
            record_info: None,
            assist_avatar_detail: None,
            avatar_detail_list: Vec::new(),
        }
    }
}

/// Exploration summary ("space info" in the normalized model).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    pub challenge_info: Option<RawChallenge>,
    pub max_rogue_challenge_score: u32,
    pub equipment_count: u32,
    pub avatar_count: u32,
    pub relic_count: u32,
    pub achievement_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawChallenge {
    pub schedule_group_id: u32,
    pub schedule_max_level: u32,
    pub none_schedule_max_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCharacter {
    pub avatar_id: u32,
    pub rank: u32,
    pub level: u32,
    pub promotion: u32,
    pub equipment: Option<RawLightCone>,
    pub relic_list: Vec<RawRelic>,
    pub skill_tree_list: Vec<RawSkillTree>,
}

impl Default for RawCharacter {
    fn default() -> Self {
        Self {
            avatar_id: 0,
            rank: 0,
            level: 1,
            promotion: 0,
            equipment: None,
            relic_list: Vec::new(),
            skill_tree_list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLightCone {
    pub tid: u32,
    pub rank: u32,
    pub level: u32,
    pub promotion: u32,
}

impl Default for RawLightCone {
    fn default() -> Self {
        Self {
            tid: 0,
            rank: 1,
            level: 1,
            promotion: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRelic {
    pub tid: u32,
    pub level: u32,
    pub main_affix_id: u32,
    #[serde(rename = "type")]
    pub slot: u32,
    pub exp: u32,
    pub sub_affix_list: Vec<RawSubAffix>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubAffix {
    pub affix_id: u32,
    pub cnt: u32,
    pub step: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSkillTree {
    pub point_id: u32,
    pub level: u32,
}
