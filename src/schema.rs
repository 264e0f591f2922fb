//! Versioned-schema mapping for API responses.
//!
//! The player-data API has shipped two incompatible key conventions for the
//! same document. The current one (camelCase, `detailInfo` root) is
//! deserialized straight into [`RawProfile`]; the legacy PascalCase one
//! (`PlayerDetailInfo` root) is decoded into the private types below and
//! converted. Detection looks only at the root key.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::model::{
    DEFAULT_HEAD_ICON, RawChallenge, RawCharacter, RawLightCone, RawPlayer, RawProfile,
    RawRecord, RawRelic, RawSkillTree, RawSubAffix,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// `{"detailInfo": {...}}`
    Current,
    /// `{"PlayerDetailInfo": {...}}`
    Legacy,
}

pub fn detect(value: &Value) -> SchemaVersion {
    if value.get("PlayerDetailInfo").is_some() && value.get("detailInfo").is_none() {
        SchemaVersion::Legacy
    } else {
        SchemaVersion::Current
    }
}

/// Decodes a response body of either schema variant into the canonical model.
pub fn decode(body: &[u8]) -> Result<RawProfile> {
    let value: Value = serde_json::from_slice(body)?;
    let profile = match detect(&value) {
        SchemaVersion::Current => serde_json::from_value(value)?,
        SchemaVersion::Legacy => serde_json::from_value::<LegacyProfile>(value)?.into(),
    };
    Ok(profile)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacyProfile {
    player_detail_info: Option<LegacyPlayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacyPlayer {
    #[serde(rename = "UID")]
    uid: u64,
    nick_name: String,
    level: u32,
    world_level: u32,
    cur_friend_count: u32,
    #[serde(rename = "HeadIconID")]
    head_icon_id: u32,
    signature: String,
    birthday: u32,
    is_display_avatar_list: bool,
    player_space_info: Option<LegacySpace>,
    assist_avatar: Option<LegacyCharacter>,
    display_avatar_list: Vec<LegacyCharacter>,
}

impl Default for LegacyPlayer {
    fn default() -> Self {
        Self {
            uid: 0,
            nick_name: String::new(),
            level: 0,
            world_level: 0,
            cur_friend_count: 0,
            head_icon_id: DEFAULT_HEAD_ICON,
            signature: String::new(),
            birthday: 0,
            is_display_avatar_list: false,
            player_space_info: None,
            assist_avatar: None,
            display_avatar_list: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacySpace {
    challenge_data: Option<LegacyChallenge>,
    pass_area_progress: u32,
    light_cone_count: u32,
    avatar_count: u32,
    achievement_count: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyChallenge {
    #[serde(rename = "MazeGroupID")]
    maze_group_id: u32,
    #[serde(rename = "MazeGroupIndex")]
    maze_group_index: u32,
    #[serde(rename = "PreMazeGroupIndex")]
    pre_maze_group_index: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacyCharacter {
    #[serde(rename = "AvatarID")]
    avatar_id: u32,
    rank: u32,
    level: u32,
    promotion: u32,
    #[serde(rename = "EquipmentID")]
    equipment: Option<LegacyEquipment>,
    behavior_list: Vec<LegacyBehavior>,
    relic_list: Vec<LegacyRelic>,
}

impl Default for LegacyCharacter {
    fn default() -> Self {
        Self {
            avatar_id: 0,
            rank: 0,
            level: 1,
            promotion: 0,
            equipment: None,
            behavior_list: Vec::new(),
            relic_list: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacyEquipment {
    #[serde(rename = "ID")]
    id: u32,
    rank: u32,
    level: u32,
    promotion: u32,
}

impl Default for LegacyEquipment {
    fn default() -> Self {
        Self {
            id: 0,
            rank: 1,
            level: 1,
            promotion: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacyBehavior {
    #[serde(rename = "BehaviorID")]
    behavior_id: u32,
    level: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacyRelic {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "MainAffixID")]
    main_affix_id: u32,
    #[serde(rename = "Type")]
    slot: u32,
    level: u32,
    #[serde(rename = "EXP")]
    exp: u32,
    relic_sub_affix: Vec<LegacySubAffix>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct LegacySubAffix {
    #[serde(rename = "SubAffixID")]
    sub_affix_id: u32,
    cnt: u32,
    step: u32,
}

impl From<LegacyProfile> for RawProfile {
    fn from(legacy: LegacyProfile) -> Self {
        RawProfile {
            detail_info: legacy.player_detail_info.map(Into::into),
        }
    }
}

impl From<LegacyPlayer> for RawPlayer {
    fn from(p: LegacyPlayer) -> Self {
        RawPlayer {
            uid: p.uid,
            nickname: p.nick_name,
            level: p.level,
            world_level: p.world_level,
            friend_count: p.cur_friend_count,
            head_icon: p.head_icon_id,
            signature: p.signature,
            birthday: p.birthday,
            is_display_avatar: p.is_display_avatar_list,
            record_info: p.player_space_info.map(Into::into),
            assist_avatar_detail: p.assist_avatar.map(Into::into),
            avatar_detail_list: p.display_avatar_list.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<LegacySpace> for RawRecord {
    fn from(s: LegacySpace) -> Self {
        RawRecord {
            challenge_info: s.challenge_data.map(|c| RawChallenge {
                schedule_group_id: c.maze_group_id,
                schedule_max_level: c.maze_group_index,
                none_schedule_max_level: c.pre_maze_group_index,
            }),
            max_rogue_challenge_score: s.pass_area_progress,
            equipment_count: s.light_cone_count,
            avatar_count: s.avatar_count,
            relic_count: 0,
            achievement_count: s.achievement_count,
        }
    }
}

impl From<LegacyCharacter> for RawCharacter {
    fn from(c: LegacyCharacter) -> Self {
        RawCharacter {
            avatar_id: c.avatar_id,
            rank: c.rank,
            level: c.level,
            promotion: c.promotion,
            equipment: c.equipment.map(|e| RawLightCone {
                tid: e.id,
                rank: e.rank,
                level: e.level,
                promotion: e.promotion,
            }),
            relic_list: c
                .relic_list
                .into_iter()
                .map(|r| RawRelic {
                    tid: r.id,
                    level: r.level,
                    main_affix_id: r.main_affix_id,
                    slot: r.slot,
                    exp: r.exp,
                    sub_affix_list: r
                        .relic_sub_affix
                        .into_iter()
                        .map(|a| RawSubAffix {
                            affix_id: a.sub_affix_id,
                            cnt: a.cnt,
                            step: a.step,
                        })
                        .collect(),
                })
                .collect(),
            skill_tree_list: c
                .behavior_list
                .into_iter()
                .map(|b| RawSkillTree {
                    point_id: b.behavior_id,
                    level: b.level,
                })
                .collect(),
        }
    }
}
