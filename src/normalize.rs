//! Raw profile → localized [`Profile`].

use crate::index::{
    CharacterBasicInfo, Index, LevelInfo, LightConeBasicInfo, RelicBasicInfo, SubAffixBasicInfo,
};
use crate::model::{RawCharacter, RawPlayer, RawProfile, RawRecord};
use crate::profile::{
    AvatarInfo, CharacterInfo, PlayerInfo, Profile, SpaceChallengeInfo, SpaceInfo,
};

/// Token in character names replaced by the player's nickname (the
/// Trailblazer is named after the player).
pub const NICKNAME_PLACEHOLDER: &str = "{NICKNAME}";

/// Normalizes `raw` against `index`; `None` when the player detail is absent.
///
/// The assist character comes first. A displayed character with the same
/// ID as the assist is skipped; display order is otherwise kept.
pub fn normalize(raw: &RawProfile, index: &Index) -> Option<Profile> {
    let detail = raw.detail_info.as_ref()?;
    let player = player_info(detail, index);

    let mut characters = Vec::with_capacity(detail.avatar_detail_list.len() + 1);
    let assist = detail.assist_avatar_detail.as_ref();
    if let Some(assist) = assist {
        characters.push(character_info(assist, index, &player.nickname));
    }
    for character in &detail.avatar_detail_list {
        if assist.is_some_and(|a| a.avatar_id == character.avatar_id) {
            continue;
        }
        characters.push(character_info(character, index, &player.nickname));
    }

    Some(Profile { player, characters })
}

/// Converts a wire character into the index's input shape.
pub fn character_basic(raw: &RawCharacter) -> CharacterBasicInfo {
    CharacterBasicInfo {
        id: raw.avatar_id.to_string(),
        rank: raw.rank,
        level: raw.level,
        promotion: raw.promotion,
        skill_tree_levels: raw
            .skill_tree_list
            .iter()
            .map(|tree| LevelInfo {
                id: tree.point_id.to_string(),
                level: tree.level,
            })
            .collect(),
        light_cone: raw.equipment.as_ref().map(|lc| LightConeBasicInfo {
            id: lc.tid.to_string(),
            rank: lc.rank,
            level: lc.level,
            promotion: lc.promotion,
        }),
        relics: raw
            .relic_list
            .iter()
            .map(|relic| RelicBasicInfo {
                id: relic.tid.to_string(),
                level: relic.level,
                main_affix_id: relic.main_affix_id.to_string(),
                sub_affix_info: relic
                    .sub_affix_list
                    .iter()
                    .map(|affix| SubAffixBasicInfo {
                        id: affix.affix_id.to_string(),
                        cnt: affix.cnt,
                        step: affix.step,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn character_info(raw: &RawCharacter, index: &Index, nickname: &str) -> CharacterInfo {
    let mut info = index.character_info(&character_basic(raw));
    info.name = info.name.replace(NICKNAME_PLACEHOLDER, nickname);
    info
}

fn player_info(detail: &RawPlayer, index: &Index) -> PlayerInfo {
    let head_icon = detail.head_icon.to_string();
    let avatar = index.avatar(&head_icon);
    PlayerInfo {
        uid: detail.uid.to_string(),
        nickname: detail.nickname.clone(),
        level: detail.level,
        world_level: detail.world_level,
        friend_count: detail.friend_count,
        avatar: AvatarInfo {
            name: avatar.map(|a| a.name.clone()).unwrap_or_default(),
            icon: avatar.map(|a| a.icon.clone()).unwrap_or_default(),
            id: head_icon,
        },
        signature: detail.signature.clone(),
        birthday: detail.birthday,
        is_display: detail.is_display_avatar,
        space_info: detail.record_info.as_ref().map(space_info),
    }
}

fn space_info(record: &RawRecord) -> SpaceInfo {
    SpaceInfo {
        challenge_data: record
            .challenge_info
            .as_ref()
            .map(|challenge| SpaceChallengeInfo {
                maze_group_id: challenge.schedule_group_id,
                maze_group_index: challenge.schedule_max_level,
                pre_maze_group_index: challenge.none_schedule_max_level,
            }),
        pass_area_progress: record.max_rogue_challenge_score,
        light_cone_count: record.equipment_count,
        avatar_count: record.avatar_count,
        relic_count: record.relic_count,
        achievement_count: record.achievement_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::fixture_index;
    use crate::model::{RawChallenge, RawLightCone};
    use pretty_assertions::assert_eq;

    fn character(avatar_id: u32) -> RawCharacter {
        RawCharacter {
            avatar_id,
            level: 50,
            ..Default::default()
        }
    }

    fn profile(assist: Option<RawCharacter>, displayed: Vec<RawCharacter>) -> RawProfile {
        RawProfile {
            detail_info: Some(RawPlayer {
                uid: 101797189,
                nickname: "Trailblazer".to_string(),
                level: 70,
                assist_avatar_detail: assist,
                avatar_detail_list: displayed,
                ..Default::default()
            }),
        }
    }

    fn ids(profile: &Profile) -> Vec<&str> {
        profile.characters.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_missing_detail_is_none() {
        assert!(normalize(&RawProfile::default(), &fixture_index()).is_none());
    }

    #[test]
    fn test_assist_duplicate_is_normalized_once() {
        let mut assist = character(1001);
        assist.rank = 2;
        let raw = profile(Some(assist), vec![character(8002), character(1001)]);

        let result = normalize(&raw, &fixture_index()).unwrap();
        assert_eq!(ids(&result), vec!["1001", "8002"]);
        assert_eq!(result.characters[0].rank, 2);
    }

    #[test]
    fn test_no_assist_keeps_display_order() {
        let raw = profile(None, vec![character(8002), character(1001)]);
        let result = normalize(&raw, &fixture_index()).unwrap();
        assert_eq!(ids(&result), vec!["8002", "1001"]);
    }

    #[test]
    fn test_nickname_placeholder_replaced_everywhere() {
        let mut index = fixture_index();
        if let Some(trailblazer) = index.characters.get_mut("8002") {
            trailblazer.name = "{NICKNAME} / {NICKNAME}".to_string();
        }
        let raw = profile(Some(character(8002)), vec![]);

        let result = normalize(&raw, &index).unwrap();
        assert_eq!(result.characters[0].name, "Trailblazer / Trailblazer");
    }

    #[test]
    fn test_player_info_and_head_icon() {
        let mut raw = profile(None, vec![]);
        if let Some(detail) = raw.detail_info.as_mut() {
            detail.head_icon = 200001;
            detail.record_info = Some(RawRecord {
                challenge_info: Some(RawChallenge {
                    schedule_group_id: 4,
                    schedule_max_level: 10,
                    none_schedule_max_level: 15,
                }),
                max_rogue_challenge_score: 6,
                equipment_count: 90,
                avatar_count: 33,
                relic_count: 800,
                achievement_count: 410,
            });
        }

        let player = normalize(&raw, &fixture_index()).unwrap().player;
        assert_eq!(player.uid, "101797189");
        assert_eq!(
            player.avatar,
            AvatarInfo {
                id: "200001".to_string(),
                name: "Trailblazer".to_string(),
                icon: "icon/avatar/200001.png".to_string(),
            }
        );
        assert_eq!(
            player.space_info,
            Some(SpaceInfo {
                challenge_data: Some(SpaceChallengeInfo {
                    maze_group_id: 4,
                    maze_group_index: 10,
                    pre_maze_group_index: 15,
                }),
                pass_area_progress: 6,
                light_cone_count: 90,
                avatar_count: 33,
                relic_count: 800,
                achievement_count: 410,
            })
        );
    }

    #[test]
    fn test_unknown_head_icon_is_empty() {
        let mut raw = profile(None, vec![]);
        if let Some(detail) = raw.detail_info.as_mut() {
            detail.head_icon = 1;
        }
        let player = normalize(&raw, &fixture_index()).unwrap().player;
        assert_eq!(player.avatar.id, "1");
        assert_eq!(player.avatar.name, "");
        assert!(player.space_info.is_none());
    }

    #[test]
    fn test_unknown_light_cone_does_not_fail() {
        let mut march = character(1001);
        march.equipment = Some(RawLightCone {
            tid: 99999,
            rank: 1,
            level: 40,
            promotion: 3,
        });
        let raw = profile(None, vec![march]);

        let result = normalize(&raw, &fixture_index()).unwrap();
        let light_cone = result.characters[0].light_cone.as_ref().unwrap();
        assert_eq!(light_cone.id, "99999");
        assert_eq!(light_cone.name, "");
        assert_eq!(light_cone.level, 40);
    }

    #[test]
    fn test_character_basic_stringifies_ids() {
        let raw: RawCharacter = serde_json::from_value(serde_json::json!({
            "avatarId": 1001,
            "rank": 1,
            "level": 80,
            "promotion": 6,
            "equipment": {"tid": 21000, "rank": 5, "level": 80, "promotion": 6},
            "relicList": [{"tid": 61011, "level": 15, "mainAffixId": 1, "subAffixList": [{"affixId": 9, "cnt": 2, "step": 1}]}],
            "skillTreeList": [{"pointId": 1001001, "level": 6}]
        }))
        .unwrap();

        let basic = character_basic(&raw);
        assert_eq!(basic.id, "1001");
        assert_eq!(basic.light_cone.as_ref().unwrap().id, "21000");
        assert_eq!(basic.relics[0].main_affix_id, "1");
        assert_eq!(basic.relics[0].sub_affix_info[0].id, "9");
        assert_eq!(basic.skill_tree_levels[0].id, "1001001");
    }
}
