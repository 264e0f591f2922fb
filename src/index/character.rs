use foldhash::HashMap;

use super::records::PromotionType;
use super::{Index, or_empty};
use crate::profile::{
    AttributeInfo, CharacterInfo, ElementInfo, LightConeInfo, PathInfo, PropertyInfo, RelicInfo,
    RelicSetInfo, SkillInfo, SkillTreeInfo, SubAffixInfo, display_value,
};

/// Character state as reported by the API, with IDs in their string form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterBasicInfo {
    pub id: String,
    pub rank: u32,
    pub level: u32,
    pub promotion: u32,
    pub skill_tree_levels: Vec<LevelInfo>,
    pub light_cone: Option<LightConeBasicInfo>,
    pub relics: Vec<RelicBasicInfo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelInfo {
    pub id: String,
    pub level: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightConeBasicInfo {
    pub id: String,
    pub rank: u32,
    pub level: u32,
    pub promotion: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelicBasicInfo {
    pub id: String,
    pub level: u32,
    pub main_affix_id: String,
    pub sub_affix_info: Vec<SubAffixBasicInfo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubAffixBasicInfo {
    pub id: String,
    pub cnt: u32,
    pub step: u32,
}

/// Running per-key sums that keep first-insertion order.
#[derive(Default)]
struct Totals {
    order: Vec<String>,
    values: HashMap<String, f64>,
}

impl Totals {
    fn add(&mut self, key: &str, value: f64) {
        match self.values.get_mut(key) {
            Some(total) => *total += value,
            None => {
                self.order.push(key.to_string());
                self.values.insert(key.to_string(), value);
            }
        }
    }

    fn into_pairs(self) -> Vec<(String, f64)> {
        let Totals { order, values } = self;
        order
            .into_iter()
            .map(|key| {
                let value = values.get(&key).copied().unwrap_or_default();
                (key, value)
            })
            .collect()
    }
}

impl Index {
    /// Resolves every ID of `basic` against this index.
    ///
    /// Unknown IDs never fail: the corresponding record is left with empty
    /// names/icons and zero stats.
    pub fn character_info(&self, basic: &CharacterBasicInfo) -> CharacterInfo {
        let character = or_empty(&self.characters, &basic.id);

        let rank_icons = character
            .ranks
            .iter()
            .take(basic.rank as usize)
            .filter_map(|id| self.character_ranks.get(id))
            .map(|rank| rank.icon.clone())
            .collect();

        let mut bonuses = Totals::default();
        let skill_trees = self.skill_trees(basic, &mut bonuses);
        let skills = self.skills(&character.skills, &character.ranks, basic);

        let mut base_stats = Totals::default();
        self.add_growth(
            &self.character_promotions,
            &basic.id,
            basic.promotion,
            basic.level,
            &mut base_stats,
        );

        let light_cone = basic.light_cone.as_ref().map(|lc| {
            let info = self.light_cone_info(lc);
            for attribute in &info.attributes {
                base_stats.add(&attribute.field, attribute.value);
            }
            for property in &info.properties {
                bonuses.add(&property.property_type, property.value);
            }
            info
        });

        let relics: Vec<RelicInfo> = basic.relics.iter().map(|r| self.relic_info(r)).collect();
        for relic in &relics {
            if let Some(main) = &relic.main_affix {
                bonuses.add(&main.property_type, main.value);
            }
            for sub in &relic.sub_affix {
                if !sub.property.property_type.is_empty() {
                    bonuses.add(&sub.property.property_type, sub.property.value);
                }
            }
        }

        let relic_sets = self.relic_sets(&relics);
        for set in &relic_sets {
            for property in &set.properties {
                bonuses.add(&property.property_type, property.value);
            }
        }

        CharacterInfo {
            id: basic.id.clone(),
            name: character.name.clone(),
            rarity: character.rarity,
            rank: basic.rank,
            level: basic.level,
            promotion: basic.promotion,
            icon: character.icon.clone(),
            preview: character.preview.clone(),
            portrait: character.portrait.clone(),
            rank_icons,
            path: self.path_info(&character.path),
            element: self.element_info(&character.element),
            skills,
            skill_trees,
            light_cone,
            relics,
            relic_sets,
            attributes: self.attributes(base_stats),
            properties: self.properties(bonuses),
        }
    }

    fn path_info(&self, id: &str) -> PathInfo {
        let path = or_empty(&self.paths, id);
        PathInfo {
            id: id.to_string(),
            name: path.name.clone(),
            icon: path.icon.clone(),
        }
    }

    fn element_info(&self, id: &str) -> ElementInfo {
        let element = or_empty(&self.elements, id);
        ElementInfo {
            id: id.to_string(),
            name: element.name.clone(),
            color: element.color.clone(),
            icon: element.icon.clone(),
        }
    }

    /// Allocated skill-tree nodes, collecting the stat bonuses of the
    /// levels reached into `bonuses`.
    fn skill_trees(&self, basic: &CharacterBasicInfo, bonuses: &mut Totals) -> Vec<SkillTreeInfo> {
        basic
            .skill_tree_levels
            .iter()
            .map(|allocated| {
                let tree = or_empty(&self.character_skill_trees, &allocated.id);
                if allocated.level > 0
                    && let Some(level) = tree.levels.get(allocated.level as usize - 1)
                {
                    for property in &level.properties {
                        bonuses.add(&property.property_type, property.value);
                    }
                }
                SkillTreeInfo {
                    id: allocated.id.clone(),
                    level: allocated.level,
                    anchor: tree.anchor.clone(),
                    max_level: tree.max_level,
                    icon: tree.icon.clone(),
                }
            })
            .collect()
    }

    /// Effective skill levels: the level of every tree node that upgrades a
    /// skill, plus the bonus levels granted by unlocked ranks.
    fn skills(
        &self,
        skill_ids: &[String],
        rank_ids: &[String],
        basic: &CharacterBasicInfo,
    ) -> Vec<SkillInfo> {
        let mut levels: HashMap<&str, u32> = HashMap::default();
        for allocated in &basic.skill_tree_levels {
            if let Some(tree) = self.character_skill_trees.get(&allocated.id) {
                for skill in &tree.level_up_skills {
                    *levels.entry(skill.id.as_str()).or_default() += allocated.level;
                }
            }
        }
        for rank_id in rank_ids.iter().take(basic.rank as usize) {
            if let Some(rank) = self.character_ranks.get(rank_id) {
                for skill in &rank.level_up_skills {
                    *levels.entry(skill.id.as_str()).or_default() += skill.num;
                }
            }
        }

        skill_ids
            .iter()
            .map(|id| {
                let skill = or_empty(&self.character_skills, id);
                SkillInfo {
                    id: id.clone(),
                    name: skill.name.clone(),
                    level: levels.get(id.as_str()).copied().unwrap_or_default(),
                    max_level: skill.max_level,
                    element: skill.element.clone(),
                    skill_type: skill.skill_type.clone(),
                    type_text: skill.type_text.clone(),
                    effect: skill.effect.clone(),
                    simple_desc: skill.simple_desc.clone(),
                    desc: skill.desc.clone(),
                    icon: skill.icon.clone(),
                }
            })
            .collect()
    }

    /// Adds `base + step * (level - 1)` of every field of the promotion tier.
    fn add_growth(
        &self,
        promotions: &HashMap<String, PromotionType>,
        id: &str,
        promotion: u32,
        level: u32,
        totals: &mut Totals,
    ) {
        let Some(tier) = promotions
            .get(id)
            .and_then(|p| p.values.get(promotion as usize))
        else {
            return;
        };
        let mut fields: Vec<_> = tier.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, growth) in fields {
            let value = growth.base + growth.step * f64::from(level.saturating_sub(1));
            totals.add(field, value);
        }
    }

    fn light_cone_info(&self, basic: &LightConeBasicInfo) -> LightConeInfo {
        let light_cone = or_empty(&self.light_cones, &basic.id);

        let mut stats = Totals::default();
        self.add_growth(
            &self.light_cone_promotions,
            &basic.id,
            basic.promotion,
            basic.level,
            &mut stats,
        );

        let properties = self
            .light_cone_ranks
            .get(&basic.id)
            .and_then(|ranks| ranks.properties.get(basic.rank.saturating_sub(1) as usize))
            .map(|props| {
                props
                    .iter()
                    .map(|p| self.property_info(&p.property_type, p.value))
                    .collect()
            })
            .unwrap_or_default();

        LightConeInfo {
            id: basic.id.clone(),
            name: light_cone.name.clone(),
            rarity: light_cone.rarity,
            rank: basic.rank,
            level: basic.level,
            promotion: basic.promotion,
            icon: light_cone.icon.clone(),
            preview: light_cone.preview.clone(),
            portrait: light_cone.portrait.clone(),
            path: if light_cone.path.is_empty() {
                PathInfo::default()
            } else {
                self.path_info(&light_cone.path)
            },
            attributes: self.attributes(stats),
            properties,
        }
    }

    fn relic_info(&self, basic: &RelicBasicInfo) -> RelicInfo {
        let relic = or_empty(&self.relics, &basic.id);
        let set = or_empty(&self.relic_sets, &relic.set_id);

        // Main stat: base + step * level
        let main_affix = self
            .relic_main_affixes
            .get(&relic.main_affix_id)
            .and_then(|group| group.affixes.get(&basic.main_affix_id))
            .map(|affix| {
                let value = affix.base + affix.step * f64::from(basic.level);
                self.property_info(&affix.property, value)
            });

        // Sub stat: base * count + step * upgrade steps
        let sub_affix = basic
            .sub_affix_info
            .iter()
            .map(|sub| {
                let property = self
                    .relic_sub_affixes
                    .get(&relic.sub_affix_id)
                    .and_then(|group| group.affixes.get(&sub.id))
                    .map(|affix| {
                        let value =
                            affix.base * f64::from(sub.cnt) + affix.step * f64::from(sub.step);
                        self.property_info(&affix.property, value)
                    })
                    .unwrap_or_default();
                SubAffixInfo {
                    property,
                    count: sub.cnt,
                    step: sub.step,
                }
            })
            .collect();

        RelicInfo {
            id: basic.id.clone(),
            name: relic.name.clone(),
            set_id: relic.set_id.clone(),
            set_name: set.name.clone(),
            rarity: relic.rarity,
            level: basic.level,
            icon: relic.icon.clone(),
            main_affix,
            sub_affix,
        }
    }

    /// Set bonuses reached by the equipped relics: one entry per threshold
    /// (2 and 4 pieces).
    fn relic_sets(&self, relics: &[RelicInfo]) -> Vec<RelicSetInfo> {
        let mut counts = Totals::default();
        for relic in relics.iter().filter(|r| !r.set_id.is_empty()) {
            counts.add(&relic.set_id, 1.0);
        }

        let mut sets = Vec::new();
        for (set_id, count) in counts.into_pairs() {
            let set = or_empty(&self.relic_sets, &set_id);
            for (tier, num) in [2u32, 4].into_iter().enumerate() {
                if count < f64::from(num) {
                    break;
                }
                let Some(desc) = set.desc.get(tier) else {
                    break;
                };
                let properties = set
                    .properties
                    .get(tier)
                    .map(|props| {
                        props
                            .iter()
                            .map(|p| self.property_info(&p.property_type, p.value))
                            .collect()
                    })
                    .unwrap_or_default();
                sets.push(RelicSetInfo {
                    id: set_id.clone(),
                    name: set.name.clone(),
                    icon: set.icon.clone(),
                    num,
                    desc: desc.clone(),
                    properties,
                });
            }
        }
        sets
    }

    fn attributes(&self, totals: Totals) -> Vec<AttributeInfo> {
        let mut attributes: Vec<(u32, AttributeInfo)> = totals
            .into_pairs()
            .into_iter()
            .map(|(field, value)| {
                let property = self.field_property(&field);
                let percent = property.is_some_and(|p| p.percent);
                let order = property.map_or(u32::MAX, |p| p.order);
                let info = AttributeInfo {
                    name: property.map(|p| p.name.clone()).unwrap_or_default(),
                    icon: property.map(|p| p.icon.clone()).unwrap_or_default(),
                    field,
                    value,
                    display: display_value(value, percent),
                    percent,
                };
                (order, info)
            })
            .collect();
        attributes.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.field.cmp(&b.1.field)));
        attributes.into_iter().map(|(_, info)| info).collect()
    }

    fn properties(&self, totals: Totals) -> Vec<PropertyInfo> {
        let mut properties: Vec<(u32, PropertyInfo)> = totals
            .into_pairs()
            .into_iter()
            .map(|(property_type, value)| {
                let order = self
                    .properties
                    .get(&property_type)
                    .map_or(u32::MAX, |p| p.order);
                (order, self.property_info(&property_type, value))
            })
            .collect();
        properties.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| a.1.property_type.cmp(&b.1.property_type))
        });
        properties.into_iter().map(|(_, info)| info).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::fixture_index;
    use pretty_assertions::assert_eq;

    fn march() -> CharacterBasicInfo {
        CharacterBasicInfo {
            id: "1001".to_string(),
            rank: 2,
            level: 11,
            promotion: 1,
            skill_tree_levels: vec![
                LevelInfo {
                    id: "1001001".to_string(),
                    level: 3,
                },
                LevelInfo {
                    id: "1001002".to_string(),
                    level: 1,
                },
            ],
            light_cone: Some(LightConeBasicInfo {
                id: "21000".to_string(),
                rank: 2,
                level: 11,
                promotion: 1,
            }),
            relics: vec![
                RelicBasicInfo {
                    id: "61011".to_string(),
                    level: 15,
                    main_affix_id: "1".to_string(),
                    sub_affix_info: vec![SubAffixBasicInfo {
                        id: "9".to_string(),
                        cnt: 2,
                        step: 3,
                    }],
                },
                RelicBasicInfo {
                    id: "61012".to_string(),
                    level: 0,
                    main_affix_id: "1".to_string(),
                    sub_affix_info: vec![],
                },
            ],
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_character_descriptive_fields() {
        let info = fixture_index().character_info(&march());
        assert_eq!(info.name, "March 7th");
        assert_eq!(info.rarity, 4);
        assert_eq!(info.path.name, "Preservation");
        assert_eq!(info.element.color, "#47C7FD");
        assert_eq!(
            info.rank_icons,
            vec!["icon/skill/1001_rank1.png", "icon/skill/1001_rank2.png"]
        );
        assert_eq!(info.skill_trees[0].anchor, "Point01");
    }

    #[test]
    fn test_skill_levels_include_tree_and_rank_bonus() {
        let info = fixture_index().character_info(&march());
        let levels: Vec<(&str, u32)> = info
            .skills
            .iter()
            .map(|s| (s.id.as_str(), s.level))
            .collect();
        assert_eq!(levels, vec![("100101", 3), ("100102", 2)]);
    }

    #[test]
    fn test_light_cone_attributes_and_rank_properties() {
        let info = fixture_index().character_info(&march());
        let light_cone = info.light_cone.unwrap();
        assert_eq!(light_cone.name, "Post-Op Conversation");
        assert_eq!(light_cone.attributes.len(), 1);
        // 105.6 + 7.2 * 10
        assert!(approx(light_cone.attributes[0].value, 177.6));
        assert_eq!(light_cone.attributes[0].name, "HP");
        assert_eq!(light_cone.properties[0].property_type, "SPRatioBase");
        assert!(approx(light_cone.properties[0].value, 0.10));
    }

    #[test]
    fn test_attributes_sum_character_and_light_cone() {
        let info = fixture_index().character_info(&march());
        let hp = info.attributes.iter().find(|a| a.field == "hp").unwrap();
        // character 201.6 + 7.2 * 10, light cone 177.6
        assert!(approx(hp.value, 273.6 + 177.6));
        assert_eq!(hp.display, "451");
        let spd = info.attributes.iter().find(|a| a.field == "spd").unwrap();
        assert!(approx(spd.value, 101.0));
        assert_eq!(info.attributes[0].field, "hp");
    }

    #[test]
    fn test_relic_affix_values() {
        let info = fixture_index().character_info(&march());
        let head = &info.relics[0];
        assert_eq!(head.set_name, "Passerby of Wandering Cloud");
        let main = head.main_affix.as_ref().unwrap();
        assert_eq!(main.property_type, "HPDelta");
        assert!(approx(main.value, 112.896 + 39.5136 * 15.0));

        let sub = &head.sub_affix[0];
        assert_eq!(sub.property.name, "CRIT Rate");
        assert!(approx(sub.property.value, 0.0324 * 2.0 + 0.0036 * 3.0));
        assert_eq!(sub.property.display, "7.5%");
    }

    #[test]
    fn test_two_piece_set_bonus_only() {
        let info = fixture_index().character_info(&march());
        assert_eq!(info.relic_sets.len(), 1);
        assert_eq!(info.relic_sets[0].num, 2);
        assert_eq!(info.relic_sets[0].properties[0].property_type, "HealRatioBase");
    }

    #[test]
    fn test_properties_collect_every_bonus_in_order() {
        let info = fixture_index().character_info(&march());
        let types: Vec<&str> = info
            .properties
            .iter()
            .map(|p| p.property_type.as_str())
            .collect();
        assert_eq!(
            types,
            vec![
                "HPDelta",
                "AttackDelta",
                "DefenceAddedRatio",
                "CriticalChanceBase",
                "HealRatioBase",
                "SPRatioBase"
            ]
        );
    }

    #[test]
    fn test_unknown_light_cone_degrades_to_empty_record() {
        let mut basic = march();
        basic.light_cone = Some(LightConeBasicInfo {
            id: "99999".to_string(),
            rank: 5,
            level: 80,
            promotion: 6,
        });
        let light_cone = fixture_index().character_info(&basic).light_cone.unwrap();
        assert_eq!(
            light_cone,
            LightConeInfo {
                id: "99999".to_string(),
                rank: 5,
                level: 80,
                promotion: 6,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_character_degrades_to_empty_record() {
        let basic = CharacterBasicInfo {
            id: "4242".to_string(),
            rank: 1,
            level: 20,
            relics: vec![RelicBasicInfo {
                id: "0".to_string(),
                level: 3,
                main_affix_id: "1".to_string(),
                sub_affix_info: vec![SubAffixBasicInfo {
                    id: "1".to_string(),
                    cnt: 1,
                    step: 0,
                }],
            }],
            ..Default::default()
        };
        let info = fixture_index().character_info(&basic);
        assert_eq!(info.id, "4242");
        assert_eq!(info.name, "");
        assert_eq!(info.icon, "");
        assert!(info.rank_icons.is_empty());
        assert!(info.light_cone.is_none());
        assert_eq!(info.relics[0].name, "");
        assert!(info.relics[0].main_affix.is_none());
        assert_eq!(info.relics[0].sub_affix[0].property, PropertyInfo::default());
        assert!(info.relic_sets.is_empty());
        assert!(info.properties.is_empty());
    }
}
