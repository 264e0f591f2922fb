//! In-memory metadata index for one language.
//!
//! An [`Index`] is the parsed content of the `index_min/<lang>/` files. It is
//! read-only once loaded; lookups for unknown IDs fall back to empty records.

mod character;
pub mod records;

pub use character::{
    CharacterBasicInfo, LevelInfo, LightConeBasicInfo, RelicBasicInfo, SubAffixBasicInfo,
};

use foldhash::HashMap;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::profile::{PropertyInfo, display_value};
use records::*;

/// Every file the index is built from, relative to `index_min/<lang>/`.
pub const INDEX_FILES: [&str; 16] = [
    "characters.json",
    "character_ranks.json",
    "character_skills.json",
    "character_skill_trees.json",
    "character_promotions.json",
    "light_cones.json",
    "light_cone_ranks.json",
    "light_cone_promotions.json",
    "relics.json",
    "relic_sets.json",
    "relic_main_affixes.json",
    "relic_sub_affixes.json",
    "paths.json",
    "elements.json",
    "properties.json",
    "avatars.json",
];

#[derive(Debug, Clone, Default)]
pub struct Index {
    pub characters: HashMap<String, CharacterType>,
    pub character_ranks: HashMap<String, CharacterRankType>,
    pub character_skills: HashMap<String, CharacterSkillType>,
    pub character_skill_trees: HashMap<String, CharacterSkillTreeType>,
    pub character_promotions: HashMap<String, PromotionType>,
    pub light_cones: HashMap<String, LightConeType>,
    pub light_cone_ranks: HashMap<String, LightConeRankType>,
    pub light_cone_promotions: HashMap<String, PromotionType>,
    pub relics: HashMap<String, RelicType>,
    pub relic_sets: HashMap<String, RelicSetType>,
    pub relic_main_affixes: HashMap<String, RelicMainAffixType>,
    pub relic_sub_affixes: HashMap<String, RelicSubAffixType>,
    pub paths: HashMap<String, PathType>,
    pub elements: HashMap<String, ElementType>,
    pub properties: HashMap<String, PropertyType>,
    pub avatars: HashMap<String, AvatarType>,
}

impl Index {
    /// Loads the index from a directory containing every file of [`INDEX_FILES`].
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            characters: load_map(dir, "characters.json")?,
            character_ranks: load_map(dir, "character_ranks.json")?,
            character_skills: load_map(dir, "character_skills.json")?,
            character_skill_trees: load_map(dir, "character_skill_trees.json")?,
            character_promotions: load_map(dir, "character_promotions.json")?,
            light_cones: load_map(dir, "light_cones.json")?,
            light_cone_ranks: load_map(dir, "light_cone_ranks.json")?,
            light_cone_promotions: load_map(dir, "light_cone_promotions.json")?,
            relics: load_map(dir, "relics.json")?,
            relic_sets: load_map(dir, "relic_sets.json")?,
            relic_main_affixes: load_map(dir, "relic_main_affixes.json")?,
            relic_sub_affixes: load_map(dir, "relic_sub_affixes.json")?,
            paths: load_map(dir, "paths.json")?,
            elements: load_map(dir, "elements.json")?,
            properties: load_map(dir, "properties.json")?,
            avatars: load_map(dir, "avatars.json")?,
        })
    }

    pub fn avatar(&self, id: &str) -> Option<&AvatarType> {
        self.avatars.get(id)
    }

    /// Builds a [`PropertyInfo`] for a property type, with empty display
    /// metadata when the type is unknown.
    pub fn property_info(&self, property_type: &str, value: f64) -> PropertyInfo {
        let property = or_empty(&self.properties, property_type);
        PropertyInfo {
            property_type: property_type.to_string(),
            field: property.field.clone(),
            name: property.name.clone(),
            icon: property.icon.clone(),
            value,
            display: display_value(value, property.percent),
            percent: property.percent,
        }
    }

    /// The flat (non-ratio) property describing a base stat field such as `hp`.
    pub fn field_property(&self, field: &str) -> Option<&PropertyType> {
        self.properties
            .values()
            .filter(|p| p.field == field && !p.ratio)
            .min_by(|a, b| {
                a.order
                    .cmp(&b.order)
                    .then_with(|| a.property_type.cmp(&b.property_type))
            })
    }
}

/// Looks up `id`, substituting an all-default record when it is absent.
pub(crate) fn or_empty<'a, T: Clone + Default>(
    map: &'a HashMap<String, T>,
    id: &str,
) -> Cow<'a, T> {
    match map.get(id) {
        Some(record) => Cow::Borrowed(record),
        None => Cow::Owned(T::default()),
    }
}

fn load_map<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<HashMap<String, T>> {
    let wrap = |source: Error| Error::IndexLoad {
        file: file.to_string(),
        source: Box::new(source),
    };
    let file_handle = fs::File::open(dir.join(file)).map_err(|e| wrap(e.into()))?;
    let reader = io::BufReader::new(file_handle);
    serde_json::from_reader(reader).map_err(|e| wrap(e.into()))
}
