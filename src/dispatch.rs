//! Registry of the tags that map onto typed fields.
//!
//! Every recognized key resolves to a [`Tag`], which says whether it targets
//! the open record or the active caste. Each variant parses its own value.
//! Adding a tag means adding a variant, a [`TAGS`] entry and its `apply` arm.

use crate::{
    functions::{
        build_object_id, parse_int, parse_tuple, split_trailing_int,
        unquote_tile,
    },
    types::{
        BodySize, CasteRecord, CreatureFlags, CreatureRecord,
        MilkDescription, NaturalSkill, Names, ObjectType, WarningKind,
    },
};
use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Record(RecordTag),
    Caste(CasteTag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    Name,
    Description,
    Child,
    MaxAge,
    PetValue,
    CreatureTile,
    CreatureClass,
    Homeotherm,
    Biome,
    ClusterNumber,
    PopulationNumber,
    Difficulty,
    ProneToRage,
    BodySize,
    NaturalSkill,
    PrefString,
    CopyTagsFrom,
    Flag(CreatureFlags),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasteTag {
    CasteName,
    LitterSize,
    Milkable,
    EggSize,
    ClutchSize,
    LaysEggs,
}

pub static TAGS: phf::Map<&'static str, Tag> = phf_map! {
    "NAME" => Tag::Record(RecordTag::Name),
    "DESCRIPTION" => Tag::Record(RecordTag::Description),
    "CHILD" => Tag::Record(RecordTag::Child),
    "MAXAGE" => Tag::Record(RecordTag::MaxAge),
    "PETVALUE" => Tag::Record(RecordTag::PetValue),
    "CREATURE_TILE" => Tag::Record(RecordTag::CreatureTile),
    "CREATURE_CLASS" => Tag::Record(RecordTag::CreatureClass),
    "HOMEOTHERM" => Tag::Record(RecordTag::Homeotherm),
    "BIOME" => Tag::Record(RecordTag::Biome),
    "CLUSTER_NUMBER" => Tag::Record(RecordTag::ClusterNumber),
    "POPULATION_NUMBER" => Tag::Record(RecordTag::PopulationNumber),
    "DIFFICULTY" => Tag::Record(RecordTag::Difficulty),
    "PRONE_TO_RAGE" => Tag::Record(RecordTag::ProneToRage),
    "BODY_SIZE" => Tag::Record(RecordTag::BodySize),
    "NATURAL_SKILL" => Tag::Record(RecordTag::NaturalSkill),
    "PREFSTRING" => Tag::Record(RecordTag::PrefString),
    "COPY_TAGS_FROM" => Tag::Record(RecordTag::CopyTagsFrom),

    "LARGE_PREDATOR" => Tag::Record(RecordTag::Flag(CreatureFlags::LARGE_PREDATOR)),
    "AMBUSHPREDATOR" => Tag::Record(RecordTag::Flag(CreatureFlags::AMBUSH_PREDATOR)),
    "BENIGN" => Tag::Record(RecordTag::Flag(CreatureFlags::BENIGN)),
    "MEGABEAST" => Tag::Record(RecordTag::Flag(CreatureFlags::MEGABEAST)),
    "SEMIMEGABEAST" => Tag::Record(RecordTag::Flag(CreatureFlags::SEMIMEGABEAST)),
    "FLIER" => Tag::Record(RecordTag::Flag(CreatureFlags::FLIER)),
    "AMPHIBIOUS" => Tag::Record(RecordTag::Flag(CreatureFlags::AMPHIBIOUS)),
    "AQUATIC" => Tag::Record(RecordTag::Flag(CreatureFlags::AQUATIC)),
    "PET" => Tag::Record(RecordTag::Flag(CreatureFlags::PET)),
    "PET_EXOTIC" => Tag::Record(RecordTag::Flag(CreatureFlags::PET_EXOTIC)),
    "TRAINABLE" => Tag::Record(RecordTag::Flag(CreatureFlags::TRAINABLE)),
    "TRAINABLE_WAR" => Tag::Record(RecordTag::Flag(CreatureFlags::TRAINABLE_WAR)),
    "TRAINABLE_HUNTING" => Tag::Record(RecordTag::Flag(CreatureFlags::TRAINABLE_HUNTING)),
    "EVIL" => Tag::Record(RecordTag::Flag(CreatureFlags::EVIL)),
    "GOOD" => Tag::Record(RecordTag::Flag(CreatureFlags::GOOD)),

    "CASTE_NAME" => Tag::Caste(CasteTag::CasteName),
    "LITTER_SIZE" => Tag::Caste(CasteTag::LitterSize),
    "MILKABLE" => Tag::Caste(CasteTag::Milkable),
    "EGG_SIZE" => Tag::Caste(CasteTag::EggSize),
    "CLUTCH_SIZE" => Tag::Caste(CasteTag::ClutchSize),
    "LAYS_EGGS" => Tag::Caste(CasteTag::LaysEggs),
};

#[must_use]
pub fn lookup(key: &str) -> Option<Tag> {
    TAGS.get(key).copied()
}

impl RecordTag {
    /// On error the record is left untouched.
    pub fn apply(
        self,
        record: &mut CreatureRecord,
        value: &str,
    ) -> Result<(), WarningKind> {
        match self {
            Self::Name => record.names = Names::from_value(value),
            Self::Description => record.description = value.to_owned(),
            Self::Child => record.age_at_adulthood = parse_int(value)?,
            Self::MaxAge => {
                let [min, max] = parse_tuple::<2>(value)?;
                record.old_age_min = min;
                record.old_age_max = max;
            }
            Self::PetValue => record.pet_value = parse_int(value)?,
            Self::CreatureTile => record.tile = unquote_tile(value).to_owned(),
            Self::CreatureClass => {
                record.creature_class.push(value.to_owned());
            }
            Self::Homeotherm => {
                // NONE: body follows ambient temperature.
                if value != "NONE" {
                    record.body_temperature = parse_int(value)?;
                }
            }
            Self::Biome => record.biomes.push(value.to_owned()),
            Self::ClusterNumber => {
                record.cluster_size = parse_tuple::<2>(value)?;
            }
            Self::PopulationNumber => {
                record.population_size = parse_tuple::<2>(value)?;
            }
            Self::Difficulty => record.difficulty = parse_int(value)?,
            Self::ProneToRage => {
                record.rage_chance = parse_int(value)?;
                record.flags |= CreatureFlags::PRONE_TO_RAGE;
            }
            Self::BodySize => {
                let [years, days, size] = parse_tuple::<3>(value)?;
                record.body_sizes.push(BodySize { years, days, size });
            }
            Self::NaturalSkill => {
                let (skill, level) = split_trailing_int(value)?;
                record.natural_skills.push(NaturalSkill {
                    skill: skill.to_owned(),
                    level,
                });
            }
            Self::PrefString => record.pref_strings.push(value.to_owned()),
            Self::CopyTagsFrom => {
                if value.is_empty() {
                    return Err(WarningKind::InvalidValue);
                }

                record.copy_tags_from = Some(build_object_id(
                    &record.raw.filename,
                    ObjectType::Creature,
                    value,
                ));
            }
            Self::Flag(flag) => record.flags |= flag,
        }

        Ok(())
    }
}

impl CasteTag {
    /// On error the caste is left untouched.
    pub fn apply(
        self,
        caste: &mut CasteRecord,
        value: &str,
    ) -> Result<(), WarningKind> {
        match self {
            Self::CasteName => caste.names = Names::from_value(value),
            Self::LitterSize => caste.litter = parse_tuple::<2>(value)?,
            Self::Milkable => {
                let (material, amount) = split_trailing_int(value)?;
                caste.milk = Some(MilkDescription {
                    material: material.to_owned(),
                    amount,
                });
            }
            Self::EggSize => {
                let egg_size = parse_int(value)?;
                caste.egg_mut().egg_size = egg_size;
            }
            Self::ClutchSize => {
                let [min, max] = parse_tuple::<2>(value)?;
                let egg = caste.egg_mut();
                egg.clutch_min = min;
                egg.clutch_max = max;
            }
            Self::LaysEggs => {
                caste.egg_mut();
            }
        }

        Ok(())
    }
}
