use crate::{
    constants::UNSET,
    functions::build_object_id,
};
use bitflags::bitflags;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize, Serializer};
use smallvec::SmallVec;
use std::{
    convert::Infallible,
    fmt::{self, Display},
    io,
    path::PathBuf,
    str::FromStr,
};
use strum_macros::{Display as StrumDisplay, EnumIs, IntoStaticStr};
use thiserror::Error;

pub type AttributeTags = IndexSet<String>;
pub(crate) type NameParts = SmallVec<[String; 3]>;

/// Object category declared once per file with `[OBJECT:TYPE]`.
///
/// Only [`ObjectType::Creature`] is materialized into records. The other
/// variants are recognized so that their files can be skipped quietly.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIs,
    StrumDisplay,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Creature,
    CreatureVariation,
    Entity,
    Inorganic,
    Plant,
    Material,
    MaterialTemplate,
    TissueTemplate,
    Body,
    BodyDetailPlan,
    Building,
    Item,
    Interaction,
    Language,
    Reaction,
    Graphics,
    #[default]
    Unknown,
}

impl ObjectType {
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value {
            "CREATURE" => Self::Creature,
            "CREATURE_VARIATION" => Self::CreatureVariation,
            "ENTITY" => Self::Entity,
            "INORGANIC" => Self::Inorganic,
            "PLANT" => Self::Plant,
            "MATERIAL" => Self::Material,
            "MATERIAL_TEMPLATE" => Self::MaterialTemplate,
            "TISSUE_TEMPLATE" => Self::TissueTemplate,
            "BODY" => Self::Body,
            "BODY_DETAIL_PLAN" => Self::BodyDetailPlan,
            "BUILDING" => Self::Building,
            "ITEM" => Self::Item,
            "INTERACTION" => Self::Interaction,
            "LANGUAGE" => Self::Language,
            "REACTION" => Self::Reaction,
            "GRAPHICS" => Self::Graphics,
            _ => Self::Unknown,
        }
    }

    /// Whether records of this type are built.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Creature)
    }

    /// The tag key that opens a record of this type, e.g. `CREATURE`.
    #[must_use]
    pub fn as_key(self) -> &'static str {
        self.into()
    }
}

impl FromStr for ObjectType {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_value(value))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: IO error occurred: {1}")]
    Io(PathBuf, io::Error),
    #[error("Serializing JSON data failed with: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}: expected a directory of raw files.")]
    NotADirectory(PathBuf),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

/// Non-fatal problems found while building records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIs, StrumDisplay, Serialize,
)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    #[strum(to_string = "caste-scoped tag with no active caste")]
    NoActiveCaste,
    #[strum(to_string = "caste isn't declared in this record")]
    UnknownCaste,
    #[strum(to_string = "value isn't a valid integer")]
    InvalidNumber,
    #[strum(to_string = "value doesn't have the expected shape")]
    InvalidValue,
    #[strum(to_string = "object type isn't supported")]
    UnsupportedObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub kind: WarningKind,
    pub filename: String,
    pub line: usize,
    pub key: String,
    pub value: String,
    /// Id of the record that was open, if any.
    pub record: Option<String>,
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} in [{}:{}]",
            self.filename, self.line, self.kind, self.key, self.value
        )?;

        if let Some(record) = &self.record {
            write!(f, " (record {record})")?;
        }

        Ok(())
    }
}

/// Singular, plural and adjective forms, in that order. Missing trailing
/// forms are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Names(NameParts);

impl Names {
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        Self(value.splitn(3, ':').map(str::to_owned).collect())
    }

    #[must_use]
    pub fn singular(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[must_use]
    pub fn plural(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    #[must_use]
    pub fn adjective(&self) -> Option<&str> {
        self.0.get(2).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.0.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySize {
    pub years: i32,
    pub days: i32,
    pub size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NaturalSkill {
    pub skill: String,
    pub level: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilkDescription {
    pub material: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EggDescription {
    pub egg_size: i32,
    pub clutch_min: i32,
    pub clutch_max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CasteRecord {
    pub id: String,
    pub names: Names,
    /// `[min, max]` litter size, `0` when never set.
    pub litter: [i32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milk: Option<MilkDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg: Option<EggDescription>,
}

impl CasteRecord {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            names: Names::default(),
            litter: [0, 0],
            milk: None,
            egg: None,
        }
    }

    pub(crate) fn egg_mut(&mut self) -> &mut EggDescription {
        self.egg.get_or_insert_with(EggDescription::default)
    }
}

bitflags! {
    /// Behaviour and proneness tags that carry no value of their own.
    ///
    /// Serialized as the list of tag names that are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CreatureFlags: u32 {
        const LARGE_PREDATOR = 1 << 0;
        const AMBUSH_PREDATOR = 1 << 1;
        const BENIGN = 1 << 2;
        const MEGABEAST = 1 << 3;
        const SEMIMEGABEAST = 1 << 4;
        const FLIER = 1 << 5;
        const AMPHIBIOUS = 1 << 6;
        const AQUATIC = 1 << 7;
        const PET = 1 << 8;
        const PET_EXOTIC = 1 << 9;
        const TRAINABLE_WAR = 1 << 10;
        const TRAINABLE_HUNTING = 1 << 11;
        const PRONE_TO_RAGE = 1 << 12;
        const EVIL = 1 << 13;
        const GOOD = 1 << 14;

        const TRAINABLE = Self::TRAINABLE_WAR.bits() | Self::TRAINABLE_HUNTING.bits();
    }
}

impl Default for CreatureFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for CreatureFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter_names().map(|(name, _)| name))
    }
}

/// Fields shared by every record, whatever its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub filename: String,
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    pub id: String,
    object_id: String,
}

impl RawRecord {
    pub(crate) fn new(
        filename: &str,
        object_type: ObjectType,
        id: &str,
    ) -> Self {
        Self {
            filename: filename.to_owned(),
            object_type,
            id: id.to_owned(),
            object_id: String::new(),
        }
    }

    /// Join key for copy-from resolution and downstream consumers. Empty
    /// until the record is finalized.
    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        !self.object_id.is_empty()
    }

    pub(crate) fn finalize(&mut self) {
        if self.object_id.is_empty() {
            self.object_id =
                build_object_id(&self.filename, self.object_type, &self.id);
        }
    }
}

/// A single `[CREATURE:ID]` definition.
///
/// Signed scalars and range ends hold [`UNSET`] until a tag sets them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureRecord {
    #[serde(flatten)]
    pub raw: RawRecord,

    pub names: Names,
    pub description: String,
    pub age_at_adulthood: i32,
    pub old_age_min: i32,
    pub old_age_max: i32,
    pub pet_value: i32,
    pub tile: String,
    pub creature_class: Vec<String>,
    pub body_temperature: i32,
    pub biomes: Vec<String>,
    pub cluster_size: [i32; 2],
    pub population_size: [i32; 2],
    pub difficulty: i32,
    pub rage_chance: i32,
    pub flags: CreatureFlags,

    pub body_sizes: Vec<BodySize>,
    pub natural_skills: Vec<NaturalSkill>,
    pub pref_strings: Vec<String>,
    pub attribute_tags: AttributeTags,

    pub castes: Vec<CasteRecord>,

    /// `objectId` of the record named by `[COPY_TAGS_FROM]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tags_from: Option<String>,
}

impl CreatureRecord {
    #[must_use]
    pub fn new(raw: RawRecord) -> Self {
        Self {
            raw,

            names: Names::default(),
            description: String::new(),
            age_at_adulthood: UNSET,
            old_age_min: UNSET,
            old_age_max: UNSET,
            pet_value: UNSET,
            tile: String::new(),
            creature_class: Vec::new(),
            body_temperature: UNSET,
            biomes: Vec::new(),
            cluster_size: [UNSET, UNSET],
            population_size: [UNSET, UNSET],
            difficulty: UNSET,
            rage_chance: UNSET,
            flags: CreatureFlags::default(),

            body_sizes: Vec::new(),
            natural_skills: Vec::new(),
            pref_strings: Vec::new(),
            attribute_tags: AttributeTags::new(),

            castes: Vec::new(),
            copy_tags_from: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.raw.id
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        self.raw.object_id()
    }

    #[must_use]
    pub fn caste(&self, id: &str) -> Option<&CasteRecord> {
        self.castes.iter().find(|caste| caste.id == id)
    }
}

/// Everything produced from one raw file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFile {
    pub filename: String,
    pub object_type: ObjectType,
    pub records: Vec<CreatureRecord>,
    pub warnings: Vec<Warning>,
}

/// Output layout for [`crate::json::write_json`].
///
/// - [`OutputFormat::Array`]: a single JSON array holding every record.
/// - [`OutputFormat::Lines`]: one JSON object per line.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, EnumIs, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Array,
    Lines,
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "array" => Self::Array,
            "lines" => Self::Lines,
            _ => return Err("Expected `array` or `lines` string"),
        })
    }
}
