use dfraw_txt_rs_lib::{parse_raw_str, types::*, UNSET};
use proptest::prelude::*;

fn parse(text: &str) -> RawFile {
    parse_raw_str(text, "creature_test.txt")
}

fn creature(body: &str) -> CreatureRecord {
    let mut file = parse(&format!("[OBJECT:CREATURE]\n[CREATURE:DOG]\n{body}"));
    assert_eq!(file.records.len(), 1);
    file.records.remove(0)
}

#[test]
fn dog_end_to_end() {
    let file = parse(
        "[OBJECT:CREATURE]\n[CREATURE:DOG]\n[NAME:dog:dogs:canine]\n[PETVALUE:50]\n[CASTE:MALE]\n[EGG_SIZE:0]\n",
    );

    assert_eq!(file.filename, "creature_test");
    assert_eq!(file.object_type, ObjectType::Creature);
    assert!(file.warnings.is_empty());
    assert_eq!(file.records.len(), 1);

    let dog = &file.records[0];
    assert_eq!(dog.id(), "DOG");
    assert_eq!(dog.object_id(), "creature-test-creature-dog");
    assert_eq!(dog.names.to_vec(), vec!["dog", "dogs", "canine"]);
    assert_eq!(dog.pet_value, 50);
    assert_eq!(dog.castes.len(), 1);
    assert_eq!(dog.castes[0].id, "MALE");
    assert_eq!(
        dog.castes[0].egg,
        Some(EggDescription {
            egg_size: 0,
            clutch_min: 0,
            clutch_max: 0
        })
    );
}

#[test]
fn filename_from_first_line() {
    let file = parse("creature_domestic\n\n[OBJECT:CREATURE]\n[CREATURE:DOG]\n");

    assert_eq!(file.filename, "creature_domestic");
    assert_eq!(file.records[0].object_id(), "creature-domestic-creature-dog");
}

#[test]
fn records_finalize_at_each_opening_tag() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][PETVALUE:50][CREATURE:CAT][PETVALUE:30]",
    );

    let ids: Vec<&str> = file.records.iter().map(CreatureRecord::id).collect();
    assert_eq!(ids, vec!["DOG", "CAT"]);
    assert_eq!(file.records[0].pet_value, 50);
    assert_eq!(file.records[1].pet_value, 30);
    assert!(file.records.iter().all(|r| r.raw.is_finalized()));
}

#[test]
fn caste_tags_do_not_leak() {
    let dog = creature("[CASTE:MALE][EGG_SIZE:10][CASTE:FEMALE][EGG_SIZE:20]");

    assert_eq!(dog.caste("MALE").and_then(|c| c.egg).map(|e| e.egg_size), Some(10));
    assert_eq!(dog.caste("FEMALE").and_then(|c| c.egg).map(|e| e.egg_size), Some(20));
}

#[test]
fn select_caste_reopens_existing_caste() {
    let dog = creature(
        "[CASTE:MALE][CASTE:FEMALE][SELECT_CASTE:MALE][CLUTCH_SIZE:2:5]",
    );

    let male = dog.caste("MALE").and_then(|c| c.egg);
    assert_eq!(male.map(|e| [e.clutch_min, e.clutch_max]), Some([2, 5]));
    assert_eq!(dog.caste("FEMALE").and_then(|c| c.egg), None);
}

#[test]
fn record_tags_after_select_caste_target_record() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][CASTE:MALE][SELECT_CASTE:MALE][PETVALUE:5]",
    );

    assert!(file.warnings.is_empty());
    assert_eq!(file.records[0].pet_value, 5);
    assert_eq!(file.records[0].castes.len(), 1);
}

#[test]
fn unknown_select_caste_is_reported_and_not_misapplied() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][CASTE:MALE][SELECT_CASTE:FEMALE][EGG_SIZE:7]",
    );

    let kinds: Vec<WarningKind> = file.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::UnknownCaste, WarningKind::UnknownCaste]);
    assert_eq!(file.records[0].castes[0].egg, None);
}

#[test]
fn select_caste_all_targets_every_caste() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][CASTE:MALE][CASTE:FEMALE][SELECT_CASTE:ALL][LITTER_SIZE:1:3][SELECT_CASTE:FEMALE][MILKABLE:LOCAL_CREATURE_MAT:MILK:20000]",
    );

    assert!(file.warnings.is_empty());

    let dog = &file.records[0];
    assert!(dog.castes.iter().all(|caste| caste.litter == [1, 3]));
    assert!(dog.caste("MALE").is_some_and(|caste| caste.milk.is_none()));
    assert!(dog.caste("FEMALE").is_some_and(|caste| caste.milk.is_some()));
}

#[test]
fn select_caste_all_with_bad_value_changes_no_caste() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][CASTE:MALE][LITTER_SIZE:2:4][CASTE:FEMALE][SELECT_CASTE:ALL][LITTER_SIZE:x:3]",
    );

    assert_eq!(file.warnings.len(), 1);
    assert!(file.warnings[0].kind.is_invalid_number());
    assert_eq!(file.records[0].castes[0].litter, [2, 4]);
    assert_eq!(file.records[0].castes[1].litter, [0, 0]);
}

#[test]
fn select_caste_all_without_castes_is_reported() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][SELECT_CASTE:ALL][EGG_SIZE:5]",
    );

    let kinds: Vec<WarningKind> = file.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::NoActiveCaste]);
}

#[test]
fn caste_tag_without_caste_is_reported() {
    let file = parse("[OBJECT:CREATURE]\n[CREATURE:DOG]\n[EGG_SIZE:5]\n");

    assert_eq!(file.warnings.len(), 1);

    let warning = &file.warnings[0];
    assert!(warning.kind.is_no_active_caste());
    assert_eq!(warning.line, 3);
    assert_eq!(warning.key, "EGG_SIZE");
    assert_eq!(warning.record.as_deref(), Some("DOG"));
}

#[test]
fn bad_number_skips_only_that_field() {
    let dog = creature("[MAXAGE:abc:80][PETVALUE:50][CHILD:1]");

    assert_eq!(dog.old_age_min, UNSET);
    assert_eq!(dog.old_age_max, UNSET);
    assert_eq!(dog.pet_value, 50);
    assert_eq!(dog.age_at_adulthood, 1);

    let file = parse("[OBJECT:CREATURE][CREATURE:DOG][MAXAGE:abc:80]");
    assert!(file.warnings[0].kind.is_invalid_number());
}

#[test]
fn unsupported_object_yields_no_records() {
    let file = parse("[OBJECT:PLANT]\n[PLANT:OAK]\n[NAME:oak:oaks:oaken]\n");

    assert_eq!(file.object_type, ObjectType::Plant);
    assert!(file.records.is_empty());
    assert!(file.warnings.iter().all(|w| w.kind.is_unsupported_object()));
}

#[test]
fn short_names_leave_rest_empty() {
    let dog = creature("[NAME:dog][CASTE:MALE][CASTE_NAME:male dog:male dogs]");

    assert_eq!(dog.names.singular(), Some("dog"));
    assert_eq!(dog.names.plural(), None);
    assert_eq!(dog.castes[0].names.plural(), Some("male dogs"));
    assert_eq!(dog.castes[0].names.adjective(), None);
}

#[test]
fn unknown_valueless_tags_become_attribute_tags() {
    let dog = creature(
        "[LARGE_ROAMING][ATTACK_FLAG_EDGE][TL_COLOR_MODIFIER][NOFEAR][LARGE_ROAMING][SPEED:900]",
    );

    let tags: Vec<&str> = dog.attribute_tags.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["LARGE_ROAMING", "NOFEAR"]);
}

#[test]
fn composite_values_are_split() {
    let dog = creature(
        "[BODY_SIZE:0:0:200][BODY_SIZE:1:0:5000][NATURAL_SKILL:SNEAK:5][CASTE:FEMALE][MILKABLE:LOCAL_CREATURE_MAT:MILK:20000][LITTER_SIZE:1:3]",
    );

    assert_eq!(
        dog.body_sizes,
        vec![
            BodySize { years: 0, days: 0, size: 200 },
            BodySize { years: 1, days: 0, size: 5000 },
        ]
    );
    assert_eq!(dog.natural_skills[0].skill, "SNEAK");
    assert_eq!(dog.natural_skills[0].level, 5);

    let female = &dog.castes[0];
    assert_eq!(
        female.milk,
        Some(MilkDescription {
            material: "LOCAL_CREATURE_MAT:MILK".to_owned(),
            amount: 20000
        })
    );
    assert_eq!(female.litter, [1, 3]);
}

#[test]
fn ranges_and_scalars() {
    let dog = creature(
        "[CREATURE_TILE:'d'][CREATURE_CLASS:MAMMAL][HOMEOTHERM:10040][BIOME:ANY_TEMPERATE][CLUSTER_NUMBER:1:4][POPULATION_NUMBER:10:30][DIFFICULTY:2]",
    );

    assert_eq!(dog.tile, "d");
    assert_eq!(dog.creature_class, vec!["MAMMAL"]);
    assert_eq!(dog.body_temperature, 10040);
    assert_eq!(dog.biomes, vec!["ANY_TEMPERATE"]);
    assert_eq!(dog.cluster_size, [1, 4]);
    assert_eq!(dog.population_size, [10, 30]);
    assert_eq!(dog.difficulty, 2);
    assert_eq!(dog.rage_chance, UNSET);
}

#[test]
fn homeotherm_none_stays_unset() {
    assert_eq!(creature("[HOMEOTHERM:NONE]").body_temperature, UNSET);
}

#[test]
fn copy_tags_from_names_base_in_same_file() {
    let file = parse(
        "[OBJECT:CREATURE][CREATURE:DOG][CREATURE:GIANT_DOG][COPY_TAGS_FROM:DOG]",
    );

    assert_eq!(
        file.records[1].copy_tags_from.as_deref(),
        Some(file.records[0].object_id())
    );
}

#[test]
fn serializes_camel_case_with_flag_names() {
    let dog = creature("[LARGE_PREDATOR][PRONE_TO_RAGE:50][CASTE:MALE]");
    let json = serde_json::to_value(&dog).unwrap();

    assert_eq!(json["type"], "CREATURE");
    assert_eq!(json["objectId"], "creature-test-creature-dog");
    assert_eq!(json["rageChance"], 50);
    assert_eq!(json["flags"], serde_json::json!(["LARGE_PREDATOR", "PRONE_TO_RAGE"]));
    assert_eq!(json["petValue"], UNSET);
    assert!(json["castes"][0].get("egg").is_none());
    assert!(json.get("copyTagsFrom").is_none());
}

fn creature_file() -> impl Strategy<Value = (String, usize)> {
    let record = ("[A-Z][A-Z_]{0,12}", 0..100i32, any::<bool>()).prop_map(
        |(id, egg, caste)| {
            let caste = if caste { "[CASTE:FEMALE]" } else { "" };
            format!("[CREATURE:{id}]\n[NAME:x:xs:xen]\n{caste}[EGG_SIZE:{egg}]\n[NOFEAR]\n")
        },
    );

    prop::collection::vec(record, 0..20)
        .prop_map(|records| (format!("[OBJECT:CREATURE]\n{}", records.concat()), records.len()))
}

proptest! {
    #[test]
    fn one_record_per_creature_tag((text, count) in creature_file()) {
        let file = parse(&text);

        prop_assert_eq!(file.records.len(), count);
        prop_assert!(file.records.iter().all(|r| r.raw.is_finalized()));
    }
}
