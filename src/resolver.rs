//! Backfills records that name a base with `[COPY_TAGS_FROM]`.
//!
//! Only fields the dependent record left unset are taken from its base, so
//! values written in the dependent's own definition always win. Bases are
//! resolved before their dependents, then fills are repeated until nothing
//! changes, so records in a reference cycle end up sharing what any of them
//! had and a second pass is a no-op.

use crate::{
    constants::{localization::MISSING_BASE_MSG, UNSET},
    types::{BodySize, CreatureRecord, Names},
};
use log::debug;
use std::collections::HashMap;

/// `objectId` to position in the record collection. The first record with a
/// given id wins.
pub struct ObjectIndex {
    positions: HashMap<String, usize>,
}

impl ObjectIndex {
    #[must_use]
    pub fn new(records: &[CreatureRecord]) -> Self {
        let mut positions = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            positions
                .entry(record.object_id().to_owned())
                .or_insert(position);
        }

        Self { positions }
    }

    #[must_use]
    pub fn get(&self, object_id: &str) -> Option<usize> {
        self.positions.get(object_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The fields a dependent record may take from its base.
struct Inherited {
    old_age: [i32; 2],
    age_at_adulthood: i32,
    pet_value: i32,
    description: String,
    names: Names,
    body_sizes: Vec<BodySize>,
    biomes: Vec<String>,
}

impl Inherited {
    fn of(base: &CreatureRecord) -> Self {
        Self {
            old_age: [base.old_age_min, base.old_age_max],
            age_at_adulthood: base.age_at_adulthood,
            pet_value: base.pet_value,
            description: base.description.clone(),
            names: base.names.clone(),
            body_sizes: base.body_sizes.clone(),
            biomes: base.biomes.clone(),
        }
    }

    /// Returns whether anything on `record` changed.
    fn fill(self, record: &mut CreatureRecord) -> bool {
        let mut changed = false;

        // The age range is parsed as a pair, so it's inherited as one.
        if record.old_age_min == UNSET
            && record.old_age_max == UNSET
            && self.old_age != [UNSET, UNSET]
        {
            [record.old_age_min, record.old_age_max] = self.old_age;
            changed = true;
        }

        changed |=
            fill_scalar(&mut record.age_at_adulthood, self.age_at_adulthood);
        changed |= fill_scalar(&mut record.pet_value, self.pet_value);

        if record.description.is_empty() && !self.description.is_empty() {
            record.description = self.description;
            changed = true;
        }

        if record.names.is_empty() && !self.names.is_empty() {
            record.names = self.names;
            changed = true;
        }

        if record.body_sizes.is_empty() && !self.body_sizes.is_empty() {
            record.body_sizes = self.body_sizes;
            changed = true;
        }

        if record.biomes.is_empty() && !self.biomes.is_empty() {
            record.biomes = self.biomes;
            changed = true;
        }

        changed
    }
}

fn fill_scalar(slot: &mut i32, base: i32) -> bool {
    if *slot == UNSET && base != UNSET {
        *slot = base;
        true
    } else {
        false
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Pending,
    Visiting,
    Done,
}

struct Resolver<'a> {
    records: &'a mut [CreatureRecord],
    /// Base position of each record, if it names one that exists.
    bases: Vec<Option<usize>>,
    marks: Vec<Mark>,
    changed: Vec<bool>,
}

impl Resolver<'_> {
    fn visit(&mut self, position: usize) {
        if self.marks[position] != Mark::Pending {
            return;
        }

        self.marks[position] = Mark::Visiting;

        if let Some(base) = self.bases[position] {
            // A base that is itself mid-visit is part of a cycle; the
            // fixpoint pass in `resolve_copy_from` completes it.
            self.visit(base);
            self.fill_from(base, position);
        }

        self.marks[position] = Mark::Done;
    }

    fn dependents(&self) -> Vec<(usize, usize)> {
        self.bases
            .iter()
            .enumerate()
            .filter_map(|(position, base)| base.map(|base| (base, position)))
            .collect()
    }

    /// Returns whether `position` changed.
    fn fill_from(&mut self, base: usize, position: usize) -> bool {
        let inherited = Inherited::of(&self.records[base]);
        let filled = inherited.fill(&mut self.records[position]);
        self.changed[position] |= filled;
        filled
    }
}

/// Fills unset fields of every record that names a base, from that base.
///
/// Records must already be finalized. Missing bases are skipped. Returns the
/// number of records that changed; running it again on the same collection
/// returns `0`.
pub fn resolve_copy_from(records: &mut [CreatureRecord]) -> usize {
    let index = ObjectIndex::new(records);
    let bases = records
        .iter()
        .enumerate()
        .map(|(position, record)| base_of(&index, record, position))
        .collect();

    let mut resolver = Resolver {
        bases,
        marks: vec![Mark::Pending; records.len()],
        changed: vec![false; records.len()],
        records,
    };

    for position in 0..resolver.records.len() {
        resolver.visit(position);
    }

    // Only cycles need more than the ordered pass. Every fill moves a field
    // off its sentinel for good, so this terminates.
    let dependents = resolver.dependents();

    loop {
        let mut filled = false;

        for &(base, position) in &dependents {
            filled |= resolver.fill_from(base, position);
        }

        if !filled {
            break;
        }
    }

    resolver.changed.into_iter().filter(|&changed| changed).count()
}

fn base_of(
    index: &ObjectIndex,
    record: &CreatureRecord,
    position: usize,
) -> Option<usize> {
    let base_id = record.copy_tags_from.as_deref()?;
    let base = index.get(base_id);

    if base.is_none() {
        debug!("{}: {MISSING_BASE_MSG}: {base_id}", record.object_id());
    }

    base.filter(|&base| base != position)
}
