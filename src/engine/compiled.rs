//! Rule compilation and indexing.
//!
//! The static side of the engine: structures derived from the full rule list
//! that make a run cheap and predictable. Rules declare coarse bucket
//! requirements (`BucketMask`); the index lets the extractor discard entire
//! swathes of rules without touching their regexes.
//!
//! Adding a new bucket:
//! 1. Add a `BucketMask` bit.
//! 2. Add a `BUCKET_*` constant and bump `BUCKET_COUNT`.
//! 3. Teach `CompiledRules::new` to index it.
//! 4. Teach `TriggerInfo::scan` (in `trigger.rs`) to detect it.
//!
//! Invariant: `RuleId` indexes into `CompiledRules::rules`; the bucket index
//! must stay aligned with that vector.

use crate::FieldRule;

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Coarse buckets for fast input classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u32 {
        const HAS_DIGITS  = 1 << 0;
        const HAS_COLON   = 1 << 1;
        const HAS_PERSIAN = 1 << 2;
        const HAS_AT      = 1 << 3;
        const HAS_HASH    = 1 << 4;
        const HAS_AMPM    = 1 << 5;
        const MONTHISH    = 1 << 6;
    }
}

pub(crate) const BUCKET_COUNT: usize = 7;
pub(crate) const BUCKET_HAS_DIGITS: usize = 0;
pub(crate) const BUCKET_HAS_COLON: usize = 1;
pub(crate) const BUCKET_HAS_PERSIAN: usize = 2;
pub(crate) const BUCKET_HAS_AT: usize = 3;
pub(crate) const BUCKET_HAS_HASH: usize = 4;
pub(crate) const BUCKET_HAS_AMPM: usize = 5;
pub(crate) const BUCKET_MONTHISH: usize = 6;

/// Metadata attached to a rule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RuleMeta {
    pub buckets: BucketMask,
}

#[derive(Default, Debug)]
pub(crate) struct RuleIndex {
    pub always_on: Vec<RuleId>,
    pub by_bucket: [Vec<RuleId>; BUCKET_COUNT],
}

/// Pre-compiled rule set with a bucket index.
#[derive(Debug)]
pub(crate) struct CompiledRules<'a> {
    pub rules: Vec<&'a FieldRule>,
    pub index: RuleIndex,
}

impl<'a> CompiledRules<'a> {
    /// Create a compiled rule set from a slice of rules. Intentionally
    /// lightweight: no pattern rewriting, no automata, just indexing.
    pub fn new(rules: &'a [FieldRule]) -> Self {
        let rule_refs: Vec<&FieldRule> = rules.iter().collect();

        let metas: Vec<RuleMeta> = rule_refs
            .iter()
            .map(|r| RuleMeta { buckets: BucketMask::from_bits_truncate(r.buckets) })
            .collect();

        let mut index = RuleIndex::default();
        for (id, meta) in metas.iter().enumerate() {
            if meta.buckets.is_empty() {
                index.always_on.push(id);
                continue;
            }
            // Index by buckets using the fixed array; a rule listed under
            // several buckets activates when any one of them is present.
            let pairs = [
                (BucketMask::HAS_DIGITS, BUCKET_HAS_DIGITS),
                (BucketMask::HAS_COLON, BUCKET_HAS_COLON),
                (BucketMask::HAS_PERSIAN, BUCKET_HAS_PERSIAN),
                (BucketMask::HAS_AT, BUCKET_HAS_AT),
                (BucketMask::HAS_HASH, BUCKET_HAS_HASH),
                (BucketMask::HAS_AMPM, BUCKET_HAS_AMPM),
                (BucketMask::MONTHISH, BUCKET_MONTHISH),
            ];
            for (bit, slot) in pairs {
                if meta.buckets.contains(bit) {
                    index.by_bucket[slot].push(id);
                }
            }
        }

        CompiledRules { rules: rule_refs, index }
    }
}
