//! The extraction loop: active-rule selection plus first-match evaluation.

use tracing::debug;

use super::compiled::{CompiledRules, RuleId};
use super::trigger::TriggerInfo;
use crate::normalize::NormalizedText;
use crate::{ExtractedField, FieldKind, FieldMap, FieldRule, FieldValue, RuleOutcome};

/// Runs a rule set against one normalized post.
///
/// Created per post; cheap. The heavy state (compiled regexes) lives in the
/// `'static` rules themselves.
pub(crate) struct Extractor<'a> {
    text: &'a NormalizedText,
    compiled: CompiledRules<'a>,
    trigger: TriggerInfo,
    /// Active rule ids in declaration order. Declaration order is rule
    /// precedence, so this must stay sorted.
    active: Vec<RuleId>,
}

impl<'a> Extractor<'a> {
    pub fn new(text: &'a NormalizedText, rules: &'a [FieldRule]) -> Self {
        let compiled = CompiledRules::new(rules);
        let trigger = TriggerInfo::scan(&text.text);

        let mut on = vec![false; compiled.rules.len()];
        for &id in &compiled.index.always_on {
            on[id] = true;
        }
        for (slot, ids) in compiled.index.by_bucket.iter().enumerate() {
            if trigger.buckets.bits() & (1 << slot) != 0 {
                for &id in ids {
                    on[id] = true;
                }
            }
        }
        let active: Vec<RuleId> = (0..on.len()).filter(|&id| on[id]).collect();

        debug!(
            buckets = ?trigger.buckets,
            active = active.len(),
            total = compiled.rules.len(),
            "rule activation"
        );

        Extractor { text, compiled, trigger, active }
    }

    pub fn trigger(&self) -> &TriggerInfo {
        &self.trigger
    }

    pub fn active_rule_ids(&self) -> Vec<&'static str> {
        self.active.iter().map(|&id| self.compiled.rules[id].id).collect()
    }

    /// Fill a [`FieldMap`]: for each scalar kind the first active rule that
    /// matches wins; contact rules all fire and their results are unioned
    /// with insertion-order dedup.
    pub fn run(&self) -> FieldMap {
        let mut map = FieldMap::default();

        for kind in FieldKind::SCALAR {
            for &id in &self.active {
                let rule = self.compiled.rules[id];
                if rule.kind != kind {
                    continue;
                }
                if let RuleOutcome::Matched { value: FieldValue::One(raw), rule_id } =
                    rule.apply(self.text)
                {
                    debug!(kind = kind.name(), rule = rule_id, raw = %raw, "field matched");
                    if let Some(slot) = map.scalar_mut(kind) {
                        *slot = ExtractedField::matched(raw, rule_id);
                    }
                    break;
                }
            }
        }

        for &id in &self.active {
            let rule = self.compiled.rules[id];
            if rule.kind != FieldKind::Contacts {
                continue;
            }
            if let RuleOutcome::Matched { value: FieldValue::Many(items), rule_id } =
                rule.apply(self.text)
            {
                let mut contributed = false;
                for item in items {
                    contributed |= push_contact(&mut map.contacts, item);
                }
                if contributed {
                    map.contact_rules.push(rule_id);
                }
            }
        }

        map
    }
}

/// Insert a contact unless an equivalent one is already present. Handles
/// compare case-insensitively; phones arrive digit-normalized so the same
/// comparison covers them.
fn push_contact(contacts: &mut Vec<String>, item: String) -> bool {
    let key = item.to_lowercase();
    if contacts.iter().any(|c| c.to_lowercase() == key) {
        return false;
    }
    contacts.push(item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use crate::{rule, scan_rule};

    #[test]
    fn first_matching_rule_wins_per_kind() {
        let rules = vec![
            scan_rule! {
                id: "first",
                kind: FieldKind::Airline,
                scan: |_| Some(FieldValue::One("first".into())),
            },
            scan_rule! {
                id: "second",
                kind: FieldKind::Airline,
                scan: |_| Some(FieldValue::One("second".into())),
            },
        ];
        let text = normalize("anything");
        let map = Extractor::new(&text, &rules).run();
        assert_eq!(map.airline.raw_value.as_deref(), Some("first"));
        assert_eq!(map.airline.rule_id, Some("first"));
    }

    #[test]
    fn non_matching_rule_falls_through() {
        let rules = vec![
            scan_rule! {
                id: "never",
                kind: FieldKind::Origin,
                scan: |_| None,
            },
            scan_rule! {
                id: "fallback",
                kind: FieldKind::Origin,
                scan: |_| Some(FieldValue::One("x".into())),
            },
        ];
        let text = normalize("anything");
        let map = Extractor::new(&text, &rules).run();
        assert_eq!(map.origin.rule_id, Some("fallback"));
    }

    #[test]
    fn bucket_gated_rule_stays_inactive() {
        let rules = vec![rule! {
            id: "digit only",
            kind: FieldKind::Date,
            pattern: r"(\d+)",
            buckets: crate::engine::BucketMask::HAS_DIGITS.bits(),
            prod: |caps| Some(FieldValue::One(caps[1].to_string())),
        }];
        let text = normalize("no numbers here");
        let extractor = Extractor::new(&text, &rules);
        assert!(extractor.active_rule_ids().is_empty());
        assert_eq!(extractor.run().date.raw_value, None);
    }

    #[test]
    fn contact_rules_union_and_dedup() {
        let rules = vec![
            scan_rule! {
                id: "a",
                kind: FieldKind::Contacts,
                scan: |_| Some(FieldValue::Many(vec!["@Ali".into(), "0912".into()])),
            },
            scan_rule! {
                id: "b",
                kind: FieldKind::Contacts,
                scan: |_| Some(FieldValue::Many(vec!["@ali".into(), "0935".into()])),
            },
        ];
        let text = normalize("anything");
        let map = Extractor::new(&text, &rules).run();
        assert_eq!(map.contacts, vec!["@Ali", "0912", "0935"]);
        assert_eq!(map.contact_rules, vec!["a", "b"]);
    }
}
