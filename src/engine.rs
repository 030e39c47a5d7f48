//! Rule selection and field extraction engine.
//!
//! At a high level, extracting from one post is a pipeline:
//!
//! ```text
//! rules (all)  ──┐
//!               │  CompiledRules::new           (compiled.rs)
//!               └───────────────┬──────────────
//!                               │
//! input ── TriggerInfo::scan ───┼─ select active rules (buckets)
//!         (trigger.rs)          │
//!                               v
//!                     Extractor::run (extractor.rs)
//!                       - per field kind, try rules in declaration
//!                         order; first match wins
//!                       - contacts: every rule fires, results unioned
//!                               │
//!                               v
//!                           FieldMap
//! ```
//!
//! Unlike saturation-style engines, there is no fixpoint here: rule
//! precedence *is* the rule list order, and the first matching rule settles a
//! field. That policy is part of the extraction contract ("from A to B" must
//! outrank bare co-occurrence), so the loop is deliberately this simple.
//!
//! ## Responsibilities by module
//!
//! - `compiled.rs`: derives `CompiledRules` from `FieldRule`s and builds a
//!   cheap bucket index.
//! - `trigger.rs`: scans the normalized input to compute coarse buckets for
//!   rule activation.
//! - `extractor.rs`: runs the active rules and fills a `FieldMap`.

#[path = "engine/compiled.rs"]
mod compiled;
#[path = "engine/extractor.rs"]
mod extractor;
#[path = "engine/trigger.rs"]
mod trigger;

pub(crate) use compiled::BucketMask;
pub(crate) use extractor::Extractor;
