//! Services maintaining fields and the fields computed from them.
//!
//! Each service call issues a constant number of store round trips through
//! the transaction it is given, whatever the number of fields involved.

pub mod calculation;
pub mod creating;
pub mod deleting;
pub mod mutator;
pub mod reference;
pub mod view;

use fieldcalc_core::schema::FieldId;

use indexmap::IndexSet;

/// Drops repeated ids, keeping the first occurrence.
fn dedup(field_ids: &[FieldId]) -> Vec<FieldId> {
    field_ids
        .iter()
        .cloned()
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
