use super::dedup;
use crate::{Result, Transaction};

use fieldcalc_core::{
    driver::operation::ResetFields,
    schema::{FieldId, TableId},
};

/// Clears the cached values of exactly `field_ids` and queues them for
/// recalculation. Resetting a field that is already queued changes nothing.
///
/// Dependents of the reset fields are left alone; see
/// [`ReferenceGraph::invalidation_passes`](fieldcalc_core::schema::ReferenceGraph::invalidation_passes)
/// for propagating further.
pub async fn reset_fields(
    tx: &mut Transaction,
    table_id: &TableId,
    field_ids: &[FieldId],
) -> Result<()> {
    let field_ids = dedup(field_ids);
    if field_ids.is_empty() {
        return Ok(());
    }

    log::debug!(
        "resetting fields; table={table_id}; count={}",
        field_ids.len()
    );

    tx.exec(ResetFields {
        table_id: table_id.clone(),
        field_ids,
    })
    .await?;
    Ok(())
}
