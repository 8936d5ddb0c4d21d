use crate::{Result, Transaction};

use fieldcalc_core::{
    driver::operation::DeleteColumnMeta,
    schema::{FieldId, TableId},
};

/// Removes fields from the column order of every view of the table. Ids no
/// view lists are ignored.
pub async fn delete_column_meta_order(
    tx: &mut Transaction,
    table_id: &TableId,
    field_ids: &[FieldId],
) -> Result<()> {
    if field_ids.is_empty() {
        return Ok(());
    }

    let count = tx
        .exec(DeleteColumnMeta {
            table_id: table_id.clone(),
            field_ids: field_ids.to_vec(),
        })
        .await?
        .into_count()?;

    log::trace!("removed columns from {count} views; table={table_id}");
    Ok(())
}
