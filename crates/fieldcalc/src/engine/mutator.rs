use super::dedup;
use crate::{Result, Transaction};

use fieldcalc_core::{
    driver::operation::{DeleteFields, FindField, UpdateFields},
    op::{FieldOp, FieldOps, FieldProperty},
    schema::{Field, FieldId, TableId},
};

/// Flags every field as erroneous in a single batched write.
pub async fn mark_fields_as_error(
    tx: &mut Transaction,
    table_id: &TableId,
    field_ids: &[FieldId],
) -> Result<()> {
    let field_ids = dedup(field_ids);
    if field_ids.is_empty() {
        return Ok(());
    }

    log::debug!(
        "marking fields as error; table={table_id}; count={}",
        field_ids.len()
    );

    let ops = field_ids
        .into_iter()
        .map(|field_id| FieldOps::new(field_id, vec![FieldOp::set_has_error()]))
        .collect();

    batch_update_fields(tx, table_id, ops).await
}

/// Hard-deletes field records.
///
/// Primary fields are not checked for; callers reject them beforehand.
pub async fn batch_delete_fields(
    tx: &mut Transaction,
    table_id: &TableId,
    field_ids: &[FieldId],
) -> Result<()> {
    if field_ids.is_empty() {
        return Ok(());
    }

    log::debug!(
        "deleting fields; table={table_id}; count={}",
        field_ids.len()
    );

    tx.exec(DeleteFields {
        table_id: table_id.clone(),
        field_ids: field_ids.to_vec(),
    })
    .await?;
    Ok(())
}

/// Applies field ops as one batch, recording them in the operation log.
pub async fn batch_update_fields(
    tx: &mut Transaction,
    table_id: &TableId,
    ops: Vec<FieldOps>,
) -> Result<()> {
    if ops.is_empty() {
        return Ok(());
    }

    tx.exec(UpdateFields {
        table_id: table_id.clone(),
        ops,
    })
    .await?;
    Ok(())
}

/// Detaches the surviving side of a symmetric link pair whose other side is
/// being deleted: drops its back-reference and flags it as erroneous.
pub async fn detach_symmetric_field(tx: &mut Transaction, field_id: &FieldId) -> Result<()> {
    let Some(field) = tx
        .exec(FindField {
            field_id: field_id.clone(),
        })
        .await?
        .into_field()?
    else {
        log::warn!("symmetric field missing; field={field_id}");
        return Ok(());
    };

    let ops = detach_ops(&field)?;
    batch_update_fields(tx, &field.table_id, vec![FieldOps::new(field.id, ops)]).await
}

fn detach_ops(field: &Field) -> Result<Vec<FieldOp>> {
    let mut ops = vec![];

    let mut options = field.options.clone();
    if let Some(link) = options.as_link_mut() {
        if link.symmetric_field_id.take().is_some() {
            ops.push(FieldOp::set_property(
                FieldProperty::Options,
                Some(field.property(FieldProperty::Options)?),
                serde_json::to_value(&options)?,
            ));
        }
    }

    ops.push(FieldOp::set_has_error());
    Ok(ops)
}
