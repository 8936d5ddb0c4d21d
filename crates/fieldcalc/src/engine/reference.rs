use crate::{Result, Transaction};

use fieldcalc_core::{
    driver::operation::{CleanForeignKey, DeleteReferences, QueryReferences},
    schema::{Detached, FieldId, LinkOptions, ReferenceGraph},
};

/// Loads the edges touching `field_id`.
async fn load(tx: &mut Transaction, field_id: &FieldId) -> Result<ReferenceGraph> {
    let edges = tx
        .exec(QueryReferences {
            field_ids: vec![field_id.clone()],
        })
        .await?
        .into_references()?;

    Ok(edges.into_iter().collect())
}

async fn delete(tx: &mut Transaction, detached: Detached) -> Result<Vec<FieldId>> {
    if !detached.edges.is_empty() {
        log::trace!("deleting {} references", detached.edges.len());
        tx.exec(DeleteReferences {
            edges: detached.edges,
        })
        .await?;
    }

    Ok(detached.dependents)
}

/// Removes the value references of `field_id`, both the ones computing other
/// fields from it and the ones it is computed from.
///
/// Returns the fields that lost `field_id` as a source.
pub async fn delete_reference(tx: &mut Transaction, field_id: &FieldId) -> Result<Vec<FieldId>> {
    let mut graph = load(tx, field_id).await?;
    let detached = graph.remove_references(field_id);
    delete(tx, detached).await
}

/// Removes the lookup references fetching values through the link field
/// `field_id`.
///
/// Returns the lookup and rollup fields that lost their link.
pub async fn delete_lookup_field_reference(
    tx: &mut Transaction,
    field_id: &FieldId,
) -> Result<Vec<FieldId>> {
    let mut graph = load(tx, field_id).await?;
    let detached = graph.remove_lookup_references(field_id);
    delete(tx, detached).await
}

/// Drops the junction storage of a link relation.
pub async fn clean_foreign_key(tx: &mut Transaction, options: &LinkOptions) -> Result<()> {
    log::debug!("cleaning foreign key; junction={}", options.fk_host_table_name);

    tx.exec(CleanForeignKey {
        options: options.clone(),
    })
    .await?;
    Ok(())
}
