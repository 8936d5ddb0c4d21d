use crate::{Result, Transaction};

use fieldcalc_core::{
    driver::operation::{AppendColumnMeta, FindField, InsertField, InsertReferences, QueryReferences},
    schema::{Field, FieldId, LookupOptions, Reference, ReferenceGraph},
    Error,
};

use indexmap::IndexSet;

/// Inserts a field, the references derived from its options and its column
/// in the table's views.
///
/// Fails with a circular reference error if the references would let the
/// field be computed from itself. A lookup must fetch an existing field of
/// the foreign table through a link field of its own table that owns the
/// relation.
pub async fn create_field(tx: &mut Transaction, field: &Field) -> Result<()> {
    if let Some(lookup) = &field.lookup_options {
        check_lookup(tx, field, lookup).await?;
    }

    let edges = Reference::derive(field);

    if !edges.is_empty() {
        let mut graph = load_downstream(tx, &field.id).await?;
        graph.extend(edges.iter().cloned());
        graph.check_acyclic()?;
    }

    log::debug!(
        "creating field; table={}; field={}; type={}; references={}",
        field.table_id,
        field.id,
        field.ty,
        edges.len()
    );

    tx.exec(InsertField {
        field: field.clone(),
    })
    .await?;

    if !edges.is_empty() {
        tx.exec(InsertReferences { edges }).await?;
    }

    tx.exec(AppendColumnMeta {
        table_id: field.table_id.clone(),
        field_id: field.id.clone(),
    })
    .await?;

    Ok(())
}

async fn find_field(tx: &mut Transaction, field_id: &FieldId) -> Result<Field> {
    tx.exec(FindField {
        field_id: field_id.clone(),
    })
    .await?
    .into_field()?
    .ok_or_else(|| Error::field_not_found(field_id))
}

async fn check_lookup(tx: &mut Transaction, field: &Field, lookup: &LookupOptions) -> Result<()> {
    let link = find_field(tx, &lookup.link_field_id).await?;

    let Some(link_options) = link.owned_link_options() else {
        return Err(Error::forbidden(format!(
            "field {} looks up through {}, which does not own a link relation",
            field.id, link.id
        )));
    };

    if link.table_id != field.table_id {
        return Err(Error::forbidden(format!(
            "field {} looks up through {} of another table",
            field.id, link.id
        )));
    }

    let looked_up = find_field(tx, &lookup.lookup_field_id).await?;

    if looked_up.table_id != link_options.foreign_table_id {
        return Err(Error::forbidden(format!(
            "field {} looks up {}, which is not in the table linked by {}",
            field.id, looked_up.id, link.id
        )));
    }

    Ok(())
}

/// Loads every stored edge reachable downstream of `field_id`.
///
/// Edges may name fields created later, so a new field can already have
/// dependents. Any cycle closed by its inbound edges runs through them.
async fn load_downstream(tx: &mut Transaction, field_id: &FieldId) -> Result<ReferenceGraph> {
    let mut graph = ReferenceGraph::new();
    let mut visited = IndexSet::from([field_id.clone()]);
    let mut frontier = vec![field_id.clone()];

    while !frontier.is_empty() {
        let edges = tx
            .exec(QueryReferences {
                field_ids: frontier.clone(),
            })
            .await?
            .into_references()?;
        graph.extend(edges);

        let mut next = vec![];
        for field_id in &frontier {
            for dependent in graph.dependents(field_id, None) {
                if visited.insert(dependent.clone()) {
                    next.push(dependent);
                }
            }
        }
        frontier = next;
    }

    Ok(graph)
}
