//! Field deletion.
//!
//! Deleting a field runs through a fixed sequence of states:
//!
//! ```text
//! Requested -> Validated -> ReferencesCleaned -> FieldDeleted -> ViewCleaned -> Done
//! ```
//!
//! Validation is the only step that can reject the request, and it performs
//! no writes. Every later step runs in the caller's transaction, so a failure
//! there aborts the whole deletion.

use super::{calculation, mutator, reference, view};
use crate::{Result, Transaction};

use fieldcalc_core::{
    driver::operation::FindField,
    schema::{Field, FieldId, TableId},
    Error,
};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionState {
    Requested,
    Validated(Field),
    ReferencesCleaned(Field),
    FieldDeleted(Field),
    ViewCleaned,
    Done,
}

/// One field deletion request.
#[derive(Debug)]
pub struct FieldDeletion {
    table_id: TableId,
    field_id: FieldId,
    state: DeletionState,
}

impl FieldDeletion {
    pub fn new(table_id: TableId, field_id: FieldId) -> FieldDeletion {
        FieldDeletion {
            table_id,
            field_id,
            state: DeletionState::Requested,
        }
    }

    pub fn state(&self) -> &DeletionState {
        &self.state
    }

    /// Runs the deletion to completion.
    pub async fn run(mut self, tx: &mut Transaction) -> Result<()> {
        while !self.is_done() {
            self.step(tx).await?;
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.state == DeletionState::Done
    }

    /// Performs the transition out of the current state.
    pub async fn step(&mut self, tx: &mut Transaction) -> Result<()> {
        let next = match &self.state {
            DeletionState::Requested => DeletionState::Validated(self.validate(tx).await?),
            DeletionState::Validated(field) => {
                let field = field.clone();
                self.clean_references(tx, &field).await?;
                DeletionState::ReferencesCleaned(field)
            }
            DeletionState::ReferencesCleaned(field) => {
                let field = field.clone();
                mutator::batch_delete_fields(tx, &self.table_id, &[field.id.clone()]).await?;
                DeletionState::FieldDeleted(field)
            }
            DeletionState::FieldDeleted(field) => {
                // The symmetric field survives, so only the deleted id leaves
                // the views
                let field_ids = [field.id.clone()];
                view::delete_column_meta_order(tx, &self.table_id, &field_ids).await?;
                DeletionState::ViewCleaned
            }
            DeletionState::ViewCleaned | DeletionState::Done => DeletionState::Done,
        };

        log::debug!(
            "deleteField; table={}; field={}; {} -> {}",
            self.table_id,
            self.field_id,
            self.state,
            next
        );

        self.state = next;
        Ok(())
    }

    async fn validate(&self, tx: &mut Transaction) -> Result<Field> {
        let field = tx
            .exec(FindField {
                field_id: self.field_id.clone(),
            })
            .await?
            .into_field()?
            .filter(|field| field.table_id == self.table_id);

        let Some(field) = field else {
            log::debug!(
                "deleteField rejected; table={}; field={}; not found",
                self.table_id,
                self.field_id
            );
            return Err(Error::field_not_found(&self.field_id));
        };

        if field.is_primary {
            log::debug!(
                "deleteField rejected; table={}; field={}; primary",
                self.table_id,
                self.field_id
            );
            return Err(Error::forbidden(format!(
                "cannot delete primary field {}",
                field.id
            )));
        }

        Ok(field)
    }

    async fn clean_references(&self, tx: &mut Transaction, field: &Field) -> Result<()> {
        // Only relation owners are the link of a lookup
        let Some(link) = field.owned_link_options() else {
            return clean_field(tx, &self.table_id, &field.id, false).await;
        };

        reference::clean_foreign_key(tx, link).await?;
        clean_field(tx, &self.table_id, &field.id, true).await?;

        if let Some(symmetric_field_id) = &link.symmetric_field_id {
            log::debug!(
                "cleaning symmetric field; table={}; field={symmetric_field_id}",
                link.foreign_table_id
            );
            clean_field(tx, &link.foreign_table_id, symmetric_field_id, true).await?;
            mutator::detach_symmetric_field(tx, symmetric_field_id).await?;
        }

        Ok(())
    }
}

/// Removes the references of a field, flags the fields that lost it as a
/// source, then invalidates them together with the field itself.
///
/// Flagging precedes invalidation, so an erroneous field never keeps a stale
/// cached value.
async fn clean_field(
    tx: &mut Transaction,
    table_id: &TableId,
    field_id: &FieldId,
    is_link: bool,
) -> Result<()> {
    let mut dependents = reference::delete_reference(tx, field_id).await?;

    if is_link {
        dependents.extend(reference::delete_lookup_field_reference(tx, field_id).await?);
    }

    mutator::mark_fields_as_error(tx, table_id, &dependents).await?;

    dependents.push(field_id.clone());
    calculation::reset_fields(tx, table_id, &dependents).await
}

impl DeletionState {
    pub fn name(&self) -> &'static str {
        match self {
            DeletionState::Requested => "Requested",
            DeletionState::Validated(_) => "Validated",
            DeletionState::ReferencesCleaned(_) => "ReferencesCleaned",
            DeletionState::FieldDeleted(_) => "FieldDeleted",
            DeletionState::ViewCleaned => "ViewCleaned",
            DeletionState::Done => "Done",
        }
    }
}

impl fmt::Display for DeletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
