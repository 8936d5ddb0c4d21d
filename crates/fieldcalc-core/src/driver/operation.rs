mod append_column_meta;
pub use append_column_meta::AppendColumnMeta;

mod clean_foreign_key;
pub use clean_foreign_key::CleanForeignKey;

mod delete_column_meta;
pub use delete_column_meta::DeleteColumnMeta;

mod delete_fields;
pub use delete_fields::DeleteFields;

mod delete_references;
pub use delete_references::DeleteReferences;

mod find_field;
pub use find_field::FindField;

mod find_fields;
pub use find_fields::FindFields;

mod find_views;
pub use find_views::FindViews;

mod insert_field;
pub use insert_field::InsertField;

mod insert_links;
pub use insert_links::InsertLinks;

mod insert_references;
pub use insert_references::InsertReferences;

mod insert_table;
pub use insert_table::InsertTable;

mod insert_view;
pub use insert_view::InsertView;

mod query_cells;
pub use query_cells::QueryCells;

mod query_field_ops;
pub use query_field_ops::QueryFieldOps;

mod query_links;
pub use query_links::QueryLinks;

mod query_pending_calculations;
pub use query_pending_calculations::QueryPendingCalculations;

mod query_references;
pub use query_references::QueryReferences;

mod reset_fields;
pub use reset_fields::ResetFields;

mod transaction;
pub use transaction::{IsolationLevel, Transaction};

mod update_fields;
pub use update_fields::UpdateFields;

mod write_cells;
pub use write_cells::WriteCells;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Append a field to the column order of a table's views
    AppendColumnMeta(AppendColumnMeta),

    /// Drop a link relation's junction storage
    CleanForeignKey(CleanForeignKey),

    /// Remove fields from the column order of a table's views
    DeleteColumnMeta(DeleteColumnMeta),

    /// Hard-delete field records
    DeleteFields(DeleteFields),

    /// Remove reference edges
    DeleteReferences(DeleteReferences),

    /// Load one field by id
    FindField(FindField),

    /// Load the fields of a table
    FindFields(FindFields),

    /// Load the views of a table
    FindViews(FindViews),

    InsertField(InsertField),

    InsertLinks(InsertLinks),

    InsertReferences(InsertReferences),

    InsertTable(InsertTable),

    InsertView(InsertView),

    QueryCells(QueryCells),

    QueryFieldOps(QueryFieldOps),

    QueryLinks(QueryLinks),

    QueryPendingCalculations(QueryPendingCalculations),

    /// Load the edges touching a set of fields
    QueryReferences(QueryReferences),

    /// Invalidate cached values and queue recalculation
    ResetFields(ResetFields),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Apply a batch of field ops
    UpdateFields(UpdateFields),

    WriteCells(WriteCells),
}

impl Operation {
    /// True if executing the operation can change stored state.
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Operation::FindField(_)
                | Operation::FindFields(_)
                | Operation::FindViews(_)
                | Operation::QueryCells(_)
                | Operation::QueryFieldOps(_)
                | Operation::QueryLinks(_)
                | Operation::QueryPendingCalculations(_)
                | Operation::QueryReferences(_)
                | Operation::Transaction(_)
        )
    }
}
