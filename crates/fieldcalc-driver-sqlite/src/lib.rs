mod ddl;
use ddl::{placeholders, quote_ident, FIELD_COLUMNS};

mod row;
use row::{CellRow, FieldOpRow, FieldRow, ReferenceRow, ViewRow};

use fieldcalc_core::{
    async_trait,
    driver::{
        operation::{self, IsolationLevel, Operation, Transaction},
        Driver, Response,
    },
    op::FieldOps,
    schema::{Field, FieldId, LinkOptions, Link, Reference, TableId, View},
    Error, Result,
};
use rusqlite::{params, params_from_iter, Connection as RusqliteConnection, ErrorCode};
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    async fn connect(&self) -> Result<Box<dyn fieldcalc_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    fn max_connections(&self) -> Option<usize> {
        // Every in-memory connection is a separate database
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

/// Maps lock contention to a serialization failure, so the transaction layer
/// can retry the whole operation.
fn map_err(err: rusqlite::Error) -> Error {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            Error::serialization_failure(err.to_string())
        }
        _ => Error::driver(err),
    }
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(map_err)?;
        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(map_err)?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl fieldcalc_core::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        log::trace!("exec; op={op:?}");

        match op {
            Operation::Transaction(op) => self.transaction(op),
            Operation::InsertTable(op) => {
                let count = self
                    .connection
                    .execute(
                        "INSERT INTO table_meta (id, name) VALUES (?1, ?2)",
                        params![op.table.id.as_str(), op.table.name],
                    )
                    .map_err(map_err)?;
                Ok(Response::count(count as u64))
            }
            Operation::InsertField(op) => self.insert_field(&op.field),
            Operation::InsertView(op) => {
                let count = self
                    .connection
                    .execute(
                        "INSERT INTO view (id, table_id, name, column_order) VALUES (?1, ?2, ?3, ?4)",
                        params![
                            op.view.id.as_str(),
                            op.view.table_id.as_str(),
                            op.view.name,
                            serde_json::to_string(&op.view.column_order)?,
                        ],
                    )
                    .map_err(map_err)?;
                Ok(Response::count(count as u64))
            }
            Operation::InsertReferences(op) => {
                let mut stmt = self
                    .connection
                    .prepare_cached(
                        "INSERT OR IGNORE INTO reference (from_field_id, to_field_id, kind) \
                         VALUES (?1, ?2, ?3)",
                    )
                    .map_err(map_err)?;

                let mut count = 0;
                for edge in &op.edges {
                    count += stmt
                        .execute(params![edge.from.as_str(), edge.to.as_str(), edge.kind.as_str()])
                        .map_err(map_err)?;
                }
                Ok(Response::count(count as u64))
            }
            Operation::FindField(op) => {
                let sql = format!("SELECT {FIELD_COLUMNS} FROM field WHERE id = ?1");
                let fields = self.query_fields(&sql, [op.field_id.as_str()])?;
                Ok(Response::fields(fields))
            }
            Operation::FindFields(op) => {
                let sql = format!("SELECT {FIELD_COLUMNS} FROM field WHERE table_id = ?1 ORDER BY rowid");
                let fields = self.query_fields(&sql, [op.table_id.as_str()])?;
                Ok(Response::fields(fields))
            }
            Operation::FindViews(op) => {
                let views = find_views(&self.connection, &op.table_id)?;
                Ok(Response::views(views))
            }
            Operation::QueryReferences(op) => {
                let edges = self.query_references(&op.field_ids)?;
                Ok(Response::references(edges))
            }
            Operation::DeleteReferences(op) => {
                let count = delete_references(&self.connection, &op.edges)?;
                Ok(Response::count(count))
            }
            Operation::UpdateFields(op) => self.update_fields(op),
            Operation::DeleteFields(op) => self.delete_fields(&op.table_id, &op.field_ids),
            Operation::ResetFields(op) => self.reset_fields(&op.field_ids),
            Operation::CleanForeignKey(op) => self.clean_foreign_key(&op.options),
            Operation::DeleteColumnMeta(op) => {
                self.update_views(&op.table_id, |view| view.remove_columns(&op.field_ids))
            }
            Operation::AppendColumnMeta(op) => {
                self.update_views(&op.table_id, |view| view.push_column(op.field_id.clone()))
            }
            Operation::WriteCells(op) => {
                let mut stmt = self
                    .connection
                    .prepare_cached(
                        "INSERT OR REPLACE INTO cell (table_id, record_id, field_id, value) \
                         VALUES (?1, ?2, ?3, ?4)",
                    )
                    .map_err(map_err)?;

                for cell in &op.cells {
                    stmt.execute(params![
                        op.table_id.as_str(),
                        cell.record_id.as_str(),
                        cell.field_id.as_str(),
                        serde_json::to_string(&cell.value)?,
                    ])
                    .map_err(map_err)?;
                }
                Ok(Response::count(op.cells.len() as u64))
            }
            Operation::QueryCells(op) => {
                if op.field_ids.is_empty() {
                    return Ok(Response::cells(vec![]));
                }

                let sql = format!(
                    "SELECT record_id, field_id, value FROM cell WHERE field_id IN ({}) ORDER BY rowid",
                    placeholders(op.field_ids.len())
                );
                let mut stmt = self.connection.prepare(&sql).map_err(map_err)?;
                let rows = stmt
                    .query_map(
                        params_from_iter(op.field_ids.iter().map(FieldId::as_str)),
                        CellRow::from_row,
                    )
                    .map_err(map_err)?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(map_err)?;

                let cells = rows
                    .into_iter()
                    .map(CellRow::into_cell)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Response::cells(cells))
            }
            Operation::InsertLinks(op) => self.insert_links(&op.options, &op.links),
            Operation::QueryLinks(op) => self.query_links(&op.options),
            Operation::QueryPendingCalculations(op) => {
                let mut stmt = self
                    .connection
                    .prepare_cached(
                        "SELECT field_id FROM pending_calculation WHERE table_id = ?1 ORDER BY rowid",
                    )
                    .map_err(map_err)?;
                let field_ids = stmt
                    .query_map([op.table_id.as_str()], |row| row.get::<_, String>(0))
                    .map_err(map_err)?
                    .map(|id| id.map(FieldId::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(map_err)?;
                Ok(Response::field_ids(field_ids))
            }
            Operation::QueryFieldOps(op) => {
                let mut stmt = self
                    .connection
                    .prepare_cached(
                        "SELECT seq, table_id, field_id, op FROM field_op WHERE table_id = ?1 ORDER BY seq",
                    )
                    .map_err(map_err)?;
                let rows = stmt
                    .query_map([op.table_id.as_str()], FieldOpRow::from_row)
                    .map_err(map_err)?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(map_err)?;

                let records = rows
                    .into_iter()
                    .map(FieldOpRow::into_record)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Response::field_ops(records))
            }
        }
    }

    async fn push_schema(&mut self) -> Result<()> {
        self.connection.execute_batch(ddl::SCHEMA).map_err(map_err)
    }
}

impl Connection {
    fn transaction(&mut self, op: Transaction) -> Result<Response> {
        let sql = match op {
            // Take the write lock up front so conflicting writers fail at BEGIN
            Transaction::Start {
                isolation: IsolationLevel::Serializable,
            } => "BEGIN IMMEDIATE",
            Transaction::Start { .. } => "BEGIN DEFERRED",
            Transaction::Commit => "COMMIT",
            Transaction::Rollback => "ROLLBACK",
        };

        self.connection.execute_batch(sql).map_err(map_err)?;
        Ok(Response::count(0))
    }

    fn query_fields<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Field>> {
        query_fields(&self.connection, sql, params)
    }

    fn insert_field(&mut self, field: &Field) -> Result<Response> {
        let sp = self.connection.savepoint().map_err(map_err)?;

        let count = sp
            .execute(
                &format!(
                    "INSERT INTO field ({FIELD_COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
                ),
                params![
                    field.id.as_str(),
                    field.table_id.as_str(),
                    field.name,
                    field.description,
                    field.ty.as_str(),
                    field.is_lookup,
                    field.is_primary,
                    serde_json::to_string(&field.options)?,
                    field
                        .lookup_options
                        .as_ref()
                        .map(serde_json::to_string)
                        .transpose()?,
                    field.has_error,
                    field.version as i64,
                ],
            )
            .map_err(map_err)?;

        // Both sides of a symmetric pair share the junction storage
        if let Some(link) = field.owned_link_options() {
            let (self_key, foreign_key) = junction_columns(link);
            sp.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} ({} TEXT NOT NULL, {} TEXT NOT NULL)",
                quote_ident(&link.fk_host_table_name),
                self_key,
                foreign_key,
            ))
            .map_err(map_err)?;
        }

        sp.commit().map_err(map_err)?;
        Ok(Response::count(count as u64))
    }

    fn query_references(&self, field_ids: &[FieldId]) -> Result<Vec<Reference>> {
        if field_ids.is_empty() {
            return Ok(vec![]);
        }

        let list = placeholders(field_ids.len());
        let sql = format!(
            "SELECT from_field_id, to_field_id, kind FROM reference \
             WHERE from_field_id IN ({list}) OR to_field_id IN ({list}) ORDER BY rowid"
        );

        let ids = field_ids.iter().map(FieldId::as_str);
        let mut stmt = self.connection.prepare(&sql).map_err(map_err)?;
        let rows = stmt
            .query_map(params_from_iter(ids.clone().chain(ids)), ReferenceRow::from_row)
            .map_err(map_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_err)?;

        rows.into_iter().map(ReferenceRow::into_reference).collect()
    }

    fn update_fields(&mut self, op: operation::UpdateFields) -> Result<Response> {
        let sp = self.connection.savepoint().map_err(map_err)?;

        let mut count = 0;
        for FieldOps { field_id, ops } in &op.ops {
            let sql = format!("SELECT {FIELD_COLUMNS} FROM field WHERE id = ?1");
            let Some(mut field) = query_fields(&sp, &sql, [field_id.as_str()])?.pop() else {
                return Err(Error::field_not_found(field_id));
            };

            let mut applied = Vec::with_capacity(ops.len());
            for op in ops {
                applied.push(field.apply_op(op)?);
            }
            field.version += 1;

            sp.execute(
                "UPDATE field SET name = ?1, description = ?2, options = ?3, \
                 lookup_options = ?4, has_error = ?5, version = ?6 WHERE id = ?7",
                params![
                    field.name,
                    field.description,
                    serde_json::to_string(&field.options)?,
                    field
                        .lookup_options
                        .as_ref()
                        .map(serde_json::to_string)
                        .transpose()?,
                    field.has_error,
                    field.version as i64,
                    field.id.as_str(),
                ],
            )
            .map_err(map_err)?;

            // Logged under the field's own table, which differs from the
            // batch's table for dependents living in a linked table
            let mut insert_op = sp
                .prepare_cached("INSERT INTO field_op (table_id, field_id, op) VALUES (?1, ?2, ?3)")
                .map_err(map_err)?;
            for op in &applied {
                insert_op.execute(params![
                    field.table_id.as_str(),
                    field.id.as_str(),
                    serde_json::to_string(op)?,
                ])
                .map_err(map_err)?;
            }

            count += 1;
        }

        sp.commit().map_err(map_err)?;
        log::trace!("updated {count} fields; table={}", op.table_id);
        Ok(Response::count(count))
    }

    fn delete_fields(&mut self, table_id: &TableId, field_ids: &[FieldId]) -> Result<Response> {
        if field_ids.is_empty() {
            return Ok(Response::count(0));
        }

        let list = placeholders(field_ids.len());
        let ids = field_ids.iter().map(FieldId::as_str);
        let sp = self.connection.savepoint().map_err(map_err)?;

        let count = sp
            .execute(
                &format!("DELETE FROM field WHERE table_id = ? AND id IN ({list})"),
                params_from_iter(std::iter::once(table_id.as_str()).chain(ids.clone())),
            )
            .map_err(map_err)?;

        for sql in [
            format!("DELETE FROM cell WHERE field_id IN ({list})"),
            format!("DELETE FROM pending_calculation WHERE field_id IN ({list})"),
        ] {
            sp.execute(&sql, params_from_iter(ids.clone()))
                .map_err(map_err)?;
        }

        // Edges left over from an incomplete cleanup must not outlive the field
        sp.execute(
            &format!(
                "DELETE FROM reference WHERE from_field_id IN ({list}) OR to_field_id IN ({list})"
            ),
            params_from_iter(ids.clone().chain(ids)),
        )
        .map_err(map_err)?;

        sp.commit().map_err(map_err)?;
        Ok(Response::count(count as u64))
    }

    fn reset_fields(&mut self, field_ids: &[FieldId]) -> Result<Response> {
        if field_ids.is_empty() {
            return Ok(Response::count(0));
        }

        let list = placeholders(field_ids.len());
        let ids = field_ids.iter().map(FieldId::as_str);
        let sp = self.connection.savepoint().map_err(map_err)?;

        sp.execute(
            &format!("DELETE FROM cell WHERE field_id IN ({list})"),
            params_from_iter(ids.clone()),
        )
        .map_err(map_err)?;

        // Queued under the field's own table
        let queued = sp
            .execute(
                &format!(
                    "INSERT OR IGNORE INTO pending_calculation (field_id, table_id) \
                     SELECT id, table_id FROM field WHERE id IN ({list})"
                ),
                params_from_iter(ids),
            )
            .map_err(map_err)?;

        sp.commit().map_err(map_err)?;
        Ok(Response::count(queued as u64))
    }

    fn clean_foreign_key(&mut self, options: &LinkOptions) -> Result<Response> {
        if !self.table_exists(&options.fk_host_table_name)? {
            return Ok(Response::count(0));
        }

        self.connection
            .execute_batch(&format!(
                "DROP TABLE {}",
                quote_ident(&options.fk_host_table_name)
            ))
            .map_err(map_err)?;
        Ok(Response::count(1))
    }

    fn update_views(
        &mut self,
        table_id: &TableId,
        mut f: impl FnMut(&mut View) -> bool,
    ) -> Result<Response> {
        let sp = self.connection.savepoint().map_err(map_err)?;

        let mut count = 0;
        for mut view in find_views(&sp, table_id)? {
            if !f(&mut view) {
                continue;
            }

            sp.execute(
                "UPDATE view SET column_order = ?1 WHERE id = ?2",
                params![serde_json::to_string(&view.column_order)?, view.id.as_str()],
            )
            .map_err(map_err)?;
            count += 1;
        }

        sp.commit().map_err(map_err)?;
        Ok(Response::count(count))
    }

    fn insert_links(&mut self, options: &LinkOptions, links: &[Link]) -> Result<Response> {
        let (self_key, foreign_key) = junction_columns(options);
        let sql = format!(
            "INSERT INTO {} ({self_key}, {foreign_key}) VALUES (?1, ?2)",
            quote_ident(&options.fk_host_table_name)
        );

        let sp = self.connection.savepoint().map_err(map_err)?;
        {
            let mut stmt = sp.prepare(&sql).map_err(map_err)?;
            for link in links {
                stmt.execute(params![link.self_key.as_str(), link.foreign_key.as_str()])
                    .map_err(map_err)?;
            }
        }
        sp.commit().map_err(map_err)?;

        Ok(Response::count(links.len() as u64))
    }

    fn query_links(&self, options: &LinkOptions) -> Result<Response> {
        if !self.table_exists(&options.fk_host_table_name)? {
            return Ok(Response::links(vec![]));
        }

        let (self_key, foreign_key) = junction_columns(options);
        let sql = format!(
            "SELECT {self_key}, {foreign_key} FROM {} ORDER BY rowid",
            quote_ident(&options.fk_host_table_name)
        );

        let mut stmt = self.connection.prepare(&sql).map_err(map_err)?;
        let links = stmt
            .query_map([], |row| {
                Ok(Link {
                    self_key: row.get::<_, String>(0)?.into(),
                    foreign_key: row.get::<_, String>(1)?.into(),
                })
            })
            .map_err(map_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_err)?;

        Ok(Response::links(links))
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .map_err(map_err)?;
        Ok(count > 0)
    }
}

/// Junction key columns of a relation, quoted. The symmetric side swaps the
/// names, so both sides address the same physical columns.
fn junction_columns(options: &LinkOptions) -> (String, String) {
    (
        quote_ident(&options.self_key_name),
        quote_ident(&options.foreign_key_name),
    )
}

fn query_fields<P: rusqlite::Params>(
    connection: &RusqliteConnection,
    sql: &str,
    params: P,
) -> Result<Vec<Field>> {
    let mut stmt = connection.prepare_cached(sql).map_err(map_err)?;
    let rows = stmt
        .query_map(params, FieldRow::from_row)
        .map_err(map_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_err)?;

    rows.into_iter().map(FieldRow::into_field).collect()
}

fn find_views(connection: &RusqliteConnection, table_id: &TableId) -> Result<Vec<View>> {
    let mut stmt = connection
        .prepare_cached(
            "SELECT id, table_id, name, column_order FROM view WHERE table_id = ?1 ORDER BY rowid",
        )
        .map_err(map_err)?;
    let rows = stmt
        .query_map([table_id.as_str()], ViewRow::from_row)
        .map_err(map_err)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_err)?;

    rows.into_iter().map(ViewRow::into_view).collect()
}

fn delete_references(connection: &RusqliteConnection, edges: &[Reference]) -> Result<u64> {
    let mut stmt = connection
        .prepare_cached(
            "DELETE FROM reference WHERE from_field_id = ?1 AND to_field_id = ?2 AND kind = ?3",
        )
        .map_err(map_err)?;

    let mut count = 0;
    for edge in edges {
        count += stmt
            .execute(params![edge.from.as_str(), edge.to.as_str(), edge.kind.as_str()])
            .map_err(map_err)?;
    }
    Ok(count as u64)
}
