mod cell;
pub use cell::{Cell, Link};

mod field;
pub use field::{Field, FieldType};

mod graph;
pub use graph::{Detached, ReferenceGraph};

mod id;
pub use id::{FieldId, RecordId, TableId, ViewId};

mod options;
pub use options::{
    FieldOptions, FormulaOptions, LinkOptions, LookupOptions, Relationship, RollupOptions,
};

mod reference;
pub use reference::{Reference, ReferenceKind};

mod table;
pub use table::Table;

mod view;
pub use view::View;
