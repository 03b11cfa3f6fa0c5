//! The relational model handed to the query generator.

use std::fmt;

/// A SQL type, identified by its name as the server spells it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SqlType {
    name: String,
}

impl SqlType {
    #[inline]
    pub fn get<T: Into<String>>(name: T) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty:   SqlType,
}

impl Column {
    pub fn new<T: Into<String>>(name: T, ty: SqlType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A base table of the target database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub schema:        String,
    pub name:          String,
    pub is_insertable: bool,
    pub is_base_table: bool,
    pub(crate) columns: Vec<Column>,
}

impl Table {
    pub fn new<S: Into<String>, N: Into<String>>(schema: S, name: N, is_insertable: bool, is_base_table: bool) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            is_insertable,
            is_base_table,
            columns: Vec::new(),
        }
    }

    /// Columns in ordinal order. May be empty.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// `schema.name`
    pub fn ident(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// A binary operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Op {
    pub name:   String,
    pub left:   SqlType,
    pub right:  SqlType,
    pub result: SqlType,
}

/// A scalar or aggregate function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routine {
    pub specific_name: String,
    pub schema:        String,
    pub restype:       SqlType,
    pub name:          String,
    pub argtypes:      Vec<SqlType>,
}

impl Routine {
    /// The name as it appears in a call.
    pub fn ident(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }
}
