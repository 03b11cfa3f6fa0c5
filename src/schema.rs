use indexmap::{IndexMap, IndexSet};

use crate::builtins::REGISTRY;
use crate::relmodel::{Op, Routine, SqlType, Table};

/// Tables of the target database and the builtins the generator may call.
///
/// A loaded model holds no connection.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaModel {
    pub tables:        Vec<Table>,
    pub operators:     Vec<Op>,
    pub routines:      Vec<Routine>,
    pub aggregates:    Vec<Routine>,
    /// Server version, as reported by `VERSION()`.
    pub version:       String,
    pub booltype:      SqlType,
    pub inttype:       SqlType,
    pub internaltype:  SqlType,
    pub arraytype:     SqlType,
    pub true_literal:  &'static str,
    pub false_literal: &'static str,
    index:             Index,
}

// Positions into the vectors of SchemaModel, keyed by type.
#[derive(Clone, Debug, Default, PartialEq)]
struct Index {
    types:                   IndexSet<SqlType>,
    tables_with_column_of:   IndexMap<SqlType, Vec<usize>>,
    operators_returning:     IndexMap<SqlType, Vec<usize>>,
    routines_returning:      IndexMap<SqlType, Vec<usize>>,
    parameterless_returning: IndexMap<SqlType, Vec<usize>>,
    aggregates_returning:    IndexMap<SqlType, Vec<usize>>,
}

impl SchemaModel {
    /// A model with the given tables and the builtin registry.
    pub(crate) fn new(tables: Vec<Table>, version: String) -> Self {
        let mut model = SchemaModel {
            tables,
            operators:     REGISTRY.operators.clone(),
            routines:      REGISTRY.routines.clone(),
            aggregates:    REGISTRY.aggregates.clone(),
            version,
            booltype:      SqlType::get("INTEGER"),
            inttype:       SqlType::get("INTEGER"),
            internaltype:  SqlType::get("internal"),
            arraytype:     SqlType::get("ARRAY"),
            true_literal:  "1",
            false_literal: "0",
            index:         Index::default(),
        };
        model.generate_indexes();
        model
    }

    fn generate_indexes(&mut self) {
        let mut index = Index::default();

        for (i, table) in self.tables.iter().enumerate() {
            for column in table.columns() {
                index.types.insert(column.ty.clone());
                let tables = index.tables_with_column_of.entry(column.ty.clone()).or_default();
                if tables.last() != Some(&i) {
                    tables.push(i);
                }
            }
        }

        for (i, op) in self.operators.iter().enumerate() {
            index.types.insert(op.left.clone());
            index.types.insert(op.right.clone());
            index.types.insert(op.result.clone());
            index.operators_returning.entry(op.result.clone()).or_default().push(i);
        }

        for (i, r) in self.routines.iter().enumerate() {
            index.types.insert(r.restype.clone());
            index.types.extend(r.argtypes.iter().cloned());
            index.routines_returning.entry(r.restype.clone()).or_default().push(i);
            if r.argtypes.is_empty() {
                index.parameterless_returning.entry(r.restype.clone()).or_default().push(i);
            }
        }

        for (i, r) in self.aggregates.iter().enumerate() {
            index.types.insert(r.restype.clone());
            index.types.extend(r.argtypes.iter().cloned());
            index.aggregates_returning.entry(r.restype.clone()).or_default().push(i);
        }

        self.index = index;
    }

    /// Every type seen in a column or builtin signature, in first-seen order.
    pub fn types(&self) -> impl Iterator<Item = &SqlType> {
        self.index.types.iter()
    }

    pub fn tables_with_columns_of<'a>(&'a self, ty: &SqlType) -> impl Iterator<Item = &'a Table> {
        pick(&self.tables, &self.index.tables_with_column_of, ty)
    }

    pub fn operators_returning<'a>(&'a self, ty: &SqlType) -> impl Iterator<Item = &'a Op> {
        pick(&self.operators, &self.index.operators_returning, ty)
    }

    pub fn routines_returning<'a>(&'a self, ty: &SqlType) -> impl Iterator<Item = &'a Routine> {
        pick(&self.routines, &self.index.routines_returning, ty)
    }

    pub fn parameterless_routines_returning<'a>(&'a self, ty: &SqlType) -> impl Iterator<Item = &'a Routine> {
        pick(&self.routines, &self.index.parameterless_returning, ty)
    }

    pub fn aggregates_returning<'a>(&'a self, ty: &SqlType) -> impl Iterator<Item = &'a Routine> {
        pick(&self.aggregates, &self.index.aggregates_returning, ty)
    }

    /// Identifiers are used as-is.
    pub fn quote_name(&self, id: &str) -> String {
        id.to_string()
    }

    /// A string literal for `s`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let schema = mysql_dut::load_schema("user=root database=test", true).unwrap();
    /// assert_eq!(schema.quote_literal("O'Reilly"), "'O''Reilly'");
    /// ```
    pub fn quote_literal(&self, s: &str) -> String {
        escape_string(s)
    }
}

/// Wrap a value in single quotes, doubling embedded quotes and backslashes.
fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            escaped.push(c);
        }
        escaped.push(c);
    }
    escaped.push('\'');
    escaped
}

fn pick<'a, T>(items: &'a [T], index: &'a IndexMap<SqlType, Vec<usize>>, ty: &SqlType) -> impl Iterator<Item = &'a T> {
    index.get(ty).into_iter().flatten().map(move |&i| &items[i])
}
