use lazy_static::lazy_static;

use crate::relmodel::{Op, Routine, SqlType};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    /// Binary operator. Both operands and the result have the return type.
    Operator,
    Function,
    Aggregate,
}

/// One row of the builtin table.
pub(crate) struct Builtin {
    pub(crate) kind: Kind,
    pub(crate) name: &'static str,
    pub(crate) ret:  &'static str,
    pub(crate) args: &'static [&'static str],
}

const fn op(name: &'static str, ty: &'static str) -> Builtin {
    Builtin { kind: Kind::Operator, name, ret: ty, args: &[] }
}

const fn func(name: &'static str, ret: &'static str, args: &'static [&'static str]) -> Builtin {
    Builtin { kind: Kind::Function, name, ret, args }
}

const fn agg(name: &'static str, ret: &'static str, args: &'static [&'static str]) -> Builtin {
    Builtin { kind: Kind::Aggregate, name, ret, args }
}

pub(crate) const BUILTINS: &[Builtin] = &[
    op("||", "TEXT"),
    op("*", "INTEGER"),
    op("/", "INTEGER"),
    op("+", "INTEGER"),
    op("-", "INTEGER"),
    op(">>", "INTEGER"),
    op("<<", "INTEGER"),
    op("&", "INTEGER"),
    op("|", "INTEGER"),
    op("<", "INTEGER"),
    op("<=", "INTEGER"),
    op(">", "INTEGER"),
    op(">=", "INTEGER"),
    op("=", "INTEGER"),
    op("<>", "INTEGER"),
    op("IS", "INTEGER"),
    op("IS NOT", "INTEGER"),
    op("AND", "INTEGER"),
    op("OR", "INTEGER"),

    func("last_insert_rowid", "INTEGER", &[]),
    func("random", "INTEGER", &[]),
    func("sqlite_source_id", "TEXT", &[]),
    func("sqlite_version", "TEXT", &[]),
    func("total_changes", "INTEGER", &[]),

    func("abs", "INTEGER", &["REAL"]),
    func("hex", "TEXT", &["TEXT"]),
    func("length", "INTEGER", &["TEXT"]),
    func("lower", "TEXT", &["TEXT"]),
    func("ltrim", "TEXT", &["TEXT"]),
    func("quote", "TEXT", &["TEXT"]),
    func("randomblob", "TEXT", &["INTEGER"]),
    func("round", "INTEGER", &["REAL"]),
    func("rtrim", "TEXT", &["TEXT"]),
    func("soundex", "TEXT", &["TEXT"]),
    func("sqlite_compileoption_get", "TEXT", &["INTEGER"]),
    func("sqlite_compileoption_used", "INTEGER", &["TEXT"]),
    func("trim", "TEXT", &["TEXT"]),
    func("typeof", "TEXT", &["INTEGER"]),
    func("typeof", "TEXT", &["NUMERIC"]),
    func("typeof", "TEXT", &["REAL"]),
    func("typeof", "TEXT", &["TEXT"]),
    func("unicode", "INTEGER", &["TEXT"]),
    func("upper", "TEXT", &["TEXT"]),
    func("zeroblob", "TEXT", &["INTEGER"]),

    func("glob", "INTEGER", &["TEXT", "TEXT"]),
    func("instr", "INTEGER", &["TEXT", "TEXT"]),
    func("like", "INTEGER", &["TEXT", "TEXT"]),
    func("ltrim", "TEXT", &["TEXT", "TEXT"]),
    func("rtrim", "TEXT", &["TEXT", "TEXT"]),
    func("trim", "TEXT", &["TEXT", "TEXT"]),
    func("round", "INTEGER", &["REAL", "INTEGER"]),
    func("substr", "TEXT", &["TEXT", "INTEGER"]),

    func("substr", "TEXT", &["TEXT", "INTEGER", "INTEGER"]),
    func("replace", "TEXT", &["TEXT", "TEXT", "TEXT"]),

    agg("avg", "INTEGER", &["INTEGER"]),
    agg("avg", "REAL", &["REAL"]),
    agg("count", "INTEGER", &["REAL"]),
    agg("count", "INTEGER", &["TEXT"]),
    agg("count", "INTEGER", &["INTEGER"]),
    agg("group_concat", "TEXT", &["TEXT"]),
    agg("max", "REAL", &["REAL"]),
    agg("max", "INTEGER", &["INTEGER"]),
    agg("sum", "REAL", &["REAL"]),
    agg("sum", "INTEGER", &["INTEGER"]),
    agg("total", "REAL", &["INTEGER"]),
    agg("total", "REAL", &["REAL"]),
];

/// Operators, functions and aggregates, in table order.
#[derive(Debug)]
pub(crate) struct Registry {
    pub(crate) operators:  Vec<Op>,
    pub(crate) routines:   Vec<Routine>,
    pub(crate) aggregates: Vec<Routine>,
}

impl Registry {
    fn from_table(table: &[Builtin]) -> Self {
        let mut registry = Registry {
            operators:  Vec::new(),
            routines:   Vec::new(),
            aggregates: Vec::new(),
        };

        for b in table {
            match b.kind {
                Kind::Operator => registry.operators.push(Op {
                    name:   b.name.to_string(),
                    left:   SqlType::get(b.ret),
                    right:  SqlType::get(b.ret),
                    result: SqlType::get(b.ret),
                }),
                Kind::Function => registry.routines.push(routine(b)),
                Kind::Aggregate => registry.aggregates.push(routine(b)),
            }
        }

        registry
    }
}

fn routine(b: &Builtin) -> Routine {
    Routine {
        specific_name: String::new(),
        schema:        String::new(),
        restype:       SqlType::get(b.ret),
        name:          b.name.to_string(),
        argtypes:      b.args.iter().map(|&a| SqlType::get(a)).collect(),
    }
}

lazy_static! {
    pub(crate) static ref REGISTRY: Registry = Registry::from_table(BUILTINS);
}
