//! # mysql_dut
//!
//! `mysql_dut` puts a MySQL server under test for a SQL fuzzing harness.
//! It loads the server's catalog into a [SchemaModel](./struct.SchemaModel.html) for the query
//! generator, then runs generated statements and classifies each result as an [Outcome](./enum.Outcome.html).
//!
//! ```no_run
//! use mysql_dut::Outcome;
//!
//! fn main() {
//!     let conninfo = "host=127.0.0.1 user=root database=test";
//!     let schema = mysql_dut::load_schema(conninfo, true).unwrap();
//!     println!("{} tables", schema.tables.len());
//!
//!     let mut session = mysql_dut::open_test_session(conninfo).unwrap();
//!     match session.run("SELECT 1 FROM DUAL WHERE 1 <<") {
//!         Outcome::SyntaxError(msg) => println!("syntax: {}", msg),
//!         Outcome::ConnectionLost(_) => session = mysql_dut::open_test_session(conninfo).unwrap(),
//!         outcome => println!("{:?}", outcome),
//!     }
//! }
//! ```
//!
//! Connection strings are whitespace separated `name=value` pairs,
//! see [parse_connection_string](./fn.parse_connection_string.html).

#![allow(clippy::needless_doctest_main)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builtins;
mod catalog;
mod connection;
mod dut;
mod error;
mod mysql;
mod parser;
mod relmodel;
mod row;
mod schema;

pub use crate::catalog::load;
pub use crate::connection::Session;
pub use crate::dut::{execute_test_statement, ErrorCodes, Outcome};
pub use crate::error::{Error, ParseError};
pub use crate::mysql::{load_schema, open_test_session};
pub use crate::parser::{parse_connection_string, ConnectionParameters};
pub use crate::relmodel::{Column, Op, Routine, SqlType, Table};
pub use crate::schema::SchemaModel;

pub mod prelude {
    //! Re-exports important traits and types.

    pub use crate::connection::Session;
    pub use crate::dut::{ErrorCodes, Outcome};
    pub use crate::error::{Error, ParseError};
    pub use crate::schema::SchemaModel;
    pub use crate::{execute_test_statement, load_schema, open_test_session, parse_connection_string};
}

/// A typedef of the result returned by many methods.
pub type Result<T, E = crate::error::Error> = std::result::Result<T, E>;
