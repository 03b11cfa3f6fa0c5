//! Interface to [MySQL](https://www.mysql.com/) of mysql_dut.

pub(crate) mod connection;

use crate::catalog;
use crate::connection::Session;
use crate::parser::parse_connection_string;
use crate::schema::SchemaModel;
use crate::Result;

/// Open a session for running generated statements.
///
/// # Examples
///
/// ```no_run
/// use mysql_dut::Outcome;
///
/// let mut session = mysql_dut::open_test_session("user=root database=test").unwrap();
/// assert_eq!(session.run("SELECT 1"), Outcome::Success);
/// ```
pub fn open_test_session(conninfo: &str) -> Result<Session> {
    let params = parse_connection_string(conninfo)?;
    connection::open(&params)
}

/// Connect, load the catalog and disconnect.
///
/// # Examples
///
/// ```no_run
/// let schema = mysql_dut::load_schema("user=root database=test", true).unwrap();
/// for table in &schema.tables {
///     println!("{} ({} columns)", table.ident(), table.columns().len());
/// }
/// ```
pub fn load_schema(conninfo: &str, exclude_system_schemas: bool) -> Result<SchemaModel> {
    let params = parse_connection_string(conninfo)?;
    let mut session = connection::open(&params)?;
    catalog::load(&mut session, exclude_system_schemas)
}
