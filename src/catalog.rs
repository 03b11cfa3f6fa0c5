use crate::connection::Session;
use crate::error::Error;
use crate::relmodel::{Column, SqlType, Table};
use crate::schema::SchemaModel;
use crate::Result;

const TABLES_QUERY: &str =
    "SELECT table_schema, table_name FROM information_schema.tables WHERE engine = 'innodb'";

const SYSTEM_SCHEMAS_FILTER: &str =
    " AND table_schema NOT IN ('information_schema', 'sys', 'performance_schema', 'mysql')";

const COLUMNS_QUERY: &str =
    "SELECT column_name, data_type FROM information_schema.columns \
     WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position";

/// Load the catalog visible to `session` into a [SchemaModel](./struct.SchemaModel.html).
///
/// Only InnoDB tables are loaded. With `exclude_system_schemas` the server's own
/// schemas are skipped. Any failing metadata query aborts the load.
/// The session is closed afterwards, whether the load succeeded or not.
pub fn load(session: &mut Session, exclude_system_schemas: bool) -> Result<SchemaModel> {
    let model = load_model(session, exclude_system_schemas);
    session.close();
    model
}

fn load_model(session: &mut Session, exclude_system_schemas: bool) -> Result<SchemaModel> {
    session.execute_discard("SET NAMES utf8mb4")?;

    let version = session
        .rows("SELECT VERSION()", &[])?
        .first()
        .and_then(|row| row.get(0))
        .unwrap_or_default()
        .to_string();

    log::info!("loading tables");
    let mut query = String::from(TABLES_QUERY);
    if exclude_system_schemas {
        query.push_str(SYSTEM_SCHEMAS_FILTER);
    }

    let mut tables = Vec::new();
    for row in session.rows(&query, &[])? {
        let (schema, name) = match (row.get(0), row.get(1)) {
            (Some(schema), Some(name)) => (schema, name),
            _ => return Err(Error::Execution(String::from("table catalog returned NULL"))),
        };
        tables.push(Table::new(schema, name, true, true));
    }
    log::info!("loaded {} tables", tables.len());

    log::info!("loading columns");
    let mut column_count = 0;
    for table in tables.iter_mut() {
        let rows = session.rows(COLUMNS_QUERY, &[table.schema.as_str(), table.name.as_str()])?;
        for row in rows {
            let name = row.get(0).unwrap_or_default();
            let ty = row.get(1).unwrap_or_default();
            table.columns.push(Column::new(name, SqlType::get(ty)));
        }
        log::debug!("{}: {} columns", table.ident(), table.columns().len());
        column_count += table.columns().len();
    }
    log::info!("loaded {} columns", column_count);

    let model = SchemaModel::new(tables, version);
    log::info!(
        "schema ready: {} tables, {} operators, {} routines, {} aggregates, {} types",
        model.tables.len(),
        model.operators.len(),
        model.routines.len(),
        model.aggregates.len(),
        model.types().count(),
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::connection::mock::*;
    use crate::connection::Diagnostic;

    fn preamble() -> Vec<Reply> {
        vec![Reply::Ok, Reply::Rows(vec![row(&["8.0.36"])])]
    }

    #[test]
    fn empty_catalog() {
        let mut replies = preamble();
        replies.push(Reply::Rows(Vec::new()));
        let (mut session, requests, _) = MockTransport::session(replies);

        let model = load(&mut session, false).unwrap();
        assert!(model.tables.is_empty());
        assert_eq!(model.version, "8.0.36");
        assert_eq!(model.routines.len(), 35);
        assert_eq!(requests.lock().unwrap().len(), 3);
        assert!(session.is_closed());
    }

    #[test]
    fn tables_and_columns() {
        let mut replies = preamble();
        replies.push(Reply::Rows(vec![row(&["test", "users"]), row(&["test", "empty"]), row(&["shop", "orders"])]));
        replies.push(Reply::Rows(vec![row(&["id", "int"]), row(&["name", "varchar"])]));
        replies.push(Reply::Rows(Vec::new()));
        replies.push(Reply::Rows(vec![row(&["total", "decimal"])]));
        let (mut session, requests, dropped) = MockTransport::session(replies);

        let model = load(&mut session, false).unwrap();
        assert!(session.is_closed());
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
        let names: Vec<String> = model.tables.iter().map(|t| t.ident()).collect();
        assert_eq!(names, vec!["test.users", "test.empty", "shop.orders"]);
        assert!(model.tables.iter().all(|t| t.is_insertable && t.is_base_table));

        let users = &model.tables[0];
        assert_eq!(users.columns(), &[
            Column::new("id", SqlType::get("int")),
            Column::new("name", SqlType::get("varchar")),
        ]);
        assert!(model.tables[1].columns().is_empty());
        assert_eq!(model.tables[2].columns()[0].ty, SqlType::get("decimal"));

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].0, "SET NAMES utf8mb4");
        assert_eq!(requests[2].0, TABLES_QUERY);
        assert_eq!(requests[3], (COLUMNS_QUERY.to_string(), vec!["test".to_string(), "users".to_string()]));
        assert_eq!(requests[5].1, vec!["shop", "orders"]);
    }

    #[test]
    fn exclude_system_schemas() {
        let mut replies = preamble();
        replies.push(Reply::Rows(Vec::new()));
        let (mut session, requests, _) = MockTransport::session(replies);

        load(&mut session, true).unwrap();
        let requests = requests.lock().unwrap();
        assert!(requests[2].0.starts_with(TABLES_QUERY));
        assert!(requests[2].0.ends_with("NOT IN ('information_schema', 'sys', 'performance_schema', 'mysql')"));
    }

    #[test]
    fn names_are_bound_not_interpolated() {
        let mut replies = preamble();
        replies.push(Reply::Rows(vec![row(&["te'st", "it's"])]));
        replies.push(Reply::Rows(vec![row(&["a", "int"])]));
        let (mut session, requests, _) = MockTransport::session(replies);

        let model = load(&mut session, false).unwrap();
        assert_eq!(model.tables[0].name, "it's");
        let requests = requests.lock().unwrap();
        assert_eq!(requests[3].0, COLUMNS_QUERY);
        assert_eq!(requests[3].1, vec!["te'st", "it's"]);
    }

    #[test]
    fn tables_query_failure() {
        let mut replies = preamble();
        replies.push(Reply::Error(Diagnostic::new(1142, "SELECT command denied")));
        let (mut session, _, _) = MockTransport::session(replies);

        assert_eq!(load(&mut session, false), Err(Error::Execution("SELECT command denied".into())));
        assert!(session.is_closed());
    }

    #[test]
    fn columns_query_failure() {
        let mut replies = preamble();
        replies.push(Reply::Rows(vec![row(&["test", "a"]), row(&["test", "b"])]));
        replies.push(Reply::Rows(vec![row(&["id", "int"])]));
        replies.push(Reply::Error(Diagnostic::new(2013, "Lost connection to MySQL server during query")));
        let (mut session, _, _) = MockTransport::session(replies);

        assert_eq!(
            load(&mut session, false),
            Err(Error::Execution("Lost connection to MySQL server during query".into())),
        );
        assert!(session.is_closed());
    }

    #[test]
    fn null_table_name() {
        let mut replies = preamble();
        let null_row: crate::row::Row = vec![("TABLE_SCHEMA", Some("test")), ("TABLE_NAME", None)].into_iter().collect();
        replies.push(Reply::Rows(vec![null_row]));
        let (mut session, _, _) = MockTransport::session(replies);

        assert!(matches!(load(&mut session, false), Err(Error::Execution(_))));
    }

    #[test]
    fn closed_session() {
        let (mut session, _, dropped) = MockTransport::session(Vec::new());
        session.close();
        assert_eq!(load(&mut session, false), Err(Error::SessionClosed));
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }
}
