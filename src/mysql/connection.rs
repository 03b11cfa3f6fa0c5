extern crate mysql_sys as mysql;

use mysql::prelude::*;
use mysql::{Conn, DriverError, OptsBuilder, Params, Value};

use crate::Result;
use crate::connection::{Diagnostic, Failure, Session, Transport};
use crate::error::Error;
use crate::parser::ConnectionParameters;
use crate::row::Row;

/// Open a connection described by `params`.
pub(crate) fn open(params: &ConnectionParameters) -> Result<Session> {
    let conn = match Conn::new(opts(params)) {
        Ok(conn) => conn,
        Err(e) => return Err(Error::Connection(e.to_string())),
    };
    log::debug!("connected to {}:{} as {:?}", params.host, params.port, params.user);
    Ok(Session::new(Box::new(conn)))
}

pub(crate) fn opts(params: &ConnectionParameters) -> OptsBuilder {
    let opts = OptsBuilder::new()
        .ip_or_hostname(Some(params.host.as_str()))
        .tcp_port(params.port)
        .user(non_empty(&params.user))
        .pass(non_empty(&params.password))
        .db_name(non_empty(&params.database));

    match non_empty(&params.unix_socket) {
        Some(path) => opts.socket(Some(path)),
        None => opts,
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}

/// Server errors keep their code. A broken socket or packet stream is a lost connection.
/// Anything else has no code.
pub(crate) fn diagnostic(e: mysql::Error) -> Diagnostic {
    match e {
        mysql::Error::MySqlError(e) => Diagnostic::new(e.code, e.message),
        e @ mysql::Error::IoError(_)
        | e @ mysql::Error::CodecError(_)
        | e @ mysql::Error::DriverError(DriverError::PacketOutOfSync)
        | e @ mysql::Error::DriverError(DriverError::UnexpectedPacket) => Diagnostic::lost(e.to_string()),
        e => Diagnostic::new(0, e.to_string()),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        other => Some(other.as_sql(true)),
    }
}

fn to_row(row: mysql::Row) -> Row {
    let mut pairs = Row::new();
    for (i, col) in row.columns().iter().enumerate() {
        pairs.insert(col.name_str().to_string(), row.as_ref(i).and_then(text));
    }
    pairs
}

impl Transport for Conn {
    fn execute_inner(&mut self, query: &str) -> std::result::Result<(), Diagnostic> {
        self.query_drop(query).map_err(diagnostic)
    }

    fn run_inner(&mut self, query: &str) -> std::result::Result<(), Failure> {
        let mut result = match self.query_iter(query) {
            Ok(result) => result,
            Err(e) => return Err(Failure::Execute(diagnostic(e))),
        };

        while let Some(result_set) = result.next_set() {
            let result_set = match result_set {
                Ok(result_set) => result_set,
                Err(e) => return Err(Failure::Fetch(diagnostic(e))),
            };
            for row in result_set {
                if let Err(e) = row {
                    return Err(Failure::Fetch(diagnostic(e)));
                }
            }
        }

        Ok(())
    }

    fn rows_inner(&mut self, query: &str, params: &[&str]) -> std::result::Result<Vec<Row>, Diagnostic> {
        let rows: Vec<mysql::Row> = if params.is_empty() {
            self.query(query).map_err(diagnostic)?
        } else {
            let params = Params::Positional(params.iter().map(|&p| Value::from(p)).collect());
            self.exec(query, params).map_err(diagnostic)?
        };
        Ok(rows.into_iter().map(to_row).collect())
    }
}
