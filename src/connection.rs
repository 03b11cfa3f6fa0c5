use std::fmt;

use crate::dut::{ErrorCodes, CR_SERVER_LOST};
use crate::error::Error;
use crate::row::Row;
use crate::Result;

/// A diagnostic reported for a failed request: a numeric code and the native message.
///
/// Code `0` means no code was reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Diagnostic {
    pub(crate) code:    u16,
    pub(crate) message: String,
    /// The client lost the connection itself, whatever code the server would use.
    pub(crate) lost:    bool,
}

impl Diagnostic {
    pub(crate) fn new<T: Into<String>>(code: u16, message: T) -> Self {
        Self { code, message: message.into(), lost: false }
    }

    /// A transport failure: broken socket or a packet stream out of sync.
    pub(crate) fn lost<T: Into<String>>(message: T) -> Self {
        Self { code: CR_SERVER_LOST, message: message.into(), lost: true }
    }
}

/// Which step of a statement round trip failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Failure {
    /// The server rejected the statement.
    Execute(Diagnostic),
    /// The statement was accepted but reading its results failed.
    Fetch(Diagnostic),
}

/// Request/response primitives a database client must provide.
pub(crate) trait Transport: Send {
    /// Execute a statement and drop any result.
    fn execute_inner(&mut self, query: &str) -> std::result::Result<(), Diagnostic>;
    /// Execute a statement and drain every result set.
    fn run_inner(&mut self, query: &str) -> std::result::Result<(), Failure>;
    /// Execute a read query, binding `params` positionally, and return its rows.
    fn rows_inner(&mut self, query: &str, params: &[&str]) -> std::result::Result<Vec<Row>, Diagnostic>;
}

/// An open session to one database server.
///
/// The session owns the connection exclusively. It is closed at most once:
/// by [close](#method.close), by a lost connection, or when dropped.
pub struct Session {
    pub(crate) conn:  Option<Box<dyn Transport>>,
    pub(crate) codes: ErrorCodes,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("closed", &self.is_closed())
            .field("codes", &self.codes)
            .finish()
    }
}

impl Session {
    pub(crate) fn new(conn: Box<dyn Transport>) -> Self {
        Self {
            conn:  Some(conn),
            codes: ErrorCodes::default(),
        }
    }

    /// Execute a statement without processing the resulting rows if any.
    ///
    /// Any non-success server response is returned as [Error::Execution](./enum.Error.html#variant.Execution)
    /// carrying the server's message.
    pub fn execute_discard(&mut self, query: &str) -> Result<()> {
        log::trace!("execute: {}", query);
        let conn = self.conn.as_mut().ok_or(Error::SessionClosed)?;
        let result = conn.execute_inner(query);
        result.map_err(|d| self.fail(d))
    }

    pub(crate) fn rows(&mut self, query: &str, params: &[&str]) -> Result<Vec<Row>> {
        log::trace!("query: {} {:?}", query, params);
        let conn = self.conn.as_mut().ok_or(Error::SessionClosed)?;
        let result = conn.rows_inner(query, params);
        result.map_err(|d| self.fail(d))
    }

    // A connection that is gone is not reused.
    fn fail(&mut self, d: Diagnostic) -> Error {
        if d.lost {
            log::warn!("connection lost: {}", d.message);
            self.close();
        }
        Error::Execution(d.message)
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            log::debug!("session closed");
        }
    }

    /// Whether the session has been closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Sets the diagnostic codes used to classify failed statements.
    /// The default is [ErrorCodes::default()](./struct.ErrorCodes.html) (MySQL codes).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use mysql_dut::ErrorCodes;
    /// # let mut session = mysql_dut::open_test_session("user=root database=test").unwrap();
    /// // MariaDB reports statement timeouts as ER_STATEMENT_TIMEOUT
    /// session.error_codes(ErrorCodes { timeout: 1969, ..ErrorCodes::default() });
    /// ```
    pub fn error_codes(&mut self, codes: ErrorCodes) {
        self.codes = codes;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
