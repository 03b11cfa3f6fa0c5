//! Running generated statements and classifying what the server made of them.

use crate::connection::{Diagnostic, Failure, Session};

pub(crate) const CR_SERVER_LOST: u16 = 2013;

/// Diagnostic codes mapped to distinct outcomes.
/// Any code not listed here is a [GenericFailure](./enum.Outcome.html#variant.GenericFailure).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCodes {
    /// `ER_PARSE_ERROR`
    pub syntax:          u16,
    /// `ER_QUERY_TIMEOUT`, the server side `max_execution_time` cap was hit.
    pub timeout:         u16,
    /// `ER_QUERY_INTERRUPTED`, the statement was killed by the harness.
    pub interrupted:     u16,
    /// `CR_SERVER_LOST`
    pub connection_lost: u16,
}

impl Default for ErrorCodes {
    fn default() -> Self {
        Self {
            syntax:          1064,
            timeout:         3024,
            interrupted:     1317,
            connection_lost: CR_SERVER_LOST,
        }
    }
}

/// The result of running one statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    SyntaxError(String),
    Timeout(String),
    /// The statement was cancelled by the harness itself.
    BenignInterruption,
    /// The session has been closed and must not be reused.
    ConnectionLost(String),
    GenericFailure(String),
}

impl Outcome {
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Failures that may point at a defect in the server.
    #[inline]
    pub fn is_reportable(&self) -> bool {
        matches!(self, Outcome::SyntaxError(_) | Outcome::GenericFailure(_))
    }

    /// Failures the harness is expected to skip.
    #[inline]
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Outcome::Timeout(_) | Outcome::BenignInterruption)
    }

    /// The server's message, if the outcome carries one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Success | Outcome::BenignInterruption => None,
            Outcome::SyntaxError(m)
            | Outcome::Timeout(m)
            | Outcome::ConnectionLost(m)
            | Outcome::GenericFailure(m) => Some(m),
        }
    }
}

impl Session {
    /// Run a statement, discard its results and classify the outcome.
    ///
    /// On [ConnectionLost](./enum.Outcome.html#variant.ConnectionLost) the session is closed,
    /// and every later call returns `ConnectionLost` without contacting the server.
    pub fn run(&mut self, stmt: &str) -> Outcome {
        let conn = match self.conn.as_mut() {
            Some(conn) => conn,
            None => return Outcome::ConnectionLost(String::from("session is closed")),
        };

        log::trace!("run: {}", stmt);
        match conn.run_inner(stmt) {
            Ok(()) => Outcome::Success,
            Err(Failure::Fetch(d)) if d.lost => self.lose(d),
            Err(Failure::Fetch(d)) => Outcome::GenericFailure(message(d)),
            Err(Failure::Execute(d)) => self.classify(d),
        }
    }

    fn classify(&mut self, d: Diagnostic) -> Outcome {
        if d.lost {
            return self.lose(d);
        }
        let codes = self.codes;
        match d.code {
            0 => Outcome::GenericFailure(message(d)),
            c if c == codes.syntax => Outcome::SyntaxError(d.message),
            c if c == codes.timeout => Outcome::Timeout(d.message),
            c if c == codes.interrupted => Outcome::BenignInterruption,
            c if c == codes.connection_lost => self.lose(d),
            _ => Outcome::GenericFailure(d.message),
        }
    }

    fn lose(&mut self, d: Diagnostic) -> Outcome {
        log::warn!("connection lost: {}", d.message);
        self.close();
        Outcome::ConnectionLost(message(d))
    }
}

// A failure without a code must still read as one.
fn message(d: Diagnostic) -> String {
    if d.message.is_empty() {
        format!("statement failed (code {})", d.code)
    } else {
        d.message
    }
}

/// Run one generated statement on a test session.
///
/// Equivalent to [Session::run](./struct.Session.html#method.run).
#[inline]
pub fn execute_test_statement(session: &mut Session, stmt: &str) -> Outcome {
    session.run(stmt)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::connection::mock::*;

    fn run_with(reply: Reply) -> (Outcome, Session) {
        let (mut session, _, _) = MockTransport::session(vec![reply]);
        let outcome = session.run("SELECT 1");
        (outcome, session)
    }

    fn execute_error(code: u16, message: &str) -> Reply {
        Reply::Fail(Failure::Execute(Diagnostic::new(code, message)))
    }

    #[test]
    fn success() {
        let (outcome, session) = run_with(Reply::Ok);
        assert_eq!(outcome, Outcome::Success);
        assert!(outcome.is_success());
        assert!(!session.is_closed());
        assert_eq!(run_with(Reply::Rows(vec![row(&["1"])])).0, Outcome::Success);
    }

    #[test]
    fn syntax_error() {
        let msg = "You have an error in your SQL syntax; check the manual near 'SELEC' at line 1";
        let (outcome, _) = run_with(execute_error(1064, msg));
        assert_eq!(outcome, Outcome::SyntaxError(msg.into()));
        assert!(outcome.is_reportable());
        assert_eq!(outcome.message(), Some(msg));
    }

    #[test]
    fn timeout() {
        let msg = "Query execution was interrupted, maximum statement execution time exceeded";
        let (outcome, session) = run_with(execute_error(3024, msg));
        assert_eq!(outcome, Outcome::Timeout(msg.into()));
        assert!(outcome.is_ignorable());
        assert!(!session.is_closed());
    }

    #[test]
    fn interrupted_regardless_of_message() {
        for msg in ["Query execution was interrupted", "", "You have an error in your SQL syntax"] {
            let (outcome, _) = run_with(execute_error(1317, msg));
            assert_eq!(outcome, Outcome::BenignInterruption);
            assert!(outcome.is_ignorable());
            assert_eq!(outcome.message(), None);
        }
    }

    #[test]
    fn classified_by_code_not_message() {
        let (outcome, _) = run_with(execute_error(1146, "You have an error in your SQL syntax"));
        assert_eq!(outcome, Outcome::GenericFailure("You have an error in your SQL syntax".into()));
    }

    #[test]
    fn generic_failure() {
        let (outcome, _) = run_with(execute_error(1054, "Unknown column 'x' in 'field list'"));
        assert_eq!(outcome, Outcome::GenericFailure("Unknown column 'x' in 'field list'".into()));
        assert!(outcome.is_reportable());
        assert!(!outcome.is_ignorable());
    }

    #[test]
    fn failure_without_code() {
        let (outcome, _) = run_with(execute_error(0, ""));
        assert_eq!(outcome, Outcome::GenericFailure("statement failed (code 0)".into()));
        let (outcome, _) = run_with(execute_error(0, "Packets out of order"));
        assert_eq!(outcome, Outcome::GenericFailure("Packets out of order".into()));
    }

    #[test]
    fn fetch_failure() {
        // A fetch error is never classified, even with a known code.
        let reply = Reply::Fail(Failure::Fetch(Diagnostic::new(1064, "syntax")));
        assert_eq!(run_with(reply).0, Outcome::GenericFailure("syntax".into()));
        let reply = Reply::Fail(Failure::Fetch(Diagnostic::new(0, "")));
        assert!(matches!(run_with(reply).0, Outcome::GenericFailure(_)));
    }

    #[test]
    fn connection_lost_closes_session() {
        let (mut session, requests, dropped) = MockTransport::session(vec![
            execute_error(2013, "Lost connection to MySQL server during query"),
        ]);
        let outcome = session.run("SELECT SLEEP(100)");
        assert_eq!(outcome, Outcome::ConnectionLost("Lost connection to MySQL server during query".into()));
        assert!(!outcome.is_reportable());
        assert!(!outcome.is_ignorable());
        assert!(session.is_closed());
        assert_eq!(dropped.load(Ordering::SeqCst), 1);

        // No reply is scripted: reaching the transport would panic.
        assert!(matches!(session.run("SELECT 1"), Outcome::ConnectionLost(_)));
        assert_eq!(requests.lock().unwrap().len(), 1);
        session.close();
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transport_failure_ignores_configured_code() {
        let (mut session, _, dropped) = MockTransport::session(vec![
            Reply::Fail(Failure::Execute(Diagnostic::lost("server disconnected"))),
        ]);
        session.error_codes(ErrorCodes { connection_lost: 2006, ..ErrorCodes::default() });
        assert_eq!(session.run("SELECT 1"), Outcome::ConnectionLost("server disconnected".into()));
        assert!(session.is_closed());
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transport_failure_while_fetching() {
        let (outcome, session) = run_with(Reply::Fail(Failure::Fetch(Diagnostic::lost("Packet out of sync"))));
        assert_eq!(outcome, Outcome::ConnectionLost("Packet out of sync".into()));
        assert!(session.is_closed());
    }

    #[test]
    fn remapped_connection_lost_code() {
        let (mut session, _, _) = MockTransport::session(vec![
            execute_error(2013, "Lost connection to MySQL server during query"),
            execute_error(2006, "MySQL server has gone away"),
        ]);
        session.error_codes(ErrorCodes { connection_lost: 2006, ..ErrorCodes::default() });
        assert!(matches!(session.run("SELECT 1"), Outcome::GenericFailure(_)));
        assert!(!session.is_closed());
        assert_eq!(session.run("SELECT 1"), Outcome::ConnectionLost("MySQL server has gone away".into()));
        assert!(session.is_closed());
    }

    #[test]
    fn custom_codes() {
        let (mut session, _, _) = MockTransport::session(vec![
            execute_error(1969, "Query execution was interrupted (max_statement_time exceeded)"),
            execute_error(3024, "timeout?"),
        ]);
        session.error_codes(ErrorCodes { timeout: 1969, ..ErrorCodes::default() });
        assert!(matches!(session.run("SELECT 1"), Outcome::Timeout(_)));
        assert!(matches!(session.run("SELECT 1"), Outcome::GenericFailure(_)));
    }

    #[test]
    fn execute_test_statement() {
        let (mut session, requests, _) = MockTransport::session(vec![Reply::Ok]);
        assert_eq!(super::execute_test_statement(&mut session, "DELETE FROM t"), Outcome::Success);
        assert_eq!(requests.lock().unwrap()[0].0, "DELETE FROM t");
    }
}
