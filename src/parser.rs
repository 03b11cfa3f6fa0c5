use crate::error::ParseError;

/// Connection parameters of a MySQL server.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionParameters {
    pub host:        String,
    pub port:        u16,
    pub user:        String,
    pub password:    String,
    pub database:    String,
    pub unix_socket: String,
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self {
            host:        String::from("127.0.0.1"),
            port:        3306,
            user:        String::new(),
            password:    String::new(),
            database:    String::new(),
            unix_socket: String::new(),
        }
    }
}

/// Parse a connection string into [ConnectionParameters](./struct.ConnectionParameters.html).
///
/// The string is a whitespace separated list of `name=value` assignments.
/// Recognized names are `host`, `port`, `user`, `password`, `database` and `unix_socket`.
/// A value is either unquoted, ending at the next unescaped whitespace, or enclosed in
/// single quotes. In both forms a backslash takes the following character literally.
/// When a name is repeated the last assignment wins.
///
/// # Examples
///
/// ```
/// let params = mysql_dut::parse_connection_string("host=db port=3307 user='my user'").unwrap();
/// assert_eq!(params.host, "db");
/// assert_eq!(params.port, 3307);
/// assert_eq!(params.user, "my user");
/// assert_eq!(params.database, "");
/// ```
pub fn parse_connection_string(input: &str) -> Result<ConnectionParameters, ParseError> {
    let mut params = ConnectionParameters::default();
    let mut port = String::from("3306");
    let mut parser = Parser::new(input);

    loop {
        parser.skip_whitespace();
        if parser.eof() {
            break;
        }

        let name = parser.consume_while(|c| c != '=' && !c.is_whitespace());
        if parser.next_char() != Some('=') {
            return Err(ParseError::MissingAssignment(name));
        }
        parser.consume_char();

        let value = if parser.next_char() == Some('\'') {
            parser.consume_char();
            parser.consume_quoted()?
        } else {
            parser.consume_unquoted()
        };

        match name.as_str() {
            "host"        => params.host = value,
            "port"        => port = value,
            "user"        => params.user = value,
            "password"    => params.password = value,
            "database"    => params.database = value,
            "unix_socket" => params.unix_socket = value,
            _ => return Err(ParseError::UnknownConnectionOption(name)),
        }
    }

    params.port = match port.parse() {
        Ok(n) if n != 0 && port.bytes().all(|b| b.is_ascii_digit()) => n,
        _ => return Err(ParseError::InvalidPort(port)),
    };
    Ok(params)
}

struct Parser<'a> {
    input: &'a str,
    pos:   usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn eof(&self) -> bool {
        self.input.len() <= self.pos
    }

    fn next_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.next_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        self.consume_while(char::is_whitespace);
    }

    fn consume_while<F>(&mut self, f: F) -> String
        where
            F: Fn(char) -> bool,
    {
        let mut s = String::new();
        while let Some(c) = self.next_char() {
            if !f(c) {
                break;
            }
            s.push(c);
            self.pos += c.len_utf8();
        }
        s
    }

    // A trailing lone backslash is dropped.
    fn consume_unquoted(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.next_char() {
            if c.is_whitespace() {
                break;
            }
            self.consume_char();
            if c == '\\' {
                if let Some(escaped) = self.consume_char() {
                    s.push(escaped);
                }
            } else {
                s.push(c);
            }
        }
        s
    }

    // Called after the opening quote has been consumed.
    fn consume_quoted(&mut self) -> Result<String, ParseError> {
        let mut s = String::new();
        while let Some(c) = self.consume_char() {
            match c {
                '\'' => return Ok(s),
                '\\' => match self.consume_char() {
                    Some(escaped) => s.push(escaped),
                    None => break,
                },
                c => s.push(c),
            }
        }
        Err(ParseError::UnterminatedQuotedValue)
    }
}
