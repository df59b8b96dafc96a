//! Line-oriented prompting over any reader/writer pair.

use std::io::{self, BufRead, Write};

/// Tokens accepted by [`Prompt::confirm`]
const CONFIRM_TOKENS: [&str; 2] = ["y", "yes"];

pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `label` and read one trimmed line. `None` once input is exhausted.
    pub fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Like [`Prompt::read_line`], but running out of input is an error.
    pub fn ask(&mut self, label: &str) -> io::Result<String> {
        self.read_line(label)?.ok_or_else(input_closed)
    }

    pub fn confirm(&mut self, label: &str) -> io::Result<bool> {
        let answer = self.ask(label)?.to_lowercase();
        Ok(CONFIRM_TOKENS.contains(&answer.as_str()))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

fn input_closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")
}

/// True when `err` came from running out of input mid-prompt
pub fn is_input_closed(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::UnexpectedEof)
}

/// Parse a single game id.
pub fn parse_id(raw: &str) -> anyhow::Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("'{}' is not a valid game ID", raw.trim()))
}

/// Parse a comma-separated list of game ids, e.g. `3, 5,8`.
pub fn parse_ids(raw: &str) -> anyhow::Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_read_line_trims_and_echoes_label() {
        let mut p = prompt("  hello  \n");
        assert_eq!(p.read_line("Say: ").unwrap(), Some("hello".to_string()));
        assert_eq!(p.read_line("Again: ").unwrap(), None);
        assert_eq!(String::from_utf8(p.into_output()).unwrap(), "Say: Again: ");
    }

    #[test]
    fn test_ask_on_closed_input() {
        let mut p = prompt("");
        let err = anyhow::Error::from(p.ask("? ").unwrap_err());
        assert!(is_input_closed(&err));
        assert!(!is_input_closed(&anyhow::anyhow!("other")));
    }

    #[test]
    fn test_confirm() {
        let mut p = prompt("YES\ny\nn\nsure\n");
        assert!(p.confirm("? ").unwrap());
        assert!(p.confirm("? ").unwrap());
        assert!(!p.confirm("? ").unwrap());
        assert!(!p.confirm("? ").unwrap());
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_ids("3, 5,8").unwrap(), vec![3, 5, 8]);
        assert_eq!(parse_ids("4,").unwrap(), vec![4]);
        assert!(parse_ids("").unwrap().is_empty());
        assert!(parse_ids("3, five").is_err());
        assert!(parse_id("x").is_err());
    }
}
