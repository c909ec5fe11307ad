//! Raw-line tokenization.
//!
//! The wire grammar this server accepts is intentionally small: an optional
//! leading `:<prefix>` (stripped and discarded — this server does not trust
//! client-supplied origins), a command token, and whitespace-separated
//! parameters with one RFC 1459 trailing parameter introduced by ` :`.

/// A tokenized IRC line: an uppercased command and its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub command: String,
    pub params: Vec<String>,
}

/// Tokenize one logical IRC line.
///
/// Returns `None` for an empty line (a no-op per the wire protocol) or a line
/// that, after stripping an optional `:prefix`, contains nothing but
/// whitespace.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return None;
    }

    // Strip and discard a client-supplied `:<prefix> ` — never trusted.
    let line = if let Some(rest) = line.strip_prefix(':') {
        rest.splitn(2, ' ').nth(1).unwrap_or("")
    } else {
        line
    };

    let mut tokens: Vec<String> = if let Some(idx) = line.find(" :") {
        let (head, trailing) = line.split_at(idx);
        let trailing = &trailing[2..];
        let mut tokens: Vec<String> = head.split_whitespace().map(str::to_owned).collect();
        tokens.push(trailing.to_owned());
        tokens
    } else {
        line.split_whitespace().map(str::to_owned).collect()
    };

    if tokens.is_empty() {
        return None;
    }

    let command = tokens.remove(0).to_ascii_uppercase();
    Some(ParsedLine {
        command,
        params: tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_is_noop() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("\r\n"), None);
    }

    #[test]
    fn simple_command_no_trailing() {
        let p = parse_line("NICK alice").unwrap();
        assert_eq!(p.command, "NICK");
        assert_eq!(p.params, vec!["alice"]);
    }

    #[test]
    fn lowercase_command_is_uppercased() {
        let p = parse_line("nick alice").unwrap();
        assert_eq!(p.command, "NICK");
    }

    #[test]
    fn trailing_parameter_preserves_spaces() {
        let p = parse_line("PRIVMSG #chan :hello there, friend").unwrap();
        assert_eq!(p.command, "PRIVMSG");
        assert_eq!(p.params, vec!["#chan", "hello there, friend"]);
    }

    #[test]
    fn trailing_parameter_can_be_empty() {
        let p = parse_line("TOPIC #chan :").unwrap();
        assert_eq!(p.params, vec!["#chan", ""]);
    }

    #[test]
    fn strips_leading_prefix() {
        let p = parse_line(":nick!user@host PRIVMSG #chan :hi").unwrap();
        assert_eq!(p.command, "PRIVMSG");
        assert_eq!(p.params, vec!["#chan", "hi"]);
    }

    #[test]
    fn prefix_only_is_noop() {
        assert_eq!(parse_line(":nick!user@host"), None);
    }

    #[test]
    fn trailing_rule_triggers_only_on_space_colon() {
        // A colon not preceded by a space is not a trailing marker.
        let p = parse_line("PRIVMSG #chan :no:colon:here").unwrap();
        assert_eq!(p.params, vec!["#chan", "no:colon:here"]);
    }

    #[test]
    fn strips_trailing_cr() {
        let p = parse_line("PING :token\r").unwrap();
        assert_eq!(p.params, vec!["token"]);
    }
}
