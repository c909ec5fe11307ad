//! Nickname/channel grammar checks and ban-mask glob matching.

use regex::Regex;

/// First-character class for a nickname: letters plus the RFC 1459 special set.
fn is_nick_head(c: char) -> bool {
    c.is_ascii_alphabetic() || "[\\]^_`{|}".contains(c)
}

/// Remaining-character class for a nickname: head class plus digits and `-`.
fn is_nick_tail(c: char) -> bool {
    is_nick_head(c) || c.is_ascii_digit() || c == '-'
}

/// `valid_nick`: first char in the nick head class; remainder in the tail
/// class; length 1–30.
pub fn valid_nick(nick: &str) -> bool {
    if nick.is_empty() || nick.chars().count() > 30 {
        return false;
    }
    let mut chars = nick.chars();
    let Some(head) = chars.next() else {
        return false;
    };
    is_nick_head(head) && chars.all(is_nick_tail)
}

/// `valid_channel`: first char one of `#&!+`; length 2–50; body excludes
/// NUL, BELL, LF, CR, space, and comma.
pub fn valid_channel(name: &str) -> bool {
    let len = name.chars().count();
    if !(2..=50).contains(&len) {
        return false;
    }
    let mut chars = name.chars();
    let Some(head) = chars.next() else {
        return false;
    };
    if !matches!(head, '#' | '&' | '!' | '+') {
        return false;
    }
    chars.all(|c| !matches!(c, '\0' | '\x07' | '\n' | '\r' | ' ' | ','))
}

/// Translate a ban glob (`*` and `?` wildcards, no escape syntax) to an
/// anchored, case-insensitive regex matching a full `nick!user@host` mask.
pub fn glob_to_regex(mask: &str) -> Option<Regex> {
    let mut pattern = String::with_capacity(mask.len() * 2 + 8);
    pattern.push_str("(?i)^");
    for c in mask.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push(c),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}

/// Check whether `candidate` (a `nick!user@host` mask) matches any ban in
/// `bans` (glob patterns, matched case-insensitively).
pub fn is_banned(bans: &[String], candidate: &str) -> bool {
    bans.iter()
        .any(|mask| glob_to_regex(mask).is_some_and(|re| re.is_match(candidate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nick_accepts_rfc1459_special_chars() {
        assert!(valid_nick("[alice]"));
        assert!(valid_nick("^_`{|}"));
        assert!(valid_nick("a-1-2-3"));
    }

    #[test]
    fn nick_rejects_leading_digit() {
        assert!(!valid_nick("1alice"));
    }

    #[test]
    fn nick_rejects_too_long() {
        assert!(!valid_nick(&"a".repeat(31)));
        assert!(valid_nick(&"a".repeat(30)));
    }

    #[test]
    fn nick_rejects_empty() {
        assert!(!valid_nick(""));
    }

    #[test]
    fn channel_accepts_each_sigil() {
        for sigil in ['#', '&', '!', '+'] {
            assert!(valid_channel(&format!("{sigil}chan")));
        }
    }

    #[test]
    fn channel_rejects_bad_chars() {
        assert!(!valid_channel("#has space"));
        assert!(!valid_channel("#has,comma"));
        assert!(!valid_channel("#"));
    }

    #[test]
    fn ban_glob_matches() {
        let bans = vec!["*!*@evil.example".to_string()];
        assert!(is_banned(&bans, "troll!user@evil.example"));
        assert!(!is_banned(&bans, "troll!user@good.example"));
    }

    #[test]
    fn ban_glob_is_case_insensitive() {
        let bans = vec!["*!*@Evil.Example".to_string()];
        assert!(is_banned(&bans, "troll!user@evil.example"));
    }

    #[test]
    fn ban_glob_question_mark_matches_one_char() {
        let bans = vec!["bad?!*@*".to_string()];
        assert!(is_banned(&bans, "bad1!user@host"));
        assert!(!is_banned(&bans, "bad!user@host"));
    }
}
