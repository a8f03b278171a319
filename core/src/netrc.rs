//! Minimal netrc lookup for automatic HTTP Basic credentials.
//!
//! Understands the `machine`, `default`, `login` and `password` tokens.
//! `account` and `port` are skipped; parsing stops at the first `macdef`
//! since macro bodies run to the end of their paragraph and carry no
//! credentials we care about.

use std::fs;
use std::path::Path;

/// Login/password pair found for a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub login: String,
    pub password: String,
}

/// Look up credentials for `host` in the netrc file at `path`.
///
/// An entry for the exact machine name wins; otherwise a `default` entry
/// applies. Returns `None` when the file is missing or has no match.
pub(crate) fn lookup(path: &Path, host: &str) -> Option<Credentials> {
    let text = fs::read_to_string(path).ok()?;
    parse(&text, host)
}

fn parse(text: &str, host: &str) -> Option<Credentials> {
    // (machine, login, password); machine None marks a `default` entry.
    let mut entries: Vec<(Option<String>, String, String)> = Vec::new();
    let mut current: Option<(Option<String>, String, String)> = None;

    let mut tokens = text.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                let name = tokens.next()?.to_string();
                current = Some((Some(name), String::new(), String::new()));
            }
            "default" => {
                if let Some(entry) = current.take() {
                    entries.push(entry);
                }
                current = Some((None, String::new(), String::new()));
            }
            "login" => {
                if let (Some(entry), Some(value)) = (current.as_mut(), tokens.next()) {
                    entry.1 = value.to_string();
                }
            }
            "password" => {
                if let (Some(entry), Some(value)) = (current.as_mut(), tokens.next()) {
                    entry.2 = value.to_string();
                }
            }
            "account" | "port" => {
                tokens.next();
            }
            "macdef" => break,
            _ => {}
        }
    }
    if let Some(entry) = current.take() {
        entries.push(entry);
    }

    let found = entries
        .iter()
        .find(|(machine, _, _)| machine.as_deref() == Some(host))
        .or_else(|| entries.iter().find(|(machine, _, _)| machine.is_none()))?;

    if found.1.is_empty() {
        return None;
    }
    Some(Credentials {
        login: found.1.clone(),
        password: found.2.clone(),
    })
}
