//! Transaction line grammar.
//!
//! A history line is a transaction when the whole line reads
//!
//! ```text
//! <source> - git-coin: <Action> <amount> coins to <target>
//! ```
//!
//! - Literal connectives and the action keyword are matched ignoring ASCII case
//! - `<Action>` is `Giving` or `Donating`
//! - `<amount>` is `digits [. digits] [e|E [+|-] digits]`, ASCII digits only
//! - `<source>` is the shortest non-empty prefix that lets the rest match
//! - `<target>` is the non-empty remainder of the line
//!
//! Lines that do not fit are skipped. A grammatical amount that does not fit
//! in a finite `f64` is a [`LedgerError::MalformedAmount`].

use tracing::trace;

use crate::error::{HistoryError, LedgerError, Result};
use crate::identity::normalize;
use crate::transaction::{Action, Transaction};

const SOURCE_SEPARATOR: &str = " - git-coin: ";
const TARGET_SEPARATOR: &str = " coins to ";

struct Body<'a> {
    action: Action,
    amount: &'a str,
    target: &'a str,
}

/// Match one history line against the transaction grammar.
///
/// Returns `Ok(None)` for lines that are not transactions.
///
/// ```
/// use coin_ledger::{match_line, normalize, Action};
///
/// let tx = match_line("Alice <a@x.com> - git-coin: Giving 5 coins to Bob <b@x.com>")
///     .unwrap()
///     .unwrap();
/// assert_eq!(tx.action(), Action::Transfer);
/// assert_eq!(tx.target(), &normalize("Bob <b@x.com>"));
///
/// assert!(match_line("Alice <a@x.com> - fix typo").unwrap().is_none());
/// ```
pub fn match_line(line: &str) -> Result<Option<Transaction>> {
    // ASCII lowercasing keeps byte offsets identical to `line`.
    let folded = line.to_ascii_lowercase();
    let mut from = 0;

    while let Some(offset) = folded[from..].find(SOURCE_SEPARATOR) {
        let at = from + offset;
        if at > 0 {
            if let Some(body) = parse_body(&line[at + SOURCE_SEPARATOR.len()..]) {
                return build(line, &line[..at], body).map(Some);
            }
        }
        from = at + 1;
    }

    trace!("skipping non-transaction line: {line}");
    Ok(None)
}

fn parse_body(rest: &str) -> Option<Body<'_>> {
    let (word, rest) = rest.split_once(' ')?;
    let action = Action::from_keyword(word)?;
    let (amount, rest) = rest.split_at(amount_len(rest)?);
    let target = strip_prefix_ignore_case(rest, TARGET_SEPARATOR)?;
    if target.is_empty() {
        return None;
    }
    Some(Body {
        action,
        amount,
        target,
    })
}

/// Byte length of the numeric literal at the start of `s`, if any.
fn amount_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let digits = |from: usize| {
        bytes[from.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = digits(0);
    if end == 0 {
        return None;
    }

    if bytes.get(end) == Some(&b'.') {
        let fraction = digits(end + 1);
        if fraction > 0 {
            end += 1 + fraction;
        }
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    Some(end)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn build(line: &str, source: &str, body: Body<'_>) -> Result<Transaction> {
    let amount = body
        .amount
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| LedgerError::MalformedAmount {
            amount: body.amount.to_string(),
            line: line.to_string(),
        })?;

    Ok(Transaction::new(
        normalize(source),
        body.action,
        amount,
        normalize(body.target),
    ))
}

/// Lazily match a stream of history lines, skipping non-transactions.
///
/// Each line is read once. Errors from the underlying stream and malformed
/// amounts are yielded in place; callers stop at the first one.
pub struct Transactions<I> {
    lines: I,
}

/// Adapt a fallible line stream into a stream of transactions.
pub fn transactions<I>(lines: I) -> Transactions<I::IntoIter>
where
    I: IntoIterator<Item = std::result::Result<String, HistoryError>>,
{
    Transactions {
        lines: lines.into_iter(),
    }
}

impl<I> Iterator for Transactions<I>
where
    I: Iterator<Item = std::result::Result<String, HistoryError>>,
{
    type Item = Result<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            match match_line(&line) {
                Ok(Some(tx)) => return Some(Ok(tx)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
