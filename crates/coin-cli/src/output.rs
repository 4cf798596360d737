use coin_ledger::AccountBalance;
use colored::{ColoredString, Colorize};

pub fn coins(amount: f64) -> ColoredString {
    let text = amount.to_string();
    if amount < 0.0 {
        text.red()
    } else {
        text.green()
    }
}

/// Two-column table: each name is filled out to the widest name plus
/// `padding`, then the balance follows.
pub fn balance_table(entries: &[AccountBalance], padding: usize, fill: char) -> String {
    let width = entries
        .iter()
        .map(|entry| entry.identity.as_str().chars().count())
        .max()
        .unwrap_or(0)
        + padding;

    let mut table = String::new();
    for entry in entries {
        let name = entry.identity.as_str();
        table.push_str(name);
        table.extend(std::iter::repeat(fill).take(width - name.chars().count()));
        table.push_str(&coins(entry.coins).to_string());
        table.push('\n');
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_ledger::Identity;

    fn entry(identity: &str, coins: f64) -> AccountBalance {
        AccountBalance {
            identity: Identity::new(identity),
            coins,
        }
    }

    #[test]
    fn pads_to_widest_name() {
        colored::control::set_override(false);
        let table = balance_table(
            &[entry("Alice <a@x.com>", -5.0), entry("Bo <b@x.com>", 5.5)],
            4,
            '.',
        );
        assert_eq!(table, "Alice <a@x.com>....-5\nBo <b@x.com>.......5.5\n");
    }

    #[test]
    fn custom_fill_and_padding() {
        colored::control::set_override(false);
        let table = balance_table(&[entry("Zoë <z@x.com>", 1.0)], 1, ' ');
        assert_eq!(table, "Zoë <z@x.com> 1\n");
    }

    #[test]
    fn empty_table() {
        assert_eq!(balance_table(&[], 4, '.'), "");
    }
}
