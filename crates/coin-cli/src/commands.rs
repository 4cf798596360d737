use std::io::{self, Write};

use coin_git::GitRepository;
use coin_ledger::{CommitWriter, Exchange, ExchangeError, HistoryReader};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::config::CoinConfig;
use crate::output;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CoinConfig::discover(cli.config.as_deref(), &cli.dir)?;
    debug!(?config, dir = %cli.dir.display(), "configuration loaded");

    let repo = GitRepository::open(&cli.dir).with_binary(&config.git_binary);
    let exchange = Exchange::new(&repo, &repo);
    let stdout = io::stdout();
    execute(cli.command, &cli.format, &config, &exchange, &mut stdout.lock())
}

pub fn execute<H, W>(
    command: Command,
    format: &OutputFormat,
    config: &CoinConfig,
    exchange: &Exchange<H, W>,
    out: &mut dyn Write,
) -> anyhow::Result<()>
where
    H: HistoryReader,
    W: CommitWriter,
{
    match command {
        Command::Give(args) => {
            let force = args.force || config.allow_overdraft;
            let message = exchange.give(&args.user, args.coins, force)?;
            committed(format, &[message], out)
        }
        Command::Take(args) => {
            debug!(user = %args.user, coins = args.coins, "take requested");
            match exchange.take(args.force) {
                Err(refusal @ (ExchangeError::TakeRefused | ExchangeError::ForcedTakeRefused)) => {
                    refused(format, &refusal, out)
                }
                other => Ok(other?),
            }
        }
        Command::Donate(args) => {
            let message = exchange.donate(&args.user, args.coins)?;
            committed(format, &[message], out)
        }
        Command::Seed(args) => {
            let messages = exchange.seed(args.coins)?;
            committed(format, &messages, out)
        }
        Command::List(_) => cmd_list(format, config, exchange, out),
        Command::Info(_) => cmd_info(format, exchange, out),
    }
}

fn committed(format: &OutputFormat, messages: &[String], out: &mut dyn Write) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", json!({ "committed": messages }))?,
        OutputFormat::Text => {
            for message in messages {
                writeln!(out, "{} {}", "✓".green().bold(), message)?;
            }
        }
    }
    Ok(())
}

/// Report a refusal as ordinary output.
fn refused(format: &OutputFormat, refusal: &ExchangeError, out: &mut dyn Write) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", json!({ "refused": refusal.to_string() }))?,
        OutputFormat::Text => writeln!(out, "{}", refusal.to_string().yellow())?,
    }
    Ok(())
}

fn cmd_list<H: HistoryReader, W: CommitWriter>(
    format: &OutputFormat,
    config: &CoinConfig,
    exchange: &Exchange<H, W>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let entries = exchange.ledger().list_all()?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?,
        OutputFormat::Text => write!(
            out,
            "{}",
            output::balance_table(&entries, config.table_padding, config.table_fill)
        )?,
    }
    Ok(())
}

fn cmd_info<H: HistoryReader, W: CommitWriter>(
    format: &OutputFormat,
    exchange: &Exchange<H, W>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let info = exchange.info()?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?,
        OutputFormat::Text => writeln!(
            out,
            "You are {} and you have {} coins.",
            info.identity.as_str().bold(),
            output::coins(info.coins)
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_ledger::InMemoryHistory;

    fn history() -> InMemoryHistory {
        let history = InMemoryHistory::with_user("Alice", "a@x.com");
        history.record("Bob <b@x.com>", "initial commit").unwrap();
        history.record("Alice <a@x.com>", "add readme").unwrap();
        history
    }

    fn run(history: &InMemoryHistory, config: &CoinConfig, argv: &[&str]) -> anyhow::Result<String> {
        colored::control::set_override(false);
        let mut full = vec!["git-coin"];
        full.extend_from_slice(argv);
        let cli = <Cli as clap::Parser>::try_parse_from(full)?;
        let exchange = Exchange::new(history, history);
        let mut out = Vec::new();
        execute(cli.command, &cli.format, config, &exchange, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn donate_then_list() {
        let history = history();
        let config = CoinConfig::default();
        let out = run(&history, &config, &["donate", "bob", "10"]).unwrap();
        assert_eq!(out, "✓ git-coin: Donating 10 coins to Bob <b@x.com>\n");

        let out = run(&history, &config, &["list"]).unwrap();
        // The donor took part too, with an unchanged balance.
        assert_eq!(out, "Alice <a@x.com>....0\nBob <b@x.com>......10\n");
    }

    #[test]
    fn give_without_funds_fails() {
        let history = history();
        let err = run(&history, &CoinConfig::default(), &["give", "bob", "1"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExchangeError>(),
            Some(ExchangeError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn allow_overdraft_acts_as_force() {
        let history = history();
        let config = CoinConfig {
            allow_overdraft: true,
            ..CoinConfig::default()
        };
        run(&history, &config, &["give", "bob", "3"]).unwrap();
        let out = run(&history, &config, &["info"]).unwrap();
        assert_eq!(out, "You are Alice <a@x.com> and you have -3 coins.\n");
    }

    #[test]
    fn take_prints_refusal_and_succeeds() {
        let history = history();
        let config = CoinConfig::default();
        let out = run(&history, &config, &["take", "bob", "1"]).unwrap();
        assert_eq!(out, "you can't take coins from somebody else\n");

        let out = run(&history, &config, &["take", "bob", "1", "-f"]).unwrap();
        assert_eq!(out, "seriously, you can't take coins from somebody else. stop trying\n");
        assert_eq!(history.commits().unwrap().len(), 2);
    }

    #[test]
    fn take_refusal_json() {
        let history = history();
        let out = run(&history, &CoinConfig::default(), &["--format", "json", "take", "bob", "1"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["refused"], "you can't take coins from somebody else");
    }

    #[test]
    fn take_on_dirty_tree_fails() {
        let history = history();
        history.set_dirty(true);
        let err = run(&history, &CoinConfig::default(), &["take", "bob", "1"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExchangeError>(),
            Some(ExchangeError::DirtyWorkingTree)
        ));
    }

    #[test]
    fn seed_json_output() {
        let history = history();
        let out = run(&history, &CoinConfig::default(), &["--format", "json", "seed", "5"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value["committed"],
            json!([
                "git-coin: Donating 5 coins to Alice <a@x.com>",
                "git-coin: Donating 5 coins to Bob <b@x.com>",
            ])
        );
    }

    #[test]
    fn list_json_output() {
        let history = history();
        let config = CoinConfig::default();
        run(&history, &config, &["seed", "2"]).unwrap();
        let out = run(&history, &config, &["list", "--format", "json"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            value,
            json!([
                { "identity": "Alice <a@x.com>", "coins": 2.0 },
                { "identity": "Bob <b@x.com>", "coins": 2.0 },
            ])
        );
    }

    #[test]
    fn dirty_tree_blocks_writes() {
        let history = history();
        history.set_dirty(true);
        let err = run(&history, &CoinConfig::default(), &["donate", "bob", "1"]).unwrap_err();
        assert!(err.to_string().contains("stash or commit"));
    }
}
