use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "git-coin",
    about = "Turn your git repo into a transaction ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Read settings from this TOML file instead of `.git-coin.toml`
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', global = true, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Give coins to another user
    Give(GiveArgs),
    /// Take coins from another user
    Take(TakeArgs),
    /// Add to a user's coins without costing anything
    Donate(DonateArgs),
    /// Donate a number of starting coins to every user in the commit history
    Seed(SeedArgs),
    /// List all users and how many coins they have
    List(ListArgs),
    /// Tell me how many coins I have
    Info(InfoArgs),
}

#[derive(Args)]
pub struct GiveArgs {
    /// The user to give coins to
    pub user: String,
    /// The number of coins to give
    pub coins: f64,
    /// Give even if it takes your balance negative
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct TakeArgs {
    /// The user to take coins from
    pub user: String,
    /// The number of coins to take
    pub coins: f64,
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct DonateArgs {
    /// The user to donate coins to
    pub user: String,
    /// The number of coins to donate
    pub coins: f64,
}

#[derive(Args)]
pub struct SeedArgs {
    /// The number of coins to donate to each user
    pub coins: f64,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct InfoArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_give() {
        let cli = Cli::try_parse_from(["git-coin", "give", "bob", "5"]).unwrap();
        if let Command::Give(args) = cli.command {
            assert_eq!(args.user, "bob");
            assert_eq!(args.coins, 5.0);
            assert!(!args.force);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_give_force() {
        let cli = Cli::try_parse_from(["git-coin", "give", "-f", "bob", "2.5"]).unwrap();
        if let Command::Give(args) = cli.command {
            assert!(args.force);
            assert_eq!(args.coins, 2.5);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_take_force() {
        let cli = Cli::try_parse_from(["git-coin", "take", "bob", "1", "--force"]).unwrap();
        if let Command::Take(args) = cli.command {
            assert!(args.force);
            assert_eq!(args.user, "bob");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_donate() {
        let cli = Cli::try_parse_from(["git-coin", "donate", "Bob <b@x.com>", "1e2"]).unwrap();
        if let Command::Donate(args) = cli.command {
            assert_eq!(args.user, "Bob <b@x.com>");
            assert_eq!(args.coins, 100.0);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_seed() {
        let cli = Cli::try_parse_from(["git-coin", "seed", "100"]).unwrap();
        if let Command::Seed(args) = cli.command {
            assert_eq!(args.coins, 100.0);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list_and_info() {
        let cli = Cli::try_parse_from(["git-coin", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List(_)));
        let cli = Cli::try_parse_from(["git-coin", "info"]).unwrap();
        assert!(matches!(cli.command, Command::Info(_)));
    }

    #[test]
    fn give_requires_amount() {
        assert!(Cli::try_parse_from(["git-coin", "give", "bob"]).is_err());
        assert!(Cli::try_parse_from(["git-coin", "give", "bob", "lots"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["git-coin", "--verbose", "list"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["git-coin", "--format", "json", "info"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_global_paths() {
        let cli = Cli::try_parse_from([
            "git-coin", "list", "-C", "/tmp/repo", "--config", "coin.toml",
        ])
        .unwrap();
        assert_eq!(cli.dir, PathBuf::from("/tmp/repo"));
        assert_eq!(cli.config, Some(PathBuf::from("coin.toml")));
    }

    #[test]
    fn default_dir_is_current() {
        let cli = Cli::try_parse_from(["git-coin", "info"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(cli.config.is_none());
    }
}
