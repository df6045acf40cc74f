// Line commands read from the terminal.

use thiserror::Error;

use pitchside_core::market::{SortMetric, TrendMetric};
use pitchside_core::Position;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{command}` (try `help`)")]
    Unknown { command: String },

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid {argument}: `{value}`")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Add(u32),
    Remove(u32),
    Save,
    Substitute(u32, u32),
    Transfer { outgoing: u32, incoming: u32 },
    Captain(u32),
    ViceCaptain(u32),
    Import { team_id: u64, gameweek: Option<u32> },
    Team(u64),
    Reset,
    Show,
    Market {
        position: Option<Position>,
        sort: SortMetric,
        search: String,
    },
    Targets(u32),
    Trends(TrendMetric),
    Live(Option<u32>),
    Fixtures(u32),
    Player(u32),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <id>                      add a player to the squad
  remove <id>                   remove a player from the squad
  save                          fix the starting XI and bench
  sub <id> <id>                 swap two squad players
  transfer <out_id> <in_id>     replace a squad player
  captain <id> | vice <id>      set the armbands
  import <team_id> [gw]         load a manager's squad
  team <team_id>                show a manager's team details
  reset                         empty the squad
  show                          show the squad
  market [gkp|def|mid|fwd|all] [sort=<stat>] [search...]
  targets <id>                  who a squad player can swap with
  trends [in|out|form]          transfer trends
  live [gw]                     live gameweek leaderboard
  fixtures <id>                 a player's next fixtures
  player <id>                   a player's details and images
  help | quit";

impl UserCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let cmd = match head.to_lowercase().as_str() {
            "add" => UserCommand::Add(id_arg("add", &args, 0)?),
            "remove" | "rm" => UserCommand::Remove(id_arg("remove", &args, 0)?),
            "save" => UserCommand::Save,
            "sub" => UserCommand::Substitute(id_arg("sub", &args, 0)?, id_arg("sub", &args, 1)?),
            "transfer" => UserCommand::Transfer {
                outgoing: id_arg("transfer", &args, 0)?,
                incoming: id_arg("transfer", &args, 1)?,
            },
            "captain" => UserCommand::Captain(id_arg("captain", &args, 0)?),
            "vice" => UserCommand::ViceCaptain(id_arg("vice", &args, 0)?),
            "import" => UserCommand::Import {
                team_id: required("import", "a team id", &args, 0)?,
                gameweek: optional("gameweek", &args, 1)?,
            },
            "team" => UserCommand::Team(required("team", "a team id", &args, 0)?),
            "reset" => UserCommand::Reset,
            "show" | "squad" => UserCommand::Show,
            "market" => parse_market(&args)?,
            "targets" => UserCommand::Targets(id_arg("targets", &args, 0)?),
            "trends" => {
                let metric = match args.first() {
                    None => TrendMetric::TransfersIn,
                    Some(s) => TrendMetric::parse(s).ok_or_else(|| CommandError::InvalidArgument {
                        argument: "trend",
                        value: s.to_string(),
                    })?,
                };
                UserCommand::Trends(metric)
            }
            "live" => UserCommand::Live(optional("gameweek", &args, 0)?),
            "fixtures" => UserCommand::Fixtures(id_arg("fixtures", &args, 0)?),
            "player" => UserCommand::Player(id_arg("player", &args, 0)?),
            "help" | "?" => UserCommand::Help,
            "quit" | "exit" | "q" => UserCommand::Quit,
            other => {
                return Err(CommandError::Unknown {
                    command: other.to_string(),
                })
            }
        };
        Ok(cmd)
    }
}

// `market` takes an optional leading position, an optional `sort=<stat>`
// anywhere, and treats every other word as the search text.
fn parse_market(args: &[&str]) -> Result<UserCommand, CommandError> {
    let mut position = None;
    let mut sort = SortMetric::default();
    let mut search = Vec::new();

    for (i, arg) in args.iter().enumerate() {
        if i == 0 {
            if arg.eq_ignore_ascii_case("all") {
                continue;
            }
            if let Some(pos) = Position::from_str_pos(arg).filter(|_| arg.parse::<u8>().is_err()) {
                position = Some(pos);
                continue;
            }
        }
        if let Some(stat) = arg.strip_prefix("sort=") {
            sort = SortMetric::parse(stat).ok_or_else(|| CommandError::InvalidArgument {
                argument: "sort",
                value: stat.to_string(),
            })?;
            continue;
        }
        search.push(*arg);
    }

    Ok(UserCommand::Market {
        position,
        sort,
        search: search.join(" "),
    })
}

fn id_arg(command: &'static str, args: &[&str], index: usize) -> Result<u32, CommandError> {
    required(command, "a player id", args, index)
}

fn required<T: std::str::FromStr>(
    command: &'static str,
    argument: &'static str,
    args: &[&str],
    index: usize,
) -> Result<T, CommandError> {
    let raw = args
        .get(index)
        .ok_or(CommandError::MissingArgument { command, argument })?;
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        argument,
        value: raw.to_string(),
    })
}

fn optional<T: std::str::FromStr>(
    argument: &'static str,
    args: &[&str],
    index: usize,
) -> Result<Option<T>, CommandError> {
    match args.get(index) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| CommandError::InvalidArgument {
                argument,
                value: raw.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_squad_commands() {
        assert_eq!(UserCommand::parse("add 328"), Ok(UserCommand::Add(328)));
        assert_eq!(UserCommand::parse("  SUB 1 2 "), Ok(UserCommand::Substitute(1, 2)));
        assert_eq!(
            UserCommand::parse("transfer 5 77"),
            Ok(UserCommand::Transfer {
                outgoing: 5,
                incoming: 77
            })
        );
        assert_eq!(UserCommand::parse("vice 9"), Ok(UserCommand::ViceCaptain(9)));
        assert_eq!(UserCommand::parse("save"), Ok(UserCommand::Save));
        assert_eq!(UserCommand::parse("player 12"), Ok(UserCommand::Player(12)));
        assert_eq!(UserCommand::parse("quit"), Ok(UserCommand::Quit));
    }

    #[test]
    fn import_gameweek_is_optional() {
        assert_eq!(
            UserCommand::parse("import 123456"),
            Ok(UserCommand::Import {
                team_id: 123456,
                gameweek: None
            })
        );
        assert_eq!(
            UserCommand::parse("import 123456 12"),
            Ok(UserCommand::Import {
                team_id: 123456,
                gameweek: Some(12)
            })
        );
    }

    #[test]
    fn missing_and_invalid_arguments() {
        assert_eq!(
            UserCommand::parse("add"),
            Err(CommandError::MissingArgument {
                command: "add",
                argument: "a player id"
            })
        );
        assert_eq!(
            UserCommand::parse("sub 4"),
            Err(CommandError::MissingArgument {
                command: "sub",
                argument: "a player id"
            })
        );
        assert_eq!(
            UserCommand::parse("captain salah"),
            Err(CommandError::InvalidArgument {
                argument: "a player id",
                value: "salah".into()
            })
        );
        assert_eq!(
            UserCommand::parse("live next"),
            Err(CommandError::InvalidArgument {
                argument: "gameweek",
                value: "next".into()
            })
        );
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(UserCommand::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            UserCommand::parse("dance"),
            Err(CommandError::Unknown {
                command: "dance".into()
            })
        );
    }

    #[test]
    fn market_arguments() {
        assert_eq!(
            UserCommand::parse("market"),
            Ok(UserCommand::Market {
                position: None,
                sort: SortMetric::TotalPoints,
                search: String::new()
            })
        );
        assert_eq!(
            UserCommand::parse("market mid sort=form mo salah"),
            Ok(UserCommand::Market {
                position: Some(Position::Midfielder),
                sort: SortMetric::Form,
                search: "mo salah".into()
            })
        );
        assert_eq!(
            UserCommand::parse("market all haaland"),
            Ok(UserCommand::Market {
                position: None,
                sort: SortMetric::TotalPoints,
                search: "haaland".into()
            })
        );
        // A leading word that is not a position is search text
        assert_eq!(
            UserCommand::parse("market saka"),
            Ok(UserCommand::Market {
                position: None,
                sort: SortMetric::TotalPoints,
                search: "saka".into()
            })
        );
        assert!(UserCommand::parse("market sort=height").is_err());
    }

    #[test]
    fn trends_default_and_choice() {
        assert_eq!(
            UserCommand::parse("trends"),
            Ok(UserCommand::Trends(TrendMetric::TransfersIn))
        );
        assert_eq!(
            UserCommand::parse("trends form"),
            Ok(UserCommand::Trends(TrendMetric::Form))
        );
        assert!(UserCommand::parse("trends up").is_err());
    }
}
