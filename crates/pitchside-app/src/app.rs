// Command loop: reads lines, applies them to the planner, writes replies.
//
// Each command yields exactly one reply. Failures are reported and the loop
// carries on; only `quit` or a closed input channel ends it.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pitchside_gateway::DataSource;

use crate::command::{UserCommand, HELP};
use crate::planner::{Planner, PlannerError};
use crate::report;

/// Run until `quit` or until `lines` closes.
pub async fn run<S, W>(
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
    planner: &mut Planner<S>,
) -> anyhow::Result<()>
where
    S: DataSource,
    W: AsyncWrite + Unpin,
{
    info!("command loop started");

    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match UserCommand::parse(&line) {
            Ok(UserCommand::Quit) => {
                info!("quit command received");
                break;
            }
            Ok(cmd) => {
                debug!(?cmd, "command");
                handle_command(planner, cmd).await
            }
            Err(e) => format!("error: {e}\n"),
        };
        out.write_all(reply.as_bytes()).await?;
        out.flush().await?;
    }

    info!("command loop exiting");
    Ok(())
}

/// Apply one command and render the reply.
pub async fn handle_command<S: DataSource>(planner: &mut Planner<S>, cmd: UserCommand) -> String {
    match execute(planner, cmd).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "command failed");
            format!("error: {e}\n")
        }
    }
}

async fn execute<S: DataSource>(
    planner: &mut Planner<S>,
    cmd: UserCommand,
) -> Result<String, PlannerError> {
    let reply = match cmd {
        UserCommand::Add(id) => {
            let player = planner.add(id)?;
            format!(
                "Added {} ({}). Squad {}/15.\n",
                player.web_name,
                player.position,
                planner.squad().size()
            )
        }
        UserCommand::Remove(id) => {
            let entry = planner.remove(id)?;
            format!(
                "Removed {}. Squad {}/15.\n",
                entry.player().web_name,
                planner.squad().size()
            )
        }
        UserCommand::Save => {
            planner.save()?;
            show(planner)
        }
        UserCommand::Substitute(a, b) => {
            planner.substitute(a, b)?;
            show(planner)
        }
        UserCommand::Transfer { outgoing, incoming } => {
            let (out, player) = planner.transfer(outgoing, incoming)?;
            format!(
                "Transferred out {}, in {}. Remaining {}.\n",
                out.player().web_name,
                player.web_name,
                report::money(planner.remaining_budget())
            )
        }
        UserCommand::Captain(id) => {
            planner.set_captain(id)?;
            show(planner)
        }
        UserCommand::ViceCaptain(id) => {
            planner.set_vice_captain(id)?;
            show(planner)
        }
        UserCommand::Import { team_id, gameweek } => {
            let summary = planner.import(team_id, gameweek).await?;
            format!(
                "Imported team {} for gameweek {}.\n{}",
                summary.team_id,
                summary.gameweek,
                show(planner)
            )
        }
        UserCommand::Team(team_id) => report::team_info(&planner.team_info(team_id).await?),
        UserCommand::Reset => {
            planner.reset();
            "Squad cleared.\n".to_string()
        }
        UserCommand::Show => show(planner),
        UserCommand::Market {
            position,
            sort,
            search,
        } => {
            let query = planner.market_query(position, &search, sort);
            let players = planner.market(&query)?;
            report::market(&players, planner.catalog()?, sort)
        }
        UserCommand::Targets(id) => {
            let targets = planner.targets(id)?;
            let source = planner
                .squad()
                .find(id)
                .ok_or(PlannerError::UnknownPlayer { player_id: id })?;
            report::targets(source, &targets)
        }
        UserCommand::Trends(metric) => {
            let players = planner.trends(metric)?;
            report::trends(&players, planner.catalog()?, metric)
        }
        UserCommand::Live(gameweek) => {
            let (gameweek, rows) = planner.live(gameweek).await?;
            report::live(gameweek, &rows, planner.catalog()?)
        }
        UserCommand::Fixtures(id) => {
            let (player, upcoming) = planner.fixtures_for(id).await?;
            report::fixtures(&player, &upcoming)
        }
        UserCommand::Player(id) => {
            let player = planner.player(id)?;
            report::player_card(&player, planner.catalog()?)
        }
        UserCommand::Help => format!("{HELP}\n"),
        UserCommand::Quit => String::new(),
    };
    Ok(reply)
}

fn show<S: DataSource>(planner: &Planner<S>) -> String {
    report::squad_summary(
        planner.squad(),
        planner.catalog().ok().map(|c| c.as_ref()),
        planner.settings().budget,
    )
}
