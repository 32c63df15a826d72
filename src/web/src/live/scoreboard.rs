use crate::live::view::{LiveMatchView, TeamView};
use crate::live::LiveRequest;
use crate::{ApiResult, CoachAppData};
use askama::Template;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use scoring::{ClockState, Half, LiveMatch, SaveStatus, TeamKey};

#[derive(Template, askama_web::WebTemplate)]
#[template(path = "live/scoreboard.html")]
pub struct ScoreboardTemplate {
    pub title: String,
    pub competition: String,
    pub home: ScoreboardTeam,
    pub away: ScoreboardTeam,
    pub clock: String,
    pub half_label: &'static str,
    pub running: bool,
    pub save_label: &'static str,
}

pub struct ScoreboardTeam {
    pub name: String,
    pub score: usize,
    pub fouls: u32,
    pub foul_warning: bool,
    pub is_my_team: bool,
}

impl ScoreboardTemplate {
    fn from_view(view: &LiveMatchView) -> Self {
        let (home, away) = view.home_and_away();
        let my_side_known = view.my_team_side.is_some();

        let team = |team: &TeamView, is_my_team: bool| ScoreboardTeam {
            name: team.name.clone(),
            score: team.score,
            fouls: team.fouls_in_half,
            foul_warning: team.foul_limit_reached,
            is_my_team: my_side_known && is_my_team,
        };

        ScoreboardTemplate {
            title: format!("{} - {}", home.name, away.name),
            competition: view.metadata.competition.clone(),
            home: team(home, home.team == TeamKey::MyTeam),
            away: team(away, away.team == TeamKey::MyTeam),
            clock: view.clock.display.clone(),
            half_label: match view.clock.half {
                Half::FirstHalf => "1ª parte",
                Half::SecondHalf => "2ª parte",
            },
            running: view.clock.state == ClockState::Running,
            save_label: match view.save_status {
                SaveStatus::Saved => "Guardado",
                SaveStatus::Saving => "Guardando...",
                SaveStatus::Unsaved => "Sin guardar",
            },
        }
    }
}

pub async fn scoreboard_action(
    State(state): State<CoachAppData>,
    Path(route_params): Path<LiveRequest>,
) -> ApiResult<impl IntoResponse> {
    let view = match state.sessions.get(&route_params.id).await {
        Some(handle) => handle.view().await?,
        None => {
            let document = state.matches().get_required(&route_params.id).await?;
            let roster = state.rosters().get(&document.owner_id).await?;
            let live = LiveMatch::from_document(route_params.id, document, &roster);

            LiveMatchView::build(&live, SaveStatus::Saved)
        }
    };

    Ok(ScoreboardTemplate::from_view(&view))
}
