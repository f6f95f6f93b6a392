//! Single binary web server: the coach dashboard API over REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Advice needs GEMINI_API_KEY (optional GEMINI_MODEL, GEMINI_ANALYSIS_MODEL); without it
//! the advice endpoints answer with the fallback text.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, NaiveDateTime};
use futsal_coach::advice::{
    request_source_analysis, request_substitution_advice, GeminiClient, GeminiConfig, SourceKind,
};
use futsal_coach::{
    adjust_score, adjust_shot, competition_standings, import_results_csv, match_stats,
    pause_match, record_goal, reset_match, set_opponent_name, set_possession, start_match,
    substitute, tick, Adjust, CoachError, CompetitionId, Direction, MatchResult, OpponentId,
    PlayerId, PlayerRole, ResultId, Session, SessionId, Side, Strength,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: dashboard state + last activity time (for auto-cleanup).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

/// In-memory state: many sessions by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    #[serde(default = "default_team_name")]
    team_name: String,
    /// Seed the standard seven-player squad.
    #[serde(default)]
    default_roster: bool,
}

fn default_team_name() -> String {
    "My Team".to_string()
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    role: PlayerRole,
}

#[derive(Deserialize)]
struct SubstituteBody {
    direction: Direction,
}

#[derive(Deserialize)]
struct PossessionBody {
    side: Option<Side>,
}

#[derive(Deserialize)]
struct GoalBody {
    side: Side,
    scorer_id: Option<PlayerId>,
    assistant_id: Option<PlayerId>,
}

#[derive(Deserialize)]
struct ShotBody {
    side: Side,
    on_target: bool,
    adjust: Adjust,
}

#[derive(Deserialize)]
struct ScoreBody {
    side: Side,
    adjust: Adjust,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct AddOpponentBody {
    name: String,
    #[serde(default)]
    strength: Strength,
    notes: Option<String>,
}

#[derive(Deserialize)]
struct FixtureBody {
    opponent_id: OpponentId,
    kickoff: NaiveDateTime,
    venue: String,
}

#[derive(Deserialize)]
struct ResultBody {
    team_a: String,
    score_a: u32,
    team_b: String,
    score_b: u32,
    date: NaiveDate,
}

#[derive(Deserialize)]
struct AnalyzeBody {
    kind: SourceKind,
    payload: String,
    mime_type: Option<String>,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segments: session id and player id.
#[derive(Deserialize)]
struct SessionPlayerPath {
    id: SessionId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct CompetitionPath {
    id: SessionId,
    competition_id: CompetitionId,
}

#[derive(Deserialize)]
struct CompetitionOpponentPath {
    id: SessionId,
    competition_id: CompetitionId,
    opponent_id: OpponentId,
}

#[derive(Deserialize)]
struct CompetitionResultPath {
    id: SessionId,
    competition_id: CompetitionId,
    result_id: ResultId,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn no_session() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

fn bad_request(e: CoachError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Apply `f` to a session under the write lock and reply with the updated session.
fn update_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> Result<(), CoachError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_session(),
    };
    entry.last_activity = Instant::now();
    match f(&mut entry.session) {
        Ok(()) => HttpResponse::Ok().json(&entry.session),
        Err(e) => bad_request(e),
    }
}

/// Read a value derived from a session. Touching it refreshes last_activity.
fn view_session<F, T>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&Session) -> Result<T, CoachError>,
    T: Serialize,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_session(),
    };
    entry.last_activity = Instant::now();
    match f(&entry.session) {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => bad_request(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "futsal-coach-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new session (returns it with id; client stores id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(state: AppState, body: Option<Json<CreateSessionBody>>) -> HttpResponse {
    let (team_name, default_roster) = match body {
        Some(b) => {
            let b = b.into_inner();
            (b.team_name, b.default_roster)
        }
        None => (default_team_name(), false),
    };
    let session = if default_roster {
        Session::with_default_roster(team_name)
    } else {
        Session::new(team_name)
    };
    let id = session.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let entry = g.entry(id).or_insert(SessionEntry {
        session,
        last_activity: Instant::now(),
    });
    log::info!("Created session {} for {}", id, entry.session.team_name);
    HttpResponse::Ok().json(&entry.session)
}

#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    view_session(&state, path.id, |s| Ok(s.clone()))
}

/// Derived display values: clock text, possession split, goalkeeper check.
#[get("/api/sessions/{id}/stats")]
async fn api_match_stats(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    view_session(&state, path.id, |s| Ok(match_stats(s)))
}

#[post("/api/sessions/{id}/players")]
async fn api_add_player(state: AppState, path: Path<SessionPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    update_session(&state, path.id, |s| s.add_player(body.name.as_str(), body.role).map(|_| ()))
}

#[delete("/api/sessions/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<SessionPlayerPath>) -> HttpResponse {
    update_session(&state, path.id, |s| s.remove_player(path.player_id))
}

#[post("/api/sessions/{id}/players/{player_id}/substitute")]
async fn api_substitute(
    state: AppState,
    path: Path<SessionPlayerPath>,
    body: Json<SubstituteBody>,
) -> HttpResponse {
    update_session(&state, path.id, |s| substitute(s, path.player_id, body.direction))
}

#[post("/api/sessions/{id}/clock/start")]
async fn api_start_clock(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        start_match(s);
        Ok(())
    })
}

#[post("/api/sessions/{id}/clock/pause")]
async fn api_pause_clock(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        pause_match(s);
        Ok(())
    })
}

#[post("/api/sessions/{id}/clock/reset")]
async fn api_reset_match(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        reset_match(s);
        Ok(())
    })
}

#[put("/api/sessions/{id}/possession")]
async fn api_set_possession(state: AppState, path: Path<SessionPath>, body: Json<PossessionBody>) -> HttpResponse {
    update_session(&state, path.id, |s| set_possession(s, body.side))
}

#[post("/api/sessions/{id}/goals")]
async fn api_record_goal(state: AppState, path: Path<SessionPath>, body: Json<GoalBody>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        record_goal(s, body.side, body.scorer_id, body.assistant_id).map(|_| ())
    })
}

#[post("/api/sessions/{id}/shots")]
async fn api_adjust_shot(state: AppState, path: Path<SessionPath>, body: Json<ShotBody>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        adjust_shot(s, body.side, body.on_target, body.adjust);
        Ok(())
    })
}

/// Manual score correction; does not add a goal to the feed.
#[post("/api/sessions/{id}/score")]
async fn api_adjust_score(state: AppState, path: Path<SessionPath>, body: Json<ScoreBody>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        adjust_score(s, body.side, body.adjust);
        Ok(())
    })
}

#[put("/api/sessions/{id}/opponent")]
async fn api_set_opponent(state: AppState, path: Path<SessionPath>, body: Json<NameBody>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        set_opponent_name(s, body.name.as_str());
        Ok(())
    })
}

#[post("/api/sessions/{id}/competitions")]
async fn api_add_competition(state: AppState, path: Path<SessionPath>, body: Json<NameBody>) -> HttpResponse {
    update_session(&state, path.id, |s| s.add_competition(body.name.as_str()).map(|_| ()))
}

#[post("/api/sessions/{id}/competitions/{competition_id}/opponents")]
async fn api_add_opponent(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<AddOpponentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    update_session(&state, path.id, |s| {
        s.add_opponent(path.competition_id, body.name, body.strength, body.notes)
            .map(|_| ())
    })
}

#[delete("/api/sessions/{id}/competitions/{competition_id}/opponents/{opponent_id}")]
async fn api_remove_opponent(state: AppState, path: Path<CompetitionOpponentPath>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        s.remove_opponent(path.competition_id, path.opponent_id)
    })
}

#[post("/api/sessions/{id}/competitions/{competition_id}/fixtures")]
async fn api_add_fixture(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<FixtureBody>,
) -> HttpResponse {
    let body = body.into_inner();
    update_session(&state, path.id, |s| {
        s.add_fixture(path.competition_id, body.opponent_id, body.kickoff, body.venue)
            .map(|_| ())
    })
}

#[post("/api/sessions/{id}/competitions/{competition_id}/results")]
async fn api_add_result(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let b = body.into_inner();
    let result = MatchResult::new(b.team_a.trim(), b.score_a, b.team_b.trim(), b.score_b, b.date);
    update_session(&state, path.id, |s| {
        s.add_result(path.competition_id, result).map(|_| ())
    })
}

/// Bulk import: CSV body with header `date,team_a,score_a,team_b,score_b`.
#[post("/api/sessions/{id}/competitions/{competition_id}/results/import")]
async fn api_import_results(state: AppState, path: Path<CompetitionPath>, body: String) -> HttpResponse {
    update_session(&state, path.id, |s| {
        import_results_csv(s, path.competition_id, body.as_bytes()).map(|_| ())
    })
}

#[delete("/api/sessions/{id}/competitions/{competition_id}/results/{result_id}")]
async fn api_remove_result(state: AppState, path: Path<CompetitionResultPath>) -> HttpResponse {
    update_session(&state, path.id, |s| {
        s.remove_result(path.competition_id, path.result_id)
    })
}

#[get("/api/sessions/{id}/competitions/{competition_id}/standings")]
async fn api_standings(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    view_session(&state, path.id, |s| competition_standings(s, path.competition_id))
}

/// Substitution advice. The roster is copied out so the lock is not held during the remote call.
#[post("/api/sessions/{id}/advice")]
async fn api_advice(state: AppState, gemini: Data<GeminiClient>, path: Path<SessionPath>) -> HttpResponse {
    let (players, elapsed) = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let entry = match g.get_mut(&path.id) {
            Some(e) => e,
            None => return no_session(),
        };
        entry.last_activity = Instant::now();
        (
            entry.session.players.clone(),
            entry.session.match_state.elapsed_time,
        )
    };
    let advice = request_substitution_advice(gemini.get_ref(), &players, elapsed).await;
    HttpResponse::Ok().json(advice)
}

/// Scouting analysis of text, a URL, or a base64 image.
#[post("/api/analyze")]
async fn api_analyze(gemini: Data<GeminiClient>, body: Json<AnalyzeBody>) -> HttpResponse {
    let body = body.into_inner();
    let analysis = request_source_analysis(
        gemini.get_ref(),
        body.kind,
        &body.payload,
        body.mime_type.as_deref(),
    )
    .await;
    HttpResponse::Ok().json(analysis)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn gemini_config_from_env() -> GeminiConfig {
    let defaults = GeminiConfig::default();
    GeminiConfig {
        api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
        model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
        analysis_model: std::env::var("GEMINI_ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
        base_url: defaults.base_url,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let gemini_config = gemini_config_from_env();
    if gemini_config.api_key.is_none() {
        log::warn!("GEMINI_API_KEY not set; advice endpoints will return fallback text");
    }
    let gemini = Data::new(GeminiClient::new(gemini_config));

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));

    // Match clock: one tick per second for every running session, all under one lock acquisition
    let state_ticker = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let mut g = match state_ticker.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            for entry in g.values_mut() {
                if tick(&mut entry.session) {
                    entry.last_activity = Instant::now();
                }
            }
        }
    });

    // Background task: every 30 minutes, remove sessions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(gemini.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_match_stats)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_substitute)
            .service(api_start_clock)
            .service(api_pause_clock)
            .service(api_reset_match)
            .service(api_set_possession)
            .service(api_record_goal)
            .service(api_adjust_shot)
            .service(api_adjust_score)
            .service(api_set_opponent)
            .service(api_add_competition)
            .service(api_add_opponent)
            .service(api_remove_opponent)
            .service(api_add_fixture)
            .service(api_add_result)
            .service(api_import_results)
            .service(api_remove_result)
            .service(api_standings)
            .service(api_advice)
            .service(api_analyze)
    })
    .bind(bind)?
    .run()
    .await
}
