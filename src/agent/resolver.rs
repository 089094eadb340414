// Turn resolution state machine
//
// One call = one turn. Branch priority, first match wins:
//   1. refine (max one per setlist)
//   2. regenerate
//   3. resolve a pending clarification
//   4. route decision (clarify at most once, otherwise generate)
//
// State is copied at turn start and returned fresh on success; a failed
// turn returns no state, so the caller keeps what it had.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ai::context_builder::build_library_context;
use crate::ai::model_client::ModelClient;
use crate::ai::prompts::{
    GENERATE_SETLIST_PROMPT, GENERATE_TEMPERATURE, REFINE_SETLIST_PROMPT, REFINE_TEMPERATURE,
    REGENERATE_SETLIST_PROMPT, REGENERATE_TEMPERATURE, ROUTE_DECISION_PROMPT, ROUTE_TEMPERATURE,
};
use crate::error::{AgentError, Result};
use crate::youtube::VideoSearch;

use super::json::extract_json;
use super::library::{merge_with_library, track_key};
use super::meta::compute_meta;
use super::types::{
    ConversationState, LibraryTrack, ModelSetlist, Setlist, TurnRequest, TurnResult,
};
use super::validate::validate_setlist_payload;

/// Follow-up attached to every fresh setlist
const FOLLOW_UP: &str = "Want to make changes?";
/// Follow-up when a second refinement is rejected
const MANUAL_EDIT_FOLLOW_UP: &str = "You can still edit manually in the app.";
/// Used when the router asks to clarify but omits the question
const DEFAULT_CLARIFY_QUESTION: &str = "What style or event is this setlist for?";
/// Max previous-setlist keys included in a regenerate prompt
const EXCLUSION_KEY_CAP: usize = 80;

/// The conversational setlist agent.
///
/// Holds the model backend and an optional video-lookup collaborator;
/// everything else arrives with each [`TurnRequest`].
pub struct SetlistAgent {
    model: Arc<dyn ModelClient>,
    video_search: Option<Arc<dyn VideoSearch>>,
}

impl SetlistAgent {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            model,
            video_search: None,
        }
    }

    /// Enable best-effort per-track video link enrichment.
    pub fn with_video_search(mut self, video_search: Arc<dyn VideoSearch>) -> Self {
        self.video_search = Some(video_search);
        self
    }

    /// Resolve one conversation turn.
    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnResult> {
        let TurnRequest {
            prompt,
            target_duration_minutes,
            refinement,
            previous_setlist,
            regenerate,
            user_id,
            library_tracks,
            state,
        } = request;

        let mut next_state = state;
        let library = library_tracks.unwrap_or_default();

        // 1) Refinement (max one per setlist)
        if let Some(refinement) = refinement.as_deref().filter(|r| !r.is_empty()) {
            if let Some(previous) = previous_setlist.as_ref() {
                if next_state.refinement_used {
                    debug!("refinement already used; returning prior setlist unchanged");
                    let setlist = next_state
                        .last_setlist
                        .clone()
                        .unwrap_or_else(|| previous.clone());
                    return Ok(setlist_result(setlist, MANUAL_EDIT_FOLLOW_UP, next_state));
                }

                debug!("resolving turn as refinement");
                let user_prompt = refine_user_prompt(
                    &prompt,
                    previous,
                    refinement,
                    target_duration_minutes,
                    &library,
                );
                let setlist = self
                    .complete_setlist(
                        REFINE_SETLIST_PROMPT,
                        &user_prompt,
                        REFINE_TEMPERATURE,
                        &library,
                        user_id.as_deref(),
                    )
                    .await?;

                next_state.refinement_used = true;
                cache_setlist(&mut next_state, &setlist);
                return Ok(setlist_result(setlist, FOLLOW_UP, next_state));
            }
        }

        // 2) Regenerate: a new setlist for the same request
        if regenerate {
            debug!("resolving turn as regeneration");
            let exclusion = next_state
                .last_setlist
                .as_ref()
                .or(previous_setlist.as_ref())
                .map(exclusion_keys)
                .unwrap_or_default();
            let user_prompt = regenerate_user_prompt(
                &prompt,
                target_duration_minutes,
                &exclusion,
                next_state.setlist_name.as_deref(),
                next_state.genre.as_deref(),
                &library,
            );
            let setlist = self
                .complete_setlist(
                    REGENERATE_SETLIST_PROMPT,
                    &user_prompt,
                    REGENERATE_TEMPERATURE,
                    &library,
                    user_id.as_deref(),
                )
                .await?;

            reset_for_new_setlist(&mut next_state);
            cache_setlist(&mut next_state, &setlist);
            return Ok(setlist_result(setlist, FOLLOW_UP, next_state));
        }

        // 3) A clarification was asked previously: generate immediately now
        if next_state.clarification_asked {
            if let Some(pending) = next_state.pending_prompt.take() {
                debug!("resolving pending clarification");
                let combined = format!("{pending}\n\nClarification answer: {prompt}");
                let user_prompt =
                    generate_user_prompt(&combined, target_duration_minutes, &library);
                let setlist = self
                    .complete_setlist(
                        GENERATE_SETLIST_PROMPT,
                        &user_prompt,
                        GENERATE_TEMPERATURE,
                        &library,
                        user_id.as_deref(),
                    )
                    .await?;

                reset_for_new_setlist(&mut next_state);
                next_state.original_prompt = Some(combined);
                cache_setlist(&mut next_state, &setlist);
                return Ok(setlist_result(setlist, FOLLOW_UP, next_state));
            }
        }

        // 4) Route decision: enough info to generate?
        let decision_text = self
            .model
            .complete(
                ROUTE_DECISION_PROMPT,
                &route_user_prompt(&prompt),
                ROUTE_TEMPERATURE,
            )
            .await?;
        let decision = extract_json(&decision_text)?;
        let action = decision
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("generate");

        if action == "clarify" {
            if !next_state.clarification_asked {
                debug!("asking the one allowed clarifying question");
                next_state.pending_prompt = Some(prompt.clone());
                next_state.clarification_asked = true;
                let question = decision
                    .get("question")
                    .and_then(Value::as_str)
                    .filter(|q| !q.is_empty())
                    .unwrap_or(DEFAULT_CLARIFY_QUESTION)
                    .to_string();
                return Ok(TurnResult::Clarify {
                    question,
                    state: next_state,
                });
            }
            // Max one clarification per conversation; generate anyway.
            debug!("clarification already asked; forcing generation");
        }

        let user_prompt = generate_user_prompt(&prompt, target_duration_minutes, &library);
        let setlist = self
            .complete_setlist(
                GENERATE_SETLIST_PROMPT,
                &user_prompt,
                GENERATE_TEMPERATURE,
                &library,
                user_id.as_deref(),
            )
            .await?;

        reset_for_new_setlist(&mut next_state);
        next_state.original_prompt = Some(prompt);
        cache_setlist(&mut next_state, &setlist);
        Ok(setlist_result(setlist, FOLLOW_UP, next_state))
    }

    /// Model call, extraction, validation, merge, and optional enrichment.
    async fn complete_setlist(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        library: &[LibraryTrack],
        user_id: Option<&str>,
    ) -> Result<Setlist> {
        let raw = self
            .model
            .complete(system_prompt, user_prompt, temperature)
            .await?;
        let payload = extract_json(&raw)?;
        validate_setlist_payload(&payload)?;

        let model_setlist: ModelSetlist = serde_json::from_value(payload)
            .map_err(|e| AgentError::validation(format!("Setlist payload has an unusable shape: {e}")))?;

        let mut setlist = merge_with_library(model_setlist, library, user_id);
        self.resolve_video_links(&mut setlist).await;
        Ok(setlist)
    }

    /// Look up a video link per track, all lookups concurrent. A failed
    /// lookup leaves that track's link unset; it never fails the turn.
    async fn resolve_video_links(&self, setlist: &mut Setlist) {
        let Some(video_search) = self.video_search.as_ref() else {
            return;
        };

        let lookups: Vec<_> = setlist
            .tracks
            .iter()
            .map(|track| {
                let query = format!("{} {}", track.title, track.artist);
                let needs_url = track.youtube_url.is_none();
                let video_search = Arc::clone(video_search);
                async move {
                    if !needs_url {
                        return None;
                    }
                    match video_search.search_first_video(&query).await {
                        Ok(url) => url,
                        Err(err) => {
                            warn!(query = %query, error = %err, "video lookup failed");
                            None
                        }
                    }
                }
            })
            .collect();

        let urls = join_all(lookups).await;
        for (track, url) in setlist.tracks.iter_mut().zip(urls) {
            if track.youtube_url.is_none() {
                track.youtube_url = url;
            }
        }
    }
}

/// A new setlist resets both one-shot allowances and any pending question.
fn reset_for_new_setlist(state: &mut ConversationState) {
    state.pending_prompt = None;
    state.clarification_asked = false;
    state.refinement_used = false;
}

fn cache_setlist(state: &mut ConversationState, setlist: &Setlist) {
    state.last_setlist = Some(setlist.clone());
    state.setlist_name = Some(setlist.setlist_name.clone());
    state.genre = (!setlist.genre.is_empty()).then(|| setlist.genre.clone());
}

fn setlist_result(setlist: Setlist, follow_up: &str, state: ConversationState) -> TurnResult {
    let meta = compute_meta(&setlist);
    TurnResult::Setlist {
        setlist,
        follow_up: follow_up.to_string(),
        total_songs: meta.total_songs,
        total_duration_seconds: meta.total_duration_seconds,
        sources_breakdown: meta.sources_breakdown,
        state,
    }
}

/// Deduplicated previous-setlist keys, original order, capped.
fn exclusion_keys(setlist: &Setlist) -> Vec<String> {
    let mut seen = HashSet::new();
    setlist
        .tracks
        .iter()
        .map(|t| track_key(&t.title, &t.artist))
        .filter(|key| seen.insert(key.clone()))
        .take(EXCLUSION_KEY_CAP)
        .collect()
}

fn format_target(target: Option<f64>) -> String {
    match target {
        Some(t) if t.fract() == 0.0 => format!("{}", t as i64),
        Some(t) => format!("{t}"),
        None => "not specified".to_string(),
    }
}

fn library_section(library: &[LibraryTrack]) -> String {
    let context = build_library_context(library);
    if context.is_empty() {
        String::new()
    } else {
        format!("\nUSER LIBRARY (sample):\n{context}\n")
    }
}

fn route_user_prompt(prompt: &str) -> String {
    format!("User prompt: \"{prompt}\"")
}

fn generate_user_prompt(prompt: &str, target: Option<f64>, library: &[LibraryTrack]) -> String {
    format!(
        "USER REQUEST:\n\"{prompt}\"\n\nTarget duration minutes: {}\n{}",
        format_target(target),
        library_section(library),
    )
}

fn regenerate_user_prompt(
    prompt: &str,
    target: Option<f64>,
    exclusion: &[String],
    name_hint: Option<&str>,
    genre_hint: Option<&str>,
    library: &[LibraryTrack],
) -> String {
    let mut out = format!(
        "USER REQUEST (same as before):\n\"{prompt}\"\n\nTarget duration minutes: {}\n",
        format_target(target),
    );
    if name_hint.is_some() || genre_hint.is_some() {
        out.push_str(&format!(
            "\nKEEP CONSISTENT WITH THE PREVIOUS RESULT:\nname: \"{}\"\ngenre: \"{}\"\n",
            name_hint.unwrap_or("unknown"),
            genre_hint.unwrap_or("unknown"),
        ));
    }
    out.push_str(&format!(
        "\nPREVIOUS SETLIST TRACKS (avoid reusing these if possible):\n{}\n",
        serde_json::to_string_pretty(exclusion).unwrap_or_default(),
    ));
    out.push_str(&library_section(library));
    out.push_str("\nGenerate a different setlist now.\n");
    out
}

fn refine_user_prompt(
    prompt: &str,
    previous: &Setlist,
    refinement: &str,
    target: Option<f64>,
    library: &[LibraryTrack],
) -> String {
    format!(
        "ORIGINAL REQUEST (for context):\n\"{prompt}\"\n\nEXISTING SETLIST TO EDIT:\n{}\n\nUSER REFINEMENT (ONE cycle max):\n\"{refinement}\"\n\nTarget duration minutes (if relevant): {}\n{}\nRemember: minimal edits, keep most tracks, do not regenerate from scratch.\n",
        serde_json::to_string_pretty(previous).unwrap_or_default(),
        format_target(target),
        library_section(library),
    )
}
