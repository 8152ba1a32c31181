//! View state for the anomalies dashboard.
//!
//! `ViewState` is driven by a small reducer; `DashboardState` adds the last
//! good API payloads, the load status and the tokens that keep late
//! responses and late debounce timers from overwriting newer state.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::filter::filter_and_sort_anomalies;
use crate::types::anomaly::{Anomaly, AnomaliesResponse, ReasonIcon};
use crate::types::summary::{SummaryResponse, UserSummary, WordFrequency};
use crate::types::view::{SortColumn, SortOrder};

/// Words shown in the frequency card; the rest are only counted.
pub const VISIBLE_WORDS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SearchInput(String),
    CommitSearch,
    Sort(SortColumn),
    SelectUser(i64),
    ClearUser,
}

/// What the caller has to do after a reducer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Refetch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Raw text in the search box, not yet applied.
    pub search_input: String,
    pub search_term: String,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    pub selected_user_id: Option<i64>,
}

impl ViewState {
    pub fn apply(&mut self, action: ViewAction) -> Effect {
        match action {
            ViewAction::SearchInput(text) => {
                self.search_input = text;
                Effect::None
            }
            ViewAction::CommitSearch => {
                self.search_term = self.search_input.clone();
                Effect::None
            }
            ViewAction::Sort(column) => {
                if self.sort_by == column {
                    self.sort_order = self.sort_order.flipped();
                } else {
                    self.sort_by = column;
                    self.sort_order = SortOrder::Asc;
                }
                Effect::None
            }
            ViewAction::SelectUser(user_id) => {
                self.selected_user_id = Some(user_id);
                Effect::Refetch
            }
            ViewAction::ClearUser => {
                self.selected_user_id = None;
                Effect::Refetch
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "message")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Issued when a refresh starts; only the newest ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    pub generation: u64,
    pub user_id: Option<i64>,
}

/// Issued for each keystroke; only the newest token may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToken(u64);

#[derive(Debug, Default)]
pub struct DashboardState {
    view: ViewState,
    anomalies: Option<AnomaliesResponse>,
    summary: Option<SummaryResponse>,
    status: LoadStatus,
    generation: u64,
    search_generation: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Apply a user interaction. Returns a ticket when the action needs a
    /// fresh fetch.
    pub fn dispatch(&mut self, action: ViewAction) -> Option<RefreshTicket> {
        debug!(?action, "View action");
        match self.view.apply(action) {
            Effect::Refetch => Some(self.begin_refresh()),
            Effect::None => None,
        }
    }

    /// Record raw search input and hand back the token a delayed commit must
    /// present.
    pub fn search_input(&mut self, text: String) -> SearchToken {
        self.view.apply(ViewAction::SearchInput(text));
        self.search_generation += 1;
        SearchToken(self.search_generation)
    }

    /// Returns false when newer input arrived after `token` was issued.
    pub fn commit_search(&mut self, token: SearchToken) -> bool {
        if token.0 != self.search_generation {
            return false;
        }
        self.view.apply(ViewAction::CommitSearch);
        true
    }

    /// Start a fetch for the current user filter. Also serves retry, which
    /// re-issues exactly the last request.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        RefreshTicket {
            generation: self.generation,
            user_id: self.view.selected_user_id,
        }
    }

    /// Land a refresh result. Returns false when `ticket` was superseded and
    /// the result was dropped. A failure keeps whatever data was shown.
    pub fn finish_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<(AnomaliesResponse, SummaryResponse), ApiError>,
    ) -> bool {
        if ticket.generation != self.generation {
            warn!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale refresh result"
            );
            return false;
        }
        match result {
            Ok((anomalies, summary)) => {
                info!(
                    anomalies = anomalies.total,
                    user_id = ?ticket.user_id,
                    "Dashboard data refreshed"
                );
                self.anomalies = Some(anomalies);
                self.summary = Some(summary);
                self.status = LoadStatus::Ready;
            }
            Err(err) => {
                warn!(error = %err, "Dashboard refresh failed");
                self.status = LoadStatus::Failed(err.to_string());
            }
        }
        true
    }

    pub fn snapshot(&self) -> DashboardView {
        let all: &[Anomaly] = self
            .anomalies
            .as_ref()
            .map(|r| r.anomalies.as_slice())
            .unwrap_or(&[]);
        let rows: Vec<AnomalyRow> = filter_and_sort_anomalies(
            all,
            &self.view.search_term,
            self.view.sort_by,
            self.view.sort_order,
        )
        .into_iter()
        .map(AnomalyRow::from)
        .collect();

        let stats = StatsCards {
            total_posts: self.summary.as_ref().map_or(0, |s| s.total_posts),
            total_users: self.summary.as_ref().map_or(0, |s| s.total_users),
            anomalies_detected: self.anomalies.as_ref().map_or(0, |a| a.total),
        };

        let (top_users, frequent_words, word_count) = match &self.summary {
            Some(summary) => (
                summary.top_users.clone(),
                summary
                    .most_frequent_words
                    .iter()
                    .take(VISIBLE_WORDS)
                    .cloned()
                    .collect(),
                summary.most_frequent_words.len(),
            ),
            None => (Vec::new(), Vec::new(), 0),
        };

        DashboardView {
            status: self.status.clone(),
            view: self.view.clone(),
            shown: rows.len(),
            total: all.len(),
            rows,
            stats,
            top_users,
            frequent_words,
            word_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyRow {
    #[serde(flatten)]
    pub anomaly: Anomaly,
    pub reason_label: String,
    pub reason_icon: ReasonIcon,
}

impl From<Anomaly> for AnomalyRow {
    fn from(anomaly: Anomaly) -> Self {
        Self {
            reason_label: anomaly.reason.label().to_string(),
            reason_icon: anomaly.reason.icon(),
            anomaly,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCards {
    pub total_posts: u64,
    pub total_users: u64,
    pub anomalies_detected: u64,
}

/// Everything the webview needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: LoadStatus,
    pub view: ViewState,
    pub rows: Vec<AnomalyRow>,
    pub shown: usize,
    pub total: usize,
    pub stats: StatsCards,
    pub top_users: Vec<UserSummary>,
    pub frequent_words: Vec<WordFrequency>,
    pub word_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::anomaly::{AnomalyBreakdown, ReasonCode};

    fn anomalies(ids_and_users: &[(i64, i64)]) -> AnomaliesResponse {
        let anomalies: Vec<Anomaly> = ids_and_users
            .iter()
            .map(|&(id, user_id)| Anomaly {
                user_id,
                id,
                title: format!("post {}", id),
                reason: ReasonCode::ShortTitle,
                details: None,
            })
            .collect();
        AnomaliesResponse {
            total: anomalies.len() as u64,
            anomalies,
            summary: AnomalyBreakdown::default(),
        }
    }

    fn summary(words: usize) -> SummaryResponse {
        SummaryResponse {
            top_users: vec![UserSummary {
                user_id: 1,
                unique_word_count: 10,
                total_posts: 2,
                unique_words: vec!["a".to_string()],
            }],
            most_frequent_words: (0..words)
                .map(|i| WordFrequency {
                    word: format!("w{}", i),
                    count: (words - i) as u64,
                })
                .collect(),
            total_posts: 100,
            total_users: 10,
        }
    }

    fn loaded(ids_and_users: &[(i64, i64)]) -> DashboardState {
        let mut state = DashboardState::new();
        let ticket = state.begin_refresh();
        assert!(state.finish_refresh(ticket, Ok((anomalies(ids_and_users), summary(3)))));
        state
    }

    #[test]
    fn defaults_match_mount_state() {
        let view = ViewState::default();
        assert_eq!(view.search_term, "");
        assert_eq!(view.sort_by, SortColumn::Id);
        assert_eq!(view.sort_order, SortOrder::Asc);
        assert_eq!(view.selected_user_id, None);
    }

    #[test]
    fn sort_same_column_flips_direction() {
        let mut view = ViewState::default();
        assert_eq!(view.apply(ViewAction::Sort(SortColumn::Id)), Effect::None);
        assert_eq!(view.sort_order, SortOrder::Desc);
        view.apply(ViewAction::Sort(SortColumn::Id));
        assert_eq!(view.sort_order, SortOrder::Asc);
    }

    #[test]
    fn sort_new_column_resets_to_ascending() {
        let mut view = ViewState::default();
        view.apply(ViewAction::Sort(SortColumn::Id));
        assert_eq!(view.sort_order, SortOrder::Desc);
        view.apply(ViewAction::Sort(SortColumn::Title));
        assert_eq!(view.sort_by, SortColumn::Title);
        assert_eq!(view.sort_order, SortOrder::Asc);
    }

    #[test]
    fn select_and_clear_user_request_refetch() {
        let mut state = DashboardState::new();
        let ticket = state.dispatch(ViewAction::SelectUser(5)).unwrap();
        assert_eq!(ticket.user_id, Some(5));
        assert_eq!(state.view_state().selected_user_id, Some(5));

        let ticket = state.dispatch(ViewAction::ClearUser).unwrap();
        assert_eq!(ticket.user_id, None);
        assert_eq!(state.view_state().selected_user_id, None);
        assert_eq!(state.status(), &LoadStatus::Loading);
    }

    #[test]
    fn sort_does_not_refetch() {
        let mut state = DashboardState::new();
        assert!(state.dispatch(ViewAction::Sort(SortColumn::Reason)).is_none());
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let mut state = DashboardState::new();
        let first = state.begin_refresh();
        let second = state.dispatch(ViewAction::SelectUser(2)).unwrap();

        assert!(state.finish_refresh(second, Ok((anomalies(&[(7, 2)]), summary(1)))));
        assert!(!state.finish_refresh(first, Ok((anomalies(&[(1, 1), (2, 3)]), summary(1)))));

        let view = state.snapshot();
        assert_eq!(view.total, 1);
        assert_eq!(view.rows[0].anomaly.id, 7);
        assert_eq!(view.status, LoadStatus::Ready);
    }

    #[test]
    fn failed_refresh_keeps_previous_data() {
        let mut state = loaded(&[(1, 1), (2, 2)]);
        let ticket = state.begin_refresh();
        assert!(state.finish_refresh(ticket, Err(ApiError::Network)));

        let view = state.snapshot();
        assert_eq!(view.total, 2);
        assert_eq!(
            view.status,
            LoadStatus::Failed("Network error: Unable to connect to the server".to_string())
        );
    }

    #[test]
    fn first_load_failure_leaves_empty_view() {
        let mut state = DashboardState::new();
        let ticket = state.begin_refresh();
        state.finish_refresh(
            ticket,
            Err(ApiError::Http {
                status: 500,
                status_text: "Internal Server Error".to_string(),
            }),
        );
        let view = state.snapshot();
        assert_eq!(view.total, 0);
        assert_eq!(view.stats, StatsCards::default());
        assert_eq!(
            view.status,
            LoadStatus::Failed("HTTP 500: Internal Server Error".to_string())
        );
    }

    #[test]
    fn retry_reuses_selected_user() {
        let mut state = DashboardState::new();
        state.dispatch(ViewAction::SelectUser(9));
        let retry = state.begin_refresh();
        assert_eq!(retry.user_id, Some(9));
    }

    #[test]
    fn search_commit_requires_latest_token() {
        let mut state = loaded(&[(1, 1), (2, 2), (12, 3)]);
        let early = state.search_input("1".to_string());
        let late = state.search_input("12".to_string());

        assert!(!state.commit_search(early));
        assert_eq!(state.view_state().search_term, "");
        assert!(state.commit_search(late));
        assert_eq!(state.view_state().search_term, "12");

        let view = state.snapshot();
        assert_eq!(view.shown, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.rows[0].anomaly.id, 12);
    }

    #[test]
    fn snapshot_derives_rows_and_counts() {
        let mut state = loaded(&[(3, 1), (1, 1), (2, 1)]);
        state.dispatch(ViewAction::Sort(SortColumn::Id));

        let view = state.snapshot();
        let ids: Vec<i64> = view.rows.iter().map(|r| r.anomaly.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(view.rows[0].reason_label, "Short Title");
        assert_eq!(view.stats.total_posts, 100);
        assert_eq!(view.stats.total_users, 10);
        assert_eq!(view.stats.anomalies_detected, 3);
        assert_eq!(view.top_users.len(), 1);
    }

    #[test]
    fn frequent_words_are_capped() {
        let mut state = DashboardState::new();
        let ticket = state.begin_refresh();
        state.finish_refresh(ticket, Ok((anomalies(&[]), summary(20))));

        let view = state.snapshot();
        assert_eq!(view.frequent_words.len(), VISIBLE_WORDS);
        assert_eq!(view.word_count, 20);
        assert_eq!(view.frequent_words[0].word, "w0");
    }

    #[test]
    fn view_serializes_for_webview() {
        let state = loaded(&[(1, 4)]);
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["status"]["state"], "ready");
        assert_eq!(json["view"]["sortBy"], "id");
        assert_eq!(json["rows"][0]["userId"], 4);
        assert_eq!(json["rows"][0]["reason"], "short_title");
        assert_eq!(json["rows"][0]["reasonIcon"]["glyph"], "file-text");
        assert_eq!(json["stats"]["anomaliesDetected"], 1);
    }
}
