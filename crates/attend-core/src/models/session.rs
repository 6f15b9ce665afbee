use std::collections::{BTreeMap, HashMap};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::demographics::{DemographicInput, DemographicProfile};
use crate::models::questionnaire::{AnswerCode, AnswerMap, QuestionId, QuestionnaireResponse};

/// Request-scoped state for one person filling in the questionnaire.
///
/// Answers accumulate one at a time (the answer store) until
/// [`ScreeningSession::submit`] validates them together with the
/// demographic profile. After submission the session is read-only.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningSession {
    pub id: Uuid,
    pub created_at: Timestamp,
    answers: BTreeMap<QuestionId, AnswerCode>,
    demographics: Option<DemographicProfile>,
    submission: Option<Submission>,
}

/// The frozen result of a successful [`ScreeningSession::submit`].
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub responses: QuestionnaireResponse,
    pub demographics: DemographicProfile,
    pub submitted_at: Timestamp,
}

/// Progress view of a session, safe to hand to a front end.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SessionStatus {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub answers: AnswerMap,
    pub answered: usize,
    pub missing_questions: Vec<u8>,
    pub demographics: Option<DemographicProfile>,
    pub submitted: bool,
}

impl ScreeningSession {
    pub fn new() -> Self {
        Self::started_at(Timestamp::now())
    }

    pub fn started_at(created_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            answers: BTreeMap::new(),
            demographics: None,
            submission: None,
        }
    }

    pub fn record_answer(&mut self, question: u8, code: u8) -> Result<AnswerCode, CoreError> {
        self.ensure_open()?;
        let id = QuestionId::new(question)?;
        let code = AnswerCode::try_from(code).map_err(|_| CoreError::OutOfRange {
            field: format!("answer to question {question}"),
            value: i64::from(code),
            min: 0,
            max: 4,
        })?;
        self.answers.insert(id, code);
        Ok(code)
    }

    /// Remove a recorded answer, returning it if one was present.
    pub fn clear_answer(&mut self, question: u8) -> Result<Option<AnswerCode>, CoreError> {
        self.ensure_open()?;
        let id = QuestionId::new(question)?;
        Ok(self.answers.remove(&id))
    }

    pub fn set_demographics(&mut self, input: &DemographicInput) -> Result<DemographicProfile, CoreError> {
        self.ensure_open()?;
        let profile = input.validate()?;
        self.demographics = Some(profile);
        Ok(profile)
    }

    pub fn answers(&self) -> AnswerMap {
        self.answers
            .iter()
            .map(|(id, code)| (id.get(), code.value()))
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn missing_questions(&self) -> Vec<u8> {
        QuestionId::all()
            .filter(|id| !self.answers.contains_key(id))
            .map(QuestionId::get)
            .collect()
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    /// Validate and freeze the session.
    ///
    /// Fails with [`CoreError::MissingResponse`] while any answer is
    /// missing and with [`CoreError::MissingField`] when no demographic
    /// profile has been set.
    pub fn submit(&mut self) -> Result<&Submission, CoreError> {
        self.submit_at(Timestamp::now())
    }

    /// [`ScreeningSession::submit`] with an explicit submission time.
    pub fn submit_at(&mut self, submitted_at: Timestamp) -> Result<&Submission, CoreError> {
        self.ensure_open()?;
        let responses = QuestionnaireResponse::from_answers(&self.answers())?;
        let demographics = self
            .demographics
            .ok_or_else(|| CoreError::MissingField("demographics".to_string()))?;

        Ok(self.submission.insert(Submission {
            responses,
            demographics,
            submitted_at,
        }))
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            id: self.id,
            created_at: self.created_at,
            answers: self.answers(),
            answered: self.answered_count(),
            missing_questions: self.missing_questions(),
            demographics: self.demographics,
            submitted: self.is_submitted(),
        }
    }

    /// When the session last changed state: its submission, or its creation
    /// while still open.
    pub fn last_activity(&self) -> Timestamp {
        self.submission
            .as_ref()
            .map_or(self.created_at, |s| s.submitted_at)
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.is_submitted() {
            Err(CoreError::AlreadySubmitted(self.id))
        } else {
            Ok(())
        }
    }
}

impl Default for ScreeningSession {
    fn default() -> Self {
        Self::new()
    }
}

/// How long a [`SessionStore`] holds on to sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionLimits {
    /// Lifetime of a session that was never submitted, from creation.
    pub open_ttl_secs: u64,
    /// Lifetime of a submitted session, from submission. Submitted sessions
    /// are finished; they only linger so results can still be read.
    pub submitted_ttl_secs: u64,
    /// Most sessions held at once.
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            open_ttl_secs: 2 * 60 * 60,
            submitted_ttl_secs: 15 * 60,
            max_sessions: 10_000,
        }
    }
}

impl SessionLimits {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_sessions == 0 {
            return Err(CoreError::OutOfRange {
                field: "max_sessions".to_string(),
                value: 0,
                min: 1,
                max: i64::MAX,
            });
        }
        Ok(())
    }

    fn expired(&self, session: &ScreeningSession, now: Timestamp) -> bool {
        let ttl = if session.is_submitted() {
            self.submitted_ttl_secs
        } else {
            self.open_ttl_secs
        };
        let ttl = SignedDuration::from_secs(i64::try_from(ttl).unwrap_or(i64::MAX));
        now.duration_since(session.last_activity()) > ttl
    }
}

/// In-memory collection of sessions, keyed by id.
///
/// Sessions expire after [`SessionLimits`]; expired ones are swept whenever
/// a new session is opened. At capacity, submitted sessions make way first
/// (oldest submission first), then the oldest open sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, ScreeningSession>,
    limits: SessionLimits,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: HashMap::new(),
            limits,
        }
    }

    pub fn open(&mut self) -> &mut ScreeningSession {
        self.open_at(Timestamp::now())
    }

    /// Open a session created at `now`, making room for it first.
    pub fn open_at(&mut self, now: Timestamp) -> &mut ScreeningSession {
        self.evict_expired(now);
        while self.sessions.len() >= self.limits.max_sessions.max(1) {
            if self.evict_one().is_none() {
                break;
            }
        }
        let session = ScreeningSession::started_at(now);
        self.sessions.entry(session.id).or_insert(session)
    }

    /// Drop every session past its lifetime at `now`. Returns how many went.
    pub fn evict_expired(&mut self, now: Timestamp) -> usize {
        let before = self.sessions.len();
        let limits = self.limits;
        self.sessions.retain(|_, s| !limits.expired(s, now));
        before - self.sessions.len()
    }

    fn evict_one(&mut self) -> Option<ScreeningSession> {
        let victim = self
            .sessions
            .values()
            .min_by_key(|s| (!s.is_submitted(), s.last_activity()))
            .map(|s| s.id)?;
        self.sessions.remove(&victim)
    }

    pub fn get(&self, id: &Uuid) -> Option<&ScreeningSession> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut ScreeningSession> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<ScreeningSession> {
        self.sessions.remove(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
