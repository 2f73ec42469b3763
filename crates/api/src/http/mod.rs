mod sse;

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use studysync_core::model::{
    AssessmentId, CreationRequest, Dashboard, IcsFile, LearningPathId, LearningPathListItem,
    ModuleId, ModuleQuiz, ProficiencyQuestion, QuizEvaluation, SessionCompletion, StudySession,
    StudySessionId, Topic,
};
use tracing::debug;
use url::Url;

use crate::client::{ApiError, AssessmentApi, LearningPathApi, PayloadStream, ScheduleApi};

pub use sse::{SseDecoder, payload_stream};

/// reqwest-backed client for the StudySync backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `ApiError::Url` if `base_url` does not parse, or
    /// `ApiError::Request` if it cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), base_url)
    }

    /// # Errors
    ///
    /// Same as [`HttpBackend::new`].
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Request(format!(
                "{base_url} cannot be used as a base url"
            )));
        }
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Request("base url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn quiz_endpoint(
        &self,
        segments: &[&str],
        learning_path_id: &LearningPathId,
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .append_pair("learning_path_id", learning_path_id.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        read_json(response).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::HttpStatus {
        status: status.as_u16(),
        detail: error_detail(&body),
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = ensure_success(response).await?.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Pull `detail` out of a JSON error body, or fall back to the raw text.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[derive(Debug, Serialize)]
struct ProficiencyRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProficiencyResponse {
    #[serde(default)]
    questions: Vec<ProficiencyQuestion>,
}

#[derive(Debug, Serialize)]
struct QuizSubmission<'a> {
    responses: &'a BTreeMap<String, String>,
}

#[async_trait]
impl AssessmentApi for HttpBackend {
    async fn proficiency_questions(
        &self,
        topic: &Topic,
    ) -> Result<Vec<ProficiencyQuestion>, ApiError> {
        let url = self.endpoint(&["assessments", "proficiency"])?;
        let body: ProficiencyResponse = self
            .post_json(url, &ProficiencyRequest {
                topic: topic.as_str(),
            })
            .await?;
        Ok(body.questions)
    }

    async fn module_quiz(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError> {
        let url =
            self.quiz_endpoint(&["assessments", "quiz", module_id.as_str()], learning_path_id)?;
        self.get_json(url).await
    }

    async fn quiz_results(
        &self,
        module_id: &ModuleId,
        learning_path_id: &LearningPathId,
    ) -> Result<ModuleQuiz, ApiError> {
        let url = self.quiz_endpoint(
            &["assessments", "quiz", module_id.as_str(), "results"],
            learning_path_id,
        )?;
        self.get_json(url).await
    }

    async fn submit_quiz(
        &self,
        assessment_id: &AssessmentId,
        responses: &BTreeMap<String, String>,
    ) -> Result<QuizEvaluation, ApiError> {
        let url = self.endpoint(&["assessments", "quiz", assessment_id.as_str(), "submit"])?;
        self.post_json(url, &QuizSubmission { responses }).await
    }
}

#[async_trait]
impl LearningPathApi for HttpBackend {
    async fn list_learning_paths(&self) -> Result<Vec<LearningPathListItem>, ApiError> {
        let url = self.endpoint(&["learning-paths"])?;
        self.get_json(url).await
    }

    async fn dashboard(&self, id: &LearningPathId) -> Result<Dashboard, ApiError> {
        let url = self.endpoint(&["learning-paths", id.as_str(), "dashboard"])?;
        self.get_json(url).await
    }

    async fn sessions(&self, id: &LearningPathId) -> Result<Vec<StudySession>, ApiError> {
        let url = self.endpoint(&["learning-paths", id.as_str(), "sessions"])?;
        self.get_json(url).await
    }

    async fn creation_stream(&self, request: &CreationRequest) -> Result<PayloadStream, ApiError> {
        let pairs = request
            .query_pairs()
            .map_err(|err| ApiError::Request(err.to_string()))?;
        let mut url = self.endpoint(&["learning-paths", "create", "stream"])?;
        url.query_pairs_mut().extend_pairs(pairs);
        debug!(attempt = %request.attempt, %url, "opening creation stream");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(payload_stream(response.bytes_stream()))
    }
}

#[async_trait]
impl ScheduleApi for HttpBackend {
    async fn session(&self, id: &StudySessionId) -> Result<StudySession, ApiError> {
        let url = self.endpoint(&["schedule", "sessions", id.as_str()])?;
        self.get_json(url).await
    }

    async fn complete_session(&self, id: &StudySessionId, notes: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["schedule", "sessions", id.as_str(), "complete"])?;
        debug!(%url, "POST");
        let body = SessionCompletion {
            notes: notes.to_string(),
        };
        let response = self.client.post(url).json(&body).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn export_ics(&self, learning_path_id: &LearningPathId) -> Result<IcsFile, ApiError> {
        let url = self.endpoint(&["schedule", learning_path_id.as_str(), "ics"])?;
        debug!(%url, "GET");
        let response = ensure_success(self.client.get(url).send().await?).await?;
        let suggested_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(disposition_filename);
        let contents = response.bytes().await?.to_vec();
        Ok(IcsFile {
            suggested_name,
            contents,
        })
    }
}
