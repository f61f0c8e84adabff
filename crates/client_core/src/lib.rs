use std::{sync::Arc, time::Duration};

use shared::{
    domain::{AdvertisementDraft, RecordId},
    protocol::{CreateAdvertisementRequest, SubmissionOutcome, UpdateAdvertisementRequest},
};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

pub mod config;
pub mod error;
pub mod record_editor;
pub mod spinner;
pub mod transport;

pub use config::{CreateFailurePolicy, Endpoints, Settings};
pub use error::{SubmissionError, TransportError};
pub use record_editor::{
    DomDraftForm, DomFieldIds, DomRecordEditor, DraftForm, EditorRegistry, ElementSource,
    RecordEditor, StaticElements,
};
pub use spinner::{Spinner, SpinnerGuard};
pub use transport::{BodyEncoding, HttpTransport, RequestBody, Transport};

pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_secs(1);

const UPDATE_CONFIRMATION: &str = "Advertisement updated successfully!";
const DELETE_CONFIRMATION: &str = "Advertisement deleted successfully!";

/// User-visible effects on the host page.
pub trait Page: Send + Sync {
    fn navigate(&self, url: &Url);
    fn reload(&self);
    /// Blocking notice shown to the user.
    fn alert(&self, message: &str);
    fn hide_modal(&self, modal_id: &str);
}

/// How a single request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Responded(SubmissionOutcome),
    TransportFailed(TransportError),
}

impl Settlement {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Responded(outcome) if outcome.is_success())
    }
}

#[derive(Debug)]
pub struct UpdateReport {
    pub settlement: Settlement,
    /// Pending page reload, present whenever the server answered.
    pub reload: Option<JoinHandle<()>>,
}

/// Entry point wiring the submission flows to one transport, page and set of
/// endpoints.
#[derive(Clone)]
pub struct DashboardClient {
    transport: Arc<dyn Transport>,
    page: Arc<dyn Page>,
    endpoints: Arc<Endpoints>,
    spinner: Arc<Spinner>,
}

impl DashboardClient {
    pub fn new(endpoints: Endpoints, page: Arc<dyn Page>) -> Self {
        Self::new_with_dependencies(endpoints, Arc::new(HttpTransport::new()), page)
    }

    pub fn new_with_dependencies(
        endpoints: Endpoints,
        transport: Arc<dyn Transport>,
        page: Arc<dyn Page>,
    ) -> Self {
        Self {
            transport,
            page,
            endpoints: Arc::new(endpoints),
            spinner: Spinner::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn spinner(&self) -> Arc<Spinner> {
        Arc::clone(&self.spinner)
    }

    pub fn create(&self) -> CreateSubmission {
        CreateSubmission {
            client: self.clone(),
            encoding: BodyEncoding::Form,
            failure_policy: CreateFailurePolicy::RedirectToDashboard,
            use_spinner: false,
        }
    }

    pub fn update(&self, editors: Arc<EditorRegistry>) -> UpdateSubmission {
        UpdateSubmission {
            client: self.clone(),
            editors,
            reload_delay: DEFAULT_RELOAD_DELAY,
            use_spinner: false,
        }
    }

    pub fn delete(&self) -> DeleteSubmission {
        DeleteSubmission {
            client: self.clone(),
            editors: None,
        }
    }

    /// Sends one POST and normalizes whatever comes back. The spinner, when
    /// used, is lowered here as soon as the request settles.
    async fn post_once(&self, url: &Url, body: RequestBody, use_spinner: bool) -> Settlement {
        let _pending = use_spinner.then(|| self.spinner.raise());

        let answer = self.transport.post(url, body).await;
        settle(url, answer.map(|body| SubmissionOutcome::from_body(&body)))
    }

    /// Bodiless GET. A reply without JSON is read as a plain success.
    async fn get_once(&self, url: &Url) -> Settlement {
        let answer = self.transport.get(url).await;
        settle(
            url,
            answer.map(|body| match body {
                Some(body) => SubmissionOutcome::from_body(&body),
                None => SubmissionOutcome::Success { message: None },
            }),
        )
    }
}

fn settle(url: &Url, answer: Result<SubmissionOutcome, TransportError>) -> Settlement {
    match answer {
        Ok(outcome) => {
            info!(url = %url, success = outcome.is_success(), "submission settled");
            Settlement::Responded(outcome)
        }
        Err(err) => {
            error!(url = %url, "submission transport failure: {err}");
            Settlement::TransportFailed(err)
        }
    }
}

pub struct CreateSubmission {
    client: DashboardClient,
    encoding: BodyEncoding,
    failure_policy: CreateFailurePolicy,
    use_spinner: bool,
}

impl CreateSubmission {
    pub fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: CreateFailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub fn with_spinner(mut self) -> Self {
        self.use_spinner = true;
        self
    }

    /// Reads the form and submits it.
    pub async fn submit_form(&self, form: &dyn DraftForm) -> Result<Settlement, SubmissionError> {
        let draft = form.read_draft()?;
        self.submit(&draft).await
    }

    /// Posts `draft` to the create endpoint. Every call sends its own request.
    pub async fn submit(&self, draft: &AdvertisementDraft) -> Result<Settlement, SubmissionError> {
        let endpoints = &self.client.endpoints;
        let body = RequestBody::encode(self.encoding, &CreateAdvertisementRequest::from(draft))?;
        info!(
            url = %endpoints.create,
            advertisement_number = %draft.advertisement_number,
            "submitting new advertisement"
        );

        let settlement = self
            .client
            .post_once(&endpoints.create, body, self.use_spinner)
            .await;

        let page = &self.client.page;
        match &settlement {
            Settlement::Responded(SubmissionOutcome::Success { .. }) => {
                page.navigate(&endpoints.dashboard);
            }
            Settlement::Responded(SubmissionOutcome::Failure { reason }) => {
                warn!(reason = %reason, "advertisement was not created");
                page.alert(&format!("Could not add advertisement: {reason}"));
            }
            Settlement::TransportFailed(err) => match self.failure_policy {
                CreateFailurePolicy::RedirectToDashboard => page.navigate(&endpoints.dashboard),
                CreateFailurePolicy::StayOnForm => {
                    page.alert(&format!("Could not reach the server: {err}"));
                }
            },
        }

        Ok(settlement)
    }
}

pub struct UpdateSubmission {
    client: DashboardClient,
    editors: Arc<EditorRegistry>,
    reload_delay: Duration,
    use_spinner: bool,
}

impl UpdateSubmission {
    pub fn with_reload_delay(mut self, reload_delay: Duration) -> Self {
        self.reload_delay = reload_delay;
        self
    }

    pub fn with_spinner(mut self) -> Self {
        self.use_spinner = true;
        self
    }

    /// Submits the edit inputs of record `id`.
    ///
    /// Any server answer schedules a page reload before the outcome is acted
    /// on, so a reload follows rejections as well.
    pub async fn submit(&self, id: &RecordId) -> Result<UpdateReport, SubmissionError> {
        let (edit, modal_id) = self.editors.read_edit(id).await?;
        let body = RequestBody::json(&UpdateAdvertisementRequest::from(&edit))?;
        let url = &self.client.endpoints.update;
        info!(url = %url, record_id = %id, "submitting advertisement update");

        let settlement = self.client.post_once(url, body, self.use_spinner).await;

        let page = &self.client.page;
        let reload = match &settlement {
            Settlement::Responded(_) => Some(self.schedule_reload()),
            Settlement::TransportFailed(_) => None,
        };

        match &settlement {
            Settlement::Responded(SubmissionOutcome::Success { message }) => {
                page.alert(message.as_deref().unwrap_or(UPDATE_CONFIRMATION));
                page.hide_modal(&modal_id);
            }
            Settlement::Responded(SubmissionOutcome::Failure { reason }) => {
                warn!(record_id = %id, reason = %reason, "advertisement update rejected");
                page.alert(&format!("Error: {reason}"));
            }
            Settlement::TransportFailed(err) => {
                page.alert(&format!("Could not reach the server: {err}"));
            }
        }

        Ok(UpdateReport { settlement, reload })
    }

    fn schedule_reload(&self) -> JoinHandle<()> {
        let page = Arc::clone(&self.client.page);
        let delay = self.reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            page.reload();
        })
    }
}

pub struct DeleteSubmission {
    client: DashboardClient,
    editors: Option<Arc<EditorRegistry>>,
}

impl DeleteSubmission {
    /// Unregisters the row's editor once the server confirms the delete.
    pub fn with_editors(mut self, editors: Arc<EditorRegistry>) -> Self {
        self.editors = Some(editors);
        self
    }

    pub async fn submit(&self, id: &RecordId) -> Result<Settlement, SubmissionError> {
        let url = self.client.endpoints.delete_target(id)?;
        info!(url = %url, record_id = %id, "submitting advertisement delete");

        let settlement = self.client.get_once(&url).await;

        let page = &self.client.page;
        match &settlement {
            Settlement::Responded(SubmissionOutcome::Success { message }) => {
                if let Some(editors) = &self.editors {
                    editors.remove(id).await;
                }
                page.alert(message.as_deref().unwrap_or(DELETE_CONFIRMATION));
                page.reload();
            }
            Settlement::Responded(SubmissionOutcome::Failure { reason }) => {
                warn!(record_id = %id, reason = %reason, "advertisement delete rejected");
                page.alert(&format!("There was a problem deleting the advertisement: {reason}"));
            }
            Settlement::TransportFailed(err) => {
                page.alert(&format!("Could not reach the server: {err}"));
            }
        }

        Ok(settlement)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
