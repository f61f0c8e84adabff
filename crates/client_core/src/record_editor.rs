//! Field sources for the create form and the per-row edit forms.

use std::{collections::HashMap, sync::Arc};

use shared::domain::{AdvertisementDraft, AdvertisementEdit, RecordId};
use tokio::sync::RwLock;

use crate::error::SubmissionError;

/// Read access to named input elements on the host page.
pub trait ElementSource: Send + Sync {
    fn value_of(&self, element_id: &str) -> Option<String>;
}

/// Fixed element values, for hosts without a live document.
#[derive(Debug, Default, Clone)]
pub struct StaticElements {
    values: HashMap<String, String>,
}

impl StaticElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, element_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(element_id.into(), value.into());
        self
    }

    pub fn set(&mut self, element_id: impl Into<String>, value: impl Into<String>) {
        self.values.insert(element_id.into(), value.into());
    }

    /// Fills the four elements named by `ids` from `fields`.
    pub fn with_fields(mut self, ids: &DomFieldIds, fields: &AdvertisementDraft) -> Self {
        self.set(ids.title.clone(), fields.title.clone());
        self.set(ids.number.clone(), fields.advertisement_number.clone());
        self.set(ids.url.clone(), fields.website_url.clone());
        self.set(ids.description.clone(), fields.description.clone());
        self
    }
}

impl ElementSource for StaticElements {
    fn value_of(&self, element_id: &str) -> Option<String> {
        self.values.get(element_id).cloned()
    }
}

/// Element ids of the four advertisement inputs on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomFieldIds {
    pub title: String,
    pub number: String,
    pub url: String,
    pub description: String,
}

impl DomFieldIds {
    pub fn create_form() -> Self {
        Self {
            title: "adv-title".to_string(),
            number: "adv-number".to_string(),
            url: "adv-web-url".to_string(),
            description: "adv-description".to_string(),
        }
    }

    pub fn update_row(id: &RecordId) -> Self {
        Self {
            title: format!("adv-titleUpdate-{id}"),
            number: format!("adv-numUpdate-{id}"),
            url: format!("adv-urlUpdate-{id}"),
            description: format!("adv-descUpdate-{id}"),
        }
    }

    pub fn read(&self, source: &dyn ElementSource) -> Result<AdvertisementDraft, SubmissionError> {
        Ok(AdvertisementDraft {
            title: read_element(source, &self.title)?,
            advertisement_number: read_element(source, &self.number)?,
            website_url: read_element(source, &self.url)?,
            description: read_element(source, &self.description)?,
        })
    }
}

pub fn update_modal_id(id: &RecordId) -> String {
    format!("updateModal{id}")
}

fn read_element(source: &dyn ElementSource, element_id: &str) -> Result<String, SubmissionError> {
    source
        .value_of(element_id)
        .ok_or_else(|| SubmissionError::MissingField {
            element_id: element_id.to_string(),
        })
}

/// Produces the draft for the create flow at submit time.
pub trait DraftForm: Send + Sync {
    fn read_draft(&self) -> Result<AdvertisementDraft, SubmissionError>;
}

impl DraftForm for AdvertisementDraft {
    fn read_draft(&self) -> Result<AdvertisementDraft, SubmissionError> {
        Ok(self.clone())
    }
}

pub struct DomDraftForm {
    source: Arc<dyn ElementSource>,
    ids: DomFieldIds,
}

impl DomDraftForm {
    pub fn new(source: Arc<dyn ElementSource>) -> Self {
        Self {
            source,
            ids: DomFieldIds::create_form(),
        }
    }
}

impl DraftForm for DomDraftForm {
    fn read_draft(&self) -> Result<AdvertisementDraft, SubmissionError> {
        self.ids.read(self.source.as_ref())
    }
}

/// Edit inputs and modal belonging to one record.
pub trait RecordEditor: Send + Sync {
    fn read_fields(&self) -> Result<AdvertisementDraft, SubmissionError>;
    fn modal_id(&self) -> String;
}

pub struct DomRecordEditor {
    source: Arc<dyn ElementSource>,
    ids: DomFieldIds,
    modal_id: String,
}

impl DomRecordEditor {
    pub fn for_record(source: Arc<dyn ElementSource>, id: &RecordId) -> Self {
        Self {
            source,
            ids: DomFieldIds::update_row(id),
            modal_id: update_modal_id(id),
        }
    }
}

impl RecordEditor for DomRecordEditor {
    fn read_fields(&self) -> Result<AdvertisementDraft, SubmissionError> {
        self.ids.read(self.source.as_ref())
    }

    fn modal_id(&self) -> String {
        self.modal_id.clone()
    }
}

/// Maps each record id on the dashboard to its editor.
#[derive(Default)]
pub struct EditorRegistry {
    editors: RwLock<HashMap<RecordId, Arc<dyn RecordEditor>>>,
}

impl EditorRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers a DOM-backed editor for every row id.
    pub async fn from_dom(
        source: Arc<dyn ElementSource>,
        ids: impl IntoIterator<Item = RecordId>,
    ) -> Arc<Self> {
        let registry = Self::new();
        for id in ids {
            let editor = DomRecordEditor::for_record(Arc::clone(&source), &id);
            registry.register(id, Arc::new(editor)).await;
        }
        registry
    }

    pub async fn register(&self, id: RecordId, editor: Arc<dyn RecordEditor>) {
        self.editors.write().await.insert(id, editor);
    }

    pub async fn remove(&self, id: &RecordId) -> bool {
        self.editors.write().await.remove(id).is_some()
    }

    pub async fn contains(&self, id: &RecordId) -> bool {
        self.editors.read().await.contains_key(id)
    }

    pub async fn resolve(&self, id: &RecordId) -> Result<Arc<dyn RecordEditor>, SubmissionError> {
        self.editors
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SubmissionError::UnknownRecord(id.clone()))
    }

    /// Reads the current edit values for `id` together with its modal id.
    pub async fn read_edit(
        &self,
        id: &RecordId,
    ) -> Result<(AdvertisementEdit, String), SubmissionError> {
        let editor = self.resolve(id).await?;
        let fields = editor.read_fields()?;
        Ok((AdvertisementEdit::new(id.clone(), fields), editor.modal_id()))
    }
}

#[cfg(test)]
#[path = "tests/record_editor_tests.rs"]
mod tests;
