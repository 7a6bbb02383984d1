//! Create/edit form state for one record.

use assetry_core::{EntityId, Patch, Record};
use serde_json::Value;

use crate::console::Console;
use crate::stores::Tracked;
use crate::{Error, Result};

/// Error shown on a form after a failed submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    /// Offending field, when the error is about one
    pub field: Option<String>,
    /// Message for the operator
    pub message: String,
}

impl From<&Error> for FormError {
    fn from(err: &Error) -> Self {
        Self {
            field: err.field().map(str::to_string),
            message: err.to_string(),
        }
    }
}

/// What a successful submit did.
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted<E> {
    /// A new record was stored.
    Created(Record<E>),
    /// An existing record was patched.
    Updated(EntityId),
    /// The draft matched the original; nothing was sent.
    Unchanged(EntityId),
}

/// A form owning one draft.
///
/// Created with [`create`](Self::create) (blank defaults) or
/// [`edit`](Self::edit) (full copy of a stored record). A failed submit
/// keeps the form open with the draft intact.
#[derive(Debug, Clone)]
pub struct FormController<E> {
    original: Option<Record<E>>,
    draft: E,
    error: Option<FormError>,
    open: bool,
}

impl<E: Tracked> FormController<E> {
    /// A blank form for a new record.
    pub fn create() -> Self {
        Self {
            original: None,
            draft: E::default(),
            error: None,
            open: true,
        }
    }

    /// A form editing a copy of `record`.
    pub fn edit(record: Record<E>) -> Self {
        Self {
            draft: record.fields.clone(),
            original: Some(record),
            error: None,
            open: true,
        }
    }

    /// Returns `true` when editing an existing record.
    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    /// Returns `true` until a submit succeeds or the form is cancelled.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The current draft.
    pub fn draft(&self) -> &E {
        &self.draft
    }

    /// Mutable draft for direct field edits.
    pub fn draft_mut(&mut self) -> &mut E {
        &mut self.draft
    }

    /// Sets one field by UI path.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let patch = Patch::<E>::new().set(field, value);
        patch.validate()?;
        self.draft = patch.apply(&self.draft)?;
        Ok(())
    }

    /// Error from the last failed submit.
    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    /// Validates and persists the draft.
    ///
    /// Validation failures send nothing. Any failure is recorded on the
    /// form, which stays open with its draft.
    pub async fn submit(&mut self, console: &Console) -> Result<Submitted<E>> {
        if !self.open {
            return Err(assetry_core::Error::validation("Form is closed").into());
        }
        match self.persist(console).await {
            Ok(done) => {
                self.error = None;
                self.open = false;
                Ok(done)
            }
            Err(e) => {
                tracing::debug!(kind = %E::KIND, error = %e, "Submit failed, form stays open");
                self.error = Some(FormError::from(&e));
                Err(e)
            }
        }
    }

    async fn persist(&self, console: &Console) -> Result<Submitted<E>> {
        self.draft.validate()?;
        match &self.original {
            None => Ok(Submitted::Created(console.create(self.draft.clone()).await?)),
            Some(original) => {
                let patch = Patch::diff(&original.fields, &self.draft)?;
                if patch.is_empty() {
                    return Ok(Submitted::Unchanged(original.id.clone()));
                }
                console.update(&original.id, &patch).await?;
                Ok(Submitted::Updated(original.id.clone()))
            }
        }
    }

    /// Discards the form and its draft.
    pub fn cancel(self) {
        tracing::trace!(kind = %E::KIND, "Form cancelled");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use assetry_client::{Gateway, MemoryStore, RemoteStore};
    use assetry_core::model::{Asset, Person};
    use assetry_storage::MemoryCache;
    use std::sync::Arc;

    fn console() -> (Arc<MemoryStore>, Console) {
        let store = Arc::new(MemoryStore::new());
        let remote: Arc<dyn RemoteStore> = store.clone();
        (
            store,
            Console::new(Gateway::new(remote), Arc::new(MemoryCache::new())),
        )
    }

    #[tokio::test]
    async fn test_invalid_draft_sends_nothing_and_stays_open() {
        let (store, console) = console();
        let mut form = FormController::<Person>::create();
        form.set("firstName", "Ada").unwrap();

        let err = form.submit(&console).await.unwrap_err();
        assert!(err.is_validation());
        assert!(form.is_open());
        assert_eq!(form.draft().first_name, "Ada");
        assert_eq!(form.error().unwrap().field.as_deref(), Some("lastName"));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_closes_form() {
        let (_, console) = console();
        let mut form = FormController::<Asset>::create();
        form.set("name", "Laptop-01").unwrap();
        form.set("tag", "A-1001").unwrap();
        let done = form.submit(&console).await.unwrap();
        assert!(matches!(done, Submitted::Created(_)));
        assert!(!form.is_open());
        assert_eq!(console.list::<Asset>().await.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_sends_only_the_diff() {
        let (store, console) = console();
        let created = console
            .create(Asset {
                name: "Laptop-01".into(),
                tag: "A-1001".into(),
                ..Asset::default()
            })
            .await
            .unwrap();

        let mut form = FormController::edit(created.clone());
        assert!(matches!(
            form.clone().submit(&console).await.unwrap(),
            Submitted::Unchanged(_)
        ));

        form.set("purchaseCost", 1200.0).unwrap();
        form.submit(&console).await.unwrap();
        let row = &store.rows("assets")[0];
        assert_eq!(row["purchase_cost"], 1200.0);
        let local = console.get::<Asset>(&created.id).await.unwrap();
        assert_eq!(local.purchase_cost, Some(1200.0));
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_draft() {
        let (store, console) = console();
        store.set_available(false);
        let mut form = FormController::<Asset>::create();
        form.set("name", "Dock").unwrap();
        form.set("tag", "D-1").unwrap();
        assert!(form.submit(&console).await.unwrap_err().is_remote());
        assert!(form.is_open());
        assert_eq!(form.draft().name, "Dock");
        assert!(form.error().is_some());
    }

    #[test]
    fn test_set_rejects_unknown_field() {
        let mut form = FormController::<Asset>::create();
        assert!(form.set("colour", "red").is_err());
    }
}
