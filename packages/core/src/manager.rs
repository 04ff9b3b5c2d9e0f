//! CRUD orchestration over one remote collection.
//!
//! [`ObjectManager`] owns the collection mirror, the pending edit and the
//! per-operation status. Callers read snapshots and change state only through
//! the operations below. Each request is a single await; no lock is held
//! across it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use restcrud_codec::{lenient, JsonCodec};
use restcrud_http::{HttpExecutor, HttpRequest, HttpResponse, ReqwestExecutor, RequestOutcome};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ManagerConfig;
use crate::error::{ConfigError, CrudError, Result};
use crate::fields::DataFields;
use crate::model::{Resource, ResourceCollection};
use crate::operation::{OperationKind, OperationStatus};
use crate::status::StatusSink;

/// Body some servers send back for a delete.
#[derive(Debug, Default, Deserialize)]
struct DeleteReceipt {
    #[serde(default, deserialize_with = "lenient::option_string")]
    message: Option<String>,
}

/// Typed CRUD client for a collection of [`Resource`]s.
pub struct ObjectManager<E = ReqwestExecutor> {
    executor: E,
    codec: JsonCodec,
    config: ManagerConfig,
    sink: Arc<dyn StatusSink>,
    collection: RwLock<ResourceCollection>,
    pending_edit: Mutex<Option<Resource>>,
    operations: Mutex<HashMap<OperationKind, OperationStatus>>,
}

impl ObjectManager<ReqwestExecutor> {
    /// Manager backed by a reqwest client using the configured timeout.
    pub fn connect(
        config: ManagerConfig,
        sink: Arc<dyn StatusSink>,
    ) -> std::result::Result<Self, ConfigError> {
        let executor = ReqwestExecutor::new(config.timeout())?;
        Ok(Self::with_executor(config, executor, sink))
    }
}

impl<E: HttpExecutor> ObjectManager<E> {
    pub fn with_executor(config: ManagerConfig, executor: E, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            executor,
            codec: JsonCodec::new(),
            config,
            sink,
            collection: RwLock::new(ResourceCollection::default()),
            pending_edit: Mutex::new(None),
            operations: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The collection as of the last successful list.
    pub fn collection(&self) -> ResourceCollection {
        self.collection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn pending_edit(&self) -> Option<Resource> {
        self.pending_edit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Status of the most recent operation of `kind`.
    pub fn operation_status(&self, kind: OperationKind) -> OperationStatus {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| OperationStatus::idle(kind))
    }

    /// Reload the collection from the server.
    ///
    /// On success the collection is replaced as a whole. On failure it is
    /// left as it was.
    pub async fn list(&self) -> Result<ResourceCollection> {
        self.run(OperationKind::List, self.load(), |collection| {
            format!("Loaded {} objects", collection.len())
        })
        .await
    }

    /// Read one resource without touching the collection.
    pub async fn fetch(&self, id: &str) -> Result<Resource> {
        self.run(OperationKind::Fetch, self.get_one(id), |resource| {
            format!("Fetched '{}' (id {})", resource.name(), resource.id())
        })
        .await
    }

    /// Create a resource from a name and ad-hoc field text, then reload.
    pub async fn create(&self, name: &str, fields_text: &str) -> Result<Resource> {
        let created = self
            .run(
                OperationKind::Create,
                self.post_draft(name, fields_text),
                |resource| format!("Created '{}' (id {})", resource.name(), resource.id()),
            )
            .await?;

        self.refresh_after(OperationKind::Create).await;
        Ok(created)
    }

    /// Replace the resource `id` with a new name and fields, then reload.
    pub async fn update(&self, id: &str, name: &str, fields_text: &str) -> Result<Resource> {
        self.replace(id, name, self.parse_fields(fields_text)).await
    }

    async fn replace(&self, id: &str, name: &str, data: DataFields) -> Result<Resource> {
        let updated = self
            .run(
                OperationKind::Update,
                self.put_record(id, name, data),
                |resource| format!("Updated '{}' (id {})", resource.name(), resource.id()),
            )
            .await?;

        self.refresh_after(OperationKind::Update).await;
        Ok(updated)
    }

    /// Delete the resource `id`, then reload.
    ///
    /// Deleting the resource under edit ends the edit.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.trim();
        self.run(OperationKind::Delete, self.delete_one(id), |message| {
            match message {
                Some(message) => message.clone(),
                None => format!("Deleted object {}", id),
            }
        })
        .await?;

        {
            let mut pending = self
                .pending_edit
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if pending.as_ref().is_some_and(|edit| edit.id() == id) {
                *pending = None;
            }
        }

        self.refresh_after(OperationKind::Delete).await;
        Ok(())
    }

    /// Start editing the resource `id` from the current collection.
    pub fn begin_edit(&self, id: &str) -> Result<Resource> {
        let resource = match self.collection().find(id.trim()) {
            Some(resource) => resource.clone(),
            None => {
                let err = CrudError::validation(format!(
                    "no object with id '{}' in the list",
                    id.trim()
                ));
                self.sink.notify(&err.to_string());
                return Err(err);
            }
        };

        *self
            .pending_edit
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(resource.clone());
        self.sink
            .notify(&format!("Editing '{}' (id {})", resource.name(), resource.id()));
        Ok(resource)
    }

    /// Drop the pending edit, returning it if there was one.
    pub fn cancel_edit(&self) -> Option<Resource> {
        let cancelled = self
            .pending_edit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(resource) = &cancelled {
            self.sink
                .notify(&format!("Stopped editing '{}'", resource.name()));
        }
        cancelled
    }

    /// Send the pending edit as an update.
    ///
    /// The edit stays pending if the update fails, so it can be retried.
    pub async fn save_edit(&self, name: &str, fields_text: &str) -> Result<Resource> {
        let data = self.parse_fields(fields_text);
        self.save_pending(name, move |_| data).await
    }

    /// Send the pending edit under `name` with its data fields unchanged.
    pub async fn save_edit_keeping_fields(&self, name: &str) -> Result<Resource> {
        self.save_pending(name, |pending| pending.data().clone()).await
    }

    async fn save_pending(
        &self,
        name: &str,
        data: impl FnOnce(&Resource) -> DataFields,
    ) -> Result<Resource> {
        let Some(pending) = self.pending_edit() else {
            let err = CrudError::validation("no object is being edited");
            self.sink.notify(&err.to_string());
            return Err(err);
        };

        let updated = self.replace(pending.id(), name, data(&pending)).await?;

        let mut current = self
            .pending_edit
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|edit| edit.id() == pending.id()) {
            *current = None;
        }
        Ok(updated)
    }

    fn parse_fields(&self, text: &str) -> DataFields {
        DataFields::parse_with(text, self.config.assignment())
    }

    async fn load(&self) -> Result<ResourceCollection> {
        let url = self.config.collection_url();
        let response = self.send(HttpRequest::get(url.as_str())).await?;
        let items: Vec<Resource> = self.decode(&response)?;

        let collection = ResourceCollection::new(items);
        *self
            .collection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = collection.clone();
        Ok(collection)
    }

    async fn get_one(&self, id: &str) -> Result<Resource> {
        let url = self.config.item_url(require_id(id)?)?;
        let response = self.send(HttpRequest::get(url.as_str())).await?;
        self.decode(&response)
    }

    async fn post_draft(&self, name: &str, fields_text: &str) -> Result<Resource> {
        let draft = Resource::draft(require_name(name)?, self.parse_fields(fields_text));
        let body = self.codec.encode(&draft)?;

        let url = self.config.collection_url();
        let response = self
            .send(HttpRequest::post(url.as_str()).with_json_body(body))
            .await?;
        self.decode_or(&response, draft)
    }

    async fn put_record(&self, id: &str, name: &str, data: DataFields) -> Result<Resource> {
        let id = require_id(id)?;
        let record = Resource::with_id(id, require_name(name)?, data);
        let body = self.codec.encode(&record)?;

        let url = self.config.item_url(id)?;
        let response = self
            .send(HttpRequest::put(url.as_str()).with_json_body(body))
            .await?;
        self.decode_or(&response, record)
    }

    /// Returns the server's confirmation message, if it sent one.
    async fn delete_one(&self, id: &str) -> Result<Option<String>> {
        let url = self.config.item_url(require_id(id)?)?;
        let response = self.send(HttpRequest::delete(url.as_str())).await?;
        // An empty or foreign body still means the delete went through.
        let receipt: DeleteReceipt = self.codec.decode(&response.body).unwrap_or_default();
        Ok(receipt.message)
    }

    /// Track `work` as an operation of `kind` and report its outcome.
    async fn run<T, F>(
        &self,
        kind: OperationKind,
        work: F,
        describe: impl FnOnce(&T) -> String,
    ) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.set_status(OperationStatus::requesting(kind));
        self.sink.notify(kind.progress_message());

        let result = work.await;

        match &result {
            Ok(value) => {
                let summary = describe(value);
                debug!(operation = %kind, "{}", summary);
                self.set_status(OperationStatus::applied(kind));
                self.sink.notify(&summary);
            }
            Err(err) => {
                warn!(operation = %kind, error = %err, "operation failed");
                self.set_status(OperationStatus::failed(kind, err.to_string()));
                self.sink
                    .notify(&format!("{}: {}", kind.failure_message(), err));
            }
        }
        result
    }

    fn set_status(&self, status: OperationStatus) {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(status.kind, status);
    }

    /// Reload after a successful mutation. A failed reload has already been
    /// reported by `list` and does not fail the mutation.
    async fn refresh_after(&self, kind: OperationKind) {
        if let Err(err) = self.list().await {
            debug!(operation = %kind, error = %err, "reload after mutation failed");
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = request.with_timeout(self.config.timeout());
        match self.executor.execute(&request).await {
            RequestOutcome::Success(response) => Ok(response),
            RequestOutcome::ConnectionFailure { message } => Err(CrudError::Connection { message }),
            RequestOutcome::ProtocolFailure(response) => Err(CrudError::Protocol {
                status: response.status,
                excerpt: self.codec.excerpt(&response.text()),
            }),
        }
    }

    fn decode<T: DeserializeOwned>(&self, response: &HttpResponse) -> Result<T> {
        Ok(self.codec.decode(&response.body)?)
    }

    /// Decode the echoed record, or keep `sent` when the body is empty.
    fn decode_or(&self, response: &HttpResponse, sent: Resource) -> Result<Resource> {
        if response.text().trim().is_empty() {
            return Ok(sent);
        }
        self.decode(response)
    }
}

fn require_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CrudError::validation("name is required"));
    }
    Ok(name)
}

fn require_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CrudError::validation("id is required"));
    }
    // URL path normalisation would turn these into the collection itself.
    if id == "." || id == ".." {
        return Err(CrudError::validation(format!("'{}' is not a valid id", id)));
    }
    Ok(id)
}
