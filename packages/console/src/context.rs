//! Console state around one [`ObjectManager`].
//!
//! The console is synchronous. Each operation runs to completion on a
//! current-thread tokio runtime owned by the context, and the status
//! messages it produced are collected in a [`RecordingSink`] until the loop
//! drains them.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use restcrud_core::{
    ConfigError, ManagerConfig, ObjectManager, RecordingSink, Resource, WeakSink,
};
use restcrud_http::{HttpExecutor, ReqwestExecutor};

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

pub struct ConsoleContext<E = ReqwestExecutor> {
    runtime: Runtime,
    manager: ObjectManager<E>,
    messages: Arc<RecordingSink>,
}

impl ConsoleContext<ReqwestExecutor> {
    pub fn connect(config: ManagerConfig) -> Result<Self, ContextError> {
        let executor = ReqwestExecutor::new(config.timeout()).map_err(ConfigError::from)?;
        Self::with_executor(config, executor)
    }
}

impl<E: HttpExecutor> ConsoleContext<E> {
    pub fn with_executor(config: ManagerConfig, executor: E) -> Result<Self, ContextError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let messages = Arc::new(RecordingSink::new());
        // The manager only sees the console's sink weakly.
        let sink = Arc::new(WeakSink::new(&messages));
        let manager = ObjectManager::with_executor(config, executor, sink);

        Ok(Self {
            runtime,
            manager,
            messages,
        })
    }

    pub fn manager(&self) -> &ObjectManager<E> {
        &self.manager
    }

    /// Run one manager operation to completion.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Status messages produced since the last drain.
    pub fn drain_messages(&self) -> Vec<String> {
        self.messages.drain()
    }

    /// Resolve a `<n|id>` argument to an object id.
    ///
    /// A number between 1 and the list length selects that row of the last
    /// list. Anything else is taken as an id.
    pub fn resolve_target(&self, target: &str) -> String {
        let target = target.trim();
        let collection = self.manager.collection();
        target
            .parse::<usize>()
            .ok()
            .and_then(|row| collection.row(row))
            .map(|resource| resource.id().to_string())
            .unwrap_or_else(|| target.to_string())
    }

    /// Like [`ConsoleContext::resolve_target`] but returns the listed object.
    pub fn lookup(&self, target: &str) -> Option<Resource> {
        let id = self.resolve_target(target);
        self.manager.collection().find(&id).cloned()
    }
}
