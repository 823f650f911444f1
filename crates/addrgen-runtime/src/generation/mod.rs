//! Generation process management.
//!
//! `GenerationService` is the facade adapters talk to. It composes the
//! launcher, lifecycle tracker, cancellation controller and stream publisher
//! around one injected `ProcessRegistry`.
//!
//! # Structure
//!
//! - `launcher` - spawns the generator and wires its observers
//! - `tracker` - owns the `Child`, delivers signals and records the exit
//! - `cancel` - optimistic `cancelled` flip plus SIGTERM → SIGKILL
//! - `stream` - per-subscriber event streams

mod cancel;
mod launcher;
mod stream;
mod tracker;

use std::sync::Arc;

use addrgen_core::{
    CancelResponse, Country, CountryDirectoryPort, GenerationError, GeneratorSettings, ProcessId,
    ProcessRecord, ProcessStatus, StartGenerationRequest, StartGenerationResponse, StreamEvent,
};
use futures_util::Stream;
use tracing::{debug, warn};

use crate::registry::ProcessRegistry;
use launcher::LaunchParams;

/// Launches, tracks, cancels and streams generator processes.
pub struct GenerationService {
    registry: Arc<ProcessRegistry>,
    directory: Arc<dyn CountryDirectoryPort>,
    settings: GeneratorSettings,
}

impl GenerationService {
    /// Create a service with its own registry sized from `settings`.
    pub fn new(settings: GeneratorSettings, directory: Arc<dyn CountryDirectoryPort>) -> Self {
        let registry = Arc::new(ProcessRegistry::new(
            settings.max_retained,
            settings.event_capacity,
        ));
        Self::with_registry(settings, directory, registry)
    }

    /// Create a service around an existing registry.
    pub fn with_registry(
        settings: GeneratorSettings,
        directory: Arc<dyn CountryDirectoryPort>,
        registry: Arc<ProcessRegistry>,
    ) -> Self {
        Self {
            registry,
            directory,
            settings,
        }
    }

    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Validate the request and launch the generator.
    ///
    /// Returns as soon as the process is spawned (or failed to spawn). A
    /// spawn failure is recorded on the process, not returned here.
    pub async fn start_generation(
        &self,
        request: &StartGenerationRequest,
    ) -> Result<StartGenerationResponse, GenerationError> {
        let request = request.validate()?;
        let country_name = self.resolve_country_name(&request.country_code).await;

        let process_id = launcher::launch(
            &self.registry,
            &self.settings,
            LaunchParams {
                country_code: request.country_code.clone(),
                country_name: country_name.clone(),
                count: request.count,
            },
        );

        Ok(StartGenerationResponse::started(
            process_id,
            request.country_code,
            country_name,
            request.count,
        ))
    }

    async fn resolve_country_name(&self, code: &str) -> String {
        match self.directory.lookup(code).await {
            Ok(Some(country)) => country.name,
            Ok(None) => {
                debug!(country_code = %code, "Unknown country code, using code as name");
                code.to_string()
            }
            Err(e) => {
                warn!(country_code = %code, error = %e, "Country lookup failed, using code as name");
                code.to_string()
            }
        }
    }

    /// All tracked processes, newest first.
    pub fn list_processes(&self) -> Vec<ProcessRecord> {
        let mut records = self.registry.list();
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        records
    }

    /// One process, including its full stdout history.
    pub fn get_process(&self, process_id: &ProcessId) -> Result<ProcessRecord, GenerationError> {
        self.registry
            .get(process_id)
            .ok_or_else(|| GenerationError::NotFound(process_id.clone()))
    }

    /// Cancel a running process.
    ///
    /// The status is `cancelled` when this returns; the OS process may still
    /// be shutting down.
    pub fn cancel_process(
        &self,
        process_id: &ProcessId,
    ) -> Result<CancelResponse, GenerationError> {
        cancel::cancel(&self.registry, process_id, self.settings.kill_grace())?;
        Ok(CancelResponse {
            process_id: process_id.clone(),
            status: ProcessStatus::Cancelled,
        })
    }

    /// Follow a process's output.
    ///
    /// Starts with a `status` event and ends with `complete`. Late
    /// subscribers only see live events; history is on the record.
    pub fn stream_process(
        &self,
        process_id: &ProcessId,
    ) -> Result<impl Stream<Item = StreamEvent> + Send + use<>, GenerationError> {
        let subscription = self
            .registry
            .subscribe(process_id)
            .ok_or_else(|| GenerationError::NotFound(process_id.clone()))?;
        Ok(stream::event_stream(subscription))
    }

    pub async fn list_countries(&self) -> Result<Vec<Country>, GenerationError> {
        self.directory.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use addrgen_core::StaticCountryDirectory;
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use mockall::mock;

    mock! {
        Directory {}

        #[async_trait]
        impl CountryDirectoryPort for Directory {
            async fn lookup(&self, code: &str) -> Result<Option<Country>, GenerationError>;
            async fn list(&self) -> Result<Vec<Country>, GenerationError>;
        }
    }

    fn settings() -> GeneratorSettings {
        GeneratorSettings::for_program("/nonexistent/generator").with_working_dir(".")
    }

    #[tokio::test]
    async fn directory_failure_falls_back_to_code() {
        let mut directory = MockDirectory::new();
        directory
            .expect_lookup()
            .returning(|_| Err(GenerationError::Directory("unreadable".into())));

        let service = GenerationService::new(settings(), Arc::new(directory));
        let response = service
            .start_generation(&StartGenerationRequest::new("br", 3))
            .await
            .unwrap();

        assert_eq!(response.country_code, "BR");
        assert_eq!(response.country_name, "BR");
        assert_eq!(response.status, "started");
    }

    #[tokio::test]
    async fn known_code_resolves_display_name() {
        let directory = StaticCountryDirectory::new([Country::new("JP", "Japan")]);
        let service = GenerationService::new(settings(), Arc::new(directory));

        let response = service
            .start_generation(&StartGenerationRequest::new("jp", 1))
            .await
            .unwrap();
        assert_eq!(response.country_name, "Japan");
    }

    #[tokio::test]
    async fn validation_failure_creates_nothing() {
        let mut directory = MockDirectory::new();
        directory.expect_lookup().never();

        let service = GenerationService::new(settings(), Arc::new(directory));
        assert!(service
            .start_generation(&StartGenerationRequest::new("U", 10))
            .await
            .is_err());
        assert!(service
            .start_generation(&StartGenerationRequest::new("US", 0))
            .await
            .is_err());
        assert!(service.registry().is_empty());
    }

    #[tokio::test]
    async fn stream_outlives_the_request_borrows() {
        let directory = StaticCountryDirectory::new([Country::new("US", "United States")]);
        let service = Arc::new(GenerationService::new(settings(), Arc::new(directory)));
        let started = service
            .start_generation(&StartGenerationRequest::new("US", 1))
            .await
            .unwrap();

        // Neither the service handle nor the id outlives this block.
        let events = {
            let service = Arc::clone(&service);
            let id = ProcessId::from(started.process_id.as_str());
            service.stream_process(&id).unwrap()
        };
        let events = tokio::spawn(events.collect::<Vec<_>>()).await.unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            StreamEvent::Status {
                status: ProcessStatus::Error,
                ..
            }
        ));
        assert!(events[1].is_complete());
    }
}
