//! In-memory [`AivenClient`] that records every call.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::aiven::{
    AivenClient, AivenClientError, CreateServiceInput, CreateServiceIntegrationInput,
    ServiceStatus, ServiceSummary,
};

/// A call received by [`FakeAivenClient`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AivenCall {
    CreateService(CreateServiceInput),
    GetServiceStatus(String),
    DeleteService(String),
    ListServices,
    CreateServiceIntegration(CreateServiceIntegrationInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOperation {
    CreateService,
    GetServiceStatus,
    DeleteService,
    ListServices,
    CreateServiceIntegration,
}

impl FakeOperation {
    fn label(self) -> &'static str {
        match self {
            Self::CreateService => "creating service",
            Self::GetServiceStatus => "getting service",
            Self::DeleteService => "deleting service",
            Self::ListServices => "listing services",
            Self::CreateServiceIntegration => "creating service integration",
        }
    }
}

/// Failure a [`FakeAivenClient`] operation is programmed to return.
#[derive(Debug, Clone)]
pub enum FakeFailure {
    Status { status: u16, body: String },
    NotFound,
    MissingState,
}

impl FakeFailure {
    fn to_error(&self, op: FakeOperation) -> AivenClientError {
        let operation = op.label();
        match self {
            Self::Status { status, body } => AivenClientError::UnexpectedStatus {
                operation,
                status: *status,
                body: body.clone(),
            },
            Self::NotFound => AivenClientError::NotFound { operation },
            Self::MissingState => AivenClientError::MissingField {
                operation,
                field: "state",
            },
        }
    }
}

struct FakeState {
    calls: Vec<AivenCall>,
    status: ServiceStatus,
    services: Vec<ServiceSummary>,
    failures: HashMap<FakeOperation, FakeFailure>,
    failing_integrations: HashSet<String>,
    delay: Option<Duration>,
}

pub struct FakeAivenClient {
    state: Mutex<FakeState>,
}

impl Default for FakeAivenClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAivenClient {
    /// A client whose services are all `RUNNING` and whose calls all succeed.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                calls: Vec::new(),
                status: ServiceStatus::Running,
                services: Vec::new(),
                failures: HashMap::new(),
                failing_integrations: HashSet::new(),
                delay: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake client state poisoned")
    }

    // -- Programming --

    pub fn set_status(&self, status: ServiceStatus) {
        self.lock().status = status;
    }

    pub fn set_services(&self, services: Vec<ServiceSummary>) {
        self.lock().services = services;
    }

    pub fn fail(&self, op: FakeOperation, failure: FakeFailure) {
        self.lock().failures.insert(op, failure);
    }

    /// Makes integration creation fail for one source service only.
    pub fn fail_integration_for(&self, service_name: &str) {
        self.lock()
            .failing_integrations
            .insert(service_name.to_owned());
    }

    /// Delays every call, to exercise timeouts.
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    // -- Inspection --

    pub fn calls(&self) -> Vec<AivenCall> {
        self.lock().calls.clone()
    }

    pub fn created_services(&self) -> Vec<CreateServiceInput> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                AivenCall::CreateService(input) => Some(input),
                _ => None,
            })
            .collect()
    }

    pub fn deleted_services(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                AivenCall::DeleteService(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn integrations(&self) -> Vec<CreateServiceIntegrationInput> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                AivenCall::CreateServiceIntegration(input) => Some(input),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, call: AivenCall, op: FakeOperation) -> Result<(), AivenClientError> {
        let (delay, failure) = {
            let mut state = self.lock();
            state.calls.push(call);
            (state.delay, state.failures.get(&op).map(|f| f.to_error(op)))
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        failure.map_or(Ok(()), Err)
    }
}

#[async_trait::async_trait]
impl AivenClient for FakeAivenClient {
    async fn create_service(&self, input: &CreateServiceInput) -> Result<String, AivenClientError> {
        self.record(AivenCall::CreateService(input.clone()), FakeOperation::CreateService)
            .await?;
        Ok(format!(r#"{{"service":{{"service_name":"{}"}}}}"#, input.service_name))
    }

    async fn get_service_status(
        &self,
        service_name: &str,
    ) -> Result<ServiceStatus, AivenClientError> {
        self.record(
            AivenCall::GetServiceStatus(service_name.to_owned()),
            FakeOperation::GetServiceStatus,
        )
        .await?;
        Ok(self.lock().status.clone())
    }

    async fn delete_service(&self, service_name: &str) -> Result<String, AivenClientError> {
        self.record(
            AivenCall::DeleteService(service_name.to_owned()),
            FakeOperation::DeleteService,
        )
        .await?;
        Ok("{}".to_owned())
    }

    async fn list_services(&self) -> Result<Vec<ServiceSummary>, AivenClientError> {
        self.record(AivenCall::ListServices, FakeOperation::ListServices)
            .await?;
        Ok(self.lock().services.clone())
    }

    async fn create_service_integration(
        &self,
        input: &CreateServiceIntegrationInput,
    ) -> Result<(), AivenClientError> {
        self.record(
            AivenCall::CreateServiceIntegration(input.clone()),
            FakeOperation::CreateServiceIntegration,
        )
        .await?;
        if self.lock().failing_integrations.contains(&input.source_service) {
            return Err(FakeFailure::Status {
                status: 500,
                body: "integration failed".to_owned(),
            }
            .to_error(FakeOperation::CreateServiceIntegration));
        }
        Ok(())
    }
}
