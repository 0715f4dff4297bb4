pub mod api;
pub mod error;

pub mod models;

pub use models::{
    BasicAuthCredentials, BindDetails, Binding, Credentials, DeprovisionDetails,
    DeprovisionServiceSpec, LastOperation, LastOperationState, PollDetails, PrometheusCredentials,
    PrometheusEndpoint, ProvisionDetails, ProvisionedServiceSpec, ServiceOffering, ServicePlan,
    UnbindDetails, UpdateDetails, UpdateServiceSpec,
};

pub use api::ServiceBrokerV1;
pub use error::ServiceBrokerError;
