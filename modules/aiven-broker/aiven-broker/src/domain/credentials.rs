use aiven_broker_sdk::{BasicAuthCredentials, Credentials, PrometheusCredentials, PrometheusEndpoint};

use super::error::DomainError;
use super::model::ServiceKind;

const INFLUXDB_DATABASE: &str = "defaultdb";

/// Shapes connection details of a running service into the credentials handed to a bound app.
pub fn build_credentials(
    service_type: &str,
    username: &str,
    password: &str,
    hostname: &str,
    port: &str,
) -> Result<Credentials, DomainError> {
    let kind: ServiceKind = service_type.parse()?;

    let uri = format!(
        "https://{}:{}@{hostname}:{port}",
        urlencoding::encode(username),
        urlencoding::encode(password),
    );
    let mut credentials = Credentials {
        uri,
        hostname: hostname.to_owned(),
        port: port.to_owned(),
        username: username.to_owned(),
        password: password.to_owned(),
        database: None,
        prometheus: None,
    };

    match kind {
        ServiceKind::Elasticsearch | ServiceKind::OpenSearch => {}
        ServiceKind::InfluxDb => {
            let basic_auth = BasicAuthCredentials {
                username: username.to_owned(),
                password: password.to_owned(),
            };
            let prom_url = |action: &str| {
                format!("https://{hostname}:{port}/api/v1/prom/{action}?db={INFLUXDB_DATABASE}")
            };
            credentials.database = Some(INFLUXDB_DATABASE.to_owned());
            credentials.prometheus = Some(PrometheusCredentials {
                remote_read: vec![PrometheusEndpoint {
                    url: prom_url("read"),
                    basic_auth: basic_auth.clone(),
                    read_recent: Some(true),
                }],
                remote_write: vec![PrometheusEndpoint {
                    url: prom_url("write"),
                    basic_auth,
                    read_recent: None,
                }],
            });
        }
    }
    Ok(credentials)
}
