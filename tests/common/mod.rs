// Common test utilities shared by the integration suites
#![allow(dead_code)]

pub mod builders;
pub mod fixtures;

use evals_cli::EvalsClient;
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";

/// Client pointed at a mock server
pub async fn client_for(server: &MockServer) -> EvalsClient {
    EvalsClient::new(&server.uri(), TEST_TOKEN).expect("client should build")
}
