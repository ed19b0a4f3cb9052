//! Common test utilities for homehome integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::{TestRequest, TestServer};
use tempfile::TempDir;

use homehome_core::{CatalogEntry, ItemCatalog, ItemId, Rarity, UserId};
use homehome_service::{create_router, AppState, ServiceConfig};
use homehome_store::RocksStore;

/// The only drawable item of each rarity.
pub const R_ITEM: &str = "11111111-1111-4111-8111-111111111111";
pub const SR_ITEM: &str = "22222222-2222-4222-8222-222222222222";
pub const SSR_ITEM: &str = "33333333-3333-4333-8333-333333333333";
/// Granted at signup, never drawn.
pub const DEFAULT_ITEM: &str = "44444444-4444-4444-8444-444444444444";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
    /// The service API key for service-to-service requests.
    pub service_api_key: String,
}

fn entry(id: &str, name: &str, rarity: Rarity, is_default: bool) -> CatalogEntry {
    CatalogEntry {
        id: id.parse::<ItemId>().unwrap(),
        name: name.into(),
        rarity,
        category: "outfit".into(),
        is_default,
    }
}

/// Three drawable outfits, one per rarity.
pub fn test_catalog() -> ItemCatalog {
    ItemCatalog::new(vec![
        entry(R_ITEM, "Cotton Pajamas", Rarity::R, false),
        entry(SR_ITEM, "Rain Coat", Rarity::Sr, false),
        entry(SSR_ITEM, "Starlight Dress", Rarity::Ssr, false),
        entry(DEFAULT_ITEM, "Plain Shirt", Rarity::R, true),
    ])
    .unwrap()
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let service_api_key = "test-service-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            service_api_key: Some(service_api_key.clone()),
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::new(store), test_catalog(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id,
            service_api_key,
        }
    }

    /// Get the authorization header for user authentication.
    pub fn user_auth_header(&self) -> HeaderValue {
        Self::auth_header_for(&self.test_user_id)
    }

    /// Authorization header for any user.
    pub fn auth_header_for(user_id: &UserId) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer test-token:{user_id}")).unwrap()
    }

    /// Attach the service API key headers to a request.
    pub fn as_service(&self, request: TestRequest) -> TestRequest {
        request
            .add_header(
                HeaderName::from_static("x-api-key"),
                HeaderValue::from_str(&self.service_api_key).unwrap(),
            )
            .add_header(
                HeaderName::from_static("x-service-name"),
                HeaderValue::from_static("diary"),
            )
    }

    /// Credit free coins to the test user through the service endpoint.
    pub async fn fund(&self, amount: u64) {
        self.as_service(self.server.post("/v1/currency/credit"))
            .json(&serde_json::json!({
                "user_id": self.test_user_id.to_string(),
                "amount": amount,
                "source": "diary_entry"
            }))
            .await
            .assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
