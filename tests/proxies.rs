//! Service proxies against the mock Configuration API.

use std::sync::atomic::Ordering;

use chrono::Utc;
use config_client::client::{
    ApiClient, Application, ApplicationService, ClientError, Configuration, ConfigurationService,
    HeartbeatService,
};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_configuration_round_trip() {
    let (mock, base_url) = common::start_mock_api().await;
    let app_id = mock.seed_application("Billing");
    let service = ConfigurationService::new(common::api_client(&base_url));

    let mut configuration = Configuration::new(app_id, "Retries", "3");
    let inserted = service.insert(&configuration).await.unwrap();
    assert!(inserted.is_success);
    assert_eq!(inserted.status, 200);
    configuration.id = inserted.content.unwrap();

    let fetched = service.get_by_id(configuration.id).await.unwrap();
    let fetched = fetched.content.unwrap();
    assert!(fetched.same_content(&configuration));
    assert!(fetched.created_at.is_some());

    configuration.value = "5".to_string();
    let updated = service.update(&configuration).await.unwrap();
    assert_eq!(updated.content, Some(1));
    let fetched = service.get_by_id(configuration.id).await.unwrap().content.unwrap();
    assert_eq!(fetched.value, "5");

    let deleted = service.delete(configuration.id).await.unwrap();
    assert_eq!(deleted.content, Some(1));
    let deleted_again = service.delete(configuration.id).await.unwrap();
    assert_eq!(deleted_again.content, Some(0));
}

#[tokio::test]
async fn test_missing_record_is_an_envelope_not_an_error() {
    let (_mock, base_url) = common::start_mock_api().await;
    let service = ConfigurationService::new(common::api_client(&base_url));

    let response = service.get_by_id(999).await.unwrap();
    assert!(!response.is_success);
    assert_eq!(response.status, 404);
    assert!(response.content.is_none());
    assert_eq!(response.error.as_ref().unwrap().reason, "Not Found");

    match response.into_result() {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_body_is_preserved() {
    let (mock, base_url) = common::start_mock_api().await;
    let app_id = mock.seed_application("Billing");
    mock.seed_configuration(app_id, "Retries", "3");
    let service = ConfigurationService::new(common::api_client(&base_url));

    let response = service
        .insert(&Configuration::new(app_id, "Retries", "4"))
        .await
        .unwrap();
    assert_eq!(response.status, 409);
    let error = response.error.unwrap();
    assert_eq!(error.reason, "Conflict");
    assert!(error.content.contains("Retries"));
}

#[tokio::test]
async fn test_configurations_by_application_name() {
    let (mock, base_url) = common::start_mock_api().await;
    let billing = mock.seed_application("Billing");
    let shipping = mock.seed_application("Shipping");
    mock.seed_configuration(billing, "A", "1");
    mock.seed_configuration(billing, "B", "2");
    mock.seed_configuration(shipping, "A", "x");
    let service = ConfigurationService::new(common::api_client(&base_url));

    let billing_configs = service
        .get_by_application_name("Billing")
        .await
        .unwrap()
        .content
        .unwrap();
    assert_eq!(billing_configs.len(), 2);
    assert!(billing_configs.iter().all(|c| c.application_id == billing));

    let all = service.get_all().await.unwrap().content.unwrap();
    assert_eq!(all.len(), 3);

    let unknown = service
        .get_by_application_name("Unknown")
        .await
        .unwrap()
        .content
        .unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_application_lookup_by_name_is_encoded() {
    let (_mock, base_url) = common::start_mock_api().await;
    let service = ApplicationService::new(common::api_client(&base_url));

    let application = Application::new("Billing Service/EU", Some("Invoices".to_string()));
    let id = service.insert(&application).await.unwrap().content.unwrap();

    let found = service
        .get_by_name("Billing Service/EU")
        .await
        .unwrap()
        .content
        .unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.description.as_deref(), Some("Invoices"));

    let by_id = service.get_by_id(id).await.unwrap().content.unwrap();
    assert_eq!(by_id.name, "Billing Service/EU");

    let missing = service.get_by_name("Nope").await.unwrap();
    assert_eq!(missing.status, 404);
}

#[tokio::test]
async fn test_application_update_and_delete() {
    let (_mock, base_url) = common::start_mock_api().await;
    let service = ApplicationService::new(common::api_client(&base_url));

    let mut application = Application::new("Billing", None);
    application.id = service.insert(&application).await.unwrap().content.unwrap();

    application.description = Some("Invoices".to_string());
    assert_eq!(service.update(&application).await.unwrap().content, Some(1));

    let all = service.get_all().await.unwrap().content.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description.as_deref(), Some("Invoices"));
    assert!(all[0].modified_at.is_some());

    assert_eq!(service.delete(application.id).await.unwrap().content, Some(1));
    assert_eq!(service.get_by_id(application.id).await.unwrap().status, 404);
}

#[tokio::test]
async fn test_heartbeat() {
    let (_mock, base_url) = common::start_mock_api().await;
    let heartbeat = HeartbeatService::new(common::api_client(&base_url));

    let response = heartbeat.get().await.unwrap();
    assert!(response.is_success);
    assert!(response.content.is_some());

    let skew = heartbeat.clock_skew().await.unwrap();
    assert!(skew.num_seconds().abs() < 5);
}

#[tokio::test]
async fn test_heartbeat_without_offset_is_utc() {
    let (mock, base_url) = common::start_mock_api().await;
    mock.offsetless_time.store(true, Ordering::SeqCst);
    let heartbeat = HeartbeatService::new(common::api_client(&base_url));

    let response = heartbeat.get().await.unwrap();
    assert!(response.is_success);
    let server_time = response.content.unwrap();
    assert!((Utc::now() - server_time).num_seconds().abs() < 5);

    let skew = heartbeat.clock_skew().await.unwrap();
    assert!(skew.num_seconds().abs() < 5);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::new(reqwest::Client::new(), &format!("http://{}", addr)).unwrap();
    let err = HeartbeatService::new(api).get().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!err.is_remote());
}

#[tokio::test]
async fn test_base_url_path_is_kept() {
    let (_mock, base_url) = common::start_mock_api().await;
    // The mock serves from the root, so a prefixed base path must 404.
    let api = common::api_client(&format!("{}/api/", base_url));
    let response = HeartbeatService::new(api).get().await.unwrap();
    assert_eq!(response.status, 404);
}
