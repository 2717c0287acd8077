// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use logship::config::LOGZIO_TOKEN_KEY;
use logship::{
    LogContext, LogFormatter, LogLevel, LogShipper, Logger, LoggerConfig, LogzioJsonFormatter,
    LogzioShipper, ShipperConfig, ShipperKind, StaticSecretsManager,
};
use mockito::{Matcher, Server};
use std::sync::Arc;
use std::time::Duration;

fn secrets() -> Arc<StaticSecretsManager> {
    Arc::new(StaticSecretsManager::with_secret(
        LOGZIO_TOKEN_KEY,
        "integration-token",
    ))
}

fn shipper_config(url: String) -> ShipperConfig {
    ShipperConfig {
        url,
        batch_size: 2,
        shipment_stack_size: 1,
        message_stack_size: 20,
        shipment_timeout: Duration::from_millis(200),
        message_read_timeout: Duration::from_millis(50),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_logger_ships_json_records_on_flush() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("token".into(), "integration-token".into()),
            Matcher::UrlEncoded("type".into(), "go-logs".into()),
        ]))
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""message":"first""#.to_string()),
            Matcher::Regex(r#""message":"second""#.to_string()),
            Matcher::Regex(r#""requestid":"req-1""#.to_string()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let shipper = Arc::new(LogzioShipper::new(shipper_config(server.url()), secrets()).unwrap());
    let logger = Logger::new(
        LogLevel::Info,
        Some(Arc::new(LogzioJsonFormatter) as Arc<dyn LogFormatter>),
        Some(shipper.clone() as Arc<dyn LogShipper>),
    )
    .with_context(LogContext::new([("requestid", "req-1")]));

    logger.info("first").await;
    logger.debug("filtered out").await;
    logger.error("second").await;
    assert_eq!(shipper.backlog(), 2);

    logger.flush().await;

    assert_eq!(shipper.backlog(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_logger_from_config_ships_in_batches() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::UrlEncoded(
            "token".into(),
            "integration-token".into(),
        ))
        .with_status(200)
        .expect_at_least(3)
        .create_async()
        .await;

    let config = LoggerConfig {
        level: LogLevel::Debug,
        shipper: ShipperKind::Logzio,
        logzio: shipper_config(server.url()),
    };
    let logger = Logger::from_config(&config, secrets()).unwrap();

    for i in 0..6 {
        logger.debug(format!("record {i}")).await;
    }
    logger.flush().await;

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_batches_do_not_reach_the_caller() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("listener unavailable")
        .expect(2)
        .create_async()
        .await;

    let shipper = LogzioShipper::new(shipper_config(server.url()), secrets()).unwrap();
    for i in 0..4 {
        shipper.send(format!("record {i}")).await;
    }
    shipper.shutdown().await;

    assert_eq!(shipper.backlog(), 0);
    assert_eq!(shipper.in_flight(), 0);
    mock.assert_async().await;
}
