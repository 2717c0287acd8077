// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, sync::Arc};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use logship::{EnvSecretsManager, LogContext, LogLevel, Logger, LoggerConfig};

const DEFAULT_RECORD_LEVEL: LogLevel = LogLevel::Info;

#[tokio::main]
pub async fn main() {
    let log_level = env::var("LOGSHIP_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        // stdout carries the forwarded records when the stdout shipper is used
        .with_writer(std::io::stderr)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    let config = match LoggerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration: {e:?}");
            return;
        }
    };

    let record_level = env::var("LOGSHIP_RECORD_LEVEL")
        .map(|name| LogLevel::by_name(&name))
        .unwrap_or(DEFAULT_RECORD_LEVEL);

    let logger = match Logger::from_config(&config, Arc::new(EnvSecretsManager)) {
        Ok(logger) => logger.with_context(LogContext::for_nodes()),
        Err(e) => {
            error!("Unable to create logger: {e}");
            return;
        }
    };

    info!(
        "Forwarding stdin with level {}, records at level {}, shipper {:?}",
        config.level, record_level, config.shipper
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut forwarded: u64 = 0;
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    logger.log(record_level, line).await;
                    forwarded += 1;
                }
                Ok(None) => {
                    debug!("End of input");
                    break;
                }
                Err(e) => {
                    error!("Unable to read from stdin: {e}");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, flushing remaining records");
                break;
            }
        }
    }

    logger.flush().await;
    info!("Forwarded {} records", forwarded);
}
