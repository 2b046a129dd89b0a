// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for CloudWatch-Logs-compatible log APIs.
//!
//! Speaks the `x-amz-json-1.1` target protocol (`DescribeLogStreams`,
//! `GetLogEvents`) against a configurable endpoint. Requests are not signed;
//! this is meant for emulators and gateways that do their own auth.

use async_trait::async_trait;
use logtail_core::client::{EventsPage, EventsRequest, LogRecord, LogsApi};
use logtail_core::error::ApiError;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TARGET_HEADER: &str = "x-amz-target";
const DESCRIBE_LOG_STREAMS: &str = "Logs_20140328.DescribeLogStreams";
const GET_LOG_EVENTS: &str = "Logs_20140328.GetLogEvents";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

pub struct HttpLogsClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpLogsClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    async fn call<B, R>(&self, target: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(&self.endpoint)
            .header(TARGET_HEADER, target)
            .header(CONTENT_TYPE, AMZ_JSON)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let remote: RemoteErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(ApiError::Remote {
                code: remote.kind.unwrap_or_else(|| status.to_string()),
                message: remote.message.unwrap_or(text),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

#[async_trait]
impl LogsApi for HttpLogsClient {
    /// Lists every stream under the group, folding the remote pagination
    /// into one call.
    async fn list_streams(&self, group: &str) -> Result<Vec<String>, ApiError> {
        let mut names = Vec::new();
        let mut next_token = None;

        loop {
            let request = DescribeLogStreamsRequest {
                log_group_name: group,
                next_token: next_token.take(),
            };
            let response: DescribeLogStreamsResponse =
                self.call(DESCRIBE_LOG_STREAMS, &request).await?;
            names.extend(response.log_streams.into_iter().map(|s| s.log_stream_name));

            match response.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        debug!(group, count = names.len(), "listed remote streams");
        Ok(names)
    }

    async fn get_events(&self, request: &EventsRequest) -> Result<EventsPage, ApiError> {
        let body = GetLogEventsRequest {
            log_group_name: &request.group,
            log_stream_name: &request.stream,
            start_time: request.start_time,
            end_time: request.end_time,
            next_token: request.next_token.as_deref(),
            start_from_head: true,
        };
        let response: GetLogEventsResponse = self.call(GET_LOG_EVENTS, &body).await?;

        let records = response
            .events
            .into_iter()
            .map(|event| LogRecord {
                timestamp: event.timestamp,
                message: event.message,
                ingestion_time: event.ingestion_time,
            })
            .collect();

        Ok(EventsPage {
            records,
            next_token: response.next_forward_token,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLogStreamsRequest<'a> {
    log_group_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribeLogStreamsResponse {
    #[serde(default)]
    log_streams: Vec<LogStreamDescription>,
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogStreamDescription {
    log_stream_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetLogEventsRequest<'a> {
    log_group_name: &'a str,
    log_stream_name: &'a str,
    start_time: i64,
    end_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
    start_from_head: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetLogEventsResponse {
    #[serde(default)]
    events: Vec<OutputLogEvent>,
    next_forward_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OutputLogEvent {
    timestamp: i64,
    message: String,
    ingestion_time: Option<i64>,
}

#[derive(Default, Deserialize)]
struct RemoteErrorBody {
    #[serde(rename = "__type")]
    kind: Option<String>,
    message: Option<String>,
}
