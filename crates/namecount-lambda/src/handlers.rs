// Request handlers for Lambda
//
// Routes HTTP events to the greeting ingress and SQS events to the
// queue drain.

use aws_lambda_events::sqs::{BatchItemFailure, SqsBatchResponse, SqsEvent};
use namecount_handlers::{handle_drain, handle_greet, HandlerError};
use serde_json::json;

use crate::{HttpResponseData, LambdaState};

const HEALTHY_TEXT: &str = "Healthy";

/// Handle incoming HTTP request based on method and path
pub(crate) async fn handle_http_request(
    method: &str,
    path: &str,
    path_parameter: Option<&str>,
    state: &LambdaState,
) -> HttpResponseData {
    let method = method.trim().to_ascii_uppercase();
    if method != "GET" {
        return error_response(&HandlerError::MethodNotAllowed);
    }

    if path == "/health" {
        return HttpResponseData::text(200, HEALTHY_TEXT.to_string());
    }

    // The name comes from the routed path parameter when the gateway
    // provides one, otherwise from the /hello/{name} path itself.
    let name = match path_parameter.or_else(|| name_from_path(path)) {
        Some(name) => name,
        None => return error_response(&HandlerError::NotFound),
    };

    match handle_greet(name, &state.queue).await {
        Ok(page) => HttpResponseData::html(200, page),
        Err(err) => error_response(&err),
    }
}

/// Handle an SQS delivery: the record bodies are the increment batch.
///
/// All-or-nothing per batch: success acknowledges every message, a store
/// failure reports every message ID back for redelivery.
pub(crate) async fn handle_sqs_event(event: SqsEvent, state: &LambdaState) -> SqsBatchResponse {
    let message_ids: Vec<String> = event
        .records
        .iter()
        .filter_map(|record| record.message_id.clone())
        .collect();

    let names: Vec<String> = event
        .records
        .into_iter()
        .filter_map(|record| record.body)
        .collect();

    match handle_drain(&names, &state.store).await {
        Ok(report) => {
            tracing::info!(applied = report.applied, "drained queue batch");
            SqsBatchResponse {
                batch_item_failures: vec![],
            }
        }
        Err(err) => {
            tracing::error!(
                batch_size = names.len(),
                error_type = err.error_type(),
                "queue batch failed; returning all messages for redelivery"
            );
            SqsBatchResponse {
                batch_item_failures: message_ids
                    .into_iter()
                    .map(|item_identifier| BatchItemFailure { item_identifier })
                    .collect(),
            }
        }
    }
}

fn error_response(err: &HandlerError) -> HttpResponseData {
    HttpResponseData::json(
        err.status_code(),
        json!({
            "error": err.message(),
            "error_type": err.error_type(),
        })
        .to_string(),
    )
}

/// Extract the greeted name from a /hello/{name} path
fn name_from_path(path: &str) -> Option<&str> {
    let name = path.strip_prefix("/hello/")?.trim_matches('/');
    if name.is_empty() || name.contains('/') {
        None
    } else {
        Some(name)
    }
}

/// Extract canonical path from request (strip query string)
pub(crate) fn canonical_path(path: Option<&str>) -> String {
    let raw = path.unwrap_or("/");
    raw.split('?').next().unwrap_or("/").to_string()
}
