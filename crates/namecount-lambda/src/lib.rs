// AWS Lambda runtime adapter
//
// One bootstrap artifact, two roles, selected by event shape:
// - HTTP events (API Gateway v1/v2, Function URL): greeting ingress
// - SQS events: queue drain into the counter store
//
// Philosophy: Use lambda_runtime's provided tokio
// We don't add our own tokio - lambda_runtime provides it

use anyhow::Result;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use namecount_config::RuntimeConfig;
use namecount_queue::SqsNameQueue;
use namecount_store::CounterStore;
use std::sync::Arc;

mod handlers;
mod response;

use handlers::{canonical_path, handle_http_request, handle_sqs_event};
use response::{
    build_api_gateway_v1_response, build_api_gateway_v2_response, build_function_url_response,
};
pub(crate) use response::{HttpResponseData, LambdaRequestEvent, LambdaResponse};

/// Lambda handler dispatching on the incoming event flavor
async fn handle_event(
    event: LambdaEvent<LambdaRequestEvent>,
    state: Arc<LambdaState>,
) -> Result<LambdaResponse, Error> {
    let (request, _context) = event.into_parts();

    match request {
        LambdaRequestEvent::Sqs(sqs_event) => {
            Ok(LambdaResponse::Sqs(handle_sqs_event(sqs_event, &state).await))
        }
        LambdaRequestEvent::ApiGatewayV1(boxed_request) => {
            let request = &*boxed_request;
            let method = request.http_method.as_str();
            let path = canonical_path(request.path.as_deref());
            let name = request.path_parameters.get("name").map(String::as_str);

            let response = handle_http_request(method, &path, name, &state).await;
            Ok(build_api_gateway_v1_response(response))
        }
        LambdaRequestEvent::ApiGatewayV2(boxed_request) => {
            let request = &*boxed_request;
            let method = request.request_context.http.method.as_str();
            let path = canonical_path(
                request
                    .raw_path
                    .as_deref()
                    .or(request.request_context.http.path.as_deref()),
            );
            let name = request.path_parameters.get("name").map(String::as_str);

            let response = handle_http_request(method, &path, name, &state).await;
            Ok(build_api_gateway_v2_response(response))
        }
        LambdaRequestEvent::FunctionUrl(boxed_request) => {
            let request = &*boxed_request;
            let method = request
                .request_context
                .http
                .method
                .as_deref()
                .unwrap_or("GET");
            let path = canonical_path(
                request
                    .raw_path
                    .as_deref()
                    .or(request.request_context.http.path.as_deref()),
            );

            // Function URLs carry no routed path parameters
            let response = handle_http_request(method, &path, None, &state).await;
            Ok(build_function_url_response(response))
        }
    }
}

pub(crate) struct LambdaState {
    pub store: CounterStore,
    pub queue: SqsNameQueue,
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = RuntimeConfig::load()
        .map_err(|e| Error::from(format!("Failed to load configuration: {}", e)))?;

    let store = CounterStore::from_config(&config.store)
        .map_err(|e| Error::from(format!("Failed to initialize storage: {}", e)))?;

    let sqs = config
        .queue
        .sqs
        .as_ref()
        .ok_or_else(|| Error::from("queue.sqs configuration required on Lambda"))?;
    let queue = SqsNameQueue::connect(sqs.queue_url.clone()).await;

    tracing::info!(
        store_backend = %config.store.backend,
        key = store.key(),
        queue_url = queue.queue_url(),
        "lambda runtime ready"
    );

    let state = Arc::new(LambdaState { store, queue });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<LambdaRequestEvent>| {
        let state = state.clone();
        async move { handle_event(event, state).await }
    }))
    .await
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    // CloudWatch adds its own timestamps; keep lines plain
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();
}
