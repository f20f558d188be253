// Lambda event and response plumbing
//
// Converts the internal response format to the Lambda-specific response
// type matching whatever event flavor invoked us.

use aws_lambda_events::{
    apigw::{
        ApiGatewayProxyRequest, ApiGatewayProxyResponse, ApiGatewayV2httpRequest,
        ApiGatewayV2httpResponse,
    },
    encodings::Body,
    http::{header::CONTENT_TYPE, HeaderValue},
    lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse},
    sqs::{SqsBatchResponse, SqsEvent},
};
use serde::{Deserialize, Serialize};

/// Internal HTTP response data
pub(crate) struct HttpResponseData {
    pub status_code: u16,
    pub body: String,
    pub content_type: &'static str,
}

impl HttpResponseData {
    pub fn html(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            body,
            content_type: "text/html; charset=utf-8",
        }
    }

    pub fn json(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            body,
            content_type: "application/json",
        }
    }

    pub fn text(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            body,
            content_type: "text/plain; charset=utf-8",
        }
    }
}

/// Lambda event types served by the single bootstrap artifact.
///
/// SQS first: its required "Records" field keeps it from being shadowed by
/// the permissive HTTP event shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LambdaRequestEvent {
    Sqs(SqsEvent),
    ApiGatewayV1(Box<ApiGatewayProxyRequest>),
    ApiGatewayV2(Box<ApiGatewayV2httpRequest>),
    FunctionUrl(Box<LambdaFunctionUrlRequest>),
}

/// Lambda response types
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum LambdaResponse {
    ApiGatewayV1(ApiGatewayProxyResponse),
    ApiGatewayV2(ApiGatewayV2httpResponse),
    FunctionUrl(LambdaFunctionUrlResponse),
    Sqs(SqsBatchResponse),
}

/// Build API Gateway v1 response from internal response data
pub(crate) fn build_api_gateway_v1_response(data: HttpResponseData) -> LambdaResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code: data.status_code as i64,
        headers: Default::default(),
        multi_value_headers: Default::default(),
        body: Some(Body::Text(data.body)),
        is_base64_encoded: false,
    };
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(data.content_type));
    LambdaResponse::ApiGatewayV1(response)
}

/// Build API Gateway v2 (HTTP API) response from internal response data
pub(crate) fn build_api_gateway_v2_response(data: HttpResponseData) -> LambdaResponse {
    let mut headers = aws_lambda_events::http::HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(data.content_type));
    LambdaResponse::ApiGatewayV2(ApiGatewayV2httpResponse {
        status_code: data.status_code as i64,
        headers,
        multi_value_headers: Default::default(),
        body: Some(Body::Text(data.body)),
        is_base64_encoded: false,
        cookies: vec![],
    })
}

/// Build Function URL response from internal response data
pub(crate) fn build_function_url_response(data: HttpResponseData) -> LambdaResponse {
    let mut headers = aws_lambda_events::http::HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(data.content_type));
    LambdaResponse::FunctionUrl(LambdaFunctionUrlResponse {
        status_code: data.status_code as i64,
        headers,
        body: Some(data.body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    })
}
