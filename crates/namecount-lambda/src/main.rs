// AWS Lambda binary entry point
//
// One bootstrap artifact serves both functions: the greeting ingress
// (API Gateway / Function URL events) and the queue drain (SQS events).
// Build with: cargo build -p namecount-lambda

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    namecount_lambda::run().await
}
