use ami_updater::{AmiUpdaterService, Config, HttpWebhookClient, Response, SsmParameterStore};
use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_lambda_events::event::sns::SnsEvent;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

type Service = AmiUpdaterService<SsmParameterStore, HttpWebhookClient>;

async fn function_handler(
    service: &Service,
    event: LambdaEvent<SnsEvent>,
) -> Result<Response, Error> {
    let (sns_event, context) = event.into_parts();
    info!(
        request_id = %context.request_id,
        records = sns_event.records.len(),
        "Handling ECS AMI notification"
    );
    Ok(service.handle_event(&sns_event).await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let http = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;

    let service = AmiUpdaterService::new(
        SsmParameterStore::new(aws_sdk_ssm::Client::new(&aws_config)),
        HttpWebhookClient::new(http),
        config,
    );
    info!(
        region = %service.config().region,
        ami_parameter = %service.config().ami_parameter,
        webhooks_parameter = %service.config().webhooks_parameter,
        "cold start complete"
    );

    run(service_fn(|event| function_handler(&service, event))).await
}
