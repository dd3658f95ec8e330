#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use bikawo_functions::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use bikawo_functions::{http_backends, FunctionResponse, Functions, LambdaConfig, S3Storage};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde_json::Value;
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
async fn build_functions() -> Result<Functions, Error> {
    // 創建Lambda配置
    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    // 創建AWS配置和S3客戶端
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let s3_client = S3Client::from_conf(config);

    let storage = S3Storage::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.s3_prefix.clone(),
    );
    let backends = http_backends(&lambda_config, Arc::new(storage))?;
    Ok(Functions::from_config(&lambda_config, backends))
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let functions = Arc::new(build_functions().await?);
    tracing::info!("🚀 Bikawo functions ready");

    run(service_fn(move |event: LambdaEvent<Value>| {
        let functions = functions.clone();
        async move {
            let response: FunctionResponse = functions.handle_json(event.payload).await;
            Ok::<FunctionResponse, Error>(response)
        }
    }))
    .await
}
