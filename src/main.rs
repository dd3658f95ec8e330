use anyhow::Context;
use bikawo_functions::utils::error::AppError;
use bikawo_functions::utils::{logger, validation::Validate};
use bikawo_functions::{
    http_backends, CliConfig, FunctionRequest, Functions, LocalStorage, TomlConfig,
};
use clap::Parser;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;

fn exit_with(error: &AppError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 建議: {}", error.recovery_suggestion());
    std::process::exit(1);
}

fn read_payload(path: Option<&str>) -> anyhow::Result<Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read payload file {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read payload from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("payload is not valid JSON")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting bikawo-functions local invoker");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = TomlConfig::from_file(&cli.config).unwrap_or_else(|e| exit_with(&e));
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let payload = read_payload(cli.payload.as_deref())?;

    let storage_dir = cli
        .storage_dir
        .clone()
        .unwrap_or_else(|| config.storage_path().to_string());
    let backends = http_backends(&config, Arc::new(LocalStorage::new(storage_dir)))
        .unwrap_or_else(|e| exit_with(&e));
    let functions = Functions::from_config(&config, backends);

    if cli.dry_run {
        // 只做驗證與分組，不呼叫任何遠端服務
        let request: FunctionRequest =
            serde_json::from_value(payload).context("payload is not a function request")?;
        let FunctionRequest::CreateCheckout(checkout) = request else {
            anyhow::bail!("--dry-run only supports the create_checkout action");
        };
        let plan = functions
            .checkout()
            .preview(&checkout)
            .unwrap_or_else(|e| exit_with(&e));
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let response = functions.handle_json(payload).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.success {
        std::process::exit(2);
    }
    Ok(())
}
