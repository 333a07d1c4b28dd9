use clap::Parser;
use survival_predictor::utils::error::ErrorSeverity;
use survival_predictor::utils::{logger, validation::Validate};
use survival_predictor::{build_app_state, build_router, CliArgs, PredictorError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_server_logger(args.verbose);
    }

    tracing::info!("Starting survival-predictor");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 載入並驗證配置
    let config = match args.load_config().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_on_startup_error(e),
    };

    // 模型只在啟動時載入一次
    let state = match build_app_state(&config) {
        Ok(state) => state,
        Err(e) => exit_on_startup_error(e),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    tracing::info!(listen_addr = %config.server.listen_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn exit_on_startup_error(e: PredictorError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
