use clap::Parser;
use sign_verify::{cli, client, config, error, intake, interactive, session, verify};
use cli::{Cli, Commands};
use client::HttpPredictionClient;
use config::Config;
use error::{Result, SignVerifyError};
use session::Session;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = Config::load()?;

    match cli.command {
        Commands::Verify { image, language, json } => {
            let mut session = build_session(&config, cli.endpoint.as_deref())?;

            session.select_language(&language)?;
            let candidate = intake::read_candidate(&image).await?;
            session.choose_file(Some(candidate)).await;

            if !json {
                println!("✦ SignVerify - 署名検証\n");
                if let Some(file) = session.workflow().selected_file() {
                    sign_verify::render::print_file(file, session.workflow().preview().is_some());
                }
            }

            let completed = verify::submit_and_report(&mut session, json).await?;
            session.teardown();

            if !completed {
                let message = session
                    .state()
                    .error()
                    .map(|e| e.message.clone())
                    .unwrap_or_default();
                return Err(SignVerifyError::Verification(message));
            }
        }

        Commands::Interactive => {
            let mut session = build_session(&config, cli.endpoint.as_deref())?;
            interactive::run_interactive(&mut session).await?;
        }

        Commands::Languages => {
            println!("対応言語:");
            for language in config.catalog()?.iter() {
                println!("  {:<10} {:<10} {}", language.value, language.label, language.script);
            }
        }

        Commands::Config { set_endpoint, show } => {
            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  エンドポイント: {}", config.resolve_endpoint(cli.endpoint.as_deref()));
                println!(
                    "  タイムアウト: {}",
                    config
                        .timeout_seconds
                        .map(|s| format!("{}秒", s))
                        .unwrap_or_else(|| "なし".into())
                );
                println!("  言語数: {}", config.languages.len());
            }
        }
    }

    Ok(())
}

fn build_session(config: &Config, endpoint: Option<&str>) -> Result<Session<HttpPredictionClient>> {
    let endpoint = config.resolve_endpoint(endpoint);
    log::info!("prediction endpoint: {}", endpoint);
    let client = HttpPredictionClient::new(endpoint, config.timeout_seconds.map(Duration::from_secs))?;
    Ok(Session::new(client, config.catalog()?))
}
