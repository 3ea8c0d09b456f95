use clap::{Parser, Subcommand};
use imagegen::{
    logger,
    models::{DEFAULT_GUIDANCE_SCALE, DEFAULT_INFERENCE_STEPS, HISTORY_SLOT},
    ConsoleNotifier, FileKeyValueStore, Gallery, GenerationForm, ImageCard, Notifier,
    PageController, PersistentList, ReplicateClient, Result, StudioConfig, StudioError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the backend serving /api/replicate/generate-image (env: IMAGEGEN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the image history (env: IMAGEGEN_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory downloaded images are saved to (env: IMAGEGEN_DOWNLOAD_DIR)
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error (env: IMAGEGEN_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an image from a text description
    Generate {
        /// What the image should show
        prompt: String,

        /// Inference steps, 20 to 100
        #[arg(long, default_value_t = DEFAULT_INFERENCE_STEPS)]
        steps: u32,

        /// Guidance scale, 1 to 20 in steps of 0.5
        #[arg(long, default_value_t = DEFAULT_GUIDANCE_SCALE)]
        guidance: f32,

        /// What to exclude from the image
        #[arg(long)]
        negative: Option<String>,

        /// Save the generated image right away
        #[arg(long)]
        download: bool,
    },
    /// List previously generated images, most recent first
    History,
    /// Save an image locally, by history number or by URL
    Download {
        /// History number as shown by `history`, or an image URL
        target: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let args = Args::parse();
    let config = apply_overrides(StudioConfig::from_env(), &args);

    if let Err(e) = config.validate() {
        ConsoleNotifier.alert(&e.to_string());
        return ExitCode::FAILURE;
    }
    match logger::LoggerConfig::from_studio(&config) {
        Ok(logger_config) => {
            if let Err(e) = logger::init_with_config(logger_config) {
                eprintln!("{}", e);
            }
        }
        Err(e) => eprintln!("{}", e),
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    }
    logger::log_config_info(&config);

    match run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        // The controller has already alerted the user about these.
        Err(StudioError::Generation(_) | StudioError::Network(_) | StudioError::Download(_)) => {
            ExitCode::FAILURE
        }
        Err(e) => {
            ConsoleNotifier.alert(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(mut config: StudioConfig, args: &Args) -> StudioConfig {
    if let Some(api_url) = &args.api_url {
        config = config.with_api_url(api_url.clone());
    }
    if let Some(data_dir) = &args.data_dir {
        config = config.with_data_dir(data_dir.clone());
    }
    if let Some(download_dir) = &args.download_dir {
        config = config.with_download_dir(download_dir.clone());
    }
    if let Some(level) = &args.log_level {
        config = config.with_log_level(level.clone());
    }
    config
}

async fn run(command: Command, config: &StudioConfig) -> Result<()> {
    let client = ReplicateClient::new(config)
        .map_err(|e| StudioError::Config(format!("Failed to build HTTP client: {}", e)))?;
    let history = PersistentList::new(
        Arc::new(FileKeyValueStore::new(config.data_dir.clone())),
        HISTORY_SLOT,
        vec![],
    );
    let controller = PageController::load(
        Arc::new(client.image().clone()),
        Arc::new(client.download().clone()),
        history,
        Arc::new(ConsoleNotifier),
    )
    .await;

    match command {
        Command::Generate {
            prompt,
            steps,
            guidance,
            negative,
            download,
        } => {
            let mut form = GenerationForm::new()
                .with_prompt(prompt)
                .with_steps(steps)
                .with_guidance(guidance);
            if let Some(negative) = negative {
                form.set_negative_prompt(negative);
            }
            let (prompt, options) = form.submit()?;

            eprintln!("{}\n", form.render(true));
            let record = controller.generate(&prompt, &options).await?;
            println!("{}", ImageCard::new(&record).render());

            if download {
                let path = controller.download(&record.url).await?;
                println!("💾 Saved to {}", path.display());
            }
        }
        Command::History => {
            let records = controller.history();
            if records.is_empty() {
                println!("No generated images yet.");
            } else {
                println!("{}", Gallery::new(&records).render());
            }
        }
        Command::Download { target } => {
            let path = match target.parse::<usize>() {
                Ok(index) => controller.download_history(index).await?,
                Err(_) => controller.download(&target).await?,
            };
            println!("💾 Saved to {}", path.display());
        }
    }

    Ok(())
}
