//! CLI for Picforge - AI image operations.

use clap::{Args, Parser, Subcommand};
use picforge::{ApiGateway, ImageAsset, Operation, OperationController, OperationState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "picforge")]
#[command(about = "Manipulate, generate, and combine images via the Gemini image API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Modify an image per an instruction
    Manipulate(ManipulateArgs),

    /// Create an image from an instruction alone
    Generate(GenerateArgs),

    /// Merge two images per an instruction
    Combine(CombineArgs),
}

#[derive(Args)]
struct ManipulateArgs {
    /// Path to the source image (jpg, png, gif, or webp; up to 10 MB)
    image: PathBuf,

    /// Instruction describing the change
    #[arg(short, long)]
    prompt: String,

    /// Output file path (default: picforge-manipulate-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Instruction describing the image to create
    #[arg(short, long)]
    prompt: String,

    /// Output file path (default: picforge-generate-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CombineArgs {
    /// Path to the first image
    first: PathBuf,

    /// Path to the second image
    second: PathBuf,

    /// Instruction describing how to combine them
    #[arg(short, long)]
    prompt: String,

    /// Output file path (default: picforge-combine-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let gateway = ApiGateway::builder().build()?;

    let (mut controller, output) = match cli.command {
        Commands::Manipulate(args) => {
            let mut controller = OperationController::new(Operation::Manipulate);
            controller.set_instruction(&args.prompt);
            controller.attach_image(0, ImageAsset::from_path(&args.image)?);
            (controller, args.output)
        }
        Commands::Generate(args) => {
            let mut controller = OperationController::new(Operation::Generate);
            controller.set_instruction(&args.prompt);
            (controller, args.output)
        }
        Commands::Combine(args) => {
            let mut controller = OperationController::new(Operation::Combine);
            controller.set_instruction(&args.prompt);
            controller.attach_image(0, ImageAsset::from_path(&args.first)?);
            controller.attach_image(1, ImageAsset::from_path(&args.second)?);
            (controller, args.output)
        }
    };

    let operation = controller.operation();
    let state = controller.run(&gateway).await.clone();
    report(operation, state, output, cli.json)
}

fn report(
    operation: Operation,
    state: OperationState,
    output: Option<PathBuf>,
    json_output: bool,
) -> anyhow::Result<()> {
    match state {
        OperationState::Succeeded { image, message } => {
            let mut saved = None;
            let mut mime_type = None;
            if let Some(ref image) = image {
                let path = output.unwrap_or_else(|| default_output(operation));
                image.save(&path)?;
                mime_type = Some(image.mime_type.clone());
                saved = Some(path);
            }

            if json_output {
                let result = serde_json::json!({
                    "success": true,
                    "operation": operation.label(),
                    "output": saved.as_ref().map(|p| p.display().to_string()),
                    "mime_type": mime_type,
                    "message": message,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                if let Some(path) = saved {
                    println!("Saved {}", path.display());
                }
                println!("{message}");
            }
            Ok(())
        }
        OperationState::Failed { message } => anyhow::bail!(message),
        OperationState::Idle | OperationState::Loading => {
            anyhow::bail!("missing required inputs (prompt must be non-empty)")
        }
    }
}

fn default_output(operation: Operation) -> PathBuf {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("picforge-{}-{timestamp}.png", operation.label()))
}
