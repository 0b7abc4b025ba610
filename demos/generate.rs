//! Basic image generation example.
//!
//! Run with: `cargo run --example generate`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use picforge::{ApiGateway, Operation, OperationController, OperationState};

#[tokio::main]
async fn main() -> picforge::Result<()> {
    let gateway = ApiGateway::builder().build()?;

    let mut op = OperationController::new(Operation::Generate);
    op.set_instruction("A futuristic city at sunset");

    match op.run(&gateway).await {
        OperationState::Succeeded { image, message } => {
            if let Some(image) = image {
                image.save("generated.png")?;
                println!("Saved generated.png");
            }
            println!("{message}");
        }
        OperationState::Failed { message } => eprintln!("{message}"),
        _ => {}
    }

    Ok(())
}
