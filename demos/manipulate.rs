//! Image manipulation example - modifies an existing image per an instruction.
//!
//! Run with: `cargo run --example manipulate -- <input_image.png>`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use picforge::{ApiGateway, ImageAsset, Operation, OperationController, OperationState};

#[tokio::main]
async fn main() -> picforge::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.png".to_string());

    let gateway = ApiGateway::builder().build()?;

    let mut op = OperationController::new(Operation::Manipulate);
    op.set_instruction("Make it look like a vintage photo");
    op.attach_image(0, ImageAsset::from_path(&input_path)?);

    match op.run(&gateway).await {
        OperationState::Succeeded { image, message } => {
            if let Some(image) = image {
                image.save("manipulated.png")?;
                println!("Saved manipulated.png");
            }
            println!("{message}");
        }
        OperationState::Failed { message } => eprintln!("{message}"),
        _ => {}
    }

    Ok(())
}
