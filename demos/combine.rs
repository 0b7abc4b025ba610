//! Image combination example - merges two images per an instruction.
//!
//! Run with: `cargo run --example combine -- <first.png> <second.png>`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use picforge::{ApiGateway, ImageAsset, Operation, OperationController, OperationState};

#[tokio::main]
async fn main() -> picforge::Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next().unwrap_or_else(|| "first.png".to_string());
    let second = args.next().unwrap_or_else(|| "second.png".to_string());

    let gateway = ApiGateway::builder().build()?;

    let mut op = OperationController::new(Operation::Combine);
    op.set_instruction("Create a seamless blend of these two images");
    op.attach_image(0, ImageAsset::from_path(&first)?);
    op.attach_image(1, ImageAsset::from_path(&second)?);

    match op.run(&gateway).await {
        OperationState::Succeeded { image, message } => {
            if let Some(image) = image {
                image.save("combined.png")?;
                println!("Saved combined.png");
            }
            println!("{message}");
        }
        OperationState::Failed { message } => eprintln!("{message}"),
        _ => {}
    }

    Ok(())
}
