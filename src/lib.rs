#![warn(missing_docs)]
//! Accessorize - add accessories to photos with Gemini image editing.
//!
//! An image is encoded into base64 with its media type, sent to the model
//! together with one instruction, and the first image in the reply comes
//! back. Every failure is reported as a single [`EditFailure`] whose message
//! starts with a fixed prefix and whose cause stays inspectable.
//!
//! # Quick Start
//!
//! ```no_run
//! use accessorize::{encode_file, Accessory, EditClient, ImageEditor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fails here, before any work, when no API key is configured.
//!     let client = EditClient::builder().build()?;
//!
//!     let image = encode_file("portrait.jpg").await?;
//!     let accessory = Accessory::Sunglasses;
//!     match client.transform(&image, accessory.instruction()).await {
//!         Ok(edited) => {
//!             edited.save("portrait-edited.png")?;
//!             println!("{}", accessory.label());
//!         }
//!         Err(failure) => eprintln!("{}", failure),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `accessorize` command-line front end

mod error;
pub mod edit;

// Re-export error types at crate root
pub use error::{AccessorizeError, Result};

pub use edit::{
    encode_bytes, encode_file, Accessory, EditClient, EditClientBuilder, EditFailure, EditRequest,
    EditResult, EncodedImage, ImageEditor, ImageFormat, MODEL_ID,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::edit::{
        encode_bytes, encode_file, Accessory, EditClient, EditFailure, EditResult, EncodedImage,
        ImageEditor,
    };
    pub use crate::error::{AccessorizeError, Result};
}
