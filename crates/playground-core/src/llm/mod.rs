mod traits;
mod huggingface;

pub use traits::*;
pub use huggingface::HuggingFaceClient;
