pub mod error;
pub mod remote;
pub mod traits;

pub use error::OcrError;
pub use remote::OcrSpaceClient;
pub use traits::OcrProvider;
