pub mod extractor;
pub mod pipeline;
pub mod verifier;

pub use extractor::{extract, ArchiveFormat, ArchiveJob, ExtractSummary};
pub use pipeline::{InstallOptions, InstallOutcome, Installer};
pub use verifier::{compute_digest, verify};
