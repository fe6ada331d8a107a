pub mod fetcher;
pub mod platform;
pub mod release_api;

pub use fetcher::{
    file_name_from_url, retry_on_timeout, AttemptError, Fetcher, ProgressCallback, ProgressEvent,
    RetryPolicy,
};
pub use platform::Platform;
pub use release_api::{ReleaseBinary, ReleaseInfo, ReleaseQuery};
