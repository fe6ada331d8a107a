pub mod installation;
pub mod launcher;
pub mod locator;
pub mod version_store;

pub use installation::RuntimeInstallation;
pub use launcher::{JavaCommand, Launcher};
pub use locator::{validate_java_home, FixedJavaLocator, HostJavaLocator, JavaLocator};
pub use version_store::{Installations, Manifest, VersionStore};
