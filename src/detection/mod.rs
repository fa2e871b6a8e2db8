pub mod analyzer;
pub mod classifier;
pub mod descriptor;

pub use analyzer::{Analysis, AnalysisError, ProjectAnalyzer};
pub use classifier::{marker_matches, FrameworkClassifier, FrameworkMatch};
pub use descriptor::{EnvVar, OverrideError, Overrides, ProjectDescriptor};
