use super::recipe::Stage;
use crate::detection::ProjectDescriptor;
use crate::stack::{FrameworkId, LanguageId};

pub mod go;
pub mod java;
pub mod node;
pub mod php;
pub mod python;
pub mod ruby;

pub use go::GoShape;
pub use java::JavaShape;
pub use node::NodeShape;
pub use php::PhpShape;
pub use python::PythonShape;
pub use ruby::RubyShape;

/// Two-stage Dockerfile layout for one language.
///
/// Shapes own the stage layout. Build and start commands come from the framework's catalog
/// entry; [`RecipeShape::build_command`] and [`RecipeShape::command`] are the language's
/// generic fallbacks. The recipe builder appends the build step to the builder stage, and
/// the descriptor environment, `EXPOSE` lines and the start command to the runtime stage.
pub trait RecipeShape: Send + Sync {
    /// Whether this shape can build the given framework (`None` = generic project)
    fn accepts(&self, _framework: Option<&FrameworkId>) -> bool {
        true
    }

    /// Dependency install, aliased `builder`
    fn builder(&self, descriptor: &ProjectDescriptor) -> Stage;

    /// Build step when the framework's catalog entry has none
    fn build_command(&self, _descriptor: &ProjectDescriptor) -> Option<String> {
        None
    }

    /// Runtime image with build artifacts copied in
    fn runtime(&self, descriptor: &ProjectDescriptor) -> Stage;

    fn exposed_ports(&self, descriptor: &ProjectDescriptor) -> Vec<u16> {
        descriptor.ports().to_vec()
    }

    /// Start command when the framework's catalog entry has none
    fn command(&self, descriptor: &ProjectDescriptor) -> Vec<String>;
}

pub fn shape_for(language: &LanguageId) -> Option<&'static dyn RecipeShape> {
    match language {
        LanguageId::NodeJs => Some(&NodeShape),
        LanguageId::Python => Some(&PythonShape),
        LanguageId::Go => Some(&GoShape),
        LanguageId::Java => Some(&JavaShape),
        LanguageId::Php => Some(&PhpShape),
        LanguageId::Ruby => Some(&RubyShape),
        LanguageId::Custom(_) => None,
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}
