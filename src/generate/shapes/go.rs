use super::{args, RecipeShape};
use crate::detection::ProjectDescriptor;
use crate::generate::recipe::{Instruction, Stage};

pub struct GoShape;

/// Statically linked binaries only need a minimal image
const RUNTIME_IMAGE: &str = "alpine:3.19";

impl RecipeShape for GoShape {
    fn builder(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::builder(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy(&["go.*"], "./"))
            .with(Instruction::run("go mod download"))
            .with(Instruction::copy(&["."], "."))
    }

    fn build_command(&self, _descriptor: &ProjectDescriptor) -> Option<String> {
        Some("CGO_ENABLED=0 GOOS=linux go build -o main .".to_string())
    }

    fn runtime(&self, _descriptor: &ProjectDescriptor) -> Stage {
        Stage::runtime(RUNTIME_IMAGE)
            .with(Instruction::run("apk --no-cache add ca-certificates"))
            .with(Instruction::workdir("/root/"))
            .with(Instruction::copy_from_builder("/app/main", "."))
    }

    fn command(&self, _descriptor: &ProjectDescriptor) -> Vec<String> {
        args(&["./main"])
    }
}
