use super::{args, RecipeShape};
use crate::detection::ProjectDescriptor;
use crate::generate::recipe::{Instruction, Stage};
use crate::stack::FrameworkId;

pub struct NodeShape;

impl RecipeShape for NodeShape {
    fn builder(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::builder(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy(&["package*.json"], "./"))
            .with(Instruction::run("npm install"))
            .with(Instruction::copy(&["."], "."))
    }

    fn runtime(&self, descriptor: &ProjectDescriptor) -> Stage {
        let stage = Stage::runtime(&descriptor.base_image).with(Instruction::workdir("/app"));

        match descriptor.framework {
            Some(FrameworkId::NextJs) => stage
                .with(Instruction::copy_from_builder("/app/.next", "./.next"))
                .with(Instruction::copy_from_builder("/app/public", "./public"))
                .with(Instruction::copy_from_builder("/app/package*.json", "./"))
                .with(Instruction::copy_from_builder("/app/node_modules", "./node_modules")),
            Some(FrameworkId::React) => stage
                .with(Instruction::copy_from_builder("/app/build", "./build"))
                .with(Instruction::copy_from_builder("/app/package*.json", "./"))
                .with(Instruction::run("npm install --omit=dev")),
            Some(FrameworkId::Angular) => stage
                .with(Instruction::copy_from_builder("/app/dist", "./dist"))
                .with(Instruction::run("npm install -g serve")),
            Some(FrameworkId::NestJs) => stage
                .with(Instruction::copy_from_builder("/app/dist", "./dist"))
                .with(Instruction::copy_from_builder("/app/package*.json", "./"))
                .with(Instruction::copy_from_builder("/app/node_modules", "./node_modules")),
            _ => stage.with(Instruction::copy_from_builder("/app", ".")),
        }
    }

    fn command(&self, _descriptor: &ProjectDescriptor) -> Vec<String> {
        args(&["node", "index.js"])
    }
}
