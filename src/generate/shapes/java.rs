use super::{args, RecipeShape};
use crate::detection::ProjectDescriptor;
use crate::generate::recipe::{Instruction, Stage};

pub struct JavaShape;

impl RecipeShape for JavaShape {
    fn builder(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::builder(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::run_lines(&[
                "apt-get update",
                "&& apt-get install -y --no-install-recommends maven",
                "&& rm -rf /var/lib/apt/lists/*",
            ]))
            .with(Instruction::copy(&["pom.xml"], "."))
            .with(Instruction::run("mvn -B dependency:go-offline"))
            .with(Instruction::copy(&["src"], "./src"))
    }

    fn build_command(&self, _descriptor: &ProjectDescriptor) -> Option<String> {
        Some("mvn -B package -DskipTests".to_string())
    }

    fn runtime(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::runtime(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy_from_builder("/app/target/*.jar", "app.jar"))
    }

    fn command(&self, _descriptor: &ProjectDescriptor) -> Vec<String> {
        args(&["java", "-jar", "app.jar"])
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::recipe_for;
    use crate::stack::{FrameworkId, LanguageId};

    #[test]
    fn test_spring_boot_recipe() {
        let recipe = recipe_for(
            LanguageId::Java,
            Some(FrameworkId::SpringBoot),
            "openjdk:21-slim",
            &[8080],
        );
        let rendered = recipe.to_string();

        assert!(rendered.contains("FROM openjdk:21-slim AS builder"));
        assert!(rendered.contains("RUN mvn -B package -DskipTests"));
        assert!(rendered.contains("COPY --from=builder /app/target/*.jar app.jar"));
        assert_eq!(recipe.command().unwrap(), &["java", "-jar", "app.jar"]);
        assert_eq!(recipe.exposed_ports(), vec![8080]);
    }
}
