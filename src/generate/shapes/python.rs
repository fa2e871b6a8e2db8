use super::{args, RecipeShape};
use crate::detection::ProjectDescriptor;
use crate::generate::recipe::{Instruction, Stage};

pub struct PythonShape;

impl RecipeShape for PythonShape {
    fn builder(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::builder(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy(&["requirements.txt"], "."))
            .with(Instruction::run(
                "pip install --user --no-cache-dir -r requirements.txt",
            ))
    }

    fn runtime(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::runtime(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy_from_builder("/root/.local", "/root/.local"))
            .with(Instruction::copy(&["."], "."))
            .with(Instruction::env("PATH", "/root/.local/bin:$PATH"))
    }

    fn command(&self, _descriptor: &ProjectDescriptor) -> Vec<String> {
        args(&["python", "app.py"])
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::recipe_for;
    use crate::stack::{FrameworkId, LanguageId};
    use yare::parameterized;

    #[parameterized(
        django = { FrameworkId::Django, 8000, &["python", "manage.py", "runserver", "0.0.0.0:8000"] },
        flask = { FrameworkId::Flask, 5000, &["flask", "run", "--host=0.0.0.0", "--port=5000"] },
        fastapi = { FrameworkId::FastApi, 9000, &["uvicorn", "main:app", "--host", "0.0.0.0", "--port", "9000"] },
    )]
    fn test_start_command_uses_primary_port(framework: FrameworkId, port: u16, expected: &[&str]) {
        let recipe = recipe_for(LanguageId::Python, Some(framework), "python:3.9-slim", &[port]);

        assert_eq!(recipe.command().unwrap(), expected);
        assert_eq!(recipe.exposed_ports(), vec![port]);
    }

    #[test]
    fn test_user_site_packages_copied() {
        let rendered =
            recipe_for(LanguageId::Python, None, "python:3.11-slim", &[]).to_string();

        assert!(rendered.contains("RUN pip install --user --no-cache-dir -r requirements.txt"));
        assert!(rendered.contains("COPY --from=builder /root/.local /root/.local"));
        assert!(rendered.contains("ENV PATH=/root/.local/bin:$PATH"));
        assert!(rendered.ends_with("CMD [\"python\", \"app.py\"]\n"));
        assert!(!rendered.contains("EXPOSE"));
    }
}
