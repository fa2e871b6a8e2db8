use super::{args, RecipeShape};
use crate::detection::ProjectDescriptor;
use crate::generate::recipe::{Instruction, Stage};

pub struct RubyShape;

impl RecipeShape for RubyShape {
    fn builder(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::builder(&descriptor.base_image)
            .with(Instruction::run("apk add --no-cache build-base"))
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy(&["Gemfile", "Gemfile.lock*"], "./"))
            .with(Instruction::run_lines(&[
                "bundle config set --local without 'development test'",
                "&& bundle install",
            ]))
            .with(Instruction::copy(&["."], "."))
    }

    fn runtime(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::runtime(&descriptor.base_image)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy_from_builder(
                "/usr/local/bundle",
                "/usr/local/bundle",
            ))
            .with(Instruction::copy_from_builder("/app", "/app"))
    }

    fn command(&self, _descriptor: &ProjectDescriptor) -> Vec<String> {
        args(&["bundle", "exec", "ruby", "app.rb"])
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::recipe_for;
    use crate::stack::{FrameworkId, LanguageId};

    #[test]
    fn test_rails_precompiles_assets() {
        let recipe = recipe_for(
            LanguageId::Ruby,
            Some(FrameworkId::Rails),
            "ruby:3.2-alpine",
            &[3000],
        );
        let rendered = recipe.to_string();

        assert!(rendered.contains("SECRET_KEY_BASE_DUMMY=1 bundle exec rails assets:precompile"));
        assert!(rendered.contains("COPY --from=builder /usr/local/bundle /usr/local/bundle"));
        assert_eq!(
            recipe.command().unwrap(),
            &["bundle", "exec", "rails", "server", "-b", "0.0.0.0", "-p", "3000"]
        );
    }

    #[test]
    fn test_plain_ruby_runs_app_rb() {
        let recipe = recipe_for(LanguageId::Ruby, None, "ruby:3.3-alpine", &[]);

        assert!(!recipe.to_string().contains("assets:precompile"));
        assert_eq!(
            recipe.command().unwrap(),
            &["bundle", "exec", "ruby", "app.rb"]
        );
    }
}
