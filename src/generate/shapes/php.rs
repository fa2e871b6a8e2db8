use super::{args, RecipeShape};
use crate::detection::ProjectDescriptor;
use crate::generate::recipe::{Instruction, Stage};
use crate::generate::PHP_FPM_PORT;
use crate::stack::FrameworkId;

pub struct PhpShape;

const COMPOSER_IMAGE: &str = "composer:2";

impl RecipeShape for PhpShape {
    /// Only Laravel has a known runtime layout
    fn accepts(&self, framework: Option<&FrameworkId>) -> bool {
        matches!(framework, Some(FrameworkId::Laravel))
    }

    fn builder(&self, _descriptor: &ProjectDescriptor) -> Stage {
        Stage::builder(COMPOSER_IMAGE)
            .with(Instruction::workdir("/app"))
            .with(Instruction::copy(&["composer.json", "composer.lock*"], "./"))
    }

    fn build_command(&self, _descriptor: &ProjectDescriptor) -> Option<String> {
        Some(
            "composer install --no-dev --no-scripts --no-interaction --prefer-dist --optimize-autoloader --ignore-platform-reqs"
                .to_string(),
        )
    }

    fn runtime(&self, descriptor: &ProjectDescriptor) -> Stage {
        Stage::runtime(&descriptor.base_image)
            .with(Instruction::workdir("/var/www/html"))
            .with(Instruction::run_lines(&[
                "apt-get update && apt-get install -y --no-install-recommends",
                "git",
                "curl",
                "libpng-dev",
                "libonig-dev",
                "libxml2-dev",
                "zip",
                "unzip",
                "&& apt-get clean && rm -rf /var/lib/apt/lists/*",
            ]))
            .with(Instruction::run(
                "docker-php-ext-install pdo_mysql mbstring exif pcntl bcmath gd",
            ))
            .with(Instruction::copy_from_builder("/app/vendor", "./vendor"))
            .with(Instruction::copy(&["."], "."))
            .with(Instruction::run_lines(&[
                "chown -R www-data:www-data",
                "storage",
                "bootstrap/cache",
                "vendor",
            ]))
    }

    /// The web port belongs to the nginx service; the app only serves FastCGI
    fn exposed_ports(&self, _descriptor: &ProjectDescriptor) -> Vec<u16> {
        vec![PHP_FPM_PORT]
    }

    fn command(&self, _descriptor: &ProjectDescriptor) -> Vec<String> {
        args(&["php-fpm"])
    }
}
