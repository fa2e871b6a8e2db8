//! nginx front for PHP-FPM applications

use super::output::{self, PROXY_CONFIG_DIR, PROXY_CONFIG_FILE};
use super::{GenerateError, PHP_FPM_PORT};
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

/// Document root inside both the app and nginx containers
pub const APP_ROOT: &str = "/var/www/html";

/// nginx server block forwarding PHP requests to `upstream` over FastCGI
pub fn nginx_config(upstream: &str) -> String {
    format!(
        r#"server {{
    listen 80;
    index index.php index.html;
    server_name localhost;
    error_log  /var/log/nginx/error.log;
    access_log /var/log/nginx/access.log;
    root {root}/public;

    location / {{
        try_files $uri $uri/ /index.php?$query_string;
    }}

    location ~ \.php$ {{
        try_files $uri =404;
        fastcgi_split_path_info ^(.+\.php)(/.+)$;
        fastcgi_pass {upstream}:{port};
        fastcgi_index index.php;
        include fastcgi_params;
        fastcgi_param SCRIPT_FILENAME $document_root$fastcgi_script_name;
        fastcgi_param PATH_INFO $fastcgi_path_info;
    }}
}}
"#,
        root = APP_ROOT,
        upstream = upstream,
        port = PHP_FPM_PORT,
    )
}

/// Writes the proxy configuration under `<output_dir>/docker/nginx/conf.d`
pub fn write_proxy_config(
    fs: &dyn FileSystem,
    output_dir: &Path,
    upstream: &str,
) -> Result<PathBuf, GenerateError> {
    let dir = output_dir.join(PROXY_CONFIG_DIR);
    output::ensure_dir(fs, &dir)?;

    let path = dir.join(PROXY_CONFIG_FILE);
    output::write_verified(fs, &path, &nginx_config(upstream))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_config_forwards_to_fpm() {
        let config = nginx_config("app");

        assert!(config.contains("fastcgi_pass app:9000;"));
        assert!(config.contains("root /var/www/html/public;"));
        assert!(config.contains("try_files $uri $uri/ /index.php?$query_string;"));
    }

    #[test]
    fn test_write_proxy_config() {
        let fs = MockFileSystem::new();

        let path = write_proxy_config(&fs, Path::new("/mock"), "app").unwrap();

        assert_eq!(
            path,
            PathBuf::from("/mock/docker/nginx/conf.d/default.conf")
        );
        assert!(fs.read_to_string(&path).unwrap().starts_with("server {"));
    }
}
