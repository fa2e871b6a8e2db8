//! docker-compose topology: the app service plus its backing services

use super::output::{self, COMPOSE_FILE, PROXY_CONFIG_DIR};
use super::proxy::{self, APP_ROOT};
use super::GenerateError;
use crate::catalog::{Catalog, DatabaseCatalogEntry};
use crate::detection::ProjectDescriptor;
use crate::fs::FileSystem;
use crate::stack::{DatabaseId, FrameworkId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const COMPOSE_VERSION: &str = "3.8";
pub const APP_SERVICE: &str = "app";
pub const NETWORK: &str = "app-network";
const RESTART_POLICY: &str = "unless-stopped";

const CACHE_SERVICE: &str = "redis";
const CACHE_IMAGE: &str = "redis:alpine";
const CACHE_PORT: u16 = 6379;

const PROXY_SERVICE: &str = "nginx";
const PROXY_IMAGE: &str = "nginx:alpine";
const PROXY_PORT: u16 = 80;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeDocument {
    pub version: String,
    pub services: BTreeMap<String, Service>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, Network>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, Volume>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub environment: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env_file: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<Healthcheck>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildContext {
    pub context: String,
    pub dockerfile: String,
}

/// Container health check configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Healthcheck {
    /// e.g. `["CMD", "redis-cli", "ping"]`
    pub test: Vec<String>,
    pub interval: String,
    pub timeout: String,
    pub retries: u32,
}

impl Healthcheck {
    fn probe(test: &[&str]) -> Self {
        Self {
            test: test.iter().map(|s| s.to_string()).collect(),
            interval: "10s".to_string(),
            timeout: "5s".to_string(),
            retries: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Network {
    pub driver: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Volume {
    pub driver: String,
}

/// Database engine a framework is paired with
pub fn database_for(framework: &FrameworkId) -> Option<DatabaseId> {
    match framework {
        FrameworkId::Django | FrameworkId::Flask | FrameworkId::FastApi | FrameworkId::Rails => {
            Some(DatabaseId::Postgres)
        }
        FrameworkId::Laravel | FrameworkId::Symfony => Some(DatabaseId::MySql),
        FrameworkId::Express | FrameworkId::NestJs => Some(DatabaseId::MongoDb),
        _ => None,
    }
}

pub fn needs_cache(framework: &FrameworkId) -> bool {
    matches!(
        framework,
        FrameworkId::Laravel | FrameworkId::Rails | FrameworkId::Django | FrameworkId::NestJs
    )
}

/// Frameworks served through nginx in front of PHP-FPM
pub fn needs_proxy(framework: &FrameworkId) -> bool {
    matches!(framework, FrameworkId::Laravel)
}

struct EngineProfile {
    probe: &'static [&'static str],
    data_dir: &'static str,
}

fn engine_profile(database: &DatabaseId) -> Option<EngineProfile> {
    match database {
        DatabaseId::Postgres => Some(EngineProfile {
            probe: &["CMD-SHELL", "pg_isready -U postgres"],
            data_dir: "/var/lib/postgresql/data",
        }),
        DatabaseId::MySql => Some(EngineProfile {
            probe: &["CMD", "mysqladmin", "ping", "-h", "localhost"],
            data_dir: "/var/lib/mysql",
        }),
        DatabaseId::MongoDb => Some(EngineProfile {
            probe: &["CMD", "mongo", "--eval", "db.adminCommand('ping')"],
            data_dir: "/data/db",
        }),
        DatabaseId::Custom(_) => None,
    }
}

fn port_mapping(host: u16, container: u16) -> String {
    format!("{}:{}", host, container)
}

fn data_volume(service: &str) -> String {
    format!("{}-data", service)
}

/// The compose document plus what else must be written alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub document: ComposeDocument,
    /// nginx upstream host, when a proxy config must be written
    pub proxy_upstream: Option<String>,
    pub warnings: Vec<String>,
}

impl Topology {
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.document.services.get(name)
    }

    fn add_backing_service(&mut self, name: &str, service: Service) {
        let volume = data_volume(name);
        self.document.volumes.insert(
            volume,
            Volume {
                driver: "local".to_string(),
            },
        );
        self.document.services.insert(name.to_string(), service);
        if let Some(app) = self.document.services.get_mut(APP_SERVICE) {
            app.depends_on.push(name.to_string());
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

fn app_service(descriptor: &ProjectDescriptor, proxied: bool) -> Service {
    let (ports, volumes) = if proxied {
        (Vec::new(), vec![format!(".:{}", APP_ROOT)])
    } else {
        let ports = descriptor
            .ports()
            .iter()
            .map(|p| port_mapping(*p, *p))
            .collect();
        (ports, Vec::new())
    };

    Service {
        build: Some(BuildContext {
            context: ".".to_string(),
            dockerfile: output::DOCKERFILE.to_string(),
        }),
        ports,
        environment: descriptor.environment.iter().map(|e| e.to_string()).collect(),
        env_file: vec![".env".to_string()],
        volumes,
        networks: vec![NETWORK.to_string()],
        restart: Some(RESTART_POLICY.to_string()),
        ..Default::default()
    }
}

fn database_service(
    entry: &DatabaseCatalogEntry,
    profile: &EngineProfile,
    host_port: u16,
) -> Service {
    Service {
        image: Some(entry.image.clone()),
        ports: vec![port_mapping(host_port, entry.port)],
        environment: entry.environment.iter().map(|e| e.to_string()).collect(),
        volumes: vec![format!("{}:{}", data_volume(entry.name.key()), profile.data_dir)],
        networks: vec![NETWORK.to_string()],
        restart: Some(RESTART_POLICY.to_string()),
        healthcheck: Some(Healthcheck::probe(profile.probe)),
        ..Default::default()
    }
}

fn cache_service() -> Service {
    Service {
        image: Some(CACHE_IMAGE.to_string()),
        ports: vec![port_mapping(CACHE_PORT, CACHE_PORT)],
        volumes: vec![format!("{}:/data", data_volume(CACHE_SERVICE))],
        networks: vec![NETWORK.to_string()],
        restart: Some(RESTART_POLICY.to_string()),
        healthcheck: Some(Healthcheck::probe(&["CMD", "redis-cli", "ping"])),
        ..Default::default()
    }
}

fn proxy_service() -> Service {
    Service {
        image: Some(PROXY_IMAGE.to_string()),
        ports: vec![port_mapping(PROXY_PORT, PROXY_PORT)],
        volumes: vec![
            format!(".:{}", APP_ROOT),
            format!("./{}:/etc/nginx/conf.d", PROXY_CONFIG_DIR),
        ],
        depends_on: vec![APP_SERVICE.to_string()],
        networks: vec![NETWORK.to_string()],
        restart: Some(RESTART_POLICY.to_string()),
        ..Default::default()
    }
}

/// The framework table decides the engine; a requested engine only produces warnings
fn select_database(descriptor: &ProjectDescriptor, topology: &mut Topology) -> Option<DatabaseId> {
    let framework = descriptor.framework.as_ref();
    let framework_name = framework.map_or("a project without a framework", |f| f.key());

    match (framework.and_then(database_for), descriptor.database.as_ref()) {
        (Some(mapped), Some(requested)) if &mapped != requested => {
            topology.warn(format!(
                "Database {} was requested but {} is paired with {}; using {}",
                requested.key(),
                framework_name,
                mapped.key(),
                mapped.key()
            ));
            Some(mapped)
        }
        (Some(mapped), _) => Some(mapped),
        (None, Some(requested)) => {
            topology.warn(format!(
                "Database {} was requested but {} has no database pairing; no database service added",
                requested.key(),
                framework_name
            ));
            None
        }
        (None, None) => None,
    }
}

/// Builds the compose topology for a descriptor
pub fn build_topology(descriptor: &ProjectDescriptor, catalog: &Catalog) -> Topology {
    let framework = descriptor.framework.as_ref();
    let proxied = framework.is_some_and(needs_proxy);

    let mut services = BTreeMap::new();
    services.insert(APP_SERVICE.to_string(), app_service(descriptor, proxied));

    let mut networks = BTreeMap::new();
    networks.insert(
        NETWORK.to_string(),
        Network {
            driver: "bridge".to_string(),
        },
    );

    let mut topology = Topology {
        document: ComposeDocument {
            version: COMPOSE_VERSION.to_string(),
            services,
            networks,
            volumes: BTreeMap::new(),
        },
        proxy_upstream: None,
        warnings: Vec::new(),
    };

    if let Some(database) = select_database(descriptor, &mut topology) {
        match (catalog.database(&database), engine_profile(&database)) {
            (Some(entry), Some(profile)) => {
                let host_port = descriptor.database_port.unwrap_or(entry.port);
                let service = database_service(entry, &profile, host_port);
                topology.add_backing_service(database.key(), service);
            }
            _ => topology.warn(format!(
                "Database {} is not in the database catalog; no database service added",
                database.key()
            )),
        }
    }

    if framework.is_some_and(needs_cache) {
        topology.add_backing_service(CACHE_SERVICE, cache_service());
    }

    if proxied {
        topology
            .document
            .services
            .insert(PROXY_SERVICE.to_string(), proxy_service());
        topology.proxy_upstream = Some(APP_SERVICE.to_string());
    }

    topology
}

/// Files written for a topology
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyOutput {
    pub compose_path: PathBuf,
    pub proxy_config_path: Option<PathBuf>,
    pub warnings: Vec<String>,
}

pub fn generate_topology(
    descriptor: &ProjectDescriptor,
    catalog: &Catalog,
    fs: &dyn FileSystem,
    output_dir: &Path,
) -> Result<TopologyOutput, GenerateError> {
    let topology = build_topology(descriptor, catalog);
    let yaml = serde_yaml::to_string(&topology.document)?;

    output::ensure_dir(fs, output_dir)?;
    let compose_path = output_dir.join(COMPOSE_FILE);
    output::write_verified(fs, &compose_path, &yaml)?;
    info!("Generated {}", compose_path.display());

    let proxy_config_path = match &topology.proxy_upstream {
        Some(upstream) => {
            let path = proxy::write_proxy_config(fs, output_dir, upstream)?;
            info!("Generated {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(TopologyOutput {
        compose_path,
        proxy_config_path,
        warnings: topology.warnings,
    })
}
