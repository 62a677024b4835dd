//! Stack plan: the desired network and containers for one project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::config::{DataConfig, StackConfig};
use crate::domain::container::{
    BuildSpec, ContainerSpec, NetworkSpec, Role, VolumeMount, container_name,
};

/// Build argument carrying the base image override.
pub const BASE_IMAGE_ARG: &str = "BASE_IMAGE";

/// Everything `dabk build` converges, in reconcile order (app first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackPlan {
    pub project_root: PathBuf,
    pub network: NetworkSpec,
    pub containers: Vec<ContainerSpec>,
}

impl StackPlan {
    /// Derive the plan from validated configuration.
    #[must_use]
    pub fn new(project_root: &Path, config: &StackConfig) -> Self {
        let network = NetworkSpec::for_project(&config.project_name);
        let mut containers = vec![app_spec(project_root, config, &network)];
        if let Some(rel) = &config.data_rel {
            containers.push(data_spec(project_root, config, &network, Role::DataRel, rel));
        }
        if let Some(nonrel) = &config.data_nonrel {
            containers.push(data_spec(project_root, config, &network, Role::DataNonrel, nonrel));
        }
        Self {
            project_root: project_root.to_path_buf(),
            network,
            containers,
        }
    }

    /// Container names, app first: the handoff file content.
    #[must_use]
    pub fn container_names(&self) -> Vec<String> {
        self.containers.iter().map(|c| c.name.clone()).collect()
    }
}

fn build_args(base_image: Option<&str>) -> BTreeMap<String, String> {
    base_image
        .map(|image| BTreeMap::from([(BASE_IMAGE_ARG.to_string(), image.to_string())]))
        .unwrap_or_default()
}

/// Bind-mount sources must be absolute; relative paths are project-relative.
fn host_path(root: &Path, host: &str) -> String {
    if Path::new(host).is_absolute() {
        host.to_string()
    } else {
        root.join(host.strip_prefix("./").unwrap_or(host))
            .to_string_lossy()
            .into_owned()
    }
}

fn app_spec(root: &Path, config: &StackConfig, network: &NetworkSpec) -> ContainerSpec {
    let app = &config.app;
    let name = container_name(&config.project_name, Role::App);
    ContainerSpec {
        role: Role::App,
        image: name.clone(),
        network: network.name.clone(),
        host_port: app.host_port,
        container_port: app.container_port,
        volume: app.volume_host.as_deref().map(|host| VolumeMount {
            host_path: host_path(root, host),
            container_path: app.volume_container.clone(),
        }),
        build: BuildSpec {
            context: root.to_path_buf(),
            dockerfile: app.dockerfile.clone(),
            tag: name.clone(),
            args: build_args(app.base_image.as_deref()),
        },
        name,
    }
}

fn data_spec(
    root: &Path,
    config: &StackConfig,
    network: &NetworkSpec,
    role: Role,
    data: &DataConfig,
) -> ContainerSpec {
    let name = container_name(&config.project_name, role);
    ContainerSpec {
        role,
        image: name.clone(),
        network: network.name.clone(),
        host_port: data.host_port,
        container_port: data.kind.container_port(),
        volume: None,
        build: BuildSpec {
            context: root.to_path_buf(),
            dockerfile: data.dockerfile.clone(),
            tag: name.clone(),
            args: build_args(data.base_image.as_deref()),
        },
        name,
    }
}
