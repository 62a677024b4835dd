//! Property-based tests for naming and port validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use dabk_cli::domain::config::parse_port;
use dabk_cli::domain::container::{container_name, network_name};
use dabk_cli::domain::{EnvMap, Role, StackConfig, StackPlan};

fn project_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,20}"
}

proptest! {
    /// Names are a pure function of the project name and role.
    #[test]
    fn prop_names_are_derived_from_project(project in project_name()) {
        prop_assert_eq!(network_name(&project), format!("{project}-network"));
        prop_assert_eq!(
            container_name(&project, Role::App),
            format!("{project}-app-container")
        );
        prop_assert_ne!(
            container_name(&project, Role::DataRel),
            container_name(&project, Role::DataNonrel)
        );
    }

    /// The handoff list always starts with the app container.
    #[test]
    fn prop_plan_lists_app_first(project in project_name(), with_rel in any::<bool>()) {
        let mut env = EnvMap::new();
        env.insert("PROJECT_NAME".into(), project.clone());
        if with_rel {
            env.insert("DATA_REL_TYPE".into(), "postgres".into());
        }
        let config = StackConfig::from_env(&env).expect("valid config");
        let plan = StackPlan::new(std::path::Path::new("/proj"), &config);
        let names = plan.container_names();

        prop_assert_eq!(names.len(), if with_rel { 2 } else { 1 });
        prop_assert_eq!(&names[0], &container_name(&project, Role::App));
        prop_assert!(plan.containers.iter().all(|c| c.network == plan.network.name));
    }

    /// Every non-zero u16 round-trips through the port parser.
    #[test]
    fn prop_valid_ports_parse(port in 1u16..=u16::MAX) {
        prop_assert_eq!(parse_port("APP_HOST_PORT", &port.to_string()).ok(), Some(port));
    }

    /// Values above the TCP range never parse.
    #[test]
    fn prop_out_of_range_ports_fail(port in 65_536u32..10_000_000) {
        prop_assert!(parse_port("APP_HOST_PORT", &port.to_string()).is_err());
    }

    /// Non-numeric text never parses.
    #[test]
    fn prop_non_numeric_ports_fail(raw in "[a-zA-Z]{1,8}") {
        prop_assert!(parse_port("APP_HOST_PORT", &raw).is_err());
    }
}

#[test]
fn test_zero_port_is_rejected() {
    assert!(parse_port("APP_HOST_PORT", "0").is_err());
}
