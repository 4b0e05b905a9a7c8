//! Library integration tests.

use tempfile::TempDir;
use veman::builder::EnvironmentBuilder;
use veman::history::HistoryManager;
use veman::runtime::MockRuntime;
use veman::store::{CreateOptions, EnvironmentName, EnvironmentStore};
use veman::upgrade::{Components, UpgradeOrchestrator};
use veman::VemanError;

#[test]
fn error_types_are_public() {
    let err = VemanError::NotFound {
        name: "test".into(),
    };
    assert!(err.to_string().contains("test"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> veman::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use veman::cli::{Cli, Commands};

    let cli = Cli::parse_from(["veman", "history", "--all", "-v"]);
    if let Some(Commands::History(args)) = cli.command {
        assert!(args.all);
        assert!(args.verbose);
    } else {
        panic!("Expected History command");
    }
}

#[test]
fn create_upgrade_and_read_history_through_the_api() {
    let temp = TempDir::new().unwrap();
    let store = EnvironmentStore::new(temp.path().join("env"));
    let runtime = MockRuntime::new();
    let builder = EnvironmentBuilder::new(&runtime, vec!["pip".into(), "setuptools".into()]);

    let env = store
        .create(
            &EnvironmentName::parse("science").unwrap(),
            &CreateOptions::default(),
            false,
            &builder,
        )
        .unwrap();
    std::fs::write(env.history_file(), "jupyter lab\n").unwrap();

    let report = UpgradeOrchestrator::new(&store, &builder)
        .upgrade(Some("science"), Components::default(), false)
        .unwrap();
    assert!(report.succeeded());

    let lines = HistoryManager::new(&store)
        .history_for_single("science")
        .unwrap();
    assert_eq!(lines, vec!["jupyter lab"]);
}

#[test]
fn separate_roots_do_not_share_environments() {
    let temp = TempDir::new().unwrap();
    let default_root = EnvironmentStore::new(temp.path().join("default"));
    let custom_root = EnvironmentStore::new(temp.path().join("custom"));
    let runtime = MockRuntime::new();
    let builder = EnvironmentBuilder::new(&runtime, vec![]);

    custom_root
        .create(
            &EnvironmentName::parse("e").unwrap(),
            &CreateOptions::default(),
            false,
            &builder,
        )
        .unwrap();

    assert!(default_root.list().unwrap().is_empty());
    let names: Vec<_> = custom_root
        .list()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["e"]);
}
