//! Whole-pipeline tests: batch file -> normalize -> resolve -> build -> setup.

use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

use repokit_cli::backend::{BackendOperation, RecordingBackend};
use repokit_cli::batch::io::load_batches;
use repokit_cli::batch::{BatchEntry, RequestBatch};
use repokit_cli::collection::{CollectionFixture, CollectionState, FactoryRegistry};
use repokit_cli::context::{FixtureScope, InvocationContext};
use repokit_cli::core::RepokitError;
use repokit_cli::test_utils::{BatchFixture, RecordingFactory, init_test_logging};

fn stub_registry(kinds: &[&str]) -> Result<(FactoryRegistry, RecordingFactory)> {
    let factory = RecordingFactory::new();
    let mut registry = FactoryRegistry::new();
    for kind in kinds {
        factory.register(&mut registry, kind)?;
    }
    Ok((registry, factory))
}

#[test]
fn factories_see_items_in_batch_order() -> Result<()> {
    init_test_logging(None);
    let (registry, factory) = stub_registry(&["YumRepository", "FileRepository"])?;
    let batch = RequestBatch::from_value(json!({
        "YumRepository": [{"url": "http://a"}, {"url": "http://b"}],
        "distro": "rhel7",
        "FileRepository": {"url": "http://c"},
    }))?;

    let collection = CollectionFixture::function(&registry).assemble(&batch, &InvocationContext::new())?;

    let seen: Vec<(String, serde_json::Value)> = factory
        .calls()
        .into_iter()
        .map(|(kind, options)| (kind, options["url"].clone()))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("YumRepository".to_string(), json!("http://a")),
            ("YumRepository".to_string(), json!("http://b")),
            ("FileRepository".to_string(), json!("http://c")),
        ]
    );
    assert_eq!(collection.distro(), Some("rhel7"));
    Ok(())
}

#[test]
fn repeated_kinds_pushed_programmatically_stay_separate() -> Result<()> {
    let (registry, factory) = stub_registry(&["YumRepository"])?;
    let mut batch = RequestBatch::new();
    batch
        .push("YumRepository", BatchEntry::from_value(json!({"url": "http://a"})))
        .push("distro", BatchEntry::from_value(json!("rhel8")))
        .push("YumRepository", BatchEntry::from_value(json!({"url": "http://b"})));

    let collection = CollectionFixture::module(&registry).assemble(&batch, &InvocationContext::new())?;
    assert_eq!(collection.len(), 2);
    assert_eq!(factory.call_count(), 2);
    assert_eq!(collection.distro(), Some("rhel8"));
    Ok(())
}

#[test]
fn literal_distro_named_like_a_parameter_is_not_indirect() -> Result<()> {
    let registry = FactoryRegistry::with_builtin_kinds()?;
    let batch = RequestBatch::from_value(json!({
        "distro": "rhel7",
        "RHELRepository": {"distro": "cdn"},
    }))?;
    let ctx = InvocationContext::new().with_param(FixtureScope::Function, "cdn", json!(true));

    let collection = CollectionFixture::function(&registry).assemble(&batch, &ctx)?;
    assert_eq!(collection.handles()[0].distro(), Some("cdn"));
    Ok(())
}

#[test]
fn explicit_indirection_works_on_any_key() -> Result<()> {
    let registry = FactoryRegistry::with_builtin_kinds()?;
    let batch = RequestBatch::from_value(json!({
        "distro": "rhel7",
        "DockerRepository": {"url": {"from_param": "registry_url"}, "name": "busybox"},
    }))?;
    let ctx = InvocationContext::new().with_param(
        FixtureScope::Session,
        "registry_url",
        json!("https://registry.example.com"),
    );

    let collection = CollectionFixture::function(&registry).assemble(&batch, &ctx)?;
    assert_eq!(collection.handles()[0].url(), Some("https://registry.example.com"));
    Ok(())
}

#[test]
fn custom_indirection_keys_disable_the_sentinel() -> Result<()> {
    let registry = FactoryRegistry::with_builtin_kinds()?;
    let batch = RequestBatch::from_value(json!({
        "distro": "rhel7",
        "RHELRepository": {"distro": "distro"},
    }))?;
    let ctx = InvocationContext::new().with_param(FixtureScope::Function, "distro", json!("rhel9"));

    let sentinel = CollectionFixture::function(&registry).assemble(&batch, &ctx)?;
    assert_eq!(sentinel.handles()[0].distro(), Some("rhel9"));

    let literal = CollectionFixture::function(&registry)
        .indirection_keys(["cdn"])
        .assemble(&batch, &ctx)?;
    assert_eq!(literal.handles()[0].distro(), Some("distro"));
    Ok(())
}

#[test]
fn narrowest_visible_binding_wins() -> Result<()> {
    let registry = FactoryRegistry::with_builtin_kinds()?;
    let batch = RequestBatch::from_value(json!({"SatelliteToolsRepository": {"cdn": "cdn"}}))?;
    let ctx = InvocationContext::new()
        .with_param(FixtureScope::Session, "distro", json!("rhel7"))
        .with_param(FixtureScope::Session, "cdn", json!(false))
        .with_param(FixtureScope::Module, "cdn", json!(true))
        .with_param(FixtureScope::Function, "distro", json!("rhel9"));

    let function = CollectionFixture::function(&registry).assemble(&batch, &ctx)?;
    assert_eq!(function.distro(), Some("rhel9"));
    assert_eq!(function.handles()[0].options()["cdn"], json!(true));

    let module = CollectionFixture::module(&registry).assemble(&batch, &ctx)?;
    assert_eq!(module.distro(), Some("rhel7"));
    Ok(())
}

#[test]
fn invalid_cdn_type_is_rejected_by_the_factory() -> Result<()> {
    let registry = FactoryRegistry::with_builtin_kinds()?;
    let batch = RequestBatch::from_value(json!({
        "distro": "rhel8",
        "RHELAnsibleEngineRepository": {"cdn": "cdn"},
    }))?;
    let ctx = InvocationContext::new().with_param(FixtureScope::Function, "cdn", json!("yes"));

    let err = CollectionFixture::function(&registry).assemble(&batch, &ctx).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RepokitError>(),
        Some(RepokitError::InvalidOptions { .. })
    ));
    Ok(())
}

#[test]
fn every_batch_of_a_file_binds_independently() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("set.toml");
    std::fs::write(
        &path,
        r#"
[[batches]]
distro = "rhel7"
YumRepository = { url = "http://a" }

[[batches]]
distro = "rhel8"
SatelliteToolsRepository = {}
RHELAnsibleEngineRepository = { cdn = true }
"#,
    )?;
    let registry = FactoryRegistry::with_builtin_kinds()?;
    let fixture = CollectionFixture::module(&registry);

    let batches = load_batches(&path)?;
    assert_eq!(batches.len(), 2);

    let mut backend = RecordingBackend::new();
    let mut lces = Vec::new();
    for (lce_id, batch) in (10..).zip(&batches) {
        let collection =
            fixture.assemble_with_setup(batch, &InvocationContext::new(), &mut backend, 1, lce_id)?;
        assert_eq!(collection.state(), CollectionState::ContentBound);
        lces.extend(collection.setup_content_data().map(|d| d.lce.id));
    }
    assert_eq!(lces, vec![10, 11]);

    let products = backend
        .operations()
        .into_iter()
        .filter(|op| *op == BackendOperation::CreateProduct)
        .count();
    assert_eq!(products, 1, "only the batch with custom repositories needs a product");
    Ok(())
}

#[test]
fn sample_batches_load() -> Result<()> {
    let temp = TempDir::new()?;
    for fixture in [BatchFixture::basic(), BatchFixture::indirect(), BatchFixture::without_distro()] {
        let path = fixture.write_to(temp.path())?;
        assert_eq!(load_batches(&path)?.len(), 1, "{}", fixture.name);
    }
    assert!(load_batches(&BatchFixture::invalid_syntax().write_to(temp.path())?).is_err());
    Ok(())
}
