mod common;

use tessprep::configs::ConvertConfig;
use tessprep::runtime::trace::{NoopTrace, RecordingTrace, TraceEvent};
use tessprep::types::{ResolvedStructure, StructureStrategy};
use tessprep::{convert, prepare, Error, LabelOverrides};

fn raw_labels() -> ConvertConfig {
    ConvertConfig {
        normalize_labels: false,
        ..ConvertConfig::default()
    }
}

#[test]
fn test_prepare_suggests_cleaned_labels_and_structure() {
    let raw = common::load_fixture("propertius_elegies.xml");
    let config = ConvertConfig::default();
    let prepared = prepare(&raw, &config, &NoopTrace).unwrap();

    assert_eq!(prepared.labels().author, "prop.");
    assert_eq!(prepared.labels().title, "eleg.");
    assert_eq!(prepared.structure().structure().to_string(), "book.poem.line");
    assert_eq!(prepared.structure().strategy(), StructureStrategy::Exact);
    assert_eq!(prepared.suggested_filename(&config), "prop.eleg.tess");
}

#[test]
fn test_convert_with_raw_labels() {
    let raw = common::load_fixture("propertius_elegies.xml");
    let conversion = convert(&raw, &raw_labels(), &NoopTrace).unwrap();

    assert_eq!(conversion.unit_count, 6);
    assert_eq!(conversion.filename, "prop.eleg.tess");
    let first = conversion.tess.lines().next().unwrap();
    assert_eq!(first, "<Prop. Eleg. 1.1.1>\tCynthia prima suis miserum me cepit ocellis,");
    assert!(!conversion.tess.ends_with('\n'));
}

#[test]
fn test_overrides_replace_suggestions() {
    let raw = common::load_fixture("curtius_historiae.xml");
    let config = ConvertConfig::default();
    let prepared = prepare(&raw, &config, &NoopTrace).unwrap();
    assert_eq!(prepared.labels().author, "curtius rufus, quintus.");
    assert_eq!(prepared.labels().title, "historiae alexandri magni.");

    let overrides = LabelOverrides {
        author: Some("curt.".to_string()),
        title: Some("alex.".to_string()),
        structure: None,
    };
    let conversion = prepared.convert(&overrides, &config, &NoopTrace).unwrap();
    assert_eq!(conversion.filename, "curt.alex.tess");
    assert_eq!(
        conversion.tess,
        [
            "<curt. alex. 3.1.1>\tInter haec Alexander ad conducendum ex Peloponneso militem Cleandro cum pecunia misso Lyciae Pamphyliaeque rebus conpositis ad urbem Celaenas exercitum admovit.",
            "<curt. alex. 3.1.2>\tMedia ilia tempestate moenia interfluebat Marsyas, amnis fabulosis Graecorum carminibus inclitus.",
        ]
        .join("\n")
    );
}

#[test]
fn test_structure_override_changes_reference_depth() {
    let raw = common::load_fixture("curtius_historiae.xml");
    let config = raw_labels();
    let prepared = prepare(&raw, &config, &NoopTrace).unwrap();
    let overrides = LabelOverrides {
        structure: Some("book.chapter".to_string()),
        ..LabelOverrides::default()
    };
    let conversion = prepared.convert(&overrides, &config, &NoopTrace).unwrap();
    assert_eq!(conversion.structure.to_string(), "book.chapter");
    assert_eq!(conversion.unit_count, 1);
    assert!(conversion.tess.starts_with(
        "<Curtius Rufus, Quintus Historiae Alexandri Magni 3.1>\tInter haec Alexander"
    ));
    assert!(conversion.tess.ends_with("carminibus inclitus."));
}

#[test]
fn test_blank_structure_override_is_rejected() {
    let raw = common::load_fixture("curtius_historiae.xml");
    let config = ConvertConfig::default();
    let prepared = prepare(&raw, &config, &NoopTrace).unwrap();
    let overrides = LabelOverrides {
        structure: Some("book..section".to_string()),
        ..LabelOverrides::default()
    };
    let err = prepared.convert(&overrides, &config, &NoopTrace).unwrap_err();
    assert!(matches!(err, Error::InvalidStructure(_)));
}

#[test]
fn test_missing_cts_block_stops_before_the_walk() {
    let raw = common::load_fixture("catullus_carmina.xml");
    let trace = RecordingTrace::new();
    let err = convert(&raw, &ConvertConfig::default(), &trace).unwrap_err();

    assert!(matches!(err, Error::Lookup { step: "citation structure", .. }));
    assert!(trace
        .events()
        .iter()
        .all(|e| !matches!(e, TraceEvent::ChunksFound { .. } | TraceEvent::UnitBuilt { .. })));
}

#[test]
fn test_inferred_strategy_converts_documents_without_cts() {
    let raw = common::load_fixture("catullus_carmina.xml");
    let config = ConvertConfig {
        strategy: StructureStrategy::Inferred,
        ..raw_labels()
    };
    let prepared = prepare(&raw, &config, &NoopTrace).unwrap();
    assert!(matches!(prepared.structure(), ResolvedStructure::Inferred(_)));

    let conversion = prepared
        .convert(&LabelOverrides::default(), &config, &NoopTrace)
        .unwrap();
    assert_eq!(
        conversion.tess,
        [
            "<Catull. Carmina 1.1>\tCui dono lepidum novum libellum",
            "<Catull. Carmina 1.2>\tarida modo pumice expolitum?",
            "<Catull. Carmina 2.1>\tPasser, deliciae meae puellae,",
        ]
        .join("\n")
    );
    assert_eq!(conversion.filename, "catull.carmina.tess");
}

#[test]
fn test_configured_levels_replace_declared_structure() {
    let raw = common::load_fixture("propertius_elegies.xml");
    let config = ConvertConfig {
        levels: Some(tessprep::types::CitationStructure::parse_dotted("book.poem").unwrap()),
        ..raw_labels()
    };
    let conversion = convert(&raw, &config, &NoopTrace).unwrap();
    let refs = conversion
        .tess
        .lines()
        .map(|line| line.split('\t').next().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        refs,
        vec!["<Prop. Eleg. 1.1>", "<Prop. Eleg. 1.2>", "<Prop. Eleg. 2.1>", "<Prop. Eleg. 4.1>"]
    );
}

#[test]
fn test_malformed_markup_is_reported_unchanged() {
    let err = convert("<TEI><text></TEI>", &ConvertConfig::default(), &NoopTrace).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_trace_records_each_stage_in_order() {
    let raw = common::load_fixture("ausonius_eclogae.xml");
    let trace = RecordingTrace::new();
    convert(&raw, &raw_labels(), &trace).unwrap();

    let names = trace.events().iter().map(|e| e.name()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "preprocessed",
            "parsed",
            "author_resolved",
            "title_resolved",
            "structure_resolved",
            "chunks_found",
            "unit_built",
            "finished",
        ]
    );
    let events = trace.events();
    assert_eq!(events[2], TraceEvent::AuthorResolved("Ausonius, Decimus Magnus".to_string()));
    assert_eq!(events[3], TraceEvent::TitleResolved("Eclogarum Liber".to_string()));
    assert_eq!(events[7], TraceEvent::Finished { units: 1 });
}
