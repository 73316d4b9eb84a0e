//! End-to-end descriptor generation tests against reference text.

use std::fs;
use std::time::Duration;

use chrono::NaiveDate;

use nemsgen::allocator::{allocate_registry, ProcessorRange};
use nemsgen::config_loader::load_config;
use nemsgen::coupling::ConnectionGraph;
use nemsgen::model::{AttributeValue, ModelEntry, ModelFamily};
use nemsgen::nuopc::ConfigurationRenderer;
use nemsgen::orchestrator::{generate_configuration, WriteOptions};
use nemsgen::registry::ComponentRegistry;
use nemsgen::sequence::RunSequenceBuilder;

const REFERENCE_MAIN: &str = "\
# EARTH #
EARTH_component_list: ATM WAV OCN
EARTH_attributes::
  Verbosity = min
::

# ATM #
ATM_model:                      atmesh
ATM_petlist_bounds:             0 0
ATM_attributes::
  Verbosity = min
::

# WAV #
WAV_model:                      ww3data
WAV_petlist_bounds:             1 1
WAV_attributes::
  Verbosity = min
::

# OCN #
OCN_model:                      adcirc
OCN_petlist_bounds:             2 12
OCN_attributes::
  Verbosity = max
  DumpFields = false
::

# Run Sequence #
runSeq::
  @3600
    ATM -> OCN   :remapMethod=redist
    WAV -> OCN   :remapMethod=redist
    ATM
    WAV
    OCN
  @
::
";

const REFERENCE_MODEL: &str = "\
total_member:            1
print_esmf:              .true.
namelist:                atm_namelist
PE_MEMBER01:             13
start_year:              2020
start_month:             6
start_day:               1
start_hour:              0
start_minute:            0
start_second:            0
nhours_fcst:             24
RUN_CONTINUE:            .false.
ENS_SPS:                 .false.
";

fn example_system() -> (ComponentRegistry, ConnectionGraph) {
    let mut registry = ComponentRegistry::new();
    registry
        .set(
            ModelFamily::Atmosphere,
            ModelEntry::forcing(ModelFamily::Atmosphere, "~/wind_atm_fin_ch_time_vec.nc").unwrap(),
        )
        .unwrap();
    registry
        .set(
            ModelFamily::Wave,
            ModelEntry::forcing(ModelFamily::Wave, "~/ww3.Constant.20151214_sxy_ike_date.nc")
                .unwrap(),
        )
        .unwrap();
    registry
        .set(
            ModelFamily::Ocean,
            ModelEntry::new(ModelFamily::Ocean, 11)
                .unwrap()
                .with_attribute("Verbosity", AttributeValue::from("max"))
                .with_attribute("DumpFields", AttributeValue::Bool(false)),
        )
        .unwrap();

    let mut graph = ConnectionGraph::new();
    graph
        .connect(&registry, ModelFamily::Atmosphere, ModelFamily::Ocean, None)
        .unwrap();
    graph
        .connect(&registry, ModelFamily::Wave, ModelFamily::Ocean, None)
        .unwrap();
    (registry, graph)
}

#[test]
fn test_main_descriptor_matches_reference() {
    let (registry, graph) = example_system();
    let placement = graph.mediator_placement(&registry).unwrap();
    let allocation = allocate_registry(&registry, placement).unwrap();
    let sequence = RunSequenceBuilder::new(&registry, &graph)
        .build(Duration::from_secs(3600))
        .unwrap();

    let rendered =
        ConfigurationRenderer::new(&registry, &allocation, &graph, &sequence).render_main();
    assert_eq!(rendered, REFERENCE_MAIN);
}

#[test]
fn test_model_descriptor_matches_reference() {
    let (registry, graph) = example_system();
    let placement = graph.mediator_placement(&registry).unwrap();
    let allocation = allocate_registry(&registry, placement).unwrap();
    let sequence = RunSequenceBuilder::new(&registry, &graph)
        .build(Duration::from_secs(3600))
        .unwrap();
    let start_time = NaiveDate::from_ymd_opt(2020, 6, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let rendered = ConfigurationRenderer::new(&registry, &allocation, &graph, &sequence)
        .render_model(start_time, Duration::from_secs(86400));
    assert_eq!(rendered, REFERENCE_MODEL);
}

#[test]
fn test_forcing_descriptor_lists_file_entries() {
    let (registry, graph) = example_system();
    let placement = graph.mediator_placement(&registry).unwrap();
    let allocation = allocate_registry(&registry, placement).unwrap();
    let sequence = RunSequenceBuilder::new(&registry, &graph)
        .build(Duration::from_secs(3600))
        .unwrap();

    let rendered =
        ConfigurationRenderer::new(&registry, &allocation, &graph, &sequence).render_forcing();
    assert_eq!(
        rendered,
        "atm_dir: ~\n\
         atm_nam: wind_atm_fin_ch_time_vec.nc\n\
         wav_dir: ~\n\
         wav_nam: ww3.Constant.20151214_sxy_ike_date.nc\n"
    );
}

#[test]
fn test_omitted_slot_is_absent_everywhere() {
    let (registry, graph) = example_system();
    let placement = graph.mediator_placement(&registry).unwrap();
    let allocation = allocate_registry(&registry, placement).unwrap();
    let sequence = RunSequenceBuilder::new(&registry, &graph)
        .build(Duration::from_secs(3600))
        .unwrap();

    assert!(allocation.bounds(ModelFamily::Hydrology).is_none());
    let rendered =
        ConfigurationRenderer::new(&registry, &allocation, &graph, &sequence).render_main();
    assert!(!rendered.contains("HYD"));
}

#[test]
fn test_dedicated_mediator_range_is_distinct() {
    let (registry, mut graph) = example_system();
    graph
        .mediate(
            &registry,
            None,
            Some(ModelFamily::Ocean),
            vec!["MedPhase_prep_ocn".into()],
            Some(2),
        )
        .unwrap();

    let placement = graph.mediator_placement(&registry).unwrap();
    let allocation = allocate_registry(&registry, placement).unwrap();
    let mediator = allocation.bounds(ModelFamily::Mediator).unwrap();
    assert_eq!(mediator, ProcessorRange { first: 13, last: 14 });
    for (slot, range) in allocation.iter() {
        if slot != ModelFamily::Mediator {
            assert!(range.last < mediator.first || range.first > mediator.last);
        }
    }
}

#[test]
fn test_generated_files_are_stable_across_runs() {
    let yaml = r#"
general:
  start_time: "2020-06-01T00:00:00"
  duration: "1d"
  interval: "1h"
components:
  - family: ATM
    source_file: "~/wind_atm_fin_ch_time_vec.nc"
  - family: WAV
  - family: OCN
    processors: 11
    attributes:
      Verbosity: max
      DumpFields: false
connections:
  - source: ATM
    target: OCN
  - source: WAV
    target: OCN
"#;
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("coupling.yaml");
    fs::write(&config_path, yaml).unwrap();
    let config = load_config(&config_path).unwrap();

    let options = WriteOptions {
        overwrite: true,
        ..WriteOptions::default()
    };

    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first = generate_configuration(&config, first_dir.path(), &options).unwrap();
    let second = generate_configuration(&config, second_dir.path(), &options).unwrap();

    assert_eq!(first.len(), 3);
    for (first_file, second_file) in first.iter().zip(&second) {
        assert_eq!(
            fs::read_to_string(first_file).unwrap(),
            fs::read_to_string(second_file).unwrap(),
            "re-rendering identical inputs must be byte-identical"
        );
    }

    let main_text = fs::read_to_string(&first[0]).unwrap();
    assert!(main_text.contains("EARTH_component_list: ATM WAV OCN"));
    assert!(main_text.contains("OCN_petlist_bounds:             2 12"));
}

#[test]
fn test_explicit_sequence_override_from_config() {
    let yaml = r#"
general:
  start_time: "2020-06-01T00:00:00"
  duration: "1d"
  interval: "30m"
components:
  - family: WAV
  - family: OCN
    processors: 11
connections:
  - source: WAV
    target: OCN
sequence:
  - "OCN"
  - "WAV -> OCN"
  - "WAV"
"#;
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("coupling.yaml");
    fs::write(&config_path, yaml).unwrap();
    let config = load_config(&config_path).unwrap();

    let output_dir = tempfile::tempdir().unwrap();
    let filenames =
        generate_configuration(&config, output_dir.path(), &WriteOptions::default()).unwrap();
    let main_text = fs::read_to_string(&filenames[0]).unwrap();

    let expected_block = "\
runSeq::
  @1800
    OCN
    WAV -> OCN   :remapMethod=redist
    WAV
  @
::
";
    assert!(main_text.contains(expected_block));
}
