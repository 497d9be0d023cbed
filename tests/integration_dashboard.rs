//! End-to-end dashboard sessions over in-memory and gated sources.

mod common;

use std::sync::Arc;

use gridmix::Error;
use gridmix::mix::{
    Capacity, CommitOutcome, Dashboard, GenerationAggregator, NetFlow, Scenario, Selection,
    SubsetCatalog, Unit,
};
use gridmix::region::{RegionCatalog, RegionId};
use gridmix::report::{RegionSummary, Treemap};

use common::{GatedSource, dashboard, fixture_capacity, fixture_source, standard_session};

fn ca_2022() -> Selection {
    Selection::new(RegionId::new("CA"), 2022)
}

#[tokio::test]
async fn initialize_then_select_state() {
    let dash = Dashboard::initialize(
        fixture_source(),
        GenerationAggregator::new(SubsetCatalog::standard(), RegionCatalog::united_states()),
        fixture_capacity(),
        standard_session(),
    )
    .await
    .expect("initialize should succeed");

    assert_eq!(dash.years().years(), &[2022, 2021]);
    let national = dash.view().expect("national view committed");
    assert!(national.is_national());
    assert_eq!(national.regional.total_gwh, 4200.0);
    assert_eq!(national.regional.clean_gwh, 1400.0);

    let outcome = dash
        .select_region(RegionId::new("CA"))
        .await
        .expect("select should succeed");
    assert_eq!(outcome, CommitOutcome::Applied);

    let view = dash.view().expect("view committed");
    assert_eq!(view.selection, ca_2022());
    assert_eq!(view.regional.total_gwh, 200.0);
    assert_eq!(view.regional.by_subset.get("hydro"), Some(20.0));
    assert_eq!(view.regional.by_subset.get("coal"), Some(0.0));
    assert_eq!(view.regional.clean_gwh, 100.0);
    assert_eq!(view.regional.net_flow, NetFlow::Known(70.0));
    assert_eq!(view.national.total_gwh, 4200.0);
}

#[tokio::test]
async fn total_is_independent_of_tracked_subsets() {
    let dash = dashboard(fixture_source());
    dash.select(Selection::new(RegionId::new("TX"), 2022))
        .await
        .expect("select should succeed");
    let view = dash.view().expect("view committed");
    // 100 + 150 + 220 tracked, 480 reported
    assert_eq!(view.regional.by_subset.tracked_sum(), 470.0);
    assert_eq!(view.regional.total_gwh, 480.0);
    assert_eq!(view.regional.net_flow, NetFlow::Unknown);
}

#[tokio::test]
async fn clean_reclassification_issues_no_fetches() {
    let dash = dashboard(fixture_source());
    dash.select(ca_2022()).await.expect("select should succeed");
    let fetches = dash.source().fetch_count();

    assert!(dash.set_clean("solar", false).expect("known subset"));
    let view = dash.view().expect("view committed");
    assert_eq!(view.regional.clean_gwh, 50.0);
    assert_eq!(view.national.clean_gwh, 1200.0);

    assert!(dash.set_clean("natural_gas", true).expect("known subset"));
    assert_eq!(dash.view().map(|v| v.regional.clean_gwh), Some(140.0));

    // idempotent
    assert!(!dash.set_clean("natural_gas", true).expect("known subset"));
    assert_eq!(dash.view().map(|v| v.regional.clean_gwh), Some(140.0));

    assert_eq!(dash.source().fetch_count(), fetches);
}

#[tokio::test]
async fn transport_failure_preserves_committed_view() {
    let dash = dashboard(fixture_source());
    dash.select(ca_2022()).await.expect("select should succeed");
    let before = dash.view();

    dash.source().set_failing(true);
    let result = dash.select(Selection::new(RegionId::new("TX"), 2022)).await;
    assert!(matches!(result, Err(Error::Fetch(_))));
    assert_eq!(dash.view(), before);

    dash.source().set_failing(false);
    dash.select(Selection::new(RegionId::new("TX"), 2022))
        .await
        .expect("select should succeed once the source recovers");
    assert_eq!(
        dash.view().map(|v| v.selection.region),
        Some(RegionId::new("TX"))
    );
}

#[tokio::test]
async fn out_of_order_completion_does_not_overwrite_newer_selection() {
    let dash = Arc::new(dashboard(GatedSource::new(fixture_source(), "CA")));

    let slow = tokio::spawn({
        let dash = Arc::clone(&dash);
        async move { dash.select(ca_2022()).await }
    });
    while dash.source().waiting() == 0 {
        tokio::task::yield_now().await;
    }

    let fast = dash
        .select(Selection::new(RegionId::new("TX"), 2022))
        .await
        .expect("TX select should succeed");
    assert_eq!(fast, CommitOutcome::Applied);

    dash.source().open();
    let slow = slow
        .await
        .expect("task should not panic")
        .expect("CA select should succeed");
    assert_eq!(slow, CommitOutcome::Stale);

    let view = dash.view().expect("view committed");
    assert_eq!(view.selection.region, RegionId::new("TX"));
    assert_eq!(view.regional.total_gwh, 480.0);
}

#[tokio::test]
async fn capacity_follows_scenario() {
    let dash = dashboard(fixture_source());
    dash.select(ca_2022()).await.expect("select should succeed");

    let view = dash.view().expect("view committed");
    assert_eq!(view.display.scenario, Scenario::Limited);
    assert_eq!(view.regional.capacity.solar, Capacity::Present(900.0));
    assert_eq!(view.regional.capacity.wind, Capacity::Present(200.0));
    assert!(view.regional.capacity.offshore_wind.is_absent());
    assert_eq!(view.national.capacity.offshore_wind, Capacity::Present(3000.0));

    dash.set_scenario(Scenario::Open);
    let view = dash.view().expect("view committed");
    assert_eq!(view.regional.capacity.solar, Capacity::Present(2500.5));
    assert_eq!(view.national.capacity.solar, Capacity::Present(2515.5));
}

#[tokio::test]
async fn presentation_of_committed_view() {
    let dash = dashboard(fixture_source());
    dash.select(ca_2022()).await.expect("select should succeed");
    let view = dash.view().expect("view committed");

    let summary = RegionSummary::new(&view.regional, Unit::Energy, Scenario::Limited, "2021, 2023");
    assert_eq!(summary.clean_percent, "50.00%");
    assert_eq!(summary.flow_direction, "imported");
    assert_eq!(summary.flow, "70 GWh");
    assert_eq!(summary.capacity_percent, "550.00%");

    let treemap = Treemap::build(&view, dash.subsets());
    let leaves: Vec<&str> = treemap.leaves().map(|l| l.key.as_str()).collect();
    assert_eq!(leaves, ["solar", "wind", "hydro", "natural_gas"]);
}
