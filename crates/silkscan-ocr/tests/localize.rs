mod common;

use std::sync::Mutex;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use common::{blob, board_space, layer, BlobReader};
use silkscan_core::{LayerType, Primitive, VectorGraphic};
use silkscan_ocr::{
    localize_designators, CancelToken, DesignatorLocalizer, DesignatorSet, EmptyReason,
    Localization, LocalizerParams, Progress, RunHooks,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(
    layers: &[silkscan_core::Layer],
    valid: &DesignatorSet,
    reader: &BlobReader,
    hooks: RunHooks<'_>,
) -> Localization {
    init_logs();
    let params = LocalizerParams {
        worker_threads: Some(2),
        ..Default::default()
    };
    DesignatorLocalizer::new(params)
        .expect("params")
        .localize(layers, &board_space(), valid, reader, hooks)
        .expect("localize")
}

#[test]
fn locates_designator_at_board_center() {
    let mut top = VectorGraphic::default();
    blob(&mut top, (10.0, 5.0), 100.0, 25.0);
    let layers = [layer("board.gto", LayerType::TopSilkscreen, top)];
    let reader = BlobReader::new([(100.0, "U1")]);

    init_logs();
    let out = localize_designators(
        &layers,
        &board_space(),
        &DesignatorSet::from_bom(["U1"]),
        &reader,
        None,
    )
    .expect("localize");

    let map = out.into_map();
    assert_eq!(map.len(), 1);
    let u1 = &map["U1"];
    assert_abs_diff_eq!(u1.x, 10.0, epsilon = 0.05);
    assert_abs_diff_eq!(u1.y, 5.0, epsilon = 0.05);
    assert_eq!(
        serde_json::to_value(u1.layer_type).expect("json"),
        serde_json::json!("Top Silkscreen")
    );
}

#[test]
fn vertical_text_is_projected_back_through_the_rotated_pass() {
    let mut top = VectorGraphic::default();
    // Off-centre and tall: only the rotated pass can read it.
    blob(&mut top, (5.0, 3.0), 20.0, 120.0);
    blob(&mut top, (14.0, 8.0), 80.0, 20.0);
    let layers = [layer("board.gto", LayerType::TopSilkscreen, top)];
    let mut reader = BlobReader::new([(120.0, "R7"), (80.0, "C3")]);
    reader.horizontal_only = true;

    let map = run(
        &layers,
        &DesignatorSet::from_bom(["R7", "C3"]),
        &reader,
        RunHooks::default(),
    )
    .into_map();

    let r7 = &map["R7"];
    assert_abs_diff_eq!(r7.x, 5.0, epsilon = 0.05);
    assert_abs_diff_eq!(r7.y, 3.0, epsilon = 0.05);
    let c3 = &map["C3"];
    assert_abs_diff_eq!(c3.x, 14.0, epsilon = 0.05);
    assert_abs_diff_eq!(c3.y, 8.0, epsilon = 0.05);
}

#[test]
fn top_silkscreen_wins_even_when_it_finishes_last() {
    let mut top = VectorGraphic::default();
    blob(&mut top, (4.0, 4.0), 60.0, 20.0);
    blob(&mut top, (12.0, 2.0), 140.0, 20.0);
    let mut bottom = VectorGraphic::default();
    blob(&mut bottom, (15.0, 6.0), 60.0, 20.0);

    let layers = [
        layer("board.gbo", LayerType::BottomSilkscreen, bottom),
        layer("board.gto", LayerType::TopSilkscreen, top),
    ];
    let mut reader = BlobReader::new([(60.0, "R1"), (140.0, "SLOW")]);
    reader.slow_label = Some(("SLOW".into(), Duration::from_millis(150)));

    let map = run(
        &layers,
        &DesignatorSet::from_bom(["R1"]),
        &reader,
        RunHooks::default(),
    )
    .into_map();

    let r1 = &map["R1"];
    assert_eq!(r1.layer_type, LayerType::TopSilkscreen);
    assert_abs_diff_eq!(r1.x, 4.0, epsilon = 0.05);
    assert_abs_diff_eq!(r1.y, 4.0, epsilon = 0.05);
}

#[test]
fn bom_filter_and_permissive_mode() {
    let mut top = VectorGraphic::default();
    blob(&mut top, (3.0, 3.0), 60.0, 20.0);
    blob(&mut top, (10.0, 3.0), 100.0, 20.0);
    blob(&mut top, (16.0, 7.0), 30.0, 20.0);
    let layers = [layer("silk_top.ger", LayerType::TopSilkscreen, top)];
    let reader = BlobReader::new([(60.0, "r1"), (100.0, "TP-7"), (30.0, "X")]);

    let filtered = run(
        &layers,
        &DesignatorSet::from_bom(["R1", "C2"]),
        &reader,
        RunHooks::default(),
    )
    .into_map();
    assert_eq!(filtered.keys().collect::<Vec<_>>(), ["R1"]);

    let permissive = run(
        &layers,
        &DesignatorSet::permissive(),
        &reader,
        RunHooks::default(),
    )
    .into_map();
    assert_eq!(permissive.keys().collect::<Vec<_>>(), ["R1", "TP7"]);
}

#[test]
fn failing_layer_contributes_nothing_and_run_continues() {
    let mut top = VectorGraphic::default();
    blob(&mut top, (4.0, 4.0), 60.0, 20.0);
    let mut bottom = VectorGraphic::default();
    blob(&mut bottom, (8.0, 4.0), 100.0, 20.0);
    blob(&mut bottom, (14.0, 4.0), 160.0, 20.0);
    let mut broken = VectorGraphic::default();
    broken.push(Primitive::Circle {
        center: nalgebra::Point2::new(f64::NAN, 0.0),
        radius: 10.0,
    });

    let layers = [
        layer("a.gto", LayerType::TopSilkscreen, top),
        layer("a.gbo", LayerType::BottomSilkscreen, bottom),
        layer("b.gto", LayerType::TopSilkscreen, broken),
    ];
    let mut reader = BlobReader::new([(60.0, "R1"), (100.0, "R2"), (160.0, "FAIL")]);
    reader.fail_label = Some("FAIL".into());

    let out = run(
        &layers,
        &DesignatorSet::permissive(),
        &reader,
        RunHooks::default(),
    );
    assert!(matches!(out, Localization::Done { .. }));
    assert_eq!(out.into_map().keys().collect::<Vec<_>>(), ["R1"]);
}

#[test]
fn no_silkscreen_layers_is_an_empty_result() {
    let mut copper = VectorGraphic::default();
    blob(&mut copper, (4.0, 4.0), 60.0, 20.0);
    let layers = [
        layer("board.gtl", LayerType::TopCopper, copper.clone()),
        layer("board.gko", LayerType::Outline, copper),
    ];
    let reader = BlobReader::new([(60.0, "R1")]);
    let out = run(&layers, &DesignatorSet::permissive(), &reader, RunHooks::default());
    assert_eq!(
        out,
        Localization::Empty {
            reason: EmptyReason::NoSilkscreen
        }
    );
    assert!(out.mapping().is_none());
}

#[test]
fn cancelled_runs_return_no_partial_mapping() {
    let mut top = VectorGraphic::default();
    blob(&mut top, (4.0, 4.0), 60.0, 20.0);
    let layers = [
        layer("a.gto", LayerType::TopSilkscreen, top.clone()),
        layer("a.gbo", LayerType::BottomSilkscreen, top),
    ];
    let reader = BlobReader::new([(60.0, "R1")]);
    let cancelled = Localization::Empty {
        reason: EmptyReason::Cancelled,
    };

    let token = CancelToken::new();
    token.cancel();
    let before = run(
        &layers,
        &DesignatorSet::permissive(),
        &reader,
        RunHooks::default().with_cancel(&token),
    );
    assert_eq!(before, cancelled);

    let token = CancelToken::new();
    let cancel_on_first_pass = |p: &Progress| {
        if matches!(p, Progress::PassFinished { .. }) {
            token.cancel();
        }
    };
    let during = run(
        &layers,
        &DesignatorSet::permissive(),
        &reader,
        RunHooks::default()
            .with_cancel(&token)
            .with_progress(&cancel_on_first_pass),
    );
    assert_eq!(during, cancelled);
}

#[test]
fn progress_reports_every_layer_and_pass() {
    let mut top = VectorGraphic::default();
    blob(&mut top, (4.0, 4.0), 60.0, 20.0);
    let mut bottom = VectorGraphic::default();
    blob(&mut bottom, (9.0, 4.0), 100.0, 20.0);
    let layers = [
        layer("a.gto", LayerType::TopSilkscreen, top),
        layer("a.gbo", LayerType::BottomSilkscreen, bottom),
        layer("a.gtl", LayerType::TopCopper, VectorGraphic::default()),
    ];
    let reader = BlobReader::new([(60.0, "R1"), (100.0, "R2")]);

    let events = Mutex::new(Vec::new());
    let record = |p: &Progress| events.lock().expect("lock").push(p.clone());
    let out = run(
        &layers,
        &DesignatorSet::permissive(),
        &reader,
        RunHooks::default().with_progress(&record),
    );
    assert_eq!(out.len(), 2);

    let events = events.into_inner().expect("lock");
    assert_eq!(events.first(), Some(&Progress::Started { layers: 2 }));
    assert_eq!(events.last(), Some(&Progress::Finished { found: 2 }));
    let passes = events
        .iter()
        .filter(|e| matches!(e, Progress::PassFinished { .. }))
        .count();
    assert_eq!(passes, 4);
    let layers_done = events
        .iter()
        .filter(|e| matches!(e, Progress::LayerFinished { .. }))
        .count();
    assert_eq!(layers_done, 2);
}
