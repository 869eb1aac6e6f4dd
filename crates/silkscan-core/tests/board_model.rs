use approx::assert_abs_diff_eq;
use nalgebra::Point2;
use silkscan_core::{
    board_to_pixel, classify, load_layers, pixel_to_board, rect_polygon, BoardSpace, LayerError,
    LayerType, LocalBox, ParsedLayerGeometry, PlacementBook, RawLayerInput, Side, VectorGraphic,
    Viewport,
};

/// Plotter double: the first line of the file is `x y w h` in plotter units.
fn plot(input: &RawLayerInput) -> Result<ParsedLayerGeometry, LayerError> {
    let fail = |reason: &str| LayerError::Plot {
        filename: input.filename.clone(),
        reason: reason.to_string(),
    };
    let nums: Vec<f64> = input
        .text
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| fail("bad header"))?;
    let [x, y, w, h] = nums[..] else {
        return Err(fail("expected four numbers"));
    };
    let mut graphic = VectorGraphic::default();
    graphic.push(rect_polygon(
        Point2::new(x + w / 2.0, y + h / 2.0),
        w,
        h,
    ));
    Ok(ParsedLayerGeometry {
        bbox: LocalBox::new(x, y, w, h),
        graphic,
    })
}

#[test]
fn upload_is_filtered_plotted_and_unified() {
    let inputs = [
        RawLayerInput::new("board-Top.GTL", "0 0 20000 10000"),
        RawLayerInput::new("board.GTO", "-200 100 15000 9000"),
        RawLayerInput::new("silk_bottom.ger", "500 -400 10000 2000"),
        RawLayerInput::new("README.md", "0 0 99999 99999"),
        RawLayerInput::new("broken.gbl", "not a plot"),
        RawLayerInput::new("empty.gko", "0 0 0 5000"),
    ];
    let board = load_layers(&inputs, &plot);

    let space = board.space.expect("board space");
    assert_eq!(space.min_x(), -200.0);
    assert_eq!(space.min_y(), -400.0);
    assert_eq!(space.width(), 20_200.0);
    assert_eq!(space.height(), 10_400.0);

    let types: Vec<LayerType> = board.layers.iter().map(|l| l.layer_type).collect();
    assert_eq!(
        types,
        [
            LayerType::TopCopper,
            LayerType::TopSilkscreen,
            LayerType::BottomSilkscreen
        ]
    );
    for l in &board.layers {
        assert_eq!(l.frame, space);
    }
}

#[test]
fn upload_without_usable_layers_has_no_board() {
    let inputs = [
        RawLayerInput::new("a.gtl", "garbage"),
        RawLayerInput::new("b.gto", "0 0 100 0"),
    ];
    let board = load_layers(&inputs, &plot);
    assert!(board.is_empty());
    assert!(board.layers.is_empty());
    assert_eq!(board.native_size(), None);
}

#[test]
fn unified_space_contains_every_contributing_box() {
    let boxes = [
        LocalBox::new(0.0, 0.0, 1000.0, 1000.0),
        LocalBox::new(-50.0, 300.0, 10.0, 2000.0),
        LocalBox::new(900.0, -20.0, 400.0, 40.0),
    ];
    let space = silkscan_core::union_box(&boxes).expect("space");
    for b in &boxes {
        assert!(space.contains_box(b), "{b:?} not inside {space:?}");
    }
    for skip in 0..boxes.len() {
        let rest: Vec<&LocalBox> = boxes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, b)| b)
            .collect();
        let smaller = silkscan_core::union_box(rest).expect("space");
        assert!(space.contains_box(&smaller.as_box()));
    }
}

#[test]
fn click_capture_reproduces_the_exported_coordinate() {
    let space = BoardSpace::from_native(-1.25, 0.5, 20.0, 10.0).expect("space");
    // Element drawn at 37.5 % of intrinsic size, 120 px from the left edge.
    let (w, h) = space.pixel_size();
    let view = Viewport::from_rendered_rect(&space, 120.0, 64.0, w * 0.375, h * 0.375);

    let mut book = PlacementBook::new(["R1", "C2"]);
    let target = Point2::new(3.125, 7.75);
    let screen = view.pixel_to_screen(board_to_pixel(target, &space));
    let clicked = view.screen_to_board(screen, &space);
    book.place(0, clicked, Side::Top);

    let placed = book.entries()[0].placement.as_ref().expect("placed");
    assert_abs_diff_eq!(placed.x, target.x, epsilon = 1e-6);
    assert_abs_diff_eq!(placed.y, target.y, epsilon = 1e-6);

    let back = pixel_to_board(board_to_pixel(target, &space), &space);
    assert_abs_diff_eq!(back.x, target.x, epsilon = 1e-6);
    assert_abs_diff_eq!(back.y, target.y, epsilon = 1e-6);
}

#[test]
fn classifier_examples() {
    assert_eq!(classify("board-Top.GTL"), LayerType::TopCopper);
    assert_eq!(classify("silk_top.ger"), LayerType::TopSilkscreen);
    assert_eq!(classify("random.xyz"), LayerType::Other);
    assert_eq!(classify("SILK_TOP.GER"), classify("silk_top.ger"));
    assert_eq!(classify(""), LayerType::Other);
}
