use pdf_raster::layout::*;
use pdf_raster::*;

fn letter() -> Size {
    Size::new(612.0, 792.0)
}

fn layout(page_count: usize, spec: LayoutSpec) -> Layout {
    compute_layout(page_count, &spec, letter(), &ToolOptions::default()).unwrap()
}

/// (left, right) source pages on one booklet output page
fn halves(layout: &Layout, sheet_index: usize) -> (Option<usize>, Option<usize>) {
    let mut slots: Vec<&Placement> = layout.placements_for_sheet(sheet_index).collect();
    slots.sort_by(|a, b| a.dest.x.total_cmp(&b.dest.x));
    assert_eq!(slots.len(), 2);
    (slots[0].source_page, slots[1].source_page)
}

#[test]
fn test_booklet_uses_every_page_once() {
    for page_count in 1..=17 {
        let layout = layout(page_count, LayoutSpec::Booklet);

        let mut pages: Vec<usize> = layout
            .placements
            .iter()
            .filter_map(|p| p.source_page)
            .collect();
        pages.sort_unstable();
        assert_eq!(pages, (1..=page_count).collect::<Vec<_>>());

        assert_eq!(layout.sheet_count, padded_page_count(page_count) / 2);
        assert_eq!(layout.placements.len(), padded_page_count(page_count));
    }
}

#[test]
fn test_booklet_fold_recovers_reading_order() {
    // Stack the physical sheets, outermost first, and fold at the spine:
    // the right half of each front followed by the left half of its back
    // make up the first half of the booklet, then the inner sheets unwind.
    for page_count in [4, 8, 10, 12, 16] {
        let layout = layout(page_count, LayoutSpec::Booklet);
        let physical = layout.sheet_count / 2;

        let mut read = Vec::new();
        for sheet in 0..physical {
            let (_, front_right_half) = halves(&layout, sheet * 2);
            let (back_left_half, _) = halves(&layout, sheet * 2 + 1);
            read.push(front_right_half);
            read.push(back_left_half);
        }
        for sheet in (0..physical).rev() {
            let (_, back_right_half) = halves(&layout, sheet * 2 + 1);
            let (front_left_half, _) = halves(&layout, sheet * 2);
            read.push(back_right_half);
            read.push(front_left_half);
        }

        let read: Vec<usize> = read.into_iter().flatten().collect();
        assert_eq!(read, (1..=page_count).collect::<Vec<_>>(), "{page_count} pages");
    }
}

#[test]
fn test_booklet_eight_page_order() {
    let order: Vec<usize> = booklet_page_order(8).into_iter().flatten().collect();
    assert_eq!(order, vec![8, 1, 2, 7, 6, 3, 4, 5]);

    // Front side shows frontRight on the left
    let layout = layout(8, LayoutSpec::Booklet);
    assert_eq!(halves(&layout, 0), (Some(8), Some(1)));
    assert_eq!(halves(&layout, 1), (Some(2), Some(7)));
}

#[test]
fn test_booklet_pads_with_blanks() {
    let order = booklet_page_order(5);
    assert_eq!(order.len(), 8);
    assert_eq!(order[0], None); // page 8
    assert_eq!(order[1], Some(1));
    assert_eq!(order.iter().filter(|p| p.is_none()).count(), 3);
}

#[test]
fn test_nup_ten_pages_on_two_by_two() {
    let layout = layout(10, LayoutSpec::NUp { cols: 2, rows: 2 });

    assert_eq!(layout.sheet_count, 3);
    let last: Vec<Option<usize>> = layout.placements_for_sheet(2).map(|p| p.source_page).collect();
    assert_eq!(last, vec![Some(9), Some(10), None, None]);
    assert_eq!(layout.blank_count(), 2);
}

#[test]
fn test_nup_fits_inside_cells() {
    let layout = layout(6, NUpPreset::Six.spec());
    let grid = create_grid_layout(2, 3, layout.sheet_size);

    for (placement, cell) in layout.placements.iter().zip(cells_row_major(&grid)) {
        assert!(cell.contains(&placement.dest));
        assert!((placement.dest.center_x() - cell.center_x()).abs() < 1e-3);
        assert!((placement.dest.center_y() - cell.center_y()).abs() < 1e-3);
    }
}

#[test]
fn test_nup_margin_factor_applies() {
    let options = ToolOptions {
        margin_factor: 0.5,
        ..Default::default()
    };
    let layout = compute_layout(1, &LayoutSpec::NUp { cols: 1, rows: 1 }, letter(), &options)
        .unwrap();

    let p = &layout.placements[0];
    assert!((p.scale - 0.5).abs() < 1e-6);
    assert!((p.dest.x - 153.0).abs() < 1e-3);
}

#[test]
fn test_tile_pieces_reassemble() {
    let source = letter();
    let layout = layout(2, LayoutSpec::Tile { rows: 3, cols: 2 });

    assert_eq!(layout.sheet_count, 12);
    assert_eq!(layout.sheet_size, Size::new(306.0, 264.0));

    for page in [1, 2] {
        let pieces: Vec<&Placement> = layout
            .placements
            .iter()
            .filter(|p| p.source_page == Some(page))
            .collect();
        assert_eq!(pieces.len(), 6);

        let area: f32 = pieces
            .iter()
            .map(|p| p.source_rect.width * p.source_rect.height)
            .sum();
        assert!((area - source.width * source.height).abs() < 1.0);

        let right = pieces.iter().map(|p| p.source_rect.right()).fold(0.0, f32::max);
        let bottom = pieces.iter().map(|p| p.source_rect.bottom()).fold(0.0, f32::max);
        assert!((right - source.width).abs() < 1e-3);
        assert!((bottom - source.height).abs() < 1e-3);
    }
}

#[test]
fn test_poster_pieces_reassemble() {
    let source = letter();
    let layout = layout(3, PosterPreset::ThreeByThree.spec());

    assert_eq!(layout.sheet_count, 9);
    assert_eq!(layout.pages_used(), vec![1]);
    assert_eq!(layout.raster_scale(2.0), 6.0);

    let first = &layout.placements[0].source_rect;
    assert_eq!(first.x, 0.0);
    assert_eq!(first.y, 0.0);

    let last = &layout.placements[8].source_rect;
    assert!((last.right() - source.width).abs() < 1e-3);
    assert!((last.bottom() - source.height).abs() < 1e-3);

    let sheet = Rect::from_size(layout.sheet_size);
    assert!(layout.placements.iter().all(|p| sheet.contains(&p.dest)));
}

#[test]
fn test_resize_never_crops() {
    let targets = [
        PaperSize::A4.size_pt(Orientation::Portrait),
        PaperSize::A5.size_pt(Orientation::Landscape),
        Size::new(100.0, 1000.0),
    ];
    let sources = [letter(), Size::new(842.0, 595.0), Size::new(300.0, 300.0)];

    for target in targets {
        for source in sources {
            let spec = LayoutSpec::Resize {
                target_width: target.width,
                target_height: target.height,
            };
            let layout = compute_layout(1, &spec, source, &ToolOptions::default()).unwrap();
            let dest = layout.placements[0].dest;

            assert!(Rect::from_size(target).contains(&dest));
            let width_fills = (dest.width - target.width).abs() < 1e-2;
            let height_fills = (dest.height - target.height).abs() < 1e-2;
            assert!(width_fills || height_fills);
        }
    }
}

#[test]
fn test_invalid_specs_rejected_before_layout() {
    let options = ToolOptions::default();
    let specs = [
        LayoutSpec::NUp { cols: 2, rows: 0 },
        LayoutSpec::Poster { grid: 0 },
        LayoutSpec::Tile { rows: 0, cols: 3 },
        LayoutSpec::Resize {
            target_width: 0.0,
            target_height: 10.0,
        },
    ];

    for spec in specs {
        let err = compute_layout(4, &spec, letter(), &options).unwrap_err();
        assert!(err.is_configuration_error(), "{spec:?}");
    }

    let err = compute_layout(4, &LayoutSpec::Booklet, Size::new(0.0, 10.0), &options)
        .unwrap_err();
    assert!(err.is_configuration_error());
}
