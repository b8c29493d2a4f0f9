use pdf_raster::*;

#[test]
fn test_stats_nup() {
    let stats = calculate_statistics(10, &LayoutSpec::NUp { cols: 2, rows: 2 }).unwrap();

    assert_eq!(stats.source_pages, 10);
    assert_eq!(stats.pages_used, 10);
    assert_eq!(stats.output_sheets, 3);
    assert_eq!(stats.pages_per_sheet, Some(4));
    assert_eq!(stats.placements, 12);
    assert_eq!(stats.blank_slots, 2);
}

#[test]
fn test_stats_booklet_padding() {
    let stats = calculate_statistics(9, &LayoutSpec::Booklet).unwrap();

    // Padded to 12 pages on 3 physical sheets, 6 sides
    assert_eq!(stats.output_sheets, 6);
    assert_eq!(stats.blank_slots, 3);
    assert_eq!(stats.pages_per_sheet, Some(2));
}

#[test]
fn test_stats_booklet_exact_multiple() {
    let stats = calculate_statistics(16, &LayoutSpec::Booklet).unwrap();
    assert_eq!(stats.output_sheets, 8);
    assert_eq!(stats.blank_slots, 0);
}

#[test]
fn test_stats_poster_uses_one_page() {
    let stats = calculate_statistics(5, &PosterPreset::FourByFour.spec()).unwrap();

    assert_eq!(stats.source_pages, 5);
    assert_eq!(stats.pages_used, 1);
    assert_eq!(stats.output_sheets, 16);
    assert_eq!(stats.pages_per_sheet, None);
}

#[test]
fn test_stats_tile() {
    let stats = calculate_statistics(3, &LayoutSpec::Tile { rows: 2, cols: 3 }).unwrap();
    assert_eq!(stats.output_sheets, 18);
    assert_eq!(stats.blank_slots, 0);
}

#[test]
fn test_stats_resize() {
    let spec = LayoutSpec::Resize {
        target_width: 595.0,
        target_height: 842.0,
    };
    let stats = calculate_statistics(7, &spec).unwrap();
    assert_eq!(stats.output_sheets, 7);
    assert_eq!(stats.pages_per_sheet, Some(1));
}

#[test]
fn test_stats_no_pages() {
    let result = calculate_statistics(0, &LayoutSpec::Booklet);
    assert!(matches!(result, Err(RasterError::NoPages)));
}
