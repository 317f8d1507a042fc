//! Write-then-read integration tests over in-memory buffers.
//!
//! Each test: build a protocol from fixtures → write it through
//! `ProtocolWriter<Vec<u8>>` → read it back via `ProtocolReader` →
//! compare the rebuilt tree with the fixture's tree.

use illum_core::{GridSize, Point};
use illum_protocol::{Protocol, ProtocolTree};
use illum_test_utils::{multi_step_builder, unit_square_builder, ProtocolBuilder};
use illum_yaml::{encode_protocol, BuildMetadata, ProtocolReader, ProtocolWriter};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

fn test_metadata() -> BuildMetadata {
    BuildMetadata::new(env!("CARGO_PKG_VERSION"), "test")
}

fn write_then_read(protocol: &mut Protocol) -> ProtocolTree {
    let mut writer = ProtocolWriter::new(Vec::new(), &test_metadata());
    writer.write_protocol(protocol).unwrap();
    let buf = writer.into_inner();
    ProtocolReader::open(buf.as_slice()).unwrap().into_tree()
}

// ── Scenarios ───────────────────────────────────────────────────

#[test]
fn unit_square_scenario() {
    let mut protocol = unit_square_builder().build();
    let doc = encode_protocol(&mut protocol, &test_metadata()).unwrap();
    assert!(doc.contains("  GridSize:\n    height: 4\n    width: 4\n"));
    assert!(!doc.contains("Description"));

    let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
    assert_eq!(tree.filename.as_deref(), Some("test.proto"));
    assert_eq!(tree.description, None);
    assert_eq!(tree.grid_size, GridSize::new(4, 4));
    assert_eq!(
        tree.steps,
        Some(vec![vec![vec![
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ]]])
    );
}

#[test]
fn empty_protocol_scenario() {
    let mut protocol = Protocol::new();
    let doc = encode_protocol(&mut protocol, &test_metadata()).unwrap();
    assert!(doc.contains("  Steps: []\n"));

    let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
    assert_eq!(tree.grid_size, GridSize::new(0, 0));
    assert_eq!(tree.filename, None);
    assert_eq!(tree.steps, Some(Vec::new()));
}

#[test]
fn multi_step_round_trip_preserves_everything() {
    let builder = multi_step_builder();
    let mut protocol = builder.build();
    let tree = write_then_read(&mut protocol);
    assert_eq!(&tree, builder.tree());
}

#[test]
fn order_is_preserved_at_every_level() {
    let builder = ProtocolBuilder::new()
        .grid(10, 10)
        .step(&[&[(9, 0), (8, 1), (7, 2)], &[(0, 9)]])
        .step(&[&[(5, 5)], &[(4, 4)], &[(3, 3)]])
        .step(&[&[(1, 1), (2, 2)]]);
    let tree = write_then_read(&mut builder.build());
    let steps = tree.steps.unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0][0], vec![Point::new(9, 0), Point::new(8, 1), Point::new(7, 2)]);
    assert_eq!(steps[1].iter().map(|p| p[0].x).collect::<Vec<_>>(), [5, 4, 3]);
    assert_eq!(steps[2][0][1], Point::new(2, 2));
}

#[test]
fn unset_description_is_omitted_and_reads_unset() {
    let mut protocol = unit_square_builder().build();
    protocol.clear_description();
    let doc = encode_protocol(&mut protocol, &test_metadata()).unwrap();
    assert!(!doc.contains("Description"));
    let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
    assert_eq!(tree.description, None);
}

#[test]
fn unset_filename_is_omitted() {
    let mut protocol = ProtocolBuilder::new().description("no file").build();
    let doc = encode_protocol(&mut protocol, &test_metadata()).unwrap();
    assert!(!doc.contains("Filename"));
    let tree = ProtocolReader::from_str(&doc).unwrap().into_tree();
    assert_eq!(tree.filename, None);
    assert_eq!(tree.description.as_deref(), Some("no file"));
}

#[test]
fn second_write_has_empty_steps() {
    let mut protocol = multi_step_builder().build();
    let mut writer = ProtocolWriter::new(Vec::new(), &test_metadata());
    let first = writer.write_protocol(&mut protocol).unwrap();
    let second = writer.write_protocol(&mut protocol).unwrap();
    assert_eq!(first.steps, 3);
    assert_eq!(second.steps, 0);
    assert_eq!(second.points, 0);

    let text = String::from_utf8(writer.into_inner()).unwrap();
    let (_, last) = text.rsplit_once("---\n").unwrap();
    let tree = ProtocolReader::from_str(last).unwrap().into_tree();
    assert_eq!(tree.steps, Some(Vec::new()));
    assert_eq!(tree.description.as_deref(), Some("head sweep\nthen tail"));
}

#[test]
fn reader_ignores_later_documents() {
    let mut first = unit_square_builder().build();
    let mut second = Protocol::new();
    let mut writer = ProtocolWriter::new(Vec::new(), &test_metadata());
    writer.write_protocol(&mut first).unwrap();
    writer.write_protocol(&mut second).unwrap();
    let buf = writer.into_inner();
    let tree = ProtocolReader::open(buf.as_slice()).unwrap().into_tree();
    assert_eq!(tree.point_count(), 4);
}

#[test]
fn rebuilt_polygons_take_the_document_grid() {
    let mut protocol = multi_step_builder().build();
    let doc = encode_protocol(&mut protocol, &test_metadata()).unwrap();
    let rebuilt = ProtocolReader::from_str(&doc).unwrap().to_protocol().unwrap();
    let arena = rebuilt.arena();
    for montage in rebuilt.steps().unwrap().montages(arena).unwrap() {
        for polygon in montage.polygons(arena).unwrap() {
            assert_eq!(polygon.grid_size(), GridSize::new(32, 24));
        }
    }
}

#[test]
fn awkward_strings_survive() {
    let mut protocol = ProtocolBuilder::new()
        .filename("dir with spaces/#not a comment: really.yaml")
        .description("quote \" backslash \\ tab \t bell \u{7} unicode é")
        .build();
    let tree = write_then_read(&mut protocol);
    assert_eq!(
        tree.filename.as_deref(),
        Some("dir with spaces/#not a comment: really.yaml")
    );
    assert_eq!(
        tree.description.as_deref(),
        Some("quote \" backslash \\ tab \t bell \u{7} unicode é")
    );
}

// ── Properties ──────────────────────────────────────────────────

fn arb_steps() -> impl Strategy<Value = Vec<Vec<Vec<Point>>>> {
    let point = (any::<i32>(), any::<i32>()).prop_map(|(x, y)| Point::new(x, y));
    let polygon = proptest::collection::vec(point, 0..8);
    let montage = proptest::collection::vec(polygon, 0..4);
    proptest::collection::vec(montage, 0..5)
}

proptest! {
    #[test]
    fn round_trip_is_identity(
        steps in arb_steps(),
        width in any::<u32>(),
        height in any::<u32>(),
        filename in proptest::option::of("[ -~]{0,24}"),
        description in proptest::option::of("[ -~é漢]{0,40}"),
    ) {
        let tree = ProtocolTree {
            filename,
            description,
            grid_size: GridSize::new(width, height),
            steps: Some(steps),
        };
        let mut protocol = tree.instantiate().unwrap();
        let read = write_then_read(&mut protocol);
        prop_assert_eq!(read, tree);
    }
}
