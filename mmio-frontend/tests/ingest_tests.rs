//! Tests for trace ingestion across parser, aligner and registry

use indoc::indoc;
use mmio_common::Direction;
use mmio_frontend::Frontend;
use pretty_assertions::assert_eq;

#[test]
fn test_byte_accesses_merge_into_one_register() {
    let trace = indoc! {"
        W 1 298.823649 1 0xf70003fc 0x7a 0x0 0
        W 2 298.823650 1 0xf70003fd 0x7a 0x0 0
        W 3 298.823651 1 0xf70003fe 0x7a 0x0 0
        W 4 298.823652 1 0xf70003ff 0x7a 0x0 0
    "};
    let ingested = Frontend::ingest(trace).unwrap();
    let registry = &ingested.registry;

    assert_eq!(registry.unique_addresses(1, Direction::Write), ["003FC"]);
    assert_eq!(
        registry.values_for(1, "003FC", Direction::Write),
        ["0000007A", "00007A00", "007A0000", "7A000000"]
    );
    assert_eq!(registry.bit_width("003FC"), 31);
    assert_eq!(registry.defaults(1).1, "0000007A");
}

#[test]
fn test_order_preserved_across_interleaved_addresses() {
    let trace = indoc! {"
        R 1 1.000001 0 0xf7000100 0x1 0x0 0
        R 2 1.000002 0 0xf7000200 0xa 0x0 0
        R 3 1.000003 0 0xf7000100 0x2 0x0 0
        W 4 1.000004 0 0xf7000100 0xff 0x0 0
        R 5 1.000005 0 0xf7000100 0x1 0x0 0
    "};
    let ingested = Frontend::ingest(trace).unwrap();
    let registry = &ingested.registry;

    assert_eq!(
        registry.values_for(0, "00100", Direction::Read),
        ["00000001", "00000002", "00000001"]
    );
    assert_eq!(registry.values_for(0, "00100", Direction::Write), ["000000FF"]);
    assert_eq!(registry.values_for(0, "00200", Direction::Read), ["0000000A"]);
    assert_eq!(registry.operations().len(), 5);
    assert_eq!(registry.operations()[3].direction, Direction::Write);
}

#[test]
fn test_malformed_lines_do_not_abort() {
    let trace = indoc! {"
        R 1 1.0 0 0xf7000100 0x5 0x0
        R 2 1.0 0 0xnothex 0x5 0x0 0
        R 3 1.0 0 0xf7000104 0x6 0x0 0
    "};
    let ingested = Frontend::ingest(trace).unwrap();

    assert_eq!(ingested.stats.malformed, 2);
    assert_eq!(ingested.stats.processed, 1);
    assert_eq!(
        ingested.registry.unique_addresses(0, Direction::Read),
        ["00104"]
    );
}

#[test]
fn test_invalid_records_are_rejected() {
    let trace = indoc! {"
        R 1 -1.0 0 0xf7000100 0x5 0x0 0
        R 2 1.0 10 0xf7000100 0x5 0x0 0
        R 3 1.0 9 0xf7000100 0x5 0x0 0
    "};
    let ingested = Frontend::ingest(trace).unwrap();

    assert_eq!(ingested.stats.rejected, 2);
    assert_eq!(ingested.registry.bars(), vec![9]);
}

#[test]
fn test_high_address_bits_alias() {
    let trace = indoc! {"
        R 1 1.0 0 0xf7010100 0x1 0x0 0
        R 2 1.0 0 0xe8010100 0x2 0x0 0
    "};
    let ingested = Frontend::ingest(trace).unwrap();

    assert_eq!(
        ingested.registry.values_for(0, "10100", Direction::Read),
        ["00000001", "00000002"]
    );
}

#[test]
fn test_ingest_is_deterministic() {
    let trace = indoc! {"
        W 1 1.0 2 0x1003 0x12 0x0 0
        R 2 1.0 2 0x1000 0x1 0x0 0
        R 3 1.0 0 0x2000 0x3 0x0 0
    "};
    let first = Frontend::ingest(trace).unwrap();
    let second = Frontend::ingest(trace).unwrap();

    assert_eq!(first.registry.operations(), second.registry.operations());
    assert_eq!(first.registry.bars(), second.registry.bars());
    for bar in first.registry.bars() {
        assert_eq!(first.registry.defaults(bar), second.registry.defaults(bar));
    }
    assert_eq!(first.stats, second.stats);
}
