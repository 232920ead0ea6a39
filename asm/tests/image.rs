use ec16asm::encoder::{encode, Context};
use ec16asm::image::{block_listing, blocks, flat_listing, flat_words};
use ec16asm::linker::{link, Resolved};
use ec16asm::parser::parse;
use ec16asm::source::Source;

fn resolve(src: &str) -> Vec<Resolved> {
    let source = Source::from_lines("test.asm", src);
    let mut ctx = Context::new();
    let stmts = parse(&source, &mut ctx.symbols).unwrap();
    let records = encode(&mut ctx, &stmts).unwrap();
    link(&ctx.symbols, records).unwrap()
}

#[test]
fn org_gaps_are_zero_filled() {
    let resolved = resolve(" set c\n org_e 0x0005\n set c");
    assert_eq!(flat_words(&resolved), [0x1100, 0, 0, 0, 0, 0x1100]);
}

#[test]
fn stream_starts_at_first_emitted_address() {
    let resolved = resolve(" org_e 0x0010\n set c\n set c");
    assert_eq!(flat_words(&resolved), [0x1100, 0x1100]);
}

#[test]
fn hex_records_split_at_eight_words() {
    let resolved = resolve(" org_e 0x2000\nd: dw_e 1 2 3 4 5 6 7 8 9 10");
    assert_eq!(
        block_listing(&resolved),
        "2000=0001 0002 0003 0004 0005 0006 0007 0008\n2008=0009 000a\n"
    );
}

#[test]
fn reserved_spans_break_hex_records() {
    let resolved = resolve(" set c\nbuf: res_e 2\n set c");
    assert_eq!(
        blocks(&resolved),
        [(0, vec![0x1100]), (3, vec![0x1100])]
    );
    // the flat stream zero-fills over the reservation instead
    assert_eq!(flat_words(&resolved), [0x1100, 0, 0, 0x1100]);
}

#[test]
fn trailing_reservation_pads_with_zeros() {
    let resolved = resolve(" set c\nbuf: res_e 8");
    assert_eq!(flat_words(&resolved), [0x1100, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(blocks(&resolved), [(0, vec![0x1100])]);
}

#[test]
fn binary_lines_are_sixteen_digits() {
    let resolved = resolve(" set c");
    assert_eq!(flat_listing(&resolved), "0001000100000000\n");
}

#[test]
fn two_word_instructions_emit_both_words() {
    let resolved = resolve(" jmpd 0x1234");
    assert_eq!(flat_words(&resolved), [0xA000, 0x1234]);
    assert_eq!(block_listing(&resolved), "0000=a000 1234\n");
}

#[test]
fn adjacent_records_merge_into_one_block() {
    let resolved = resolve(" nop\nd: dw_e 7\n nop");
    assert_eq!(blocks(&resolved), [(0, vec![0x0000, 7, 0x0000])]);
}
