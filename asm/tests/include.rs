use ec16asm::encoder::{encode, Context};
use ec16asm::error::ErrorKind;
use ec16asm::linker::link;
use ec16asm::parser::parse;
use ec16asm::source::Source;
use std::fs;
use std::path::Path;

fn write_file(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.display().to_string()
}

#[test]
fn includes_are_spliced_and_deduplicated() {
    let dir = std::env::temp_dir().join("ec16asm-include-splice");
    fs::create_dir_all(&dir).unwrap();

    let consts = write_file(&dir, "consts.inc", "limit equ 0x10");
    let util = write_file(
        &dir,
        "util.inc",
        &format!("include {consts}\nhelper: nop\n rets"),
    );
    let main = write_file(
        &dir,
        "main.asm",
        &format!("include {util}\ninclude {consts}\n calld helper\n mov a limit"),
    );

    let source = Source::load(&main).unwrap();
    let text = source.text();
    // include lines are commented out in place, contents spliced after them
    assert_eq!(source.line(0), Some(format!("; -> include {util}").as_str()));
    assert_eq!(source.line(1), Some(format!("; -> include {consts}").as_str()));
    assert_eq!(source.line(2), Some("limit equ 0x10"));
    assert!(text.contains(&format!("; -> end of included file \"{consts}\"")));
    assert!(text.contains(&format!("; -> end of included file \"{util}\"")));
    // the nested file was already seen, so the second include is skipped
    assert!(text.contains("; -> ignored since already included"));
    assert_eq!(text.matches("limit equ").count(), 1);

    // the expanded source assembles as one unit
    let mut ctx = Context::new();
    let stmts = parse(&source, &mut ctx.symbols).unwrap();
    let records = encode(&mut ctx, &stmts).unwrap();
    link(&ctx.symbols, records).unwrap();
    assert_eq!(ctx.symbols.value("helper"), Some(0));
    assert_eq!(ctx.symbols.value("limit"), Some(0x10));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn include_without_file_name_is_rejected() {
    let dir = std::env::temp_dir().join("ec16asm-include-bare");
    fs::create_dir_all(&dir).unwrap();
    let main = write_file(&dir, "main.asm", " nop\ninclude\n nop");

    let err = Source::load(&main).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IncludeSyntax));
    assert_eq!(err.line, Some(1));

    fs::remove_dir_all(&dir).ok();
}
