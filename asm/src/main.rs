use color_print::cprintln;
use ec16asm::encoder::{encode, Context};
use ec16asm::error::{Error, ErrorKind};
use ec16asm::image::{block_listing, flat_listing};
use ec16asm::linker::link;
use ec16asm::listing::annotate;
use ec16asm::parser::parse;
use ec16asm::source::Source;
use std::fs;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: String,

    /// Dump the annotated listing to stdout
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("EC16 Assembler");

    let source = match Source::load(&args.input) {
        Ok(source) => source,
        Err(err) => {
            err.print_diag(None);
            std::process::exit(1);
        }
    };
    if let Err(err) = assemble(&args, &source) {
        err.print_diag(Some(&source));
        std::process::exit(1);
    }
}

fn assemble(args: &Args, source: &Source) -> Result<(), Error> {
    // flattened listing first, so include problems are inspectable even when
    // a later pass fails
    let listing_path = source.output_name("lst");
    write(&listing_path, &source.text())?;

    println!("1. Tokenize Lines");
    let mut ctx = Context::new();
    let stmts = parse(source, &mut ctx.symbols)?;

    println!("2. Encode Statements");
    let records = encode(&mut ctx, &stmts)?;

    println!("3. Link Labels");
    let resolved = link(&ctx.symbols, records)?;

    println!("4. Write Output");
    let annotated = annotate(source, &resolved, &ctx.symbols);
    write(&listing_path, &annotated)?;
    write(&source.output_name("bin"), &flat_listing(&resolved))?;
    write(&source.output_name("ecm"), &block_listing(&resolved))?;

    if args.dump {
        println!("{}", annotated);
    }
    cprintln!("<green,bold>Assembly complete without errors</>");
    Ok(())
}

fn write(path: &str, text: &str) -> Result<(), Error> {
    fs::write(path, text).map_err(|e| ErrorKind::FileWrite(path.to_string(), e).bare())
}
