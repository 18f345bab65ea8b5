use std::fs;

use clap::Parser;
use embasic::Interpreter;

/// embasic is an embeddable BASIC-style scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells embasic to look at a file instead of an inline script.
    #[arg(short, long)]
    file: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut interpreter = Interpreter::new();

    if let Err(e) = interpreter.run(&script) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
