// cmmc: C-- compiler front end driver

use std::fs;
use std::path::Path;
use std::process;

use cmmc::diag::Diagnostics;
use cmmc::unparse::unparse_program;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("cmmc");
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("Usage: {} <file.cmm> [output.out]", program_name);
        eprintln!();
        eprintln!("Compiles a C-- source file and writes the unparsed,");
        eprintln!("symbol-annotated program to the output file (or stdout).");
        process::exit(1);
    }

    let input = &args[1];
    if !Path::new(input).exists() {
        eprintln!("Error: File '{}' not found", input);
        process::exit(1);
    }

    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: Failed to read '{}': {}", input, err);
            process::exit(1);
        }
    };

    // Diagnostics go to stderr as they are emitted, in call order.
    let mut diag = Diagnostics::new();

    let program = match cmmc::compile(&source, &mut diag) {
        Ok((program, _structs)) => program,
        // The syntax error has already been reported through the sink.
        Err(_) => process::exit(1),
    };

    let text = unparse_program(&program);
    match args.get(2) {
        Some(path) => {
            if let Err(err) = fs::write(path, &text) {
                eprintln!("Error: Failed to write '{}': {}", path, err);
                process::exit(1);
            }
        }
        None => print!("{}", text),
    }

    if diag.errors_occurred() {
        process::exit(1);
    }
}
