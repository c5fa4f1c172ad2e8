//! Basalt CLI - compile a source file to C

use std::env;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use basalt::errors::{format_diagnostic, Colors};
use basalt::{desugar, emit_c, normalize, transform, Lexer, Parser};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let input = match args.get(1) {
        Some(path) => path.clone(),
        None => {
            eprintln!("usage: basalt <input> [output.c]");
            return ExitCode::FAILURE;
        }
    };
    let output = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| default_output_path(&input));

    let colors = Colors::new(std::io::stderr().is_terminal());

    let source = match fs::read_to_string(&input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error reading {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };

    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprint!(
                "{}",
                format_diagnostic("syntax error", &e.to_string(), Some(&input), &colors)
            );
            return ExitCode::FAILURE;
        }
    };

    let program = match Parser::new(tokens).parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprint!(
                "{}",
                format_diagnostic("parse error", &e.to_string(), Some(&input), &colors)
            );
            return ExitCode::FAILURE;
        }
    };

    let c_source = emit_c(&transform(normalize(desugar(program))));

    if let Err(e) = fs::write(&output, c_source) {
        eprintln!("error writing {}: {}", output, e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn default_output_path(input: &str) -> String {
    Path::new(input)
        .with_extension("c")
        .to_string_lossy()
        .into_owned()
}
