use clap::{ArgGroup, Parser};
use std::fs;
use std::path::PathBuf;
use std::process;

use fullsimple::program::{Config, Program};
use fullsimple::{EvalMode, RenderMode};

#[derive(Parser, Debug)]
#[command(name = "fullsimple")]
#[command(about = "Type checker and evaluator for the simply typed lambda calculus with extensions", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["small_step", "big_step"])))]
struct Args {
    /// Script of `;`-terminated commands
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Reduce one step at a time until no rule applies
    #[arg(long)]
    small_step: bool,

    /// Evaluate with the big-step evaluator
    #[arg(long)]
    big_step: bool,

    /// Print De Bruijn indices instead of names
    #[arg(long)]
    index_form: bool,

    /// Stop small-step evaluation after N steps
    #[arg(long, value_name = "N", conflicts_with = "big_step")]
    max_steps: Option<usize>,

    /// Report a failing command and continue with the next one
    #[arg(long)]
    keep_going: bool,

    /// Print the type of each value
    #[arg(long)]
    types: bool,
}

fn main() {
    let args = Args::parse();

    let code = match fs::read_to_string(&args.file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error reading file '{}': {}", args.file.display(), e);
            process::exit(2);
        }
    };

    let config = Config {
        mode: if args.big_step {
            EvalMode::BigStep
        } else {
            EvalMode::SmallStep
        },
        render: if args.index_form {
            RenderMode::DeBruijn
        } else {
            RenderMode::Named
        },
        max_steps: args.max_steps,
        keep_going: args.keep_going,
        print_types: args.types,
    };

    let mut program = Program::with_config(config);
    let ok = program.run(&code, |result| match result {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("error: {}", e),
    });
    if !ok {
        process::exit(1);
    }
}
