//! `flagchain` binary: resolves flags from the command line and a chain of
//! config files, then prints the effective values.

use std::process::ExitCode;

use flagchain::{Error, FlagError, FlagSet, PrecedenceStack};

const CHAIN_OPTION: &str = "c";

fn flag_set() -> Result<FlagSet, FlagError> {
    FlagSet::builder("flagchain")
        .string(CHAIN_OPTION, "", "Read flags from `FILE`")
        .string("n", "", "Specify your `NAME`")
        .int("a", 0, "Specify your `AGE`")
        .bool("m", false, "Mark as a member")
        .bool("late", false, "Let later config files override earlier sources")
        .bool("dump", false, "Print the source stack as TOML before resolving")
        .build()
}

fn run(flags: &mut FlagSet) -> Result<(), Error> {
    flags.parse(std::env::args().skip(1))?;

    // Read before loading so config files can't change the policy.
    let late_set = flags.bool("late").unwrap_or(false);
    let dump = flags.bool("dump").unwrap_or(false);

    let stack = PrecedenceStack::load(flags, CHAIN_OPTION)?;
    if dump {
        print!("{}", stack.to_toml()?);
    }

    let unrolled = stack.unroll(flags, late_set);
    for (name, value) in unrolled.effective() {
        println!("{name}={value}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut flags = match flag_set() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Flag(FlagError::Help)) => {
            print!("{}", flags.usage());
            ExitCode::SUCCESS
        }
        Err(Error::Flag(err)) => {
            eprintln!("error: {err}");
            eprint!("{}", flags.usage());
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
