use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use hamming84::{
    ecc::stream::{decode_stream, encode_stream},
    hamming_8_4, Result,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

struct Cli {
    mode: Mode,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
    debug: bool,
}

impl Cli {
    fn build_command() -> Command {
        let io_args = [
            Arg::new("input")
                .help("Input file (defaults to stdin)")
                .short('i')
                .long("input")
                .value_name("INFILE")
                .value_parser(value_parser!(PathBuf)),
            Arg::new("output")
                .help("Output file (defaults to stdout)")
                .short('o')
                .long("output")
                .value_name("OUTFILE")
                .value_parser(value_parser!(PathBuf)),
            Arg::new("debug")
                .help("Log every correction to stderr")
                .long("debug")
                .action(ArgAction::SetTrue),
        ];

        Command::new("hamming")
            .about("A Hamming(8,4) systematic code encoder and decoder")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(
                Command::new("encode")
                    .about("Encode each input byte into two Hamming(8,4) codewords")
                    .args(io_args.clone()),
            )
            .subcommand(
                Command::new("decode")
                    .about("Decode codeword pairs back into bytes, correcting single-bit errors")
                    .args(io_args)
                    .arg(
                        Arg::new("verbose")
                            .help("Print decoding statistics to stderr")
                            .short('v')
                            .long("verbose")
                            .action(ArgAction::SetTrue),
                    ),
            )
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let (mode, sub) = match matches.subcommand() {
            Some(("encode", sub)) => (Mode::Encode, sub),
            Some(("decode", sub)) => (Mode::Decode, sub),
            _ => unreachable!("a subcommand is required"),
        };

        Cli {
            mode,
            input: sub.get_one::<PathBuf>("input").cloned(),
            output: sub.get_one::<PathBuf>("output").cloned(),
            verbose: mode == Mode::Decode && sub.get_flag("verbose"),
            debug: sub.get_flag("debug"),
        }
    }

    fn run(&self) -> Result<()> {
        let codec = hamming_8_4()?;

        let reader: Box<dyn Read> = match &self.input {
            Some(path) => Box::new(File::open(path)?),
            None => Box::new(io::stdin().lock()),
        };
        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(File::create(path)?),
            None => Box::new(io::stdout().lock()),
        };

        let result = match self.mode {
            Mode::Encode => encode_stream(codec, reader, writer).map(|_| ()),
            Mode::Decode => decode_stream(codec, reader, writer).map(|stats| {
                if self.verbose {
                    eprint!("{}", stats);
                }
            }),
        };

        // A truncated decode has still written its complete pairs
        self.mirror_permissions()?;
        result
    }

    /// Gives the output file the permission bits of the input file
    fn mirror_permissions(&self) -> Result<()> {
        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            let permissions = fs::metadata(input)?.permissions();
            fs::set_permissions(output, permissions)?;
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    let matches = Cli::build_command().get_matches();
    let cli = Cli::from_matches(&matches);

    let level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        Cli::build_command().debug_assert();
    }

    #[test]
    fn test_parse_decode() {
        let matches = Cli::build_command()
            .try_get_matches_from(["hamming", "decode", "-v", "-i", "in.bin", "-o", "out.bin"])
            .unwrap();
        let cli = Cli::from_matches(&matches);
        assert_eq!(cli.mode, Mode::Decode);
        assert!(cli.verbose);
        assert!(!cli.debug);
        assert_eq!(cli.input, Some(PathBuf::from("in.bin")));
        assert_eq!(cli.output, Some(PathBuf::from("out.bin")));
    }

    #[test]
    fn test_encode_has_no_verbose_flag() {
        let result = Cli::build_command().try_get_matches_from(["hamming", "encode", "-v"]);
        assert!(result.is_err());

        let matches = Cli::build_command()
            .try_get_matches_from(["hamming", "encode"])
            .unwrap();
        let cli = Cli::from_matches(&matches);
        assert_eq!(cli.mode, Mode::Encode);
        assert!(cli.input.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_debug_flag_on_both_subcommands() {
        for mode in ["encode", "decode"] {
            let matches = Cli::build_command()
                .try_get_matches_from(["hamming", mode, "--debug"])
                .unwrap();
            assert!(Cli::from_matches(&matches).debug);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_truncated_decode_still_mirrors_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ham");
        let output = dir.path().join("out.bin");

        let codec = hamming_8_4().unwrap();
        let mut encoded = hamming84::ecc::encode_bytes(codec, b"ok").unwrap();
        encoded.push(0x4B);
        fs::write(&input, &encoded).unwrap();
        fs::set_permissions(&input, fs::Permissions::from_mode(0o640)).unwrap();

        let cli = Cli {
            mode: Mode::Decode,
            input: Some(input),
            output: Some(output.clone()),
            verbose: false,
            debug: false,
        };
        assert!(matches!(
            cli.run(),
            Err(hamming84::Error::TruncatedStream { length: 5 })
        ));

        assert_eq!(fs::read(&output).unwrap(), b"ok");
        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
