use std::io::{self, Write};
use std::process;

use clap::Parser;

use b64::base64::core as codec;
use b64::common;
use b64::common::io::{open_sink, open_source};
use b64::error::Error;

#[derive(Parser)]
#[command(
    name = "b64",
    about = "Base64 encode or decode between files or standard streams.",
    after_help = "With no --input, or when FILE is blank or -, read standard input;\n\
        --output defaults to standard output the same way.\n\n\
        The data are encoded with the standard base64 alphabet of RFC 4648.\n\
        When decoding, whitespace and line breaks in the input are ignored.",
    version
)]
struct Cli {
    /// Decode input
    #[arg(short = 'D', long = "decode")]
    decode: bool,

    /// Break encoded output after COLS columns (0 = no wrapping)
    #[arg(short = 'b', long = "break", value_name = "COLS", default_value = "0")]
    break_col: usize,

    /// Input file (default: standard input)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<String>,

    /// Output file (default: standard output)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<String>,
}

/// Enlarge pipe buffers on Linux for higher throughput.
/// Larger pipe buffers allow fuller reads/writes per syscall for the
/// streaming encode/decode paths.
#[cfg(target_os = "linux")]
fn enlarge_pipes() {
    const PIPE_SIZE: i32 = 1024 * 1024;
    unsafe {
        libc::fcntl(0, libc::F_SETPIPE_SZ, PIPE_SIZE); // stdin
        libc::fcntl(1, libc::F_SETPIPE_SZ, PIPE_SIZE); // stdout
    }
}

fn main() {
    common::reset_sigpipe();

    #[cfg(target_os = "linux")]
    enlarge_pipes();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        // A vanished reader is a normal way for a pipeline to end.
        if let Error::Io(e) = &err
            && e.kind() == io::ErrorKind::BrokenPipe
        {
            process::exit(0);
        }
        eprintln!("b64: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mut source = open_source(cli.input.as_deref())?;
    let mut sink = open_sink(cli.output.as_deref())?;

    if cli.decode {
        codec::decode_stream(&mut source, &mut sink)?;
    } else {
        codec::encode_stream(&mut source, &mut sink, cli.break_col)?;
    }
    sink.flush()?;
    Ok(())
}
