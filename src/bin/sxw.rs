//! sxw CLI — streaming XML reformatting and transcoding.

use clap::Parser;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;

use sxw::{transcode_xml_stream, Encoding, WriterOptions};

#[derive(Parser)]
#[command(name = "sxw", about = "Streaming XML reformatter/transcoder")]
struct Cli {
    /// Input XML file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target encoding label (utf-8, us-ascii, iso-8859-1, ...)
    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Indent structural content (two spaces per depth)
    #[arg(long)]
    pretty: bool,

    /// Keep the caller's attribute order instead of sorting
    #[arg(long)]
    no_sort: bool,

    /// Write empty elements as explicit open/close pairs
    #[arg(long)]
    expand_empty: bool,
}

fn run(cli: &Cli) -> sxw::Result<()> {
    let options = WriterOptions::default()
        .with_encoding(Encoding::from_label(&cli.encoding)?)
        .with_pretty_print(cli.pretty)
        .with_sort_attributes(!cli.no_sort)
        .with_abbreviate_empty(!cli.expand_empty);

    let input: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(
            std::fs::File::open(path)
                .map_err(|e| sxw::Error::Io(format!("open {}: {e}", path.display())))?,
        ),
        None => Box::new(std::io::stdin()),
    };
    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .map_err(|e| sxw::Error::Io(format!("create {}: {e}", path.display())))?,
        ),
        None => Box::new(std::io::stdout()),
    };

    transcode_xml_stream(input, std::io::BufWriter::new(output), &options)
}

fn main() {
    let cli = Cli::parse();

    if cli.input.is_none() && std::io::stdin().is_terminal() {
        eprintln!("sxw: no input file and stdin is a terminal");
        process::exit(2);
    }

    if let Err(e) = run(&cli) {
        eprintln!("sxw: {e}");
        process::exit(1);
    }
}
