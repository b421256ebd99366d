use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use eyre::{ensure, Result, WrapErr};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

pub enum DecompressedStream {
    PlainText(File),
    Gzip(MultiGzDecoder<File>),
}

impl DecompressedStream {
    pub fn box_bufread(self) -> Box<dyn BufRead + Send + Sync + 'static> {
        match self {
            DecompressedStream::PlainText(file) => Box::new(BufReader::new(file)),
            DecompressedStream::Gzip(decoder) => Box::new(BufReader::new(decoder)),
        }
    }
}

/// Open a plain text or gzip compressed file. The format is sniffed from the file content.
pub fn read_file(path: impl AsRef<Path>) -> Result<DecompressedStream> {
    let path = path.as_ref();
    ensure!(path.exists(), "File {} does not exist", path.display());

    let kind = infer::get_from_path(path)
        .wrap_err_with(|| format!("Failed to sniff the file format: {}", path.display()))?;
    let file = File::open(path)?;

    let stream = match kind.map(|x| (x.extension(), x.mime_type())) {
        Some(("gz", "application/gzip")) => DecompressedStream::Gzip(MultiGzDecoder::new(file)),
        // Always assume plain text if there is no clear match
        _ => DecompressedStream::PlainText(file),
    };
    Ok(stream)
}

/// Create a buffered output file. Paths ending with `.gz` are gzip compressed.
pub fn create_file(path: impl AsRef<Path>) -> Result<Box<dyn Write + Send + 'static>> {
    let path = path.as_ref();
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create the output file: {}", path.display()))?;

    let writer: Box<dyn Write + Send> = match path.extension().and_then(|x| x.to_str()) {
        Some("gz") => Box::new(BufWriter::new(GzEncoder::new(
            file,
            flate2::Compression::default(),
        ))),
        _ => Box::new(BufWriter::new(file)),
    };
    Ok(writer)
}
