
use log::debug;
use std::io::{BufWriter, Write};
use std::fs::File;
use std::path::Path;

use crate::errors::{AnalysisError, ErrorKind};

/// Default upload limit, the same 5 MB the web upload accepts
pub const DEFAULT_MAX_VCF_BYTES: u64 = 5 * 1024 * 1024;

/// Helper function that loads a file into some type, helpful generic
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let fp: Box<dyn std::io::Read> = if filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::read::MultiGzDecoder::new(
                File::open(filename)?
            )
        )
    } else {
        Box::new(File::open(filename)?)
    };
    let result: T = serde_json::from_reader(fp)?;
    Ok(result)
}

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file: Box<dyn std::io::Write> = if out_filename.extension().unwrap_or_default() == "gz" {
        Box::new(
            flate2::write::GzEncoder::new(
                File::create(out_filename)?,
                flate2::Compression::best()
            )
        )
    } else {
        Box::new(File::create(out_filename)?)
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Reads an uploaded VCF with the same checks a web upload would get.
/// Content is decoded as UTF-8, replacing invalid sequences.
/// # Arguments
/// * `filename` - the uploaded file
/// * `max_bytes` - the largest accepted file size
/// # Errors
/// * `VALIDATION_ERROR` if the file does not exist
/// * `INVALID_FILE_TYPE` if the extension is not `.vcf`
/// * `FILE_TOO_LARGE` if the file exceeds `max_bytes`
/// * `FILE_UPLOAD_ERROR` if the file cannot be read
pub fn load_vcf_upload(filename: &Path, max_bytes: u64) -> Result<String, AnalysisError> {
    if !filename.is_file() {
        return Err(AnalysisError::new(
            ErrorKind::ValidationError,
            "VCF file is required",
            Some("Provide an existing .vcf file.")
        ));
    }

    let is_vcf = filename.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("vcf"))
        .unwrap_or(false);
    if !is_vcf {
        return Err(AnalysisError::new(ErrorKind::InvalidFileType, "Only VCF files are allowed.", None));
    }

    let file_size = std::fs::metadata(filename)
        .map_err(|e| upload_error(&e))?
        .len();
    if file_size > max_bytes {
        let limit_mb = max_bytes as f64 / (1024.0 * 1024.0);
        return Err(AnalysisError::new(
            ErrorKind::FileTooLarge,
            &format!("File size exceeds {limit_mb}MB limit."),
            Some(&format!("Maximum allowed file size is {limit_mb}MB."))
        ));
    }

    let raw_bytes = std::fs::read(filename)
        .map_err(|e| upload_error(&e))?;
    debug!("Read {} bytes from {filename:?}", raw_bytes.len());
    Ok(String::from_utf8_lossy(&raw_bytes).into_owned())
}

fn upload_error(e: &std::io::Error) -> AnalysisError {
    AnalysisError::new(ErrorKind::FileUploadError, "File upload error.", Some(&e.to_string()))
}
