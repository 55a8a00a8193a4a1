use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::{Captures, Regex};
use tracing::debug;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Read a text file, tolerating a UTF-8 BOM and falling back to GBK for
/// files saved by legacy editors.
pub fn load_text_file_with_guess_encoding(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(decode_with_guess(&bytes, path))
}

fn decode_with_guess(bytes: &[u8], path: &Path) -> String {
    let body = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return text.to_string();
    }

    let (cow, _, had_errors) = encoding_rs::GBK.decode(body);
    if !had_errors {
        debug!("Decoded {} as GBK", path.display());
        return cow.into_owned();
    }

    debug!("{} is not valid UTF-8 or GBK, decoding lossily", path.display());
    let (cow, _) = encoding_rs::UTF_8.decode_without_bom_handling(body);
    cow.into_owned()
}

/// Replace `${VAR_NAME}` with the value of the environment variable.
/// Unset variables are left untouched.
pub fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\$\{(\w+)\}").expect("valid env var pattern"));

    pattern
        .replace_all(content, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}
