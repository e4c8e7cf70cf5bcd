//! Operand escaping for client command lines.
//!
//! Remote paths travel as `\`-separated, double-quoted operands with `"`
//! escaped as `^"`; local paths keep their separators and escape `"` as
//! `\"`. Operands containing line breaks or NUL are rejected outright: a
//! newline inside a command line would let a crafted name forge the
//! prompt marker that delimits responses.

use smb_core::Error;

fn ensure_single_line(path: &str) -> Result<(), Error> {
    if path.bytes().any(|b| b == b'\n' || b == b'\r' || b == 0) {
        return Err(Error::InvalidPath {
            path: path.to_owned(),
        });
    }
    Ok(())
}

/// Escapes a remote path into the client's quoting rules.
pub(crate) fn escape_path(path: &str) -> Result<String, Error> {
    ensure_single_line(path)?;
    let flipped = path.replace('/', "\\").replace('"', "^\"");
    Ok(format!("\"{flipped}\""))
}

/// Escapes a local filesystem path for `put`/`get` operands.
pub(crate) fn escape_local_path(path: &str) -> Result<String, Error> {
    ensure_single_line(path)?;
    Ok(format!("\"{}\"", path.replace('"', "\\\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_separators_are_flipped() {
        assert_eq!(escape_path("/docs/report.txt").unwrap(), "\"\\docs\\report.txt\"");
    }

    #[test]
    fn remote_quotes_are_caret_escaped() {
        assert_eq!(escape_path("say \"hi\"").unwrap(), "\"say ^\"hi^\"\"");
    }

    #[test]
    fn local_separators_are_kept() {
        assert_eq!(escape_local_path("/tmp/out.bin").unwrap(), "\"/tmp/out.bin\"");
    }

    #[test]
    fn local_quotes_are_backslash_escaped() {
        assert_eq!(escape_local_path("a\"b").unwrap(), "\"a\\\"b\"");
    }

    #[test]
    fn line_breaks_are_rejected() {
        assert!(matches!(
            escape_path("evil\nsmb: \\>"),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            escape_local_path("evil\rname"),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn prompt_lookalike_names_stay_quoted() {
        // The marker may appear inside an operand, but never unquoted at
        // the start of an echoed line.
        let escaped = escape_path("smb: \\> trap").unwrap();
        assert!(escaped.starts_with('"'));
        assert!(escaped.ends_with('"'));
    }
}
