/// Outcome of the encoding-normalization step run at load time, stored so
/// [`crate::PieceTable::save_to_path`] can reverse it. Full legacy-codepage
/// detection is out of scope (§1); this models that collaborator only at
/// its interface — the bytes a `PieceTable` stores are always UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    Utf8Strict,
    Utf8Lossy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedLineEnding {
    Lf,
    Crlf,
}

/// Validate/repair `raw` to UTF-8 and normalize CRLF to LF, reporting what
/// was done so it can be reversed on save.
pub(crate) fn normalize(raw: &[u8]) -> (Vec<u8>, DetectedEncoding, DetectedLineEnding) {
    let (text, encoding): (Vec<u8>, DetectedEncoding) = match std::str::from_utf8(raw) {
        Ok(_) => (raw.to_vec(), DetectedEncoding::Utf8Strict),
        Err(_) => (
            String::from_utf8_lossy(raw).into_owned().into_bytes(),
            DetectedEncoding::Utf8Lossy,
        ),
    };

    if !has_crlf(&text) {
        return (text, encoding, DetectedLineEnding::Lf);
    }

    let mut out = Vec::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        if text[i] == b'\r' && text.get(i + 1) == Some(&b'\n') {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(text[i]);
            i += 1;
        }
    }

    (out, encoding, DetectedLineEnding::Crlf)
}

pub(crate) fn has_crlf(bytes: &[u8]) -> bool {
    bytes.windows(2).any(|w| w == b"\r\n")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn crlf_normalizes_to_lf() {
        let (out, _, ending) = normalize(b"a\r\nb\r\nc");
        assert_eq!(out, b"a\nb\nc");
        assert_eq!(ending, DetectedLineEnding::Crlf);
    }

    #[test]
    fn invalid_utf8_falls_back_to_lossy() {
        let (_, encoding, _) = normalize(&[0x61, 0xff, 0x62]);
        assert_eq!(encoding, DetectedEncoding::Utf8Lossy);
    }

    #[test]
    fn clean_lf_text_is_untouched() {
        let (out, encoding, ending) = normalize(b"a\nb\n");
        assert_eq!(out, b"a\nb\n");
        assert_eq!(encoding, DetectedEncoding::Utf8Strict);
        assert_eq!(ending, DetectedLineEnding::Lf);
    }
}
