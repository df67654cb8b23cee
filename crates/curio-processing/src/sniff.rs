//! MIME detection from magic numbers.
//!
//! Only the leading bytes are inspected. Client filenames and declared content
//! types play no part.

/// Number of leading bytes inspected by [`detect_mime`]
pub const SNIFF_LEN: usize = 2048;

const OCTET_STREAM: &str = "application/octet-stream";

/// Detect the MIME type of `data` from its first [`SNIFF_LEN`] bytes.
///
/// Returns `application/octet-stream` when nothing matches.
pub fn detect_mime(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if head.is_empty() {
        return "application/x-empty";
    }

    // JPEG: FF D8 FF
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if head.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }

    // GIF: GIF87a / GIF89a
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return "image/gif";
    }

    // RIFF container: WebP images, AVI and WAV share the header
    if head.len() >= 12 && head.starts_with(b"RIFF") {
        return match &head[8..12] {
            b"WEBP" => "image/webp",
            b"AVI " => "video/x-msvideo",
            b"WAVE" => "audio/x-wav",
            _ => OCTET_STREAM,
        };
    }

    // ISO base media: size(4) "ftyp" brand(4)
    if head.len() >= 12 && &head[4..8] == b"ftyp" {
        return iso_brand_mime(&head[8..12]);
    }

    // EBML: Matroska and WebM
    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return if contains(head, b"webm") {
            "video/webm"
        } else {
            "video/x-matroska"
        };
    }

    if head.starts_with(b"OggS") {
        return if contains(head, b"theora") {
            "video/ogg"
        } else {
            "audio/ogg"
        };
    }

    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }

    if looks_like_text(head) {
        return "text/plain";
    }

    OCTET_STREAM
}

fn iso_brand_mime(brand: &[u8]) -> &'static str {
    match brand {
        b"qt  " => "video/quicktime",
        b"avif" | b"avis" => "image/avif",
        b"heic" | b"heix" | b"mif1" | b"msf1" => "image/heic",
        b"M4A " | b"M4B " => "audio/mp4",
        _ => "video/mp4",
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn looks_like_text(head: &[u8]) -> bool {
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        // The prefix may cut a multi-byte character in half
        Err(err) if err.error_len().is_none() => {
            match std::str::from_utf8(&head[..err.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\x0C'))
}
