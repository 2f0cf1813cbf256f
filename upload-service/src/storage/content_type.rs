//! Content type sniffing for uploaded files
//!
//! Looks at no more than the first 512 bytes and matches well-known magic
//! numbers. Anything unrecognised is reported as a generic binary type.

/// Number of leading bytes considered when sniffing
pub const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect the content type of `data` from its leading bytes
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if let Some(content_type) = match_signature(head) {
        return content_type;
    }

    if let Some(content_type) = match_markup(head) {
        return content_type;
    }

    if looks_like_text(head) {
        return "text/plain; charset=utf-8";
    }

    OCTET_STREAM
}

fn match_signature(head: &[u8]) -> Option<&'static str> {
    if is_mp4(head) {
        return Some("video/mp4");
    }

    let content_type = match head {
        [0xFE, 0xFF, ..] => "text/plain; charset=utf-16be",
        [0xFF, 0xFE, ..] => "text/plain; charset=utf-16le",
        [0xEF, 0xBB, 0xBF, ..] => "text/plain; charset=utf-8",
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'B', b'M', ..] => "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', b'V', b'P', ..] => "image/webp",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => "audio/wave",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'A', b'V', b'I', b' ', ..] => "video/avi",
        [0x1A, 0x45, 0xDF, 0xA3, ..] => "video/webm",
        [b'I', b'D', b'3', ..] => "audio/mpeg",
        [b'O', b'g', b'g', b'S', 0x00, ..] => "application/ogg",
        [b'%', b'P', b'D', b'F', b'-', ..] => "application/pdf",
        [b'%', b'!', b'P', b'S', b'-', b'A', b'd', b'o', b'b', b'e', b'-', ..] => {
            "application/postscript"
        }
        [b'P', b'K', 0x03, 0x04, ..] => "application/zip",
        [0x1F, 0x8B, 0x08, ..] => "application/x-gzip",
        [b'R', b'a', b'r', b'!', 0x1A, 0x07, ..] => "application/x-rar-compressed",
        [0x00, b'a', b's', b'm', ..] => "application/wasm",
        _ => return None,
    };

    Some(content_type)
}

/// An ISO base media `ftyp` box that lists an `mp4*` brand.
///
/// HEIC and AVIF share the box layout but carry other brands.
fn is_mp4(head: &[u8]) -> bool {
    if head.len() < 12 || &head[4..8] != b"ftyp" {
        return false;
    }

    let box_size = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
    if box_size > head.len() || box_size % 4 != 0 {
        return false;
    }

    // major brand at 8, minor version at 12, compatible brands after
    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| &head[offset..offset + 3] == b"mp4")
}

fn match_markup(head: &[u8]) -> Option<&'static str> {
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let trimmed = &head[start..];

    const HTML_TAGS: &[&[u8]] = &[
        b"<!DOCTYPE HTML",
        b"<HTML",
        b"<HEAD",
        b"<SCRIPT",
        b"<IFRAME",
        b"<H1",
        b"<DIV",
        b"<FONT",
        b"<TABLE",
        b"<A",
        b"<STYLE",
        b"<TITLE",
        b"<B",
        b"<BODY",
        b"<BR",
        b"<P",
        b"<!--",
    ];

    for tag in HTML_TAGS {
        if starts_with_tag(trimmed, tag) {
            return Some("text/html; charset=utf-8");
        }
    }

    if trimmed.starts_with(b"<?xml") {
        return Some("text/xml; charset=utf-8");
    }

    None
}

/// Case-insensitive prefix match that also requires a tag terminator
/// (space or `>`) right after the tag name.
fn starts_with_tag(data: &[u8], tag: &[u8]) -> bool {
    if data.len() <= tag.len() {
        return false;
    }
    if !data[..tag.len()].eq_ignore_ascii_case(tag) {
        return false;
    }
    // comments need no terminator
    if tag == b"<!--" {
        return true;
    }
    matches!(data[tag.len()], b' ' | b'>')
}

fn looks_like_text(head: &[u8]) -> bool {
    !head.is_empty()
        && !head
            .iter()
            .any(|&b| matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F))
}
