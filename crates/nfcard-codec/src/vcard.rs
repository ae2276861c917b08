//! vCard 3.0 conversion for contact import and export.
//!
//! Exporting writes one `TEL`, `EMAIL` and `URL` line per value, primary
//! first. Importing takes the first of each as the primary value and keeps
//! the rest, in order, as additional values. Property parameters
//! (`TEL;TYPE=CELL:`) are accepted and ignored.

use crate::error::CodecError;
use nfcard_core::BusinessCard;

const LINE_END: &str = "\r\n";

/// Render a card as a vCard 3.0 document.
///
/// # Examples
///
/// ```
/// use nfcard_codec::vcard;
/// use nfcard_core::BusinessCard;
///
/// let card = BusinessCard::builder("Jane Doe").company("Acme, Inc.").build();
/// let text = vcard::to_vcard(&card);
///
/// assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Jane Doe\r\n"));
/// assert!(text.contains("ORG:Acme\\, Inc.\r\n"));
/// ```
pub fn to_vcard(card: &BusinessCard) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape(card.name.trim())),
        format!("N:{}", structured_name(card.name.trim())),
    ];

    if !card.company.trim().is_empty() {
        lines.push(format!("ORG:{}", escape(card.company.trim())));
    }
    if !card.title.trim().is_empty() {
        lines.push(format!("TITLE:{}", escape(card.title.trim())));
    }
    lines.extend(card.phones().map(|p| format!("TEL:{}", escape(p))));
    lines.extend(card.emails().map(|e| format!("EMAIL:{}", escape(e))));
    lines.extend(card.websites().map(|w| format!("URL:{}", escape(w))));
    if !card.notes.trim().is_empty() {
        lines.push(format!("NOTE:{}", escape(card.notes.trim())));
    }
    lines.push("END:VCARD".to_string());

    let mut out = lines.join(LINE_END);
    out.push_str(LINE_END);
    out
}

/// Parse the first vCard in `input` into a transient card.
///
/// # Errors
///
/// Returns [`CodecError::InvalidVcard`] if:
/// - there is no `BEGIN:VCARD` line
/// - the card has neither `FN` nor a usable `N`
pub fn from_vcard(input: &str) -> Result<BusinessCard, CodecError> {
    let lines = unfold(input);

    let begin = lines
        .iter()
        .position(|line| line.eq_ignore_ascii_case("BEGIN:VCARD"))
        .ok_or_else(|| CodecError::InvalidVcard("missing BEGIN:VCARD".to_string()))?;

    let mut card = BusinessCard::default();
    let mut structured = None;
    let mut phones = Vec::new();
    let mut emails = Vec::new();
    let mut websites = Vec::new();

    for line in &lines[begin + 1..] {
        if line.eq_ignore_ascii_case("END:VCARD") {
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let name = key
            .split(';')
            .next()
            .unwrap_or_default()
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match name.as_str() {
            "FN" => card.name = unescape(value),
            "N" => structured = Some(value.to_string()),
            "ORG" => card.company = unescape(first_component(value)),
            "TITLE" => card.title = unescape(value),
            "TEL" => phones.push(unescape(value)),
            "EMAIL" => emails.push(unescape(value)),
            "URL" => websites.push(unescape(value)),
            "NOTE" => card.notes = unescape(value),
            _ => {}
        }
    }

    if card.name.trim().is_empty() {
        card.name = structured
            .as_deref()
            .map(name_from_structured)
            .unwrap_or_default();
    }
    if card.name.trim().is_empty() {
        return Err(CodecError::InvalidVcard("missing FN and N".to_string()));
    }

    (card.phone, card.additional_phones) = split_primary(phones);
    (card.email, card.additional_emails) = split_primary(emails);
    (card.website, card.additional_websites) = split_primary(websites);

    Ok(card)
}

fn split_primary(mut values: Vec<String>) -> (String, Vec<String>) {
    values.retain(|v| !v.trim().is_empty());
    if values.is_empty() {
        return (String::new(), values);
    }
    let primary = values.remove(0);
    (primary, values)
}

/// Join folded continuation lines and drop blank lines.
fn unfold(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in input.lines() {
        let raw = raw.trim_end_matches('\r');
        if let Some(continuation) = raw.strip_prefix([' ', '\t'])
            && let Some(last) = lines.last_mut()
        {
            last.push_str(continuation);
            continue;
        }
        if !raw.trim().is_empty() {
            lines.push(raw.to_string());
        }
    }
    lines
}

/// `N` value from a display name: family name last, given names first.
fn structured_name(name: &str) -> String {
    match name.rsplit_once(' ') {
        Some((given, family)) => format!("{};{};;;", escape(family), escape(given)),
        None => format!("{};;;;", escape(name)),
    }
}

fn name_from_structured(value: &str) -> String {
    let parts: Vec<String> = split_unescaped(value, ';')
        .into_iter()
        .map(|p| unescape(&p))
        .collect();
    let family = parts.first().map(String::as_str).unwrap_or_default();
    let given = parts.get(1).map(String::as_str).unwrap_or_default();
    [given, family]
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_component(value: &str) -> &str {
    let mut escaped = false;
    for (index, ch) in value.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            ';' if !escaped => return &value[..index],
            _ => escaped = false,
        }
    }
    value
}

fn split_unescaped(value: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            current.push('\\');
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == separator {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    parts.push(current);
    parts
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
