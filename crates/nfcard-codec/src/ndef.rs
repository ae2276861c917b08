//! NFC Forum Data Exchange Format (NDEF) messages.
//!
//! Only what a business-card tag needs: building and parsing messages made
//! of unchunked records, and the RTD Text record that carries the card
//! payload.
//!
//! # Record Layout
//!
//! ```text
//! +----+----+----+----+----+-----+
//! | MB | ME | CF | SR | IL | TNF |   header byte
//! +----+----+----+----+----+-----+
//! | TYPE LENGTH                  |   1 byte
//! | PAYLOAD LENGTH               |   1 byte (SR) or 4 bytes big-endian
//! | ID LENGTH                    |   1 byte, only when IL is set
//! | TYPE                         |
//! | ID                           |
//! | PAYLOAD                      |
//! +------------------------------+
//! ```
//!
//! # Text Record Payload
//!
//! ```text
//! [status][language code][text]
//!  bit 7      : 0 = UTF-8, 1 = UTF-16
//!  bits 5..0  : language code length
//! ```

use crate::error::NdefError;
use bytes::{BufMut, Bytes, BytesMut};

/// Message Begin flag.
const FLAG_MB: u8 = 0x80;
/// Message End flag.
const FLAG_ME: u8 = 0x40;
/// Chunk flag.
const FLAG_CF: u8 = 0x20;
/// Short Record flag (1-byte payload length).
const FLAG_SR: u8 = 0x10;
/// ID Length present flag.
const FLAG_IL: u8 = 0x08;
/// Mask for the Type Name Format bits.
const TNF_MASK: u8 = 0x07;

/// RTD Text record type.
pub const RTD_TEXT: &[u8] = b"T";

/// Text status byte: UTF-16 encoding flag.
const TEXT_UTF16: u8 = 0x80;
/// Text status byte: language code length mask.
const TEXT_LANG_MASK: u8 = 0x3F;

/// Longest message a one-byte TLV length field can describe.
const TLV_SHORT_MAX: usize = 0xFE;

/// Bytes a Type 2 tag spends around an NDEF message: the `0x03` TLV
/// type, a one- or three-byte length and the `0xFE` terminator TLV.
pub fn tlv_overhead(message_len: usize) -> usize {
    let length_field = if message_len <= TLV_SHORT_MAX { 1 } else { 3 };
    1 + length_field + 1
}

/// Tag memory needed to store a message of `message_len` bytes.
pub fn tag_footprint(message_len: usize) -> usize {
    message_len + tlv_overhead(message_len)
}

/// Type Name Format of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tnf {
    Empty,
    WellKnown,
    Media,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
}

impl Tnf {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Empty => 0x00,
            Self::WellKnown => 0x01,
            Self::Media => 0x02,
            Self::AbsoluteUri => 0x03,
            Self::External => 0x04,
            Self::Unknown => 0x05,
            Self::Unchanged => 0x06,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self, NdefError> {
        match value {
            0x00 => Ok(Self::Empty),
            0x01 => Ok(Self::WellKnown),
            0x02 => Ok(Self::Media),
            0x03 => Ok(Self::AbsoluteUri),
            0x04 => Ok(Self::External),
            0x05 => Ok(Self::Unknown),
            0x06 => Ok(Self::Unchanged),
            other => Err(NdefError::InvalidTnf(other)),
        }
    }
}

/// A single NDEF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub tnf: Tnf,
    pub record_type: Bytes,
    pub id: Bytes,
    pub payload: Bytes,
}

impl NdefRecord {
    /// Create a record from its parts.
    pub fn new(
        tnf: Tnf,
        record_type: impl Into<Bytes>,
        id: impl Into<Bytes>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            tnf,
            record_type: record_type.into(),
            id: id.into(),
            payload: payload.into(),
        }
    }

    /// Create an empty record (TNF 0x00).
    pub fn empty() -> Self {
        Self::new(Tnf::Empty, Bytes::new(), Bytes::new(), Bytes::new())
    }

    /// Create a UTF-8 RTD Text record.
    ///
    /// # Errors
    ///
    /// Returns [`NdefError::TooLong`] if the language code exceeds 63 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use nfcard_codec::NdefRecord;
    ///
    /// let record = NdefRecord::text("hello", "en").unwrap();
    /// assert_eq!(&record.payload[..], b"\x02enhello");
    /// assert_eq!(record.as_text().unwrap(), ("en".to_string(), "hello".to_string()));
    /// ```
    pub fn text(text: &str, language: &str) -> Result<Self, NdefError> {
        let lang = language.as_bytes();
        if lang.len() > TEXT_LANG_MASK as usize {
            return Err(NdefError::TooLong {
                field: "language code",
                len: lang.len(),
                max: TEXT_LANG_MASK as usize,
            });
        }

        let mut payload = BytesMut::with_capacity(1 + lang.len() + text.len());
        payload.put_u8(lang.len() as u8);
        payload.put_slice(lang);
        payload.put_slice(text.as_bytes());

        Ok(Self::new(
            Tnf::WellKnown,
            Bytes::from_static(RTD_TEXT),
            Bytes::new(),
            payload.freeze(),
        ))
    }

    /// Whether this is an RTD Text record.
    pub fn is_text(&self) -> bool {
        self.tnf == Tnf::WellKnown && self.record_type.as_ref() == RTD_TEXT
    }

    /// Parse an RTD Text record into `(language, text)`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the record is not a Well-Known `T` record
    /// - the text is UTF-16 encoded or not valid UTF-8
    /// - the language code length exceeds the payload
    pub fn as_text(&self) -> Result<(String, String), NdefError> {
        if !self.is_text() {
            return Err(NdefError::NotText);
        }

        let status = *self.payload.first().ok_or(NdefError::Truncated {
            offset: 0,
            needed: 1,
            available: 0,
        })?;

        if status & TEXT_UTF16 != 0 {
            return Err(NdefError::UnsupportedEncoding("UTF-16".to_string()));
        }

        let lang_len = (status & TEXT_LANG_MASK) as usize;
        let rest = &self.payload[1..];
        if rest.len() < lang_len {
            return Err(NdefError::Truncated {
                offset: 1,
                needed: lang_len,
                available: rest.len(),
            });
        }

        let language = std::str::from_utf8(&rest[..lang_len])
            .map_err(|e| NdefError::UnsupportedEncoding(e.to_string()))?;
        let text = std::str::from_utf8(&rest[lang_len..])
            .map_err(|e| NdefError::UnsupportedEncoding(e.to_string()))?;

        Ok((language.to_string(), text.to_string()))
    }

    /// Size of this record once encoded.
    pub fn encoded_len(&self) -> usize {
        let payload_len_size = if self.is_short() { 1 } else { 4 };
        let id_len_size = if self.id.is_empty() { 0 } else { 1 };
        1 + 1
            + payload_len_size
            + id_len_size
            + self.record_type.len()
            + self.id.len()
            + self.payload.len()
    }

    fn is_short(&self) -> bool {
        self.payload.len() <= u8::MAX as usize
    }

    fn write(&self, buf: &mut BytesMut, first: bool, last: bool) {
        let mut header = self.tnf.to_u8();
        if first {
            header |= FLAG_MB;
        }
        if last {
            header |= FLAG_ME;
        }
        if self.is_short() {
            header |= FLAG_SR;
        }
        if !self.id.is_empty() {
            header |= FLAG_IL;
        }

        buf.put_u8(header);
        buf.put_u8(self.record_type.len() as u8);
        if self.is_short() {
            buf.put_u8(self.payload.len() as u8);
        } else {
            buf.put_u32(self.payload.len() as u32);
        }
        if !self.id.is_empty() {
            buf.put_u8(self.id.len() as u8);
        }
        buf.put_slice(&self.record_type);
        buf.put_slice(&self.id);
        buf.put_slice(&self.payload);
    }

    fn validate(&self) -> Result<(), NdefError> {
        let max = u8::MAX as usize;
        if self.record_type.len() > max {
            return Err(NdefError::TooLong {
                field: "record type",
                len: self.record_type.len(),
                max,
            });
        }
        if self.id.len() > max {
            return Err(NdefError::TooLong {
                field: "record id",
                len: self.id.len(),
                max,
            });
        }
        if self.payload.len() > u32::MAX as usize {
            return Err(NdefError::TooLong {
                field: "payload",
                len: self.payload.len(),
                max: u32::MAX as usize,
            });
        }
        Ok(())
    }
}

/// An NDEF message: one or more records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.records
    }

    /// Text of the first RTD Text record, if any parses.
    pub fn first_text(&self) -> Option<String> {
        self.records
            .iter()
            .filter(|record| record.is_text())
            .find_map(|record| record.as_text().ok())
            .map(|(_, text)| text)
    }

    /// Size of the message once encoded.
    pub fn encoded_len(&self) -> usize {
        self.records.iter().map(NdefRecord::encoded_len).sum()
    }

    /// Encode the message.
    ///
    /// An empty message encodes as a single empty record, the form a
    /// formatted blank tag holds.
    pub fn encode(&self) -> Bytes {
        if self.records.is_empty() {
            let mut buf = BytesMut::with_capacity(3);
            NdefRecord::empty().write(&mut buf, true, true);
            return buf.freeze();
        }

        let mut buf = BytesMut::with_capacity(self.encoded_len());
        let last_index = self.records.len() - 1;
        for (index, record) in self.records.iter().enumerate() {
            record.write(&mut buf, index == 0, index == last_index);
        }
        buf.freeze()
    }

    /// Encode after checking field limits.
    ///
    /// # Errors
    ///
    /// Returns [`NdefError::TooLong`] if a record type or id exceeds 255 bytes.
    pub fn try_encode(&self) -> Result<Bytes, NdefError> {
        for record in &self.records {
            record.validate()?;
        }
        Ok(self.encode())
    }

    /// Decode a message from raw tag bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the buffer is empty or truncated
    /// - the first record lacks MB, or a later record sets it
    /// - no record sets ME, or data follows the ME record
    /// - a record is chunked or uses TNF 0x07
    pub fn decode(data: &[u8]) -> Result<Self, NdefError> {
        if data.is_empty() {
            return Err(NdefError::Empty);
        }

        let mut reader = Reader::new(data);
        let mut records = Vec::new();

        loop {
            let header = reader.u8()?;
            let first = records.is_empty();

            if first && header & FLAG_MB == 0 {
                return Err(NdefError::InvalidBoundary(
                    "first record is missing the MB flag".to_string(),
                ));
            }
            if !first && header & FLAG_MB != 0 {
                return Err(NdefError::InvalidBoundary(
                    "MB flag set on a record after the first".to_string(),
                ));
            }
            if header & FLAG_CF != 0 {
                return Err(NdefError::ChunkedRecord);
            }

            let tnf = Tnf::from_u8(header & TNF_MASK)?;
            let type_len = reader.u8()? as usize;
            let payload_len = if header & FLAG_SR != 0 {
                reader.u8()? as usize
            } else {
                reader.u32()? as usize
            };
            let id_len = if header & FLAG_IL != 0 {
                reader.u8()? as usize
            } else {
                0
            };

            let record_type = reader.take(type_len)?;
            let id = reader.take(id_len)?;
            let payload = reader.take(payload_len)?;

            records.push(NdefRecord::new(
                tnf,
                Bytes::copy_from_slice(record_type),
                Bytes::copy_from_slice(id),
                Bytes::copy_from_slice(payload),
            ));

            if header & FLAG_ME != 0 {
                break;
            }
            if reader.remaining() == 0 {
                return Err(NdefError::InvalidBoundary(
                    "last record is missing the ME flag".to_string(),
                ));
            }
        }

        if reader.remaining() != 0 {
            return Err(NdefError::InvalidBoundary(format!(
                "{} bytes after the ME record",
                reader.remaining()
            )));
        }

        Ok(Self { records })
    }
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], NdefError> {
        if self.remaining() < len {
            return Err(NdefError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, NdefError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, NdefError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
