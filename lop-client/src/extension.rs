//! The host protocol's extension envelope
//!
//! An extension is a 32-byte offsets word followed by the concatenated field
//! data. The offsets word packs eight `uint32` cumulative end offsets, field
//! `i` occupying bits `[32 * i, 32 * i + 32)`. Bytes past the last end offset
//! are free-form custom data.

use alloy_primitives::{Bytes, U256};

use crate::errors::PredicateError;

/// The size of the offsets word
const OFFSETS_LEN: usize = 32;
/// The number of offset-addressed fields
const NUM_FIELDS: usize = 8;
/// The bit width of each packed offset
const OFFSET_BITS: usize = 32;

/// The fields of an extension, in offset order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ExtensionField {
    /// Suffix appended to the maker asset transfer call
    MakerAssetSuffix = 0,
    /// Suffix appended to the taker asset transfer call
    TakerAssetSuffix = 1,
    /// Dynamic making amount getter
    MakingAmountData = 2,
    /// Dynamic taking amount getter
    TakingAmountData = 3,
    /// The order predicate
    Predicate = 4,
    /// A maker permit
    MakerPermit = 5,
    /// Pre-interaction call data
    PreInteractionData = 6,
    /// Post-interaction call data
    PostInteractionData = 7,
}

/// A builder for extension envelopes
#[derive(Clone, Debug, Default)]
pub struct ExtensionBuilder {
    /// The data of each field
    fields: [Bytes; NUM_FIELDS],
    /// Trailing custom data
    custom_data: Bytes,
}

impl ExtensionBuilder {
    /// Constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the data of a field
    pub fn with_field(mut self, field: ExtensionField, data: Bytes) -> Self {
        self.fields[field as usize] = data;
        self
    }

    /// Set the predicate
    pub fn with_predicate(self, predicate: Bytes) -> Self {
        self.with_field(ExtensionField::Predicate, predicate)
    }

    /// Set the trailing custom data
    pub fn with_custom_data(mut self, data: Bytes) -> Self {
        self.custom_data = data;
        self
    }

    /// Serialize the envelope
    ///
    /// An extension with no data at all serializes to the empty byte string
    pub fn build(&self) -> Result<Bytes, PredicateError> {
        let total: usize = self.fields.iter().map(|f| f.len()).sum();
        if total == 0 && self.custom_data.is_empty() {
            return Ok(Bytes::new());
        }
        if total > u32::MAX as usize {
            return Err(PredicateError::TooLarge(total));
        }

        let mut offsets = U256::ZERO;
        let mut end = 0usize;
        for (i, field) in self.fields.iter().enumerate() {
            end += field.len();
            offsets |= U256::from(end as u32) << (i * OFFSET_BITS);
        }

        let mut out = Vec::with_capacity(OFFSETS_LEN + total + self.custom_data.len());
        out.extend_from_slice(&offsets.to_be_bytes::<OFFSETS_LEN>());
        for field in self.fields.iter() {
            out.extend_from_slice(field);
        }
        out.extend_from_slice(&self.custom_data);

        Ok(Bytes::from(out))
    }
}

/// Read a single field out of an extension
///
/// The empty extension has every field empty
pub fn get_field(extension: &[u8], field: ExtensionField) -> Result<Bytes, PredicateError> {
    if extension.is_empty() {
        return Ok(Bytes::new());
    }
    if extension.len() < OFFSETS_LEN {
        return Err(PredicateError::malformed_extension("missing offsets word"));
    }

    let offsets = U256::from_be_slice(&extension[..OFFSETS_LEN]);
    let idx = field as usize;
    let read_offset = |i: usize| -> usize {
        let word: U256 = (offsets >> (i * OFFSET_BITS)) & U256::from(u32::MAX);
        word.to::<u32>() as usize
    };

    let begin = if idx == 0 { 0 } else { read_offset(idx - 1) };
    let end = read_offset(idx);

    let data = &extension[OFFSETS_LEN..];
    if begin > end || end > data.len() {
        return Err(PredicateError::malformed_extension(format!(
            "field {idx} spans [{begin}, {end}) of {} bytes",
            data.len()
        )));
    }

    Ok(Bytes::copy_from_slice(&data[begin..end]))
}

/// Read the predicate out of an extension
pub fn get_predicate(extension: &[u8]) -> Result<Bytes, PredicateError> {
    get_field(extension, ExtensionField::Predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicate_only_envelope() {
        let predicate = Bytes::from(vec![0xaa; 40]);
        let ext = ExtensionBuilder::new().with_predicate(predicate.clone()).build().unwrap();

        assert_eq!(ext.len(), OFFSETS_LEN + 40);
        // Fields 4..8 all end at 40, fields 0..4 end at 0
        let offsets = U256::from_be_slice(&ext[..OFFSETS_LEN]);
        assert_eq!((offsets >> 96) & U256::from(u32::MAX), U256::ZERO);
        assert_eq!((offsets >> 128) & U256::from(u32::MAX), U256::from(40u8));
        assert_eq!((offsets >> 224) & U256::from(u32::MAX), U256::from(40u8));

        assert_eq!(get_predicate(&ext).unwrap(), predicate);
        assert!(get_field(&ext, ExtensionField::MakerPermit).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_fields() {
        let ext = ExtensionBuilder::new()
            .with_field(ExtensionField::MakerAssetSuffix, Bytes::from(vec![1, 2, 3]))
            .with_predicate(Bytes::from(vec![9; 5]))
            .with_field(ExtensionField::PostInteractionData, Bytes::from(vec![7]))
            .with_custom_data(Bytes::from(vec![0xff]))
            .build()
            .unwrap();

        assert_eq!(get_field(&ext, ExtensionField::MakerAssetSuffix).unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(get_predicate(&ext).unwrap().as_ref(), &[9; 5]);
        assert_eq!(get_field(&ext, ExtensionField::PostInteractionData).unwrap().as_ref(), &[7]);
        assert_eq!(ext.last(), Some(&0xff));
    }

    #[test]
    fn test_empty_and_truncated() {
        assert!(ExtensionBuilder::new().build().unwrap().is_empty());
        assert!(get_predicate(&[]).unwrap().is_empty());
        assert!(get_predicate(&[0u8; 10]).is_err());

        let ext = ExtensionBuilder::new().with_predicate(Bytes::from(vec![1; 8])).build().unwrap();
        assert!(get_predicate(&ext[..ext.len() - 1]).is_err());
    }
}
