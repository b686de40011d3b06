//! Type descriptors and the named-stream header (§4.7).
//!
//! A type descriptor is a tag byte from the fixed table below, plus recursive argument
//! descriptors for the two parameterized constructors. Recursion always terminates because each
//! argument descriptor is strictly smaller, on the wire, than its parent.

use super::error::CodecError;
use super::primitives::{decode_string, decode_varint, encode_string, encode_varint};
use super::Codec;

/// Writes a single type descriptor: a tag byte followed by that tag's arguments, recursively.
/// Only codecs with an entry in the tag table (§6) are valid column types; the others have no
/// on-wire representation as a type descriptor.
pub fn write_type_descriptor(codec: &Codec) -> Result<Vec<u8>, CodecError> {
    match codec {
        Codec::Int | Codec::Float | Codec::String | Codec::Date | Codec::Time | Codec::DateTime => {
            Ok(encode_varint(codec.tag() as u64))
        }
        Codec::List(element) => {
            let mut out = encode_varint(codec.tag() as u64);
            out.extend(write_type_descriptor(element)?);
            Ok(out)
        }
        Codec::Table(columns) => {
            let mut out = encode_varint(codec.tag() as u64);
            out.extend(write_type_descriptor_list(columns)?);
            Ok(out)
        }
        Codec::Bool | Codec::Bytes(_) | Codec::Dict(..) | Codec::OrderedDict(..) | Codec::Struct(_) => {
            Err(CodecError::UnknownTypeTag(0xff, 0))
        }
    }
}

fn write_type_descriptor_list(columns: &[Codec]) -> Result<Vec<u8>, CodecError> {
    let mut out = encode_varint(columns.len() as u64);
    for column in columns {
        out.extend(write_type_descriptor(column)?);
    }
    Ok(out)
}

/// Reads a single type descriptor starting at `offset`.
pub fn read_type_descriptor(bytes: &[u8], offset: usize) -> Result<(usize, Codec), CodecError> {
    let (offset, tag) = decode_varint(bytes, offset)?;
    match tag {
        0 => Ok((offset, Codec::Int)),
        1 => Ok((offset, Codec::Float)),
        2 => Ok((offset, Codec::String)),
        3 => {
            let (offset, element) = read_type_descriptor(bytes, offset)?;
            Ok((offset, Codec::List(Box::new(element))))
        }
        4 => Ok((offset, Codec::Date)),
        5 => Ok((offset, Codec::Time)),
        6 => Ok((offset, Codec::DateTime)),
        7 => {
            let (offset, columns) = read_type_descriptor_list(bytes, offset)?;
            Ok((offset, Codec::Table(columns)))
        }
        other => Err(CodecError::UnknownTypeTag(other as u8, offset)),
    }
}

fn read_type_descriptor_list(bytes: &[u8], offset: usize) -> Result<(usize, Vec<Codec>), CodecError> {
    let (mut offset, len) = decode_varint(bytes, offset)?;
    let mut columns = Vec::with_capacity(len as usize);
    for _ in 0..len {
        let (next, column) = read_type_descriptor(bytes, offset)?;
        offset = next;
        columns.push(column);
    }
    Ok((offset, columns))
}

/// A named stream's header: a name, the column type descriptors, and the number of rows that
/// follow in the `Table` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub name: String,
    pub types: Vec<Codec>,
    pub row_count: u64,
}

pub fn write_header(header: &Header) -> Result<Vec<u8>, CodecError> {
    let mut out = encode_string(&header.name)?;
    out.extend(write_type_descriptor_list(&header.types)?);
    out.extend(encode_varint(header.row_count));
    Ok(out)
}

pub fn read_header(bytes: &[u8], offset: usize) -> Result<(usize, Header), CodecError> {
    let (offset, name) = decode_string(bytes, offset)?;
    let (offset, types) = read_type_descriptor_list(bytes, offset)?;
    let (offset, row_count) = decode_varint(bytes, offset)?;
    Ok((offset, Header { name, types, row_count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{list, Value};

    #[test]
    fn list_of_int_type_descriptor_round_trips() {
        let codec = list(Codec::Int);
        let bytes = write_type_descriptor(&codec).unwrap();
        assert_eq!(bytes[0], 3);
        let (offset, decoded) = read_type_descriptor(&bytes, 0).unwrap();
        assert_eq!(offset, bytes.len());
        assert_eq!(decoded, codec);
    }

    #[test]
    fn header_and_table_round_trip() {
        let header = Header {
            name: "t".into(),
            types: vec![Codec::Int, Codec::String],
            row_count: 2,
        };
        let header_bytes = write_header(&header).unwrap();

        let table = Codec::Table(header.types.clone());
        let rows = Value::Table(vec![
            vec![Value::Int(1), Value::String("a".into())],
            vec![Value::Int(2), Value::String("b".into())],
        ]);
        let payload = table.encode(&rows).unwrap();

        let mut stream = header_bytes.clone();
        stream.extend(&payload);

        let (offset, decoded_header) = read_header(&stream, 0).unwrap();
        assert_eq!(decoded_header, header);
        let (offset, decoded_rows) = table.decode(&stream, offset).unwrap();
        assert_eq!(offset, stream.len());
        assert_eq!(decoded_rows, rows);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        assert_eq!(
            read_type_descriptor(&[20], 0),
            Err(CodecError::UnknownTypeTag(20, 1))
        );
    }
}
