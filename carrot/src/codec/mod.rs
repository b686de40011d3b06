//! # Self-describing binary codec
//!
//! A [Codec] is a value carrying its own parameters (e.g. `Codec::List` owns the element codec),
//! dispatching `encode`/`decode` through a match rather than a trait object - composites own
//! their sub-codecs directly instead of going through dynamic dispatch. [Value] is the matching
//! dynamic runtime value a [Codec] encodes or produces.
//!
//! `Dict` and `OrderedDict` share a wire form (a `List[K]` immediately followed by a `List[V]`)
//! and so share one [Value] representation, [Value::Pairs]; only the [Codec] variant used to
//! interpret the bytes differs, and only in whether the decoder is free to reorder.

pub mod error;
pub mod header;
pub mod primitives;

pub use error::CodecError;

use primitives::*;

/// A runtime value produced by decoding, or accepted for encoding, against some [Codec].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(u64),
    Bool(bool),
    Float(f64),
    Bytes(Vec<u8>),
    String(String),
    List(Vec<Value>),
    /// The shared wire representation of `Dict` and `OrderedDict`: parallel key/value lists.
    Pairs(Vec<(Value, Value)>),
    Struct(Vec<Value>),
    Table(Vec<Vec<Value>>),
    Date { year: u64, month: u64, day: u64 },
    Time { hour: u64, minute: u64, second: u64, micro: u64 },
    DateTime {
        year: u64,
        month: u64,
        day: u64,
        hour: u64,
        minute: u64,
        second: u64,
        micro: u64,
    },
}

/// A codec, parameterized by its sub-codecs where applicable. Construct one with the matching
/// free function (e.g. [list], [dict]) or a bare enum literal for leaf codecs.
#[derive(Debug, Clone, PartialEq)]
pub enum Codec {
    Int,
    Bool,
    Float,
    Bytes(usize),
    String,
    List(Box<Codec>),
    Dict(Box<Codec>, Box<Codec>),
    OrderedDict(Box<Codec>, Box<Codec>),
    Struct(Vec<Codec>),
    Table(Vec<Codec>),
    Date,
    Time,
    DateTime,
}

pub fn list(element: Codec) -> Codec {
    Codec::List(Box::new(element))
}

pub fn dict(key: Codec, value: Codec) -> Codec {
    Codec::Dict(Box::new(key), Box::new(value))
}

pub fn ordered_dict(key: Codec, value: Codec) -> Codec {
    Codec::OrderedDict(Box::new(key), Box::new(value))
}

impl Codec {
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        match (self, value) {
            (Codec::Int, Value::Int(n)) => Ok(encode_varint(*n)),
            (Codec::Bool, Value::Bool(b)) => Ok(encode_bool(*b)),
            (Codec::Float, Value::Float(f)) => Ok(encode_float(*f)),
            (Codec::Bytes(n), Value::Bytes(bytes)) => encode_fixed_bytes(bytes, *n),
            (Codec::String, Value::String(s)) => encode_string(s),
            (Codec::List(element), Value::List(items)) => {
                let mut out = encode_varint(items.len() as u64);
                for item in items {
                    out.extend(element.encode(item)?);
                }
                Ok(out)
            }
            (Codec::Dict(key, value), Value::Pairs(pairs))
            | (Codec::OrderedDict(key, value), Value::Pairs(pairs)) => {
                let mut out = encode_varint(pairs.len() as u64);
                for (k, _) in pairs {
                    out.extend(key.encode(k)?);
                }
                out.extend(encode_varint(pairs.len() as u64));
                for (_, v) in pairs {
                    out.extend(value.encode(v)?);
                }
                Ok(out)
            }
            (Codec::Struct(codecs), Value::Struct(items)) => {
                if codecs.len() != items.len() {
                    return Err(CodecError::WrongArity {
                        expected: codecs.len(),
                        actual: items.len(),
                    });
                }
                let mut out = Vec::new();
                for (codec, item) in codecs.iter().zip(items) {
                    out.extend(codec.encode(item)?);
                }
                Ok(out)
            }
            (Codec::Table(codecs), Value::Table(rows)) => {
                let mut out = encode_varint(rows.len() as u64);
                for row in rows {
                    if codecs.len() != row.len() {
                        return Err(CodecError::WrongArity {
                            expected: codecs.len(),
                            actual: row.len(),
                        });
                    }
                    for (codec, cell) in codecs.iter().zip(row) {
                        out.extend(codec.encode(cell)?);
                    }
                }
                Ok(out)
            }
            (Codec::Date, Value::Date { year, month, day }) => {
                let mut out = encode_varint(*year);
                out.extend(encode_varint(*month));
                out.extend(encode_varint(*day));
                Ok(out)
            }
            (Codec::Time, Value::Time { hour, minute, second, micro }) => {
                let mut out = encode_varint(*hour);
                out.extend(encode_varint(*minute));
                out.extend(encode_varint(*second));
                out.extend(encode_varint(*micro));
                Ok(out)
            }
            (
                Codec::DateTime,
                Value::DateTime { year, month, day, hour, minute, second, micro },
            ) => {
                let mut out = encode_varint(*year);
                out.extend(encode_varint(*month));
                out.extend(encode_varint(*day));
                out.extend(encode_varint(*hour));
                out.extend(encode_varint(*minute));
                out.extend(encode_varint(*second));
                out.extend(encode_varint(*micro));
                Ok(out)
            }
            _ => Err(CodecError::WrongArity { expected: 0, actual: 0 }),
        }
    }

    pub fn decode(&self, bytes: &[u8], offset: usize) -> Result<(usize, Value), CodecError> {
        match self {
            Codec::Int => {
                let (offset, n) = decode_varint(bytes, offset)?;
                Ok((offset, Value::Int(n)))
            }
            Codec::Bool => {
                let (offset, b) = decode_bool(bytes, offset)?;
                Ok((offset, Value::Bool(b)))
            }
            Codec::Float => {
                let (offset, f) = decode_float(bytes, offset)?;
                Ok((offset, Value::Float(f)))
            }
            Codec::Bytes(n) => {
                let (offset, raw) = decode_fixed_bytes(bytes, offset, *n)?;
                Ok((offset, Value::Bytes(raw)))
            }
            Codec::String => {
                let (offset, s) = decode_string(bytes, offset)?;
                Ok((offset, Value::String(s)))
            }
            Codec::List(element) => {
                let (mut offset, len) = decode_varint(bytes, offset)?;
                let mut items = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    let (next, item) = element.decode(bytes, offset)?;
                    offset = next;
                    items.push(item);
                }
                Ok((offset, Value::List(items)))
            }
            Codec::Dict(key, value) | Codec::OrderedDict(key, value) => {
                let (mut offset, key_len) = decode_varint(bytes, offset)?;
                let mut keys = Vec::with_capacity(key_len as usize);
                for _ in 0..key_len {
                    let (next, k) = key.decode(bytes, offset)?;
                    offset = next;
                    keys.push(k);
                }
                let (mut offset, value_len) = decode_varint(bytes, offset)?;
                let mut values = Vec::with_capacity(value_len as usize);
                for _ in 0..value_len {
                    let (next, v) = value.decode(bytes, offset)?;
                    offset = next;
                    values.push(v);
                }
                let pairs = keys.into_iter().zip(values).collect();
                Ok((offset, Value::Pairs(pairs)))
            }
            Codec::Struct(codecs) => {
                let mut offset = offset;
                let mut items = Vec::with_capacity(codecs.len());
                for codec in codecs {
                    let (next, item) = codec.decode(bytes, offset)?;
                    offset = next;
                    items.push(item);
                }
                Ok((offset, Value::Struct(items)))
            }
            Codec::Table(codecs) => {
                let (mut offset, row_count) = decode_varint(bytes, offset)?;
                let mut rows = Vec::with_capacity(row_count as usize);
                for _ in 0..row_count {
                    let mut row = Vec::with_capacity(codecs.len());
                    for codec in codecs {
                        let (next, cell) = codec.decode(bytes, offset)?;
                        offset = next;
                        row.push(cell);
                    }
                    rows.push(row);
                }
                Ok((offset, Value::Table(rows)))
            }
            Codec::Date => {
                let (offset, year) = decode_varint(bytes, offset)?;
                let (offset, month) = decode_varint(bytes, offset)?;
                let (offset, day) = decode_varint(bytes, offset)?;
                Ok((offset, Value::Date { year, month, day }))
            }
            Codec::Time => {
                let (offset, hour) = decode_varint(bytes, offset)?;
                let (offset, minute) = decode_varint(bytes, offset)?;
                let (offset, second) = decode_varint(bytes, offset)?;
                let (offset, micro) = decode_varint(bytes, offset)?;
                Ok((offset, Value::Time { hour, minute, second, micro }))
            }
            Codec::DateTime => {
                let (offset, year) = decode_varint(bytes, offset)?;
                let (offset, month) = decode_varint(bytes, offset)?;
                let (offset, day) = decode_varint(bytes, offset)?;
                let (offset, hour) = decode_varint(bytes, offset)?;
                let (offset, minute) = decode_varint(bytes, offset)?;
                let (offset, second) = decode_varint(bytes, offset)?;
                let (offset, micro) = decode_varint(bytes, offset)?;
                Ok((
                    offset,
                    Value::DateTime { year, month, day, hour, minute, second, micro },
                ))
            }
        }
    }

    /// The tag byte this codec's shape is registered under in the header's tag table (§6).
    pub(crate) fn tag(&self) -> u8 {
        match self {
            Codec::Int => 0,
            Codec::Float => 1,
            Codec::String => 2,
            Codec::List(_) => 3,
            Codec::Date => 4,
            Codec::Time => 5,
            Codec::DateTime => 6,
            Codec::Table(_) => 7,
            Codec::Bool | Codec::Bytes(_) | Codec::Dict(..) | Codec::OrderedDict(..) | Codec::Struct(_) => {
                unreachable!("{self:?} has no header tag; not a column type")
            }
        }
    }
}
