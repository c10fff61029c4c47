//! Big-endian binary encoding.
//!
//! Every value starts with its tag byte, followed by a fixed-width body or
//! a length-prefixed one. Length prefixes are variable width: a single 0
//! byte for zero, otherwise a width tag (1/2/3 for u8/u16/u32) followed by
//! the big-endian length. Unknown tag bytes and temporal payloads outside
//! the representable range read back as `InvalidData` errors.

use std::io::{self, Read, Write};
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::rowcore::ident::Ident;
use crate::rowcore::record::{Record, ValueMap};
use crate::rowcore::value::tag::TypeTag;
use crate::rowcore::value::types::{
    date_to_millis, datetime_to_millis, millis_to_date, millis_to_datetime, millis_to_time,
    time_to_millis,
};
use crate::rowcore::value::{SparseVector, Value};

/// Writes a length as a 0 byte for zero, or a width tag (1/2/3) followed
/// by the big-endian u8/u16/u32 length.
pub fn write_len<W: Write>(writer: &mut W, len: usize) -> io::Result<()> {
    if len == 0 {
        writer.write_all(&[0])
    } else if len <= u8::MAX as usize {
        writer.write_all(&[1, len as u8])
    } else if len <= u16::MAX as usize {
        writer.write_all(&[2])?;
        writer.write_all(&(len as u16).to_be_bytes())
    } else if len <= u32::MAX as usize {
        writer.write_all(&[3])?;
        writer.write_all(&(len as u32).to_be_bytes())
    } else {
        Err(invalid_data(format!("length {} exceeds the u32 wire limit", len)))
    }
}

/// Reads a length written by [`write_len`].
pub fn read_len<R: Read>(reader: &mut R) -> io::Result<usize> {
    match read_u8(reader)? {
        0 => Ok(0),
        1 => Ok(read_u8(reader)? as usize),
        2 => {
            let mut buf = [0u8; 2];
            reader.read_exact(&mut buf)?;
            Ok(u16::from_be_bytes(buf) as usize)
        }
        3 => {
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf)?;
            Ok(u32::from_be_bytes(buf) as usize)
        }
        other => Err(invalid_data(format!("invalid length width tag {}", other))),
    }
}

impl Value {
    /// Serializes the value as its tag byte followed by the body.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[self.type_tag().code()])?;
        match self {
            Value::Null(tag) => writer.write_all(&[tag.code()]),
            Value::Int(i) => writer.write_all(&i.to_be_bytes()),
            Value::Long(l) => writer.write_all(&l.to_be_bytes()),
            Value::Float(x) => writer.write_all(&x.to_be_bytes()),
            Value::Double(x) | Value::Numeric(x) => writer.write_all(&x.to_be_bytes()),
            Value::Boolean(b) => writer.write_all(&[*b as u8]),
            Value::Complex(re, im) => {
                writer.write_all(&re.to_be_bytes())?;
                writer.write_all(&im.to_be_bytes())
            }
            Value::String(s) => write_bytes(writer, s.as_bytes()),
            Value::Binary(bytes) => write_bytes(writer, bytes),
            Value::Decimal(d) | Value::Instant(d) => {
                write_bytes(writer, d.to_string().as_bytes())
            }
            Value::Date(d) => writer.write_all(&date_to_millis(*d).to_be_bytes()),
            Value::Time(t) | Value::CalendarTime(t) => {
                writer.write_all(&time_to_millis(*t).to_be_bytes())
            }
            Value::Timestamp(ts) | Value::CalendarTimestamp(ts) => {
                writer.write_all(&datetime_to_millis(*ts).to_be_bytes())
            }
            Value::List(items) | Value::Set(items) => {
                write_len(writer, items.len())?;
                for item in items {
                    item.write_to(writer)?;
                }
                Ok(())
            }
            Value::Map(map) => {
                write_len(writer, map.len())?;
                for (key, value) in map.iter() {
                    write_bytes(writer, key.as_bytes())?;
                    value.write_to(writer)?;
                }
                Ok(())
            }
            Value::DenseVector(items) => {
                write_len(writer, items.len())?;
                for x in items {
                    writer.write_all(&x.to_be_bytes())?;
                }
                Ok(())
            }
            Value::SparseVector(sv) => {
                write_len(writer, sv.len())?;
                write_len(writer, sv.stored_len())?;
                for (index, value) in sv.iter_stored() {
                    writer.write_all(&index.to_be_bytes())?;
                    writer.write_all(&value.to_be_bytes())?;
                }
                Ok(())
            }
        }
    }

    /// Reads back a value written by [`Value::write_to`].
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Value> {
        let code = read_u8(reader)?;
        let tag = TypeTag::from_code(code)
            .ok_or_else(|| invalid_data(format!("unknown value tag {}", code)))?;
        match tag {
            TypeTag::Null => {
                let inner = read_u8(reader)?;
                let natural = TypeTag::from_code(inner)
                    .ok_or_else(|| invalid_data(format!("unknown null tag {}", inner)))?;
                Ok(Value::Null(natural))
            }
            TypeTag::Int => Ok(Value::Int(read_i32(reader)?)),
            TypeTag::Long => Ok(Value::Long(read_i64(reader)?)),
            TypeTag::Float => Ok(Value::Float(read_f32(reader)?)),
            TypeTag::Double => Ok(Value::Double(read_f64(reader)?)),
            TypeTag::Numeric => Ok(Value::Numeric(read_f64(reader)?)),
            TypeTag::Boolean => Ok(Value::Boolean(read_u8(reader)? != 0)),
            TypeTag::Complex => Ok(Value::Complex(read_f64(reader)?, read_f64(reader)?)),
            TypeTag::String => Ok(Value::String(read_string(reader)?)),
            TypeTag::Binary => Ok(Value::Binary(read_bytes(reader)?)),
            TypeTag::Decimal => Ok(Value::Decimal(read_decimal(reader)?)),
            TypeTag::Instant => Ok(Value::Instant(read_decimal(reader)?)),
            TypeTag::Date => {
                let ms = read_i64(reader)?;
                millis_to_date(ms)
                    .map(Value::Date)
                    .ok_or_else(|| invalid_data(format!("{} ms is not a representable date", ms)))
            }
            TypeTag::Time => read_time(reader).map(Value::Time),
            TypeTag::CalendarTime => read_time(reader).map(Value::CalendarTime),
            TypeTag::Timestamp => read_datetime(reader).map(Value::Timestamp),
            TypeTag::CalendarTimestamp => read_datetime(reader).map(Value::CalendarTimestamp),
            TypeTag::List => Ok(Value::List(read_elements(reader)?)),
            TypeTag::Set => Ok(Value::set_of(read_elements(reader)?)),
            TypeTag::Map => {
                let entries = read_len(reader)?;
                let mut map = ValueMap::with_capacity(entries);
                for _ in 0..entries {
                    let key = read_string(reader)?;
                    let value = Value::read_from(reader)?;
                    map.put(&key, value);
                }
                Ok(Value::Map(map))
            }
            TypeTag::DenseVector => {
                let len = read_len(reader)?;
                let mut items = Vec::with_capacity(len.min(WIRE_PREALLOC));
                for _ in 0..len {
                    items.push(read_f64(reader)?);
                }
                Ok(Value::DenseVector(items))
            }
            TypeTag::SparseVector => {
                let len = read_len(reader)?;
                let stored = read_len(reader)?;
                let mut indices = Vec::with_capacity(stored.min(WIRE_PREALLOC));
                let mut values = Vec::with_capacity(stored.min(WIRE_PREALLOC));
                for _ in 0..stored {
                    indices.push(read_u32(reader)?);
                    values.push(read_f64(reader)?);
                }
                SparseVector::new(len, indices, values)
                    .map(Value::SparseVector)
                    .map_err(|e| invalid_data(e.to_string()))
            }
        }
    }
}

impl Record {
    /// Writes the field count, then each field as a length-prefixed name
    /// and a tagged value.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_len(writer, self.len())?;
        for (name, value) in self.iter() {
            write_bytes(writer, name.as_bytes())?;
            value.write_to(writer)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Record> {
        let fields = read_len(reader)?;
        let mut record = Record::with_capacity(fields);
        for _ in 0..fields {
            let name = read_string(reader)?;
            let value = Value::read_from(reader)?;
            record.set(&name, value);
        }
        Ok(record)
    }
}

impl Ident {
    /// Writes the element count followed by each element as a tagged value.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_len(writer, self.len())?;
        for value in self.iter() {
            value.write_to(writer)?;
        }
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Ident> {
        let len = read_len(reader)?;
        let mut values = Vec::with_capacity(len.min(WIRE_PREALLOC));
        for _ in 0..len {
            values.push(Value::read_from(reader)?);
        }
        Ok(Ident::from_values(values))
    }
}

// trust lengths only up to a point before the data proves itself
const WIRE_PREALLOC: usize = 4096;

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    write_len(writer, bytes.len())?;
    writer.write_all(bytes)
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let len = read_len(reader)?;
    let mut buf = vec![0u8; len.min(WIRE_PREALLOC)];
    if len <= WIRE_PREALLOC {
        reader.read_exact(&mut buf)?;
        return Ok(buf);
    }
    reader.read_exact(&mut buf)?;
    let mut remaining = len - WIRE_PREALLOC;
    while remaining > 0 {
        let chunk = remaining.min(WIRE_PREALLOC);
        let start = buf.len();
        buf.resize(start + chunk, 0);
        reader.read_exact(&mut buf[start..])?;
        remaining -= chunk;
    }
    Ok(buf)
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let bytes = read_bytes(reader)?;
    String::from_utf8(bytes).map_err(|_| invalid_data("invalid UTF-8 in string".to_string()))
}

fn read_decimal<R: Read>(reader: &mut R) -> io::Result<BigDecimal> {
    let text = read_string(reader)?;
    BigDecimal::from_str(&text)
        .map_err(|_| invalid_data(format!("invalid decimal literal '{}'", text)))
}

fn read_elements<R: Read>(reader: &mut R) -> io::Result<Vec<Value>> {
    let len = read_len(reader)?;
    let mut items = Vec::with_capacity(len.min(WIRE_PREALLOC));
    for _ in 0..len {
        items.push(Value::read_from(reader)?);
    }
    Ok(items)
}

fn read_time<R: Read>(reader: &mut R) -> io::Result<chrono::NaiveTime> {
    let ms = read_i64(reader)?;
    millis_to_time(ms)
        .ok_or_else(|| invalid_data(format!("{} ms is not a representable time", ms)))
}

fn read_datetime<R: Read>(reader: &mut R) -> io::Result<chrono::NaiveDateTime> {
    let ms = read_i64(reader)?;
    millis_to_datetime(ms)
        .ok_or_else(|| invalid_data(format!("{} ms is not a representable timestamp", ms)))
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_i64<R: Read>(reader: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

fn read_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}
