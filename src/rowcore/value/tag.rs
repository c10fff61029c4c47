//! The closed set of value type tags and the type classes arithmetic
//! dispatch is built on.

/// Type tag for every value the engine can hold.
///
/// The set is closed: every `Value` variant maps to exactly one tag, and
/// the numeric codes double as the wire-format type bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// The untyped null tag (typed nulls carry one of the other tags)
    Null = 0,
    /// 32-bit signed integer
    Int = 1,
    /// 64-bit signed integer
    Long = 2,
    /// 32-bit IEEE float
    Float = 3,
    /// 64-bit IEEE float
    Double = 4,
    /// General-purpose numeric, 64-bit float backed
    Numeric = 5,
    /// Arbitrary-precision decimal
    Decimal = 6,
    /// Complex number, f64 re/im pair
    Complex = 7,
    Boolean = 8,
    String = 9,
    /// Raw byte payload
    Binary = 10,
    Date = 11,
    Time = 12,
    Timestamp = 13,
    /// Wall-clock time of day, millisecond resolution
    CalendarTime = 14,
    /// Wall-clock date and time, millisecond resolution
    CalendarTimestamp = 15,
    /// High-precision point in time: decimal epoch milliseconds
    Instant = 16,
    List = 17,
    Set = 18,
    Map = 19,
    DenseVector = 20,
    SparseVector = 21,
}

impl TypeTag {
    /// Wire-format type byte.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`TypeTag::code`]; `None` for unknown bytes.
    pub fn from_code(code: u8) -> Option<TypeTag> {
        Some(match code {
            0 => TypeTag::Null,
            1 => TypeTag::Int,
            2 => TypeTag::Long,
            3 => TypeTag::Float,
            4 => TypeTag::Double,
            5 => TypeTag::Numeric,
            6 => TypeTag::Decimal,
            7 => TypeTag::Complex,
            8 => TypeTag::Boolean,
            9 => TypeTag::String,
            10 => TypeTag::Binary,
            11 => TypeTag::Date,
            12 => TypeTag::Time,
            13 => TypeTag::Timestamp,
            14 => TypeTag::CalendarTime,
            15 => TypeTag::CalendarTimestamp,
            16 => TypeTag::Instant,
            17 => TypeTag::List,
            18 => TypeTag::Set,
            19 => TypeTag::Map,
            20 => TypeTag::DenseVector,
            21 => TypeTag::SparseVector,
            _ => return None,
        })
    }

    /// Display name used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Int => "INT",
            TypeTag::Long => "LONG",
            TypeTag::Float => "FLOAT",
            TypeTag::Double => "DOUBLE",
            TypeTag::Numeric => "NUMERIC",
            TypeTag::Decimal => "DECIMAL",
            TypeTag::Complex => "COMPLEX",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::String => "STRING",
            TypeTag::Binary => "BINARY",
            TypeTag::Date => "DATE",
            TypeTag::Time => "TIME",
            TypeTag::Timestamp => "TIMESTAMP",
            TypeTag::CalendarTime => "CALENDAR_TIME",
            TypeTag::CalendarTimestamp => "CALENDAR_TIMESTAMP",
            TypeTag::Instant => "INSTANT",
            TypeTag::List => "LIST",
            TypeTag::Set => "SET",
            TypeTag::Map => "MAP",
            TypeTag::DenseVector => "DENSE_VECTOR",
            TypeTag::SparseVector => "SPARSE_VECTOR",
        }
    }

    /// Tags that operate in i64 space: integers, booleans, and the
    /// millisecond-backed temporal types.
    pub fn is_integral_like(self) -> bool {
        matches!(
            self,
            TypeTag::Int
                | TypeTag::Boolean
                | TypeTag::Long
                | TypeTag::Date
                | TypeTag::Time
                | TypeTag::Timestamp
                | TypeTag::CalendarTime
                | TypeTag::CalendarTimestamp
        )
    }

    /// Tags that operate in f64 space.
    pub fn is_floating(self) -> bool {
        matches!(self, TypeTag::Float | TypeTag::Double | TypeTag::Numeric)
    }

    /// Tags that operate in arbitrary-precision decimal space.
    pub fn is_decimal_like(self) -> bool {
        matches!(self, TypeTag::Decimal | TypeTag::Instant)
    }

    /// All temporal tags, including the decimal-backed INSTANT.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            TypeTag::Date
                | TypeTag::Time
                | TypeTag::Timestamp
                | TypeTag::CalendarTime
                | TypeTag::CalendarTimestamp
                | TypeTag::Instant
        )
    }

    /// Tags that broadcast element-wise in arithmetic.
    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            TypeTag::List | TypeTag::DenseVector | TypeTag::SparseVector
        )
    }

    /// Tags arithmetic rejects with a directed error.
    pub fn is_keyed(self) -> bool {
        matches!(self, TypeTag::Set | TypeTag::Map)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
