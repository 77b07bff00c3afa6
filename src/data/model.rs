use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const MAGNITUDE: &str = "Magnitude";
pub const DEPTH: &str = "Depth";
pub const COUNTRY: &str = "Country";
pub const TSUNAMI: &str = "Tsunami";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";

// ---------------------------------------------------------------------------
// CellValue – a single raw cell, kept for the table preview
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_nan() => write!(f, "NaN"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "None"),
        }
    }
}

impl CellValue {
    /// Guess the type of a textual cell: integer, float, bool, then text.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        match s {
            "true" | "True" | "TRUE" => CellValue::Bool(true),
            "false" | "False" | "FALSE" => CellValue::Bool(false),
            _ => CellValue::Text(s.to_string()),
        }
    }

    /// Numeric interpretation, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text interpretation; null cells have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Float(v) if v.is_nan() => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single earthquake observation.
///
/// The typed fields are extracted once at load time; `cells` keeps every
/// column (in schema order) for the preview table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// NaN when the cell was null or not numeric.
    pub magnitude: f64,
    /// Kilometers. NaN when the cell was null or not numeric.
    pub depth: f64,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tsunami: Option<f64>,
    pub cells: Vec<CellValue>,
}

impl Record {
    /// Build a record from raw cells laid out according to `schema`.
    pub fn from_cells(schema: &Schema, cells: Vec<CellValue>) -> Self {
        let number = |idx: Option<usize>| {
            idx.and_then(|i| cells.get(i))
                .and_then(CellValue::as_f64)
                .filter(|v| !v.is_nan())
        };
        let magnitude = number(Some(schema.magnitude)).unwrap_or(f64::NAN);
        let depth = number(Some(schema.depth)).unwrap_or(f64::NAN);
        let latitude = number(schema.latitude);
        let longitude = number(schema.longitude);
        let tsunami = number(schema.tsunami);
        let country = schema
            .country
            .and_then(|i| cells.get(i))
            .and_then(CellValue::as_text);

        Record {
            magnitude,
            depth,
            country,
            latitude,
            longitude,
            tsunami,
            cells,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – column names and positions of the known columns
// ---------------------------------------------------------------------------

/// Column layout of a dataset. Optional columns are `None` when absent from
/// the file entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<String>,
    pub magnitude: usize,
    pub depth: usize,
    pub country: Option<usize>,
    pub tsunami: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
}

impl Schema {
    /// Locate the known columns in a header row.
    ///
    /// Returns the name of the first missing required column on failure.
    pub fn from_columns(columns: Vec<String>) -> Result<Self, &'static str> {
        let find = |name: &str| columns.iter().position(|c| c == name);
        let magnitude = find(MAGNITUDE).ok_or(MAGNITUDE)?;
        let depth = find(DEPTH).ok_or(DEPTH)?;
        Ok(Schema {
            country: find(COUNTRY),
            tsunami: find(TSUNAMI),
            latitude: find(LATITUDE),
            longitude: find(LONGITUDE),
            magnitude,
            depth,
            columns,
        })
    }

    pub fn has_country(&self) -> bool {
        self.country.is_some()
    }

    pub fn has_tsunami(&self) -> bool {
        self.tsunami.is_some()
    }

    /// Names of the coordinate columns missing from the schema.
    pub fn missing_coordinates(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.latitude.is_none() {
            missing.push(LATITUDE.to_string());
        }
        if self.longitude.is_none() {
            missing.push(LONGITUDE.to_string());
        }
        missing
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from a header and raw rows.
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, &'static str> {
        let schema = Schema::from_columns(columns)?;
        let records = rows
            .into_iter()
            .map(|cells| Record::from_cells(&schema, cells))
            .collect();
        Ok(Dataset { schema, records })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
