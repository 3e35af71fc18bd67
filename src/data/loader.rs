use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::RawRecord;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw listing rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one listing per line (King County export layout)
/// * `.json`    – `[{ "id": ..., "date": "...", "price": ..., ... }, ...]`
/// * `.parquet` – one column per field, any integer/float physical type
///
/// Columns beyond the ones [`RawRecord`] needs are ignored.
pub fn load_file(path: &Path) -> Result<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Deserialize listing rows from any CSV source. A non-numeric value in a
/// numeric column fails the whole load.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<RawRecord>> {
    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        let rec: RawRecord = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(rec);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<RawRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawRecord> = serde_json::from_str(&text).context("parsing JSON listing records")?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`), Polars or
/// the bundled `generate_sample` tool.
///
/// Numeric columns are cast to `Float64`/`Int64`; `date` may be a string
/// or a `Date32` column and is cast to text.
fn load_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = rows.len();
        let columns = BatchColumns::from_batch(&batch)?;
        for row in 0..batch.num_rows() {
            let rec = columns
                .record(row)
                .with_context(|| format!("Row {}", offset + row))?;
            rows.push(rec);
        }
    }
    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// The columns of one record batch, cast to the types [`RawRecord`] needs.
struct BatchColumns {
    id: Int64Array,
    date: StringArray,
    price: Float64Array,
    bedrooms: Int64Array,
    bathrooms: Float64Array,
    sqft_living: Float64Array,
    sqft_lot: Float64Array,
    floors: Float64Array,
    waterfront: Float64Array,
    condition: Int64Array,
    sqft_above: Float64Array,
    sqft_basement: Float64Array,
    yr_built: Int64Array,
    yr_renovated: Int64Array,
    zipcode: Int64Array,
    lat: Float64Array,
    long: Float64Array,
}

impl BatchColumns {
    fn from_batch(batch: &RecordBatch) -> Result<Self> {
        Ok(BatchColumns {
            id: int_column(batch, "id")?,
            date: string_column(batch, "date")?,
            price: float_column(batch, "price")?,
            bedrooms: int_column(batch, "bedrooms")?,
            bathrooms: float_column(batch, "bathrooms")?,
            sqft_living: float_column(batch, "sqft_living")?,
            sqft_lot: float_column(batch, "sqft_lot")?,
            floors: float_column(batch, "floors")?,
            waterfront: float_column(batch, "waterfront")?,
            condition: int_column(batch, "condition")?,
            sqft_above: float_column(batch, "sqft_above")?,
            sqft_basement: float_column(batch, "sqft_basement")?,
            yr_built: int_column(batch, "yr_built")?,
            yr_renovated: int_column(batch, "yr_renovated")?,
            zipcode: int_column(batch, "zipcode")?,
            lat: float_column(batch, "lat")?,
            long: float_column(batch, "long")?,
        })
    }

    fn record(&self, row: usize) -> Result<RawRecord> {
        Ok(RawRecord {
            id: int_at(&self.id, row, "id")?,
            date: string_at(&self.date, row, "date")?,
            price: float_at(&self.price, row, "price")?,
            bedrooms: narrow(int_at(&self.bedrooms, row, "bedrooms")?, "bedrooms")?,
            bathrooms: float_at(&self.bathrooms, row, "bathrooms")?,
            sqft_living: float_at(&self.sqft_living, row, "sqft_living")?,
            sqft_lot: float_at(&self.sqft_lot, row, "sqft_lot")?,
            floors: float_at(&self.floors, row, "floors")?,
            waterfront: float_at(&self.waterfront, row, "waterfront")?,
            condition: narrow(int_at(&self.condition, row, "condition")?, "condition")?,
            sqft_above: float_at(&self.sqft_above, row, "sqft_above")?,
            sqft_basement: float_at(&self.sqft_basement, row, "sqft_basement")?,
            yr_built: narrow(int_at(&self.yr_built, row, "yr_built")?, "yr_built")?,
            yr_renovated: narrow(int_at(&self.yr_renovated, row, "yr_renovated")?, "yr_renovated")?,
            zipcode: narrow(int_at(&self.zipcode, row, "zipcode")?, "zipcode")?,
            lat: float_at(&self.lat, row, "lat")?,
            long: float_at(&self.long, row, "long")?,
        })
    }
}

fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
    cast(batch.column(idx), to).with_context(|| format!("casting '{name}' to {to:?}"))
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let arr = column_as(batch, name, &DataType::Float64)?;
    Ok(arr.as_primitive::<Float64Type>().clone())
}

fn int_column(batch: &RecordBatch, name: &str) -> Result<Int64Array> {
    let arr = column_as(batch, name, &DataType::Int64)?;
    Ok(arr.as_primitive::<Int64Type>().clone())
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let arr = column_as(batch, name, &DataType::Utf8)?;
    Ok(arr.as_string::<i32>().clone())
}

fn float_at(arr: &Float64Array, row: usize, col: &str) -> Result<f64> {
    if arr.is_null(row) {
        bail!("null value in '{col}'");
    }
    Ok(arr.value(row))
}

fn int_at(arr: &Int64Array, row: usize, col: &str) -> Result<i64> {
    if arr.is_null(row) {
        bail!("null value in '{col}'");
    }
    Ok(arr.value(row))
}

fn string_at(arr: &StringArray, row: usize, col: &str) -> Result<String> {
    if arr.is_null(row) {
        bail!("null value in '{col}'");
    }
    Ok(arr.value(row).to_string())
}

fn narrow<T: TryFrom<i64>>(value: i64, col: &str) -> Result<T> {
    T::try_from(value).map_err(|_| anyhow!("'{col}' value {value} out of range"))
}
