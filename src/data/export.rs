use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, Date32Array, Float64Array, Int32Array, Int64Array, StringArray, UInt32Array,
    UInt8Array,
};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;

use super::model::{EXPORT_COLUMNS, Recommendation};

/// Days from 0001-01-01 (CE) to the Unix epoch; Arrow's Date32 origin.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Serialize rows to CSV in the fixed export projection, header first.
pub fn write_csv<W: std::io::Write>(rows: &[Recommendation], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if rows.is_empty() {
        // serde only emits the header alongside the first record
        writer.write_record(EXPORT_COLUMNS).context("writing CSV header")?;
    }
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Read an exported recommendation table back. The header must match the
/// export projection exactly, in order.
pub fn read_csv<R: std::io::Read>(input: R) -> Result<Vec<Recommendation>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?;
    if !headers.iter().eq(EXPORT_COLUMNS.iter().copied()) {
        bail!(
            "CSV header does not match the recommendation export: {:?}",
            headers.iter().collect::<Vec<_>>()
        );
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize().enumerate() {
        let row: Recommendation = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Arrow / Parquet
// ---------------------------------------------------------------------------

/// Build an Arrow record batch with the export columns.
pub fn to_record_batch(rows: &[Recommendation]) -> Result<RecordBatch> {
    let strings = |f: fn(&Recommendation) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(rows.iter().map(f)))
    };
    let floats = |f: fn(&Recommendation) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from_iter_values(rows.iter().map(f)))
    };
    let years = |f: fn(&Recommendation) -> i32| -> ArrayRef {
        Arc::new(Int32Array::from_iter_values(rows.iter().map(f)))
    };

    let columns: Vec<ArrayRef> = vec![
        strings(|r| r.buy.label()),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
        floats(|r| r.price),
        floats(|r| r.proposed_price),
        strings(|r| r.sell_when.label()),
        floats(|r| r.price_index),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.bedrooms))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.bathrooms))),
        floats(|r| r.sqft_living),
        floats(|r| r.sqft_lot),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.floors))),
        strings(|r| r.waterfront.label()),
        Arc::new(UInt8Array::from_iter_values(rows.iter().map(|r| r.condition))),
        floats(|r| r.sqft_above),
        floats(|r| r.sqft_basement),
        years(|r| r.yr_built),
        years(|r| r.yr_renovated),
        Arc::new(Date32Array::from_iter_values(
            rows.iter().map(|r| r.date.num_days_from_ce() - EPOCH_DAYS_FROM_CE),
        )),
        Arc::new(UInt32Array::from_iter_values(rows.iter().map(|r| r.zipcode))),
        floats(|r| r.lat),
        floats(|r| r.long),
    ];

    let fields: Vec<Field> = EXPORT_COLUMNS
        .iter()
        .zip(&columns)
        .map(|(name, col)| Field::new(*name, col.data_type().clone(), false))
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .context("building recommendation record batch")
}

/// Write rows as a single-batch Parquet file.
pub fn write_parquet(rows: &[Recommendation], path: &Path) -> Result<()> {
    let batch = to_record_batch(rows)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Write rows to `path`, choosing CSV or Parquet by extension.
pub fn export_file(rows: &[Recommendation], path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(rows, std::io::BufWriter::new(file))?;
        }
        "parquet" | "pq" => write_parquet(rows, path)?,
        other => bail!("Unsupported export extension: .{other}"),
    }

    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// The first `limit` rows rendered as a text table.
pub fn preview(rows: &[Recommendation], limit: usize) -> Result<String> {
    let batch = to_record_batch(&rows[..limit.min(rows.len())])?;
    let table = pretty_format_batches(&[batch]).context("formatting preview")?;
    Ok(table.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType;
    use crate::pipeline::fixtures::raw;
    use crate::pipeline::run;

    fn csv_bytes(rows: &[Recommendation]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_csv(rows, &mut buf).unwrap();
        buf
    }

    fn rows() -> Vec<Recommendation> {
        let raw_rows = vec![
            raw(1, "2014-07-01", 100.0),
            raw(2, "2014-12-15", 150.0),
            raw(3, "2015-01-02", 300.0),
        ];
        run(&raw_rows).unwrap().recommendations
    }

    #[test]
    fn test_csv_header_is_export_projection() {
        let bytes = csv_bytes(&rows());
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, EXPORT_COLUMNS.join(","));
        assert!(text.contains("don't buy"));
        assert!(text.contains("2014-12-15"));
    }

    #[test]
    fn test_csv_reimport_preserves_rows() {
        let original = rows();
        let bytes = csv_bytes(&original);
        let back = read_csv(bytes.as_slice()).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_empty_export_keeps_header() {
        let bytes = csv_bytes(&[]);
        let back = read_csv(bytes.as_slice()).unwrap();
        assert!(back.is_empty());
        assert!(String::from_utf8(bytes).unwrap().starts_with("buy,id,price"));
    }

    #[test]
    fn test_reimport_rejects_foreign_header() {
        let err = read_csv("id,price\n1,2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn test_record_batch_schema() {
        let batch = to_record_batch(&rows()).unwrap();
        assert_eq!(batch.num_rows(), 3);
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, EXPORT_COLUMNS.map(String::from).to_vec());
        assert_eq!(batch.schema().field(17).data_type(), &DataType::Date32);
    }

    #[test]
    fn test_preview_limits_rows() {
        let text = preview(&rows(), 2).unwrap();
        assert!(text.contains("sell_when"));
        assert!(text.contains("2014-07-01"));
        assert!(!text.contains("2015-01-02"));
    }
}
