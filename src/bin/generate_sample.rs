use std::path::PathBuf;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

use house_rocket::data::model::RawRecord;

/// Zip codes with a base price level and a centre point.
const NEIGHBOURHOODS: [(u32, f64, f64, f64); 8] = [
    (98001, 280_000.0, 47.309, -122.270),
    (98004, 1_350_000.0, 47.616, -122.205),
    (98033, 800_000.0, 47.676, -122.193),
    (98039, 2_100_000.0, 47.626, -122.233),
    (98103, 585_000.0, 47.672, -122.343),
    (98118, 420_000.0, 47.541, -122.275),
    (98178, 310_000.0, 47.499, -122.248),
    (98199, 790_000.0, 47.651, -122.398),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_listing(id: i64, rng: &mut SimpleRng) -> RawRecord {
    let start = NaiveDate::from_ymd_opt(2014, 5, 2).expect("valid start date");
    let (zipcode, base_price, lat, long) =
        NEIGHBOURHOODS[rng.range(0, NEIGHBOURHOODS.len() as i64 - 1) as usize];

    let date = start + Duration::days(rng.range(0, 389));
    let bedrooms = rng.range(1, 6) as u32;
    // quarter steps, like the King County export
    let bathrooms = rng.range(4, 14) as f64 * 0.25;
    let sqft_living = (rng.gauss(2_000.0, 600.0).max(500.0) / 10.0).round() * 10.0;
    let sqft_basement = if rng.next_f64() < 0.4 {
        (sqft_living * 0.3 / 10.0).round() * 10.0
    } else {
        0.0
    };
    let waterfront = if rng.next_f64() < 0.03 { 1.0 } else { 0.0 };
    let yr_built = rng.range(1900, 2015) as i32;
    let yr_renovated = if rng.next_f64() < 0.05 {
        rng.range(yr_built as i64, 2015) as i32
    } else {
        0
    };

    let size_factor = sqft_living / 2_000.0;
    let price = (base_price * size_factor * rng.gauss(1.0, 0.25).max(0.3)
        * (1.0 + waterfront))
        .round();

    RawRecord {
        id,
        date: date.format("%Y%m%dT000000").to_string(),
        price,
        bedrooms,
        bathrooms,
        sqft_living,
        sqft_lot: (rng.gauss(7_500.0, 2_500.0).max(600.0)).round(),
        floors: rng.range(2, 6) as f64 * 0.5,
        waterfront,
        condition: rng.range(1, 5) as u8,
        sqft_above: sqft_living - sqft_basement,
        sqft_basement,
        yr_built,
        yr_renovated,
        zipcode,
        lat: lat + rng.gauss(0.0, 0.012),
        long: long + rng.gauss(0.0, 0.012),
    }
}

fn write_csv(rows: &[RawRecord], path: &PathBuf) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    for row in rows {
        writer.serialize(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush writer");
}

fn write_parquet(rows: &[RawRecord], path: &PathBuf) {
    fn floats(rows: &[RawRecord], f: impl Fn(&RawRecord) -> f64) -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn ints(rows: &[RawRecord], f: impl Fn(&RawRecord) -> i64) -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    let float_cols = [
        "price", "bathrooms", "sqft_living", "sqft_lot", "floors", "waterfront",
        "sqft_above", "sqft_basement", "lat", "long",
    ];
    let mut fields = vec![
        Field::new("id", DataType::Int64, false),
        Field::new("date", DataType::Utf8, false),
    ];
    for name in ["bedrooms", "condition", "yr_built", "yr_renovated", "zipcode"] {
        fields.push(Field::new(name, DataType::Int64, false));
    }
    for name in float_cols {
        fields.push(Field::new(name, DataType::Float64, false));
    }
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = vec![
        ints(rows, |r| r.id),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.date.as_str()).collect::<Vec<_>>(),
        )),
        ints(rows, |r| r.bedrooms as i64),
        ints(rows, |r| r.condition as i64),
        ints(rows, |r| r.yr_built as i64),
        ints(rows, |r| r.yr_renovated as i64),
        ints(rows, |r| r.zipcode as i64),
        floats(rows, |r| r.price),
        floats(rows, |r| r.bathrooms),
        floats(rows, |r| r.sqft_living),
        floats(rows, |r| r.sqft_lot),
        floats(rows, |r| r.floors),
        floats(rows, |r| r.waterfront),
        floats(rows, |r| r.sqft_above),
        floats(rows, |r| r.sqft_basement),
        floats(rows, |r| r.lat),
        floats(rows, |r| r.long),
    ];

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("kc_house_sample.csv"));
    let listings = 2_000;

    let mut rng = SimpleRng::new(42);
    let mut rows: Vec<RawRecord> = Vec::with_capacity(listings + listings / 50);
    for i in 0..listings {
        rows.push(generate_listing(7_129_300_520 + i as i64 * 1_013, &mut rng));
    }

    // Resold houses appear twice with the same id
    for i in 0..listings / 50 {
        let original = &rows[i * 37 % listings];
        let mut resale = original.clone();
        resale.price = (original.price * rng.gauss(1.08, 0.04)).round();
        rows.push(resale);
    }

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&rows, &output_path);
    } else {
        write_csv(&rows, &output_path);
    }

    println!(
        "Wrote {} listings ({} duplicate ids) to {}",
        rows.len(),
        listings / 50,
        output_path.display()
    );
}
