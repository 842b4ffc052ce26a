use visualizer_macros::Columnar;

#[derive(Debug, Clone, Copy, Columnar)]
pub struct TestRow {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

fn main() {
    let r = TestRow { mean: 2.0, min: 1.0, max: 3.0 };
    let mut s = TestRowSeries::with_capacity(10);
    assert!(s.is_empty());
    s.push(&r);
    assert_eq!(s.len(), 1);
    assert_eq!(s.max, vec![3.0]);
    assert_eq!(TestRow::field_names(), &["mean", "min", "max"]);
    let cols = s.columns();
    assert_eq!(cols[1].0, "min");
    assert_eq!(cols[1].1, &[1.0]);
}
