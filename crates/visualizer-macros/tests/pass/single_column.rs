use visualizer_macros::Columnar;

#[derive(Debug, Clone, Copy, Columnar)]
pub struct Anomaly {
    pub value: f64,
}

fn main() {
    let mut s = AnomalySeries::default();
    assert!(s.is_empty());
    for v in [0.5, -1.5] {
        s.push(&Anomaly { value: v });
    }
    assert_eq!(s.len(), 2);
    let cols = s.columns();
    assert_eq!(cols.len(), 1);
    assert_eq!(cols[0], ("value", &[0.5, -1.5][..]));
    assert_eq!(Anomaly::field_names(), &["value"]);
}
