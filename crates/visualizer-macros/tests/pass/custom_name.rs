use visualizer_macros::Columnar;

#[derive(Debug, Clone, Copy, Columnar)]
#[columnar(series_name = "ProbabilityColumns")]
pub struct YearProbabilities {
    pub below: f64,
    pub between: f64,
    pub above: f64,
}

fn main() {
    let p = YearProbabilities { below: 0.4, between: 0.4, above: 0.2 };
    let mut cols = ProbabilityColumns::with_capacity(5);
    cols.push(&p);
    cols.push(&p);
    assert_eq!(cols.len(), 2);
    assert_eq!(cols, cols.clone());
    assert_eq!(YearProbabilities::field_names(), &["below", "between", "above"]);
}
