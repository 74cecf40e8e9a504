/// A sampled 2D position: real part is x, imaginary part is y.
pub type Point = num_complex::Complex64;

/// Serde adapter storing points as `[x, y]` pairs instead of `{re, im}`
/// objects, keeping JSON dumps compact.
pub mod as_pairs {
    use serde::ser::SerializeSeq;

    use super::Point;

    pub fn serialize<S>(points: &[Point], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(points.len()))?;
        for p in points {
            seq.serialize_element(&[p.re, p.im])?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Point>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let pairs: Vec<[f64; 2]> = serde::Deserialize::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[re, im]| Point::new(re, im)).collect())
    }
}
