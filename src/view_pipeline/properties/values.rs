//! Matrix and vector values stored as text, e.g. `[1 0 0; 0 1 0; 0 0 1]`.

use nalgebra::{Matrix3, Vector3};

fn parse_numbers(text: &str) -> Option<Vec<f64>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok())
        .collect()
}

fn strip_brackets(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix('[').unwrap_or(text);
    text.strip_suffix(']').unwrap_or(text).trim()
}

/// Parses a 3x3 matrix. Rows are separated by `;`, values by whitespace or
/// `,`. Nine values without row separators are read in row-major order.
pub fn parse_matrix3(text: &str) -> Option<Matrix3<f64>> {
    let inner = strip_brackets(text);

    let values = if inner.contains(';') {
        let rows = inner
            .split(';')
            .map(parse_numbers)
            .collect::<Option<Vec<_>>>()?;

        if rows.len() != 3 || rows.iter().any(|r| r.len() != 3) {
            return None;
        }

        rows.concat()
    } else {
        parse_numbers(inner)?
    };

    if values.len() != 9 {
        return None;
    }

    Some(Matrix3::from_row_slice(&values))
}

/// Parses a 3-vector such as `[0.2 0 0]`.
pub fn parse_vector3(text: &str) -> Option<Vector3<f64>> {
    let values = parse_numbers(strip_brackets(text))?;

    if values.len() != 3 {
        return None;
    }

    Some(Vector3::new(values[0], values[1], values[2]))
}

pub fn format_matrix3(m: &Matrix3<f64>) -> String {
    let rows = (0..3)
        .map(|r| format!("{} {} {}", m[(r, 0)], m[(r, 1)], m[(r, 2)]))
        .collect::<Vec<_>>();

    format!("[{}]", rows.join("; "))
}

pub fn format_vector3(v: &Vector3<f64>) -> String {
    format!("[{} {} {}]", v[0], v[1], v[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_benchmark_intrinsics() {
        let a = parse_matrix3("[3997.684 0 1176.728; 0 3997.684 1011.728; 0 0 1]").unwrap();

        assert_eq!(a[(0, 0)], 3997.684);
        assert_eq!(a[(0, 2)], 1176.728);
        assert_eq!(a[(1, 2)], 1011.728);
        assert_eq!(a[(2, 2)], 1.0);
    }

    #[test]
    fn test_parse_matrix_without_row_separators() {
        let m = parse_matrix3("1, 2, 3, 4, 5, 6, 7, 8, 9").unwrap();
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(2, 2)], 9.0);
    }

    #[test]
    fn test_reject_malformed_values() {
        assert!(parse_matrix3("[1 0; 0 1]").is_none());
        assert!(parse_matrix3("[1 0 0; 0 x 0; 0 0 1]").is_none());
        assert!(parse_vector3("[1 2]").is_none());
    }

    #[test]
    fn test_format_parses_back() {
        let m = Matrix3::new(1.5, 0.0, 2.0, 0.0, 1.5, 3.0, 0.0, 0.0, 1.0);
        assert_eq!(parse_matrix3(&format_matrix3(&m)), Some(m));

        let v = Vector3::new(0.2, -1.0, 0.0);
        assert_eq!(format_vector3(&v), "[0.2 -1 0]");
    }
}
