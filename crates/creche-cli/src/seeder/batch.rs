//! Multi-row `INSERT ... VALUES` helpers.

/// `($1, $2), ($3, $4), ...` for `rows` tuples of `columns` placeholders.
pub fn values_clause(rows: usize, columns: usize) -> String {
    let mut clause = String::with_capacity(rows * columns * 5);
    for row in 0..rows {
        if row > 0 {
            clause.push_str(", ");
        }
        clause.push('(');
        for column in 0..columns {
            if column > 0 {
                clause.push_str(", ");
            }
            clause.push_str(&format!("${}", row * columns + column + 1));
        }
        clause.push(')');
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_clause() {
        assert_eq!(values_clause(2, 3), "($1, $2, $3), ($4, $5, $6)");
        assert_eq!(values_clause(1, 1), "($1)");
        assert_eq!(values_clause(0, 4), "");
    }
}
