use sea_orm::sea_query::{Expr, SimpleExpr};

/// Calendar component of a stored date or timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn strftime_format(&self) -> &'static str {
        match self {
            DatePart::Year => "%Y",
            DatePart::Month => "%m",
            DatePart::Day => "%d",
        }
    }
}

/// `table.column` has `part` equal to `value`
///
/// SQLite stores chrono dates as ISO text, so strftime can pick them apart.
pub fn date_part_eq(table: &str, column: &str, part: DatePart, value: i32) -> SimpleExpr {
    Expr::cust_with_values(
        format!(
            "CAST(strftime('{}', \"{}\".\"{}\") AS INTEGER) = ?",
            part.strftime_format(),
            table,
            column
        ),
        [value],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Query, SqliteQueryBuilder};

    #[test]
    fn test_date_part_expression_renders() {
        let sql = Query::select()
            .expr(Expr::val(1))
            .and_where(date_part_eq("cows", "date_of_birth", DatePart::Month, 4))
            .to_string(SqliteQueryBuilder);

        assert!(sql.contains("strftime('%m', \"cows\".\"date_of_birth\")"));
        assert!(sql.contains("= 4"));
    }
}
